pub mod engine;
pub mod format;
pub mod loader;

pub use crate::domain::ports::{ConfigProvider, PetStore};
pub use crate::utils::error::Result;
