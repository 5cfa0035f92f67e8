pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::flat_file::FlatFileStore;
pub use crate::core::engine::CareEngine;
pub use crate::core::loader::LoadReport;
pub use crate::domain::model::{Pet, Treatment};
pub use crate::domain::registry::PetList;
pub use crate::utils::error::{CareError, Result};
