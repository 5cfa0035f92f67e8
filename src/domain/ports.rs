use crate::core::loader::LoadReport;
use crate::domain::registry::PetList;
use crate::utils::error::Result;
use std::path::Path;

/// Where the registry is persisted. Implementations report I/O failures as
/// errors; tolerating malformed content is their own job.
pub trait PetStore {
    /// Replaces the contents of `pets` with what the store holds.
    fn load(&self, pets: &mut PetList) -> Result<LoadReport>;

    /// Writes the whole registry, replacing what the store held before.
    fn save(&self, pets: &PetList) -> Result<()>;

    /// Used in log lines.
    fn location(&self) -> &Path;
}

/// Settings the binary needs at startup, whatever file format they came from.
pub trait ConfigProvider {
    fn data_file(&self) -> &str;
    fn atomic_save(&self) -> bool;
    fn log_directory(&self) -> &str;
    fn log_file_name(&self) -> &str;
    fn log_level(&self) -> &str;
    fn log_json(&self) -> bool;
}
