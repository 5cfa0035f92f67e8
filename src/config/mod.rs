pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;

/// Command-line flags. Each one, when given, overrides the matching key of
/// the TOML file.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cuddlecare")]
#[command(about = "Track your pets and their treatments from the terminal")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Where pets and treatments are stored
    #[arg(long)]
    pub data_file: Option<String>,

    /// Directory for the log file
    #[arg(long)]
    pub log_dir: Option<String>,

    /// Overwrite the data file in place instead of via a temp file
    #[arg(long)]
    pub no_atomic_save: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file (or the defaults), applies the flags and
    /// validates the result.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(data_file) = &self.data_file {
            config.storage.data_file = data_file.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.logging.directory = log_dir.clone();
        }
        if self.no_atomic_save {
            config.storage.atomic_save = false;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }

        config.validate()?;
        Ok(config)
    }
}
