use crate::adapters::flat_file::DEFAULT_DATA_FILE;
use crate::core::ConfigProvider;
use crate::utils::error::{CareError, Result};
use crate::utils::validation::{validate_one_of, validate_path, Validate};
use serde::Deserialize;
use std::path::Path;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Every section and key is optional; missing ones take the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_file: String,
    pub atomic_save: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
            atomic_save: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_name: String,
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_name: "cuddlecare.log".to_string(),
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| CareError::ConfigValidationError {
                field: "config".to_string(),
                message: format!("cannot read {}: {}", path.display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// Parses `content` after `${VAR}` substitution. Does not validate.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CareError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left
    /// as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            CareError::ConfigValidationError {
                field: "env_substitution".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("storage.data_file", &self.storage.data_file)?;
        validate_path("logging.directory", &self.logging.directory)?;
        validate_path("logging.file_name", &self.logging.file_name)?;
        validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_file(&self) -> &str {
        &self.storage.data_file
    }

    fn atomic_save(&self) -> bool {
        self.storage.atomic_save
    }

    fn log_directory(&self) -> &str {
        &self.logging.directory
    }

    fn log_file_name(&self) -> &str {
        &self.logging.file_name
    }

    fn log_level(&self) -> &str {
        &self.logging.level
    }

    fn log_json(&self) -> bool {
        self.logging.json
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.data_file(), "data/cuddlecare.txt");
        assert!(config.atomic_save());
        assert_eq!(config.log_level(), "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let toml_content = r#"
[storage]
atomic_save = false

[logging]
level = "debug"
json = true
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_file(), "data/cuddlecare.txt");
        assert!(!config.atomic_save());
        assert_eq!(config.log_level(), "debug");
        assert!(config.log_json());
        assert_eq!(config.log_file_name(), "cuddlecare.log");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CUDDLECARE_TEST_DATA_DIR", "/tmp/pets");

        let toml_content = r#"
[storage]
data_file = "${CUDDLECARE_TEST_DATA_DIR}/store.txt"

[logging]
directory = "${CUDDLECARE_TEST_UNSET_VAR}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_file(), "/tmp/pets/store.txt");
        assert_eq!(config.log_directory(), "${CUDDLECARE_TEST_UNSET_VAR}");

        std::env::remove_var("CUDDLECARE_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(CareError::InvalidConfigValueError { field, .. }) if field == "logging.level"
        ));

        let config = TomlConfig::from_toml_str("[storage]\ndata_file = \"  \"\n").unwrap();
        assert!(config.validate().is_err());

        assert!(matches!(
            TomlConfig::from_toml_str("[storage\n"),
            Err(CareError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\ndata_file = \"pets.txt\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_file(), "pets.txt");

        assert!(TomlConfig::from_file("/nonexistent/cuddlecare.toml").is_err());
    }
}
