//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading reimbursement
//! constants from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::ReimbursementConfig;

/// Loads and provides access to a reimbursement constant set.
///
/// A configuration is a single YAML file:
/// ```text
/// config/
/// ├── legacy.yaml       # Constants of the production calculator
/// └── exploratory.yaml  # Alternative tier scheme from calibration
/// ```
///
/// # Example
///
/// ```no_run
/// use travel_reimbursement::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/legacy.yaml").unwrap();
/// println!("Loaded constants: {}", loader.config().metadata.name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ReimbursementConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - The rule tables are inconsistent (`InvalidConfig`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use travel_reimbursement::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/legacy.yaml")?;
    /// # Ok::<(), travel_reimbursement::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let config = Self::load_yaml::<ReimbursementConfig>(path)?;
        config.validate()?;

        info!(
            path = %path.display(),
            name = %config.metadata.name,
            "Loaded reimbursement configuration"
        );

        Ok(Self { config })
    }

    /// Wraps the built-in legacy constants.
    pub fn legacy() -> Self {
        Self {
            config: ReimbursementConfig::default(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &ReimbursementConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> ReimbursementConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReceiptSchedule;
    use rust_decimal::Decimal;
    use std::io::Write;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn write_yaml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_legacy_file_matches_builtin_constants() {
        let loader = ConfigLoader::load("./config/legacy.yaml").unwrap();
        assert_eq!(loader.config(), &ReimbursementConfig::default());
        assert_eq!(loader.config(), ConfigLoader::legacy().config());
    }

    #[test]
    fn test_builtin_legacy_constants_are_valid() {
        let config = ConfigLoader::legacy().into_config();

        assert_eq!(config.metadata.name, "legacy");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_exploratory_configuration() {
        let loader = ConfigLoader::load("./config/exploratory.yaml");
        assert!(loader.is_ok(), "Failed to load config: {:?}", loader.err());

        let config = loader.unwrap().into_config();
        assert_eq!(config.metadata.name, "exploratory");
        assert_eq!(config.mileage.bands.len(), 3);
        assert_eq!(config.mileage.bands[0].rate, dec("0.58"));
        assert!(config.clamp.cap.is_none());
        match config.receipts {
            ReceiptSchedule::Marginal { bands } => {
                assert_eq!(bands[0].width, Some(dec("200")));
                assert_eq!(bands[0].rate, dec("0.8"));
            }
            other => panic!("Expected marginal receipt schedule, got {:?}", other),
        }
    }

    #[test]
    fn test_load_minimal_yaml() {
        let file = write_yaml(
            r#"
metadata:
  name: flat
per_diem:
  tiers:
    - daily_rate: 100
mileage:
  bands:
    - rate: 0.5
receipts:
  mode: per_day_multiplier
  tiers: []
  default_multiplier: 1
clamp:
  floor_per_day: 0
"#,
        );

        let config = ConfigLoader::load(file.path()).unwrap().into_config();
        assert_eq!(config.metadata.name, "flat");
        assert_eq!(config.metadata.description, "");
        assert_eq!(config.per_diem.tiers[0].daily_rate, dec("100"));
        assert!(config.efficiency.tiers.is_empty());
        assert!(config.clamp.cap.is_none());
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/legacy.yaml");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("legacy.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_malformed_yaml_returns_parse_error() {
        let file = write_yaml("metadata: [unterminated");

        match ConfigLoader::load(file.path()) {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert_eq!(path, file.path().display().to_string());
                assert!(!message.is_empty());
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_inconsistent_tables_returns_invalid_config() {
        let file = write_yaml(
            r#"
metadata:
  name: broken
per_diem:
  tiers:
    - max_days: 5
      daily_rate: 100
mileage:
  bands:
    - rate: 0.5
receipts:
  mode: marginal
  bands:
    - rate: 0.5
clamp:
  floor_per_day: 0
"#,
        );

        match ConfigLoader::load(file.path()) {
            Err(EngineError::InvalidConfig { message }) => {
                assert!(message.contains("per-diem"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }
}
