//! Configuration files
//!
//! A driver configuration is a JSON document deserialized into
//! `DriverConfig`. Every field has a default, so a file only names what it
//! changes:
//!
//! ```json
//! {
//!   "force_real": true,
//!   "scan": { "buses": [1], "addresses": [35] },
//!   "read": { "attempts": 5 }
//! }
//! ```
//!
//! The loaded configuration is validated before it is returned.

use std::fs;
use std::path::Path;

use thiserror::Error;
use uvsense_core::{DriverConfig, DriverError};

/// Configuration loading failures
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    /// The file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON for `DriverConfig`
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The values were rejected by `DriverConfig::validate`
    #[error("invalid config: {0}")]
    Invalid(#[from] DriverError),
}

/// Parse and validate a JSON configuration
pub fn load_config_str(json: &str) -> Result<DriverConfig, ConfigLoadError> {
    let config: DriverConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Read, parse, and validate a JSON configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<DriverConfig, ConfigLoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let config = load_config_str(&json)?;
    log::info!("loaded driver config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(load_config_str("{}").unwrap(), DriverConfig::default());
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config = load_config_str(
            r#"{ "force_real": true, "scan": { "buses": [1], "addresses": [35] }, "read": { "attempts": 5 } }"#,
        )
        .unwrap();

        assert!(config.force_real);
        assert_eq!(config.scan.buses.as_slice(), &[1]);
        assert_eq!(config.scan.addresses.as_slice(), &[0x23]);
        assert_eq!(config.read.attempts, 5);
        assert_eq!(config.read.retry_delay_ms, 20);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = load_config_str(r#"{ "scan": { "rounds": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Invalid(DriverError::InvalidConfig { .. })
        ));

        let err = load_config_str(r#"{ "read": { "attempts": "many" } }"#).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "simulate": true, "simulation": {{ "steps_per_level": 4 }} }}"#).unwrap();

        let config = load_config(file.path()).unwrap();
        assert!(config.simulate);
        assert_eq!(config.simulation.steps_per_level, 4);
        assert_eq!(config.simulation.levels.len(), 13);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io(_)));
    }
}
