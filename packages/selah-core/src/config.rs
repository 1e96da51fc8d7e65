//! Application configuration, read from YAML.
//!
//! ```yaml
//! snapshot: data/cifras.json
//! collection: cifras
//! default-key: C
//! placeholder: "[Cifra não disponível ou vazia]"
//! key-scan-limit: 500
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detect::KEY_SCAN_LIMIT;
use crate::error::SelahError;
use crate::pitch::{parse_key, PitchClass};

pub const DEFAULT_COLLECTION: &str = "cifras";
pub const DEFAULT_PLACEHOLDER: &str = "[Cifra não disponível ou vazia]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// JSON export of the song database
    pub snapshot: Option<PathBuf>,
    /// Database path of the song collection
    pub collection: String,
    /// Key offered when a selected song has no usable original key
    pub default_key: String,
    /// Shown instead of an empty sheet
    pub placeholder: String,
    pub key_scan_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot: None,
            collection: DEFAULT_COLLECTION.to_string(),
            default_key: PitchClass::C.name().to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            key_scan_limit: KEY_SCAN_LIMIT,
        }
    }
}

impl Config {
    /// Parse and validate a YAML document. An empty document is the default config.
    pub fn from_yaml(source: &str) -> Result<Self, SelahError> {
        let config: Config = if source.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(source).map_err(|e| SelahError::MetadataError(e.to_string()))?
        };
        config.default_key()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SelahError> {
        let source = fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    pub fn default_key(&self) -> Result<PitchClass, SelahError> {
        parse_key(&self.default_key).ok_or_else(|| SelahError::UnknownKey(self.default_key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.collection, "cifras");
        assert_eq!(config.default_key().unwrap(), PitchClass::C);
        assert_eq!(config.key_scan_limit, 500);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_yaml("snapshot: db.json\ndefault-key: Bb\n").unwrap();
        assert_eq!(config.snapshot, Some(PathBuf::from("db.json")));
        assert_eq!(config.default_key().unwrap(), PitchClass::ASharp);
        assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_invalid_default_key() {
        let err = Config::from_yaml("default-key: H\n").unwrap_err();
        assert!(matches!(err, SelahError::UnknownKey(key) if key == "H"));
    }

    #[test]
    fn test_unknown_field() {
        let err = Config::from_yaml("colection: typo\n").unwrap_err();
        assert!(matches!(err, SelahError::MetadataError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selah.yaml");
        fs::write(&path, "collection: app/cifras\nkey-scan-limit: 200\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.collection, "app/cifras");
        assert_eq!(config.key_scan_limit, 200);
    }
}
