use config_loader::{ConfigError, find_config_file, load_json, parse_json};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::{CaptureConfig, LoggingConfig};

/// File name searched for when no configuration is given explicitly
pub const CONFIG_FILE_NAME: &str = "facecap_config.json";

/// Environment variable holding an inline JSON configuration
pub const CONFIG_ENV: &str = "CONFIG";

/// facecap configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FacecapConfig {
    pub capture: CaptureConfig,
    pub logging: LoggingConfig,
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOrigin {
    Environment,
    File(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigOrigin::Environment => write!(f, "{} env", CONFIG_ENV),
            ConfigOrigin::File(path) => write!(f, "{}", path.display()),
            ConfigOrigin::Defaults => write!(f, "built-in defaults"),
        }
    }
}

impl FacecapConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> config_loader::Result<Self> {
        load_json(path)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(content: &str, origin: &str) -> config_loader::Result<Self> {
        parse_json(content, origin)
    }

    /// Resolves the configuration in this order:
    /// 1. `CONFIG` environment variable holding JSON
    /// 2. `explicit` path (`--config`)
    /// 3. `facecap_config.json` found by the config loader
    /// 4. Defaults
    ///
    /// A source that exists but cannot be parsed is an error; only a missing
    /// discovered file falls back to defaults.
    pub fn resolve(explicit: Option<&Path>) -> config_loader::Result<(Self, ConfigOrigin)> {
        let inline = std::env::var(CONFIG_ENV).ok();
        Self::resolve_from(inline.as_deref(), explicit, find_config_file(CONFIG_FILE_NAME))
    }

    fn resolve_from(
        inline: Option<&str>,
        explicit: Option<&Path>,
        discovered: config_loader::Result<PathBuf>,
    ) -> config_loader::Result<(Self, ConfigOrigin)> {
        if let Some(json) = inline {
            return Ok((Self::from_json(json, CONFIG_ENV)?, ConfigOrigin::Environment));
        }

        if let Some(path) = explicit {
            return Ok((Self::load_from_file(path)?, ConfigOrigin::File(path.to_path_buf())));
        }

        match discovered {
            Ok(path) => {
                let config = Self::load_from_file(&path)?;
                Ok((config, ConfigOrigin::File(path)))
            }
            Err(ConfigError::FileNotFound(_)) => Ok((Self::default(), ConfigOrigin::Defaults)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn not_found() -> config_loader::Result<PathBuf> {
        Err(ConfigError::FileNotFound(CONFIG_FILE_NAME.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = FacecapConfig::default();
        assert_eq!(config.capture.device_index, 0);
        assert_eq!((config.capture.width, config.capture.height), (640, 480));
        assert_eq!(config.capture.preview_dir, None);
        assert_eq!(config.logging.log_file_path, "facecap.log");
        assert_eq!(config.logging.log_level, "info");
        assert!(!config.logging.enable_console);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            FacecapConfig::from_json(r#"{"capture": {"width": 1280, "height": 720}}"#, "test")
                .unwrap();
        assert_eq!(config.capture.width, 1280);
        assert_eq!(config.capture.device_index, 0);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_inline_json_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.json");
        fs::write(&path, r#"{"capture": {"device_index": 3}}"#).unwrap();

        let (config, origin) = FacecapConfig::resolve_from(
            Some(r#"{"capture": {"device_index": 1}}"#),
            Some(&path),
            not_found(),
        )
        .unwrap();

        assert_eq!(config.capture.device_index, 1);
        assert_eq!(origin, ConfigOrigin::Environment);
    }

    #[test]
    fn test_explicit_path_before_discovery() {
        let dir = tempdir().unwrap();
        let explicit = dir.path().join("explicit.json");
        let discovered = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&explicit, r#"{"logging": {"log_level": "debug"}}"#).unwrap();
        fs::write(&discovered, r#"{"logging": {"log_level": "error"}}"#).unwrap();

        let (config, origin) =
            FacecapConfig::resolve_from(None, Some(&explicit), Ok(discovered)).unwrap();

        assert_eq!(config.logging.log_level, "debug");
        assert_eq!(origin, ConfigOrigin::File(explicit));
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let result = FacecapConfig::resolve_from(
            None,
            Some(Path::new("/nonexistent/facecap.json")),
            not_found(),
        );
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_nothing_found_uses_defaults() {
        let (config, origin) = FacecapConfig::resolve_from(None, None, not_found()).unwrap();
        assert_eq!(config, FacecapConfig::default());
        assert_eq!(origin, ConfigOrigin::Defaults);
    }

    #[test]
    fn test_invalid_inline_json_is_an_error() {
        let result = FacecapConfig::resolve_from(Some("{ not json"), None, not_found());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
