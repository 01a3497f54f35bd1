//! # Config Loader
//!
//! Locates JSON configuration files on disk and parses them into any
//! `serde::Deserialize` type.
//!
//! ```no_run
//! use config_loader::{find_config_file, load_json};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Default)]
//! #[serde(default)]
//! struct Settings {
//!     device_index: u32,
//! }
//!
//! let path = find_config_file("facecap_config.json")?;
//! let settings: Settings = load_json(&path)?;
//! # Ok::<(), config_loader::ConfigError>(())
//! ```

pub mod error;

pub use error::{ConfigError, Result};

use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that points at an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Reads a configuration file into a string without interpreting it.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    fs::read_to_string(path).map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
}

/// Parses JSON text. `origin` names the source in error messages.
pub fn parse_json<T: DeserializeOwned>(content: &str, origin: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })
}

/// Reads and parses a JSON configuration file.
pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let content = load_config_file(path)?;
    parse_json(&content, &path.display().to_string())
}

/// Looks for a configuration file in the usual places.
///
/// Search order:
/// 1. `CONFIG_PATH` environment variable (if it names an existing file)
/// 2. `./config/{filename}`
/// 3. `./{filename}`
pub fn find_config_file(filename: &str) -> Result<PathBuf> {
    let from_env = env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
    find_in(filename, from_env.as_deref(), Path::new("."))
}

fn find_in(filename: &str, explicit: Option<&Path>, base: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit
        && path.is_file()
    {
        return Ok(path.to_path_buf());
    }

    let candidates = [base.join("config").join(filename), base.join(filename)];
    for candidate in candidates {
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(ConfigError::FileNotFound(format!(
        "'{}' (searched: {} env var, ./config/{}, ./{})",
        filename, CONFIG_PATH_ENV, filename, filename
    )))
}
