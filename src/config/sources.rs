//! Config file discovery and format-specific deserialization.
//!
//! [`load_file`] reads an explicit `--config` path, or auto-detects a
//! `devserve.*` file in the working directory. Formats are gated by the
//! `yaml`, `json` and `toml` cargo features.

use std::path::{Path, PathBuf};

use super::model::FileConfig;
use crate::error::DevserveError;

const CANDIDATES: &[&str] = &[
    "devserve.yaml",
    "devserve.yml",
    "devserve.json",
    "devserve.toml",
];

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<FileConfig, DevserveError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| DevserveError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| DevserveError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| DevserveError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(DevserveError::UnsupportedFormat(other.to_string())),
    }
}

/// Load the config file, if any. Returns `Ok(None)` when no explicit
/// path was given and nothing was auto-detected.
pub fn load_file(explicit: Option<&Path>) -> Result<Option<(PathBuf, FileConfig)>, DevserveError> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(DevserveError::ConfigFileNotFound {
                    path: path.to_path_buf(),
                });
            }
            path.to_path_buf()
        }
        None => match CANDIDATES.iter().map(PathBuf::from).find(|p| p.is_file()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "auto-detected config file");
                path
            }
            None => return Ok(None),
        },
    };

    let content = std::fs::read_to_string(&path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;
    Ok(Some((path, config)))
}
