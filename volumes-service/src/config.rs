// SPDX-License-Identifier: GPL-3.0-only

//! TOML configuration of the service
//!
//! Every field has a default, so an empty or missing file yields the stock
//! behavior.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policies::FilterPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub policy: FilterPolicy,
    pub listing: ListingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Mount unmounted filesystems found while listing.
    pub auto_mount: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { auto_mount: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "volumes_service=info,warn".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given and present, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                tracing::debug!("Config {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.policy.root_label, "Jolicloud");
        assert_eq!(config.policy.restricted_group, "guests");
        assert!(config.listing.auto_mount);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [policy]
            host_label = "Host"

            [listing]
            auto_mount = false
            "#,
        )
        .unwrap();

        assert_eq!(config.policy.host_label, "Host");
        assert_eq!(config.policy.host_mount_point, "/host");
        assert_eq!(config.policy.live_overlay_mount_point, "/rofs");
        assert!(!config.listing.auto_mount);
        assert_eq!(config.logging.filter, "volumes_service=info,warn");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            ServiceConfig::load_or_default(Some(Path::new("/nonexistent/volumes.toml"))).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn malformed_file_reports_path() {
        let path = std::env::temp_dir().join(format!(
            "volumes-service-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[listing]\nauto_mount = \"sometimes\"\n").unwrap();

        let err = ServiceConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("volumes-service-config"));
    }
}
