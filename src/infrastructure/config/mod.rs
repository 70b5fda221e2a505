use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::{AppError, Result};

const DEFAULT_CONFIG_FILE: &str = "sheetstats.toml";
const ENV_PREFIX: &str = "SHEETSTATS_";

/// Service settings, fixed at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceConfig {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    /// Where raw uploads are written. Relative paths resolve against the
    /// working directory.
    pub upload_dir: PathBuf,

    #[validate(range(min = 1))]
    pub max_upload_bytes: usize,

    /// Limit for JSON bodies. Stats calls carry the whole table.
    #[validate(range(min = 1))]
    pub max_json_bytes: usize,

    #[validate(range(min = 1, max = 256))]
    pub workers: Option<usize>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 50 * 1024 * 1024,
            max_json_bytes: 32 * 1024 * 1024,
            workers: None,
        }
    }
}

pub struct ConfigService {
    figment: Figment,
}

impl ConfigService {
    /// Defaults, then `sheetstats.toml` (or the file named by
    /// `SHEETSTATS_CONFIG`), then `SHEETSTATS_*` environment variables.
    pub fn new() -> Self {
        let file = std::env::var(format!("{}CONFIG", ENV_PREFIX))
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        Self::from_figment(
            Figment::from(Serialized::defaults(ServiceConfig::default()))
                .merge(Toml::file(file))
                .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"])),
        )
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn load(&self) -> Result<ServiceConfig> {
        let config: ServiceConfig = self
            .figment
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;

        if config.upload_dir.as_os_str().is_empty() {
            return Err(AppError::ValidationError(
                "Invalid configuration: upload_dir must not be empty".to_string(),
            ));
        }

        config
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;

        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
