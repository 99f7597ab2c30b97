use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;

use crate::domain::app_config::AppConfig;
use crate::domain::error::{AppError, Result};

pub const ENV_PREFIX: &str = "SURVEY_IMPORT_";

/// Layered configuration: defaults <- TOML file <- `SURVEY_IMPORT_*` env vars.
pub struct ConfigService {
    file: Option<PathBuf>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self { file: None }
    }

    pub fn with_file(path: impl AsRef<Path>) -> Self {
        Self {
            file: Some(path.as_ref().to_path_buf()),
        }
    }

    pub fn figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = &self.file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(&self) -> Result<AppConfig> {
        if let Some(path) = &self.file {
            if !path.is_file() {
                return Err(AppError::ConfigError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }

        let config: AppConfig = self.figment().extract()?;
        config.validate().map_err(AppError::ConfigError)?;

        tracing::debug!(
            file = ?self.file,
            emit_polygons = config.kml.emit_polygons,
            locale = ?config.boq.number_locale,
            "Configuration loaded"
        );
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
