use serde::{Deserialize, Serialize};

use super::boq::BoqConfig;
use super::kml::KmlConfig;
use super::soil::SoilConfig;

/// Bounds applied to a file before any reader touches it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    /// Maximum file size in bytes (default: 20 MiB)
    pub max_file_bytes: u64,

    /// Lowercase extensions without the dot
    pub allowed_extensions: Vec<String>,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: 20 * 1024 * 1024,
            allowed_extensions: ["kml", "kmz", "xlsx", "xls", "xlsm", "ods", "csv"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub kml: KmlConfig,
    #[serde(default)]
    pub soil: SoilConfig,
    #[serde(default)]
    pub boq: BoqConfig,
    #[serde(default)]
    pub limits: InputLimits,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.kml.validate().map_err(|e| format!("kml: {}", e))?;
        self.soil.validate().map_err(|e| format!("soil: {}", e))?;
        self.boq.validate().map_err(|e| format!("boq: {}", e))?;
        if self.limits.max_file_bytes == 0 {
            return Err("limits: max_file_bytes must be > 0".to_string());
        }
        Ok(())
    }
}
