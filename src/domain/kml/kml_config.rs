use serde::{Deserialize, Serialize};

/// Configuration for KML conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmlConfig {
    /// Emit Polygon placemarks as features (default: true)
    pub emit_polygons: bool,

    /// Earth radius used for distance, bearing and area (default: 6 371 000 m)
    pub earth_radius_m: f64,
}

impl Default for KmlConfig {
    fn default() -> Self {
        Self {
            emit_polygons: true,
            earth_radius_m: 6_371_000.0,
        }
    }
}

impl KmlConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.earth_radius_m.is_finite() || self.earth_radius_m <= 0.0 {
            return Err("earth_radius_m must be > 0".to_string());
        }
        Ok(())
    }
}
