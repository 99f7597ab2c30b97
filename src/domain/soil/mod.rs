// ============================================================
// SOIL DOMAIN
// ============================================================
// Soil material labels and the rules that assign them

mod soil_config;

pub use soil_config::{ChannelBound, ColorRule, KeywordRule, SoilConfig, SoilDepth};

use serde::{Deserialize, Serialize};

/// Soil material label attached to every feature.
///
/// The three built-in materials have constructors; any other label can be
/// introduced through [`SoilConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoilType(String);

impl SoilType {
    pub const PASIR: &'static str = "Pasir";
    pub const TANAH_LIAT: &'static str = "TanahLiat";
    pub const BATUAN: &'static str = "Batuan";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn pasir() -> Self {
        Self::new(Self::PASIR)
    }

    pub fn tanah_liat() -> Self {
        Self::new(Self::TANAH_LIAT)
    }

    pub fn batuan() -> Self {
        Self::new(Self::BATUAN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
