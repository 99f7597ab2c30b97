// ============================================================
// SOIL CLASSIFIER
// ============================================================
// Name -> description -> color -> default, first hit wins

use crate::domain::kml::Rgba;
use crate::domain::soil::{SoilConfig, SoilType};

/// Which signal decided the soil type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoilEvidence {
    Name,
    Description,
    Color,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoilClassification {
    pub soil_type: SoilType,
    pub depth_m: f64,
    pub evidence: SoilEvidence,
}

pub struct SoilClassifier {
    config: SoilConfig,
}

impl SoilClassifier {
    pub fn new(config: SoilConfig) -> Self {
        Self { config }
    }

    pub fn classify(
        &self,
        name: Option<&str>,
        description: Option<&str>,
        color: Option<Rgba>,
    ) -> SoilClassification {
        let (soil_type, evidence) = name
            .and_then(|text| self.match_keywords(text))
            .map(|t| (t, SoilEvidence::Name))
            .or_else(|| {
                description
                    .and_then(|text| self.match_keywords(text))
                    .map(|t| (t, SoilEvidence::Description))
            })
            .or_else(|| {
                color
                    .and_then(|c| self.match_color(c))
                    .map(|t| (t, SoilEvidence::Color))
            })
            .unwrap_or_else(|| (self.config.default_type.clone(), SoilEvidence::Default));

        let depth_m = self.depth_of(&soil_type);
        SoilClassification {
            soil_type,
            depth_m,
            evidence,
        }
    }

    pub fn match_keywords(&self, text: &str) -> Option<SoilType> {
        let lower = text.to_lowercase();
        self.config
            .keyword_rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.soil_type.clone())
    }

    pub fn match_color(&self, color: Rgba) -> Option<SoilType> {
        self.config
            .color_rules
            .iter()
            .find(|rule| rule.matches(color.r, color.g, color.b))
            .map(|rule| rule.soil_type.clone())
    }

    /// Configured depth; falls back to the default type's depth, then 0.
    pub fn depth_of(&self, soil_type: &SoilType) -> f64 {
        self.config
            .depth_of(soil_type)
            .or_else(|| self.config.depth_of(&self.config.default_type))
            .unwrap_or(0.0)
    }
}

impl Default for SoilClassifier {
    fn default() -> Self {
        Self::new(SoilConfig::default())
    }
}
