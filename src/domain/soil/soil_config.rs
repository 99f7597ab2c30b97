// ============================================================
// SOIL CLASSIFICATION CONFIGURATION
// ============================================================
// Keyword rules, color rules and the soil-type -> depth table

use serde::{Deserialize, Serialize};

use super::SoilType;

/// Excavation depth for one soil type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilDepth {
    pub soil_type: SoilType,
    /// Depth in meters
    pub depth_m: f64,
}

/// Case-insensitive substring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub soil_type: SoilType,
    pub keywords: Vec<String>,
    /// Rule does not fire when the text also contains any of these
    #[serde(default)]
    pub unless_contains: Vec<String>,
}

impl KeywordRule {
    fn new(soil_type: SoilType, keywords: &[&str], unless_contains: &[&str]) -> Self {
        Self {
            soil_type,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            unless_contains: unless_contains.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// `lower` must already be lowercase.
    pub fn matches(&self, lower: &str) -> bool {
        let hit = self
            .keywords
            .iter()
            .any(|k| lower.contains(k.to_lowercase().as_str()));
        hit && !self
            .unless_contains
            .iter()
            .any(|k| lower.contains(k.to_lowercase().as_str()))
    }
}

/// Strict bounds on a single color channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelBound {
    #[serde(default)]
    pub above: Option<u8>,
    #[serde(default)]
    pub below: Option<u8>,
}

impl ChannelBound {
    pub fn above(v: u8) -> Self {
        Self {
            above: Some(v),
            below: None,
        }
    }

    pub fn below(v: u8) -> Self {
        Self {
            above: None,
            below: Some(v),
        }
    }

    pub fn contains(&self, value: u8) -> bool {
        self.above.map_or(true, |a| value > a) && self.below.map_or(true, |b| value < b)
    }
}

/// Approximate color bucket on decoded RGB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRule {
    pub soil_type: SoilType,
    #[serde(default)]
    pub red: ChannelBound,
    #[serde(default)]
    pub green: ChannelBound,
    #[serde(default)]
    pub blue: ChannelBound,
    /// When set, max(r,g,b) - min(r,g,b) must not exceed this (grey tones)
    #[serde(default)]
    pub max_channel_spread: Option<u8>,
}

impl ColorRule {
    pub fn matches(&self, r: u8, g: u8, b: u8) -> bool {
        let spread_ok = self.max_channel_spread.map_or(true, |limit| {
            let max = r.max(g).max(b);
            let min = r.min(g).min(b);
            max - min <= limit
        });
        spread_ok && self.red.contains(r) && self.green.contains(g) && self.blue.contains(b)
    }
}

/// Configuration for soil classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilConfig {
    /// Evaluated in order; first match wins
    pub keyword_rules: Vec<KeywordRule>,

    /// Evaluated in order after keywords fail on both name and description
    pub color_rules: Vec<ColorRule>,

    /// Used when nothing matches (default: TanahLiat)
    pub default_type: SoilType,

    /// Depth per soil type, used downstream for excavation estimates
    pub depths: Vec<SoilDepth>,
}

impl Default for SoilConfig {
    fn default() -> Self {
        Self {
            keyword_rules: vec![
                KeywordRule::new(SoilType::pasir(), &["pasir", "sand"], &[]),
                KeywordRule::new(SoilType::batuan(), &["batuan", "batu", "rock"], &[]),
                KeywordRule::new(SoilType::tanah_liat(), &["tanah liat", "clay", "liat"], &[]),
                // "batuan" contains "batu"; a bare "tanah" next to it is not clay
                KeywordRule::new(SoilType::tanah_liat(), &["tanah"], &["batuan"]),
            ],
            color_rules: vec![
                ColorRule {
                    soil_type: SoilType::pasir(),
                    red: ChannelBound::above(200),
                    green: ChannelBound::above(180),
                    blue: ChannelBound::below(100),
                    max_channel_spread: None,
                },
                ColorRule {
                    soil_type: SoilType::tanah_liat(),
                    red: ChannelBound::above(180),
                    green: ChannelBound::below(100),
                    blue: ChannelBound::below(100),
                    max_channel_spread: None,
                },
                ColorRule {
                    soil_type: SoilType::batuan(),
                    red: ChannelBound::below(150),
                    green: ChannelBound::default(),
                    blue: ChannelBound::default(),
                    max_channel_spread: Some(30),
                },
            ],
            default_type: SoilType::tanah_liat(),
            depths: vec![
                SoilDepth {
                    soil_type: SoilType::pasir(),
                    depth_m: 1.5,
                },
                SoilDepth {
                    soil_type: SoilType::tanah_liat(),
                    depth_m: 2.0,
                },
                SoilDepth {
                    soil_type: SoilType::batuan(),
                    depth_m: 2.5,
                },
            ],
        }
    }
}

impl SoilConfig {
    pub fn depth_of(&self, soil_type: &SoilType) -> Option<f64> {
        self.depths
            .iter()
            .find(|d| &d.soil_type == soil_type)
            .map(|d| d.depth_m)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        for depth in &self.depths {
            if !depth.depth_m.is_finite() || depth.depth_m < 0.0 {
                return Err(format!(
                    "depth for {} must be a non-negative number",
                    depth.soil_type
                ));
            }
        }

        let referenced = std::iter::once(&self.default_type)
            .chain(self.keyword_rules.iter().map(|r| &r.soil_type))
            .chain(self.color_rules.iter().map(|r| &r.soil_type));
        for soil_type in referenced {
            if self.depth_of(soil_type).is_none() {
                return Err(format!("soil type {} has no configured depth", soil_type));
            }
        }

        if self.keyword_rules.iter().any(|r| r.keywords.is_empty()) {
            return Err("keyword rules must list at least one keyword".to_string());
        }
        Ok(())
    }
}
