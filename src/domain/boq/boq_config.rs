// ============================================================
// BOQ CONFIGURATION
// ============================================================
// Header markers, bilingual column synonyms, number locale and
// cost-bucket keywords for spreadsheet conversion

use serde::{Deserialize, Serialize};

use super::CostBucket;

/// How separators in numeric text are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberLocale {
    /// Infer grouping vs decimal separator from the text itself
    #[default]
    Auto,
    /// `.` groups thousands, `,` is the decimal mark (1.250.000,50)
    Indonesian,
    /// `,` groups thousands, `.` is the decimal mark (1,250,000.50)
    International,
}

/// Header synonyms per canonical field, matched as lowercase substrings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSynonyms {
    pub no: Vec<String>,
    pub description: Vec<String>,
    pub unit: Vec<String>,
    pub quantity: Vec<String>,
    pub unit_price: Vec<String>,
    pub total_price: Vec<String>,
    pub category: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for ColumnSynonyms {
    fn default() -> Self {
        Self {
            no: strings(&["no", "nomor", "#", "item"]),
            description: strings(&[
                "description",
                "deskripsi",
                "uraian",
                "pekerjaan",
                "nama",
            ]),
            unit: strings(&["unit", "satuan", "sat"]),
            quantity: strings(&["qty", "quantity", "volume", "vol", "kuantitas", "banyak"]),
            unit_price: strings(&["harga satuan", "unit price", "price", "harga", "rate"]),
            total_price: strings(&["total", "jumlah harga", "jumlah", "amount", "subtotal"]),
            category: strings(&["category", "kategori", "jenis", "type"]),
        }
    }
}

/// Keyword sets that assign an item to a cost bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBucketConfig {
    /// Checked first
    pub labor_keywords: Vec<String>,
    pub material_keywords: Vec<String>,
    /// Used when neither set matches. Deliberately simplistic: unknown
    /// items count as material.
    pub default_bucket: CostBucket,
}

impl Default for CostBucketConfig {
    fn default() -> Self {
        Self {
            labor_keywords: strings(&["labor", "pekerja", "upah"]),
            material_keywords: strings(&["material", "bahan"]),
            default_bucket: CostBucket::Material,
        }
    }
}

/// Configuration for BOQ spreadsheet conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoqConfig {
    /// Maximum number of leading rows searched for the header (default: 10)
    pub header_scan_rows: usize,

    /// A row whose joined lowercase text contains any of these is the header
    pub header_markers: Vec<String>,

    pub column_synonyms: ColumnSynonyms,

    /// Minimum length a first-row string needs to be taken as the
    /// description column when no header names it (default: 3, exclusive)
    pub description_min_chars: usize,

    pub number_locale: NumberLocale,

    /// Stripped from numeric text before parsing (case-insensitive)
    pub currency_symbols: Vec<String>,

    pub cost_buckets: CostBucketConfig,

    /// Cells above the header starting with one of these carry the project name
    pub project_name_markers: Vec<String>,
}

impl Default for BoqConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: 10,
            header_markers: strings(&["no", "description", "unit", "deskripsi", "uraian", "qty"]),
            column_synonyms: ColumnSynonyms::default(),
            description_min_chars: 3,
            number_locale: NumberLocale::Auto,
            currency_symbols: strings(&["Rp", "$", "€", "£"]),
            cost_buckets: CostBucketConfig::default(),
            project_name_markers: strings(&[
                "nama proyek",
                "proyek",
                "project",
                "pekerjaan",
                "kegiatan",
            ]),
        }
    }
}

impl BoqConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.header_scan_rows == 0 {
            return Err("header_scan_rows must be > 0".to_string());
        }
        if self.header_markers.iter().all(|m| m.trim().is_empty()) {
            return Err("header_markers must contain at least one marker".to_string());
        }
        if self.column_synonyms.description.is_empty() {
            return Err("column_synonyms.description must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(BoqConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_scan_rows_rejected() {
        let config = BoqConfig {
            header_scan_rows: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_locale_from_lowercase_name() {
        let locale: NumberLocale = serde_json::from_str("\"indonesian\"").unwrap();
        assert_eq!(locale, NumberLocale::Indonesian);
    }
}
