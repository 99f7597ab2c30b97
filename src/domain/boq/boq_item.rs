// ============================================================
// BILL OF QUANTITIES TYPES
// ============================================================
// Items, summary and per-call diagnostics of a BOQ conversion

use serde::{Deserialize, Serialize};

/// Cost partition used by the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostBucket {
    Material,
    Labor,
}

impl std::fmt::Display for CostBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostBucket::Material => write!(f, "material"),
            CostBucket::Labor => write!(f, "labor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoqItem {
    pub no: u32,
    pub description: String,
    pub unit: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub cost_bucket: CostBucket,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoqSummary {
    pub total_items: usize,
    pub total_cost: f64,
    pub material_cost: f64,
    pub labor_cost: f64,
}

impl BoqSummary {
    pub fn from_items(items: &[BoqItem]) -> Self {
        items.iter().fold(
            Self {
                total_items: items.len(),
                ..Self::default()
            },
            |mut acc, item| {
                acc.total_cost += item.total_price;
                match item.cost_bucket {
                    CostBucket::Material => acc.material_cost += item.total_price,
                    CostBucket::Labor => acc.labor_cost += item.total_price,
                }
                acc
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoqData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub items: Vec<BoqItem>,
    pub summary: BoqSummary,
}

/// Column index per canonical BOQ field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMap {
    pub no: Option<usize>,
    pub description: Option<usize>,
    pub unit: Option<usize>,
    pub quantity: Option<usize>,
    pub unit_price: Option<usize>,
    pub total_price: Option<usize>,
    pub category: Option<usize>,
}

/// What the converter skipped or inferred for one sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoqDiagnostics {
    pub header_row_index: usize,
    /// False when no row matched and row 0 was used
    pub header_detected: bool,
    pub columns: ColumnMap,
    pub data_rows_seen: usize,
    pub skipped_empty_rows: usize,
    pub skipped_blank_description: usize,
    /// Numeric cells that were non-blank but did not parse
    pub unparsed_numeric_cells: usize,
}
