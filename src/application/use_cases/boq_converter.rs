// ============================================================
// BOQ CONVERTER USE CASE
// ============================================================
// Orchestrate schema detection and row parsing into BOQ items
// and an aggregated cost summary

use super::boq_schema::{detect_project_name, detect_schema};
use super::numeric_cell::{NumericCellParser, ParsedCell};
use crate::domain::boq::{
    BoqConfig, BoqData, BoqDiagnostics, BoqItem, BoqSummary, CellValue, CostBucket,
};
use crate::domain::error::{AppError, Result};

/// Spreadsheet rows -> BoqData conversion use case
pub struct BoqConverter {
    config: BoqConfig,
    numbers: NumericCellParser,
}

impl BoqConverter {
    pub fn new(config: BoqConfig) -> Self {
        let numbers = NumericCellParser::from_config(&config);
        Self { config, numbers }
    }

    pub fn convert(&self, rows: &[Vec<CellValue>]) -> Result<BoqData> {
        self.convert_with_diagnostics(rows).map(|(data, _)| data)
    }

    pub fn convert_with_diagnostics(
        &self,
        rows: &[Vec<CellValue>],
    ) -> Result<(BoqData, BoqDiagnostics)> {
        if rows.len() < 2 {
            return Err(AppError::EmptyInput(format!(
                "sheet has {} row(s), a header and at least one data row are required",
                rows.len()
            )));
        }

        let schema = detect_schema(rows, &self.config);
        let columns = schema.columns;
        let project_name = detect_project_name(
            &rows[..schema.header_row_index],
            &self.config.project_name_markers,
        );

        let mut diagnostics = BoqDiagnostics {
            header_row_index: schema.header_row_index,
            header_detected: schema.header_detected,
            columns,
            ..BoqDiagnostics::default()
        };
        let mut items: Vec<BoqItem> = Vec::new();

        for row in &rows[schema.header_row_index + 1..] {
            diagnostics.data_rows_seen += 1;

            if row.iter().all(CellValue::is_falsy) {
                diagnostics.skipped_empty_rows += 1;
                continue;
            }

            let cell = move |idx: Option<usize>| idx.and_then(|i| row.get(i));
            let text = |idx: Option<usize>| {
                cell(idx)
                    .map(CellValue::display_text)
                    .unwrap_or_default()
            };

            let description = text(columns.description);
            if description.is_empty() {
                diagnostics.skipped_blank_description += 1;
                continue;
            }

            let mut number = |idx: Option<usize>| {
                match cell(idx).map(|c| self.numbers.parse_cell(c)) {
                    Some(ParsedCell::Unparseable) => {
                        diagnostics.unparsed_numeric_cells += 1;
                        0.0
                    }
                    Some(parsed) => parsed.value(),
                    None => 0.0,
                }
            };

            let quantity = number(columns.quantity).max(0.0);
            let unit_price = number(columns.unit_price).max(0.0);
            let total_price = match cell(columns.total_price).filter(|c| !c.is_blank()) {
                Some(_) => number(columns.total_price).max(0.0),
                None => quantity * unit_price,
            };

            let no = cell(columns.no)
                .and_then(item_number)
                .unwrap_or(items.len() as u32 + 1);
            let category = Some(text(columns.category)).filter(|c| !c.is_empty());
            let cost_bucket = self.cost_bucket(&description);

            items.push(BoqItem {
                no,
                description,
                unit: text(columns.unit),
                quantity,
                unit_price,
                total_price,
                category,
                cost_bucket,
            });
        }

        if items.is_empty() {
            tracing::warn!(
                data_rows = diagnostics.data_rows_seen,
                blank_descriptions = diagnostics.skipped_blank_description,
                "BOQ sheet produced no items"
            );
            return Err(AppError::NoValidItems(format!(
                "none of the {} data row(s) below header row {} has a description",
                diagnostics.data_rows_seen,
                schema.header_row_index + 1
            )));
        }

        let summary = BoqSummary::from_items(&items);
        tracing::info!(
            items = summary.total_items,
            total_cost = summary.total_cost,
            skipped_empty = diagnostics.skipped_empty_rows,
            skipped_blank_description = diagnostics.skipped_blank_description,
            "BOQ conversion complete"
        );

        Ok((
            BoqData {
                project_name,
                items,
                summary,
            },
            diagnostics,
        ))
    }

    /// Labor keywords win over material ones; no match uses the default bucket
    pub fn cost_bucket(&self, description: &str) -> CostBucket {
        let lower = description.to_lowercase();
        let buckets = &self.config.cost_buckets;
        let hit = |keywords: &[String]| {
            keywords
                .iter()
                .any(|k| lower.contains(&k.to_lowercase()))
        };

        if hit(&buckets.labor_keywords) {
            CostBucket::Labor
        } else if hit(&buckets.material_keywords) {
            CostBucket::Material
        } else {
            buckets.default_bucket
        }
    }
}

impl Default for BoqConverter {
    fn default() -> Self {
        Self::new(BoqConfig::default())
    }
}

/// Non-negative numeric item number, e.g. `3`, `"3"` or `"3."`
fn item_number(cell: &CellValue) -> Option<u32> {
    let n = match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s.trim().trim_end_matches('.').parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then(|| n.trunc() as u32)
}
