// ============================================================
// BOQ DOMAIN LAYER
// ============================================================
// Core types and value objects for bill-of-quantities ingestion
// No I/O, no spreadsheet decoding

mod boq_config;
mod boq_item;
mod cell_value;

pub use boq_config::{BoqConfig, ColumnSynonyms, CostBucketConfig, NumberLocale};
pub use boq_item::{BoqData, BoqDiagnostics, BoqItem, BoqSummary, ColumnMap, CostBucket};
pub use cell_value::CellValue;

/// One decoded sheet: rows of primitive cells, possibly ragged
pub type SheetRows = Vec<Vec<CellValue>>;
