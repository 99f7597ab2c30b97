mod csv_reader;
mod xlsx_reader;

pub use csv_reader::{detect_delimiter, read_csv_bytes};
pub use xlsx_reader::{range_to_rows, read_workbook};

use std::path::Path;

use crate::domain::boq::SheetRows;
use crate::domain::error::{AppError, Result};

/// Decode a spreadsheet file into rows of primitive cells, by extension
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<SheetRows> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv_bytes(&std::fs::read(path)?),
        "xlsx" | "xls" | "xlsm" | "ods" => read_workbook(path, sheet),
        other => Err(AppError::UnsupportedFile(format!(
            "'{}' is not a spreadsheet extension",
            other
        ))),
    }
}
