// ============================================================
// WORKBOOK SHEET READER
// ============================================================
// xlsx / xls / xlsm / ods through calamine

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::domain::boq::{CellValue, SheetRows};
use crate::domain::error::{AppError, Result};

/// Read one worksheet: the named one, or the first
pub fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<SheetRows> {
    let mut workbook = open_workbook_auto(path)?;

    let range = match sheet {
        Some(name) => workbook.worksheet_range(name)?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::ParseError("workbook has no worksheets".to_string()))??,
    };

    let rows = range_to_rows(&range);
    tracing::debug!(
        path = %path.display(),
        sheet = sheet.unwrap_or("<first>"),
        rows = rows.len(),
        "Read workbook sheet"
    );
    Ok(rows)
}

pub fn range_to_rows(range: &Range<Data>) -> SheetRows {
    range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect()
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::from(*i),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}
