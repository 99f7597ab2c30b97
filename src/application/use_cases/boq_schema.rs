// Header-row and column detection for ad-hoc BOQ spreadsheets.
//
// Matching strategy:
//   1) header row = first of the leading rows whose joined lowercase text
//      contains a header marker; row 0 when none does
//   2) fields claim columns in priority order (description, total price,
//      unit price, quantity, unit, no, category); each takes the first
//      unclaimed header cell containing one of its synonyms
//   3) description falls back to the first long text value in the first
//      data row (column >= 1), then to column 1 when there are >= 3 columns

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::boq::{BoqConfig, CellValue, ColumnMap, ColumnSynonyms};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Result of schema detection on one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSchema {
    pub header_row_index: usize,
    pub header_detected: bool,
    pub columns: ColumnMap,
    /// Widest row in the sheet
    pub column_count: usize,
}

pub fn normalize_header(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").to_lowercase()
}

/// Index of the header row, and whether a marker actually matched
pub fn find_header_row(rows: &[Vec<CellValue>], config: &BoqConfig) -> (usize, bool) {
    let markers: Vec<String> = config
        .header_markers
        .iter()
        .map(|m| m.to_lowercase())
        .filter(|m| !m.is_empty())
        .collect();

    rows.iter()
        .take(config.header_scan_rows)
        .position(|row| {
            let joined = row
                .iter()
                .map(CellValue::display_text)
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            markers.iter().any(|m| joined.contains(m.as_str()))
        })
        .map_or((0, false), |idx| (idx, true))
}

fn first_matching(header: &[String], synonyms: &[String], claimed: &[bool]) -> Option<usize> {
    let synonyms: Vec<String> = synonyms.iter().map(|s| s.to_lowercase()).collect();
    header.iter().enumerate().position(|(idx, cell)| {
        if claimed[idx] {
            return false;
        }
        let cell = normalize_header(cell);
        synonyms.iter().any(|s| cell.contains(s.as_str()))
    })
}

/// Pure header -> column-index mapping. No data-row fallbacks.
/// A column claimed by an earlier field is skipped by the later ones.
pub fn map_columns(header: &[String], synonyms: &ColumnSynonyms) -> ColumnMap {
    let mut claimed = vec![false; header.len()];
    let mut claim = |list: &[String]| {
        let idx = first_matching(header, list, &claimed)?;
        claimed[idx] = true;
        Some(idx)
    };

    let description = claim(&synonyms.description);
    let total_price = claim(&synonyms.total_price);
    let unit_price = claim(&synonyms.unit_price);
    let quantity = claim(&synonyms.quantity);
    let unit = claim(&synonyms.unit);
    let no = claim(&synonyms.no);
    let category = claim(&synonyms.category);

    ColumnMap {
        no,
        description,
        unit,
        quantity,
        unit_price,
        total_price,
        category,
    }
}

/// Resolve an unnamed description column. The order of the two fallbacks
/// decides which column an ambiguous sheet treats as description.
pub fn resolve_description_fallback(
    columns: &mut ColumnMap,
    first_data_row: Option<&[CellValue]>,
    column_count: usize,
    min_chars: usize,
) {
    if columns.description.is_some() {
        return;
    }

    columns.description = first_data_row.and_then(|row| {
        row.iter()
            .enumerate()
            .skip(1)
            .find(|(_, cell)| {
                cell.as_text()
                    .map_or(false, |s| s.trim().chars().count() > min_chars)
            })
            .map(|(idx, _)| idx)
    });

    if columns.description.is_none() && column_count >= 3 {
        columns.description = Some(1);
    }
}

pub fn detect_schema(rows: &[Vec<CellValue>], config: &BoqConfig) -> SheetSchema {
    let (header_row_index, header_detected) = find_header_row(rows, config);
    let header: Vec<String> = rows
        .get(header_row_index)
        .map(|row| row.iter().map(CellValue::display_text).collect())
        .unwrap_or_default();
    let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);

    let mut columns = map_columns(&header, &config.column_synonyms);
    resolve_description_fallback(
        &mut columns,
        rows.get(header_row_index + 1).map(Vec::as_slice),
        column_count,
        config.description_min_chars,
    );

    tracing::debug!(
        header_row_index,
        header_detected,
        columns = ?columns,
        "Detected BOQ sheet schema"
    );

    SheetSchema {
        header_row_index,
        header_detected,
        columns,
        column_count,
    }
}

/// Project name from title rows above the header, e.g. `Proyek: Jalan Desa`
pub fn detect_project_name(title_rows: &[Vec<CellValue>], markers: &[String]) -> Option<String> {
    let markers: Vec<String> = markers.iter().map(|m| m.to_lowercase()).collect();

    for row in title_rows {
        let texts: Vec<String> = row.iter().map(CellValue::display_text).collect();
        for (idx, text) in texts.iter().enumerate() {
            let lower = text.to_lowercase();
            if !markers.iter().any(|m| lower.starts_with(m.as_str())) {
                continue;
            }

            let inline = text
                .split_once(':')
                .map(|(_, rest)| rest.trim().to_string())
                .filter(|rest| !rest.is_empty());
            let next_cell = || {
                texts[idx + 1..]
                    .iter()
                    .map(|t| t.trim_start_matches(':').trim())
                    .find(|t| !t.is_empty())
                    .map(str::to_string)
            };

            if let Some(name) = inline.or_else(next_cell) {
                return Some(name);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells
            .iter()
            .map(|c| {
                if c.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::from(*c)
                }
            })
            .collect()
    }

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_header_found_after_title_rows() {
        let rows = vec![
            row(&["Rencana Anggaran Biaya", "", "", ""]),
            row(&["Proyek: Jaringan Air Bersih", "", "", ""]),
            row(&["No", "Uraian", "Satuan", "Qty"]),
            row(&["1", "Galian tanah", "m3", "10"]),
        ];
        let (idx, detected) = find_header_row(&rows, &BoqConfig::default());
        assert_eq!(idx, 2);
        assert!(detected);
    }

    #[test]
    fn test_header_defaults_to_first_row() {
        let rows = vec![row(&["Item A", "5"]), row(&["Item B", "6"])];
        assert_eq!(find_header_row(&rows, &BoqConfig::default()), (0, false));
    }

    #[test]
    fn test_header_scan_is_bounded() {
        let config = BoqConfig {
            header_scan_rows: 2,
            ..BoqConfig::default()
        };
        let rows = vec![row(&["Laporan"]), row(&["Lampiran"]), row(&["No", "Uraian"])];
        assert_eq!(find_header_row(&rows, &config), (0, false));
    }

    #[test]
    fn test_map_indonesian_header() {
        let columns = map_columns(
            &header(&[
                "No.",
                "Uraian Pekerjaan",
                "Satuan",
                "Volume",
                "Harga Satuan (Rp)",
                "Jumlah Harga",
                "Kategori",
            ]),
            &ColumnSynonyms::default(),
        );
        assert_eq!(columns.no, Some(0));
        assert_eq!(columns.description, Some(1));
        assert_eq!(columns.unit, Some(2));
        assert_eq!(columns.quantity, Some(3));
        assert_eq!(columns.unit_price, Some(4));
        assert_eq!(columns.total_price, Some(5));
        assert_eq!(columns.category, Some(6));
    }

    #[test]
    fn test_map_english_header() {
        let columns = map_columns(
            &header(&["#", "Description", "Unit", "Qty", "Unit Price", "Total"]),
            &ColumnSynonyms::default(),
        );
        assert_eq!(columns.no, Some(0));
        assert_eq!(columns.description, Some(1));
        assert_eq!(columns.unit, Some(2));
        assert_eq!(columns.quantity, Some(3));
        assert_eq!(columns.unit_price, Some(4));
        assert_eq!(columns.total_price, Some(5));
        assert_eq!(columns.category, None);
    }

    #[test]
    fn test_map_item_numbered_english_header() {
        let columns = map_columns(
            &header(&["Item", "Description", "Unit", "Qty", "Rate", "Amount"]),
            &ColumnSynonyms::default(),
        );
        assert_eq!(columns.no, Some(0));
        assert_eq!(columns.description, Some(1));
        assert_eq!(columns.unit, Some(2));
        assert_eq!(columns.quantity, Some(3));
        assert_eq!(columns.unit_price, Some(4));
        assert_eq!(columns.total_price, Some(5));
    }

    #[test]
    fn test_item_pekerjaan_is_description() {
        let columns = map_columns(
            &header(&["No", "Item Pekerjaan", "Sat", "Vol"]),
            &ColumnSynonyms::default(),
        );
        assert_eq!(columns.no, Some(0));
        assert_eq!(columns.description, Some(1));
    }

    #[test]
    fn test_column_is_claimed_once() {
        let columns = map_columns(
            &header(&[
                "No",
                "Jenis Pekerjaan",
                "Satuan",
                "Volume",
                "Harga Satuan",
                "Jumlah Harga",
            ]),
            &ColumnSynonyms::default(),
        );
        assert_eq!(columns.description, Some(1));
        assert_eq!(columns.category, None);
        assert_eq!(columns.unit, Some(2));
        assert_eq!(columns.unit_price, Some(4));
        assert_eq!(columns.total_price, Some(5));
    }

    #[test]
    fn test_total_column_left_of_unit_price() {
        let columns = map_columns(
            &header(&["No", "Uraian", "Qty", "Jumlah Harga", "Harga Satuan"]),
            &ColumnSynonyms::default(),
        );
        assert_eq!(columns.total_price, Some(3));
        assert_eq!(columns.unit_price, Some(4));
    }

    #[test]
    fn test_description_fallback_prefers_long_text() {
        let mut columns = map_columns(
            &header(&["No", "Kode", "Keterangan Lain", "Qty"]),
            &ColumnSynonyms::default(),
        );
        assert_eq!(columns.description, None);

        let data = row(&["1", "A1", "Pemasangan pipa HDPE", "4"]);
        resolve_description_fallback(&mut columns, Some(&data), 4, 3);
        assert_eq!(columns.description, Some(2));
    }

    #[test]
    fn test_description_fallback_to_column_one() {
        let mut columns = ColumnMap::default();
        let data = vec![CellValue::from(1.0), CellValue::from("ab"), CellValue::from(5.0)];
        resolve_description_fallback(&mut columns, Some(&data), 3, 3);
        assert_eq!(columns.description, Some(1));

        let mut narrow = ColumnMap::default();
        resolve_description_fallback(&mut narrow, Some(&data[..2]), 2, 3);
        assert_eq!(narrow.description, None);
    }

    #[test]
    fn test_column_zero_never_used_by_text_fallback() {
        let mut columns = ColumnMap::default();
        let data = row(&["Long first column", "x", "y"]);
        resolve_description_fallback(&mut columns, Some(&data), 3, 3);
        assert_eq!(columns.description, Some(1));
    }

    #[test]
    fn test_project_name_inline_and_next_cell() {
        let markers = BoqConfig::default().project_name_markers;
        let inline = vec![row(&["RAB"]), row(&["Proyek : Jalan Desa Sukamaju", ""])];
        assert_eq!(
            detect_project_name(&inline, &markers).as_deref(),
            Some("Jalan Desa Sukamaju")
        );

        let split = vec![row(&["Nama Proyek", ":", "Drainase Blok C"])];
        assert_eq!(
            detect_project_name(&split, &markers).as_deref(),
            Some("Drainase Blok C")
        );

        assert_eq!(detect_project_name(&[row(&["Lampiran 1"])], &markers), None);
    }
}
