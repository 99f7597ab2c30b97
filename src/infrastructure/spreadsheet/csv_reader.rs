// ============================================================
// CSV SHEET READER
// ============================================================
// Delimiter sniffing + decoding; every field becomes a text cell

use csv::{ReaderBuilder, Trim};

use crate::domain::boq::{CellValue, SheetRows};
use crate::domain::error::Result;
use crate::infrastructure::text_decoding::decode_text;

pub fn read_csv_bytes(bytes: &[u8]) -> Result<SheetRows> {
    let decoded = decode_text(bytes);
    let delimiter = detect_delimiter(&decoded.text);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(decoded.text.as_bytes());

    let mut rows: SheetRows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::from(field)
                    }
                })
                .collect(),
        );
    }

    tracing::debug!(
        rows = rows.len(),
        delimiter = %(delimiter as char),
        encoding = decoded.encoding,
        "Read CSV sheet"
    );
    Ok(rows)
}

/// Pick the candidate that splits the first lines most often and most consistently
pub fn detect_delimiter(content: &str) -> u8 {
    let candidates = [b',', b';', b'\t', b'|'];
    let sample_lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(10)
        .collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    for &delimiter in &candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        let avg = counts.iter().sum::<usize>() as f32 / counts.len() as f32;
        let variance = counts
            .iter()
            .map(|&x| (x as f32 - avg).powi(2))
            .sum::<f32>()
            / counts.len() as f32;

        let score = avg / (1.0 + variance.sqrt());
        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}
