// ============================================================
// KML / KMZ READER
// ============================================================
// Produce KML text for the converter. KMZ is a zip holding doc.kml
// (or some other .kml entry) next to icons and overlays.

use std::io::{Read, Seek};
use std::path::Path;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::text_decoding::decode_text;

pub fn read_kml_file(path: &Path) -> Result<String> {
    let is_kmz = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("kmz"));

    if is_kmz {
        let file = std::fs::File::open(path)?;
        read_kmz(file)
    } else {
        Ok(decode_text(&std::fs::read(path)?).text)
    }
}

/// Extract the KML document from a KMZ archive.
/// `doc.kml` wins; otherwise the first entry with a `.kml` extension.
pub fn read_kmz<R: Read + Seek>(reader: R) -> Result<String> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let mut first_kml = None;
    let mut doc_kml = None;
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        if name.ends_with('/') {
            continue;
        }

        let file_name = Path::new(&name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if file_name == "doc.kml" && doc_kml.is_none() {
            doc_kml = Some(i);
        }
        if first_kml.is_none() && file_name.ends_with(".kml") {
            first_kml = Some(i);
        }
    }

    let entries = archive.len();
    let index = doc_kml
        .or(first_kml)
        .ok_or_else(|| AppError::ParseError("No KML document found in KMZ archive".to_string()))?;

    let mut entry = archive.by_index(index)?;
    tracing::debug!(entry = entry.name(), entries, "Reading KML from KMZ");

    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(decode_text(&bytes).text)
}
