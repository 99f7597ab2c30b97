// ============================================================
// IMPORT COMMANDS
// ============================================================
// File path in, converted document out: guard -> read -> convert

use std::path::Path;

use serde::Serialize;
use tracing::{error, info};

use crate::application::{BoqConverter, KmlConverter};
use crate::domain::app_config::AppConfig;
use crate::domain::boq::{BoqData, BoqDiagnostics};
use crate::domain::error::{AppError, Result};
use crate::domain::kml::{FeatureCollection, FeatureStatistics, KmlDiagnostics};
use crate::infrastructure::file_guard::FileGuard;
use crate::infrastructure::kml_reader::read_kml_file;
use crate::infrastructure::spreadsheet::read_sheet;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KmlImport {
    pub features: FeatureCollection,
    pub statistics: FeatureStatistics,
    pub diagnostics: KmlDiagnostics,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoqImport {
    pub boq: BoqData,
    pub diagnostics: BoqDiagnostics,
}

pub fn import_kml_file(path: &Path, config: &AppConfig) -> Result<KmlImport> {
    let extension = FileGuard::new(&config.limits).check(path)?;
    if extension != "kml" && extension != "kmz" {
        return Err(AppError::UnsupportedFile(format!(
            "expected a .kml or .kmz file, got .{}",
            extension
        )));
    }

    let text = read_kml_file(path)?;
    let converter = KmlConverter::new(config.kml.clone(), config.soil.clone());
    let (features, diagnostics) = converter.convert_with_diagnostics(&text).map_err(|err| {
        error!(path = %path.display(), error = %err, "KML import failed");
        err
    })?;

    let statistics = features.statistics();
    info!(
        path = %path.display(),
        features = features.len(),
        lines = statistics.line_count,
        total_line_length = statistics.total_line_length,
        "KML import complete"
    );

    Ok(KmlImport {
        features,
        statistics,
        diagnostics,
    })
}

pub fn import_boq_file(path: &Path, sheet: Option<&str>, config: &AppConfig) -> Result<BoqImport> {
    FileGuard::new(&config.limits).check(path)?;

    let rows = read_sheet(path, sheet)?;
    let converter = BoqConverter::new(config.boq.clone());
    let (boq, diagnostics) = converter.convert_with_diagnostics(&rows).map_err(|err| {
        error!(path = %path.display(), error = %err, "BOQ import failed");
        err
    })?;

    info!(
        path = %path.display(),
        items = boq.summary.total_items,
        total_cost = boq.summary.total_cost,
        "BOQ import complete"
    );

    Ok(BoqImport { boq, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kml::GeometryKind;
    use std::io::Write;

    fn temp_with(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark>
      <name>Jalur Pasir</name>
      <LineString>
        <coordinates>106.80,-6.20,0 106.81,-6.20,0 106.81,-6.21,0</coordinates>
      </LineString>
    </Placemark>
    <Placemark>
      <name>Titik Bor</name>
      <Point><coordinates>106.80,-6.20</coordinates></Point>
    </Placemark>
  </Document>
</kml>"#;

    #[test]
    fn test_import_kml_file() {
        let file = temp_with(".kml", KML);
        let import = import_kml_file(file.path(), &AppConfig::default()).unwrap();

        assert_eq!(import.features.len(), 2);
        assert_eq!(import.features.features[0].kind(), GeometryKind::LineString);
        assert_eq!(import.statistics.line_count, 1);
        assert_eq!(import.statistics.point_count, 1);
        assert!(import.statistics.total_line_length > 0.0);
        assert_eq!(import.diagnostics.placemarks_seen, 2);
    }

    #[test]
    fn test_kml_command_rejects_spreadsheets() {
        let file = temp_with(".csv", "No,Uraian\n1,Galian\n");
        let err = import_kml_file(file.path(), &AppConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFile(_)));
    }

    #[test]
    fn test_import_boq_csv() {
        let file = temp_with(
            ".csv",
            concat!(
                "Proyek;Jalan Desa Sukamaju\n",
                "No;Uraian;Satuan;Volume;Harga Satuan\n",
                "1;Galian tanah;m3;10;Rp 50.000\n",
                "2;Upah pekerja;OH;2;Rp 150.000\n",
            ),
        );
        let import = import_boq_file(file.path(), None, &AppConfig::default()).unwrap();

        assert_eq!(import.boq.project_name.as_deref(), Some("Jalan Desa Sukamaju"));
        assert_eq!(import.boq.items.len(), 2);
        assert_eq!(import.boq.summary.total_cost, 800_000.0);
        assert_eq!(import.boq.summary.labor_cost, 300_000.0);
        assert_eq!(import.diagnostics.header_row_index, 1);
    }

    #[test]
    fn test_boq_single_row_is_empty_input() {
        let file = temp_with(".csv", "No,Uraian,Qty\n");
        let err = import_boq_file(file.path(), None, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::EmptyInput(_)));
    }

    #[test]
    fn test_boq_rejects_kml() {
        let file = temp_with(".kml", KML);
        let err = import_boq_file(file.path(), None, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFile(_)));
    }

    #[test]
    fn test_output_json_uses_camel_case() {
        let file = temp_with(".csv", "No,Uraian,Qty,Harga\n1,Galian tanah,2,100\n");
        let import = import_boq_file(file.path(), None, &AppConfig::default()).unwrap();
        let json = serde_json::to_value(&import).unwrap();

        assert_eq!(json["boq"]["summary"]["totalCost"], 200.0);
        assert_eq!(json["boq"]["items"][0]["unitPrice"], 100.0);
        assert_eq!(json["boq"]["items"][0]["costBucket"], "material");
        assert_eq!(json["diagnostics"]["headerRowIndex"], 0);
    }
}
