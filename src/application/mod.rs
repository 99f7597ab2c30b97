pub mod use_cases;

pub use use_cases::boq_converter::BoqConverter;
pub use use_cases::boq_schema::{detect_schema, map_columns, SheetSchema};
pub use use_cases::kml_converter::KmlConverter;
pub use use_cases::kml_geometry::GeometryExtractor;
pub use use_cases::kml_style::StyleTable;
pub use use_cases::numeric_cell::{NumericCellParser, ParsedCell};
pub use use_cases::soil_classifier::{SoilClassification, SoilClassifier, SoilEvidence};
