// ============================================================
// KML DOMAIN LAYER
// ============================================================
// Feature value objects produced from survey KML exports
// No I/O, no XML handling

mod coordinate;
mod feature;
mod kml_config;
mod style;

pub use coordinate::{Coordinate, Geometry, GeometryKind, Segment};
pub use feature::{Feature, FeatureCollection, FeatureProperties, FeatureStatistics, KmlDiagnostics};
pub use kml_config::KmlConfig;
pub use style::{Rgba, Style};
