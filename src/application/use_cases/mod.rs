pub mod boq_converter;
pub mod boq_schema;
pub mod kml_converter;
pub mod kml_geometry;
pub mod kml_style;
pub mod numeric_cell;
pub mod soil_classifier;
