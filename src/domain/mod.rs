pub mod app_config;
pub mod error;

pub mod boq;
pub mod kml;
pub mod soil;
