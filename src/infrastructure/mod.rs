pub mod config;
pub mod file_guard;
pub mod kml_reader;
pub mod spreadsheet;
pub mod text_decoding;
