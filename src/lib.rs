pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use application::{BoqConverter, KmlConverter};
pub use domain::app_config::AppConfig;
pub use domain::error::{AppError, Result};
pub use interfaces::cli::run;
pub use interfaces::commands::{import_boq_file, import_kml_file, BoqImport, KmlImport};
