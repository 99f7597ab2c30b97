use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::domain::app_config::AppConfig;
use crate::domain::error::Result;
use crate::infrastructure::config::ConfigService;

use super::commands::{import_boq_file, import_kml_file};

#[derive(Parser)]
#[command(name = "survey-import")]
#[command(about = "Convert survey KML/KMZ and BOQ spreadsheets to JSON")]
#[command(version)]
pub struct Cli {
    /// TOML file overriding the built-in configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// KML or KMZ survey file -> GeoJSON-like feature collection
    Kml { file: PathBuf },

    /// BOQ spreadsheet (xlsx, xls, xlsm, ods, csv) -> items and cost summary
    Boq {
        file: PathBuf,

        /// Worksheet name (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match execute(&cli) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "survey-import failed");
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<String> {
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Command::Kml { file } => to_json(&import_kml_file(file, &config)?, cli.pretty),
        Command::Boq { file, sheet } => {
            to_json(&import_boq_file(file, sheet.as_deref(), &config)?, cli.pretty)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => ConfigService::with_file(path).load(),
        None => ConfigService::new().load(),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    Ok(json?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_boq_with_sheet_and_config() {
        let cli = Cli::try_parse_from([
            "survey-import",
            "boq",
            "rab.xlsx",
            "--sheet",
            "RAB",
            "--config",
            "survey.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("survey.toml")));
        let Command::Boq { file, sheet } = cli.command else {
            panic!("expected the boq subcommand");
        };
        assert_eq!(file, PathBuf::from("rab.xlsx"));
        assert_eq!(sheet.as_deref(), Some("RAB"));
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["survey-import", "shp", "a.shp"]).is_err());
    }
}
