use std::path::PathBuf;

use chrono_tz::Tz;
use cubesummary_core::config::Settings;
use cubesummary_core::display::SearchRow;
use cubesummary_core::{IngestReport, MemoryIndex, ingest_path};
use serde::Serialize;
use tracing::debug;

use crate::error::{CliError, CliResult, OutputFormat};

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "CUBESUMMARY_CONFIG";

/// Settings from `--config`, then `$CUBESUMMARY_CONFIG`, then defaults.
pub fn load_settings(config: Option<&str>) -> CliResult<Settings> {
    let path = config
        .map(str::to_string)
        .or_else(|| std::env::var(CONFIG_ENV).ok().filter(|p| !p.is_empty()));

    match path {
        Some(path) => Settings::load(&path)
            .map_err(|e| CliError::input(format!("Invalid config '{}': {}", path, e))),
        None => Ok(Settings::default()),
    }
}

/// Reporting timezone: command-line flag first, then settings.
pub fn resolve_tz(flag: Option<&str>, settings: &Settings) -> CliResult<Tz> {
    let name = flag.unwrap_or(&settings.grouping_time_zone);
    cubesummary_core::tz::parse_tz(name)
        .map_err(|e| CliError::input(format!("Invalid timezone '{}': {}", name, e)))
}

pub fn resolve_summary_path(flag: Option<&str>, settings: &Settings) -> PathBuf {
    flag.map(PathBuf::from)
        .unwrap_or_else(|| settings.summary_path.clone())
}

pub fn load_index(path: &str) -> CliResult<(MemoryIndex, IngestReport)> {
    let mut index = MemoryIndex::new();
    let report = ingest_path(path, &mut index)
        .map_err(|e| CliError::runtime(format!("Failed to load datasets: {}", e)))?;
    debug!(path, added = report.added, "loaded dataset index");
    Ok((index, report))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

pub fn print_rows(rows: &[SearchRow], output_format: OutputFormat) -> CliResult<()> {
    match output_format {
        OutputFormat::Json => print_json(rows)?,
        OutputFormat::Text => {
            for row in rows {
                println!(
                    "{}  {}  {}",
                    row.center_time.local, row.center_time.utc_label, row.id
                );
            }
        }
    }
    Ok(())
}
