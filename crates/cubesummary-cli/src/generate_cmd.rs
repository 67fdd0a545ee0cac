use std::path::Path;
use std::process::ExitCode;

use cubesummary_core::config::Settings;
use cubesummary_core::{DatasetIndex, GenerateReport, IngestReport, SummaryStore};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::GenerateArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{load_index, print_json, resolve_summary_path, resolve_tz};

#[derive(Debug, Serialize)]
struct GenerateOutput {
    ingest: IngestReport,
    summary_path: String,
    products: Vec<GenerateReport>,
}

pub fn run_generate(
    args: GenerateArgs,
    settings: &Settings,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let tz = resolve_tz(args.tz.as_deref(), settings)?;
    let output = resolve_summary_path(args.output.as_deref(), settings);

    let (index, ingest) = load_index(&args.datasets)?;
    if let Some(max) = args.max_failures {
        if ingest.failures.len() > max {
            return Err(CliError::input(format!(
                "{} malformed dataset documents, at most {} allowed",
                ingest.failures.len(),
                max
            )));
        }
    }

    let products = match &args.product {
        Some(product) => {
            if !index.products().contains(product) {
                warn!(product = %product, "no datasets indexed for product");
            }
            // Other products already in the file keep their summaries.
            let mut store = if output.exists() {
                SummaryStore::load(&index, &output, &tz.to_string()).map_err(|e| {
                    CliError::input(format!(
                        "Cannot update '{}': {}",
                        output.display(),
                        e
                    ))
                })?
            } else {
                SummaryStore::create(&index, &tz.to_string())?
            };
            let report = store.generate(product)?;
            save(&store, &output)?;
            vec![report]
        }
        None => {
            let mut store = SummaryStore::create(&index, &tz.to_string())?;
            let reports = store.generate_all()?;
            save(&store, &output)?;
            reports
        }
    };

    match output_format {
        OutputFormat::Json => print_json(&GenerateOutput {
            ingest,
            summary_path: output.display().to_string(),
            products,
        })?,
        OutputFormat::Text => {
            println!(
                "Indexed {} datasets, skipped {} malformed",
                ingest.added,
                ingest.failures.len()
            );
            for report in &products {
                println!(
                    "{}: {} datasets, {} periods ({})",
                    report.product, report.dataset_count, report.periods, report.grouping_time_zone
                );
                for (year, count) in &report.years {
                    println!("  {}: {}", year, count);
                }
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn save<I: DatasetIndex>(store: &SummaryStore<I>, output: &Path) -> CliResult<()> {
    store.save(output).map_err(|e| {
        CliError::runtime(format!(
            "Failed to write summaries to '{}': {}",
            output.display(),
            e
        ))
    })?;
    info!(path = %output.display(), "summaries written");
    Ok(())
}
