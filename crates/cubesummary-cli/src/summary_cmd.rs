use std::process::ExitCode;

use cubesummary_core::config::Settings;
use cubesummary_core::{MemoryIndex, Period, PeriodSummary, SummaryStore};
use tracing::info;

use crate::cli::SummaryArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{print_json, resolve_summary_path, resolve_tz};

pub fn run_summary(
    args: SummaryArgs,
    settings: &Settings,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let period = Period::new(args.year, args.month, args.day)?;
    let path = resolve_summary_path(args.summaries.as_deref(), settings);

    // Summaries are read without their datasets.
    let store = match args.tz.as_deref() {
        Some(_) => {
            let tz = resolve_tz(args.tz.as_deref(), settings)?;
            SummaryStore::load(MemoryIndex::new(), &path, &tz.to_string())
        }
        None => SummaryStore::open(MemoryIndex::new(), &path),
    }
    .map_err(|e| match e {
        cubesummary_core::SummaryError::Io(io) => CliError::runtime(format!(
            "Failed to read summaries from '{}': {}",
            path.display(),
            io
        )),
        other => other.into(),
    })?;

    if args.tz.is_none() && store.grouping_time_zone().name() != settings.grouping_time_zone {
        info!(
            file = %store.grouping_time_zone(),
            configured = %settings.grouping_time_zone,
            "using the summary file's timezone"
        );
    }

    let summary = store.get_period(&args.product, period);

    match output_format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => match summary {
            Some(summary) => print_summary(summary),
            None => println!(
                "{} {}: no datasets ({})",
                args.product,
                period,
                store.grouping_time_zone()
            ),
        },
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn print_summary(summary: &PeriodSummary) {
    println!(
        "{} {}: {} datasets ({})",
        summary.product, summary.period, summary.dataset_count, summary.grouping_time_zone
    );
    for (key, count) in summary.timeline.iter().filter(|(_, count)| **count > 0) {
        println!("  {}: {}", key, count);
    }
}
