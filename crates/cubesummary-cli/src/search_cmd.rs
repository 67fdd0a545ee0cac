use std::process::ExitCode;

use cubesummary_core::config::Settings;
use cubesummary_core::display::{period_rows, search_rows};
use cubesummary_core::parse::parse_bound;
use cubesummary_core::{DatasetQuery, Period, TimeRange};

use crate::cli::{DatasetsArgs, SearchArgs};
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{load_index, print_rows, resolve_tz};

pub fn run_search(
    args: SearchArgs,
    settings: &Settings,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let tz = resolve_tz(args.tz.as_deref(), settings)?;

    let begin = parse_bound(&args.begin, tz)
        .map_err(|e| CliError::input(format!("Invalid begin: {}", e)))?;
    let end =
        parse_bound(&args.end, tz).map_err(|e| CliError::input(format!("Invalid end: {}", e)))?;
    let range = TimeRange::new(begin, end)?;

    let mut builder = DatasetQuery::builder(args.product.as_str()).time(range);
    if let Some(limit) = args.limit {
        builder = builder.limit(limit);
    }
    let query = builder.build()?;

    let (index, _) = load_index(&args.datasets)?;
    print_rows(&search_rows(&index, &query, tz), output_format)?;

    Ok(ExitCode::from(EXIT_SUCCESS))
}

pub fn run_datasets(
    args: DatasetsArgs,
    settings: &Settings,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let tz = resolve_tz(args.tz.as_deref(), settings)?;
    let period = Period::new(Some(args.year), args.month, args.day)?;

    let (index, _) = load_index(&args.datasets)?;
    let rows = period_rows(&index, &args.product, period, tz, args.limit)?;
    print_rows(&rows, output_format)?;

    Ok(ExitCode::from(EXIT_SUCCESS))
}
