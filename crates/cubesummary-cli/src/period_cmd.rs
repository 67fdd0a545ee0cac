use std::process::ExitCode;

use chrono_tz::Tz;
use cubesummary_core::config::Settings;
use cubesummary_core::tz::{format_rfc3339, format_rfc3339_utc};
use cubesummary_core::{Granularity, Period, TimeRange};
use serde::Serialize;

use crate::cli::PeriodArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{print_json, resolve_tz};

pub fn run_period(
    args: PeriodArgs,
    settings: &Settings,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let tz = resolve_tz(args.tz.as_deref(), settings)?;
    let period = Period::new(Some(args.year), args.month, args.day)?;

    let periods = if args.children {
        period.children()?
    } else {
        vec![period]
    };
    let bounds = periods
        .into_iter()
        .map(|p| period_bounds(p, tz))
        .collect::<CliResult<Vec<_>>>()?;

    match output_format {
        OutputFormat::Json => print_json(&bounds)?,
        OutputFormat::Text => {
            for b in bounds {
                println!(
                    "{}: {} to {} ({} to {})",
                    b.key, b.start_local, b.end_local, b.start_utc, b.end_utc
                );
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

#[derive(Debug, Serialize)]
struct PeriodBounds {
    key: String,
    granularity: Granularity,
    start_local: String,
    end_local: String,
    start_utc: String,
    end_utc: String,
    hours: i64,
}

fn period_bounds(period: Period, tz: Tz) -> CliResult<PeriodBounds> {
    let no_bounds = || CliError::input(format!("Period {} has no boundaries", period));
    let granularity = period.granularity().ok_or_else(no_bounds)?;
    let range: TimeRange = period.range(tz)?.ok_or_else(no_bounds)?;

    Ok(PeriodBounds {
        key: period.key(),
        granularity,
        start_local: format_rfc3339(&range.begin.with_timezone(&tz)),
        end_local: format_rfc3339(&range.end.with_timezone(&tz)),
        start_utc: format_rfc3339_utc(&range.begin),
        end_utc: format_rfc3339_utc(&range.end),
        hours: (range.end - range.begin).num_hours(),
    })
}
