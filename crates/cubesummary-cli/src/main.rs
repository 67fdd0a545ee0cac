use std::process::ExitCode;

use clap::Parser;

mod cli;
mod error;
mod generate_cmd;
mod logging;
mod period_cmd;
mod search_cmd;
mod shared;
mod summary_cmd;

use cli::{Cli, Commands};
use error::{CliError, CliResult, output_format_hint, parse_output_format, render_error};
use generate_cmd::run_generate;
use period_cmd::run_period;
use search_cmd::{run_datasets, run_search};
use shared::load_settings;
use summary_cmd::run_summary;
use tracing::debug;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let requested_format = match &cli.command {
        Commands::Generate(args) => args.output_format.clone(),
        Commands::Summary(args) => args.output_format.clone(),
        Commands::Search(args) => args.output_format.clone(),
        Commands::Datasets(args) => args.output_format.clone(),
        Commands::Period(args) => args.output_format.clone(),
    };
    let fallback = output_format_hint(&requested_format);
    let output_format = match parse_output_format(&requested_format) {
        Ok(format) => format,
        Err(err) => return render_error(&err, fallback),
    };

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => return render_error(&err, output_format),
    };

    if let Err(e) = logging::init(&settings.logging.level, cli.verbose) {
        return render_error(&CliError::runtime(format!("{e:#}")), output_format);
    }
    debug!(?settings, "loaded settings");

    let result: CliResult<ExitCode> = match cli.command {
        Commands::Generate(args) => run_generate(args, &settings, output_format),
        Commands::Summary(args) => run_summary(args, &settings, output_format),
        Commands::Search(args) => run_search(args, &settings, output_format),
        Commands::Datasets(args) => run_datasets(args, &settings, output_format),
        Commands::Period(args) => run_period(args, &settings, output_format),
    };

    match result {
        Ok(code) => code,
        Err(err) => render_error(&err, output_format),
    }
}
