use clap::{Parser, Subcommand};

/// Timezone-aware dataset summaries
#[derive(Parser, Debug)]
#[command(name = "cubesummary", version)]
#[command(about = "Generate and query per-period dataset summaries")]
pub struct Cli {
    /// Settings file (TOML). Falls back to $CUBESUMMARY_CONFIG
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable verbose (debug) logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index datasets and precompute period summaries
    Generate(GenerateArgs),
    /// Show a stored period summary
    Summary(SummaryArgs),
    /// List datasets in a time range
    Search(SearchArgs),
    /// List datasets in a calendar period
    Datasets(DatasetsArgs),
    /// Show the UTC boundaries of a calendar period
    Period(PeriodArgs),
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Dataset documents (JSON Lines)
    #[arg(long)]
    pub datasets: String,

    /// Product to summarise (default: every product)
    #[arg(short, long)]
    pub product: Option<String>,

    /// Reporting timezone (IANA name)
    #[arg(short, long)]
    pub tz: Option<String>,

    /// Summary file to write
    #[arg(short, long)]
    pub output: Option<String>,

    /// Fail if more documents than this are malformed
    #[arg(long)]
    pub max_failures: Option<usize>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Product name
    #[arg(short, long)]
    pub product: String,

    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub month: Option<u32>,

    #[arg(long)]
    pub day: Option<u32>,

    /// Summary file to read
    #[arg(long)]
    pub summaries: Option<String>,

    /// Require the summaries to be generated in this timezone. Without it the
    /// timezone recorded in the summary file is used, not the configured one
    #[arg(short, long)]
    pub tz: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Dataset documents (JSON Lines)
    #[arg(long)]
    pub datasets: String,

    /// Product name
    #[arg(short, long)]
    pub product: String,

    /// Start of range (inclusive); local time unless an offset is given
    #[arg(long)]
    pub begin: String,

    /// End of range (exclusive); local time unless an offset is given
    #[arg(long)]
    pub end: String,

    /// Reporting timezone (IANA name)
    #[arg(short, long)]
    pub tz: Option<String>,

    /// Maximum number of datasets
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct DatasetsArgs {
    /// Dataset documents (JSON Lines)
    #[arg(long)]
    pub datasets: String,

    /// Product name
    #[arg(short, long)]
    pub product: String,

    #[arg(long)]
    pub year: i32,

    #[arg(long)]
    pub month: Option<u32>,

    #[arg(long)]
    pub day: Option<u32>,

    /// Reporting timezone (IANA name)
    #[arg(short, long)]
    pub tz: Option<String>,

    /// Maximum number of datasets
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct PeriodArgs {
    /// Reporting timezone (IANA name)
    #[arg(short, long)]
    pub tz: Option<String>,

    #[arg(long)]
    pub year: i32,

    #[arg(long)]
    pub month: Option<u32>,

    #[arg(long)]
    pub day: Option<u32>,

    /// List the sub-periods instead of the period itself
    #[arg(long)]
    pub children: bool,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,
}
