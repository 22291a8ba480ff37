use clap::{Parser, Subcommand};

/// Fold-aware timezone resolution tool
#[derive(Parser, Debug)]
#[command(name = "tzfold")]
#[command(about = "Fold-aware timezone resolution tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert an instant to a local wall-clock reading with its fold
    Resolve(ResolveArgs),
    /// Explain how a local wall-clock reading maps to instants
    Explain(ExplainArgs),
    /// Show the current moment in a zone
    Now(NowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Target zone: IANA name, 'utc', 'system', or a fixed offset like +05:30
    #[arg(short, long, default_value = "system")]
    pub tz: String,

    /// Instant to resolve (epoch seconds, epoch milliseconds, or RFC3339)
    #[arg(long)]
    pub instant: String,

    /// Input format: auto, epoch_ms, epoch_s, rfc3339
    #[arg(short = 'f', long, default_value = "auto")]
    pub format: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct ExplainArgs {
    /// Target zone: IANA name, 'utc', 'system', or a fixed offset like +05:30
    #[arg(short, long, default_value = "system")]
    pub tz: String,

    /// Local time string without offset (e.g., 2023-11-05T01:30:00)
    #[arg(long)]
    pub local: String,

    /// Occurrence to select when the reading is repeated: first, second
    #[arg(long, default_value = "first")]
    pub fold: String,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct NowArgs {
    /// Target zone: IANA name, 'utc', 'system', or a fixed offset like +05:30
    #[arg(short, long, default_value = "system")]
    pub tz: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}
