use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

mod cli;
mod error;
mod explain_cmd;
mod now_cmd;
mod resolve_cmd;
mod shared;

use cli::{Cli, Commands};
use error::{OutputFormat, render_error};
use explain_cmd::run_explain;
use now_cmd::run_now;
use resolve_cmd::run_resolve;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Parsed CLI args: {:?}", cli);

    match cli.command {
        Commands::Resolve(args) => {
            let fallback = OutputFormat::hint(&args.output_format);
            let output_format = match OutputFormat::parse(&args.output_format) {
                Ok(format) => format,
                Err(err) => return render_error(&err, fallback),
            };

            match run_resolve(args, output_format) {
                Ok(code) => code,
                Err(err) => render_error(&err, output_format),
            }
        }
        Commands::Explain(args) => {
            let fallback = OutputFormat::hint(&args.output_format);
            let output_format = match OutputFormat::parse(&args.output_format) {
                Ok(format) => format,
                Err(err) => return render_error(&err, fallback),
            };

            match run_explain(args, output_format) {
                Ok(code) => code,
                Err(err) => render_error(&err, output_format),
            }
        }
        Commands::Now(args) => {
            let fallback = OutputFormat::hint(&args.output_format);
            let output_format = match OutputFormat::parse(&args.output_format) {
                Ok(format) => format,
                Err(err) => return render_error(&err, fallback),
            };

            match run_now(args, output_format) {
                Ok(code) => code,
                Err(err) => render_error(&err, output_format),
            }
        }
    }
}
