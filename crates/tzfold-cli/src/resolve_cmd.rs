use std::process::ExitCode;

use serde::Serialize;
use tzfold_core::{Fold, ZonedDateTime};

use crate::cli::ResolveArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{format_signed, parse_format, parse_instant, parse_zone};

pub fn run_resolve(args: ResolveArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let zone = parse_zone(&args.tz)?;
    let format = parse_format(&args.format)?;
    let instant = parse_instant(&args.instant, format)?;

    let dt = ZonedDateTime::from_instant(instant, zone.clone());
    let result = Resolution {
        input: args.instant.trim().to_string(),
        tz: zone.to_string(),
        local: dt.to_rfc3339(),
        fold: dt.fold(),
        utc_offset_secs: dt.utc_offset().num_seconds(),
        dst_secs: dt.dst().map(|d| d.num_seconds()),
        abbreviation: dt.tzname(),
        epoch_s: dt.timestamp(),
    };

    match output_format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("Local time: {} ({})", result.local, result.abbreviation);
            println!("Fold: {}", result.fold);
            println!("UTC offset: {}", format_signed(dt.utc_offset()));
            match dt.dst() {
                Some(delta) => println!("DST offset: {}", format_signed(delta)),
                None => println!("DST offset: unknown"),
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

#[derive(Debug, Serialize)]
struct Resolution {
    input: String,
    tz: String,
    local: String,
    fold: Fold,
    utc_offset_secs: i64,
    dst_secs: Option<i64>,
    abbreviation: String,
    epoch_s: i64,
}
