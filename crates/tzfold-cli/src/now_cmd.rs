use std::process::ExitCode;

use serde::Serialize;

use crate::cli::NowArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{format_signed, parse_zone};

pub fn run_now(args: NowArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let zone = parse_zone(&args.tz)?;

    // Sample the zone's live clock rather than a stored value.
    let dt = zone.now();
    let result = NowResult {
        tz: zone.to_string(),
        local: dt.to_rfc3339(),
        abbreviation: zone.name(None),
        utc_offset_secs: zone.utc_offset(None).num_seconds(),
        dst_secs: zone.dst_delta(None).map(|d| d.num_seconds()),
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
            println!("UTC offset: {}", format_signed(zone.utc_offset(None)));
            match zone.dst_delta(None) {
                Some(delta) => println!("DST offset: {}", format_signed(delta)),
                None => println!("DST offset: unknown"),
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

#[derive(Debug, Serialize)]
struct NowResult {
    tz: String,
    local: String,
    abbreviation: String,
    utc_offset_secs: i64,
    dst_secs: Option<i64>,
    epoch_s: i64,
}
