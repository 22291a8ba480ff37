use std::process::ExitCode;

use chrono::NaiveDateTime;
use serde::Serialize;
use tzfold_core::parse::parse_local_naive;
use tzfold_core::resolve::{ResolvedInstant, UtcCandidates};
use tzfold_core::{Fold, Zone};

use crate::cli::ExplainArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{format_instant_utc, parse_fold, parse_zone};

pub fn run_explain(args: ExplainArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let zone = parse_zone(&args.tz)?;
    let fold = parse_fold(&args.fold)?;
    let local = parse_local_naive(&args.local).map_err(|e| CliError::input(e.to_string()))?;

    let result = explain_local_time(local, &zone, fold);

    match output_format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("Local time: {}", result.local_time);
            println!("Timezone: {}", result.tz);
            println!("Status: {}", result.status);
            for candidate in &result.candidates {
                println!(
                    "Candidate: {} ({}, offset {}s)",
                    candidate.instant, candidate.abbreviation, candidate.utc_offset_secs
                );
            }
            println!(
                "Selected: {} ({})",
                result.selected.instant, result.selected.abbreviation
            );
            if let Some(normalized) = &result.normalized_to {
                println!("Normalized to: {}", normalized);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

#[derive(Debug, Serialize)]
struct ExplainResult {
    local_time: String,
    tz: String,
    status: String,
    fold: Fold,
    candidates: Vec<Candidate>,
    selected: Candidate,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized_to: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct Candidate {
    instant: String,
    epoch_s: i64,
    utc_offset_secs: i32,
    dst_secs: Option<i32>,
    abbreviation: String,
}

fn describe(resolved: &ResolvedInstant) -> Candidate {
    Candidate {
        instant: format_instant_utc(&resolved.instant),
        epoch_s: resolved.instant.timestamp(),
        utc_offset_secs: resolved.local.offset.utc_offset_secs,
        dst_secs: resolved.local.offset.dst_offset_secs,
        abbreviation: resolved.local.offset.abbreviation.clone(),
    }
}

fn explain_local_time(local: NaiveDateTime, zone: &Zone, fold: Fold) -> ExplainResult {
    let candidates = zone.candidates(local);

    let (status, described, normalized_to) = match &candidates {
        UtcCandidates::Unique(resolved) if resolved.local.wall != local => (
            "nonexistent".to_string(),
            vec![describe(resolved)],
            Some(resolved.local.wall.format("%Y-%m-%dT%H:%M:%S").to_string()),
        ),
        UtcCandidates::Unique(resolved) => ("normal".to_string(), vec![describe(resolved)], None),
        UtcCandidates::Ambiguous { earlier, later } => (
            "ambiguous".to_string(),
            vec![describe(earlier), describe(later)],
            None,
        ),
    };

    let selected = describe(&candidates.select(fold));

    ExplainResult {
        local_time: local.format("%Y-%m-%dT%H:%M:%S").to_string(),
        tz: zone.to_string(),
        status,
        fold,
        candidates: described,
        selected,
        normalized_to,
    }
}
