use std::process::{Command, Output};

use similar::{ChangeTag, TextDiff};

fn run_tzfold(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tzfold"))
        .args(args)
        .output()
        .expect("Failed to execute tzfold")
}

fn diff_strings(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        out.push_str(&format!("{sign}{change}"));
    }
    out
}

fn assert_stdout(output: Output, expected: &str) {
    assert!(
        output.status.success(),
        "tzfold failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let actual = String::from_utf8(output.stdout).expect("Output is not valid UTF-8");
    if actual != expected {
        panic!("Output mismatch:\n\n{}", diff_strings(expected, &actual));
    }
}

#[test]
fn explain_ambiguous_reading_json() {
    let output = run_tzfold(&[
        "explain",
        "--tz",
        "America/St_Johns",
        "--local",
        "2023-11-05T01:00:00",
        "--fold",
        "second",
        "--output-format",
        "json",
    ]);

    let expected = r#"{
  "local_time": "2023-11-05T01:00:00",
  "tz": "America/St_Johns",
  "status": "ambiguous",
  "fold": "second",
  "candidates": [
    {
      "instant": "2023-11-05T03:30:00Z",
      "epoch_s": 1699155000,
      "utc_offset_secs": -9000,
      "dst_secs": 3600,
      "abbreviation": "NDT"
    },
    {
      "instant": "2023-11-05T04:30:00Z",
      "epoch_s": 1699158600,
      "utc_offset_secs": -12600,
      "dst_secs": 0,
      "abbreviation": "NST"
    }
  ],
  "selected": {
    "instant": "2023-11-05T04:30:00Z",
    "epoch_s": 1699158600,
    "utc_offset_secs": -12600,
    "dst_secs": 0,
    "abbreviation": "NST"
  }
}
"#;
    assert_stdout(output, expected);
}

#[test]
fn explain_skipped_reading_json() {
    let output = run_tzfold(&[
        "explain",
        "--tz",
        "America/St_Johns",
        "--local",
        "2023-03-12T02:30:00",
        "--output-format",
        "json",
    ]);

    let expected = r#"{
  "local_time": "2023-03-12T02:30:00",
  "tz": "America/St_Johns",
  "status": "nonexistent",
  "fold": "first",
  "candidates": [
    {
      "instant": "2023-03-12T06:00:00Z",
      "epoch_s": 1678600800,
      "utc_offset_secs": -9000,
      "dst_secs": 3600,
      "abbreviation": "NDT"
    }
  ],
  "selected": {
    "instant": "2023-03-12T06:00:00Z",
    "epoch_s": 1678600800,
    "utc_offset_secs": -9000,
    "dst_secs": 3600,
    "abbreviation": "NDT"
  },
  "normalized_to": "2023-03-12T03:30:00"
}
"#;
    assert_stdout(output, expected);
}

#[test]
fn resolve_negative_dst_json() {
    let output = run_tzfold(&[
        "resolve",
        "--tz",
        "Europe/Dublin",
        "--instant",
        "1672531200",
        "--format",
        "epoch_s",
        "--output-format",
        "json",
    ]);

    let expected = r#"{
  "input": "1672531200",
  "tz": "Europe/Dublin",
  "local": "2023-01-01T00:00:00+00:00",
  "fold": "first",
  "utc_offset_secs": 0,
  "dst_secs": -3600,
  "abbreviation": "GMT",
  "epoch_s": 1672531200
}
"#;
    assert_stdout(output, expected);
}

#[test]
fn resolve_fold_text_output() {
    let output = run_tzfold(&[
        "resolve",
        "--tz",
        "Australia/Lord_Howe",
        "--instant",
        "2023-04-01T15:00:00Z",
        "--output-format",
        "text",
    ]);

    let expected = "Local time: 2023-04-02T01:30:00+10:30 (+1030)\n\
                    Fold: second\n\
                    UTC offset: +10:30:00\n\
                    DST offset: +00:00:00\n";
    assert_stdout(output, expected);
}

#[test]
fn invalid_timezone_exits_with_input_error() {
    let output = run_tzfold(&[
        "resolve",
        "--tz",
        "Invalid/Timezone",
        "--instant",
        "1672531200",
    ]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid timezone"), "stderr was: {stderr}");
}

#[test]
fn invalid_local_time_exits_with_input_error() {
    let output = run_tzfold(&[
        "explain",
        "--tz",
        "Europe/Dublin",
        "--local",
        "yesterday-ish",
    ]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn now_answers_in_a_fixed_zone() {
    // Kiritimati has no transitions, so everything but the clock reading
    // is deterministic.
    let output = run_tzfold(&[
        "now",
        "--tz",
        "Pacific/Kiritimati",
        "--output-format",
        "json",
    ]);

    assert!(output.status.success());
    let actual = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(&actual).unwrap();
    assert_eq!(value["tz"], "Pacific/Kiritimati");
    assert_eq!(value["abbreviation"], "+14");
    assert_eq!(value["utc_offset_secs"], 50400);
    assert_eq!(value["dst_secs"], 0);
}
