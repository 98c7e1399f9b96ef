//! Integration tests for the `holidays` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to run each subcommand through
//! the actual binary, including JSON output, rule files and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn holidays() -> Command {
    Command::cargo_bin("holidays").unwrap()
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

// ─────────────────────────────────────────────────────────────────────────────
// list
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn list_prints_one_date_per_line() {
    holidays()
        .args(["list", "--start", "2023-11-01", "--end", "2023-12-31"])
        .assert()
        .success()
        .stdout("2023-11-23\n2023-12-25\n");
}

#[test]
fn list_includes_observed_friday() {
    holidays()
        .args(["list", "--start", "2015-07-01", "--end", "2015-07-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2015-07-03"));
}

#[test]
fn list_json_output() {
    let output = holidays()
        .args(["list", "--start", "2001-09-10", "--end", "2001-09-18", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["jurisdiction"], "US");
    assert_eq!(parsed["start"], "2001-09-10");
    assert_eq!(parsed["end"], "2001-09-18");
    let dates = parsed["dates"].as_array().unwrap();
    assert_eq!(dates.len(), 6);
    assert_eq!(dates[0], "2001-09-11");
    assert_eq!(dates[5], "2001-09-16");
}

#[test]
fn list_future_range_widens_window() {
    holidays()
        .args(["list", "--start", "2030-01-01", "--end", "2030-12-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2030-01-01"))
        .stdout(predicate::str::contains("2030-12-25"));
}

#[test]
fn list_lowercase_jurisdiction() {
    holidays()
        .args(["-j", "us", "list", "--start", "2023-07-01", "--end", "2023-07-31"])
        .assert()
        .success()
        .stdout("2023-07-04\n");
}

#[test]
fn list_inverted_range_fails() {
    holidays()
        .args(["list", "--start", "2023-12-31", "--end", "2023-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid range"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_holiday() {
    holidays()
        .args(["check", "2015-07-03"])
        .assert()
        .success()
        .stdout("2015-07-03 US holiday\n");
}

#[test]
fn check_weekend() {
    holidays()
        .args(["check", "2023-07-08"])
        .assert()
        .success()
        .stdout("2023-07-08 US weekend\n");
}

#[test]
fn check_trading_day() {
    holidays()
        .args(["check", "2015-07-06"])
        .assert()
        .success()
        .stdout("2015-07-06 US trading day\n");
}

#[test]
fn check_local_timestamp_uses_utc_date() {
    // 22:00 EDT on July 3 is 02:00 UTC on Saturday July 4.
    let output = holidays()
        .args([
            "check",
            "--at",
            "2015-07-03T22:00:00",
            "--tz",
            "America/New_York",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["date"], "2015-07-04");
    assert_eq!(parsed["weekend"], true);
    assert_eq!(parsed["trading_day"], false);
}

#[test]
fn check_invalid_timezone_fails() {
    holidays()
        .args(["check", "--at", "2015-07-03T12:00:00", "--tz", "Mars/Olympus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn check_at_without_tz_is_a_usage_error() {
    holidays()
        .args(["check", "--at", "2015-07-03T12:00:00"])
        .assert()
        .failure();
}

#[test]
fn check_unknown_jurisdiction_fails() {
    holidays()
        .args(["-j", "ZZ", "check", "2020-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown jurisdiction: ZZ"));
}

// ─────────────────────────────────────────────────────────────────────────────
// next / previous / trading-days
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn next_skips_holiday_and_weekend() {
    holidays()
        .args(["next", "2015-07-02"])
        .assert()
        .success()
        .stdout("2015-07-06\n");
}

#[test]
fn previous_skips_closure_week() {
    holidays()
        .args(["previous", "2001-09-17"])
        .assert()
        .success()
        .stdout("2001-09-10\n");
}

#[test]
fn trading_days_around_hurricane_sandy() {
    holidays()
        .args(["trading-days", "--start", "2012-10-26", "--end", "2012-11-01"])
        .assert()
        .success()
        .stdout("2012-10-26\n2012-10-31\n2012-11-01\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule files
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn rules_file_registers_jurisdictions() {
    holidays()
        .args(["--rules", &fixture("exchange_rules.json"), "jurisdictions"])
        .assert()
        .success()
        .stdout("HARVEST\nUS\nXMAS\n");
}

#[test]
fn rules_file_custom_calendar() {
    holidays()
        .args([
            "--rules",
            &fixture("exchange_rules.json"),
            "-j",
            "xmas",
            "list",
            "--start",
            "2020-01-01",
            "--end",
            "2022-12-31",
        ])
        .assert()
        .success()
        .stdout("2020-03-16\n2020-03-17\n2020-12-25\n2021-12-25\n2022-12-25\n2022-12-26\n");
}

#[test]
fn rules_file_effective_date() {
    holidays()
        .args([
            "--rules",
            &fixture("exchange_rules.json"),
            "-j",
            "harvest",
            "list",
            "--start",
            "2020-01-01",
            "--end",
            "2022-12-31",
        ])
        .assert()
        .success()
        .stdout("2021-10-11\n2022-10-10\n");
}

#[test]
fn invalid_rules_file_fails() {
    holidays()
        .args(["--rules", &fixture("invalid_rules.json"), "jurisdictions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid rule"));
}

#[test]
fn missing_rules_file_fails() {
    holidays()
        .args(["--rules", "/nonexistent/rules.json", "jurisdictions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn rules_prints_builtin_rule_set() {
    holidays()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"jurisdiction\": \"US\""))
        .stdout(predicate::str::contains("Independence Day"))
        .stdout(predicate::str::contains("observed_shift"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Global flags
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn from_flag_after_today_fails() {
    holidays()
        .args(["--from", "9999-01-01", "jurisdictions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid calendar window"));
}

#[test]
fn help_lists_subcommands() {
    holidays()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("trading-days"))
        .stdout(predicate::str::contains("previous"));
}
