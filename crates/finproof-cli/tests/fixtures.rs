//! End-to-end CLI integration tests using test fixtures.
//!
//! Each fixture in `tests/fixtures/` holds a canonical `filing.json`.
//! These tests run the CLI against each fixture and verify exit codes, the
//! emitted report, the evidence pack on disk, replay and certificate checks.

use assert_cmd::Command;
use finproof_test_util::normalize_nondeterministic;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SECRET_ENV: &str = "FINPROOF_SIGNING_SECRET";

/// Helper to get a Command for the finproof binary.
/// Wraps the deprecated cargo_bin to centralize the deprecation warning.
#[allow(deprecated)]
fn finproof_cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("finproof").expect("finproof binary not found - run `cargo build` first");
    cmd.env_remove(SECRET_ENV).env_remove("FINPROOF_LOG");
    cmd
}

/// Get the path to the test fixtures directory
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("finproof-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

fn filing(fixture: &str) -> PathBuf {
    fixtures_dir().join(fixture).join("filing.json")
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("invalid JSON in {}: {e}", path.display()))
}

/// Run `validate` against a fixture and return the exit code and the report.
fn validate_fixture(fixture: &str, extra: &[&str]) -> (i32, Value) {
    let output = finproof_cmd()
        .args(extra)
        .arg("validate")
        .arg(filing(fixture))
        .output()
        .expect("Failed to run command");
    let code = output.status.code().unwrap_or(-1);
    let report = serde_json::from_slice(&output.stdout).unwrap_or(Value::Null);
    (code, report)
}

fn kinds(report: &Value) -> Vec<String> {
    report["findings"]
        .as_array()
        .map(|fs| {
            fs.iter()
                .filter_map(|f| f["kind"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// validate
// =============================================================================

#[test]
fn clean_fixture_exits_zero() {
    let (code, report) = validate_fixture("clean", &[]);
    assert_eq!(code, 0);
    assert_eq!(report["schema"], "finproof.report.v1");
    assert_eq!(report["status"], "clean");
    assert_eq!(report["profile"], "fsd-consistency");
    assert_eq!(report["rule_set_version"], "2026.1");
    assert_eq!(report["counts"]["rules_executed"], 10);
    assert!(report["findings"].as_array().unwrap().is_empty());
    assert!(report["filing_hash"].as_str().unwrap().starts_with("sha256:"));
}

#[test]
fn warnings_only_fixture_exits_one() {
    let (code, report) = validate_fixture("review", &[]);
    assert_eq!(code, 1);
    assert_eq!(report["status"], "review");
    assert_eq!(kinds(&report), vec!["negative_value"]);
    assert_eq!(report["findings"][0]["severity"], "warning");
}

#[test]
fn risky_fixture_exits_two() {
    let (code, report) = validate_fixture("risky", &[]);
    assert_eq!(code, 2);
    assert_eq!(report["status"], "risk");
    let kinds = kinds(&report);
    assert!(kinds.contains(&"equation_imbalance".to_string()));
    assert!(kinds.contains(&"negative_value".to_string()));
}

#[test]
fn one_unit_imbalance_exceeds_the_half_unit_tolerance() {
    let (code, report) = validate_fixture("imbalance", &[]);
    assert_eq!(code, 2);
    assert_eq!(kinds(&report), vec!["equation_imbalance"]);
    assert_eq!(report["findings"][0]["code"], "acct.balance_sheet_equation");
    assert_eq!(report["findings"][0]["seq"], 1);
}

#[test]
fn calculation_cycle_is_reported_once() {
    let (code, report) = validate_fixture("cycle", &["--profile", "taxonomy-validation"]);
    assert_eq!(code, 2);
    assert_eq!(report["profile"], "taxonomy-validation");
    assert_eq!(kinds(&report), vec!["calculation_cycle"]);
    let cycle = &report["findings"][0]["data"]["cycle"];
    assert_eq!(cycle.as_array().unwrap().len(), 4);
    assert_eq!(cycle[0], cycle[3]);
}

#[test]
fn schema_errors_exit_ten_with_no_report() {
    let output = finproof_cmd()
        .arg("validate")
        .arg(filing("malformed"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(10));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("schema_error"), "stderr: {stderr}");
    assert!(stderr.contains("Q4-2025"), "stderr: {stderr}");
}

#[test]
fn unknown_profile_exits_eleven() {
    finproof_cmd()
        .args(["--profile", "no-such-profile", "validate"])
        .arg(filing("clean"))
        .assert()
        .code(11);
}

#[test]
fn exhausted_time_budget_exits_thirteen() {
    finproof_cmd()
        .args(["--time-budget-ms", "0", "validate"])
        .arg(filing("clean"))
        .assert()
        .code(13)
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_filing_file_is_a_usage_error() {
    finproof_cmd()
        .args(["validate", "does/not/exist.json"])
        .assert()
        .code(3);
}

#[test]
fn validate_writes_requested_artifacts() {
    let tmp = TempDir::new().unwrap();
    let report_path = tmp.path().join("out/report.json");
    let trace_path = tmp.path().join("out/trace.jsonl");
    let md_path = tmp.path().join("out/summary.md");

    finproof_cmd()
        .arg("validate")
        .arg(filing("risky"))
        .arg("--out")
        .arg(&report_path)
        .arg("--trace-out")
        .arg(&trace_path)
        .arg("--markdown-out")
        .arg(&md_path)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());

    let report = read_json(&report_path);
    assert_eq!(report["status"], "risk");

    let trace = std::fs::read_to_string(&trace_path).unwrap();
    let lines: Vec<Value> = trace
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 10);
    for (i, event) in lines.iter().enumerate() {
        assert_eq!(event["seq"], (i + 1) as u64);
    }

    let md = std::fs::read_to_string(&md_path).unwrap();
    assert!(md.contains("acct.balance_sheet_equation"));
}

#[test]
fn repeated_runs_are_byte_identical() {
    let run = || {
        finproof_cmd()
            .arg("validate")
            .arg(filing("risky"))
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn config_file_selects_the_profile() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("finproof.toml");
    std::fs::write(&config, "profile = \"full\"\n").unwrap();

    let (code, report) = validate_fixture("clean", &["--config", config.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert_eq!(report["profile"], "full");
    assert!(kinds(&report).contains(&"missing_taxonomy_package".to_string()));
}

#[test]
fn custom_profile_with_unknown_rule_exits_eleven() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("finproof.toml");
    std::fs::write(
        &config,
        "profile = \"my-gate\"\n\n[profiles.my-gate]\nrules = [\"acct.balance_sheet_equation\", \"acct.no_such_rule\"]\n",
    )
    .unwrap();

    finproof_cmd()
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .arg(filing("clean"))
        .assert()
        .code(11)
        .stderr(predicate::str::contains("acct.no_such_rule"));
}

#[test]
fn custom_profile_runs_its_rules_in_order() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("finproof.toml");
    std::fs::write(
        &config,
        "profile = \"my-gate\"\n\n[profiles.my-gate]\nrules = [\"acct.assets_negative\", \"acct.balance_sheet_equation\"]\n",
    )
    .unwrap();

    let (code, report) = validate_fixture("risky", &["--config", config.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert_eq!(report["profile"], "my-gate");
    assert_eq!(kinds(&report), vec!["negative_value", "equation_imbalance"]);
}

// =============================================================================
// batch
// =============================================================================

#[test]
fn batch_prints_one_line_per_filing_and_exits_with_the_worst_code() {
    let output = finproof_cmd()
        .arg("batch")
        .arg(filing("clean"))
        .arg(filing("malformed"))
        .arg(filing("review"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(10));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["status"], "clean");
    assert_eq!(lines[1]["error"], "schema_error");
    assert!(lines[1].get("status").is_none());
    assert_eq!(lines[2]["status"], "review");
}

// =============================================================================
// pack / replay / verify-certificate
// =============================================================================

fn pack(fixture: &str, out_dir: &Path, secret: Option<&str>) -> std::process::Output {
    let mut cmd = finproof_cmd();
    if let Some(secret) = secret {
        cmd.env(SECRET_ENV, secret);
    }
    cmd.arg("pack")
        .arg(filing(fixture))
        .arg("--out-dir")
        .arg(out_dir)
        .output()
        .unwrap()
}

#[test]
fn clean_pack_with_secret_is_certified() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("pack");
    let output = pack("clean", &out, Some("s3cret"));
    assert_eq!(output.status.code(), Some(0));

    for name in [
        "report.json",
        "trace.jsonl",
        "summary.md",
        "proof_bundle.json",
        "certificate.json",
        "manifest.json",
    ] {
        assert!(out.join(name).exists(), "missing {name}");
    }

    let printed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, read_json(&out.join("manifest.json")));
    assert_eq!(printed["schema"], "finproof.manifest.v1");

    let bundle = read_json(&out.join("proof_bundle.json"));
    let claims = bundle["arithmetic_claims"].as_array().unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["claim_id"], "acct.balance_sheet_equation:I2025");
    assert_eq!(claims[0]["within_tolerance"], true);
    assert_eq!(printed["artifacts"].as_object().unwrap().len(), 5);

    let cert = read_json(&out.join("certificate.json"));
    assert_eq!(cert["status"], "clean");
    assert_eq!(cert["filing_hash"], printed["filing_hash"]);
}

#[test]
fn clean_pack_without_secret_warns_and_skips_the_certificate() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("pack");
    let output = pack("clean", &out, None);
    assert_eq!(output.status.code(), Some(0));
    assert!(!out.join("certificate.json").exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains(SECRET_ENV));
}

#[test]
fn risky_pack_is_never_certified() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("pack");
    let output = pack("risky", &out, Some("s3cret"));
    assert_eq!(output.status.code(), Some(2));
    assert!(out.join("report.json").exists());
    assert!(!out.join("certificate.json").exists());
}

#[test]
fn fatal_error_writes_no_pack() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("pack");
    let output = pack("malformed", &out, Some("s3cret"));
    assert_eq!(output.status.code(), Some(10));
    assert!(!out.exists());
}

#[test]
fn packs_differ_only_in_nondeterministic_fields() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    pack("clean", &a, Some("s3cret"));
    pack("clean", &b, Some("s3cret"));

    for name in ["report.json", "proof_bundle.json", "trace.jsonl", "summary.md"] {
        assert_eq!(
            std::fs::read(a.join(name)).unwrap(),
            std::fs::read(b.join(name)).unwrap(),
            "{name} differs between runs"
        );
    }
    assert_eq!(
        normalize_nondeterministic(read_json(&a.join("certificate.json"))),
        normalize_nondeterministic(read_json(&b.join("certificate.json")))
    );
    assert_eq!(
        normalize_nondeterministic(read_json(&a.join("manifest.json"))),
        normalize_nondeterministic(read_json(&b.join("manifest.json")))
    );
}

#[test]
fn replay_of_an_unchanged_filing_matches() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("pack");
    pack("risky", &out, None);

    let output = finproof_cmd()
        .arg("replay")
        .arg(filing("risky"))
        .arg("--bundle")
        .arg(out.join("proof_bundle.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["schema"], "finproof.replay.v1");
    assert_eq!(report["result"], "match");
    assert!(report.get("first_divergence").is_none());
}

#[test]
fn replay_against_a_different_filing_reports_the_first_divergence() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("pack");
    pack("clean", &out, None);

    let output = finproof_cmd()
        .arg("replay")
        .arg(filing("imbalance"))
        .arg("--bundle")
        .arg(out.join("proof_bundle.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["result"], "mismatch");
    let d = &report["first_divergence"];
    assert_eq!(d["element"], "trace");
    assert_eq!(d["rule_code"], "acct.balance_sheet_equation");
}

#[test]
fn replay_under_another_tolerance_is_rule_set_drift() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("pack");
    pack("clean", &out, None);

    let output = finproof_cmd()
        .args(["--tolerance", "accumulated-half-unit", "replay"])
        .arg(filing("clean"))
        .arg("--bundle")
        .arg(out.join("proof_bundle.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["first_divergence"]["element"], "rule_set_version");
    assert_eq!(report["first_divergence"]["actual"], "2026.1+tol.accumulated");
}

#[test]
fn certificate_verifies_with_the_signing_secret_only() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("pack");
    pack("clean", &out, Some("s3cret"));
    let cert = out.join("certificate.json");

    let output = finproof_cmd()
        .env(SECRET_ENV, "s3cret")
        .arg("verify-certificate")
        .arg(&cert)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["result"], "valid");
    assert_eq!(report["key_id"], "default");

    finproof_cmd()
        .env(SECRET_ENV, "wrong")
        .arg("verify-certificate")
        .arg(&cert)
        .assert()
        .code(4)
        .stdout(predicate::str::contains("invalid-signature"));

    finproof_cmd()
        .arg("verify-certificate")
        .arg(&cert)
        .assert()
        .code(4)
        .stdout(predicate::str::contains("unknown-key"));
}

#[test]
fn tampered_certificate_fails_verification() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("pack");
    pack("clean", &out, Some("s3cret"));

    let mut cert = read_json(&out.join("certificate.json"));
    cert["status"] = Value::String("review".to_string());
    let tampered = tmp.path().join("tampered.json");
    std::fs::write(&tampered, serde_json::to_vec_pretty(&cert).unwrap()).unwrap();

    finproof_cmd()
        .env(SECRET_ENV, "s3cret")
        .arg("verify-certificate")
        .arg(&tampered)
        .assert()
        .code(4);
}

// =============================================================================
// explain / rulebook
// =============================================================================

#[test]
fn explain_known_rule_prints_remediation() {
    finproof_cmd()
        .args(["explain", "acct.balance_sheet_equation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remediation"))
        .stdout(predicate::str::contains("Before (finding):"));
}

#[test]
fn explain_unknown_identifier_lists_alternatives() {
    finproof_cmd()
        .args(["explain", "no.such.rule"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown rule code or finding kind: no.such.rule"))
        .stderr(predicate::str::contains("equation_imbalance"));
}

#[test]
fn rulebook_follows_the_effective_profile() {
    let output = finproof_cmd()
        .args(["--profile", "taxonomy-validation", "rulebook"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let book: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(book["schema"], "finproof.rulebook.v1");
    assert_eq!(book["profile"], "taxonomy-validation");
    let rules = book["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 6);
    assert_eq!(rules[0]["code"], "taxonomy.metadata_presence");
    assert_eq!(rules[0]["category"], "custom_taxonomy_validation");
    assert!(rules[0]["evidence_fields"].as_array().is_some_and(|f| !f.is_empty()));

    let all: Value = serde_json::from_slice(
        &finproof_cmd().args(["rulebook", "--all"]).output().unwrap().stdout,
    )
    .unwrap();
    assert_eq!(all["rules"].as_array().unwrap().len(), 22);
    assert!(all.get("profile").is_none() || all["profile"].is_null());
}
