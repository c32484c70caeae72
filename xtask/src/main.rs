//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use finproof_app::{Validator, build_evidence, load_config, parse_filing, run_replay, write_pack};
use finproof_evidence::{CertificateSigner, Keyring, Verification};
use finproof_settings::Overrides;
use finproof_test_util::normalize_nondeterministic;
use finproof_types::ReplayResult;
use schemars::schema_for;
use std::fs;
use time::macros::datetime;

const CONFORMANCE_KEY_ID: &str = "conformance";
const CONFORMANCE_SECRET: &[u8] = b"finproof-conformance";

/// Get the project root (parent of xtask directory).
fn project_root() -> Utf8PathBuf {
    let manifest_dir = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    match manifest_dir.parent() {
        Some(parent) if manifest_dir.ends_with("xtask") => parent.to_path_buf(),
        _ => manifest_dir,
    }
}

fn schemas_dir() -> Utf8PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> Utf8PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "finproof.report.v1.json",
            generate: || schema_for!(finproof_types::Report),
        },
        SchemaSpec {
            filename: "finproof.manifest.v1.json",
            generate: || schema_for!(finproof_types::Manifest),
        },
        SchemaSpec {
            filename: "finproof.certificate.v1.json",
            generate: || schema_for!(finproof_types::Certificate),
        },
        SchemaSpec {
            filename: "finproof.proof_bundle.v1.json",
            generate: || schema_for!(finproof_types::ProofBundle),
        },
        SchemaSpec {
            filename: "finproof.replay.v1.json",
            generate: || schema_for!(finproof_types::ReplayReport),
        },
        SchemaSpec {
            filename: "finproof.rulebook.v1.json",
            generate: || schema_for!(finproof_types::Rulebook),
        },
        SchemaSpec {
            filename: "finproof.config.v1.json",
            generate: || schema_for!(finproof_settings::FinproofConfigV1),
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("Failed to write schema to {path}"))?;
        println!("Wrote {path}");
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }
        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Run every fixture and validate its artifacts against schemas/");
    eprintln!("  explain-coverage  Validate all rule codes and finding kinds have explanations");
}

/// Compile the emitted schema for `filename`.
fn load_schema(filename: &str) -> anyhow::Result<jsonschema::Validator> {
    let path = schemas_dir().join(filename);
    if !path.exists() {
        bail!("{filename} not found at {path}\n\nRun `cargo xtask emit-schemas` first.");
    }
    let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {filename}"))?;
    jsonschema::validator_for(&value)
        .map_err(|e| anyhow::anyhow!("Failed to compile {filename}: {e}"))
}

fn check_against(
    validator: &jsonschema::Validator,
    value: &serde_json::Value,
    label: &str,
    errors: &mut Vec<String>,
) {
    for err in validator.iter_errors(value) {
        errors.push(format!("{label}: schema validation: {err}"));
    }
}

fn read_json(path: &Utf8Path) -> anyhow::Result<serde_json::Value> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {path}"))
}

/// Fixture conformance.
///
/// For every `tests/fixtures/<name>/filing.json` (with an optional `finproof.toml`
/// next to it), this:
/// 1. Validates the filing and builds a certified pack at a fixed issue time
/// 2. Validates report, bundle, manifest and certificate against schemas/
/// 3. Replays the bundle and requires a match
/// 4. Verifies the certificate with the conformance key
/// 5. Compares against `expected.report.json` / `expected.manifest.json` when present
///
/// Fixtures that fail fatally are listed and produce no pack.
fn conform() -> anyhow::Result<()> {
    let report_schema = load_schema("finproof.report.v1.json")?;
    let manifest_schema = load_schema("finproof.manifest.v1.json")?;
    let certificate_schema = load_schema("finproof.certificate.v1.json")?;
    let bundle_schema = load_schema("finproof.proof_bundle.v1.json")?;
    let replay_schema = load_schema("finproof.replay.v1.json")?;
    println!("✓ schemas compile");

    let signer = CertificateSigner::new(CONFORMANCE_KEY_ID, CONFORMANCE_SECRET)
        .context("Failed to build conformance signer")?;
    let keyring = Keyring::new()
        .with_key(CONFORMANCE_KEY_ID, CONFORMANCE_SECRET)
        .context("Failed to build conformance keyring")?;
    let issued_at = datetime!(2026-01-01 00:00:00 UTC);

    let mut fixtures: Vec<Utf8PathBuf> = fixtures_dir()
        .read_dir_utf8()
        .context("Failed to read tests/fixtures/")?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.join("filing.json").exists())
        .collect();
    fixtures.sort();

    let mut errors = Vec::new();
    for dir in &fixtures {
        let name = dir.file_name().unwrap_or_default();

        let config_path = dir.join("finproof.toml");
        let config_text = if config_path.exists() {
            fs::read_to_string(&config_path).with_context(|| format!("Failed to read {config_path}"))?
        } else {
            String::new()
        };
        let validator = Validator::new(load_config(&config_text, Overrides::default())?)?;

        let filing_text = fs::read_to_string(dir.join("filing.json"))
            .with_context(|| format!("Failed to read fixture '{name}'"))?;
        let outcome = parse_filing(&filing_text)
            .and_then(|filing| validator.validate(&filing).map(|run| (filing, run)));
        let (filing, run) = match outcome {
            Ok(ok) => ok,
            Err(err) => {
                println!("  ✓ fixture '{name}' is fatal ({}), no pack", err.kind());
                continue;
            }
        };

        let pack = build_evidence(&run, Some(&signer), issued_at)?;
        let tmp = tempfile::tempdir().context("Failed to create temp dir")?;
        let out = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf())
            .map_err(|p| anyhow::anyhow!("temp dir is not UTF-8: {}", p.display()))?;
        write_pack(&out, &pack)?;

        let report = read_json(&out.join(finproof_evidence::REPORT_FILE))?;
        let manifest = read_json(&out.join(finproof_evidence::MANIFEST_FILE))?;
        let bundle = read_json(&out.join(finproof_evidence::PROOF_BUNDLE_FILE))?;
        check_against(&report_schema, &report, &format!("{name}/report"), &mut errors);
        check_against(&manifest_schema, &manifest, &format!("{name}/manifest"), &mut errors);
        check_against(&bundle_schema, &bundle, &format!("{name}/proof_bundle"), &mut errors);

        let cert_path = out.join(finproof_evidence::CERTIFICATE_FILE);
        if cert_path.exists() {
            let cert = read_json(&cert_path)?;
            check_against(&certificate_schema, &cert, &format!("{name}/certificate"), &mut errors);
            let parsed = finproof_app::parse_certificate(&fs::read_to_string(&cert_path)?)?;
            if keyring.verify(&parsed) != Verification::Valid {
                errors.push(format!("{name}: certificate does not verify"));
            }
        }

        let replay = run_replay(&validator, &finproof_evidence::proof_bundle(&run), &filing)?;
        let replay_value = serde_json::to_value(&replay)?;
        check_against(&replay_schema, &replay_value, &format!("{name}/replay"), &mut errors);
        if replay.result != ReplayResult::Match {
            errors.push(format!("{name}: replay of an unchanged filing did not match"));
        }

        for (golden, actual) in [
            ("expected.report.json", &report),
            ("expected.manifest.json", &manifest),
        ] {
            let golden_path = dir.join(golden);
            if !golden_path.exists() {
                continue;
            }
            let expected = normalize_nondeterministic(read_json(&golden_path)?);
            if normalize_nondeterministic(actual.clone()) != expected {
                errors.push(format!("{name}: output differs from golden file {golden}"));
            }
        }

        println!(
            "  ✓ fixture '{name}' ({}, {})",
            run.report.profile,
            run.report.status.as_str()
        );
    }

    if fixtures.is_empty() {
        bail!("No fixtures found in {}", fixtures_dir());
    }
    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} fixtures pass conformance checks!", fixtures.len());
    Ok(())
}

/// Validate that all rule codes and finding kinds have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let rule_codes = finproof_types::all_rule_codes();
    let kinds = finproof_types::all_kinds();
    let mut errors = Vec::new();

    for (label, ids) in [("Rule code", rule_codes), ("Kind", kinds)] {
        for id in ids {
            match finproof_types::lookup_explanation(id) {
                Some(exp) => {
                    if exp.title.is_empty() {
                        errors.push(format!("{label} '{id}' has empty title"));
                    }
                    if exp.description.is_empty() {
                        errors.push(format!("{label} '{id}' has empty description"));
                    }
                    if exp.remediation.is_empty() {
                        errors.push(format!("{label} '{id}' has empty remediation"));
                    }
                }
                None => errors.push(format!("{label} '{id}' has no explanation")),
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} rule codes have explanations", rule_codes.len());
        println!("✓ {} finding kinds have explanations", kinds.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("Explain coverage validation failed with {} errors", errors.len())
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
