//! Proof bundles and replay.

use finproof_domain::{Engine, EngineError, Filing, RunOutput, claim_holds, filing_hash, recompute};
use finproof_types::{
    Divergence, DivergenceElement, ProofBundle, ReplayReport, ReplayResult, SCHEMA_PROOF_BUNDLE_V1,
    SCHEMA_REPLAY_V1,
};
use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use tracing::{info, warn};

/// Capture the deterministic output of `run` for later replay.
pub fn proof_bundle(run: &RunOutput) -> ProofBundle {
    ProofBundle {
        schema: SCHEMA_PROOF_BUNDLE_V1.to_string(),
        filing_hash: run.report.filing_hash.clone(),
        profile: run.report.profile.clone(),
        rule_set_version: run.report.rule_set_version.clone(),
        findings: run.report.findings.clone(),
        trace: run.trace.clone(),
        arithmetic_claims: run.claims.clone(),
    }
}

fn to_json<T: Serialize>(value: Option<&T>) -> JsonValue {
    value
        .and_then(|v| serde_json::to_value(v).ok())
        .unwrap_or(JsonValue::Null)
}

/// First index at which two sequences differ, counting a length difference.
fn first_difference<T: PartialEq>(expected: &[T], actual: &[T]) -> Option<usize> {
    let shared = expected.len().min(actual.len());
    (0..shared)
        .find(|&i| expected[i] != actual[i])
        .or_else(|| (expected.len() != actual.len()).then_some(shared))
}

fn mismatch(divergence: Divergence) -> ReplayReport {
    warn!(
        element = ?divergence.element,
        index = ?divergence.index,
        rule_code = ?divergence.rule_code,
        "replay diverged"
    );
    ReplayReport {
        schema: SCHEMA_REPLAY_V1.to_string(),
        result: ReplayResult::Mismatch,
        first_divergence: Some(divergence),
    }
}

/// Re-run `bundle`'s profile against `filing` and compare the outcome element by element.
///
/// Checked in order: rule-set version, profile availability, trace, findings, arithmetic
/// claims, filing hash. Each recorded claim must hold on its own numbers before it is
/// compared with the claims of the new run. The first difference is reported; fatal
/// engine errors are returned as errors.
pub fn replay(
    bundle: &ProofBundle,
    filing: &Filing,
    engine: &Engine<'_>,
) -> Result<ReplayReport, EngineError> {
    let registry = engine.registry();
    if bundle.rule_set_version != registry.rule_set_version() {
        return Ok(mismatch(Divergence {
            element: DivergenceElement::RuleSetVersion,
            index: None,
            rule_code: None,
            expected: JsonValue::from(bundle.rule_set_version.as_str()),
            actual: JsonValue::from(registry.rule_set_version()),
        }));
    }
    if registry.profile(&bundle.profile).is_err() {
        return Ok(mismatch(Divergence {
            element: DivergenceElement::Profile,
            index: None,
            rule_code: None,
            expected: JsonValue::from(bundle.profile.as_str()),
            actual: JsonValue::Null,
        }));
    }

    let run = engine.run(filing, &bundle.profile)?;

    if let Some(i) = first_difference(&bundle.trace, &run.trace) {
        let rule_code = bundle
            .trace
            .get(i)
            .or_else(|| run.trace.get(i))
            .map(|t| t.rule_code.clone());
        return Ok(mismatch(Divergence {
            element: DivergenceElement::Trace,
            index: Some(i as u64),
            rule_code,
            expected: to_json(bundle.trace.get(i)),
            actual: to_json(run.trace.get(i)),
        }));
    }

    let findings = &run.report.findings;
    if let Some(i) = first_difference(&bundle.findings, findings) {
        let rule_code = bundle
            .findings
            .get(i)
            .or_else(|| findings.get(i))
            .map(|f| f.code.clone());
        return Ok(mismatch(Divergence {
            element: DivergenceElement::Findings,
            index: Some(i as u64),
            rule_code,
            expected: to_json(bundle.findings.get(i)),
            actual: to_json(findings.get(i)),
        }));
    }

    if let Some((i, claim)) = bundle
        .arithmetic_claims
        .iter()
        .enumerate()
        .find(|(_, claim)| !claim_holds(claim))
    {
        let actual = match recompute(claim) {
            Some(r) => json!({
                "difference": r.difference.to_string(),
                "within_tolerance": r.within_tolerance,
            }),
            None => JsonValue::Null,
        };
        return Ok(mismatch(Divergence {
            element: DivergenceElement::ArithmeticClaims,
            index: Some(i as u64),
            rule_code: Some(claim.rule_code.clone()),
            expected: json!({
                "difference": claim.difference,
                "within_tolerance": claim.within_tolerance,
            }),
            actual,
        }));
    }

    if let Some(i) = first_difference(&bundle.arithmetic_claims, &run.claims) {
        let rule_code = bundle
            .arithmetic_claims
            .get(i)
            .or_else(|| run.claims.get(i))
            .map(|c| c.rule_code.clone());
        return Ok(mismatch(Divergence {
            element: DivergenceElement::ArithmeticClaims,
            index: Some(i as u64),
            rule_code,
            expected: to_json(bundle.arithmetic_claims.get(i)),
            actual: to_json(run.claims.get(i)),
        }));
    }

    if bundle.filing_hash != run.report.filing_hash {
        return Ok(mismatch(Divergence {
            element: DivergenceElement::FilingHash,
            index: None,
            rule_code: None,
            expected: JsonValue::from(bundle.filing_hash.as_str()),
            actual: JsonValue::from(run.report.filing_hash.as_str()),
        }));
    }

    info!(profile = %bundle.profile, "replay matched");
    Ok(ReplayReport {
        schema: SCHEMA_REPLAY_V1.to_string(),
        result: ReplayResult::Match,
        first_divergence: None,
    })
}

/// Whether `filing` hashes to the digest recorded in `bundle`.
pub fn bundle_matches_filing(bundle: &ProofBundle, filing: &Filing) -> Result<bool, serde_json::Error> {
    Ok(filing_hash(filing)? == bundle.filing_hash)
}
