//! The `replay` use case: re-run a proof bundle against its filing.

use crate::exit::{EXIT_CLEAN, EXIT_MISMATCH};
use crate::validate::Validator;
use anyhow::Context;
use finproof_domain::{EngineError, Filing};
use finproof_types::{ProofBundle, ReplayReport, ReplayResult};

pub fn parse_bundle(text: &str) -> anyhow::Result<ProofBundle> {
    serde_json::from_str(text).context("parse proof bundle")
}

/// Replay `bundle` under the validator's registry and time budget.
///
/// The profile comes from the bundle, not from the configuration.
pub fn run_replay(
    validator: &Validator,
    bundle: &ProofBundle,
    filing: &Filing,
) -> Result<ReplayReport, EngineError> {
    finproof_evidence::replay(bundle, filing, &validator.engine())
}

pub fn replay_exit_code(report: &ReplayReport) -> i32 {
    match report.result {
        ReplayResult::Match => EXIT_CLEAN,
        ReplayResult::Mismatch => EXIT_MISMATCH,
    }
}
