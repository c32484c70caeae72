//! Stable DTOs and IDs used across the finproof workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report, trace, manifest, certificate and proof bundle
//! - stable rule codes and finding kinds
//! - explain registry for remediation guidance and the rulebook built from it

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod report;
pub mod rulebook;

pub use explain::{all_kinds, all_rule_codes, lookup_explanation, ExamplePair, Explanation};
pub use report::{
    ArithmeticClaim, Certificate, ClaimSide, ClaimTerm, Divergence, DivergenceElement, Finding, FindingCounts, Manifest, ProofBundle,
    Ref, ReplayReport, ReplayResult, Report, Severity, Status, TraceEvent, TraceOutcome,
    SCHEMA_CERTIFICATE_V1, SCHEMA_MANIFEST_V1, SCHEMA_PROOF_BUNDLE_V1, SCHEMA_REPLAY_V1,
    SCHEMA_REPORT_V1,
};
pub use rulebook::{RuleFamily, Rulebook, RulebookEntry, SCHEMA_RULEBOOK_V1, rule_family};
