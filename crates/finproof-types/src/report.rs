use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifiers for finproof payloads.
pub const SCHEMA_REPORT_V1: &str = "finproof.report.v1";
pub const SCHEMA_MANIFEST_V1: &str = "finproof.manifest.v1";
pub const SCHEMA_CERTIFICATE_V1: &str = "finproof.certificate.v1";
pub const SCHEMA_PROOF_BUNDLE_V1: &str = "finproof.proof_bundle.v1";
pub const SCHEMA_REPLAY_V1: &str = "finproof.replay.v1";

/// Severity is intentionally small: warnings ask for review, errors mean risk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Overall verdict of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Clean,
    Review,
    Risk,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Clean => "clean",
            Status::Review => "review",
            Status::Risk => "risk",
        }
    }
}

/// Identifier referenced by a finding, tagged with what it identifies.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Ref {
    Fact(String),
    Context(String),
    Concept(String),
    Document(String),
    Namespace(String),
}

impl Ref {
    pub fn id(&self) -> &str {
        match self {
            Ref::Fact(id)
            | Ref::Context(id)
            | Ref::Concept(id)
            | Ref::Document(id)
            | Ref::Namespace(id) => id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    /// Position in the run's finding sequence (1-based, evaluation order).
    pub seq: u64,
    /// Code of the rule that produced the finding.
    pub code: String,
    /// Snake_case discriminator within the rule.
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub refs: Vec<Ref>,

    /// Rule-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TraceOutcome {
    Pass,
    Findings,
}

/// One record per rule invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TraceEvent {
    pub seq: u64,
    pub rule_code: String,
    pub outcome: TraceOutcome,
    pub finding_count: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FindingCounts {
    pub rules_executed: u32,
    pub errors: u32,
    pub warnings: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    pub schema: String,
    pub filing_hash: String,
    pub profile: String,
    pub rule_set_version: String,
    pub status: Status,
    pub counts: FindingCounts,
    pub findings: Vec<Finding>,
}

/// Content hashes of every artifact in an evidence pack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Manifest {
    pub schema: String,
    pub filing_hash: String,
    pub artifacts: BTreeMap<String, String>,
}

/// Signed attestation that a filing passed a profile cleanly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Certificate {
    pub schema: String,
    pub filing_hash: String,
    pub profile: String,
    pub rule_set_version: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
    pub status: Status,
    pub key_id: String,
    pub signature: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProofBundle {
    pub schema: String,
    pub filing_hash: String,
    pub profile: String,
    pub rule_set_version: String,
    pub findings: Vec<Finding>,
    pub trace: Vec<TraceEvent>,
    #[serde(default)]
    pub arithmetic_claims: Vec<ArithmeticClaim>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClaimSide {
    Lhs,
    Rhs,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClaimTerm {
    pub term: String,
    pub side: ClaimSide,
    pub fact_id: String,
    /// Exact decimal text of the fact value.
    pub value: String,
}

/// An equation checked in one context, with every number as exact decimal text so
/// the outcome can be recomputed from the claim alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ArithmeticClaim {
    /// `<rule_code>:<context_id>`.
    pub claim_id: String,
    pub rule_code: String,
    pub context_id: String,
    pub terms: Vec<ClaimTerm>,
    /// `|lhs - rhs|`.
    pub difference: String,
    pub tolerance: String,
    pub within_tolerance: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReplayResult {
    Match,
    Mismatch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceElement {
    RuleSetVersion,
    Profile,
    Trace,
    Findings,
    ArithmeticClaims,
    FilingHash,
}

/// First point where a replayed run differs from its proof bundle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Divergence {
    pub element: DivergenceElement,
    /// Zero-based position within `trace`, `findings` or `arithmetic_claims`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_code: Option<String>,
    pub expected: JsonValue,
    pub actual: JsonValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReplayReport {
    pub schema: String,
    pub result: ReplayResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_divergence: Option<Divergence>,
}
