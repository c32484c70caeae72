//! The closed rule interface.

use crate::model::Filing;
use finproof_types::{ArithmeticClaim, Ref, Severity};
use serde_json::Value as JsonValue;

/// A finding as emitted by a rule, before the engine stamps code and sequence number.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleFinding {
    pub kind: &'static str,
    pub severity: Severity,
    pub message: String,
    pub refs: Vec<Ref>,
    pub data: JsonValue,
}

impl RuleFinding {
    pub fn new(kind: &'static str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            refs: Vec::new(),
            data: JsonValue::Null,
        }
    }

    pub fn with_ref(mut self, r: Ref) -> Self {
        self.refs.push(r);
        self
    }

    pub fn with_refs(mut self, refs: impl IntoIterator<Item = Ref>) -> Self {
        self.refs.extend(refs);
        self
    }

    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = data;
        self
    }
}

/// Internal fault of a rule implementation. Aborts the run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RuleFault(pub String);

/// A pure, stateless check over a whole filing.
///
/// Findings must be returned in a deterministic order; the engine keeps that order.
pub trait Rule: Send + Sync {
    fn code(&self) -> &'static str;

    fn default_severity(&self) -> Severity;

    fn description(&self) -> &'static str;

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault>;

    /// Exact restatement of the arithmetic behind this rule's verdict, carried in proof bundles.
    fn claims(&self, _filing: &Filing) -> Vec<ArithmeticClaim> {
        Vec::new()
    }
}
