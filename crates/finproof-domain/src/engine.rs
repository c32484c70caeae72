use crate::fingerprint::filing_hash;
use crate::model::Filing;
use crate::registry::{RegistryError, RuleRegistry};
use crate::report::{compute_status, count_findings};
use crate::rule::{Rule, RuleFinding};
use crate::schema::{SchemaError, validate_filing};
use finproof_types::{
    ArithmeticClaim, Finding, Report, SCHEMA_REPORT_V1, TraceEvent, TraceOutcome,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Fatal outcomes of a run. None of them produce a partial report.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to canonicalize filing: {0}")]
    Canonicalize(#[from] serde_json::Error),

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    #[error("unknown rule code '{0}'")]
    UnknownRuleCode(String),

    #[error("invalid rule registry: {0}")]
    Registry(RegistryError),

    #[error("rule '{rule_code}' failed: {reason}")]
    RuleExecution { rule_code: String, reason: String },

    #[error("time budget of {budget_ms} ms exceeded after {completed_rules} rule(s)")]
    Timeout { budget_ms: u64, completed_rules: u32 },
}

impl From<RegistryError> for EngineError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownProfile { name } => EngineError::UnknownProfile(name),
            RegistryError::UnknownRuleCode { code, .. } => EngineError::UnknownRuleCode(code),
            other => EngineError::Registry(other),
        }
    }
}

impl EngineError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::Schema(_) | EngineError::Canonicalize(_) => 10,
            EngineError::UnknownProfile(_)
            | EngineError::UnknownRuleCode(_)
            | EngineError::Registry(_) => 11,
            EngineError::RuleExecution { .. } => 12,
            EngineError::Timeout { .. } => 13,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Schema(_) | EngineError::Canonicalize(_) => "schema_error",
            EngineError::UnknownProfile(_) => "unknown_profile",
            EngineError::UnknownRuleCode(_) | EngineError::Registry(_) => "unknown_rule_code",
            EngineError::RuleExecution { .. } => "rule_execution_error",
            EngineError::Timeout { .. } => "timeout_error",
        }
    }
}

/// Complete output of one run: the report and its parallel trace.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutput {
    pub report: Report,
    pub trace: Vec<TraceEvent>,
    /// Claims of the executed rules, in profile order.
    pub claims: Vec<ArithmeticClaim>,
}

/// Runs a profile's rules against a filing.
///
/// Rules execute sequentially in profile order. The time budget is checked between
/// rule invocations, never inside one.
#[derive(Clone, Copy, Debug)]
pub struct Engine<'r> {
    registry: &'r RuleRegistry,
    time_budget: Option<Duration>,
}

impl<'r> Engine<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            time_budget: None,
        }
    }

    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn registry(&self) -> &'r RuleRegistry {
        self.registry
    }

    pub fn run(&self, filing: &Filing, profile: &str) -> Result<RunOutput, EngineError> {
        let rules = self.registry.resolve(profile)?;
        validate_filing(filing)?;
        let filing_hash = filing_hash(filing)?;

        info!(
            profile,
            filing_hash = %filing_hash,
            rules = rules.len(),
            "validation run started"
        );

        let started = Instant::now();
        let mut findings: Vec<Finding> = Vec::new();
        let mut trace: Vec<TraceEvent> = Vec::with_capacity(rules.len());
        let mut claims: Vec<ArithmeticClaim> = Vec::new();

        for (idx, rule) in rules.iter().enumerate() {
            self.check_budget(started, idx as u32)?;

            let (produced, rule_claims) = invoke(*rule, filing)?;
            claims.extend(rule_claims);
            let invocation = idx as u64 + 1;
            debug!(
                rule = rule.code(),
                seq = invocation,
                findings = produced.len(),
                "rule evaluated"
            );

            trace.push(TraceEvent {
                seq: invocation,
                rule_code: rule.code().to_string(),
                outcome: if produced.is_empty() {
                    TraceOutcome::Pass
                } else {
                    TraceOutcome::Findings
                },
                finding_count: produced.len() as u32,
            });

            for rf in produced {
                let seq = findings.len() as u64 + 1;
                findings.push(Finding {
                    seq,
                    code: rule.code().to_string(),
                    kind: rf.kind.to_string(),
                    severity: rf.severity,
                    message: rf.message,
                    refs: rf.refs,
                    data: rf.data,
                });
            }
        }
        self.check_budget(started, rules.len() as u32)?;

        let status = compute_status(&findings);
        let counts = count_findings(rules.len() as u32, &findings);
        info!(
            profile,
            status = status.as_str(),
            errors = counts.errors,
            warnings = counts.warnings,
            "validation run finished"
        );

        Ok(RunOutput {
            report: Report {
                schema: SCHEMA_REPORT_V1.to_string(),
                filing_hash,
                profile: profile.to_string(),
                rule_set_version: self.registry.rule_set_version().to_string(),
                status,
                counts,
                findings,
            },
            trace,
            claims,
        })
    }

    fn check_budget(&self, started: Instant, completed_rules: u32) -> Result<(), EngineError> {
        let Some(budget) = self.time_budget else {
            return Ok(());
        };
        if started.elapsed() >= budget {
            let budget_ms = budget.as_millis() as u64;
            warn!(budget_ms, completed_rules, "time budget exceeded; run aborted");
            return Err(EngineError::Timeout {
                budget_ms,
                completed_rules,
            });
        }
        Ok(())
    }
}

/// Run one rule and collect its claims, turning faults and panics into a fatal error.
fn invoke(
    rule: &dyn Rule,
    filing: &Filing,
) -> Result<(Vec<RuleFinding>, Vec<ArithmeticClaim>), EngineError> {
    let evaluated = panic::catch_unwind(AssertUnwindSafe(|| {
        rule.evaluate(filing).map(|findings| (findings, rule.claims(filing)))
    }));
    match evaluated {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(fault)) => Err(EngineError::RuleExecution {
            rule_code: rule.code().to_string(),
            reason: fault.to_string(),
        }),
        Err(payload) => Err(EngineError::RuleExecution {
            rule_code: rule.code().to_string(),
            reason: format!("panicked: {}", panic_message(payload.as_ref())),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
