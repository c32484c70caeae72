//! Exit-code mapping and error presentation.

use finproof_domain::{EngineError, RegistryError};
use finproof_types::Status;

pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_REVIEW: i32 = 1;
pub const EXIT_RISK: i32 = 2;
/// Usage, I/O or configuration-file error.
pub const EXIT_USAGE: i32 = 3;
/// Replay mismatch or certificate verification failure.
pub const EXIT_MISMATCH: i32 = 4;

pub fn status_exit_code(status: Status) -> i32 {
    match status {
        Status::Clean => EXIT_CLEAN,
        Status::Review => EXIT_REVIEW,
        Status::Risk => EXIT_RISK,
    }
}

fn engine_error(err: &anyhow::Error) -> Option<&EngineError> {
    err.downcast_ref::<EngineError>()
}

/// Exit code and kind of a fatal engine or registry error anywhere in the chain.
fn fatal(err: &anyhow::Error) -> Option<(i32, &'static str)> {
    if let Some(engine) = engine_error(err) {
        return Some((engine.exit_code(), engine.kind()));
    }
    err.downcast_ref::<RegistryError>().map(|registry| {
        let engine = EngineError::from(registry.clone());
        (engine.exit_code(), engine.kind())
    })
}

/// Exit code for a failed invocation: fatal engine errors keep their own code,
/// everything else is a usage error.
pub fn error_exit_code(err: &anyhow::Error) -> i32 {
    fatal(err).map_or(EXIT_USAGE, |(code, _)| code)
}

/// Stable error kind, e.g. `schema_error` or `usage_error`.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    fatal(err).map_or("usage_error", |(_, kind)| kind)
}

/// Error chain, followed by every schema violation when there are any.
pub fn describe_error(err: &anyhow::Error) -> String {
    let mut out = format!("{err:#}");
    if let Some(EngineError::Schema(schema)) = engine_error(err) {
        for violation in &schema.violations {
            out.push_str("\n  - ");
            out.push_str(&violation.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use finproof_domain::{SchemaError, SchemaViolation};

    #[test]
    fn status_codes() {
        assert_eq!(status_exit_code(Status::Clean), 0);
        assert_eq!(status_exit_code(Status::Review), 1);
        assert_eq!(status_exit_code(Status::Risk), 2);
    }

    #[test]
    fn engine_errors_keep_their_code_through_context() {
        let err: Result<(), EngineError> = Err(EngineError::Timeout {
            budget_ms: 5,
            completed_rules: 2,
        });
        let err = err.context("validate filing.json").unwrap_err();
        assert_eq!(error_exit_code(&err), 13);
        assert_eq!(error_kind(&err), "timeout_error");
    }

    #[test]
    fn other_errors_are_usage_errors() {
        let err = anyhow::anyhow!("read filing: not found");
        assert_eq!(error_exit_code(&err), EXIT_USAGE);
        assert_eq!(error_kind(&err), "usage_error");
    }

    #[test]
    fn registry_errors_from_config_are_configuration_errors() {
        let err: Result<(), RegistryError> = Err(RegistryError::UnknownRuleCode {
            code: "acct.nope".to_string(),
            profile: Some("my-gate".to_string()),
        });
        let err = err.context("build rule registry").unwrap_err();
        assert_eq!(error_exit_code(&err), 11);
        assert_eq!(error_kind(&err), "unknown_rule_code");
    }

    #[test]
    fn schema_violations_are_listed() {
        let err = anyhow::Error::from(EngineError::Schema(SchemaError {
            violations: vec![SchemaViolation {
                location: "facts[0]".to_string(),
                message: "unknown context 'c9'".to_string(),
            }],
        }));
        let text = describe_error(&err);
        assert!(text.contains("1 violation(s)"));
        assert!(text.contains("\n  - facts[0]: unknown context 'c9'"));
        assert_eq!(error_exit_code(&err), 10);
    }
}
