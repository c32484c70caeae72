//! The `explain` use case: look up rule/kind documentation.

use finproof_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the identifier.
    Found(Explanation),
    /// Unknown identifier; includes available rule codes and finding kinds.
    NotFound {
        identifier: String,
        available_rule_codes: &'static [&'static str],
        available_kinds: &'static [&'static str],
    },
}

/// Look up an explanation for a rule code or finding kind.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_rule_codes: explain::all_rule_codes(),
            available_kinds: explain::all_kinds(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\n");
    out.push_str("Examples\n");
    out.push_str("--------\n\n");
    out.push_str("Before (finding):\n");
    out.push_str("```json\n");
    out.push_str(exp.examples.before);
    out.push('\n');
    out.push_str("```\n\n");
    out.push_str("After (clean):\n");
    out.push_str("```json\n");
    out.push_str(exp.examples.after);
    out.push('\n');
    out.push_str("```\n");

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, rule_codes: &[&str], kinds: &[&str]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown rule code or finding kind: {identifier}\n\n"));
    out.push_str("Available rule codes:\n");
    for code in rule_codes {
        out.push_str(&format!("  - {code}\n"));
    }
    out.push_str("\nAvailable finding kinds:\n");
    for kind in kinds {
        out.push_str(&format!("  - {kind}\n"));
    }

    out
}
