use finproof_types::{Ref, Report, Severity, Status, TraceEvent, TraceOutcome};

fn ref_label(r: &Ref) -> String {
    let tag = match r {
        Ref::Fact(_) => "fact",
        Ref::Context(_) => "context",
        Ref::Concept(_) => "concept",
        Ref::Document(_) => "document",
        Ref::Namespace(_) => "namespace",
    };
    format!("{tag}:{}", r.id())
}

/// Human-readable summary of one run. Output depends only on its inputs.
pub fn render_markdown(report: &Report, trace: &[TraceEvent]) -> String {
    let mut out = String::new();

    out.push_str("# Finproof report\n\n");
    let status = match report.status {
        Status::Clean => "CLEAN",
        Status::Review => "REVIEW",
        Status::Risk => "RISK",
    };
    out.push_str(&format!("- Status: **{status}**\n"));
    out.push_str(&format!("- Profile: `{}`\n", report.profile));
    out.push_str(&format!("- Rule set: `{}`\n", report.rule_set_version));
    out.push_str(&format!("- Filing: `{}`\n", report.filing_hash));
    out.push_str(&format!(
        "- Rules executed: {} / errors: {} / warnings: {}\n\n",
        report.counts.rules_executed, report.counts.errors, report.counts.warnings
    ));

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
    } else {
        out.push_str("## Findings\n\n");
        for f in &report.findings {
            let sev = match f.severity {
                Severity::Warning => "WARN",
                Severity::Error => "ERROR",
            };
            out.push_str(&format!(
                "{}. [{}] `{}` / `{}`: {}\n",
                f.seq, sev, f.code, f.kind, f.message
            ));
            if !f.refs.is_empty() {
                let refs: Vec<String> = f.refs.iter().map(ref_label).collect();
                out.push_str(&format!("   - refs: {}\n", refs.join(", ")));
            }
        }
    }

    if !trace.is_empty() {
        out.push_str("\n## Trace\n\n");
        out.push_str("| # | Rule | Outcome | Findings |\n");
        out.push_str("|---|------|---------|----------|\n");
        for t in trace {
            let outcome = match t.outcome {
                TraceOutcome::Pass => "pass",
                TraceOutcome::Findings => "findings",
            };
            out.push_str(&format!(
                "| {} | `{}` | {} | {} |\n",
                t.seq, t.rule_code, outcome, t.finding_count
            ));
        }
    }

    out
}
