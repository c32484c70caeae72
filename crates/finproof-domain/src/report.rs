use finproof_types::{Finding, FindingCounts, Severity, Status};

/// clean: no findings; review: warnings only; risk: any error.
pub fn compute_status(findings: &[Finding]) -> Status {
    if findings.iter().any(|f| f.severity == Severity::Error) {
        return Status::Risk;
    }
    if findings.iter().any(|f| f.severity == Severity::Warning) {
        return Status::Review;
    }
    Status::Clean
}

pub fn count_findings(rules_executed: u32, findings: &[Finding]) -> FindingCounts {
    let mut counts = FindingCounts {
        rules_executed,
        ..FindingCounts::default()
    };
    for f in findings {
        match f.severity {
            Severity::Warning => counts.warnings += 1,
            Severity::Error => counts.errors += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::finding;

    #[test]
    fn no_findings_is_clean() {
        assert_eq!(compute_status(&[]), Status::Clean);
    }

    #[test]
    fn warnings_only_is_review() {
        let findings = vec![finding(1, Severity::Warning), finding(2, Severity::Warning)];
        assert_eq!(compute_status(&findings), Status::Review);
    }

    #[test]
    fn any_error_is_risk() {
        let findings = vec![finding(1, Severity::Warning), finding(2, Severity::Error)];
        assert_eq!(compute_status(&findings), Status::Risk);
        let counts = count_findings(4, &findings);
        assert_eq!(counts.rules_executed, 4);
        assert_eq!(counts.warnings, 1);
        assert_eq!(counts.errors, 1);
    }
}
