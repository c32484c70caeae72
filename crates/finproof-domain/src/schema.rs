//! Structural validation that must pass before any rule runs.

use crate::model::{Context, Filing, PeriodType};
use std::collections::BTreeSet;
use std::fmt;
use time::Date;
use time::macros::format_description;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Where the violation is, e.g. `contexts.c1` or `facts[3]`.
    pub location: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// The filing is malformed; no rule was run against it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("filing failed schema validation with {} violation(s)", .violations.len())]
pub struct SchemaError {
    pub violations: Vec<SchemaViolation>,
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// `[A-Za-z_][A-Za-z0-9_.-]*`
pub fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => chars.all(is_name_char),
        _ => false,
    }
}

/// `prefix:LocalName`, both parts NCName-like.
pub fn is_qname(s: &str) -> bool {
    match s.split_once(':') {
        Some((prefix, local)) => is_ncname(prefix) && is_ncname(local),
        None => false,
    }
}

/// Collect every structural violation, contexts first (by id), then facts (in order).
pub fn validate_filing(filing: &Filing) -> Result<(), SchemaError> {
    let mut violations = Vec::new();

    for (id, ctx) in &filing.contexts {
        check_context(id, ctx, &mut violations);
    }

    let mut seen_ids = BTreeSet::new();
    for (idx, fact) in filing.facts.iter().enumerate() {
        let location = format!("facts[{idx}]");
        let mut push = |message: String| {
            violations.push(SchemaViolation {
                location: location.clone(),
                message,
            })
        };

        if !seen_ids.insert(fact.id.as_str()) {
            push(format!("duplicate fact id '{}'", fact.id));
        }
        if !is_qname(&fact.concept) {
            push(format!(
                "fact {} has invalid concept '{}' (expected prefix:LocalName)",
                fact.id, fact.concept
            ));
        }
        if !filing.contexts.contains_key(&fact.context_id) {
            push(format!(
                "fact {} references unknown context '{}'",
                fact.id, fact.context_id
            ));
        }
        if let Some(value) = fact.numeric_value()
            && !value.is_finite()
        {
            push(format!("fact {} has a non-finite numeric value", fact.id));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { violations })
    }
}

fn check_context(id: &str, ctx: &Context, out: &mut Vec<SchemaViolation>) {
    let location = format!("contexts.{id}");
    let mut push = |message: String| {
        out.push(SchemaViolation {
            location: location.clone(),
            message,
        })
    };

    match ctx.period() {
        Some(PeriodType::Instant) => {
            match ctx.instant.as_deref() {
                Some(raw) => {
                    checked_date("instant", raw, &mut push);
                }
                None => push("instant context has no instant date".to_string()),
            }
            if ctx.start_date.is_some() || ctx.end_date.is_some() {
                push("instant context must not carry start_date/end_date".to_string());
            }
        }
        Some(PeriodType::Duration) => {
            if ctx.instant.is_some() {
                push("duration context must not carry an instant date".to_string());
            }
            match (ctx.start_date.as_deref(), ctx.end_date.as_deref()) {
                (Some(start), Some(end)) => {
                    let start_date = checked_date("start_date", start, &mut push);
                    let end_date = checked_date("end_date", end, &mut push);
                    if let (Some(s), Some(e)) = (start_date, end_date)
                        && s > e
                    {
                        push(format!("start_date {start} is after end_date {end}"));
                    }
                }
                _ => push("duration context needs both start_date and end_date".to_string()),
            }
        }
        None => push(format!(
            "unsupported period_type '{}' (expected instant or duration)",
            ctx.period_type
        )),
    }
}

fn checked_date(field: &str, raw: &str, push: &mut dyn FnMut(String)) -> Option<Date> {
    let parsed = parse_date(raw);
    if parsed.is_none() {
        push(format!("{field} '{raw}' is not a YYYY-MM-DD date"));
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{duration_context, fact_text, filing, instant_context, numeric_fact};

    #[test]
    fn qname_shapes() {
        assert!(is_qname("us-gaap:Assets"));
        assert!(is_qname("_x:y.z-1"));
        assert!(!is_qname("Assets"));
        assert!(!is_qname("1abc:Assets"));
        assert!(!is_qname("abc:"));
        assert!(!is_qname("a:b:c"));
    }

    #[test]
    fn valid_filing_passes() {
        let f = filing(
            vec![
                ("i", instant_context("2025-12-31")),
                ("d", duration_context("2025-01-01", "2025-12-31")),
            ],
            vec![numeric_fact("f1", "us-gaap:Assets", "i", 10.0, Some(0))],
        );
        assert!(validate_filing(&f).is_ok());
    }

    #[test]
    fn collects_all_violations_in_filing_order() {
        let mut bad_instant = instant_context("2025-12-31");
        bad_instant.start_date = Some("2025-01-01".to_string());
        let f = filing(
            vec![
                ("a", bad_instant),
                ("b", duration_context("2025-12-31", "2025-01-01")),
            ],
            vec![
                fact_text("f1", "Assets", "a", "x"),
                fact_text("f1", "dei:DocumentType", "missing", "10-K"),
            ],
        );
        let err = validate_filing(&f).unwrap_err();
        let locations: Vec<_> = err.violations.iter().map(|v| v.location.as_str()).collect();
        assert_eq!(
            locations,
            vec!["contexts.a", "contexts.b", "facts[0]", "facts[1]", "facts[1]"]
        );
        assert!(err.violations[1].message.contains("after end_date"));
        assert!(err.violations[3].message.contains("duplicate fact id"));
    }

    #[test]
    fn invalid_dates_and_period_types_are_rejected() {
        let mut odd = instant_context("2025-12-31");
        odd.period_type = "forever".to_string();
        let f = filing(
            vec![("bad-date", instant_context("2025-02-30")), ("odd", odd)],
            vec![],
        );
        let err = validate_filing(&f).unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert!(err.violations[0].message.contains("not a YYYY-MM-DD date"));
        assert!(err.violations[1].message.contains("unsupported period_type"));
    }

    #[test]
    fn non_finite_numeric_text_is_rejected() {
        let mut fact = fact_text("f1", "us-gaap:Assets", "i", "NaN");
        fact.unit = Some("USD".to_string());
        let f = filing(vec![("i", instant_context("2025-12-31"))], vec![fact]);
        let err = validate_filing(&f).unwrap_err();
        assert!(err.violations[0].message.contains("non-finite"));
    }
}
