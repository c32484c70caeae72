use crate::arithmetic::TolerancePolicy;
use crate::checks::builtin_rules;
use crate::model::{Context, Decimals, Element, Fact, FactValue, Filing, Relationship};
use crate::registry::{Profile, RuleRegistry};
use crate::rule::Rule;
use finproof_types::{Finding, Severity, ids};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

pub const FSD_RULES: &[&str] = &[
    ids::RULE_XBRL_NUMERIC_FACT_UNIT,
    ids::RULE_XBRL_DECIMALS_FORMAT,
    ids::RULE_XBRL_DUPLICATE_FACT_CONFLICT,
    ids::RULE_XBRL_UNIT_CONSISTENCY,
    ids::RULE_XBRL_DIMENSION_CONTEXT_CONSISTENCY,
    ids::RULE_DEI_REQUIRED_CONCEPTS,
    ids::RULE_DEI_METADATA_CONSISTENCY,
    ids::RULE_ACCT_BALANCE_SHEET_EQUATION,
    ids::RULE_ACCT_ASSETS_NEGATIVE,
    ids::RULE_ACCT_CONCEPT_PERIOD_TYPE,
];

pub fn filing(contexts: Vec<(&str, Context)>, facts: Vec<Fact>) -> Filing {
    Filing {
        contexts: contexts
            .into_iter()
            .map(|(id, ctx)| (id.to_string(), ctx))
            .collect(),
        facts,
        ..Filing::default()
    }
}

pub fn instant_context(date: &str) -> Context {
    Context {
        period_type: "instant".to_string(),
        instant: Some(date.to_string()),
        ..Context::default()
    }
}

pub fn duration_context(start: &str, end: &str) -> Context {
    Context {
        period_type: "duration".to_string(),
        start_date: Some(start.to_string()),
        end_date: Some(end.to_string()),
        ..Context::default()
    }
}

pub fn fact_text(id: &str, concept: &str, context_id: &str, text: &str) -> Fact {
    Fact {
        id: id.to_string(),
        concept: concept.to_string(),
        context_id: context_id.to_string(),
        value: Some(FactValue::Text(text.to_string())),
        unit: None,
        decimals: None,
        dimensions: BTreeMap::new(),
        source: BTreeMap::new(),
    }
}

pub fn numeric_fact(
    id: &str,
    concept: &str,
    context_id: &str,
    value: f64,
    decimals: Option<i32>,
) -> Fact {
    Fact {
        value: serde_json::Number::from_f64(value).map(FactValue::Number),
        unit: Some("USD".to_string()),
        decimals: decimals.map(Decimals::Exact),
        ..fact_text(id, concept, context_id, "")
    }
}

/// Filing that passes every consistency rule, with the given balance sheet totals.
pub fn balance_filing(assets: f64, liabilities: f64, equity: f64) -> Filing {
    let mut f = filing(
        vec![
            ("d2025", duration_context("2025-01-01", "2025-12-31")),
            ("i2025", instant_context("2025-12-31")),
        ],
        vec![
            fact_text("dei-type", "dei:DocumentType", "d2025", "10-K"),
            fact_text("dei-name", "dei:EntityRegistrantName", "d2025", "Example Corp"),
            fact_text("dei-cik", "dei:EntityCentralIndexKey", "d2025", "320193"),
            numeric_fact("assets", "us-gaap:Assets", "i2025", assets, Some(0)),
            numeric_fact("liabilities", "us-gaap:Liabilities", "i2025", liabilities, Some(0)),
            numeric_fact("equity", "us-gaap:StockholdersEquity", "i2025", equity, Some(0)),
            numeric_fact("revenue", "us-gaap:Revenues", "d2025", 5000.0, Some(0)),
        ],
    );
    f.accession = Some("0000320193-26-000001".to_string());
    f.cik = Some("0000320193".to_string());
    f.entity = Some("Example Corp".to_string());
    f.period_end = Some("2025-12-31".to_string());
    f.taxonomy = Some("us-gaap-2025".to_string());
    f
}

pub fn clean_filing() -> Filing {
    balance_filing(1000.0, 600.0, 400.0)
}

pub fn element(concept: &str, is_custom: bool) -> Element {
    Element {
        concept: Some(concept.to_string()),
        is_custom,
        ..Element::default()
    }
}

pub fn relationship(from: &str, to: &str, arcrole: &str) -> Relationship {
    Relationship {
        from: from.to_string(),
        to: to.to_string(),
        arcrole: Some(arcrole.to_string()),
        weight: None,
    }
}

pub fn finding(seq: u64, severity: Severity) -> Finding {
    Finding {
        seq,
        code: ids::RULE_ACCT_ASSETS_NEGATIVE.to_string(),
        kind: ids::KIND_NEGATIVE_VALUE.to_string(),
        severity,
        message: format!("finding {seq}"),
        refs: Vec::new(),
        data: JsonValue::Null,
    }
}

/// Built-in rules plus `extra`, with `profiles` registered under version "test".
pub fn registry_with(extra: Vec<Box<dyn Rule>>, profiles: Vec<Profile>) -> RuleRegistry {
    let mut rules = builtin_rules(TolerancePolicy::default());
    rules.extend(extra);
    RuleRegistry::new("test", rules, profiles).expect("test registry")
}

/// Built-in rules with an `fsd` consistency profile and a `full` profile.
pub fn test_registry() -> RuleRegistry {
    registry_with(
        vec![],
        vec![
            Profile::new("fsd", FSD_RULES.iter().copied()),
            Profile::new("full", finproof_types::all_rule_codes().iter().copied()),
        ],
    )
}
