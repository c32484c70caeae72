use finproof_domain::{Engine, Filing, Profile, RuleRegistry, RunOutput, TolerancePolicy};
use finproof_types::{all_rule_codes, ids};
use serde_json::json;

const FSD_RULES: &[&str] = &[
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

pub fn registry() -> RuleRegistry {
    RuleRegistry::builtin(
        "2026.1",
        TolerancePolicy::default(),
        vec![
            Profile::new("fsd-consistency", FSD_RULES.iter().copied()),
            Profile::new("full", all_rule_codes().iter().copied()),
        ],
    )
    .expect("builtin registry")
}

fn balance_filing(assets: i64, liabilities: i64, equity: i64) -> Filing {
    let doc = json!({
        "accession": "0000320193-26-000001",
        "cik": "0000320193",
        "entity": "Example Corp",
        "period_end": "2025-12-31",
        "taxonomy": "us-gaap-2025",
        "contexts": {
            "d2025": { "period_type": "duration", "start_date": "2025-01-01", "end_date": "2025-12-31" },
            "i2025": { "period_type": "instant", "instant": "2025-12-31" }
        },
        "facts": [
            { "id": "dei-type", "concept": "dei:DocumentType", "context_id": "d2025", "value": "10-K" },
            { "id": "dei-name", "concept": "dei:EntityRegistrantName", "context_id": "d2025", "value": "Example Corp" },
            { "id": "dei-cik", "concept": "dei:EntityCentralIndexKey", "context_id": "d2025", "value": "320193" },
            { "id": "assets", "concept": "us-gaap:Assets", "context_id": "i2025", "value": assets, "unit": "USD", "decimals": 0 },
            { "id": "liabilities", "concept": "us-gaap:Liabilities", "context_id": "i2025", "value": liabilities, "unit": "USD", "decimals": 0 },
            { "id": "equity", "concept": "us-gaap:StockholdersEquity", "context_id": "i2025", "value": equity, "unit": "USD", "decimals": 0 },
            { "id": "revenue", "concept": "us-gaap:Revenues", "context_id": "d2025", "value": 5000, "unit": "USD", "decimals": 0 }
        ]
    });
    Filing::from_json(&doc.to_string()).expect("filing fixture")
}

/// Balanced sheet, every consistency rule passes.
pub fn clean_filing() -> Filing {
    balance_filing(1000, 600, 400)
}

/// Negative assets that do not balance: one error and one warning.
pub fn risky_filing() -> Filing {
    balance_filing(-1000, 600, 400)
}

fn run(filing: &Filing) -> RunOutput {
    let registry = registry();
    Engine::new(&registry)
        .run(filing, "fsd-consistency")
        .expect("engine run")
}

pub fn clean_run() -> RunOutput {
    run(&clean_filing())
}

pub fn risky_run() -> RunOutput {
    run(&risky_filing())
}
