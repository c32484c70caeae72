//! Fuzz target for the balance sheet arithmetic.
//!
//! Goal: any combination of values and decimals evaluates without panicking,
//! and two runs over the same filing agree byte for byte.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_balance_sheet
//! ```

#![no_main]

use arbitrary::Arbitrary;
use finproof_app::{Validator, load_config, parse_filing};
use finproof_settings::Overrides;
use libfuzzer_sys::fuzz_target;
use serde_json::json;

/// Structured input: one fact per balance sheet concept.
#[derive(Arbitrary, Debug)]
struct BalanceInput {
    assets: i64,
    liabilities: i64,
    equity: i64,
    assets_decimals: Option<i8>,
    liabilities_decimals: Option<i8>,
    equity_decimals: Option<i8>,
    accumulated: bool,
}

fn fact(concept: &str, value: i64, decimals: Option<i8>) -> serde_json::Value {
    let mut fact = json!({
        "concept": concept,
        "context_id": "i",
        "value": value,
        "unit": "USD",
    });
    if let Some(d) = decimals {
        fact["decimals"] = json!(d);
    }
    fact
}

fuzz_target!(|input: BalanceInput| {
    let doc = json!({
        "cik": "1",
        "entity": "Fuzz",
        "contexts": { "i": { "period_type": "instant", "instant": "2025-12-31" } },
        "facts": [
            fact("us-gaap:Assets", input.assets, input.assets_decimals),
            fact("us-gaap:Liabilities", input.liabilities, input.liabilities_decimals),
            fact("us-gaap:StockholdersEquity", input.equity, input.equity_decimals),
        ],
    });
    let Ok(filing) = parse_filing(&doc.to_string()) else {
        return;
    };
    let overrides = Overrides {
        tolerance: input
            .accumulated
            .then_some(finproof_settings::ToleranceSetting::AccumulatedHalfUnit),
        ..Overrides::default()
    };
    let Ok(validator) = load_config("", overrides).and_then(Validator::new) else {
        return;
    };

    let first = validator.validate(&filing);
    let second = validator.validate(&filing);
    if let (Ok(a), Ok(b)) = (first, second) {
        assert_eq!(a, b, "evaluation is not deterministic");
    }
});
