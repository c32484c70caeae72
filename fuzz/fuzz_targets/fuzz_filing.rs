//! Fuzz target for filing parsing and evaluation.
//!
//! Goal: parsing, structural validation and a full-profile run should **never panic**.
//! Any input may be rejected with an error, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_filing
//! ```

#![no_main]

use finproof_app::{Validator, load_config, parse_filing};
use finproof_settings::Overrides;
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

fn validator() -> Option<&'static Validator> {
    static VALIDATOR: OnceLock<Option<Validator>> = OnceLock::new();
    VALIDATOR
        .get_or_init(|| {
            let overrides = Overrides {
                profile: Some("full".to_string()),
                ..Overrides::default()
            };
            load_config("", overrides)
                .and_then(Validator::new)
                .ok()
        })
        .as_ref()
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(filing) = parse_filing(text) else {
        return;
    };
    if let Some(validator) = validator() {
        // Should never panic - errors are fine
        let _ = validator.validate(&filing);
    }
});
