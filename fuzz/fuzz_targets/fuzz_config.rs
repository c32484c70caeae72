//! Fuzz target for config parsing and resolution.
//!
//! Goal: `finproof.toml` parsing should **never panic** on any input.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only test valid UTF-8 strings (TOML must be UTF-8)
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = finproof_app::load_config(text, finproof_settings::Overrides::default());
    }
});
