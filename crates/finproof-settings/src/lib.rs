//! Config parsing and profile resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{FinproofConfigV1, ProfileConfig, SigningConfig, ToleranceSetting};
pub use presets::{Builtins, builtins};
pub use resolve::{
    DEFAULT_KEY_ID, DEFAULT_SECRET_ENV, Overrides, ResolvedConfig, SigningSettings,
};

/// Parse `finproof.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<FinproofConfigV1> {
    let cfg: FinproofConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config: built-in profiles, custom profiles and overrides.
pub fn resolve_config(
    cfg: FinproofConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
