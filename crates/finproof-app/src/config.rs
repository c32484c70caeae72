//! Config loading and signing-key lookup.
//!
//! Secrets come from the environment variable named in the config. The lookup is
//! passed in so callers (and tests) decide where variables come from.

use anyhow::Context;
use finproof_evidence::{CertificateSigner, Keyring};
use finproof_settings::{FinproofConfigV1, Overrides, ResolvedConfig, SigningSettings};
use tracing::debug;

/// Parse `config_text` (empty means defaults) and resolve it with `overrides`.
pub fn load_config(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        FinproofConfigV1::default()
    } else {
        finproof_settings::parse_config_toml(config_text).context("parse config")?
    };
    finproof_settings::resolve_config(cfg, overrides).context("resolve config")
}

fn secret<F>(signing: &SigningSettings, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&signing.secret_env).filter(|s| !s.is_empty())
}

/// Signer for the configured key, or `None` when its secret variable is unset or empty.
pub fn signer_from_env<F>(
    signing: &SigningSettings,
    lookup: F,
) -> anyhow::Result<Option<CertificateSigner>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(secret) = secret(signing, lookup) else {
        debug!(secret_env = %signing.secret_env, "no signing secret; certificates disabled");
        return Ok(None);
    };
    let signer = CertificateSigner::new(signing.key_id.clone(), secret.into_bytes())
        .context("load signing key")?;
    Ok(Some(signer))
}

/// Keyring holding the configured key, empty when its secret variable is unset.
pub fn keyring_from_env<F>(signing: &SigningSettings, lookup: F) -> anyhow::Result<Keyring>
where
    F: Fn(&str) -> Option<String>,
{
    let mut keyring = Keyring::new();
    if let Some(secret) = secret(signing, lookup) {
        keyring
            .insert(signing.key_id.clone(), secret.into_bytes())
            .context("load verification key")?;
    }
    Ok(keyring)
}
