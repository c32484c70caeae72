use crate::model::{FinproofConfigV1, ToleranceSetting};
use crate::presets;
use anyhow::Context;
use finproof_domain::{Profile, RuleRegistry, TolerancePolicy};
use std::time::Duration;

pub const DEFAULT_KEY_ID: &str = "default";
pub const DEFAULT_SECRET_ENV: &str = "FINPROOF_SIGNING_SECRET";

const ACCUMULATED_SUFFIX: &str = "+tol.accumulated";

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub time_budget_ms: Option<u64>,
    pub tolerance: Option<ToleranceSetting>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningSettings {
    pub key_id: String,
    pub secret_env: String,
}

/// Effective configuration for one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub profile: String,
    pub rule_set_version: String,
    pub tolerance: TolerancePolicy,
    pub time_budget: Option<Duration>,
    pub signing: SigningSettings,
    /// Built-in profiles followed by custom ones.
    pub profiles: Vec<Profile>,
}

impl ResolvedConfig {
    /// Registry over the built-in catalog with every resolved profile.
    pub fn registry(&self) -> anyhow::Result<RuleRegistry> {
        RuleRegistry::builtin(
            self.rule_set_version.clone(),
            self.tolerance,
            self.profiles.clone(),
        )
        .context("build rule registry")
    }
}

impl From<ToleranceSetting> for TolerancePolicy {
    fn from(setting: ToleranceSetting) -> Self {
        match setting {
            ToleranceSetting::CoarsestHalfUnit => TolerancePolicy::CoarsestHalfUnit,
            ToleranceSetting::AccumulatedHalfUnit => TolerancePolicy::AccumulatedHalfUnit,
        }
    }
}

pub fn resolve_config(
    cfg: FinproofConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let builtins = presets::builtins()?;

    let tolerance: TolerancePolicy = overrides
        .tolerance
        .or(cfg.tolerance)
        .map(Into::into)
        .unwrap_or_default();
    let rule_set_version = match tolerance {
        TolerancePolicy::CoarsestHalfUnit => builtins.rule_set_version.clone(),
        TolerancePolicy::AccumulatedHalfUnit => {
            format!("{}{ACCUMULATED_SUFFIX}", builtins.rule_set_version)
        }
    };

    let mut profiles = builtins.profiles.clone();
    for (name, custom) in cfg.profiles {
        if builtins.contains(&name) {
            anyhow::bail!("custom profile '{name}' shadows a built-in profile");
        }
        profiles.push(Profile::new(name, custom.rules));
    }

    let profile = overrides
        .profile
        .or(cfg.profile)
        .unwrap_or_else(|| builtins.default_profile.clone());

    let time_budget = overrides
        .time_budget_ms
        .or(cfg.time_budget_ms)
        .map(Duration::from_millis);

    let signing = cfg.signing.unwrap_or_default();
    let signing = SigningSettings {
        key_id: signing.key_id.unwrap_or_else(|| DEFAULT_KEY_ID.to_string()),
        secret_env: signing
            .secret_env
            .unwrap_or_else(|| DEFAULT_SECRET_ENV.to_string()),
    };

    Ok(ResolvedConfig {
        profile,
        rule_set_version,
        tolerance,
        time_budget,
        signing,
        profiles,
    })
}
