use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `finproof.toml` schema v1.
///
/// Every key is optional; unset keys fall back to the built-in defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinproofConfigV1 {
    /// Optional schema string for tooling (`finproof.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Profile used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Wall-clock budget for one run, in milliseconds. Unset means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<ToleranceSetting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing: Option<SigningConfig>,

    /// Custom profiles, keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

/// Rounding tolerance for arithmetic comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceSetting {
    /// Half a unit of the least precise term.
    CoarsestHalfUnit,
    /// Sum of every term's half unit.
    AccumulatedHalfUnit,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SigningConfig {
    /// Identifier recorded in issued certificates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    /// Environment variable holding the HMAC secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_env: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProfileConfig {
    /// Rule codes, executed in this order.
    #[serde(default)]
    pub rules: Vec<String>,
}
