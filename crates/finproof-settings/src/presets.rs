use anyhow::Context;
use finproof_domain::Profile;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Built-in profile table, versioned with the rule set.
const BUILTIN_PROFILES: &str = include_str!("../data/profiles.toml");

#[derive(Clone, Debug, Deserialize)]
struct BuiltinTable {
    rule_set_version: String,
    default_profile: String,
    profiles: BTreeMap<String, BuiltinProfile>,
}

#[derive(Clone, Debug, Deserialize)]
struct BuiltinProfile {
    rules: Vec<String>,
}

/// Parsed built-in profiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Builtins {
    pub rule_set_version: String,
    pub default_profile: String,
    pub profiles: Vec<Profile>,
}

impl Builtins {
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.iter().any(|p| p.name == name)
    }
}

pub fn builtins() -> anyhow::Result<Builtins> {
    let table: BuiltinTable =
        toml::from_str(BUILTIN_PROFILES).context("parse built-in profile table")?;
    Ok(Builtins {
        rule_set_version: table.rule_set_version,
        default_profile: table.default_profile,
        profiles: table
            .profiles
            .into_iter()
            .map(|(name, p)| Profile::new(name, p.rules))
            .collect(),
    })
}
