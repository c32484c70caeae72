//! Immutable rule table and profile table.
//!
//! Built once and shared by reference (or `Arc`) across concurrent runs; there is
//! no way to mutate it after construction.

use crate::arithmetic::TolerancePolicy;
use crate::checks;
use crate::rule::Rule;
use std::collections::{BTreeMap, BTreeSet};

/// Ordered, named list of rule codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub rules: Vec<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>, rules: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            rules: rules.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown profile '{name}'")]
    UnknownProfile { name: String },

    #[error("unknown rule code '{code}'{}", .profile.as_ref().map(|p| format!(" in profile '{p}'")).unwrap_or_default())]
    UnknownRuleCode { code: String, profile: Option<String> },

    #[error("rule code '{code}' is registered twice")]
    DuplicateRuleCode { code: String },

    #[error("profile '{profile}' lists rule '{code}' more than once")]
    DuplicateProfileEntry { profile: String, code: String },

    #[error("profile '{name}' is defined twice")]
    DuplicateProfile { name: String },

    #[error("profile '{name}' has no rules")]
    EmptyProfile { name: String },
}

pub struct RuleRegistry {
    rule_set_version: String,
    rules: BTreeMap<&'static str, Box<dyn Rule>>,
    profiles: BTreeMap<String, Profile>,
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rule_set_version", &self.rule_set_version)
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .field("profiles", &self.profiles.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RuleRegistry {
    /// Register `rules` and `profiles`, validating every profile entry up front.
    pub fn new(
        rule_set_version: impl Into<String>,
        rules: Vec<Box<dyn Rule>>,
        profiles: Vec<Profile>,
    ) -> Result<Self, RegistryError> {
        let mut table: BTreeMap<&'static str, Box<dyn Rule>> = BTreeMap::new();
        for rule in rules {
            let code = rule.code();
            if table.insert(code, rule).is_some() {
                return Err(RegistryError::DuplicateRuleCode {
                    code: code.to_string(),
                });
            }
        }

        let mut by_name = BTreeMap::new();
        for profile in profiles {
            if profile.rules.is_empty() {
                return Err(RegistryError::EmptyProfile { name: profile.name });
            }
            let mut seen = BTreeSet::new();
            for code in &profile.rules {
                if !table.contains_key(code.as_str()) {
                    return Err(RegistryError::UnknownRuleCode {
                        code: code.clone(),
                        profile: Some(profile.name.clone()),
                    });
                }
                if !seen.insert(code.as_str()) {
                    return Err(RegistryError::DuplicateProfileEntry {
                        profile: profile.name.clone(),
                        code: code.clone(),
                    });
                }
            }
            if by_name.contains_key(&profile.name) {
                return Err(RegistryError::DuplicateProfile { name: profile.name });
            }
            by_name.insert(profile.name.clone(), profile);
        }

        Ok(Self {
            rule_set_version: rule_set_version.into(),
            rules: table,
            profiles: by_name,
        })
    }

    /// Registry over the built-in rule catalog.
    pub fn builtin(
        rule_set_version: impl Into<String>,
        tolerance: TolerancePolicy,
        profiles: Vec<Profile>,
    ) -> Result<Self, RegistryError> {
        Self::new(rule_set_version, checks::builtin_rules(tolerance), profiles)
    }

    pub fn rule_set_version(&self) -> &str {
        &self.rule_set_version
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, RegistryError> {
        self.profiles
            .get(name)
            .ok_or_else(|| RegistryError::UnknownProfile {
                name: name.to_string(),
            })
    }

    pub fn rule(&self, code: &str) -> Result<&dyn Rule, RegistryError> {
        self.rules
            .get(code)
            .map(|r| r.as_ref())
            .ok_or_else(|| RegistryError::UnknownRuleCode {
                code: code.to_string(),
                profile: None,
            })
    }

    /// Rules of `profile`, in profile order.
    pub fn resolve(&self, profile: &str) -> Result<Vec<&dyn Rule>, RegistryError> {
        let profile = self.profile(profile)?;
        profile.rules.iter().map(|code| self.rule(code)).collect()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// Every registered rule, ordered by code.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.values().map(|r| r.as_ref())
    }
}
