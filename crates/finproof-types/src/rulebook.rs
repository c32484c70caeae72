//! Machine-readable rule catalog.

use crate::report::Severity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_RULEBOOK_V1: &str = "finproof.rulebook.v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Rulebook {
    pub schema: String,
    pub rule_set_version: String,
    /// Set when the catalog is restricted to one profile (and ordered like it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    pub rules: Vec<RulebookEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RulebookEntry {
    pub code: String,
    pub title: String,
    pub category: String,
    /// Body of requirements the rule is derived from.
    pub reference_family: String,
    pub default_severity: Severity,
    pub description: String,
    /// Finding fields (and `refs.<kind>` entries) this rule's findings fill in.
    pub evidence_fields: Vec<String>,
    /// Profiles that run this rule, by name.
    #[serde(default)]
    pub profiles: Vec<String>,
}

/// Catalog metadata shared by every rule with the same code prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleFamily {
    pub category: &'static str,
    pub reference_family: &'static str,
    pub evidence_fields: &'static [&'static str],
}

const FAMILIES: &[(&str, RuleFamily)] = &[
    (
        "xbrl.",
        RuleFamily {
            category: "xbrl_core_integrity",
            reference_family: "XBRL 2.1 + EDGAR acceptance constraints",
            evidence_fields: &["code", "kind", "severity", "message", "refs.fact", "refs.context", "data"],
        },
    ),
    (
        "dei.",
        RuleFamily {
            category: "dei_metadata_consistency",
            reference_family: "DEI taxonomy + SEC filing metadata requirements",
            evidence_fields: &["code", "kind", "severity", "message", "refs.concept", "data"],
        },
    ),
    (
        "acct.",
        RuleFamily {
            category: "accounting_consistency",
            reference_family: "Issuer financial statement consistency checks",
            evidence_fields: &["code", "kind", "severity", "message", "refs.fact", "refs.context", "data"],
        },
    ),
    (
        "taxonomy.",
        RuleFamily {
            category: "custom_taxonomy_validation",
            reference_family: "SEC EDGAR XBRL Guide (custom taxonomy checks)",
            evidence_fields: &["code", "kind", "severity", "message", "refs.concept", "refs.namespace", "data"],
        },
    ),
    (
        "ixbrl.",
        RuleFamily {
            category: "inline_xbrl_structural",
            reference_family: "SEC EDGAR XBRL Guide (Inline XBRL validations)",
            evidence_fields: &["code", "kind", "severity", "message", "refs.document", "data"],
        },
    ),
];

const GENERAL: RuleFamily = RuleFamily {
    category: "general_validation",
    reference_family: "finproof internal validation policy",
    evidence_fields: &["code", "kind", "severity", "message", "refs", "data"],
};

/// Family of a rule code, by prefix.
pub fn rule_family(code: &str) -> RuleFamily {
    FAMILIES
        .iter()
        .find(|(prefix, _)| code.starts_with(prefix))
        .map(|(_, family)| *family)
        .unwrap_or(GENERAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{all_rule_codes, ids};

    #[test]
    fn every_registered_rule_has_a_specific_family() {
        for code in all_rule_codes() {
            assert_ne!(rule_family(code), GENERAL, "{code}");
        }
    }

    #[test]
    fn family_is_chosen_by_prefix() {
        let acct = rule_family(ids::RULE_ACCT_BALANCE_SHEET_EQUATION);
        assert_eq!(acct.category, "accounting_consistency");
        assert!(acct.evidence_fields.contains(&"refs.fact"));
        assert_eq!(rule_family(ids::RULE_XBRL_DECIMALS_FORMAT).category, "xbrl_core_integrity");
        assert_eq!(rule_family("ixbrlish.rule"), GENERAL);
    }
}
