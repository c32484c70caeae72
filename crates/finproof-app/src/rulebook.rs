//! The `rulebook` use case: the machine-readable rule catalog.

use crate::validate::Validator;
use finproof_domain::{EngineError, Rule};
use finproof_types::{
    Rulebook, RulebookEntry, SCHEMA_RULEBOOK_V1, lookup_explanation, rule_family,
};

fn entry(validator: &Validator, rule: &dyn Rule) -> RulebookEntry {
    let code = rule.code();
    let family = rule_family(code);
    RulebookEntry {
        code: code.to_string(),
        title: lookup_explanation(code)
            .map(|exp| exp.title.to_string())
            .unwrap_or_else(|| code.to_string()),
        category: family.category.to_string(),
        reference_family: family.reference_family.to_string(),
        default_severity: rule.default_severity(),
        description: rule.description().to_string(),
        evidence_fields: family
            .evidence_fields
            .iter()
            .map(|field| field.to_string())
            .collect(),
        profiles: validator
            .registry()
            .profiles()
            .filter(|p| p.rules.iter().any(|r| r == code))
            .map(|p| p.name.clone())
            .collect(),
    }
}

/// Catalog of every registered rule ordered by code, or of one profile in run order.
pub fn run_rulebook(validator: &Validator, profile: Option<&str>) -> Result<Rulebook, EngineError> {
    let registry = validator.registry();
    let rules: Vec<&dyn Rule> = match profile {
        Some(name) => registry.resolve(name)?,
        None => registry.rules().collect(),
    };
    Ok(Rulebook {
        schema: SCHEMA_RULEBOOK_V1.to_string(),
        rule_set_version: registry.rule_set_version().to_string(),
        profile: profile.map(str::to_string),
        rules: rules.into_iter().map(|rule| entry(validator, rule)).collect(),
    })
}
