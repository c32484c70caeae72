use crate::arithmetic::{TolerancePolicy, tolerance, within_tolerance};
use crate::model::{Decimals, Fact, Filing};
use crate::rule::{Rule, RuleFault, RuleFinding};
use finproof_types::{Ref, Severity, ids};
use serde_json::json;
use std::collections::BTreeMap;

type DimensionKey = Vec<(String, String)>;

fn dimension_key(fact: &Fact) -> DimensionKey {
    fact.dimensions
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn fact_ref(fact: &Fact) -> Ref {
    Ref::Fact(fact.id.clone())
}

pub struct NumericFactUnit;

impl Rule for NumericFactUnit {
    fn code(&self) -> &'static str {
        ids::RULE_XBRL_NUMERIC_FACT_UNIT
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Numeric facts must declare a unit."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let mut out = Vec::new();
        for fact in &filing.facts {
            let missing_unit = fact.unit.as_deref().is_none_or(|u| u.trim().is_empty());
            if fact.numeric_value().is_some() && missing_unit {
                out.push(
                    RuleFinding::new(
                        ids::KIND_MISSING_UNIT,
                        self.default_severity(),
                        format!("numeric fact {} ({}) has no unit", fact.id, fact.concept),
                    )
                    .with_ref(fact_ref(fact)),
                );
            }
        }
        Ok(out)
    }
}

pub struct DecimalsFormat;

impl Rule for DecimalsFormat {
    fn code(&self) -> &'static str {
        ids::RULE_XBRL_DECIMALS_FORMAT
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Decimals on numeric facts must be an integer or INF."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let mut out = Vec::new();
        for fact in &filing.facts {
            if fact.numeric_value().is_none() {
                continue;
            }
            if let Some(Decimals::Unparsed(raw)) = &fact.decimals {
                out.push(
                    RuleFinding::new(
                        ids::KIND_INVALID_DECIMALS,
                        self.default_severity(),
                        format!("fact {} has invalid decimals '{}'", fact.id, raw),
                    )
                    .with_ref(fact_ref(fact))
                    .with_data(json!({ "decimals": raw })),
                );
            }
        }
        Ok(out)
    }
}

pub struct DuplicateFactConflict;

impl DuplicateFactConflict {
    /// Each reading may be off by its own rounding, so a pair agrees within the sum of
    /// both half units whatever policy the equations use.
    fn values_agree(&self, a: &Fact, b: &Fact) -> bool {
        match (a.numeric_value(), b.numeric_value()) {
            (Some(x), Some(y)) => {
                let tol = tolerance(
                    TolerancePolicy::AccumulatedHalfUnit,
                    [a.decimals.as_ref(), b.decimals.as_ref()],
                );
                within_tolerance(x, y, tol)
            }
            _ => a.text_value() == b.text_value(),
        }
    }
}

impl Rule for DuplicateFactConflict {
    fn code(&self) -> &'static str {
        ids::RULE_XBRL_DUPLICATE_FACT_CONFLICT
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Facts sharing concept, context, unit and dimensions must agree."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let mut out = Vec::new();
        let mut first: BTreeMap<(&str, &str, &str, DimensionKey), &Fact> = BTreeMap::new();
        for fact in &filing.facts {
            let key = (
                fact.concept.as_str(),
                fact.context_id.as_str(),
                fact.unit.as_deref().unwrap_or(""),
                dimension_key(fact),
            );
            let Some(prior) = first.get(&key) else {
                first.insert(key, fact);
                continue;
            };
            if !self.values_agree(prior, fact) {
                out.push(
                    RuleFinding::new(
                        ids::KIND_DUPLICATE_CONFLICT,
                        self.default_severity(),
                        format!(
                            "facts {} and {} report {} for the same context with different values",
                            prior.id, fact.id, fact.concept
                        ),
                    )
                    .with_refs([fact_ref(prior), fact_ref(fact)])
                    .with_data(json!({
                        "first_value": prior.text_value(),
                        "second_value": fact.text_value(),
                    })),
                );
            }
        }
        Ok(out)
    }
}

pub struct UnitConsistency;

impl Rule for UnitConsistency {
    fn code(&self) -> &'static str {
        ids::RULE_XBRL_UNIT_CONSISTENCY
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Numeric facts of one concept, context and dimensions use a single unit."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let mut out = Vec::new();
        let mut first: BTreeMap<(&str, &str, DimensionKey), &Fact> = BTreeMap::new();
        for fact in &filing.facts {
            if fact.numeric_value().is_none() {
                continue;
            }
            let key = (
                fact.concept.as_str(),
                fact.context_id.as_str(),
                dimension_key(fact),
            );
            let Some(prior) = first.get(&key) else {
                first.insert(key, fact);
                continue;
            };
            let prior_unit = prior.unit.as_deref().unwrap_or("");
            let unit = fact.unit.as_deref().unwrap_or("");
            if prior_unit != unit {
                out.push(
                    RuleFinding::new(
                        ids::KIND_UNIT_MISMATCH,
                        self.default_severity(),
                        format!(
                            "facts {} and {} report {} in different units ('{}' vs '{}')",
                            prior.id, fact.id, fact.concept, prior_unit, unit
                        ),
                    )
                    .with_refs([fact_ref(prior), fact_ref(fact)]),
                );
            }
        }
        Ok(out)
    }
}

pub struct DimensionContextConsistency;

impl Rule for DimensionContextConsistency {
    fn code(&self) -> &'static str {
        ids::RULE_XBRL_DIMENSION_CONTEXT_CONSISTENCY
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Fact dimensions must not contradict their context's dimensions."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let mut out = Vec::new();
        for fact in &filing.facts {
            let Some(context) = filing.context(&fact.context_id) else {
                continue;
            };
            for (axis, member) in &fact.dimensions {
                let Some(context_member) = context.dimensions.get(axis) else {
                    continue;
                };
                if context_member != member {
                    out.push(
                        RuleFinding::new(
                            ids::KIND_DIMENSION_CONFLICT,
                            self.default_severity(),
                            format!(
                                "fact {} sets {} to '{}' but context {} sets '{}'",
                                fact.id, axis, member, fact.context_id, context_member
                            ),
                        )
                        .with_refs([fact_ref(fact), Ref::Context(fact.context_id.clone())])
                        .with_data(json!({ "dimension": axis })),
                    );
                }
            }
        }
        Ok(out)
    }
}
