use crate::arithmetic::{Equation, Evaluation, TermValue, TolerancePolicy, evaluate_equation};
use crate::claims::equation_claims;
use crate::model::{Filing, PeriodType};
use crate::rule::{Rule, RuleFault, RuleFinding};
use finproof_types::{ArithmeticClaim, Ref, Severity, ids};
use serde_json::json;

const ASSETS_CONCEPTS: &[&str] = &["us-gaap:Assets", "ifrs-full:Assets"];

const INSTANT_HINTS: &[&str] = &[
    "assets",
    "liabilities",
    "equity",
    "sharesoutstanding",
    "cashandcashequivalents",
];

const DURATION_HINTS: &[&str] = &[
    "revenue",
    "sales",
    "netincome",
    "cashflow",
    "operatingincome",
    "earningspershare",
];

fn term_refs(terms: &[TermValue<'_>]) -> Vec<Ref> {
    terms.iter().map(|t| Ref::Fact(t.fact.id.clone())).collect()
}

pub struct BalanceSheetEquation {
    pub tolerance: TolerancePolicy,
}

impl Rule for BalanceSheetEquation {
    fn code(&self) -> &'static str {
        ids::RULE_ACCT_BALANCE_SHEET_EQUATION
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Assets equal liabilities plus equity within rounding tolerance."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let equation = Equation::balance_sheet();
        let mut out = Vec::new();
        for eval in evaluate_equation(filing, &equation, self.tolerance) {
            match &eval {
                Evaluation::Complete {
                    context_id,
                    terms,
                    lhs,
                    rhs,
                    difference,
                    tolerance,
                } => {
                    if !eval.is_imbalanced() {
                        continue;
                    }
                    let values: serde_json::Map<String, serde_json::Value> = terms
                        .iter()
                        .map(|t| (t.term.to_string(), json!(t.value)))
                        .collect();
                    out.push(
                        RuleFinding::new(
                            ids::KIND_EQUATION_IMBALANCE,
                            self.default_severity(),
                            format!(
                                "{} does not hold in context {}: {} vs {} (difference {}, tolerance {})",
                                equation.name, context_id, lhs, rhs, difference, tolerance
                            ),
                        )
                        .with_refs(term_refs(terms))
                        .with_ref(Ref::Context(context_id.to_string()))
                        .with_data(json!({
                            "values": values,
                            "difference": difference,
                            "tolerance": tolerance,
                            "policy": self.tolerance.as_str(),
                        })),
                    );
                }
                Evaluation::Incomplete {
                    context_id,
                    present,
                    missing,
                } => {
                    out.push(
                        RuleFinding::new(
                            ids::KIND_INSUFFICIENT_COVERAGE,
                            Severity::Warning,
                            format!(
                                "{} cannot be evaluated in context {}: missing {}",
                                equation.name,
                                context_id,
                                missing.join(", ")
                            ),
                        )
                        .with_refs(term_refs(present))
                        .with_ref(Ref::Context(context_id.to_string()))
                        .with_data(json!({ "missing": missing })),
                    );
                }
            }
        }
        Ok(out)
    }

    fn claims(&self, filing: &Filing) -> Vec<ArithmeticClaim> {
        equation_claims(self.code(), filing, &Equation::balance_sheet(), self.tolerance)
    }
}

pub struct AssetsNegative;

impl Rule for AssetsNegative {
    fn code(&self) -> &'static str {
        ids::RULE_ACCT_ASSETS_NEGATIVE
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn description(&self) -> &'static str {
        "Total assets are not expected to be negative."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let mut out = Vec::new();
        for fact in &filing.facts {
            if !ASSETS_CONCEPTS.contains(&fact.concept.as_str()) {
                continue;
            }
            let Some(value) = fact.numeric_value() else {
                continue;
            };
            if value < 0.0 {
                out.push(
                    RuleFinding::new(
                        ids::KIND_NEGATIVE_VALUE,
                        self.default_severity(),
                        format!("assets fact {} is negative ({value})", fact.id),
                    )
                    .with_ref(Ref::Fact(fact.id.clone())),
                );
            }
        }
        Ok(out)
    }
}

pub struct ConceptPeriodType;

impl Rule for ConceptPeriodType {
    fn code(&self) -> &'static str {
        ids::RULE_ACCT_CONCEPT_PERIOD_TYPE
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn description(&self) -> &'static str {
        "Balances are reported at an instant, activity over a duration."
    }

    fn evaluate(&self, filing: &Filing) -> Result<Vec<RuleFinding>, RuleFault> {
        let mut out = Vec::new();
        for fact in &filing.facts {
            let Some(period) = filing.context(&fact.context_id).and_then(|c| c.period()) else {
                continue;
            };
            let local = fact.local_name().replace('_', "").to_lowercase();
            let expected = if INSTANT_HINTS.iter().any(|h| local.contains(h)) {
                Some(PeriodType::Instant)
            } else if DURATION_HINTS.iter().any(|h| local.contains(h)) {
                Some(PeriodType::Duration)
            } else {
                None
            };
            let Some(expected) = expected else {
                continue;
            };
            if expected != period {
                out.push(
                    RuleFinding::new(
                        ids::KIND_PERIOD_TYPE_MISMATCH,
                        self.default_severity(),
                        format!(
                            "fact {} ({}) looks {} but uses {} context {}",
                            fact.id,
                            fact.concept,
                            expected.as_str(),
                            period.as_str(),
                            fact.context_id
                        ),
                    )
                    .with_refs([
                        Ref::Fact(fact.id.clone()),
                        Ref::Context(fact.context_id.clone()),
                    ])
                    .with_data(json!({
                        "expected": expected.as_str(),
                        "actual": period.as_str(),
                    })),
                );
            }
        }
        Ok(out)
    }
}
