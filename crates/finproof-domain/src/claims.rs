//! Arithmetic claims: equation evaluations restated in exact decimals.
//!
//! A claim carries every number it depends on, so it can be rechecked from the
//! proof bundle alone, without the filing or the engine.

use crate::arithmetic::{Equation, Evaluation, TolerancePolicy, evaluate_equation, exact_tolerance};
use crate::decimal::ExactDecimal;
use crate::model::Filing;
use finproof_types::{ArithmeticClaim, ClaimSide, ClaimTerm};
use std::cmp::Ordering;

/// One claim per context where every term of `equation` is reported with an exact value,
/// in context order. Contexts with missing terms or out-of-range numbers make no claim.
pub fn equation_claims(
    rule_code: &str,
    filing: &Filing,
    equation: &Equation,
    policy: TolerancePolicy,
) -> Vec<ArithmeticClaim> {
    let lhs_len = equation.lhs.len();
    evaluate_equation(filing, equation, policy)
        .into_iter()
        .filter_map(|eval| match eval {
            Evaluation::Complete {
                context_id, terms, ..
            } => {
                let mut lhs = ExactDecimal::ZERO;
                let mut rhs = ExactDecimal::ZERO;
                let mut claim_terms = Vec::with_capacity(terms.len());
                for (i, tv) in terms.iter().enumerate() {
                    let value = tv.fact.exact_value()?;
                    let side = if i < lhs_len {
                        lhs = lhs.checked_add(value)?;
                        ClaimSide::Lhs
                    } else {
                        rhs = rhs.checked_add(value)?;
                        ClaimSide::Rhs
                    };
                    claim_terms.push(ClaimTerm {
                        term: tv.term.to_string(),
                        side,
                        fact_id: tv.fact.id.clone(),
                        value: value.to_string(),
                    });
                }
                let difference = lhs.checked_sub(rhs)?.checked_abs()?;
                let tolerance =
                    exact_tolerance(policy, terms.iter().map(|t| t.fact.decimals.as_ref()))?;
                let within_tolerance = difference.checked_cmp(tolerance)? != Ordering::Greater;
                Some(ArithmeticClaim {
                    claim_id: format!("{rule_code}:{context_id}"),
                    rule_code: rule_code.to_string(),
                    context_id: context_id.to_string(),
                    terms: claim_terms,
                    difference: difference.to_string(),
                    tolerance: tolerance.to_string(),
                    within_tolerance,
                })
            }
            Evaluation::Incomplete { .. } => None,
        })
        .collect()
}

/// Difference and verdict implied by a claim's own terms and tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recomputed {
    pub difference: ExactDecimal,
    pub within_tolerance: bool,
}

/// `None` when a number in the claim does not parse or the sums overflow.
pub fn recompute(claim: &ArithmeticClaim) -> Option<Recomputed> {
    let mut lhs = ExactDecimal::ZERO;
    let mut rhs = ExactDecimal::ZERO;
    for term in &claim.terms {
        let value = ExactDecimal::parse(&term.value)?;
        match term.side {
            ClaimSide::Lhs => lhs = lhs.checked_add(value)?,
            ClaimSide::Rhs => rhs = rhs.checked_add(value)?,
        }
    }
    let difference = lhs.checked_sub(rhs)?.checked_abs()?;
    let tolerance = ExactDecimal::parse(&claim.tolerance)?;
    Some(Recomputed {
        difference,
        within_tolerance: difference.checked_cmp(tolerance)? != Ordering::Greater,
    })
}

/// Whether the stated difference and verdict follow from the claim's numbers.
pub fn claim_holds(claim: &ArithmeticClaim) -> bool {
    recompute(claim).is_some_and(|r| {
        ExactDecimal::parse(&claim.difference) == Some(r.difference)
            && r.within_tolerance == claim.within_tolerance
    })
}
