//! Declared equations over facts of one context, compared within a rounding tolerance.

use crate::decimal::ExactDecimal;
use crate::model::{Decimals, Fact, Filing};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How per-fact rounding (from `decimals`) becomes the tolerance of an equation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TolerancePolicy {
    /// Half a unit of the coarsest precision among the participating facts.
    #[default]
    CoarsestHalfUnit,
    /// Sum of every participating fact's half unit.
    AccumulatedHalfUnit,
}

impl TolerancePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            TolerancePolicy::CoarsestHalfUnit => "coarsest_half_unit",
            TolerancePolicy::AccumulatedHalfUnit => "accumulated_half_unit",
        }
    }
}

/// Rounding half unit implied by `decimals`. `INF`, absent or unparsed decimals round nothing.
pub fn half_unit(decimals: Option<&Decimals>) -> f64 {
    match decimals.and_then(Decimals::exact) {
        Some(d) => half_unit_of(d),
        None => 0.0,
    }
}

/// `0.5 × 10^(-d)`; saturates to 0 or infinity at the ends of the `i32` range.
fn half_unit_of(d: i32) -> f64 {
    0.5 * 10f64.powi(d.saturating_neg())
}

pub fn tolerance<'a>(
    policy: TolerancePolicy,
    decimals: impl IntoIterator<Item = Option<&'a Decimals>>,
) -> f64 {
    match policy {
        TolerancePolicy::CoarsestHalfUnit => decimals
            .into_iter()
            .filter_map(|d| d.and_then(Decimals::exact))
            .min()
            .map(half_unit_of)
            .unwrap_or(0.0),
        TolerancePolicy::AccumulatedHalfUnit => decimals.into_iter().map(half_unit).sum(),
    }
}

/// [`tolerance`] in exact decimals; `None` when a half unit is out of range.
pub fn exact_tolerance<'a>(
    policy: TolerancePolicy,
    decimals: impl IntoIterator<Item = Option<&'a Decimals>>,
) -> Option<ExactDecimal> {
    let mut exact = decimals.into_iter().filter_map(|d| d.and_then(Decimals::exact));
    match policy {
        TolerancePolicy::CoarsestHalfUnit => match exact.min() {
            Some(d) => ExactDecimal::half_unit(d),
            None => Some(ExactDecimal::ZERO),
        },
        TolerancePolicy::AccumulatedHalfUnit => exact.try_fold(ExactDecimal::ZERO, |acc, d| {
            acc.checked_add(ExactDecimal::half_unit(d)?)
        }),
    }
}

/// Two readings agree when they differ by no more than `tol`. NaN never agrees.
pub fn within_tolerance(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// One side of an equation: any of `concepts` may report the term.
#[derive(Clone, Debug)]
pub struct Term {
    pub name: &'static str,
    pub concepts: &'static [&'static str],
}

#[derive(Clone, Debug)]
pub struct Equation {
    pub name: &'static str,
    pub lhs: Vec<Term>,
    pub rhs: Vec<Term>,
}

impl Equation {
    /// Assets = Liabilities + Equity.
    pub fn balance_sheet() -> Self {
        Equation {
            name: "assets = liabilities + equity",
            lhs: vec![Term {
                name: "assets",
                concepts: &["us-gaap:Assets", "ifrs-full:Assets"],
            }],
            rhs: vec![
                Term {
                    name: "liabilities",
                    concepts: &["us-gaap:Liabilities", "ifrs-full:Liabilities"],
                },
                Term {
                    name: "equity",
                    concepts: &[
                        "us-gaap:StockholdersEquity",
                        "us-gaap:StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
                        "ifrs-full:Equity",
                    ],
                },
            ],
        }
    }

    fn terms(&self) -> impl Iterator<Item = &Term> {
        self.lhs.iter().chain(self.rhs.iter())
    }
}

/// Term value picked for one context.
#[derive(Clone, Debug)]
pub struct TermValue<'f> {
    pub term: &'static str,
    pub fact: &'f Fact,
    pub value: f64,
}

#[derive(Clone, Debug)]
pub enum Evaluation<'f> {
    /// Every term reported; `difference` is `|lhs - rhs|`.
    Complete {
        context_id: &'f str,
        terms: Vec<TermValue<'f>>,
        lhs: f64,
        rhs: f64,
        difference: f64,
        tolerance: f64,
    },
    /// Some but not all terms reported.
    Incomplete {
        context_id: &'f str,
        present: Vec<TermValue<'f>>,
        missing: Vec<&'static str>,
    },
}

impl Evaluation<'_> {
    pub fn is_imbalanced(&self) -> bool {
        match self {
            // Negated so a NaN difference counts as an imbalance.
            Evaluation::Complete {
                difference,
                tolerance,
                ..
            } => !(difference <= tolerance),
            Evaluation::Incomplete { .. } => false,
        }
    }
}

/// Per context, the numeric fact of `term` with the largest magnitude (last one on ties).
fn pick_by_context<'f>(filing: &'f Filing, term: &Term) -> BTreeMap<&'f str, TermValue<'f>> {
    let mut out: BTreeMap<&'f str, TermValue<'f>> = BTreeMap::new();
    for fact in &filing.facts {
        if !term.concepts.contains(&fact.concept.as_str()) {
            continue;
        }
        let Some(value) = fact.numeric_value() else {
            continue;
        };
        let candidate = TermValue {
            term: term.name,
            fact,
            value,
        };
        match out.get(fact.context_id.as_str()) {
            Some(prior) if prior.value.abs() > value.abs() => {}
            _ => {
                out.insert(fact.context_id.as_str(), candidate);
            }
        }
    }
    out
}

/// Evaluate `equation` for every context that reports at least one of its terms,
/// ordered by context id.
pub fn evaluate_equation<'f>(
    filing: &'f Filing,
    equation: &Equation,
    policy: TolerancePolicy,
) -> Vec<Evaluation<'f>> {
    let picks: Vec<(&Term, BTreeMap<&'f str, TermValue<'f>>)> = equation
        .terms()
        .map(|t| (t, pick_by_context(filing, t)))
        .collect();

    let mut contexts: Vec<&'f str> = picks.iter().flat_map(|(_, m)| m.keys().copied()).collect();
    contexts.sort_unstable();
    contexts.dedup();

    let lhs_len = equation.lhs.len();
    let mut out = Vec::with_capacity(contexts.len());
    for context_id in contexts {
        let mut present = Vec::new();
        let mut missing = Vec::new();
        for (term, by_ctx) in &picks {
            match by_ctx.get(context_id) {
                Some(tv) => present.push(tv.clone()),
                None => missing.push(term.name),
            }
        }

        if !missing.is_empty() {
            out.push(Evaluation::Incomplete {
                context_id,
                present,
                missing,
            });
            continue;
        }

        let lhs: f64 = present[..lhs_len].iter().map(|t| t.value).sum();
        let rhs: f64 = present[lhs_len..].iter().map(|t| t.value).sum();
        let tol = tolerance(policy, present.iter().map(|t| t.fact.decimals.as_ref()));
        out.push(Evaluation::Complete {
            context_id,
            terms: present,
            lhs,
            rhs,
            difference: (lhs - rhs).abs(),
            tolerance: tol,
        });
    }
    out
}
