//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Run determinism and trace/report agreement
//! - Status aggregation
//! - Cycle detection on generated graphs
//! - Tolerance policies

use crate::arithmetic::{TolerancePolicy, tolerance};
use crate::engine::Engine;
use crate::graph::RelationshipGraph;
use crate::model::Decimals;
use crate::report::compute_status;
use crate::test_support::{balance_filing, finding, test_registry};
use finproof_types::{Severity, Status, TraceOutcome};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![Just(Severity::Warning), Just(Severity::Error)]
}

fn arb_decimals() -> impl Strategy<Value = Option<Decimals>> {
    prop_oneof![
        Just(None),
        Just(Some(Decimals::Infinite)),
        Just(Some(Decimals::Unparsed("thousands".to_string()))),
        (-6i32..6).prop_map(|d| Some(Decimals::Exact(d))),
    ]
}

/// Balance sheet totals in whole units, so every value is exactly representable.
fn arb_totals() -> impl Strategy<Value = (f64, f64, f64)> {
    (0i64..1_000_000, 0i64..1_000_000, -1_000i64..1_000_000)
        .prop_map(|(a, l, e)| (a as f64, l as f64, e as f64))
}

// ============================================================================
// Engine
// ============================================================================

proptest! {
    #[test]
    fn runs_are_deterministic((assets, liabilities, equity) in arb_totals()) {
        let registry = test_registry();
        let filing = balance_filing(assets, liabilities, equity);
        let engine = Engine::new(&registry);
        let first = engine.run(&filing, "full").unwrap();
        let second = engine.run(&filing, "full").unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first.report).unwrap(),
            serde_json::to_string(&second.report).unwrap()
        );
        prop_assert_eq!(first.trace, second.trace);
    }

    #[test]
    fn trace_agrees_with_findings((assets, liabilities, equity) in arb_totals()) {
        let registry = test_registry();
        let out = Engine::new(&registry)
            .run(&balance_filing(assets, liabilities, equity), "full")
            .unwrap();

        let traced: u32 = out.trace.iter().map(|t| t.finding_count).sum();
        prop_assert_eq!(traced as usize, out.report.findings.len());
        prop_assert_eq!(out.trace.len() as u32, out.report.counts.rules_executed);
        for event in &out.trace {
            let pass = event.outcome == TraceOutcome::Pass;
            prop_assert_eq!(pass, event.finding_count == 0);
        }
        for (idx, f) in out.report.findings.iter().enumerate() {
            prop_assert_eq!(f.seq, idx as u64 + 1);
        }
    }

    #[test]
    fn balanced_sheets_never_raise_imbalance(liabilities in 0i64..1_000_000, equity in 0i64..1_000_000) {
        let registry = test_registry();
        let filing = balance_filing((liabilities + equity) as f64, liabilities as f64, equity as f64);
        let out = Engine::new(&registry).run(&filing, "fsd").unwrap();
        prop_assert_eq!(out.report.status, Status::Clean);
    }
}

// ============================================================================
// Status aggregation
// ============================================================================

proptest! {
    #[test]
    fn status_follows_worst_severity(severities in prop::collection::vec(arb_severity(), 0..20)) {
        let findings: Vec<_> = severities
            .iter()
            .enumerate()
            .map(|(i, s)| finding(i as u64 + 1, *s))
            .collect();
        let expected = if severities.contains(&Severity::Error) {
            Status::Risk
        } else if severities.is_empty() {
            Status::Clean
        } else {
            Status::Review
        };
        prop_assert_eq!(compute_status(&findings), expected);
    }
}

// ============================================================================
// Cycle detection
// ============================================================================

proptest! {
    #[test]
    fn a_ring_is_reported_once(len in 1usize..40, start in 0usize..40) {
        let nodes: Vec<String> = (0..len).map(|i| format!("c:N{i:02}")).collect();
        let mut graph = RelationshipGraph::default();
        // Insert edges starting at an arbitrary offset; the result must not depend on it.
        for k in 0..len {
            let i = (start + k) % len;
            graph.add_edge(&nodes[i], &nodes[(i + 1) % len]);
        }
        let cycles = graph.find_cycles();
        prop_assert_eq!(cycles.len(), 1);
        prop_assert_eq!(cycles[0].len(), len);
    }

    #[test]
    fn acyclic_layers_have_no_cycles(edges in prop::collection::vec((0usize..30, 0usize..30), 0..120)) {
        let mut graph = RelationshipGraph::default();
        for (a, b) in edges {
            // Only point from lower to higher index, so the graph is a DAG.
            let (lo, hi) = if a < b { (a, b) } else if b < a { (b, a) } else { continue };
            graph.add_edge(&format!("c:N{lo}"), &format!("c:N{hi}"));
        }
        prop_assert!(graph.find_cycles().is_empty());
    }
}

// ============================================================================
// Tolerance
// ============================================================================

proptest! {
    #[test]
    fn accumulated_tolerance_is_never_tighter(decimals in prop::collection::vec(arb_decimals(), 0..6)) {
        let refs: Vec<Option<&Decimals>> = decimals.iter().map(Option::as_ref).collect();
        let coarsest = tolerance(TolerancePolicy::CoarsestHalfUnit, refs.iter().copied());
        let accumulated = tolerance(TolerancePolicy::AccumulatedHalfUnit, refs.iter().copied());
        prop_assert!(accumulated >= coarsest);
        prop_assert!(coarsest >= 0.0);
    }
}
