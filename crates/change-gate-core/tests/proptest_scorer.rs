// crates/change-gate-core/tests/proptest_scorer.rs
// ============================================================================
// Module: Trust Scorer Property-Based Tests
// Description: Property tests for trust score bounds and monotonicity.
// Purpose: Detect panics and invariant violations across wide input ranges.
// ============================================================================

//! Property-based tests for trust scorer invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;

use change_gate_core::A11yStatus;
use change_gate_core::ContractChecks;
use change_gate_core::EvaluationInputs;
use change_gate_core::ModeCompliance;
use change_gate_core::NeutralQualityAnalyzer;
use change_gate_core::PerfSignals;
use change_gate_core::RiskPolicy;
use change_gate_core::RiskTier;
use change_gate_core::TrustScorer;
use proptest::prelude::*;

/// Strategy producing arbitrary evaluation input snapshots.
fn inputs_strategy() -> impl Strategy<Value = EvaluationInputs> {
    (
        0.0_f64..=1.0,
        0.0_f64..=1.0,
        any::<(bool, bool)>(),
        any::<bool>(),
        prop::option::of(0.0_f64..10_000.0),
        0.0_f64..=1.0,
        any::<bool>(),
        any::<(bool, bool, bool)>(),
    )
        .prop_map(
            |(coverage, mutation, (consumer, provider), a11y, p95, flake, full_mode, flags)| {
                let (scope, sbom, attestation) = flags;
                EvaluationInputs {
                    coverage_branch: coverage,
                    mutation_score: mutation,
                    contracts: ContractChecks {
                        consumer,
                        provider,
                    },
                    a11y: if a11y { A11yStatus::Pass } else { A11yStatus::Fail },
                    perf: PerfSignals {
                        api_p95_ms: p95,
                    },
                    flake_rate: flake,
                    mode_compliance: if full_mode {
                        ModeCompliance::Full
                    } else {
                        ModeCompliance::Partial
                    },
                    scope_within_budget: scope,
                    sbom_valid: sbom,
                    attestation_valid: attestation,
                    experimental_mode: None,
                }
            },
        )
}

/// Strategy covering every configured risk tier.
fn tier_strategy() -> impl Strategy<Value = RiskTier> {
    prop_oneof![
        Just(RiskTier::Tier1),
        Just(RiskTier::Tier2),
        Just(RiskTier::Tier3),
        Just(RiskTier::Experimental),
    ]
}

proptest! {
    #[test]
    fn total_is_always_within_the_scale(tier in tier_strategy(), inputs in inputs_strategy()) {
        let scorer = TrustScorer::new(
            Arc::new(RiskPolicy::builtin_default()),
            NeutralQualityAnalyzer,
        );
        let breakdown = scorer.trust_score(tier, &inputs).unwrap();
        prop_assert!(breakdown.total <= 100);
        for factor in &breakdown.factors {
            prop_assert!((0.0..=1.0).contains(&factor.sub_score));
        }
    }

    #[test]
    fn score_is_monotonic_in_branch_coverage(
        tier in tier_strategy(),
        inputs in inputs_strategy(),
        low in 0.0_f64..=1.0,
        high in 0.0_f64..=1.0,
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let scorer = TrustScorer::new(
            Arc::new(RiskPolicy::builtin_default()),
            NeutralQualityAnalyzer,
        );
        let lower = EvaluationInputs { coverage_branch: low, ..inputs.clone() };
        let higher = EvaluationInputs { coverage_branch: high, ..inputs };
        let low_total = scorer.trust_score(tier, &lower).unwrap().total;
        let high_total = scorer.trust_score(tier, &higher).unwrap().total;
        prop_assert!(low_total <= high_total);
    }
}
