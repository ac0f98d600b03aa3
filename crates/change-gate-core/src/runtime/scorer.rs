// crates/change-gate-core/src/runtime/scorer.rs
// ============================================================================
// Module: Change Gate Trust Scorer
// Description: Composite 0-100 trust score from ten weighted quality factors.
// Purpose: Compute a deterministic, tier-aware composite quality signal.
// Dependencies: crate::core, crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! The trust scorer folds ten normalized quality sub-scores into a single
//! 0-100 integer. Each sub-score is clamped to the unit interval, weighted,
//! and the total is divided by the weight sum so the formula stays correct
//! under future reweighting. Experimental mode substitutes the relaxed tier
//! profile before any sub-score computation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::A11yStatus;
use crate::core::EvaluationInputs;
use crate::core::FactorScore;
use crate::core::ModeCompliance;
use crate::core::RiskPolicy;
use crate::core::RiskTier;
use crate::core::TierPolicy;
use crate::core::TrustScoreBreakdown;
use crate::interfaces::QualityAnalyzer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Coverage value at which the coverage factor saturates at 1.0.
const COVERAGE_SATURATION: f64 = 0.95;
/// Mutation score at which the mutation factor saturates at 1.0.
const MUTATION_SATURATION: f64 = 0.90;
/// Flake rate at or below which the flake factor scores 1.0.
const FLAKE_BUDGET: f64 = 0.005;
/// Neutral test-quality score used when no analyzer signal is available.
const NEUTRAL_TEST_QUALITY: f64 = 0.5;

/// Factor weights in formula order.
const WEIGHT_COVERAGE: f64 = 0.15;
/// Mutation factor weight.
const WEIGHT_MUTATION: f64 = 0.15;
/// Test-quality factor weight.
const WEIGHT_TEST_QUALITY: f64 = 0.15;
/// Contracts factor weight.
const WEIGHT_CONTRACTS: f64 = 0.12;
/// Accessibility factor weight.
const WEIGHT_A11Y: f64 = 0.08;
/// Performance factor weight.
const WEIGHT_PERF: f64 = 0.08;
/// Flake factor weight.
const WEIGHT_FLAKE: f64 = 0.08;
/// Mode-compliance factor weight.
const WEIGHT_MODE: f64 = 0.06;
/// Scope factor weight.
const WEIGHT_SCOPE: f64 = 0.06;
/// Supply-chain factor weight.
const WEIGHT_SUPPLYCHAIN: f64 = 0.04;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Trust scoring errors. Reserved for caller bugs, not data quality.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrustScoreError {
    /// The requested (or substituted experimental) tier has no policy entry.
    #[error("risk tier {tier} is not configured in the active policy")]
    TierNotConfigured {
        /// Tier that has no policy entry.
        tier: RiskTier,
    },
}

// ============================================================================
// SECTION: Trust Scorer
// ============================================================================

/// Computes composite trust scores against an immutable policy snapshot.
///
/// The analyzer is injected once at construction; there is no per-call
/// probing for optional scoring plugins.
#[derive(Debug)]
pub struct TrustScorer<A> {
    /// Immutable policy snapshot supplying tier thresholds.
    policy: Arc<RiskPolicy>,
    /// Injected test-quality analyzer.
    analyzer: A,
}

impl<A: QualityAnalyzer> TrustScorer<A> {
    /// Creates a scorer over a policy snapshot and an injected analyzer.
    #[must_use]
    pub const fn new(policy: Arc<RiskPolicy>, analyzer: A) -> Self {
        Self {
            policy,
            analyzer,
        }
    }

    /// Computes the composite trust score for a tier and signal snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TrustScoreError`] when the effective tier has no policy
    /// entry; this indicates a caller or configuration bug.
    pub fn trust_score(
        &self,
        tier: RiskTier,
        inputs: &EvaluationInputs,
    ) -> Result<TrustScoreBreakdown, TrustScoreError> {
        let effective = if inputs.experimental_enabled() {
            RiskTier::Experimental
        } else {
            tier
        };
        let tier_policy = self.policy.tier(effective).ok_or(TrustScoreError::TierNotConfigured {
            tier: effective,
        })?;

        let test_quality = self
            .analyzer
            .test_quality(inputs)
            .map_or(NEUTRAL_TEST_QUALITY, clamp_unit);

        let mut factors = Vec::with_capacity(10);
        push_factor(
            &mut factors,
            "coverage",
            WEIGHT_COVERAGE,
            interpolate(inputs.coverage_branch, tier_policy.min_branch, COVERAGE_SATURATION),
        );
        push_factor(
            &mut factors,
            "mutation",
            WEIGHT_MUTATION,
            interpolate(inputs.mutation_score, tier_policy.min_mutation, MUTATION_SATURATION),
        );
        push_factor(&mut factors, "test_quality", WEIGHT_TEST_QUALITY, test_quality);
        push_factor(
            &mut factors,
            "contracts",
            WEIGHT_CONTRACTS,
            contracts_sub_score(tier_policy, inputs),
        );
        push_factor(
            &mut factors,
            "a11y",
            WEIGHT_A11Y,
            if inputs.a11y == A11yStatus::Pass { 1.0 } else { 0.0 },
        );
        push_factor(
            &mut factors,
            "perf",
            WEIGHT_PERF,
            if inputs.perf.api_p95_ms.is_some_and(|p95| p95 > 0.0) { 1.0 } else { 0.0 },
        );
        push_factor(
            &mut factors,
            "flake",
            WEIGHT_FLAKE,
            if inputs.flake_rate <= FLAKE_BUDGET { 1.0 } else { 0.5 },
        );
        push_factor(
            &mut factors,
            "mode",
            WEIGHT_MODE,
            if inputs.mode_compliance == ModeCompliance::Full { 1.0 } else { 0.5 },
        );
        push_factor(
            &mut factors,
            "scope",
            WEIGHT_SCOPE,
            if inputs.scope_within_budget { 1.0 } else { 0.0 },
        );
        push_factor(
            &mut factors,
            "supplychain",
            WEIGHT_SUPPLYCHAIN,
            if inputs.sbom_valid && inputs.attestation_valid { 1.0 } else { 0.0 },
        );

        let weight_total: f64 = factors.iter().map(|factor| factor.weight).sum();
        let weighted_sum: f64 = factors.iter().map(|factor| factor.contribution).sum();
        let scaled = if weight_total > 0.0 {
            100.0 * weighted_sum / weight_total
        } else {
            0.0
        };
        Ok(TrustScoreBreakdown {
            factors,
            total: round_total(scaled),
        })
    }
}

// ============================================================================
// SECTION: Sub-Score Helpers
// ============================================================================

/// Appends a factor with its clamped sub-score and weighted contribution.
fn push_factor(factors: &mut Vec<FactorScore>, name: &str, weight: f64, sub_score: f64) {
    let sub_score = clamp_unit(sub_score);
    factors.push(FactorScore {
        name: name.to_string(),
        weight,
        sub_score,
        contribution: weight * sub_score,
    });
}

/// Contracts sub-score: free pass when the tier does not require contracts,
/// otherwise both consumer and provider checks must pass.
fn contracts_sub_score(tier_policy: &TierPolicy, inputs: &EvaluationInputs) -> f64 {
    if !tier_policy.requires_contracts {
        1.0
    } else if inputs.contracts.consumer && inputs.contracts.provider {
        1.0
    } else {
        0.0
    }
}

/// Linear interpolation from `floor -> 0` to `saturation -> 1`, clamped.
fn interpolate(value: f64, floor: f64, saturation: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let span = saturation - floor;
    if span <= f64::EPSILON {
        return if value >= floor { 1.0 } else { 0.0 };
    }
    clamp_unit((value - floor) / span)
}

/// Clamps a value to the unit interval; non-finite values collapse to zero.
fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 }
}

/// Rounds the scaled total into the 0-100 integer range.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is rounded and clamped to [0, 100] before conversion."
)]
fn round_total(scaled: f64) -> u8 {
    if scaled.is_finite() {
        scaled.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}
