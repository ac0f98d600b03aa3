// crates/change-gate-core/src/core/signals.rs
// ============================================================================
// Module: Change Gate Evaluation Signals
// Description: Measured quality signals consumed by the trust scorer.
// Purpose: Capture one immutable snapshot of externally computed measurements.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Evaluation inputs are supplied fresh by the caller on every call and are
//! never persisted by this engine. How the measurements are produced
//! (coverage runs, mutation testing, accessibility audits) is out of scope;
//! the engine only consumes the numeric and boolean results.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Signal Components
// ============================================================================

/// Consumer and provider contract check outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContractChecks {
    /// Whether consumer-side contract checks passed.
    pub consumer: bool,
    /// Whether provider-side contract checks passed.
    pub provider: bool,
}

/// Accessibility audit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum A11yStatus {
    /// Accessibility checks passed.
    Pass,
    /// Accessibility checks failed or were not run.
    Fail,
}

/// Performance measurements for the change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PerfSignals {
    /// API p95 latency budget in milliseconds, when measured.
    #[serde(default)]
    pub api_p95_ms: Option<f64>,
}

/// Development-mode compliance reported for the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeCompliance {
    /// The change fully followed its declared mode.
    Full,
    /// Anything short of full compliance.
    #[serde(other)]
    Partial,
}

/// Experimental-mode opt-in carried on the evaluation snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExperimentalMode {
    /// Whether the change opted into the experimental tier profile.
    pub enabled: bool,
}

// ============================================================================
// SECTION: Evaluation Inputs
// ============================================================================

/// One snapshot of measured quality signals per evaluation call.
///
/// # Invariants
/// - Ratios (`coverage_branch`, `mutation_score`, `flake_rate`) are unit-interval values.
/// - Supplied fresh by the caller each call; never persisted by this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationInputs {
    /// Measured branch coverage (unit interval).
    pub coverage_branch: f64,
    /// Measured mutation score (unit interval).
    pub mutation_score: f64,
    /// Contract check outcomes.
    #[serde(default)]
    pub contracts: ContractChecks,
    /// Accessibility audit outcome.
    pub a11y: A11yStatus,
    /// Performance measurements.
    #[serde(default)]
    pub perf: PerfSignals,
    /// Observed test flake rate (unit interval).
    pub flake_rate: f64,
    /// Development-mode compliance.
    pub mode_compliance: ModeCompliance,
    /// Whether the change stayed within its scope budget.
    pub scope_within_budget: bool,
    /// Whether the SBOM attached to the change is valid.
    pub sbom_valid: bool,
    /// Whether the build attestation is valid.
    pub attestation_valid: bool,
    /// Experimental-mode opt-in, when present.
    #[serde(default)]
    pub experimental_mode: Option<ExperimentalMode>,
}

impl EvaluationInputs {
    /// Returns whether the snapshot opted into experimental mode.
    #[must_use]
    pub fn experimental_enabled(&self) -> bool {
        self.experimental_mode.is_some_and(|mode| mode.enabled)
    }
}
