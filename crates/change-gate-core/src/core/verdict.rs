// crates/change-gate-core/src/core/verdict.rs
// ============================================================================
// Module: Change Gate Verdicts
// Description: Gate kinds, gate verdicts, and trust score breakdowns.
// Purpose: Represent evaluation outcomes as structured values, never exits.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! Verdict types carry the full outcome of a gate check or trust score
//! computation back to the caller. A threshold miss is data (`passed: false`),
//! not an error; deciding process-exit semantics belongs to front ends.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::WaiverId;

// ============================================================================
// SECTION: Gate Kinds
// ============================================================================

/// Quality gates enforced by Change Gate.
///
/// # Invariants
/// - Variants are stable for serialization and waiver document matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    /// Branch coverage threshold gate.
    Coverage,
    /// Mutation score threshold gate.
    Mutation,
    /// Composite trust score gate.
    Trust,
    /// Change scope budget gate (files and lines of code).
    Budget,
}

impl GateKind {
    /// Returns the stable string form of the gate kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Coverage => "coverage",
            Self::Mutation => "mutation",
            Self::Trust => "trust",
            Self::Budget => "budget",
        }
    }

    /// Parses a stable string form back into a gate kind.
    #[must_use]
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "coverage" => Some(Self::Coverage),
            "mutation" => Some(Self::Mutation),
            "trust" => Some(Self::Trust),
            "budget" => Some(Self::Budget),
            _ => None,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Gate Readings
// ============================================================================

/// Observed files/loc usage for a budget gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetUsage {
    /// Number of files touched by the change.
    pub files: u64,
    /// Lines of code touched by the change.
    pub loc: u64,
}

/// Measured or threshold value attached to a gate verdict.
///
/// # Invariants
/// - The variant matches the gate kind: `Ratio` for coverage/mutation,
///   `Score` for trust, `Budget` for budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GateReading {
    /// Unit-interval measurement (coverage, mutation score).
    Ratio(f64),
    /// Integer trust score on the 0-100 scale.
    Score(i64),
    /// Files/loc budget pair.
    Budget(BudgetUsage),
}

// ============================================================================
// SECTION: Gate Verdicts
// ============================================================================

/// Waiver reference recorded on a waived verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaiverGrant {
    /// Identifier of the waiver that covered the gate.
    pub waiver_id: WaiverId,
    /// Stated reason from the waiver document.
    pub reason: String,
    /// Maximum trust score ceiling allowed while the waiver is in effect.
    pub max_trust_score: Option<u8>,
}

/// Outcome of a single gate check.
///
/// # Invariants
/// - A waived verdict has `passed: true`, `waived: true`, and a `waiver`.
/// - `messages` is non-empty when `passed` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateVerdict {
    /// Gate that was checked.
    pub gate: GateKind,
    /// Whether the gate passed (or was waived).
    pub passed: bool,
    /// Whether the gate was skipped because of a valid waiver.
    pub waived: bool,
    /// Measured value, when threshold logic ran.
    pub actual: Option<GateReading>,
    /// Threshold the value was compared against, when threshold logic ran.
    pub threshold: Option<GateReading>,
    /// Human-readable detail, one entry per violated dimension.
    pub messages: Vec<String>,
    /// Waiver details when the verdict was waived.
    pub waiver: Option<WaiverGrant>,
}

impl GateVerdict {
    /// Builds a passing verdict with the compared readings.
    #[must_use]
    pub const fn passing(gate: GateKind, actual: GateReading, threshold: GateReading) -> Self {
        Self {
            gate,
            passed: true,
            waived: false,
            actual: Some(actual),
            threshold: Some(threshold),
            messages: Vec::new(),
            waiver: None,
        }
    }

    /// Builds a failing verdict with per-dimension messages.
    #[must_use]
    pub const fn failing(
        gate: GateKind,
        actual: GateReading,
        threshold: GateReading,
        messages: Vec<String>,
    ) -> Self {
        Self {
            gate,
            passed: false,
            waived: false,
            actual: Some(actual),
            threshold: Some(threshold),
            messages,
            waiver: None,
        }
    }

    /// Builds a waived verdict; threshold logic was skipped entirely.
    #[must_use]
    pub const fn waived(gate: GateKind, waiver: WaiverGrant) -> Self {
        Self {
            gate,
            passed: true,
            waived: true,
            actual: None,
            threshold: None,
            messages: Vec::new(),
            waiver: Some(waiver),
        }
    }

    /// Builds a passing verdict for a gate disabled by policy.
    #[must_use]
    pub fn disabled(gate: GateKind) -> Self {
        Self {
            gate,
            passed: true,
            waived: false,
            actual: None,
            threshold: None,
            messages: vec![format!("gate `{gate}` is disabled by policy")],
            waiver: None,
        }
    }
}

// ============================================================================
// SECTION: Trust Score Breakdown
// ============================================================================

/// Per-factor contribution to the composite trust score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    /// Stable factor name.
    pub name: String,
    /// Factor weight in the composite formula.
    pub weight: f64,
    /// Normalized sub-score in `[0, 1]`.
    pub sub_score: f64,
    /// `weight * sub_score`.
    pub contribution: f64,
}

/// Composite trust score with its per-factor breakdown.
///
/// # Invariants
/// - `total` is `round(100 * sum(contribution) / sum(weight))`, in `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustScoreBreakdown {
    /// Factor contributions in formula order.
    pub factors: Vec<FactorScore>,
    /// Composite score on the 0-100 scale.
    pub total: u8,
}
