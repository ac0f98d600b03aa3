// crates/change-gate-core/src/runtime/enforcer.rs
// ============================================================================
// Module: Change Gate Enforcer
// Description: Single-gate check orchestration over policy, waivers, and budgets.
// Purpose: Produce structured verdicts; threshold misses are data, not errors.
// Dependencies: crate::core, crate::interfaces, crate::runtime, thiserror
// ============================================================================

//! ## Overview
//! The enforcer resolves the effective tier, consults the waiver ledger for
//! a short-circuit, and dispatches to per-gate threshold logic. A failed
//! threshold is returned as a `passed: false` verdict; errors are reserved
//! for caller bugs (a tier with no policy entry, or a value whose shape does
//! not match the gate). Process-exit decisions belong entirely to front ends.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::core::BudgetUsage;
use crate::core::ChangeBudget;
use crate::core::GateKind;
use crate::core::GateReading;
use crate::core::GateVerdict;
use crate::core::RiskTier;
use crate::core::Timestamp;
use crate::core::WaiverGrant;
use crate::core::WaiverId;
use crate::interfaces::PolicySource;
use crate::interfaces::PolicySourceError;
use crate::interfaces::WaiverSource;
use crate::runtime::ledger::WaiverLedger;
use crate::runtime::store::PolicyStore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed global minimum for the trust gate, independent of risk tier.
pub const TRUST_SCORE_MINIMUM: i64 = 82;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Measured value supplied for a gate check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateValue {
    /// Unit-interval measurement for coverage and mutation gates.
    Ratio(f64),
    /// Integer trust score for the trust gate.
    Score(i64),
    /// Files/loc usage for the budget gate.
    Usage(BudgetUsage),
}

/// One gate check request.
#[derive(Debug, Clone, PartialEq)]
pub struct GateRequest {
    /// Declared risk tier of the change.
    pub tier: RiskTier,
    /// Measured value for the gate.
    pub value: GateValue,
    /// Project root the policy and waivers are resolved against.
    pub project_root: PathBuf,
    /// Experimental-mode flag; overrides the numeric tier when set.
    pub experimental: bool,
    /// Waiver identifiers referenced by the change description.
    pub waiver_ids: Vec<WaiverId>,
    /// Evaluation instant used for waiver validity.
    pub now: Timestamp,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Enforcement errors. Reserved for caller bugs and fatal policy failures;
/// a threshold miss is never an error.
#[derive(Debug, Error)]
pub enum EnforceError {
    /// The effective tier has no entry in the loaded policy.
    #[error("risk tier {tier} is not configured in the active policy")]
    TierNotConfigured {
        /// Tier that has no policy entry.
        tier: RiskTier,
    },
    /// The supplied value's shape does not match the gate kind.
    #[error("gate `{gate}` expects a {expected} value")]
    ValueShape {
        /// Gate that was requested.
        gate: GateKind,
        /// Expected value shape.
        expected: &'static str,
    },
    /// The policy document could not be loaded or failed validation.
    #[error(transparent)]
    Policy(#[from] PolicySourceError),
}

// ============================================================================
// SECTION: Gate Enforcer
// ============================================================================

/// Orchestrates single gate checks over injected policy and waiver stores.
#[derive(Debug)]
pub struct GateEnforcer<S, W> {
    /// TTL-cached policy store.
    store: PolicyStore<S>,
    /// Waiver ledger.
    ledger: WaiverLedger<W>,
}

impl<S: PolicySource, W: WaiverSource> GateEnforcer<S, W> {
    /// Creates an enforcer over a policy store and waiver ledger.
    #[must_use]
    pub const fn new(store: PolicyStore<S>, ledger: WaiverLedger<W>) -> Self {
        Self {
            store,
            ledger,
        }
    }

    /// Returns the underlying policy store.
    #[must_use]
    pub const fn store(&self) -> &PolicyStore<S> {
        &self.store
    }

    /// Returns the underlying waiver ledger.
    #[must_use]
    pub const fn ledger(&self) -> &WaiverLedger<W> {
        &self.ledger
    }

    /// Checks a single gate and returns a structured verdict.
    ///
    /// Resolution order: effective tier (experimental flag overrides), gate
    /// enablement, waiver short-circuit, then per-gate threshold dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`EnforceError`] for caller bugs (unconfigured tier, value
    /// shape mismatch) or a fatal policy load failure.
    pub fn enforce_gate(
        &self,
        gate: GateKind,
        request: &GateRequest,
    ) -> Result<GateVerdict, EnforceError> {
        let policy = self.store.load_policy(&request.project_root)?;
        let effective_tier = if request.experimental {
            RiskTier::Experimental
        } else {
            request.tier
        };
        let tier_policy =
            policy.tier(effective_tier).ok_or(EnforceError::TierNotConfigured {
                tier: effective_tier,
            })?;

        if !policy.gate_enabled(gate) {
            return Ok(GateVerdict::disabled(gate));
        }

        let coverage = self.ledger.check_waiver_status(&request.project_root, gate, request.now);
        if coverage.waived
            && let Some(waiver_id) = coverage.waiver_id
        {
            return Ok(GateVerdict::waived(gate, WaiverGrant {
                waiver_id,
                reason: coverage.reason.unwrap_or_default(),
                max_trust_score: coverage.max_trust_score,
            }));
        }

        match gate {
            GateKind::Coverage => {
                let value = expect_ratio(gate, request.value)?;
                Ok(ratio_verdict(gate, value, tier_policy.min_branch))
            }
            GateKind::Mutation => {
                let value = expect_ratio(gate, request.value)?;
                Ok(ratio_verdict(gate, value, tier_policy.min_mutation))
            }
            GateKind::Trust => {
                let value = expect_score(gate, request.value)?;
                Ok(trust_verdict(value))
            }
            GateKind::Budget => {
                let usage = expect_usage(gate, request.value)?;
                let budget = if request.waiver_ids.is_empty() {
                    tier_policy.budget()
                } else {
                    self.ledger
                        .apply_waivers(
                            tier_policy.budget(),
                            &request.waiver_ids,
                            &request.project_root,
                            request.now,
                        )
                        .effective
                };
                Ok(budget_verdict(usage, budget))
            }
        }
    }
}

// ============================================================================
// SECTION: Per-Gate Dispatch
// ============================================================================

/// Extracts a ratio value or reports a shape mismatch.
const fn expect_ratio(gate: GateKind, value: GateValue) -> Result<f64, EnforceError> {
    match value {
        GateValue::Ratio(ratio) => Ok(ratio),
        GateValue::Score(_) | GateValue::Usage(_) => Err(EnforceError::ValueShape {
            gate,
            expected: "ratio",
        }),
    }
}

/// Extracts a score value or reports a shape mismatch.
const fn expect_score(gate: GateKind, value: GateValue) -> Result<i64, EnforceError> {
    match value {
        GateValue::Score(score) => Ok(score),
        GateValue::Ratio(_) | GateValue::Usage(_) => Err(EnforceError::ValueShape {
            gate,
            expected: "score",
        }),
    }
}

/// Extracts a usage value or reports a shape mismatch.
const fn expect_usage(gate: GateKind, value: GateValue) -> Result<BudgetUsage, EnforceError> {
    match value {
        GateValue::Usage(usage) => Ok(usage),
        GateValue::Ratio(_) | GateValue::Score(_) => Err(EnforceError::ValueShape {
            gate,
            expected: "budget usage",
        }),
    }
}

/// Verdict for ratio gates; the boundary is inclusive.
fn ratio_verdict(gate: GateKind, value: f64, threshold: f64) -> GateVerdict {
    let actual = GateReading::Ratio(value);
    let required = GateReading::Ratio(threshold);
    if value >= threshold {
        GateVerdict::passing(gate, actual, required)
    } else {
        GateVerdict::failing(gate, actual, required, vec![format!(
            "{gate} {value} is below the required threshold {threshold}"
        )])
    }
}

/// Verdict for the trust gate against the fixed global minimum.
fn trust_verdict(value: i64) -> GateVerdict {
    let actual = GateReading::Score(value);
    let required = GateReading::Score(TRUST_SCORE_MINIMUM);
    if value >= TRUST_SCORE_MINIMUM {
        GateVerdict::passing(GateKind::Trust, actual, required)
    } else {
        GateVerdict::failing(GateKind::Trust, actual, required, vec![format!(
            "trust score {value} is below the required minimum {TRUST_SCORE_MINIMUM}"
        )])
    }
}

/// Verdict for the budget gate; each dimension is checked independently.
fn budget_verdict(usage: BudgetUsage, budget: ChangeBudget) -> GateVerdict {
    let actual = GateReading::Budget(usage);
    let required = GateReading::Budget(BudgetUsage {
        files: budget.max_files,
        loc: budget.max_loc,
    });
    let mut messages = Vec::new();
    if usage.files > budget.max_files {
        messages
            .push(format!("files {} exceeds the budget of {}", usage.files, budget.max_files));
    }
    if usage.loc > budget.max_loc {
        messages.push(format!("loc {} exceeds the budget of {}", usage.loc, budget.max_loc));
    }
    if messages.is_empty() {
        GateVerdict::passing(GateKind::Budget, actual, required)
    } else {
        GateVerdict::failing(GateKind::Budget, actual, required, messages)
    }
}
