// crates/change-gate-core/src/runtime/budget.rs
// ============================================================================
// Module: Change Gate Budget Derivation
// Description: Effective-budget arithmetic over baseline and waiver deltas.
// Purpose: Combine additive deltas deterministically with a zero floor.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Budget derivation is pure arithmetic: `effective = baseline + sum(deltas)`
//! per dimension, clamped at a floor of zero. Deltas are summed before the
//! clamp is applied, so the result is independent of delta order even when
//! intermediate sums would dip below zero.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::BudgetDelta;
use crate::core::ChangeBudget;

// ============================================================================
// SECTION: Derived Budgets
// ============================================================================

/// Effective budget after applying waiver deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedBudget {
    /// Effective budget, floor-clamped at zero per dimension.
    pub effective: ChangeBudget,
    /// Whether any dimension was clamped at the zero floor.
    pub clamped: bool,
}

/// Derives the effective budget from a baseline and additive deltas.
///
/// A negative delta sum cannot drive a dimension below zero; clamping is
/// flagged on the result rather than treated as a failure.
#[must_use]
pub fn derive_effective(baseline: ChangeBudget, deltas: &[BudgetDelta]) -> DerivedBudget {
    let files_sum: i128 = deltas.iter().map(|delta| i128::from(delta.max_files)).sum();
    let loc_sum: i128 = deltas.iter().map(|delta| i128::from(delta.max_loc)).sum();
    let (max_files, files_clamped) = apply_delta(baseline.max_files, files_sum);
    let (max_loc, loc_clamped) = apply_delta(baseline.max_loc, loc_sum);
    DerivedBudget {
        effective: ChangeBudget {
            max_files,
            max_loc,
        },
        clamped: files_clamped || loc_clamped,
    }
}

/// Applies a summed delta to one budget dimension with a zero floor.
fn apply_delta(baseline: u64, delta_sum: i128) -> (u64, bool) {
    let raw = i128::from(baseline) + delta_sum;
    if raw < 0 {
        (0, true)
    } else {
        (u64::try_from(raw).unwrap_or(u64::MAX), false)
    }
}
