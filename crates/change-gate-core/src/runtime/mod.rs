// crates/change-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Change Gate Runtime
// Description: Policy store, waiver ledger, budget derivation, scoring, enforcement.
// Purpose: Provide the evaluation components composed by front ends.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime components implement the evaluation pipeline: the policy store
//! caches immutable snapshots, the waiver ledger computes waiver effects,
//! the budget module derives effective budgets, the trust scorer folds
//! quality signals into a composite score, and the enforcer turns all of it
//! into per-gate verdicts.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod budget;
pub mod enforcer;
pub mod ledger;
pub mod scorer;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use budget::DerivedBudget;
pub use budget::derive_effective;
pub use enforcer::EnforceError;
pub use enforcer::GateEnforcer;
pub use enforcer::GateRequest;
pub use enforcer::GateValue;
pub use enforcer::TRUST_SCORE_MINIMUM;
pub use ledger::AppliedBudget;
pub use ledger::WaiverCoverage;
pub use ledger::WaiverLedger;
pub use scorer::TrustScoreError;
pub use scorer::TrustScorer;
pub use store::CacheStatus;
pub use store::DEFAULT_CACHE_TTL;
pub use store::InMemoryPolicySource;
pub use store::InMemoryWaiverSource;
pub use store::PolicyStore;
