// crates/change-gate-core/src/lib.rs
// ============================================================================
// Module: Change Gate Core Library
// Description: Public API surface for the Change Gate engine.
// Purpose: Expose core types, interfaces, and runtime components.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Change Gate core provides risk-tiered quality gate enforcement and trust
//! scoring for proposed software changes. It is storage-agnostic and
//! integrates through explicit source interfaces; front ends own
//! presentation and process-exit semantics.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::NeutralQualityAnalyzer;
pub use interfaces::PolicySource;
pub use interfaces::PolicySourceError;
pub use interfaces::QualityAnalyzer;
pub use interfaces::WaiverLoadError;
pub use interfaces::WaiverSource;
pub use runtime::AppliedBudget;
pub use runtime::CacheStatus;
pub use runtime::DEFAULT_CACHE_TTL;
pub use runtime::DerivedBudget;
pub use runtime::EnforceError;
pub use runtime::GateEnforcer;
pub use runtime::GateRequest;
pub use runtime::GateValue;
pub use runtime::InMemoryPolicySource;
pub use runtime::InMemoryWaiverSource;
pub use runtime::PolicyStore;
pub use runtime::TRUST_SCORE_MINIMUM;
pub use runtime::TrustScoreError;
pub use runtime::TrustScorer;
pub use runtime::WaiverCoverage;
pub use runtime::WaiverLedger;
pub use runtime::derive_effective;
