// crates/change-gate-core/src/core/mod.rs
// ============================================================================
// Module: Change Gate Core Types
// Description: Canonical policy, waiver, signal, and verdict structures.
// Purpose: Provide stable, serializable types for gate evaluation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Change Gate core types define the risk-tier policy model, waiver
//! documents, evaluation signal snapshots, and structured verdicts. These
//! types are the canonical source of truth for any derived front-end
//! surfaces (CLI, service, or report renderers).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod policy;
pub mod signals;
pub mod time;
pub mod verdict;
pub mod waiver;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::WaiverId;
pub use policy::ChangeBudget;
pub use policy::EditRules;
pub use policy::GateToggle;
pub use policy::PolicyValidationError;
pub use policy::RiskPolicy;
pub use policy::RiskTier;
pub use policy::TierPolicy;
pub use policy::WaiverApprovalRules;
pub use signals::A11yStatus;
pub use signals::ContractChecks;
pub use signals::EvaluationInputs;
pub use signals::ExperimentalMode;
pub use signals::ModeCompliance;
pub use signals::PerfSignals;
pub use time::Timestamp;
pub use time::TimestampParseError;
pub use verdict::BudgetUsage;
pub use verdict::FactorScore;
pub use verdict::GateKind;
pub use verdict::GateReading;
pub use verdict::GateVerdict;
pub use verdict::TrustScoreBreakdown;
pub use verdict::WaiverGrant;
pub use waiver::BudgetDelta;
pub use waiver::WaiverDocument;
pub use waiver::WaiverStatus;
