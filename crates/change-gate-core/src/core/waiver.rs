// crates/change-gate-core/src/core/waiver.rs
// ============================================================================
// Module: Change Gate Waiver Documents
// Description: Time-boxed, human-approved exceptions to budgets and gates.
// Purpose: Represent waiver documents as read-only records; retirement is computed.
// Dependencies: crate::core::{identifiers, time, verdict}, serde
// ============================================================================

//! ## Overview
//! Waiver documents are produced by an external human-approval workflow and
//! are read-only to this engine. A document is logically retired once its
//! status is no longer active or its expiry has passed; the engine never
//! mutates the document, it only computes validity from it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::WaiverId;
use crate::core::time::Timestamp;
use crate::core::verdict::GateKind;

// ============================================================================
// SECTION: Waiver Status
// ============================================================================

/// Lifecycle status recorded on a waiver document.
///
/// # Invariants
/// - Variants are stable for serialization and document matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaiverStatus {
    /// Waiver is in force (subject to expiry and approvals).
    Active,
    /// Waiver has been marked expired by the approval workflow.
    Expired,
    /// Waiver has been revoked by the approval workflow.
    Revoked,
}

// ============================================================================
// SECTION: Budget Deltas
// ============================================================================

/// Additive budget adjustment carried by a waiver.
///
/// Deltas may be negative; the budget deriver clamps the effective budget
/// at a floor of zero per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BudgetDelta {
    /// Additive adjustment to `max_files`.
    #[serde(default)]
    pub max_files: i64,
    /// Additive adjustment to `max_loc`.
    #[serde(default)]
    pub max_loc: i64,
}

// ============================================================================
// SECTION: Waiver Documents
// ============================================================================

/// A time-boxed, human-approved exception document.
///
/// # Invariants
/// - Read-only to this engine; the approval workflow owns mutation.
/// - Usable only while `status` is active, unexpired, and approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaiverDocument {
    /// Waiver identifier.
    pub id: WaiverId,
    /// Optional human-readable title.
    #[serde(default)]
    pub title: Option<String>,
    /// Lifecycle status.
    pub status: WaiverStatus,
    /// Stated reason for the exception.
    pub reason: String,
    /// Gates this waiver covers.
    #[serde(default)]
    pub gates: Vec<GateKind>,
    /// Expiry timestamp; validity boundary is inclusive of the instant itself.
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    /// Approvers recorded by the approval workflow; must be non-empty to be usable.
    #[serde(default)]
    pub approvers: Vec<String>,
    /// Optional additive budget adjustment.
    #[serde(default)]
    pub delta: Option<BudgetDelta>,
    /// Maximum trust score ceiling allowed while this waiver is in effect.
    #[serde(default)]
    pub max_trust_score: Option<u8>,
}

impl WaiverDocument {
    /// Returns whether this waiver covers the given gate.
    #[must_use]
    pub fn covers(&self, gate: GateKind) -> bool {
        self.gates.contains(&gate)
    }

    /// Returns the budget delta, defaulting each dimension to zero.
    #[must_use]
    pub fn budget_delta(&self) -> BudgetDelta {
        self.delta.unwrap_or_default()
    }
}
