// crates/change-gate-core/src/runtime/ledger.rs
// ============================================================================
// Module: Change Gate Waiver Ledger
// Description: Waiver validity, budget application, and gate coverage checks.
// Purpose: Compute waiver effects deterministically with fail-open degradation.
// Dependencies: crate::core, crate::interfaces, crate::runtime::budget, tracing
// ============================================================================

//! ## Overview
//! The ledger answers three questions: is a waiver currently valid, what
//! effective budget do a change's waivers produce, and is a given gate
//! waived for a project. Missing or invalid waivers never block an
//! evaluation; each skip is logged so hosts can layer an audit trail on top
//! of the fail-open behavior.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use tracing::warn;

use crate::core::ChangeBudget;
use crate::core::GateKind;
use crate::core::RiskPolicy;
use crate::core::Timestamp;
use crate::core::WaiverDocument;
use crate::core::WaiverId;
use crate::core::WaiverStatus;
use crate::interfaces::WaiverSource;
use crate::runtime::budget::derive_effective;

// ============================================================================
// SECTION: Ledger Results
// ============================================================================

/// Effective budget produced by applying a change's waivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedBudget {
    /// Effective budget after valid waiver deltas.
    pub effective: ChangeBudget,
    /// Identifiers of the waivers that contributed, in request order.
    pub applied: Vec<WaiverId>,
    /// Whether any dimension was clamped at the zero floor.
    pub clamped: bool,
}

/// Whether a gate is currently waived for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaiverCoverage {
    /// Whether a valid waiver covers the gate.
    pub waived: bool,
    /// Identifier of the covering waiver.
    pub waiver_id: Option<WaiverId>,
    /// Stated reason from the covering waiver.
    pub reason: Option<String>,
    /// Trust score ceiling allowed while the waiver is in effect.
    pub max_trust_score: Option<u8>,
}

impl WaiverCoverage {
    /// Coverage result for a gate with no valid covering waiver.
    #[must_use]
    pub const fn not_waived() -> Self {
        Self {
            waived: false,
            waiver_id: None,
            reason: None,
            max_trust_score: None,
        }
    }
}

// ============================================================================
// SECTION: Waiver Ledger
// ============================================================================

/// Waiver ledger over an injected [`WaiverSource`].
#[derive(Debug)]
pub struct WaiverLedger<W> {
    /// Document source for waiver records.
    source: W,
    /// Minimum approver count a waiver must carry to be valid.
    required_approvers: u32,
}

impl<W: WaiverSource> WaiverLedger<W> {
    /// Creates a ledger requiring at least one approver per waiver.
    #[must_use]
    pub const fn new(source: W) -> Self {
        Self {
            source,
            required_approvers: 1,
        }
    }

    /// Creates a ledger honoring the policy's waiver approval requirements.
    #[must_use]
    pub fn with_policy(source: W, policy: &RiskPolicy) -> Self {
        Self {
            source,
            required_approvers: policy.required_waiver_approvers(),
        }
    }

    /// Loads a waiver document, degrading load failures to absence.
    ///
    /// A missing document is `None`; an unparsable document is also `None`
    /// after a warning, per the fail-open contract.
    #[must_use]
    pub fn load_waiver(&self, id: &WaiverId, project_root: &Path) -> Option<WaiverDocument> {
        match self.source.load_waiver(id, project_root) {
            Ok(found) => found,
            Err(error) => {
                warn!(waiver_id = %id, %error, "waiver load failed; treating as absent");
                None
            }
        }
    }

    /// Returns whether a waiver is currently valid.
    ///
    /// All conditions must hold simultaneously: active status, unexpired
    /// (boundary inclusive of `now == expires_at`, no grace period), and an
    /// approver count meeting the policy requirement.
    #[must_use]
    pub fn is_waiver_valid(&self, waiver: &WaiverDocument, now: Timestamp) -> bool {
        if waiver.status != WaiverStatus::Active {
            return false;
        }
        if let Some(expires_at) = waiver.expires_at
            && now > expires_at
        {
            return false;
        }
        waiver.approvers.len() >= self.required_approvers as usize
    }

    /// Applies a change's waiver deltas to a baseline budget.
    ///
    /// Missing or invalid waivers are skipped (logged, never fatal), so an
    /// evaluation proceeds against the baseline rather than blocking on a
    /// missing waiver record. The result is order-independent.
    #[must_use]
    pub fn apply_waivers(
        &self,
        baseline: ChangeBudget,
        waiver_ids: &[WaiverId],
        project_root: &Path,
        now: Timestamp,
    ) -> AppliedBudget {
        let mut deltas = Vec::new();
        let mut applied = Vec::new();
        for id in waiver_ids {
            let Some(waiver) = self.load_waiver(id, project_root) else {
                warn!(waiver_id = %id, "waiver not found; skipping delta");
                continue;
            };
            if !self.is_waiver_valid(&waiver, now) {
                warn!(waiver_id = %id, "waiver not valid; skipping delta");
                continue;
            }
            deltas.push(waiver.budget_delta());
            applied.push(id.clone());
        }
        let derived = derive_effective(baseline, &deltas);
        if derived.clamped {
            warn!(
                baseline_files = baseline.max_files,
                baseline_loc = baseline.max_loc,
                "effective budget clamped at zero floor"
            );
        }
        AppliedBudget {
            effective: derived.effective,
            applied,
            clamped: derived.clamped,
        }
    }

    /// Reports whether a gate is waived for a project.
    ///
    /// Scans the project's waiver documents in lexicographic identifier
    /// order for determinism; the first valid waiver covering the gate wins.
    #[must_use]
    pub fn check_waiver_status(
        &self,
        project_root: &Path,
        gate: GateKind,
        now: Timestamp,
    ) -> WaiverCoverage {
        let mut ids = match self.source.list_waivers(project_root) {
            Ok(ids) => ids,
            Err(error) => {
                warn!(%error, "waiver listing failed; treating project as unwaived");
                return WaiverCoverage::not_waived();
            }
        };
        ids.sort();
        for id in &ids {
            let Some(waiver) = self.load_waiver(id, project_root) else {
                continue;
            };
            if waiver.covers(gate) && self.is_waiver_valid(&waiver, now) {
                return WaiverCoverage {
                    waived: true,
                    waiver_id: Some(waiver.id.clone()),
                    reason: Some(waiver.reason.clone()),
                    max_trust_score: waiver.max_trust_score,
                };
            }
        }
        WaiverCoverage::not_waived()
    }
}
