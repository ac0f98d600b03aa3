// crates/change-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Change Gate Interfaces
// Description: Storage-agnostic interfaces for policy and waiver documents.
// Purpose: Define the contract surfaces used by the Change Gate runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Change Gate reads externally managed documents and
//! optional analyzer signals without embedding storage-specific details.
//! Policy sources fail closed on malformed documents; waiver sources report
//! load failures so the ledger can degrade to "treat as absent".

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use thiserror::Error;

use crate::core::EvaluationInputs;
use crate::core::PolicyValidationError;
use crate::core::RiskPolicy;
use crate::core::WaiverDocument;
use crate::core::WaiverId;

// ============================================================================
// SECTION: Policy Source
// ============================================================================

/// Policy source errors.
#[derive(Debug, Error)]
pub enum PolicySourceError {
    /// Underlying storage could not be read.
    #[error("policy read failed: {0}")]
    Read(String),
    /// The document exists but failed validation. Fatal.
    #[error(transparent)]
    Validation(#[from] PolicyValidationError),
}

/// Storage-agnostic source of risk-tier policy documents.
pub trait PolicySource {
    /// Loads the policy document for a project root.
    ///
    /// Returns `Ok(None)` when no document exists; the store substitutes the
    /// built-in default in that case.
    ///
    /// # Errors
    ///
    /// Returns [`PolicySourceError`] when the document cannot be read or
    /// fails validation.
    fn load_policy(&self, project_root: &Path) -> Result<Option<RiskPolicy>, PolicySourceError>;
}

// ============================================================================
// SECTION: Waiver Source
// ============================================================================

/// Waiver load errors. Non-fatal: the ledger degrades to "treat as absent".
#[derive(Debug, Error)]
pub enum WaiverLoadError {
    /// Underlying storage could not be read.
    #[error("waiver read failed: {0}")]
    Read(String),
    /// The document exists but cannot be parsed.
    #[error("waiver document malformed: {0}")]
    Malformed(String),
}

/// Storage-agnostic source of waiver documents.
pub trait WaiverSource {
    /// Loads a waiver document by identifier.
    ///
    /// Returns `Ok(None)` when the document does not exist (not an error).
    ///
    /// # Errors
    ///
    /// Returns [`WaiverLoadError`] when the document exists but cannot be
    /// read or parsed.
    fn load_waiver(
        &self,
        id: &WaiverId,
        project_root: &Path,
    ) -> Result<Option<WaiverDocument>, WaiverLoadError>;

    /// Lists the waiver identifiers known for a project root.
    ///
    /// # Errors
    ///
    /// Returns [`WaiverLoadError`] when the listing cannot be produced.
    fn list_waivers(&self, project_root: &Path) -> Result<Vec<WaiverId>, WaiverLoadError>;
}

// ============================================================================
// SECTION: Quality Analyzer
// ============================================================================

/// Optional analyzer supplying the `test_quality` trust factor.
///
/// Implementations are resolved once at construction. The scorer substitutes
/// a neutral 0.5 when the analyzer yields no score.
pub trait QualityAnalyzer {
    /// Returns a test-quality score in `[0, 1]`, or `None` when unavailable.
    fn test_quality(&self, inputs: &EvaluationInputs) -> Option<f64>;
}

/// Analyzer that never yields a score; the scorer falls back to neutral.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralQualityAnalyzer;

impl QualityAnalyzer for NeutralQualityAnalyzer {
    fn test_quality(&self, _inputs: &EvaluationInputs) -> Option<f64> {
        None
    }
}
