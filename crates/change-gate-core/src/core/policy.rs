// crates/change-gate-core/src/core/policy.rs
// ============================================================================
// Module: Change Gate Risk Policy
// Description: Risk tiers, per-tier budgets and thresholds, and policy documents.
// Purpose: Provide an immutable, validated policy value constructed once and injected.
// Dependencies: crate::core::verdict, serde, thiserror
// ============================================================================

//! ## Overview
//! The risk-tier policy is an explicit configuration value: constructed once,
//! validated at construction, and passed into the scorer and enforcer rather
//! than read from a global. Snapshots are immutable after construction and
//! replaced wholesale on cache invalidation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::verdict::GateKind;

// ============================================================================
// SECTION: Risk Tiers
// ============================================================================

/// Risk classification for a proposed change.
///
/// Tier 1 carries the highest rigor, tier 3 the lowest. The experimental
/// tier is a relaxed profile substituted when a change opts into
/// experimental mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    /// Highest-rigor tier.
    #[serde(rename = "1")]
    Tier1,
    /// Standard tier.
    #[serde(rename = "2")]
    Tier2,
    /// Lowest-rigor tier.
    #[serde(rename = "3")]
    Tier3,
    /// Relaxed profile for explicitly experimental changes.
    #[serde(rename = "experimental")]
    Experimental,
}

impl RiskTier {
    /// Resolves a numeric tier index (1..=3).
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::Tier1),
            2 => Some(Self::Tier2),
            3 => Some(Self::Tier3),
            _ => None,
        }
    }

    /// Returns the numeric index for tiers 1..=3, `None` for experimental.
    #[must_use]
    pub const fn index(&self) -> Option<u8> {
        match self {
            Self::Tier1 => Some(1),
            Self::Tier2 => Some(2),
            Self::Tier3 => Some(3),
            Self::Experimental => None,
        }
    }

    /// Returns the stable string form used in policy documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tier1 => "1",
            Self::Tier2 => "2",
            Self::Tier3 => "3",
            Self::Experimental => "experimental",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Budgets
// ============================================================================

/// Maximum change scope allowed under a tier.
///
/// Either a tier baseline or an effective value after waiver deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBudget {
    /// Maximum number of files a change may touch.
    pub max_files: u64,
    /// Maximum lines of code a change may touch.
    pub max_loc: u64,
}

// ============================================================================
// SECTION: Tier Policy
// ============================================================================

/// Quality requirements for a single risk tier.
///
/// # Invariants
/// - `min_branch` and `min_mutation` are finite values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPolicy {
    /// Maximum number of files a change may touch.
    pub max_files: u64,
    /// Maximum lines of code a change may touch.
    pub max_loc: u64,
    /// Minimum branch coverage required (unit interval).
    pub min_branch: f64,
    /// Minimum mutation score required (unit interval).
    pub min_mutation: f64,
    /// Whether consumer and provider contract checks are required.
    pub requires_contracts: bool,
    /// Whether a manual review is required before merge.
    #[serde(default)]
    pub requires_manual_review: Option<bool>,
    /// Change modes permitted under this tier.
    #[serde(default)]
    pub allowed_modes: Vec<String>,
}

impl TierPolicy {
    /// Returns the baseline change budget for this tier.
    #[must_use]
    pub const fn budget(&self) -> ChangeBudget {
        ChangeBudget {
            max_files: self.max_files,
            max_loc: self.max_loc,
        }
    }
}

// ============================================================================
// SECTION: Document-Level Rules
// ============================================================================

/// Repository edit rules carried from the policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EditRules {
    /// Whether policy and code edits may land in the same change.
    #[serde(default)]
    pub policy_and_code_same_pr: Option<bool>,
    /// Minimum approvers required to raise a budget.
    #[serde(default)]
    pub min_approvers_for_budget_raise: Option<u32>,
    /// Whether signed commits are required.
    #[serde(default)]
    pub require_signed_commits: Option<bool>,
}

/// Per-gate enablement toggle from the policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateToggle {
    /// Whether the gate is enforced.
    pub enabled: bool,
    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Waiver approval requirements from the policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WaiverApprovalRules {
    /// Minimum approvers a waiver must carry to be valid.
    #[serde(default)]
    pub required_approvers: Option<u32>,
    /// Maximum waiver duration in days granted by the approval workflow.
    #[serde(default)]
    pub max_duration_days: Option<u32>,
}

// ============================================================================
// SECTION: Risk Policy
// ============================================================================

/// Complete risk-tier policy snapshot.
///
/// # Invariants
/// - Tiers 1, 2, and 3 are always present.
/// - Immutable once constructed; replaced wholesale on cache invalidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Policy document version.
    pub version: String,
    /// Per-tier quality requirements.
    pub tiers: BTreeMap<RiskTier, TierPolicy>,
    /// Whether this snapshot is the built-in default (no document found).
    pub is_default: bool,
    /// Repository edit rules, when the document declares them.
    #[serde(default)]
    pub edit_rules: Option<EditRules>,
    /// Per-gate enablement toggles keyed by gate name.
    #[serde(default)]
    pub gate_toggles: BTreeMap<String, GateToggle>,
    /// Waiver approval requirements, when the document declares them.
    #[serde(default)]
    pub waiver_approval: Option<WaiverApprovalRules>,
}

impl RiskPolicy {
    /// Constructs a validated policy snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyValidationError`] naming the offending field when the
    /// policy is incomplete or carries out-of-range values.
    pub fn new(
        version: impl Into<String>,
        tiers: BTreeMap<RiskTier, TierPolicy>,
        edit_rules: Option<EditRules>,
        gate_toggles: BTreeMap<String, GateToggle>,
        waiver_approval: Option<WaiverApprovalRules>,
    ) -> Result<Self, PolicyValidationError> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(PolicyValidationError::MissingField {
                field: "version".to_string(),
            });
        }
        for tier in [RiskTier::Tier1, RiskTier::Tier2, RiskTier::Tier3] {
            let Some(entry) = tiers.get(&tier) else {
                return Err(PolicyValidationError::MissingTier {
                    tier,
                });
            };
            validate_unit_threshold(tier, "coverage_threshold", entry.min_branch)?;
            validate_unit_threshold(tier, "mutation_threshold", entry.min_mutation)?;
        }
        if let Some(entry) = tiers.get(&RiskTier::Experimental) {
            validate_unit_threshold(RiskTier::Experimental, "coverage_threshold", entry.min_branch)?;
            validate_unit_threshold(
                RiskTier::Experimental,
                "mutation_threshold",
                entry.min_mutation,
            )?;
        }
        if let Some(rules) = &edit_rules
            && rules.min_approvers_for_budget_raise == Some(0)
        {
            return Err(PolicyValidationError::InvalidField {
                field: "edit_rules.min_approvers_for_budget_raise".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(approval) = &waiver_approval {
            if approval.required_approvers == Some(0) {
                return Err(PolicyValidationError::InvalidField {
                    field: "waiver_approval.required_approvers".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            if approval.max_duration_days == Some(0) {
                return Err(PolicyValidationError::InvalidField {
                    field: "waiver_approval.max_duration_days".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(Self {
            version,
            tiers,
            is_default: false,
            edit_rules,
            gate_toggles,
            waiver_approval,
        })
    }

    /// Returns the built-in default policy used when no document exists.
    #[must_use]
    pub fn builtin_default() -> Self {
        let mut tiers = BTreeMap::new();
        tiers.insert(
            RiskTier::Tier1,
            TierPolicy {
                max_files: 10,
                max_loc: 400,
                min_branch: 0.9,
                min_mutation: 0.8,
                requires_contracts: true,
                requires_manual_review: Some(true),
                allowed_modes: vec!["full".to_string()],
            },
        );
        tiers.insert(
            RiskTier::Tier2,
            TierPolicy {
                max_files: 25,
                max_loc: 1000,
                min_branch: 0.8,
                min_mutation: 0.7,
                requires_contracts: true,
                requires_manual_review: None,
                allowed_modes: vec!["full".to_string(), "partial".to_string()],
            },
        );
        tiers.insert(
            RiskTier::Tier3,
            TierPolicy {
                max_files: 50,
                max_loc: 2000,
                min_branch: 0.6,
                min_mutation: 0.5,
                requires_contracts: false,
                requires_manual_review: None,
                allowed_modes: vec!["full".to_string(), "partial".to_string()],
            },
        );
        tiers.insert(RiskTier::Experimental, Self::default_experimental_tier());
        Self {
            version: "builtin-default".to_string(),
            tiers,
            is_default: true,
            edit_rules: None,
            gate_toggles: BTreeMap::new(),
            waiver_approval: None,
        }
    }

    /// Returns the relaxed tier profile substituted in experimental mode.
    #[must_use]
    pub fn default_experimental_tier() -> TierPolicy {
        TierPolicy {
            max_files: 15,
            max_loc: 600,
            min_branch: 0.4,
            min_mutation: 0.3,
            requires_contracts: false,
            requires_manual_review: None,
            allowed_modes: vec![
                "full".to_string(),
                "partial".to_string(),
                "experimental".to_string(),
            ],
        }
    }

    /// Returns the policy entry for a tier, if configured.
    #[must_use]
    pub fn tier(&self, tier: RiskTier) -> Option<&TierPolicy> {
        self.tiers.get(&tier)
    }

    /// Returns whether a gate is enforced; gates default to enabled.
    #[must_use]
    pub fn gate_enabled(&self, gate: GateKind) -> bool {
        self.gate_toggles.get(gate.as_str()).is_none_or(|toggle| toggle.enabled)
    }

    /// Returns the minimum approver count a waiver must carry.
    #[must_use]
    pub fn required_waiver_approvers(&self) -> u32 {
        self.waiver_approval
            .as_ref()
            .and_then(|approval| approval.required_approvers)
            .unwrap_or(1)
    }
}

/// Validates a unit-interval threshold field for a tier entry.
fn validate_unit_threshold(
    tier: RiskTier,
    field: &str,
    value: f64,
) -> Result<(), PolicyValidationError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(PolicyValidationError::InvalidField {
            field: format!("risk_tiers.{tier}.{field}"),
            reason: format!("must be a finite value in [0, 1], got {value}"),
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Policy document validation errors. Fatal: evaluation must not proceed
/// against a malformed policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyValidationError {
    /// The document is not parseable at all.
    #[error("policy document is not valid TOML: {0}")]
    Syntax(String),
    /// A required field is absent.
    #[error("policy document missing required field `{field}`")]
    MissingField {
        /// Dotted path of the missing field.
        field: String,
    },
    /// A required tier entry is absent.
    #[error("policy document missing entry for risk tier {tier}")]
    MissingTier {
        /// Tier whose entry is missing.
        tier: RiskTier,
    },
    /// A field is present but carries an invalid value.
    #[error("policy field `{field}` is invalid: {reason}")]
    InvalidField {
        /// Dotted path of the invalid field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}
