// crates/change-gate-config/src/policy_file.rs
// ============================================================================
// Module: Policy Document Parsing
// Description: Strict TOML parsing and validation for risk-tier policy documents.
// Purpose: Fail closed on malformed policies, naming the offending field.
// Dependencies: change-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Policy documents are parsed leniently into raw TOML values and then
//! validated field by field, so a malformed document is rejected with a
//! [`PolicyValidationError`] that names the exact field instead of a generic
//! deserialization failure. Optional per-tier thresholds fall back to the
//! built-in defaults for that tier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use change_gate_core::EditRules;
use change_gate_core::GateToggle;
use change_gate_core::PolicyValidationError;
use change_gate_core::RiskPolicy;
use change_gate_core::RiskTier;
use change_gate_core::TierPolicy;
use change_gate_core::WaiverApprovalRules;
use serde::Deserialize;

// ============================================================================
// SECTION: Raw Document Schema
// ============================================================================

/// Raw policy document as written on disk.
#[derive(Debug, Deserialize)]
struct PolicyFile {
    /// Document version.
    version: Option<String>,
    /// Per-tier entries keyed by `1`, `2`, `3`, or `experimental`.
    #[serde(default)]
    risk_tiers: BTreeMap<String, TierEntry>,
    /// Repository edit rules.
    #[serde(default)]
    edit_rules: Option<EditRules>,
    /// Per-gate enablement toggles.
    #[serde(default)]
    gates: BTreeMap<String, GateToggle>,
    /// Waiver approval requirements.
    #[serde(default)]
    waiver_approval: Option<WaiverApprovalRules>,
}

/// Raw per-tier entry; budgets are kept as raw values so validation can
/// reject non-numeric input with a precise field path.
#[derive(Debug, Deserialize)]
struct TierEntry {
    /// Maximum files budget.
    max_files: Option<toml::Value>,
    /// Maximum lines-of-code budget.
    max_loc: Option<toml::Value>,
    /// Minimum branch coverage threshold.
    #[serde(default)]
    coverage_threshold: Option<toml::Value>,
    /// Minimum mutation score threshold.
    #[serde(default)]
    mutation_threshold: Option<toml::Value>,
    /// Whether contract checks are required.
    #[serde(default)]
    contracts_required: Option<bool>,
    /// Whether manual review is required.
    #[serde(default)]
    manual_review_required: Option<bool>,
    /// Change modes permitted under the tier.
    #[serde(default)]
    allowed_modes: Option<Vec<String>>,
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses and validates a policy document.
///
/// # Errors
///
/// Returns [`PolicyValidationError`] naming the offending field when the
/// document is malformed or incomplete.
pub fn parse_policy_document(text: &str) -> Result<RiskPolicy, PolicyValidationError> {
    let file: PolicyFile =
        toml::from_str(text).map_err(|error| PolicyValidationError::Syntax(error.to_string()))?;

    let version = file.version.ok_or_else(|| PolicyValidationError::MissingField {
        field: "version".to_string(),
    })?;

    let defaults = RiskPolicy::builtin_default();
    let mut tiers = BTreeMap::new();
    for (key, entry) in &file.risk_tiers {
        let Some(tier) = tier_from_key(key) else {
            return Err(PolicyValidationError::InvalidField {
                field: format!("risk_tiers.{key}"),
                reason: "unrecognized tier; expected 1, 2, 3, or experimental".to_string(),
            });
        };
        tiers.insert(tier, convert_tier_entry(tier, entry, &defaults)?);
    }
    for tier in [RiskTier::Tier1, RiskTier::Tier2, RiskTier::Tier3] {
        if !tiers.contains_key(&tier) {
            return Err(PolicyValidationError::MissingTier {
                tier,
            });
        }
    }
    tiers
        .entry(RiskTier::Experimental)
        .or_insert_with(RiskPolicy::default_experimental_tier);

    RiskPolicy::new(version, tiers, file.edit_rules, file.gates, file.waiver_approval)
}

/// Maps a document tier key onto a risk tier.
fn tier_from_key(key: &str) -> Option<RiskTier> {
    match key {
        "1" => Some(RiskTier::Tier1),
        "2" => Some(RiskTier::Tier2),
        "3" => Some(RiskTier::Tier3),
        "experimental" => Some(RiskTier::Experimental),
        _ => None,
    }
}

/// Converts a raw tier entry into a validated tier policy.
fn convert_tier_entry(
    tier: RiskTier,
    entry: &TierEntry,
    defaults: &RiskPolicy,
) -> Result<TierPolicy, PolicyValidationError> {
    let fallback = defaults.tier(tier).cloned().unwrap_or_else(RiskPolicy::default_experimental_tier);
    let max_files = require_budget(tier, "max_files", entry.max_files.as_ref())?;
    let max_loc = require_budget(tier, "max_loc", entry.max_loc.as_ref())?;
    let min_branch = optional_threshold(tier, "coverage_threshold", entry.coverage_threshold.as_ref())?
        .unwrap_or(fallback.min_branch);
    let min_mutation =
        optional_threshold(tier, "mutation_threshold", entry.mutation_threshold.as_ref())?
            .unwrap_or(fallback.min_mutation);
    Ok(TierPolicy {
        max_files,
        max_loc,
        min_branch,
        min_mutation,
        requires_contracts: entry.contracts_required.unwrap_or(fallback.requires_contracts),
        requires_manual_review: entry.manual_review_required,
        allowed_modes: entry.allowed_modes.clone().unwrap_or(fallback.allowed_modes),
    })
}

/// Requires a non-negative integer budget field.
fn require_budget(
    tier: RiskTier,
    field: &str,
    value: Option<&toml::Value>,
) -> Result<u64, PolicyValidationError> {
    let Some(value) = value else {
        return Err(PolicyValidationError::MissingField {
            field: format!("risk_tiers.{tier}.{field}"),
        });
    };
    let Some(raw) = value.as_integer() else {
        return Err(PolicyValidationError::InvalidField {
            field: format!("risk_tiers.{tier}.{field}"),
            reason: format!("must be a non-negative integer, got {value}"),
        });
    };
    u64::try_from(raw).map_err(|_| PolicyValidationError::InvalidField {
        field: format!("risk_tiers.{tier}.{field}"),
        reason: format!("must be a non-negative integer, got {raw}"),
    })
}

/// Reads an optional unit-interval threshold field.
fn optional_threshold(
    tier: RiskTier,
    field: &str,
    value: Option<&toml::Value>,
) -> Result<Option<f64>, PolicyValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let parsed = value
        .as_float()
        .or_else(|| value.as_integer().map(|raw| raw as f64));
    match parsed {
        Some(threshold) => Ok(Some(threshold)),
        None => Err(PolicyValidationError::InvalidField {
            field: format!("risk_tiers.{tier}.{field}"),
            reason: format!("must be a number, got {value}"),
        }),
    }
}
