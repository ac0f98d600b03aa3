// crates/change-gate-config/src/waiver_file.rs
// ============================================================================
// Module: Waiver Document Parsing
// Description: TOML parsing for waiver documents with RFC 3339 expiry support.
// Purpose: Convert on-disk waiver records into core waiver documents.
// Dependencies: change-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Waiver documents are written by an external approval workflow; this
//! module only reads them. Parse failures surface as [`WaiverLoadError`] so
//! the ledger can degrade to "treat as absent" rather than blocking an
//! evaluation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use change_gate_core::BudgetDelta;
use change_gate_core::GateKind;
use change_gate_core::Timestamp;
use change_gate_core::WaiverDocument;
use change_gate_core::WaiverId;
use change_gate_core::WaiverLoadError;
use change_gate_core::WaiverStatus;
use serde::Deserialize;

// ============================================================================
// SECTION: Raw Document Schema
// ============================================================================

/// Raw waiver document as written on disk.
#[derive(Debug, Deserialize)]
struct WaiverFile {
    /// Waiver identifier; defaults to the filename stem when omitted.
    id: Option<String>,
    /// Optional human-readable title.
    #[serde(default)]
    title: Option<String>,
    /// Lifecycle status token.
    status: Option<String>,
    /// Stated reason for the exception.
    #[serde(default)]
    reason: Option<String>,
    /// Gate names this waiver covers.
    #[serde(default)]
    gates: Vec<String>,
    /// Expiry as RFC 3339 string, TOML datetime, or unix seconds.
    #[serde(default)]
    expires_at: Option<toml::Value>,
    /// Approvers recorded by the approval workflow.
    #[serde(default)]
    approvers: Vec<String>,
    /// Additive budget adjustment.
    #[serde(default)]
    delta: Option<BudgetDelta>,
    /// Maximum trust score ceiling while the waiver is in effect.
    #[serde(default)]
    max_trust_score: Option<u8>,
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a waiver document, using `fallback_id` when the document omits one.
///
/// # Errors
///
/// Returns [`WaiverLoadError::Malformed`] when the document cannot be parsed
/// or carries unrecognized tokens.
pub fn parse_waiver_document(
    text: &str,
    fallback_id: Option<&str>,
) -> Result<WaiverDocument, WaiverLoadError> {
    let file: WaiverFile =
        toml::from_str(text).map_err(|error| WaiverLoadError::Malformed(error.to_string()))?;

    let id = file
        .id
        .or_else(|| fallback_id.map(ToString::to_string))
        .ok_or_else(|| WaiverLoadError::Malformed("missing waiver id".to_string()))?;

    let status_token = file
        .status
        .ok_or_else(|| WaiverLoadError::Malformed("missing waiver status".to_string()))?;
    let status = parse_status(&status_token)?;

    let mut gates = Vec::with_capacity(file.gates.len());
    for name in &file.gates {
        let gate = GateKind::from_str_opt(name)
            .ok_or_else(|| WaiverLoadError::Malformed(format!("unknown gate `{name}`")))?;
        gates.push(gate);
    }

    let expires_at = file.expires_at.as_ref().map(parse_expiry).transpose()?;

    Ok(WaiverDocument {
        id: WaiverId::new(id),
        title: file.title,
        status,
        reason: file.reason.unwrap_or_default(),
        gates,
        expires_at,
        approvers: file.approvers,
        delta: file.delta,
        max_trust_score: file.max_trust_score,
    })
}

/// Parses a lifecycle status token.
fn parse_status(token: &str) -> Result<WaiverStatus, WaiverLoadError> {
    match token {
        "active" => Ok(WaiverStatus::Active),
        "expired" => Ok(WaiverStatus::Expired),
        "revoked" => Ok(WaiverStatus::Revoked),
        other => Err(WaiverLoadError::Malformed(format!("unknown waiver status `{other}`"))),
    }
}

/// Parses an expiry value in any supported form.
fn parse_expiry(value: &toml::Value) -> Result<Timestamp, WaiverLoadError> {
    if let Some(seconds) = value.as_integer() {
        return Ok(Timestamp::from_unix_seconds(seconds));
    }
    let text = if let Some(text) = value.as_str() {
        text.to_string()
    } else if let Some(datetime) = value.as_datetime() {
        datetime.to_string()
    } else {
        return Err(WaiverLoadError::Malformed(format!(
            "expires_at must be an rfc3339 string, datetime, or unix seconds, got {value}"
        )));
    };
    Timestamp::parse_rfc3339(&text)
        .map_err(|error| WaiverLoadError::Malformed(format!("invalid expires_at: {error}")))
}
