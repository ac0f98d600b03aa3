// crates/change-gate-core/src/core/time.rs
// ============================================================================
// Module: Change Gate Time Model
// Description: Canonical timestamp representation for waiver expiry decisions.
// Purpose: Provide deterministic, replayable time values across Change Gate records.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! Change Gate uses explicit time values supplied by callers to keep gate
//! evaluation deterministic. The core engine never reads wall-clock time for
//! validity decisions; hosts must supply `now` on every call that needs it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Canonical timestamp used for waiver expiry and evaluation snapshots.
///
/// # Invariants
/// - Values are unix seconds explicitly provided by callers or documents.
/// - Comparisons are total; no timezone state is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix seconds.
    #[must_use]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Returns the timestamp as unix seconds.
    #[must_use]
    pub const fn as_unix_seconds(&self) -> i64 {
        self.0
    }

    /// Parses an RFC 3339 string (for example `2026-03-01T00:00:00Z`).
    ///
    /// # Errors
    ///
    /// Returns [`TimestampParseError`] when the input is not valid RFC 3339.
    pub fn parse_rfc3339(input: &str) -> Result<Self, TimestampParseError> {
        let parsed = OffsetDateTime::parse(input, &Rfc3339)?;
        Ok(Self(parsed.unix_timestamp()))
    }
}

/// Timestamp parsing errors.
#[derive(Debug, Error)]
pub enum TimestampParseError {
    /// Input was not a valid RFC 3339 timestamp.
    #[error("invalid rfc3339 timestamp: {0}")]
    Rfc3339(#[from] time::error::Parse),
}
