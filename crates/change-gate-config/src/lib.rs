// crates/change-gate-config/src/lib.rs
// ============================================================================
// Module: Change Gate Config Library
// Description: Document parsing and filesystem sources for Change Gate.
// Purpose: Provide strict, fail-closed policy parsing and fail-open waiver reading.
// Dependencies: change-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! This crate owns the on-disk document formats: the risk-tier policy and
//! waiver records under a project's `.change-gate/` directory. It implements
//! the core's [`change_gate_core::PolicySource`] and
//! [`change_gate_core::WaiverSource`] traits so hosts can compose the engine
//! against real storage.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod policy_file;
pub mod sources;
pub mod waiver_file;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use policy_file::parse_policy_document;
pub use sources::CONFIG_DIR;
pub use sources::FsPolicySource;
pub use sources::FsWaiverSource;
pub use sources::MAX_DOCUMENT_BYTES;
pub use sources::POLICY_FILE_NAME;
pub use sources::WAIVERS_DIR_NAME;
pub use waiver_file::parse_waiver_document;
