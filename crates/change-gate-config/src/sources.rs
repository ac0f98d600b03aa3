// crates/change-gate-config/src/sources.rs
// ============================================================================
// Module: Filesystem Document Sources
// Description: Filesystem-backed policy and waiver sources.
// Purpose: Implement the core source traits over a project's .change-gate directory.
// Dependencies: change-gate-core, std::fs
// ============================================================================

//! ## Overview
//! Documents live under `<project_root>/.change-gate/`: the policy at
//! `policy.toml` and waivers at `waivers/<id>.toml`. A 1 MiB size cap
//! applies to every document; oversized or unreadable files are reported
//! through the source error types so the runtime can apply its fatal
//! (policy) or fail-open (waiver) handling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use change_gate_core::PolicySource;
use change_gate_core::PolicySourceError;
use change_gate_core::RiskPolicy;
use change_gate_core::WaiverDocument;
use change_gate_core::WaiverId;
use change_gate_core::WaiverLoadError;
use change_gate_core::WaiverSource;

use crate::policy_file::parse_policy_document;
use crate::waiver_file::parse_waiver_document;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Directory under the project root holding Change Gate documents.
pub const CONFIG_DIR: &str = ".change-gate";
/// Policy document filename.
pub const POLICY_FILE_NAME: &str = "policy.toml";
/// Subdirectory holding waiver documents.
pub const WAIVERS_DIR_NAME: &str = "waivers";
/// Maximum document size in bytes.
pub const MAX_DOCUMENT_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Policy Source
// ============================================================================

/// Filesystem-backed policy source.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPolicySource;

impl FsPolicySource {
    /// Creates a filesystem policy source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the policy document path for a project root.
    #[must_use]
    pub fn policy_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR).join(POLICY_FILE_NAME)
    }
}

impl PolicySource for FsPolicySource {
    fn load_policy(&self, project_root: &Path) -> Result<Option<RiskPolicy>, PolicySourceError> {
        let path = Self::policy_path(project_root);
        if !path.exists() {
            return Ok(None);
        }
        let text = read_document(&path).map_err(PolicySourceError::Read)?;
        Ok(Some(parse_policy_document(&text)?))
    }
}

// ============================================================================
// SECTION: Waiver Source
// ============================================================================

/// Filesystem-backed waiver source.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWaiverSource;

impl FsWaiverSource {
    /// Creates a filesystem waiver source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the waivers directory for a project root.
    #[must_use]
    pub fn waivers_dir(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR).join(WAIVERS_DIR_NAME)
    }
}

impl WaiverSource for FsWaiverSource {
    fn load_waiver(
        &self,
        id: &WaiverId,
        project_root: &Path,
    ) -> Result<Option<WaiverDocument>, WaiverLoadError> {
        validate_waiver_id(id)?;
        let path = Self::waivers_dir(project_root).join(format!("{id}.toml"));
        if !path.exists() {
            return Ok(None);
        }
        let text = read_document(&path).map_err(WaiverLoadError::Read)?;
        Ok(Some(parse_waiver_document(&text, Some(id.as_str()))?))
    }

    fn list_waivers(&self, project_root: &Path) -> Result<Vec<WaiverId>, WaiverLoadError> {
        let dir = Self::waivers_dir(project_root);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&dir)
            .map_err(|error| WaiverLoadError::Read(format!("{}: {error}", dir.display())))?;
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|error| WaiverLoadError::Read(format!("{}: {error}", dir.display())))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml")
                && let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
            {
                ids.push(WaiverId::new(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Rejects waiver identifiers that could escape the waivers directory.
fn validate_waiver_id(id: &WaiverId) -> Result<(), WaiverLoadError> {
    let raw = id.as_str();
    let safe = !raw.is_empty()
        && !raw.starts_with('.')
        && raw.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if safe {
        Ok(())
    } else {
        Err(WaiverLoadError::Malformed(format!("waiver id `{raw}` contains unsupported characters")))
    }
}

/// Reads a document with the size cap applied.
fn read_document(path: &Path) -> Result<String, String> {
    let metadata =
        fs::metadata(path).map_err(|error| format!("{}: {error}", path.display()))?;
    if metadata.len() > MAX_DOCUMENT_BYTES {
        return Err(format!(
            "{}: document exceeds {MAX_DOCUMENT_BYTES} bytes",
            path.display()
        ));
    }
    fs::read_to_string(path).map_err(|error| format!("{}: {error}", path.display()))
}
