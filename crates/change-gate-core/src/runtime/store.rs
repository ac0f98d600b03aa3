// crates/change-gate-core/src/runtime/store.rs
// ============================================================================
// Module: Change Gate Policy Store
// Description: TTL-cached policy loading keyed per project root.
// Purpose: Serve immutable policy snapshots without a filesystem read per check.
// Dependencies: crate::core, crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! The policy store trades a bounded staleness window (default five minutes)
//! for avoiding a document read on every gate check. Cache entries are
//! immutable [`RiskPolicy`] snapshots behind `Arc`, so concurrent callers
//! share them safely; invalidation replaces an entry wholesale.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use tracing::debug;

use crate::core::RiskPolicy;
use crate::core::WaiverDocument;
use crate::core::WaiverId;
use crate::interfaces::PolicySource;
use crate::interfaces::PolicySourceError;
use crate::interfaces::WaiverLoadError;
use crate::interfaces::WaiverSource;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default cache time-to-live for policy snapshots.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

// ============================================================================
// SECTION: Cache Types
// ============================================================================

/// Age and remaining time-to-live for a cached policy snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatus {
    /// Time elapsed since the snapshot was loaded.
    pub age: Duration,
    /// Time remaining before the snapshot expires; zero when stale.
    pub remaining: Duration,
}

/// One cached policy snapshot.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Immutable policy snapshot.
    policy: Arc<RiskPolicy>,
    /// Instant the snapshot was loaded.
    loaded_at: Instant,
}

// ============================================================================
// SECTION: Policy Store
// ============================================================================

/// TTL-cached policy store over an injected [`PolicySource`].
#[derive(Debug)]
pub struct PolicyStore<S> {
    /// Document source consulted on cache misses.
    source: S,
    /// Cache time-to-live.
    ttl: Duration,
    /// Cached snapshots keyed per project root.
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl<S: PolicySource> PolicyStore<S> {
    /// Creates a policy store with the default five-minute TTL.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, DEFAULT_CACHE_TTL)
    }

    /// Creates a policy store with an explicit cache TTL.
    #[must_use]
    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Loads the policy for a project root, serving a fresh cache hit when
    /// available. Absent documents yield the built-in default policy.
    ///
    /// # Errors
    ///
    /// Returns [`PolicySourceError`] when the document cannot be read or
    /// fails validation.
    pub fn load_policy(&self, project_root: &Path) -> Result<Arc<RiskPolicy>, PolicySourceError> {
        if let Some(entry) = self.fresh_entry(project_root) {
            return Ok(entry);
        }
        debug!(project_root = %project_root.display(), "policy cache miss");
        self.refresh(project_root)
    }

    /// Reloads the policy for a project root, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns [`PolicySourceError`] when the document cannot be read or
    /// fails validation.
    pub fn reload_policy(&self, project_root: &Path) -> Result<Arc<RiskPolicy>, PolicySourceError> {
        self.refresh(project_root)
    }

    /// Clears one cached entry, or all entries when no root is given.
    pub fn clear_cache(&self, project_root: Option<&Path>) {
        if let Ok(mut guard) = self.entries.lock() {
            match project_root {
                Some(root) => {
                    guard.remove(root);
                }
                None => guard.clear(),
            }
        }
    }

    /// Reports the age and remaining TTL of a cached entry, if present.
    #[must_use]
    pub fn cache_status(&self, project_root: &Path) -> Option<CacheStatus> {
        let guard = self.entries.lock().ok()?;
        let entry = guard.get(project_root)?;
        let age = entry.loaded_at.elapsed();
        Some(CacheStatus {
            age,
            remaining: self.ttl.saturating_sub(age),
        })
    }

    /// Returns a cached snapshot when one exists and is within the TTL.
    fn fresh_entry(&self, project_root: &Path) -> Option<Arc<RiskPolicy>> {
        let guard = self.entries.lock().ok()?;
        let entry = guard.get(project_root)?;
        if entry.loaded_at.elapsed() <= self.ttl {
            Some(Arc::clone(&entry.policy))
        } else {
            None
        }
    }

    /// Loads from the source and replaces the cached entry wholesale.
    fn refresh(&self, project_root: &Path) -> Result<Arc<RiskPolicy>, PolicySourceError> {
        let loaded = self.source.load_policy(project_root)?;
        let policy = Arc::new(loaded.unwrap_or_else(RiskPolicy::builtin_default));
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| PolicySourceError::Read("policy cache mutex poisoned".to_string()))?;
        guard.insert(
            project_root.to_path_buf(),
            CacheEntry {
                policy: Arc::clone(&policy),
                loaded_at: Instant::now(),
            },
        );
        Ok(policy)
    }
}

// ============================================================================
// SECTION: In-Memory Source
// ============================================================================

/// In-memory policy source for tests and embedded hosts.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPolicySource {
    /// Policies keyed per project root.
    policies: Arc<Mutex<HashMap<PathBuf, RiskPolicy>>>,
}

impl InMemoryPolicySource {
    /// Creates an empty in-memory policy source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a policy document for a project root.
    pub fn insert(&self, project_root: impl Into<PathBuf>, policy: RiskPolicy) {
        if let Ok(mut guard) = self.policies.lock() {
            guard.insert(project_root.into(), policy);
        }
    }
}

impl PolicySource for InMemoryPolicySource {
    fn load_policy(&self, project_root: &Path) -> Result<Option<RiskPolicy>, PolicySourceError> {
        let guard = self
            .policies
            .lock()
            .map_err(|_| PolicySourceError::Read("policy source mutex poisoned".to_string()))?;
        Ok(guard.get(project_root).cloned())
    }
}

/// In-memory waiver source for tests and embedded hosts.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWaiverSource {
    /// Waiver documents keyed per project root and waiver id.
    waivers: Arc<Mutex<HashMap<PathBuf, HashMap<WaiverId, WaiverDocument>>>>,
}

impl InMemoryWaiverSource {
    /// Creates an empty in-memory waiver source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a waiver document for a project root.
    pub fn insert(&self, project_root: impl Into<PathBuf>, waiver: WaiverDocument) {
        if let Ok(mut guard) = self.waivers.lock() {
            guard.entry(project_root.into()).or_default().insert(waiver.id.clone(), waiver);
        }
    }
}

impl WaiverSource for InMemoryWaiverSource {
    fn load_waiver(
        &self,
        id: &WaiverId,
        project_root: &Path,
    ) -> Result<Option<WaiverDocument>, WaiverLoadError> {
        let guard = self
            .waivers
            .lock()
            .map_err(|_| WaiverLoadError::Read("waiver source mutex poisoned".to_string()))?;
        Ok(guard.get(project_root).and_then(|documents| documents.get(id)).cloned())
    }

    fn list_waivers(&self, project_root: &Path) -> Result<Vec<WaiverId>, WaiverLoadError> {
        let guard = self
            .waivers
            .lock()
            .map_err(|_| WaiverLoadError::Read("waiver source mutex poisoned".to_string()))?;
        Ok(guard
            .get(project_root)
            .map(|documents| documents.keys().cloned().collect())
            .unwrap_or_default())
    }
}
