//! Per-project-root mutual exclusion.
//!
//! Two requests against the same root would otherwise load, rewrite and
//! commit the same files concurrently. [`RootGate`] hands out one async mutex
//! per canonical root; requests on different roots never wait on each other.
//! A root's mutex lives only while some request holds or waits for it, so the
//! map stays bounded by the number of roots in flight.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed async lock over canonical project roots.
///
/// Backed by `DashMap` so lookups from concurrent handler tasks do not
/// contend on a global lock.
#[derive(Debug, Default)]
pub struct RootGate {
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

/// Exclusive hold on one root. Releases it when dropped.
#[derive(Debug)]
pub struct RootGuard<'a> {
    gate: &'a RootGate,
    key: PathBuf,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for RootGuard<'_> {
    fn drop(&mut self) {
        // The guard owns a handle to the mutex; release it before counting.
        drop(self.guard.take());
        self.gate
            .locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl RootGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical form of `root`; the path as given if it cannot be resolved.
    pub fn key(root: &Path) -> PathBuf {
        std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf())
    }

    /// The mutex guarding `key`, created on first use.
    fn lock_for(&self, key: &Path) -> Arc<Mutex<()>> {
        self.locks.entry(key.to_path_buf()).or_default().clone()
    }

    /// Wait until no other run holds `root`.
    pub async fn acquire(&self, root: &Path) -> RootGuard<'_> {
        let key = Self::key(root);
        let guard = self.lock_for(&key).lock_owned().await;
        RootGuard {
            gate: self,
            key,
            guard: Some(guard),
        }
    }
}
