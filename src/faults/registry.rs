//! Fault registry: exact failure type → HTTP status code.
//!
//! # Concurrency
//! The table is an immutable `HashMap` behind an [`ArcSwap`]. Readers load the
//! current table without locking and always see one complete version. Writers
//! go through `rcu`, which retries on contention, so concurrent writers never
//! drop each other's changes. A reset is a single atomic store.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::http::StatusCode;

use crate::faults::builtin::InvalidArgument;
use crate::faults::failure::{Failure, FaultKey};

/// Immutable view of the registry contents.
pub type FaultTable = HashMap<FaultKey, StatusCode>;

/// Result of classifying one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The exact type is registered with this status.
    Tracked(StatusCode),
    /// No entry for the exact type.
    Untracked,
}

/// Table of tracked failure types.
///
/// Matching is by exact type. Registering `InvalidArgument` does not cover an
/// error that wraps an `InvalidArgument`; every concrete type that should get a
/// normalized response has to be registered on its own.
pub struct FaultRegistry {
    table: ArcSwap<FaultTable>,
}

impl FaultRegistry {
    /// Create a registry holding only the baseline entry.
    pub fn new() -> Self {
        Self {
            table: ArcSwap::from_pointee(default_table()),
        }
    }

    /// Track `E` with the given status. Returns false and keeps the existing
    /// status if `E` is already tracked.
    pub fn register<E: 'static>(&self, status: StatusCode) -> bool {
        self.register_key(FaultKey::of::<E>(), status)
    }

    pub fn register_key(&self, key: FaultKey, status: StatusCode) -> bool {
        let mut inserted = false;
        self.table.rcu(|current| {
            if current.contains_key(&key) {
                inserted = false;
                return Arc::clone(current);
            }
            inserted = true;
            let mut next = FaultTable::clone(current);
            next.insert(key, status);
            Arc::new(next)
        });

        if inserted {
            tracing::debug!(fault = %key, status = status.as_u16(), "Fault type registered");
        }
        inserted
    }

    /// Stop tracking `E`. Returns whether an entry was removed.
    pub fn unregister<E: 'static>(&self) -> bool {
        self.unregister_key(FaultKey::of::<E>())
    }

    pub fn unregister_key(&self, key: FaultKey) -> bool {
        let mut removed = false;
        self.table.rcu(|current| {
            if !current.contains_key(&key) {
                removed = false;
                return Arc::clone(current);
            }
            removed = true;
            let mut next = FaultTable::clone(current);
            next.remove(&key);
            Arc::new(next)
        });

        if removed {
            tracing::debug!(fault = %key, "Fault type unregistered");
        }
        removed
    }

    /// True iff the exact type of `failure` is tracked.
    pub fn exists(&self, failure: &Failure) -> bool {
        self.contains_key(&failure.key())
    }

    pub fn contains_key(&self, key: &FaultKey) -> bool {
        self.table.load().contains_key(key)
    }

    /// Status for the exact type of `failure`, or `0` when untracked.
    pub fn status_for(&self, failure: &Failure) -> u16 {
        self.table
            .load()
            .get(&failure.key())
            .map_or(0, StatusCode::as_u16)
    }

    /// Classify `failure` against a single consistent view of the table.
    pub fn classify(&self, failure: &Failure) -> Classification {
        match self.table.load().get(&failure.key()) {
            Some(status) => Classification::Tracked(*status),
            None => Classification::Untracked,
        }
    }

    /// Change the status of the exact type of `failure`. Does nothing and
    /// returns false if that type is not tracked.
    pub fn update_status(&self, failure: &Failure, status: StatusCode) -> bool {
        self.update_status_key(failure.key(), status)
    }

    pub fn update_status_key(&self, key: FaultKey, status: StatusCode) -> bool {
        let mut updated = false;
        self.table.rcu(|current| {
            if !current.contains_key(&key) {
                updated = false;
                return Arc::clone(current);
            }
            updated = true;
            let mut next = FaultTable::clone(current);
            next.insert(key, status);
            Arc::new(next)
        });

        if updated {
            tracing::debug!(fault = %key, status = status.as_u16(), "Fault status updated");
        }
        updated
    }

    /// Look up a tracked type by its display name.
    ///
    /// Display names are not unique across modules; when two tracked types
    /// share a name, which one is returned is unspecified.
    pub fn key_by_name(&self, name: &str) -> Option<FaultKey> {
        self.table.load().keys().find(|key| key.name() == name).copied()
    }

    /// Change the status of a tracked type found by display name.
    pub fn update_status_by_name(&self, name: &str, status: StatusCode) -> bool {
        match self.key_by_name(name) {
            Some(key) => self.update_status_key(key, status),
            None => false,
        }
    }

    /// Replace the table with exactly the baseline entry.
    pub fn reset_to_defaults(&self) {
        self.table.store(Arc::new(default_table()));
        tracing::debug!("Fault registry reset to defaults");
    }

    /// Read-only view of every entry at this instant.
    pub fn snapshot(&self) -> Arc<FaultTable> {
        self.table.load_full()
    }

    pub fn len(&self) -> usize {
        self.table.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.load().is_empty()
    }
}

impl Default for FaultRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FaultRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.table.load().iter()).finish()
    }
}

fn default_table() -> FaultTable {
    HashMap::from([(FaultKey::of::<InvalidArgument>(), StatusCode::BAD_REQUEST)])
}
