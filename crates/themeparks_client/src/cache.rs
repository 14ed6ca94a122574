//! In-memory cache of park snapshots.
//!
//! One entry per entity id, fixed TTL for the cache's lifetime. Staleness is
//! only checked when an entry is read; nothing is evicted in the background.

use chrono::{DateTime, Utc};
use common::ParkSnapshot;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};

/// Thread-safe snapshot cache keyed by entity id.
#[derive(Debug)]
pub struct SnapshotCache {
    entries: DashMap<String, Arc<ParkSnapshot>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Cached snapshot for `entity_id` if it is younger than the TTL.
    pub fn get_fresh(&self, entity_id: &str) -> Option<Arc<ParkSnapshot>> {
        let entry = self.entries.get(entity_id)?;
        let snapshot = Arc::clone(entry.value());
        drop(entry);

        // A refresh stamped after "now" (clock stepped back) counts as age zero.
        let fresh = match (self.clock.now() - snapshot.last_refreshed).to_std() {
            Ok(age) => age < self.ttl,
            Err(_) => Duration::ZERO < self.ttl,
        };
        fresh.then_some(snapshot)
    }

    /// Cached snapshot for `entity_id` regardless of age.
    pub fn get(&self, entity_id: &str) -> Option<Arc<ParkSnapshot>> {
        self.entries.get(entity_id).map(|e| Arc::clone(e.value()))
    }

    /// Store a snapshot under its own id, replacing any previous one.
    pub fn insert(&self, snapshot: ParkSnapshot) -> Arc<ParkSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.entries
            .insert(snapshot.id.clone(), Arc::clone(&snapshot));
        snapshot
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
