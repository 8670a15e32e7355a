//! Cached killmail detail lookups.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Result;

/// Victim fit and timestamp extracted from a killmail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Killmail {
    /// Type ids of the items fitted to (or carried by) the victim.
    pub victim_item_types: Vec<i64>,
    /// Time the kill occurred.
    pub time: DateTime<Utc>,
}

/// Single-killmail fetch backend.
pub trait KillmailLookup {
    fn killmail(&self, id: i64, hash: &str) -> Result<Killmail>;
}

/// Append-only, process-lifetime cache of killmail details keyed by
/// killmail id.
#[derive(Debug)]
pub struct KillmailCache<C> {
    client: C,
    entries: Mutex<HashMap<i64, Killmail>>,
}

impl<C: KillmailLookup> KillmailCache<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Details for killmail `id`, fetching through the backend at most once
    /// per id for the process lifetime. A failed fetch caches nothing.
    pub fn items_for(&self, id: i64, hash: &str) -> Result<Killmail> {
        if let Some(found) = lock(&self.entries).get(&id) {
            debug!(killmail = id, "killmail served from cache");
            return Ok(found.clone());
        }

        let fetched = self.client.killmail(id, hash)?;
        lock(&self.entries)
            .entry(id)
            .or_insert_with(|| fetched.clone());
        Ok(fetched)
    }
}

/// See `resolve::lock`: a poisoned lock leaves the map coherent, so recover
/// the guard and continue.
fn lock<K, V>(entries: &Mutex<HashMap<K, V>>) -> MutexGuard<'_, HashMap<K, V>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}
