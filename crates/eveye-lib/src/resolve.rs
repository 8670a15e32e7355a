//! Bidirectional id/name resolution with process-lifetime caching.
//!
//! The resolver keeps three independent cache partitions (generic universe
//! entities, characters, inventory types). Entries are appended on first
//! resolution and never evicted or overwritten; within a partition the
//! id→name and name→id maps are always updated together so they remain
//! mutual inverses.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{Error, Result};
use crate::esi::{NamePair, UniverseLookup};

/// One cache partition: paired id→name and name→id maps.
#[derive(Debug, Default)]
struct Namespace {
    id_to_name: HashMap<i64, String>,
    name_to_id: HashMap<String, i64>,
}

impl Namespace {
    /// Insert a resolved pair into both directions. Existing entries win;
    /// resolution results are canonical and never replaced, and the two maps
    /// stay mutual inverses because a pair is committed to both or neither.
    fn insert(&mut self, pair: &NamePair) {
        if self.id_to_name.contains_key(&pair.id) || self.name_to_id.contains_key(&pair.name) {
            return;
        }
        self.id_to_name.insert(pair.id, pair.name.clone());
        self.name_to_id.insert(pair.name.clone(), pair.id);
    }
}

/// Append-only resolution cache over a batched universe lookup backend.
///
/// Owned by whatever composes the application and passed to callers
/// explicitly; there is no global state. Each partition is guarded by its
/// own mutex, held only while scanning or committing entries and never
/// across a remote call, so a slow network round-trip does not block
/// resolutions in other partitions.
#[derive(Debug)]
pub struct UniverseResolver<C> {
    client: C,
    universe: Mutex<Namespace>,
    characters: Mutex<Namespace>,
    items: Mutex<Namespace>,
}

impl<C: UniverseLookup> UniverseResolver<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            universe: Mutex::new(Namespace::default()),
            characters: Mutex::new(Namespace::default()),
            items: Mutex::new(Namespace::default()),
        }
    }

    /// Resolve universe ids (ships, characters, corporations, ...) to
    /// display names.
    ///
    /// Ids already cached are answered locally; the remainder is
    /// deduplicated and resolved with exactly one batched remote call.
    /// Output order matches input order and the output always has one name
    /// per input id.
    pub fn resolve_ids_to_names(&self, ids: &[i64]) -> Result<Vec<String>> {
        let missing: Vec<i64> = {
            let cache = lock(&self.universe);
            dedup(
                ids.iter()
                    .copied()
                    .filter(|id| !cache.id_to_name.contains_key(id)),
            )
        };

        if missing.is_empty() {
            debug!(count = ids.len(), "universe ids served from cache");
        } else {
            let resolved = self.client.names_for_ids(&missing)?;
            let mut cache = lock(&self.universe);
            for pair in &resolved {
                cache.insert(pair);
            }
        }

        let cache = lock(&self.universe);
        let mut names = Vec::with_capacity(ids.len());
        let mut unresolved = Vec::new();
        for id in ids {
            match cache.id_to_name.get(id) {
                Some(name) => names.push(name.clone()),
                None => unresolved.push(*id),
            }
        }

        if unresolved.is_empty() {
            Ok(names)
        } else {
            Err(Error::UnresolvedIds {
                ids: dedup(unresolved),
            })
        }
    }

    /// Resolve character names to character ids via the character-biased
    /// name→id endpoint.
    pub fn resolve_names_to_character_ids<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<i64>> {
        self.resolve_names(&self.characters, names, |unresolved| {
            self.client.character_ids_for_names(unresolved)
        })
    }

    /// Resolve inventory-type names (ships, modules) to type ids. Does not
    /// touch the universe partition.
    pub fn resolve_item_names_to_ids<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<i64>> {
        self.resolve_names(&self.items, names, |unresolved| {
            self.client.item_ids_for_names(unresolved)
        })
    }

    /// Shared cache-then-fetch path for the name→id partitions.
    fn resolve_names<S, F>(
        &self,
        namespace: &Mutex<Namespace>,
        names: &[S],
        fetch: F,
    ) -> Result<Vec<i64>>
    where
        S: AsRef<str>,
        F: FnOnce(&[String]) -> Result<Vec<NamePair>>,
    {
        let missing: Vec<String> = {
            let cache = lock(namespace);
            dedup(
                names
                    .iter()
                    .map(|name| name.as_ref())
                    .filter(|name| !cache.name_to_id.contains_key(*name))
                    .map(str::to_string),
            )
        };

        if missing.is_empty() {
            debug!(count = names.len(), "names served from cache");
        } else {
            let resolved = fetch(&missing)?;
            let mut cache = lock(namespace);
            for pair in &resolved {
                cache.insert(pair);
            }
        }

        let cache = lock(namespace);
        let mut ids = Vec::with_capacity(names.len());
        let mut unresolved = Vec::new();
        for name in names {
            match cache.name_to_id.get(name.as_ref()) {
                Some(id) => ids.push(*id),
                None => unresolved.push(name.as_ref().to_string()),
            }
        }

        if unresolved.is_empty() {
            Ok(ids)
        } else {
            Err(Error::UnresolvedNames {
                names: dedup(unresolved),
            })
        }
    }

    /// Name cached in the universe partition for `id`, if any. Never issues
    /// a remote call.
    pub fn cached_name(&self, id: i64) -> Option<String> {
        lock(&self.universe).id_to_name.get(&id).cloned()
    }

    /// Id cached in the universe partition for `name`, if any.
    pub fn cached_id(&self, name: &str) -> Option<i64> {
        lock(&self.universe).name_to_id.get(name).copied()
    }

    /// Character id cached for `name`, if any.
    pub fn cached_character_id(&self, name: &str) -> Option<i64> {
        lock(&self.characters).name_to_id.get(name).copied()
    }

    /// Character name cached for `id`, if any.
    pub fn cached_character_name(&self, id: i64) -> Option<String> {
        lock(&self.characters).id_to_name.get(&id).cloned()
    }

    /// Inventory-type id cached for `name`, if any.
    pub fn cached_item_id(&self, name: &str) -> Option<i64> {
        lock(&self.items).name_to_id.get(name).copied()
    }

    /// Inventory-type name cached for `id`, if any.
    pub fn cached_item_name(&self, id: i64) -> Option<String> {
        lock(&self.items).id_to_name.get(&id).cloned()
    }
}

/// Lock a partition. A poisoned lock only means another caller panicked
/// between a scan and a commit; the maps themselves are still coherent, so
/// resolution continues with the recovered guard.
fn lock(namespace: &Mutex<Namespace>) -> MutexGuard<'_, Namespace> {
    namespace.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deduplicate preserving order of first occurrence.
fn dedup<T>(values: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Clone + Eq + std::hash::Hash,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
