//! Common test utilities: in-memory lookup backends that record the remote
//! batches they receive so tests can assert on call behavior.
#![allow(dead_code)]

use std::sync::Mutex;

use eveye_lib::error::{Error, Result};
use eveye_lib::esi::NamePair;
use eveye_lib::{Killmail, KillmailLookup, UniverseLookup};

/// One remote batch observed by [`FakeUniverse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Batch {
    Ids(Vec<i64>),
    CharacterNames(Vec<String>),
    ItemNames(Vec<String>),
}

/// In-memory universe lookup seeded with known pairs.
#[derive(Default)]
pub struct FakeUniverse {
    entities: Vec<NamePair>,
    characters: Vec<NamePair>,
    items: Vec<NamePair>,
    fail: bool,
    calls: Mutex<Vec<Batch>>,
}

impl FakeUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every call fails, for error-path tests.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn entity(mut self, id: i64, name: &str) -> Self {
        self.entities.push(NamePair::new(id, name));
        self
    }

    pub fn character(mut self, id: i64, name: &str) -> Self {
        self.characters.push(NamePair::new(id, name));
        self
    }

    pub fn item(mut self, id: i64, name: &str) -> Self {
        self.items.push(NamePair::new(id, name));
        self
    }

    /// Every batch received so far, in order.
    pub fn batches(&self) -> Vec<Batch> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Number of remote calls made so far.
    pub fn remote_calls(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    fn record(&self, batch: Batch) {
        self.calls.lock().expect("calls lock").push(batch);
    }

    fn check_fail(&self) -> Result<()> {
        if self.fail {
            Err(Error::Decoding {
                url: "fake://universe".to_string(),
                message: "backend configured to fail".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn pairs_for_ids(pool: &[NamePair], ids: &[i64]) -> Vec<NamePair> {
    ids.iter()
        .filter_map(|id| pool.iter().find(|pair| pair.id == *id).cloned())
        .collect()
}

fn pairs_for_names(pool: &[NamePair], names: &[String]) -> Vec<NamePair> {
    names
        .iter()
        .filter_map(|name| pool.iter().find(|pair| &pair.name == name).cloned())
        .collect()
}

impl UniverseLookup for &FakeUniverse {
    fn names_for_ids(&self, ids: &[i64]) -> Result<Vec<NamePair>> {
        self.record(Batch::Ids(ids.to_vec()));
        self.check_fail()?;
        Ok(pairs_for_ids(&self.entities, ids))
    }

    fn character_ids_for_names(&self, names: &[String]) -> Result<Vec<NamePair>> {
        self.record(Batch::CharacterNames(names.to_vec()));
        self.check_fail()?;
        Ok(pairs_for_names(&self.characters, names))
    }

    fn item_ids_for_names(&self, names: &[String]) -> Result<Vec<NamePair>> {
        self.record(Batch::ItemNames(names.to_vec()));
        self.check_fail()?;
        Ok(pairs_for_names(&self.items, names))
    }
}

/// In-memory killmail backend seeded with known records.
#[derive(Default)]
pub struct FakeKillmails {
    records: Vec<(i64, Killmail)>,
    fail: bool,
    fetches: Mutex<Vec<(i64, String)>>,
}

impl FakeKillmails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn record(mut self, id: i64, killmail: Killmail) -> Self {
        self.records.push((id, killmail));
        self
    }

    /// Number of remote fetches made so far.
    pub fn fetches(&self) -> usize {
        self.fetches.lock().expect("fetches lock").len()
    }
}

impl KillmailLookup for &FakeKillmails {
    fn killmail(&self, id: i64, hash: &str) -> Result<Killmail> {
        self.fetches
            .lock()
            .expect("fetches lock")
            .push((id, hash.to_string()));

        if self.fail {
            return Err(Error::Decoding {
                url: "fake://killmails".to_string(),
                message: "backend configured to fail".to_string(),
            });
        }

        self.records
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, killmail)| killmail.clone())
            .ok_or_else(|| Error::Decoding {
                url: "fake://killmails".to_string(),
                message: format!("no record for killmail {}", id),
            })
    }
}
