//! eveye library entry points.
//!
//! This crate exposes the EVE Online name/id resolution cache and the cached
//! killmail item lookup. Higher-level consumers (CLI, GUIs) should only
//! depend on the types exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod error;
pub mod esi;
pub mod killmail;
pub mod resolve;

pub use error::{Error, Result};
pub use esi::{EsiClient, NamePair, UniverseLookup, DEFAULT_ESI_BASE};
pub use killmail::{Killmail, KillmailCache, KillmailLookup};
pub use resolve::UniverseResolver;
