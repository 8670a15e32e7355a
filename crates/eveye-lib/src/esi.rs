//! Blocking HTTP client for the EVE ESI universe and killmail endpoints.
//!
//! The rest of the crate talks to the network only through the
//! [`UniverseLookup`] and [`crate::killmail::KillmailLookup`] traits, which
//! this client implements. Tests substitute in-memory backends instead.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::killmail::{Killmail, KillmailLookup};

/// Public ESI API base used when no override is supplied.
pub const DEFAULT_ESI_BASE: &str = "https://esi.evetech.net/latest";

const DATASOURCE: &str = "tranquility";

/// A resolved (id, name) pair as returned by the naming endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamePair {
    pub id: i64,
    pub name: String,
}

impl NamePair {
    pub fn new<N: Into<String>>(id: i64, name: N) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Batched lookups against the universe naming endpoints.
pub trait UniverseLookup {
    /// Resolve a batch of ids to (id, name) pairs.
    fn names_for_ids(&self, ids: &[i64]) -> Result<Vec<NamePair>>;

    /// Resolve a batch of names to character (id, name) pairs.
    fn character_ids_for_names(&self, names: &[String]) -> Result<Vec<NamePair>>;

    /// Resolve a batch of inventory-type names to (id, name) pairs.
    fn item_ids_for_names(&self, names: &[String]) -> Result<Vec<NamePair>>;
}

/// Blocking ESI client with a bounded request timeout.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct EsiClient {
    http: Client,
    base_url: String,
}

impl EsiClient {
    /// Build a client against the public ESI host.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_ESI_BASE)
    }

    /// Build a client against an alternate ESI base URL.
    pub fn with_base_url<U: Into<String>>(base_url: U) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent())
            .build()
            .map_err(|source| Error::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self { http, base_url })
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        let payload = serde_json::to_vec(body).map_err(|err| Error::Encoding {
            message: err.to_string(),
        })?;

        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|source| Error::Transport {
                url: url.to_string(),
                source,
            })?;

        let bytes = response.bytes().map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|err| Error::Decoding {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}

impl UniverseLookup for EsiClient {
    fn names_for_ids(&self, ids: &[i64]) -> Result<Vec<NamePair>> {
        let url = format!(
            "{}/universe/names/?datasource={}",
            self.base_url, DATASOURCE
        );
        info!(count = ids.len(), "resolving ids via universe/names");
        self.post_json(&url, &ids)
    }

    fn character_ids_for_names(&self, names: &[String]) -> Result<Vec<NamePair>> {
        let url = format!(
            "{}/universe/ids/?datasource={}&language=en",
            self.base_url, DATASOURCE
        );
        info!(count = names.len(), "resolving character names via universe/ids");
        let response: UniverseIdsResponse = self.post_json(&url, &names)?;
        Ok(response.characters)
    }

    fn item_ids_for_names(&self, names: &[String]) -> Result<Vec<NamePair>> {
        let url = format!("{}/universe/ids/?datasource={}", self.base_url, DATASOURCE);
        info!(count = names.len(), "resolving item names via universe/ids");
        let response: UniverseIdsResponse = self.post_json(&url, &names)?;
        Ok(response.inventory_types)
    }
}

impl KillmailLookup for EsiClient {
    fn killmail(&self, id: i64, hash: &str) -> Result<Killmail> {
        let url = format!(
            "{}/killmails/{}/{}/?datasource={}",
            self.base_url, id, hash, DATASOURCE
        );
        info!(killmail = id, "fetching killmail");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;

        let bytes = response.bytes().map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;

        decode_killmail(&url, &bytes)
    }
}

/// Response schema for `universe/ids`. ESI omits categories with no matches,
/// so both lists default to empty.
#[derive(Debug, Default, Deserialize)]
struct UniverseIdsResponse {
    #[serde(default)]
    characters: Vec<NamePair>,
    #[serde(default)]
    inventory_types: Vec<NamePair>,
}

#[derive(Debug, Deserialize)]
struct KillmailResponse {
    victim: KillmailVictim,
    killmail_time: String,
}

#[derive(Debug, Deserialize)]
struct KillmailVictim {
    #[serde(default)]
    items: Vec<KillmailItem>,
}

#[derive(Debug, Deserialize)]
struct KillmailItem {
    item_type_id: i64,
}

fn decode_killmail(url: &str, bytes: &[u8]) -> Result<Killmail> {
    let raw: KillmailResponse =
        serde_json::from_slice(bytes).map_err(|err| Error::Decoding {
            url: url.to_string(),
            message: err.to_string(),
        })?;

    let time = parse_killmail_time(url, &raw.killmail_time)?;
    let victim_item_types = raw
        .victim
        .items
        .into_iter()
        .map(|item| item.item_type_id)
        .collect();

    Ok(Killmail {
        victim_item_types,
        time,
    })
}

fn parse_killmail_time(url: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|err| Error::Decoding {
            url: url.to_string(),
            message: format!("invalid killmail_time '{}': {}", raw, err),
        })
}

fn user_agent() -> String {
    format!(
        "eveye-lib/{version} ({repo})",
        version = env!("CARGO_PKG_VERSION"),
        repo = "https://github.com/eveye-rs/eveye"
    )
}
