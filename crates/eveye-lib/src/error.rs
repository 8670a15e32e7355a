use thiserror::Error;

/// Convenient result alias for the eveye library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Request body could not be serialized to JSON.
    #[error("failed to encode request body: {message}")]
    Encoding { message: String },

    /// Network failure, timeout, or non-success status from the remote
    /// service.
    #[error("transport failure for {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body was malformed or did not match the expected schema.
    #[error("failed to decode response from {url}: {message}")]
    Decoding { url: String, message: String },

    /// Raised when the naming service answered but returned no name for one
    /// or more of the requested ids.
    #[error("no name returned for id(s) {}", format_ids(.ids))]
    UnresolvedIds { ids: Vec<i64> },

    /// Raised when the naming service answered but returned no id for one or
    /// more of the requested names.
    #[error("no id returned for name(s) {}", format_names(.names))]
    UnresolvedNames { names: Vec<String> },
}

fn format_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ")
}
