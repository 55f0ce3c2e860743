use oui_proto::{MacParseError, RegistryError};

/// Failures of the persisted vendor cache.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed vendor cache {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while fetching the registry text.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("bad response from registry server: HTTP {0}")]
    BadResponse(u16),

    #[error("cannot read registry file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("no vendor found for {0}")]
    NotFound(String),

    #[error("{0} is a locally administered address and has no vendor")]
    LocallyAdministered(String),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<MacParseError> for LookupError {
    fn from(err: MacParseError) -> Self {
        Self::InvalidMacAddress(err.0)
    }
}

impl From<RegistryError> for LookupError {
    fn from(err: RegistryError) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
