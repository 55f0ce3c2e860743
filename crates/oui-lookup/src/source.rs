use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::error::{LookupError, NetworkError};

/// Where registry bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryLocation<'a> {
    File(&'a Path),
    Remote(&'a str),
}

impl<'a> RegistryLocation<'a> {
    /// Classify a configured location: `file://` paths, or http(s) URLs.
    pub fn parse(location: &'a str) -> Result<Self, LookupError> {
        if let Some(path) = location.strip_prefix("file://") {
            if path.is_empty() {
                return Err(LookupError::InvalidConfiguration(
                    "file:// registry location has no path".to_string(),
                ));
            }
            Ok(Self::File(Path::new(path)))
        } else if location.starts_with("http://") || location.starts_with("https://") {
            Ok(Self::Remote(location))
        } else {
            Err(LookupError::InvalidConfiguration(format!(
                "unsupported registry location {:?}",
                location
            )))
        }
    }
}

/// Downloads the raw registry text
#[async_trait]
pub trait RegistrySource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, NetworkError>;
}

/// Registry download over HTTP(S)
pub struct HttpRegistrySource {
    client: reqwest::Client,
}

impl HttpRegistrySource {
    pub fn new(config: &RegistryConfig) -> Result<Self, LookupError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| LookupError::InvalidConfiguration(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl RegistrySource for HttpRegistrySource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        info!("Downloading OUI registry from {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::BadResponse(status.as_u16()));
        }

        let body = response.bytes().await?;
        debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

/// Read a local registry copy, bypassing the network stack
pub async fn read_registry_file(path: &Path) -> Result<Vec<u8>, NetworkError> {
    info!("Reading OUI registry from {}", path.display());
    tokio::fs::read(path)
        .await
        .map_err(|e| NetworkError::File {
            path: path.display().to_string(),
            source: e,
        })
}
