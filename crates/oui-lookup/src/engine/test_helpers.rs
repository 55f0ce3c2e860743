#[cfg(test)]
use crate::config::{Config, RegistryConfig};
#[cfg(test)]
use crate::error::NetworkError;
#[cfg(test)]
use crate::source::RegistrySource;
#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use std::path::Path;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::Arc;

/// Three MA-L assignments in registry layout
#[cfg(test)]
pub const REGISTRY: &str = "OUI/MA-L\t\t\tOrganization\n\
company_id\t\t\tOrganization\n\
\t\t\t\tAddress\n\
\n\
28-6F-B9   (hex)\t\tNokia Shanghai Bell Co., Ltd.\n\
286FB9     (base 16)\t\tNokia Shanghai Bell Co., Ltd.\n\
\t\t\t\tNo.388 Ning Qiao Road,Jin Qiao Pudong Shanghai\n\
\t\t\t\tCN\n\
\n\
08-EA-44   (hex)\t\tExtreme Networks Headquarters\n\
08EA44     (base 16)\t\tExtreme Networks Headquarters\n\
\t\t\t\t2121 RDU Center Drive\n\
\t\t\t\tUS\n\
\n\
A8-BB-CC   (hex)\t\tAcme Corp\n\
A8BBCC     (base 16)\t\tAcme Corp\n\
\t\t\t\tUS\n";

#[cfg(test)]
pub fn create_test_config(dir: &Path) -> Config {
    Config {
        cache_path: dir.join("vendors.json"),
        registry: RegistryConfig {
            url: "https://registry.test/oui/oui.txt".to_string(),
            timeout_secs: None,
            user_agent: "oui-lookup-tests".to_string(),
        },
    }
}

#[cfg(test)]
pub fn write_cache_file(config: &Config, json: &str) {
    std::fs::write(&config.cache_path, json).unwrap();
}

/// Registry source answering every request with the same response and
/// counting calls
#[cfg(test)]
pub struct MockSource {
    body: Vec<u8>,
    status: Option<u16>,
    calls: AtomicUsize,
}

#[cfg(test)]
impl MockSource {
    pub fn ok(body: &str) -> Arc<Self> {
        Self::bytes(body.as_bytes().to_vec())
    }

    pub fn bytes(body: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            body,
            status: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn status(code: u16) -> Arc<Self> {
        Arc::new(Self {
            body: Vec::new(),
            status: Some(code),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl RegistrySource for MockSource {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.status {
            Some(code) => Err(NetworkError::BadResponse(code)),
            None => Ok(self.body.clone()),
        }
    }
}
