use chrono::{DateTime, Utc};
use oui_proto::{parse_registry, MacAddress};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::{VendorDatabase, VendorMap};
use crate::error::{LookupError, Result};
use crate::models::VendorRecord;
use crate::source::{read_registry_file, HttpRegistrySource, RegistryLocation, RegistrySource};

/// OUI prefix lengths tried when an exact match is missing after a full
/// registry refresh
const DEGRADED_PREFIX_LENGTHS: [usize; 2] = [6, 4];

#[derive(Default)]
struct CacheState {
    vendors: VendorMap,
    last_updated: Option<DateTime<Utc>>,
}

/// Resolves MAC addresses to vendors from a local cache, falling back to
/// the online registry.
///
/// The cache and its timestamp sit behind a single lock. Downloads and
/// file writes run without holding it; persistence is serialized by a
/// second lock so snapshots reach the disk in order.
pub struct LookupEngine {
    state: RwLock<CacheState>,
    persist: Mutex<()>,
    database: VendorDatabase,
    source: Arc<dyn RegistrySource>,
    registry_url: String,
}

impl LookupEngine {
    /// Engine downloading over HTTP(S) as configured
    pub fn new(config: &Config) -> Result<Self> {
        let source = HttpRegistrySource::new(&config.registry)?;
        Self::with_source(config, Arc::new(source))
    }

    pub fn with_source(config: &Config, source: Arc<dyn RegistrySource>) -> Result<Self> {
        RegistryLocation::parse(&config.registry.url)?;

        Ok(Self {
            state: RwLock::new(CacheState::default()),
            persist: Mutex::new(()),
            database: VendorDatabase::new(&config.cache_path),
            source,
            registry_url: config.registry.url.clone(),
        })
    }

    pub fn cache_path(&self) -> &Path {
        self.database.path()
    }

    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_updated
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.vendors.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.vendors.is_empty()
    }

    /// Replace the in-memory cache with the content of the cache file
    pub async fn load_local_database(&self) -> Result<()> {
        let _guard = self.persist.lock().await;
        self.reload().await
    }

    /// Write the whole in-memory cache to the cache file
    pub async fn save_local_database(&self) -> Result<()> {
        let _guard = self.persist.lock().await;

        let snapshot = self.state.read().await.vendors.clone();
        let saved_at = self.database.save(&snapshot).await?;
        self.state.write().await.last_updated = Some(saved_at);

        info!(
            "Saved {} vendors to {}",
            snapshot.len(),
            self.database.path().display()
        );
        Ok(())
    }

    /// Resolve from the in-memory cache only. Never performs I/O.
    pub async fn lookup_local(&self, mac: &str) -> Result<VendorRecord> {
        let address = MacAddress::parse(mac)?;
        if address.is_locally_administered() {
            return Err(LookupError::LocallyAdministered(mac.to_string()));
        }

        self.cached(&address.oui())
            .await
            .ok_or_else(|| LookupError::NotFound(mac.to_string()))
    }

    /// Resolve against a fresh registry download. With `update_local`, the
    /// entry is added to the cache and the cache file rewritten; when the
    /// write fails the cache is put back as it was.
    ///
    /// Locally administered addresses are not rejected here; they go
    /// through the download and end up as `NotFound`.
    pub async fn lookup_online(&self, mac: &str, update_local: bool) -> Result<VendorRecord> {
        let address = MacAddress::parse(mac)?;
        let oui = address.oui();

        let raw = self.fetch_registry(&self.registry_url).await?;
        let mut vendors = parse_registry(&raw)?;

        let name = vendors
            .remove(&oui)
            .ok_or_else(|| LookupError::NotFound(mac.to_string()))?;
        let record = VendorRecord::from_vendor_name(oui.clone(), name);

        if update_local {
            let previous = self
                .state
                .write()
                .await
                .vendors
                .insert(oui.clone(), record.clone());

            if let Err(e) = self.save_local_database().await {
                warn!("Could not persist {}, dropping it from the cache: {}", oui, e);
                let mut state = self.state.write().await;
                match previous {
                    Some(old) => state.vendors.insert(oui, old),
                    None => state.vendors.remove(&oui),
                };
                return Err(e);
            }
        }

        Ok(record)
    }

    /// Cache first, then the online registry when the cache has no entry.
    pub async fn lookup(&self, mac: &str) -> Result<VendorRecord> {
        let address = MacAddress::parse(mac)?;
        if address.is_locally_administered() {
            return Err(LookupError::LocallyAdministered(mac.to_string()));
        }

        match self.lookup_local(mac).await {
            Err(LookupError::NotFound(_)) => {
                debug!("{} not cached, querying online registry", address);
                self.lookup_online(mac, true).await
            }
            other => other,
        }
    }

    /// Replace the whole cache with a freshly parsed registry.
    ///
    /// `source_override` may be an http(s) URL or a `file://` path; the
    /// configured registry URL is used otherwise. Returns the number of
    /// vendors installed.
    pub async fn update_database(&self, source_override: Option<&str>) -> Result<usize> {
        let location = source_override.unwrap_or(self.registry_url.as_str());
        let raw = self.fetch_registry(location).await?;

        let vendors: VendorMap = parse_registry(&raw)?
            .into_iter()
            .map(|(oui, name)| {
                let record = VendorRecord::from_vendor_name(oui.clone(), name);
                (oui, record)
            })
            .collect();
        let count = vendors.len();

        let _guard = self.persist.lock().await;
        let saved_at = self.database.save(&vendors).await?;
        {
            let mut state = self.state.write().await;
            state.vendors = vendors;
            state.last_updated = Some(saved_at);
        }
        self.reload().await?;

        info!("Vendor database updated with {} entries", count);
        Ok(count)
    }

    /// Resolve an already parsed address, refreshing the whole database on
    /// a miss. When the refreshed registry still has no exact entry, fall
    /// back to the first entry sharing a shorter OUI prefix.
    pub async fn lookup_address(&self, address: &MacAddress) -> Result<VendorRecord> {
        if address.is_locally_administered() {
            return Err(LookupError::LocallyAdministered(address.to_string()));
        }

        let oui = address.oui();
        if let Some(record) = self.cached(&oui).await {
            return Ok(record);
        }

        self.update_database(None).await?;
        if let Some(record) = self.cached(&oui).await {
            return Ok(record);
        }

        let state = self.state.read().await;
        for len in DEGRADED_PREFIX_LENGTHS {
            let prefix = &oui[..len];
            let candidate = state
                .vendors
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .min_by(|a, b| a.0.cmp(b.0));

            if let Some((key, record)) = candidate {
                warn!("No exact entry for {}, using {} ({})", oui, key, prefix);
                return Ok(record.clone());
            }
        }

        Err(LookupError::NotFound(address.to_string()))
    }

    async fn cached(&self, oui: &str) -> Option<VendorRecord> {
        self.state.read().await.vendors.get(oui).cloned()
    }

    /// Caller must hold the persist lock
    async fn reload(&self) -> Result<()> {
        let (vendors, modified) = self.database.load().await?;
        let count = vendors.len();

        let mut state = self.state.write().await;
        state.vendors = vendors;
        state.last_updated = Some(modified);

        info!(
            "Loaded {} vendors from {}",
            count,
            self.database.path().display()
        );
        Ok(())
    }

    async fn fetch_registry(&self, location: &str) -> Result<Vec<u8>> {
        let bytes = match RegistryLocation::parse(location)? {
            RegistryLocation::File(path) => read_registry_file(path).await?,
            RegistryLocation::Remote(url) => self.source.fetch(url).await?,
        };
        Ok(bytes)
    }
}
