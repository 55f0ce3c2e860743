use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::DatabaseError;
use crate::models::VendorRecord;

/// In-memory vendor cache keyed by OUI (six uppercase hex digits)
pub type VendorMap = HashMap<String, VendorRecord>;

/// JSON file holding the vendor cache
pub struct VendorDatabase {
    path: PathBuf,
}

impl VendorDatabase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole cache file. Returns the entries and the file's
    /// modification time.
    pub async fn load(&self) -> Result<(VendorMap, DateTime<Utc>), DatabaseError> {
        let bytes = fs::read(&self.path).await.map_err(|e| self.io_error(e))?;

        let decoded: HashMap<String, VendorRecord> =
            serde_json::from_slice(&bytes).map_err(|e| DatabaseError::Json {
                path: self.path.display().to_string(),
                source: e,
            })?;

        let mut vendors = VendorMap::with_capacity(decoded.len());
        for (key, record) in decoded {
            if is_valid_oui(&key) {
                vendors.insert(key.to_ascii_uppercase(), record);
            } else {
                warn!("Skipping cache entry with invalid OUI key {:?}", key);
            }
        }

        let modified = fs::metadata(&self.path)
            .await
            .and_then(|m| m.modified())
            .map_err(|e| self.io_error(e))?;

        debug!("Read {} vendors from {}", vendors.len(), self.path.display());
        Ok((vendors, DateTime::<Utc>::from(modified)))
    }

    /// Replace the cache file with `vendors`. The file is written next to
    /// its destination then renamed over it, so readers see either the old
    /// or the new content.
    pub async fn save(&self, vendors: &VendorMap) -> Result<DateTime<Utc>, DatabaseError> {
        let sorted: BTreeMap<&String, &VendorRecord> = vendors.iter().collect();
        let json = serde_json::to_vec_pretty(&sorted).map_err(|e| DatabaseError::Json {
            path: self.path.display().to_string(),
            source: e,
        })?;

        let tmp_path = self.tmp_path();
        if let Err(e) = fs::write(&tmp_path, &json).await {
            return Err(DatabaseError::Io {
                path: tmp_path.display().to_string(),
                source: e,
            });
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(self.io_error(e));
        }

        debug!("Wrote {} vendors to {}", vendors.len(), self.path.display());
        Ok(Utc::now())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> DatabaseError {
        DatabaseError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Six hex digits, no separators
pub fn is_valid_oui(key: &str) -> bool {
    key.len() == 6 && key.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let db = VendorDatabase::new(dir.path().join("vendors.json"));

        let mut vendors = VendorMap::new();
        vendors.insert(
            "001122".to_string(),
            VendorRecord::from_vendor_name("001122", "Test Co"),
        );
        vendors.insert(
            "AABBCC".to_string(),
            VendorRecord::from_vendor_name("AABBCC", "Acme"),
        );

        let saved_at = db.save(&vendors).await.unwrap();
        let (loaded, modified) = db.load().await.unwrap();

        assert_eq!(loaded, vendors);
        assert!((saved_at - modified).num_seconds().abs() < 60);
        assert!(!dir.path().join("vendors.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendors.json");
        let db = VendorDatabase::new(&path);

        let mut vendors = VendorMap::new();
        vendors.insert(
            "001122".to_string(),
            VendorRecord::from_vendor_name("001122", "Test Co"),
        );
        db.save(&vendors).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let entry = &value["001122"];
        assert_eq!(entry["oui"], "001122");
        assert_eq!(entry["company"], "Test Co");
        assert_eq!(entry["type"], "MA-L");
        assert_eq!(entry["private"], false);
        assert_eq!(entry.as_object().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_load_skips_invalid_keys_and_uppercases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendors.json");
        std::fs::write(
            &path,
            r#"{
                "aabbcc": {"oui": "AABBCC", "company": "Acme"},
                "not-an-oui": {"oui": "XYZ", "company": "Broken"}
            }"#,
        )
        .unwrap();

        let (vendors, _) = VendorDatabase::new(&path).load().await.unwrap();
        assert_eq!(vendors.len(), 1);
        assert_eq!(vendors["AABBCC"].company_name(), "Acme");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = VendorDatabase::new(dir.path().join("missing.json"));
        let err = db.load().await.unwrap_err();
        assert!(matches!(err, DatabaseError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendors.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = VendorDatabase::new(&path).load().await.unwrap_err();
        assert!(matches!(err, DatabaseError::Json { .. }));
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = VendorDatabase::new(dir.path().join("nope").join("vendors.json"));
        let err = db.save(&VendorMap::new()).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Io { .. }));
    }

    #[test]
    fn test_is_valid_oui() {
        assert!(is_valid_oui("00AABB"));
        assert!(is_valid_oui("00aabb"));
        assert!(!is_valid_oui("00AAB"));
        assert!(!is_valid_oui("00:AA:BB"));
        assert!(!is_valid_oui("00AABG"));
    }
}
