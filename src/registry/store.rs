//! On-disk registry shared by import, wipe and correlation.

use crate::correlate::correlate;
use crate::error::AssetSheetError;
use crate::error::ResultMessage;
use crate::fields::FieldSet;
use crate::registry::AssetRecord;
use crate::registry::Registry;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use tracing::error;
use tracing::info;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    saved_at: DateTime<Utc>,
    assets: &'a Registry,
}

#[derive(Deserialize)]
struct Snapshot {
    saved_at: DateTime<Utc>,
    assets: Registry,
}

/// Registry file contents: the current snapshot or a bare id → record map.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRegistry {
    Snapshot(Snapshot),
    Legacy(Registry),
}

/// The registry plus the file it is persisted to.
///
/// All access goes through one lock; import and wipe replace the whole
/// registry, so a poisoned lock never exposes a half-written state.
#[derive(Debug)]
pub struct RegistryStore {
    path: PathBuf,
    registry: Mutex<Registry>,
}

impl RegistryStore {
    /// Opens the store, loading the file when it exists.
    ///
    /// A file that cannot be read or parsed is logged and the store starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> RegistryStore {
        let path = path.as_ref().to_path_buf();
        let registry = if path.exists() {
            match load(&path) {
                Ok((registry, saved_at)) => {
                    let saved_at = saved_at.map(|time| time.to_rfc3339()).unwrap_or_else(|| "unknown".to_string());
                    info!(path = %path.display(), assets = registry.len(), saved_at = saved_at.as_str(), "loaded registry");
                    registry
                }
                Err(e) => {
                    error!(path = %path.display(), "cannot load registry: {e}");
                    Registry::default()
                }
            }
        } else {
            Registry::default()
        };
        RegistryStore {
            path,
            registry: Mutex::new(registry),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes the current registry to disk.
    pub fn save(&self) -> Result<(), AssetSheetError> {
        let registry = self.lock();
        self.write(&registry)
    }

    fn write(&self, registry: &Registry) -> Result<(), AssetSheetError> {
        let snapshot = SnapshotRef {
            saved_at: Utc::now(),
            assets: registry,
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.path, json).map_err(AssetSheetError::from).with_prefix(&format!(
            "Save registry to '{}'",
            self.path.display()
        ))?;
        info!(path = %self.path.display(), assets = registry.len(), "saved registry");
        Ok(())
    }

    /// Replaces the whole registry and persists it. Returns the new asset count.
    pub fn replace(&self, registry: Registry) -> Result<usize, AssetSheetError> {
        let mut current = self.lock();
        *current = registry;
        self.write(&current)?;
        Ok(current.len())
    }

    /// Empties the registry and deletes its file.
    pub fn clear(&self) -> Result<(), AssetSheetError> {
        let mut current = self.lock();
        current.clear();
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(AssetSheetError::from)
                .with_prefix(&format!("Delete registry '{}'", self.path.display()))?;
        }
        info!(path = %self.path.display(), "wiped registry");
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<AssetRecord> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the current registry.
    pub fn snapshot(&self) -> Registry {
        self.lock().clone()
    }

    /// Correlates `fields` with the registry while holding the lock.
    pub fn correlate(&self, fields: FieldSet) -> FieldSet {
        correlate(fields, &self.lock())
    }
}

/// Reads a registry file and the time it was saved, when recorded.
fn load(path: &Path) -> Result<(Registry, Option<DateTime<Utc>>), AssetSheetError> {
    let text = fs::read_to_string(path)?;
    let stored: StoredRegistry = serde_json::from_str(&text)?;
    Ok(match stored {
        StoredRegistry::Snapshot(snapshot) => (snapshot.assets, Some(snapshot.saved_at)),
        StoredRegistry::Legacy(registry) => (registry, None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::CanonicalField;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("asset_sheet_{}_{name}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    fn record(user: &str) -> AssetRecord {
        AssetRecord {
            user: user.to_string(),
            ..AssetRecord::default()
        }
    }

    #[test]
    fn missing_file_starts_empty() {
        let store = RegistryStore::open(temp_path("missing"));
        assert!(store.is_empty());
        assert_eq!(store.lookup("0001"), None);
    }

    #[test]
    fn replace_persists_and_reopens() {
        let path = temp_path("replace");
        let store = RegistryStore::open(&path);
        let mut registry = Registry::default();
        registry.insert("0007", record("J.Doe"));
        assert_eq!(store.replace(registry).unwrap(), 1);

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["saved_at"].is_string());
        assert_eq!(json["assets"]["0007"]["user"], "J.Doe");

        let reopened = RegistryStore::open(&path);
        assert_eq!(reopened.lookup("0007"), Some(record("J.Doe")));

        let mut registry = Registry::default();
        registry.insert("0452", record("A.Smith"));
        reopened.replace(registry).unwrap();
        assert_eq!(reopened.lookup("0007"), None);
        assert_eq!(reopened.len(), 1);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn loads_legacy_map() {
        let path = temp_path("legacy");
        fs::write(&path, r#"{"0452": {"note": "", "dept": "IT", "sect": "Ops", "user": "A.Smith", "region": "South"}}"#).unwrap();
        let store = RegistryStore::open(&path);
        assert_eq!(store.lookup("0452").unwrap().department, "IT");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unreadable_file_starts_empty() {
        let path = temp_path("broken");
        fs::write(&path, "not json").unwrap();
        let store = RegistryStore::open(&path);
        assert!(store.is_empty());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn clear_removes_file() {
        let path = temp_path("clear");
        let store = RegistryStore::open(&path);
        let mut registry = Registry::default();
        registry.insert("0007", record("J.Doe"));
        store.replace(registry).unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(!path.exists());
        store.clear().unwrap();
    }

    #[test]
    fn correlates_under_the_lock() {
        let store = RegistryStore::open(temp_path("correlate"));
        let mut registry = Registry::default();
        registry.insert("0007", record("J.Doe"));
        *store.lock() = registry;

        let mut fields = FieldSet::new();
        fields.set(CanonicalField::ComputerName, "PC-0007");
        assert_eq!(store.correlate(fields).get(CanonicalField::UserName), "J.Doe");

        let snapshot = store.snapshot();
        let ids: Vec<&str> = snapshot.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["0007"]);
    }
}
