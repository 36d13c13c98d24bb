//! Asset registry: records keyed by a four-digit asset id.
//!
//! [`import`] builds a [`Registry`] from the registry worksheet and [`store`]
//! keeps the current one on disk behind a single lock.
pub mod import;
pub mod store;

pub use import::import_registry;
pub use import::import_workbook;
pub use import::RegistryLayout;
pub use store::RegistryStore;

use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Registry data of one asset. Every value may be empty.
///
/// Serialized with the short keys of the registry file (`dept`, `sect`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRecord {
    /// Free-text annotation of the asset row, source of accessory serials
    pub note: String,
    #[serde(rename = "dept")]
    pub department: String,
    #[serde(rename = "sect")]
    pub section: String,
    pub user: String,
    pub region: String,
}

/// Asset records ordered by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    assets: BTreeMap<String, AssetRecord>,
}

impl Registry {
    pub fn get(&self, id: &str) -> Option<&AssetRecord> {
        self.assets.get(id)
    }

    /// Adds a record; a later record with the same id replaces the earlier one.
    pub fn insert<S: Into<String>>(&mut self, id: S, record: AssetRecord) {
        self.assets.insert(id.into(), record);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetRecord)> {
        self.assets.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn clear(&mut self) {
        self.assets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_use_short_keys() {
        let record = AssetRecord {
            department: "Finance".to_string(),
            section: "HQ".to_string(),
            ..AssetRecord::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dept"], "Finance");
        assert_eq!(json["sect"], "HQ");
        assert_eq!(json["note"], "");
    }

    #[test]
    fn partial_records_deserialize() {
        let registry: Registry = serde_json::from_str(r#"{"0452": {"user": "A.Smith"}}"#).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("0452").unwrap().user, "A.Smith");
        assert_eq!(registry.get("0452").unwrap().region, "");
    }
}
