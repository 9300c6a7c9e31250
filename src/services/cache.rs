use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::model::recipe::Recipe;

pub const FAVORITES_KEY: &str = "favorites";

/// Raw string slots, one per key.
pub trait Storage: Send {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per slot.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", safe_key(key)))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        write_atomic(&self.slot_path(key), value.as_bytes())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Best-effort memo of JSON arrays. No expiry, no size bound.
pub struct KeyValueCache {
    storage: Box<dyn Storage>,
}

impl KeyValueCache {
    pub fn new(storage: impl Storage + 'static) -> Self {
        KeyValueCache {
            storage: Box::new(storage),
        }
    }

    /// `None` when the slot was never written. Unreadable or malformed data
    /// comes back as an empty list; elements that fail to decode are skipped.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let raw = match self.storage.read(key) {
            Ok(Some(s)) => s,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "cache slot unreadable");
                return Some(Vec::new());
            }
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(Value::Null) => return None,
            Ok(_) => {
                warn!(key, "cache slot is not an array");
                return Some(Vec::new());
            }
            Err(e) => {
                warn!(key, error = %e, "cache slot is not valid json");
                return Some(Vec::new());
            }
        };

        let total = items.len();
        let decoded: Vec<T> = items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();

        if decoded.len() < total {
            warn!(key, skipped = total - decoded.len(), "dropped malformed cache entries");
        }
        debug!(key, count = decoded.len(), "cache read");

        Some(decoded)
    }

    pub fn set<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_string(items).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.storage.write(key, &json)
    }

    pub fn records(&self, key: &str) -> Vec<Recipe> {
        self.get(key).unwrap_or_default()
    }
}

fn safe_key(key: &str) -> String {
    let out: String = key
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .collect();

    if out.is_empty() {
        "slot".to_string()
    } else {
        out
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&tmp, bytes)?;

    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&tmp, path)?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "slot".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache_with(raw: &str) -> KeyValueCache {
        KeyValueCache::new(MemoryStorage::new().with_slot("coffeeData", raw))
    }

    #[test]
    fn missing_slot_is_none() {
        let cache = KeyValueCache::new(MemoryStorage::new());
        assert!(cache.get::<Recipe>("coffeeData").is_none());
        assert!(cache.records("coffeeData").is_empty());
    }

    #[test]
    fn malformed_payloads_decode_to_empty() {
        for raw in ["{not json", "{\"id\": 1}", "42", "\"text\"", "[1, 2, \"x\"]", ""] {
            let got = cache_with(raw).get::<Recipe>("coffeeData");
            assert_eq!(got.map(|v| v.len()), Some(0), "payload {raw:?}");
        }
    }

    #[test]
    fn null_payload_counts_as_missing() {
        assert!(cache_with("null").get::<Recipe>("coffeeData").is_none());
    }

    #[test]
    fn bad_elements_are_skipped() {
        let raw = json!([{ "id": 1, "title": "A" }, { "title": "no id" }, { "id": "b" }]).to_string();
        let ids: Vec<String> = cache_with(&raw).records("coffeeData").into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "b"]);
    }

    #[test]
    fn set_overwrites() {
        let mut cache = cache_with("[]");
        let a: Recipe = serde_json::from_value(json!({ "id": "a" })).unwrap();
        let b: Recipe = serde_json::from_value(json!({ "id": "b" })).unwrap();

        cache.set("coffeeData", &[a]).unwrap();
        cache.set("coffeeData", &[b.clone()]).unwrap();
        assert_eq!(cache.records("coffeeData"), vec![b]);
    }

    #[test]
    fn file_storage_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = KeyValueCache::new(FileStorage::new(dir.path().join("data")));
        let r: Recipe = serde_json::from_value(json!({ "id": 9, "title": "Affogato" })).unwrap();

        cache.set("juiceData", &[r.clone()]).unwrap();

        assert!(dir.path().join("data").join("juiceData.json").exists());
        assert!(!dir.path().join("data").join("juiceData.json.tmp").exists());
        assert_eq!(cache.records("juiceData"), vec![r]);
    }

    #[test]
    fn file_keys_are_sanitized() {
        assert_eq!(safe_key("../etc/passwd"), "___etc_passwd");
        assert_eq!(safe_key("  "), "slot");
    }
}
