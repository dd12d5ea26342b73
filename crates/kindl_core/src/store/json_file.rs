//! JSON file snapshot store.
//!
//! Writes go to a sibling temp file and are renamed into place, so a crash
//! mid-write leaves the previous snapshot intact.

use crate::model::behavior::BehaviorSnapshot;
use crate::store::{BehaviorStore, StoreResult};
use log::info;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Snapshot store backed by one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileBehaviorStore {
    path: PathBuf,
}

impl JsonFileBehaviorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BehaviorStore for JsonFileBehaviorStore {
    fn kind(&self) -> &'static str {
        "json_file"
    }

    fn load(&self) -> StoreResult<Option<BehaviorSnapshot>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot = serde_json::from_str::<BehaviorSnapshot>(&contents)?;
        snapshot.validate()?;
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &BehaviorSnapshot) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(snapshot)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, serialized)?;
        fs::rename(&temp_path, &self.path)?;
        info!(
            "event=behavior_save module=store status=ok store=json_file intents={}",
            snapshot.intent_views.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileBehaviorStore;
    use crate::model::behavior::{BehaviorSnapshot, ReactionTally};
    use crate::store::{BehaviorStore, StoreError};

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileBehaviorStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_in_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileBehaviorStore::new(dir.path().join("nested/behavior.json"));
        let mut snapshot = BehaviorSnapshot::default();
        snapshot.reactions.insert(
            "3".to_string(),
            ReactionTally {
                feels_right: 2,
                maybe_later: 0,
                not_vibe: 1,
            },
        );

        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("behavior.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileBehaviorStore::new(path).load().unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn negative_scroll_depth_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("behavior.json");
        std::fs::write(
            &path,
            r#"{
                "intent_views": [{
                    "intent_id": "2",
                    "count": 1,
                    "last_viewed": 1760000000000,
                    "total_time_spent_ms": 0,
                    "scroll_depth": -7.5
                }],
                "reactions": {},
                "profile_views": {}
            }"#,
        )
        .unwrap();

        let err = JsonFileBehaviorStore::new(path).load().unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)), "{err}");
    }
}
