//! Persistent Result Store — durable CRUD over the saved-results list.
//!
//! The entire list lives under one namespaced file
//! (`config::SAVED_RESULTS_FILE`) as a JSON array. Every public operation
//! absorbs underlying I/O and parse failures: reads degrade to an empty
//! list, writes become silent no-ops, and the failure is logged at `warn`.
//! The UI stays usable even when the disk does not cooperate.
//!
//! Append and delete are whole-list read-modify-write with no locking; two
//! concurrent writers (e.g. two app instances) race and the last writer
//! wins. Accepted limitation of the single-key layout, not a bug.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config;
use crate::models::SavedResult;

/// Errors from the underlying storage. Internal: public store operations
/// absorb these and log them rather than propagating.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt saved-results file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// File-backed store for the saved-results list.
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    /// Store at the default location under the app data directory.
    pub fn open_default() -> Self {
        Self {
            path: config::saved_results_path(),
        }
    }

    /// Store at an explicit path. Tests point this at a temp directory.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All saved results, in on-disk (append) order.
    ///
    /// A missing file is the empty store; a corrupt or unreadable file is
    /// logged and also treated as empty. Never fails.
    pub fn list(&self) -> Vec<SavedResult> {
        match self.read_list() {
            Ok(results) => results,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Saved results: read failed, returning empty list"
                );
                Vec::new()
            }
        }
    }

    /// Append one result to the list and write the whole list back.
    ///
    /// Write failures are logged and swallowed.
    pub fn append(&self, result: &SavedResult) {
        let mut results = self.list();
        results.push(result.clone());
        if let Err(e) = self.write_list(&results) {
            tracing::warn!(
                path = %self.path.display(),
                id = %result.id,
                error = %e,
                "Saved results: append failed"
            );
        }
    }

    /// Remove any entry with the given id and write the list back.
    ///
    /// No-op when the id is not present. Write failures are logged and
    /// swallowed.
    pub fn delete_by_id(&self, id: &str) {
        let mut results = self.list();
        results.retain(|r| r.id != id);
        if let Err(e) = self.write_list(&results) {
            tracing::warn!(
                path = %self.path.display(),
                id,
                error = %e,
                "Saved results: delete failed"
            );
        }
    }

    /// Remove the entire saved-results file.
    ///
    /// Already-absent file is a no-op; other failures are logged and
    /// swallowed.
    pub fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Saved results: clear failed"
                );
            }
        }
    }

    // ── Fallible internals ──────────────────────────────────

    fn read_list(&self) -> Result<Vec<SavedResult>, StoreError> {
        let data = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn write_list(&self, results: &[SavedResult]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(results)?;
        std::fs::write(&self.path, json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Diagnosis, Gender, PatientInfo, ScanType};

    fn test_store() -> (tempfile::TempDir, ResultStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ResultStore::with_path(dir.path().join("saved-results.json"));
        (dir, store)
    }

    fn make_result(id: &str) -> SavedResult {
        SavedResult {
            id: id.into(),
            saved_at: "2025-01-15T10:00:00Z".into(),
            success: true,
            diagnosis: Diagnosis::Detected,
            processing_time: "3.4 seconds".into(),
            scan_type: ScanType::Mri,
            patient_info: PatientInfo {
                name: "Jane".into(),
                surname: "Doe".into(),
                age: 63,
                gender: Gender::Female,
            },
            image_url: "data:image/jpeg;base64,AAAA".into(),
        }
    }

    #[test]
    fn list_on_missing_file_is_empty() {
        let (_dir, store) = test_store();
        assert!(store.list().is_empty());
    }

    #[test]
    fn list_on_corrupt_file_is_empty() {
        let (_dir, store) = test_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), b"{not json").unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn append_then_list_round_trips() {
        let (_dir, store) = test_store();
        let result = make_result("r1");
        store.append(&result);

        let listed = store.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], result);
    }

    #[test]
    fn append_grows_list_by_one_preserving_order() {
        let (_dir, store) = test_store();
        store.append(&make_result("r1"));
        store.append(&make_result("r2"));
        store.append(&make_result("r3"));

        let ids: Vec<String> = store.list().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn delete_removes_only_matching_id() {
        let (_dir, store) = test_store();
        store.append(&make_result("r1"));
        store.append(&make_result("r2"));

        store.delete_by_id("r1");

        let listed = store.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "r2");
    }

    #[test]
    fn delete_twice_is_noop_second_time() {
        let (_dir, store) = test_store();
        store.append(&make_result("r1"));

        store.delete_by_id("r1");
        store.delete_by_id("r1");

        assert!(store.list().is_empty());
    }

    #[test]
    fn delete_unknown_id_leaves_list_untouched() {
        let (_dir, store) = test_store();
        store.append(&make_result("r1"));

        store.delete_by_id("missing");

        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn clear_empties_store() {
        let (_dir, store) = test_store();
        store.append(&make_result("r1"));
        store.append(&make_result("r2"));

        store.clear();

        assert!(store.list().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn clear_on_empty_store_is_safe() {
        let (_dir, store) = test_store();
        store.clear();
        assert!(store.list().is_empty());
    }

    #[test]
    fn persisted_file_is_a_json_array() {
        let (_dir, store) = test_store();
        store.append(&make_result("r1"));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["id"], "r1");
        assert!(value[0].get("savedAt").is_some());
    }
}
