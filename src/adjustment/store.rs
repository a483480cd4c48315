//! Persistent adjustment histories
//!
//! One `AdjustmentHistory` per trajectory id, stored as JSON in the sled tree
//! "adjustments". Every mutation is a read-modify-write guarded by
//! `compare_and_swap` on the stored bytes: if another writer got there first
//! the operation fails with `ConcurrentModification` and nothing is written.

use std::path::Path;

use sled::{Db, Tree};

use super::{AdjustmentError, AdjustmentHistory};
use crate::types::{AdjustmentState, MdWindow, Offset};

const TREE_NAME: &str = "adjustments";

pub struct AdjustmentStore {
    db: Db,
    tree: Tree,
}

impl AdjustmentStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AdjustmentError> {
        let db = sled::open(path.as_ref())?;
        Self::with_db(db)
    }

    /// Store backed by a throwaway database, removed on drop.
    pub fn temporary() -> Result<Self, AdjustmentError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::with_db(db)
    }

    fn with_db(db: Db) -> Result<Self, AdjustmentError> {
        let tree = db.open_tree(TREE_NAME)?;
        Ok(Self { db, tree })
    }

    /// Register a fresh history for `id`. Fails if one already exists.
    pub fn init(&self, id: &str, history: &AdjustmentHistory) -> Result<(), AdjustmentError> {
        let bytes = serde_json::to_vec(history)?;
        match self
            .tree
            .compare_and_swap(id.as_bytes(), None as Option<&[u8]>, Some(bytes))?
        {
            Ok(()) => {
                tracing::debug!(trajectory = id, "adjustment history created");
                Ok(())
            }
            Err(_) => Err(AdjustmentError::AlreadyExists(id.to_string())),
        }
    }

    pub fn load(&self, id: &str) -> Result<AdjustmentHistory, AdjustmentError> {
        let bytes = self
            .tree
            .get(id.as_bytes())?
            .ok_or_else(|| AdjustmentError::NotFound(id.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn contains(&self, id: &str) -> Result<bool, AdjustmentError> {
        Ok(self.tree.contains_key(id.as_bytes())?)
    }

    /// Trajectory ids with a stored history.
    pub fn ids(&self) -> Result<Vec<String>, AdjustmentError> {
        let mut ids = Vec::new();
        for key in self.tree.iter().keys() {
            let key = key?;
            ids.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(ids)
    }

    /// Run `op` against the stored history of `id` as one atomic step.
    ///
    /// The result is written only if the stored bytes are unchanged since
    /// they were read. No retry is attempted.
    pub fn update<T>(
        &self,
        id: &str,
        op: impl FnOnce(&mut AdjustmentHistory) -> Result<T, AdjustmentError>,
    ) -> Result<T, AdjustmentError> {
        let key = id.as_bytes();
        let old = self
            .tree
            .get(key)?
            .ok_or_else(|| AdjustmentError::NotFound(id.to_string()))?;
        let mut history: AdjustmentHistory = serde_json::from_slice(&old)?;

        let out = op(&mut history)?;

        let new = serde_json::to_vec(&history)?;
        match self.tree.compare_and_swap(key, Some(old), Some(new))? {
            Ok(()) => Ok(out),
            Err(_) => {
                tracing::warn!(trajectory = id, "lost adjustment update race");
                Err(AdjustmentError::ConcurrentModification(id.to_string()))
            }
        }
    }

    pub fn apply(
        &self,
        id: &str,
        window: MdWindow,
        offset: Offset,
        recalculate: bool,
    ) -> Result<AdjustmentState, AdjustmentError> {
        self.update(id, |h| h.apply(window, offset, recalculate))
    }

    pub fn undo(&self, id: &str) -> Result<AdjustmentState, AdjustmentError> {
        self.update(id, AdjustmentHistory::undo)
    }

    pub fn redo(&self, id: &str) -> Result<AdjustmentState, AdjustmentError> {
        self.update(id, AdjustmentHistory::redo)
    }

    pub fn reset(&self, id: &str) -> Result<AdjustmentState, AdjustmentError> {
        self.update(id, |h| Ok(h.reset()))
    }

    pub fn state(&self, id: &str) -> Result<AdjustmentState, AdjustmentError> {
        Ok(self.load(id)?.current_state())
    }

    /// Drop the stored history of `id`; returns whether one existed.
    pub fn remove(&self, id: &str) -> Result<bool, AdjustmentError> {
        Ok(self.tree.remove(id.as_bytes())?.is_some())
    }

    pub fn flush(&self) -> Result<(), AdjustmentError> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BasePath;

    fn history() -> AdjustmentHistory {
        AdjustmentHistory::new(BasePath {
            md: vec![0.0, 100.0, 200.0],
            northing: vec![0.0, 1.0, 2.0],
            easting: vec![0.0, 0.0, 0.0],
            tvd: vec![0.0, 100.0, 200.0],
            inc: None,
            azi: None,
        })
        .unwrap()
    }

    #[test]
    fn test_init_twice_fails() {
        let store = AdjustmentStore::temporary().unwrap();
        store.init("w1", &history()).unwrap();
        assert!(matches!(
            store.init("w1", &history()),
            Err(AdjustmentError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_missing_trajectory() {
        let store = AdjustmentStore::temporary().unwrap();
        assert!(matches!(store.undo("nope"), Err(AdjustmentError::NotFound(_))));
    }

    #[test]
    fn test_apply_persists() {
        let store = AdjustmentStore::temporary().unwrap();
        store.init("w1", &history()).unwrap();
        store
            .apply("w1", MdWindow::new(100.0, 200.0), Offset::new(3.0, 0.0, 0.0), false)
            .unwrap();
        let loaded = store.load("w1").unwrap();
        assert_eq!(loaded.current_sequence(), 1);
        assert_eq!(store.state("w1").unwrap().east_adjusted, vec![0.0, 3.0, 3.0]);
    }

    #[test]
    fn test_interleaved_write_is_rejected() {
        let store = AdjustmentStore::temporary().unwrap();
        store.init("w1", &history()).unwrap();

        let err = store
            .update("w1", |h| {
                // a second writer commits while this one is mid-flight
                store.apply("w1", MdWindow::new(0.0, 100.0), Offset::new(1.0, 0.0, 0.0), false)?;
                h.apply(MdWindow::new(0.0, 100.0), Offset::new(9.0, 0.0, 0.0), false)
            })
            .unwrap_err();
        assert!(matches!(err, AdjustmentError::ConcurrentModification(_)));

        // only the committed writer's change survives
        let state = store.state("w1").unwrap();
        assert_eq!(state.sequence, 1);
        assert_eq!(state.east_adjusted[0], 1.0);
    }

    #[test]
    fn test_failed_operation_writes_nothing() {
        let store = AdjustmentStore::temporary().unwrap();
        store.init("w1", &history()).unwrap();
        assert!(store.redo("w1").is_err());
        assert_eq!(store.load("w1").unwrap(), history());
    }

    #[test]
    fn test_remove() {
        let store = AdjustmentStore::temporary().unwrap();
        store.init("w1", &history()).unwrap();
        assert_eq!(store.ids().unwrap(), vec!["w1".to_string()]);
        assert!(store.remove("w1").unwrap());
        assert!(!store.contains("w1").unwrap());
    }

    #[test]
    fn test_ids_lists_every_stored_trajectory() {
        let store = AdjustmentStore::temporary().unwrap();
        assert!(store.ids().unwrap().is_empty());
        store.init("w2", &history()).unwrap();
        store.init("w1", &history()).unwrap();
        assert_eq!(store.ids().unwrap(), vec!["w1".to_string(), "w2".to_string()]);
    }
}
