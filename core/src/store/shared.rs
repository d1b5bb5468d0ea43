use crate::prelude::{StoreConfig, StoreResult};
use crate::record::{DetectionPatch, DetectionRecord};
use crate::store::detection_store::DetectionStore;
use crate::store::stats::DetectionStats;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lock-guarded store handle for request handlers.
///
/// Mutations (including the eviction that follows a batch insert) run under
/// the write lock, so readers never see a half-applied batch.
pub struct SharedDetectionStore {
    inner: RwLock<DetectionStore>,
}

impl SharedDetectionStore {
    pub fn new(store: DetectionStore) -> Self {
        Self {
            inner: RwLock::new(store),
        }
    }

    pub fn from_config(config: StoreConfig) -> StoreResult<Self> {
        Ok(Self::new(DetectionStore::new(config)?))
    }

    // Every mutation finishes before its guard drops, so a poisoned lock
    // still holds consistent state.
    fn read_guard(&self) -> RwLockReadGuard<'_, DetectionStore> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, DetectionStore> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn read<R>(&self, f: impl FnOnce(&DetectionStore) -> R) -> R {
        f(&*self.read_guard())
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut DetectionStore) -> R) -> R {
        f(&mut *self.write_guard())
    }

    pub fn add_detections(&self, records: Vec<DetectionRecord>) -> usize {
        self.write(|store| store.add_detections(records))
    }

    pub fn add_detection(&self, record: DetectionRecord) -> bool {
        self.write(|store| store.add_detection(record))
    }

    pub fn get_detections(&self, limit: usize) -> Vec<DetectionRecord> {
        self.read(|store| store.get_detections(limit))
    }

    pub fn get_detection_by_id(&self, id: &str) -> Option<DetectionRecord> {
        self.read(|store| store.get_detection_by_id(id).cloned())
    }

    pub fn remove_detection(&self, id: &str) -> bool {
        self.write(|store| store.remove_detection(id))
    }

    pub fn update_detection(&self, id: &str, patch: DetectionPatch) -> bool {
        self.write(|store| store.update_detection(id, patch))
    }

    pub fn get_stats(&self) -> DetectionStats {
        self.read(|store| store.get_stats())
    }

    pub fn clear(&self) {
        self.write(|store| store.clear())
    }

    pub fn len(&self) -> usize {
        self.read(|store| store.len())
    }

    pub fn is_empty(&self) -> bool {
        self.read(|store| store.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn concurrent_writers_keep_store_consistent() {
        let shared = Arc::new(SharedDetectionStore::from_config(StoreConfig::with_capacity(50)).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..40 {
                        let record = DetectionRecord::new(
                            format!("w{worker}-{i}"),
                            "tank",
                            0.5,
                            10.0 + worker as f64,
                            20.0 + i as f64,
                            Utc::now(),
                        );
                        shared.add_detection(record);
                        assert!(shared.len() <= 50);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.len(), 50);
        assert!(shared.read(|store| store.validate_integrity()));
        assert_eq!(shared.get_stats().total_detections, 50);
    }

    #[test]
    fn handle_forwards_mutations() {
        let shared = SharedDetectionStore::from_config(StoreConfig::default()).unwrap();
        let record = DetectionRecord::new("a", "car", 0.5, 1.0, 1.0, Utc::now());
        assert!(shared.add_detection(record));
        assert!(shared.get_detection_by_id("a").is_some());
        assert!(shared.remove_detection("a"));
        assert!(shared.is_empty());
        assert_eq!(shared.add_detections(Vec::new()), 0);
        shared.clear();
        assert!(shared.get_detections(10).is_empty());
    }
}
