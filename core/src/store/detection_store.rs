use crate::clock::{Clock, SystemClock};
use crate::prelude::{StoreConfig, StoreResult};
use crate::record::{DetectionPatch, DetectionRecord};
use crate::store::admission::{AdmissionPolicy, Rejection};
use crate::store::integrity::IntegrityReport;
use crate::store::query::{within_radius, DetectionQuery};
use crate::store::stats::{DetectionStats, StatsWindow};
use crate::telemetry::observer::{NoopObserver, StoreObserver};
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Bounded, most-recent-first collection of detection records.
///
/// Ids are unique, every admitted record has a valid non-placeholder
/// position, and the record count never exceeds the configured capacity.
pub struct DetectionStore {
    records: VecDeque<DetectionRecord>,
    ids: HashSet<String>,
    config: StoreConfig,
    policy: AdmissionPolicy,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn StoreObserver>,
}

impl DetectionStore {
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            records: VecDeque::new(),
            ids: HashSet::new(),
            policy: AdmissionPolicy::from_config(&config),
            config,
            clock: Arc::new(SystemClock),
            observer: Arc::new(NoopObserver),
        })
    }

    pub fn with_capacity(max_detections: usize) -> StoreResult<Self> {
        Self::new(StoreConfig::with_capacity(max_detections))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn capacity(&self) -> usize {
        self.config.max_detections
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn admit(&self, record: &DetectionRecord) -> Result<(), Rejection> {
        if self.ids.contains(&record.id) {
            return Err(Rejection::DuplicateId);
        }
        self.policy.check_coordinates(&record.coordinates)
    }

    /// Admits the valid records of `records` as one block in front of the
    /// existing ones, keeping their input order, then evicts overflow.
    /// Returns how many were admitted.
    pub fn add_detections<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = DetectionRecord>,
    {
        let mut admitted = Vec::new();
        for record in records {
            match self.admit(&record) {
                Ok(()) => {
                    self.ids.insert(record.id.clone());
                    admitted.push(record);
                }
                Err(rejection) => self.observer.on_rejected(&record.id, &rejection),
            }
        }

        let count = admitted.len();
        for record in admitted.into_iter().rev() {
            self.records.push_front(record);
        }
        if count > 0 {
            self.observer.on_admitted(count);
        }
        self.evict_overflow();
        count
    }

    pub fn add_detection(&mut self, record: DetectionRecord) -> bool {
        self.add_detections(std::iter::once(record)) == 1
    }

    /// Drops the oldest records beyond capacity.
    fn evict_overflow(&mut self) {
        let capacity = self.config.max_detections;
        if self.records.len() <= capacity {
            return;
        }
        let evicted: Vec<DetectionRecord> = self.records.drain(capacity..).collect();
        for record in &evicted {
            self.ids.remove(&record.id);
        }
        self.observer.on_evicted(evicted.len());
    }

    fn filtered<F>(&self, limit: usize, predicate: F) -> Vec<DetectionRecord>
    where
        F: Fn(&DetectionRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|&record| predicate(record))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn get_detections(&self, limit: usize) -> Vec<DetectionRecord> {
        self.records.iter().take(limit).cloned().collect()
    }

    pub fn get_detection_by_id(&self, id: &str) -> Option<&DetectionRecord> {
        if !self.ids.contains(id) {
            return None;
        }
        self.records.iter().find(|record| record.id == id)
    }

    pub fn get_detections_by_type(&self, object_type: &str, limit: usize) -> Vec<DetectionRecord> {
        self.filtered(limit, |record| record.is_type(object_type))
    }

    pub fn get_detections_by_confidence(
        &self,
        min_confidence: f64,
        limit: usize,
    ) -> Vec<DetectionRecord> {
        self.filtered(limit, |record| record.confidence >= min_confidence)
    }

    pub fn get_detections_in_radius(
        &self,
        center_lat: f64,
        center_lng: f64,
        radius_km: f64,
        limit: usize,
    ) -> Vec<DetectionRecord> {
        self.filtered(limit, |record| {
            within_radius(record, center_lat, center_lng, radius_km)
        })
    }

    /// Both bounds inclusive.
    pub fn get_detections_by_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Vec<DetectionRecord> {
        self.filtered(limit, |record| {
            record.timestamp >= start && record.timestamp <= end
        })
    }

    /// Records newer than `hours` ago. A window too large to represent
    /// covers every record.
    pub fn get_recent_detections(&self, hours: i64) -> Vec<DetectionRecord> {
        let cutoff = Duration::try_hours(hours)
            .and_then(|window| self.clock.now().checked_sub_signed(window));
        match cutoff {
            Some(cutoff) => self.filtered(usize::MAX, |record| record.timestamp > cutoff),
            None => self.get_detections(usize::MAX),
        }
    }

    pub fn search(&self, query: &DetectionQuery) -> Vec<DetectionRecord> {
        self.filtered(query.limit(), |record| query.matches(record))
    }

    pub fn remove_detection(&mut self, id: &str) -> bool {
        if !self.ids.remove(id) {
            return false;
        }
        if let Some(index) = self.records.iter().position(|record| record.id == id) {
            self.records.remove(index);
        }
        true
    }

    /// Merges `patch` into the record with `id`. Coordinates are not
    /// re-validated.
    pub fn update_detection(&mut self, id: &str, patch: DetectionPatch) -> bool {
        match self.records.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                patch.apply_to(record);
                true
            }
            None => false,
        }
    }

    pub fn get_stats(&self) -> DetectionStats {
        DetectionStats::compute(
            &self.records,
            StatsWindow {
                now: self.clock.now(),
                recent_window: Duration::try_seconds(self.config.recent_window_secs)
                    .unwrap_or(Duration::MAX),
                high_confidence_threshold: self.config.high_confidence_threshold,
            },
        )
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.ids.clear();
    }

    pub fn integrity_report(&self) -> IntegrityReport {
        let report = IntegrityReport::inspect(&self.records, &self.ids);
        if !report.is_ok() {
            self.observer.on_integrity_failure(&report);
        }
        report
    }

    pub fn validate_integrity(&self) -> bool {
        self.integrity_report().is_ok()
    }
}
