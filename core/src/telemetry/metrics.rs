use crate::store::admission::Rejection;
use crate::store::integrity::IntegrityReport;
use crate::telemetry::observer::StoreObserver;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Counting observer.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub admitted: usize,
    pub rejected: BTreeMap<String, usize>,
    pub evicted: usize,
    pub integrity_failures: usize,
}

impl MetricsSnapshot {
    pub fn total_rejected(&self) -> usize {
        self.rejected.values().sum()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            metrics.clone()
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreObserver for MetricsRecorder {
    fn on_admitted(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.admitted += count;
        }
    }

    fn on_rejected(&self, _id: &str, rejection: &Rejection) {
        if let Ok(mut metrics) = self.inner.lock() {
            *metrics
                .rejected
                .entry(rejection.label().to_string())
                .or_default() += 1;
        }
    }

    fn on_evicted(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.evicted += count;
        }
    }

    fn on_integrity_failure(&self, _report: &IntegrityReport) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.integrity_failures += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_counted_per_reason() {
        let metrics = MetricsRecorder::new();
        metrics.on_rejected("a", &Rejection::DuplicateId);
        metrics.on_rejected("b", &Rejection::DuplicateId);
        metrics.on_rejected("c", &Rejection::MissingCoordinates);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.rejected.get("duplicate_id"), Some(&2));
        assert_eq!(snapshot.rejected.get("missing_coordinates"), Some(&1));
        assert_eq!(snapshot.total_rejected(), 3);
    }
}
