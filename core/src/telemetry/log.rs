use crate::store::admission::Rejection;
use crate::store::integrity::IntegrityReport;
use crate::telemetry::observer::StoreObserver;
use log::{debug, info, warn};

/// Observer that writes store events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl StoreObserver for LogObserver {
    fn on_admitted(&self, count: usize) {
        debug!("admitted {} detections", count);
    }

    fn on_rejected(&self, id: &str, rejection: &Rejection) {
        warn!("rejected detection {}: {}", id, rejection);
    }

    fn on_evicted(&self, count: usize) {
        info!("evicted {} oldest detections", count);
    }

    fn on_integrity_failure(&self, report: &IntegrityReport) {
        for issue in &report.issues {
            warn!("store integrity: {}", issue);
        }
    }
}
