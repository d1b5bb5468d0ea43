use crate::store::admission::Rejection;
use crate::store::integrity::IntegrityReport;
use std::sync::Arc;

/// Hook the store calls on admission, rejection, eviction and failed
/// integrity checks. All methods default to no-ops.
pub trait StoreObserver: Send + Sync {
    fn on_admitted(&self, _count: usize) {}
    fn on_rejected(&self, _id: &str, _rejection: &Rejection) {}
    fn on_evicted(&self, _count: usize) {}
    fn on_integrity_failure(&self, _report: &IntegrityReport) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StoreObserver for NoopObserver {}

/// Forwards every event to each inner observer in order.
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn StoreObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl StoreObserver for CompositeObserver {
    fn on_admitted(&self, count: usize) {
        self.observers.iter().for_each(|o| o.on_admitted(count));
    }

    fn on_rejected(&self, id: &str, rejection: &Rejection) {
        self.observers
            .iter()
            .for_each(|o| o.on_rejected(id, rejection));
    }

    fn on_evicted(&self, count: usize) {
        self.observers.iter().for_each(|o| o.on_evicted(count));
    }

    fn on_integrity_failure(&self, report: &IntegrityReport) {
        self.observers
            .iter()
            .for_each(|o| o.on_integrity_failure(report));
    }
}
