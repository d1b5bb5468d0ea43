//! Detection record store for the TactMap dashboard.
//!
//! The store keeps detections returned by the external detection backend in
//! memory, rejects duplicates and unusable coordinates, bounds its size by
//! evicting the oldest records, and answers the map and statistics queries.

pub mod clock;
pub mod math;
pub mod prelude;
pub mod record;
pub mod store;
pub mod telemetry;

pub use prelude::{StoreConfig, StoreError, StoreResult};
pub use record::{DetectionPatch, DetectionRecord};
pub use store::{DetectionQuery, DetectionStats, DetectionStore, SharedDetectionStore};
