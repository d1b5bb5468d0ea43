pub mod admission;
pub mod detection_store;
pub mod integrity;
pub mod query;
pub mod shared;
pub mod stats;

pub use admission::{AdmissionPolicy, PlaceholderCoordinate, Rejection};
pub use detection_store::DetectionStore;
pub use integrity::{IntegrityIssue, IntegrityReport};
pub use query::DetectionQuery;
pub use shared::SharedDetectionStore;
pub use stats::{DetectionStats, ObjectTypeStats};
