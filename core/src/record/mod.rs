pub mod detection;
pub mod patch;

pub use detection::{BoundingBox, Coordinates, DetectionRecord, ImageShape};
pub use patch::DetectionPatch;
