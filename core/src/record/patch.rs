use crate::record::detection::{BoundingBox, Coordinates, DetectionRecord, ImageShape};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Partial update merged into an existing record. The id is never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionPatch {
    pub object_type: Option<String>,
    pub confidence: Option<f64>,
    pub coordinates: Option<Coordinates>,
    pub bounding_box: Option<BoundingBox>,
    pub timestamp: Option<DateTime<Utc>>,
    pub image_filename: Option<String>,
    pub image_shape: Option<ImageShape>,
    pub region: Option<String>,
}

impl DetectionPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, record: &mut DetectionRecord) {
        if let Some(object_type) = self.object_type {
            record.object_type = object_type;
        }
        if let Some(confidence) = self.confidence {
            record.confidence = confidence;
        }
        if let Some(coordinates) = self.coordinates {
            record.coordinates = coordinates;
        }
        if let Some(bounding_box) = self.bounding_box {
            record.bounding_box = Some(bounding_box);
        }
        if let Some(timestamp) = self.timestamp {
            record.timestamp = timestamp;
        }
        if let Some(image_filename) = self.image_filename {
            record.image_filename = image_filename;
        }
        if let Some(image_shape) = self.image_shape {
            record.image_shape = Some(image_shape);
        }
        if let Some(region) = self.region {
            record.region = Some(region);
        }
    }
}
