use crate::backend::model::DetectResponse;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use tactcore::record::Coordinates;
use tactcore::DetectionRecord;

const DEFAULT_OBJECT_TYPE: &str = "unknown";
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Produces `detection_<millis>_<random>_<counter>` ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let counter = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!(
            "detection_{}_{:08x}_{}",
            now.timestamp_millis(),
            rand::random::<u32>(),
            counter
        )
    }
}

/// Turns a backend reply into store candidates. Positions are carried
/// through as reported; admission decides whether they are usable.
pub fn to_records(
    response: &DetectResponse,
    image_filename: &str,
    timestamp: DateTime<Utc>,
    ids: &IdGenerator,
) -> Vec<DetectionRecord> {
    if !response.success {
        return Vec::new();
    }
    response
        .detections
        .iter()
        .map(|detection| {
            let coordinates = Coordinates {
                x: detection.x.unwrap_or_default(),
                y: detection.y.unwrap_or_default(),
                lat: detection.lat,
                lng: detection.lng,
            };
            let mut record = DetectionRecord::with_coordinates(
                ids.next_id(timestamp),
                detection
                    .class
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OBJECT_TYPE.to_string()),
                detection.confidence.unwrap_or(DEFAULT_CONFIDENCE),
                coordinates,
                timestamp,
            )
            .with_image(image_filename, response.image_shape);
            if let Some(bounding_box) = detection.bounding_box() {
                record = record.with_bounding_box(bounding_box);
            }
            if let Some(region) = &detection.region {
                record = record.with_region(region.as_str());
            }
            record
        })
        .collect()
}
