use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pixel-space centre plus geographic position of a detection.
///
/// `lat`/`lng` are optional on the wire so that candidates without a
/// geocoded position can still be deserialised and then rejected at
/// admission instead of failing the whole request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl Coordinates {
    pub fn geo(lat: f64, lng: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// Both geographic components, if present.
    pub fn lat_lng(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lng?))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            width: x2 - x1,
            height: y2 - y1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageShape {
    pub width: u32,
    pub height: u32,
}

/// A single object detection kept by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub object_type: String,
    pub confidence: f64,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub image_filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_shape: Option<ImageShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl DetectionRecord {
    pub fn new(
        id: impl Into<String>,
        object_type: impl Into<String>,
        confidence: f64,
        lat: f64,
        lng: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::with_coordinates(id, object_type, confidence, Coordinates::geo(lat, lng), timestamp)
    }

    /// Like [`DetectionRecord::new`], keeping pixel position and a possibly
    /// missing geographic position as given.
    pub fn with_coordinates(
        id: impl Into<String>,
        object_type: impl Into<String>,
        confidence: f64,
        coordinates: Coordinates,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            object_type: object_type.into(),
            confidence,
            coordinates,
            bounding_box: None,
            timestamp,
            image_filename: String::new(),
            image_shape: None,
            region: None,
        }
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    pub fn with_image(mut self, filename: impl Into<String>, shape: Option<ImageShape>) -> Self {
        self.image_filename = filename.into();
        self.image_shape = shape;
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn lat_lng(&self) -> Option<(f64, f64)> {
        self.coordinates.lat_lng()
    }

    /// Case-insensitive, including non-ASCII letters.
    pub fn is_type(&self, object_type: &str) -> bool {
        self.object_type.to_lowercase() == object_type.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_serialises_with_dashboard_field_names() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = DetectionRecord::new("a", "car", 0.9, 40.0, -74.0, ts)
            .with_image("scene.png", Some(ImageShape { width: 640, height: 480 }));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["_id"], "a");
        assert_eq!(value["objectType"], "car");
        assert_eq!(value["coordinates"]["lat"], 40.0);
        assert_eq!(value["imageFilename"], "scene.png");
        assert_eq!(value["imageShape"]["width"], 640);
        assert!(value.get("boundingBox").is_none());
    }

    #[test]
    fn missing_geo_position_deserialises_as_none() {
        let json = r#"{
            "_id": "x",
            "objectType": "tank",
            "confidence": 0.7,
            "coordinates": {"x": 10, "y": 20},
            "timestamp": "2024-05-01T12:00:00Z"
        }"#;
        let record: DetectionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.lat_lng(), None);
        assert_eq!(record.coordinates.x, 10.0);
        assert!(record.image_filename.is_empty());
    }

    #[test]
    fn missing_coordinates_object_deserialises_without_position() {
        let json = r#"{
            "_id": "nocoords",
            "objectType": "tank",
            "confidence": 0.7,
            "timestamp": "2024-05-01T12:00:00Z"
        }"#;
        let record: DetectionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.coordinates, Coordinates::default());
        assert_eq!(record.lat_lng(), None);
    }

    #[test]
    fn type_comparison_ignores_case() {
        let record = DetectionRecord::new("a", "Tank", 0.5, 1.0, 1.0, Utc::now());
        assert!(record.is_type("tank"));
        assert!(record.is_type("TANK"));
        assert!(!record.is_type("tanker"));

        let accented = DetectionRecord::new("b", "Écran", 0.5, 1.0, 1.0, Utc::now());
        assert!(accented.is_type("écran"));
        assert!(accented.is_type("ÉCRAN"));
    }

    #[test]
    fn bounding_box_from_corners_derives_size() {
        let bbox = BoundingBox::from_corners(10.0, 20.0, 40.0, 70.0);
        assert_eq!(bbox.width, 30.0);
        assert_eq!(bbox.height, 50.0);
    }
}
