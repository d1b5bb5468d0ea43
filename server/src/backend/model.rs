use serde::{Deserialize, Serialize};
use tactcore::record::{BoundingBox, ImageShape};

/// One entry of the backend's `detections` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendDetection {
    pub class: Option<String>,
    pub confidence: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub region: Option<String>,
}

impl BackendDetection {
    /// Present only when all four corners were reported.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut bbox = BoundingBox::from_corners(self.x1?, self.y1?, self.x2?, self.y2?);
        if let Some(width) = self.width {
            bbox.width = width;
        }
        if let Some(height) = self.height {
            bbox.height = height;
        }
        Some(bbox)
    }
}

/// Body of `POST /detect`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectResponse {
    pub success: bool,
    pub detections: Vec<BackendDetection>,
    pub total_detections: Option<usize>,
    pub image_shape: Option<ImageShape>,
    pub filename: Option<String>,
    pub model_loaded: bool,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub device: Option<String>,
}
