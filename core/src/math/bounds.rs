use serde::{Deserialize, Serialize};

/// Bounding box of geographic positions, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

/// Folds positions into a [`CoordinateBounds`] one at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsAccumulator {
    bounds: Option<CoordinateBounds>,
}

impl BoundsAccumulator {
    pub fn include(&mut self, lat: f64, lng: f64) {
        self.bounds = Some(match self.bounds {
            None => CoordinateBounds {
                min_lat: lat,
                max_lat: lat,
                min_lng: lng,
                max_lng: lng,
            },
            Some(b) => CoordinateBounds {
                min_lat: b.min_lat.min(lat),
                max_lat: b.max_lat.max(lat),
                min_lng: b.min_lng.min(lng),
                max_lng: b.max_lng.max(lng),
            },
        });
    }

    pub fn finish(self) -> Option<CoordinateBounds> {
        self.bounds
    }
}
