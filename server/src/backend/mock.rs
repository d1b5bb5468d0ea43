use crate::backend::model::{BackendDetection, DetectResponse};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tactcore::record::ImageShape;

/// Shape assumed for mock detections when the image was not decoded.
pub const DEFAULT_MOCK_SHAPE: ImageShape = ImageShape {
    width: 640,
    height: 480,
};

const PIXEL_MARGIN: f64 = 50.0;

struct RegionAnchor {
    name: &'static str,
    lat: f64,
    lng: f64,
}

const REGIONS: [RegionAnchor; 6] = [
    RegionAnchor { name: "Middle East", lat: 33.3152, lng: 44.3661 },
    RegionAnchor { name: "Eastern Europe", lat: 50.4501, lng: 30.5234 },
    RegionAnchor { name: "Central Asia", lat: 41.2995, lng: 69.2401 },
    RegionAnchor { name: "South Asia", lat: 28.6139, lng: 77.2090 },
    RegionAnchor { name: "East Asia", lat: 39.9042, lng: 116.4074 },
    RegionAnchor { name: "North Africa", lat: 30.0444, lng: 31.2357 },
];

/// Seeded stand-in for the detection backend.
pub struct MockGenerator {
    rng: StdRng,
}

impl MockGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pixel_range(&mut self, extent: u32) -> f64 {
        let extent = extent as f64;
        if extent > 2.0 * PIXEL_MARGIN {
            self.rng.gen_range(PIXEL_MARGIN..extent - PIXEL_MARGIN)
        } else {
            extent / 2.0
        }
    }

    fn detection(&mut self, index: usize, shape: ImageShape) -> BackendDetection {
        let center_x = self.pixel_range(shape.width);
        let center_y = self.pixel_range(shape.height);
        let box_width = self.rng.gen_range(30.0..100.0);
        let box_height = self.rng.gen_range(30.0..100.0);

        let region = &REGIONS[index % REGIONS.len()];
        let lat = region.lat + self.rng.gen_range(-0.05..0.05);
        let lng = region.lng + self.rng.gen_range(-0.05..0.05);

        BackendDetection {
            class: Some("tank".into()),
            confidence: Some(self.rng.gen_range(0.6..0.95)),
            x: Some(center_x),
            y: Some(center_y),
            x1: Some(center_x - box_width / 2.0),
            y1: Some(center_y - box_height / 2.0),
            x2: Some(center_x + box_width / 2.0),
            y2: Some(center_y + box_height / 2.0),
            width: Some(box_width),
            height: Some(box_height),
            lat: Some(lat),
            lng: Some(lng),
            region: Some(region.name.into()),
        }
    }

    /// Between two and nine detections, shaped like a real backend reply.
    pub fn generate(&mut self, filename: &str, shape: ImageShape) -> DetectResponse {
        let count = self.rng.gen_range(2..=9);
        let detections: Vec<_> = (0..count).map(|i| self.detection(i, shape)).collect();
        DetectResponse {
            success: true,
            total_detections: Some(detections.len()),
            detections,
            image_shape: Some(shape),
            filename: Some(filename.to_string()),
            model_loaded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_produces_same_detections() {
        let first = MockGenerator::new(7).generate("a.png", DEFAULT_MOCK_SHAPE);
        let second = MockGenerator::new(7).generate("a.png", DEFAULT_MOCK_SHAPE);
        assert_eq!(first, second);
    }

    #[test]
    fn detections_stay_inside_expected_ranges() {
        let mut generator = MockGenerator::new(42);
        for _ in 0..20 {
            let response = generator.generate("scene.jpg", DEFAULT_MOCK_SHAPE);
            assert!(!response.model_loaded);
            assert!((2..=9).contains(&response.detections.len()));
            for (i, detection) in response.detections.iter().enumerate() {
                let confidence = detection.confidence.unwrap();
                assert!((0.6..0.95).contains(&confidence));
                let x = detection.x.unwrap();
                assert!((50.0..590.0).contains(&x));
                let region = &REGIONS[i % REGIONS.len()];
                assert!((detection.lat.unwrap() - region.lat).abs() <= 0.05);
                assert!((detection.lng.unwrap() - region.lng).abs() <= 0.05);
                assert_eq!(detection.region.as_deref(), Some(region.name));
            }
        }
    }

    #[test]
    fn tiny_images_keep_detections_centred() {
        let mut generator = MockGenerator::new(1);
        let shape = ImageShape { width: 64, height: 64 };
        let response = generator.generate("tiny.png", shape);
        assert!(response.detections.iter().all(|d| d.x == Some(32.0)));
    }
}
