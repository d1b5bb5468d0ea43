use crate::math::bounds::{BoundsAccumulator, CoordinateBounds};
use crate::math::stats::RunningMean;
use crate::record::DetectionRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-type count and mean confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTypeStats {
    #[serde(rename = "_id")]
    pub object_type: String,
    pub count: usize,
    pub avg_confidence: f64,
}

/// Aggregate statistics over the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionStats {
    pub total_detections: usize,
    pub recent_detections: usize,
    /// Sorted by count, highest first; equal counts by type name.
    pub object_types: Vec<ObjectTypeStats>,
    pub unique_object_types: usize,
    pub average_confidence: f64,
    pub high_confidence_count: usize,
    pub coordinate_bounds: Option<CoordinateBounds>,
}

/// Thresholds applied while aggregating.
#[derive(Debug, Clone, Copy)]
pub struct StatsWindow {
    pub now: DateTime<Utc>,
    pub recent_window: Duration,
    pub high_confidence_threshold: f64,
}

impl DetectionStats {
    /// Single pass over `records`.
    pub fn compute<'a, I>(records: I, window: StatsWindow) -> Self
    where
        I: IntoIterator<Item = &'a DetectionRecord>,
    {
        // None when the window reaches past the earliest representable time
        let recent_cutoff = window.now.checked_sub_signed(window.recent_window);
        let mut total = 0;
        let mut recent = 0;
        let mut high_confidence = 0;
        let mut overall = RunningMean::default();
        let mut bounds = BoundsAccumulator::default();
        let mut per_type: HashMap<&str, RunningMean> = HashMap::new();

        for record in records {
            total += 1;
            if recent_cutoff.map_or(true, |cutoff| record.timestamp > cutoff) {
                recent += 1;
            }
            if record.confidence >= window.high_confidence_threshold {
                high_confidence += 1;
            }
            overall.push(record.confidence);
            per_type
                .entry(record.object_type.as_str())
                .or_default()
                .push(record.confidence);
            if let Some((lat, lng)) = record.lat_lng() {
                bounds.include(lat, lng);
            }
        }

        let mut object_types: Vec<ObjectTypeStats> = per_type
            .into_iter()
            .map(|(object_type, mean)| ObjectTypeStats {
                object_type: object_type.to_string(),
                count: mean.count(),
                avg_confidence: mean.mean(),
            })
            .collect();
        object_types.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.object_type.cmp(&b.object_type))
        });

        Self {
            total_detections: total,
            recent_detections: recent,
            unique_object_types: object_types.len(),
            object_types,
            average_confidence: overall.mean(),
            high_confidence_count: high_confidence,
            coordinate_bounds: bounds.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window(now: DateTime<Utc>) -> StatsWindow {
        StatsWindow {
            now,
            recent_window: Duration::hours(1),
            high_confidence_threshold: 0.8,
        }
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let stats = DetectionStats::compute(&Vec::<DetectionRecord>::new(), window(Utc::now()));
        assert_eq!(stats.total_detections, 0);
        assert_eq!(stats.average_confidence, 0.0);
        assert!(stats.object_types.is_empty());
        assert!(stats.coordinate_bounds.is_none());
    }

    #[test]
    fn recent_window_excludes_the_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let records = vec![
            DetectionRecord::new("a", "car", 0.5, 1.0, 1.0, now - Duration::minutes(59)),
            DetectionRecord::new("b", "car", 0.5, 1.0, 1.0, now - Duration::hours(1)),
            DetectionRecord::new("c", "car", 0.5, 1.0, 1.0, now - Duration::hours(3)),
        ];
        let stats = DetectionStats::compute(&records, window(now));
        assert_eq!(stats.recent_detections, 1);
    }

    #[test]
    fn unbounded_window_counts_everything_recent() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let records = vec![DetectionRecord::new("a", "car", 0.5, 1.0, 1.0, now)];
        let stats = DetectionStats::compute(
            &records,
            StatsWindow {
                recent_window: Duration::MAX,
                ..window(now)
            },
        );
        assert_eq!(stats.recent_detections, 1);
    }

    #[test]
    fn ties_are_ordered_by_type_name() {
        let now = Utc::now();
        let records = vec![
            DetectionRecord::new("a", "ship", 0.5, 1.0, 1.0, now),
            DetectionRecord::new("b", "radar", 0.5, 1.0, 1.0, now),
        ];
        let stats = DetectionStats::compute(&records, window(now));
        let names: Vec<_> = stats
            .object_types
            .iter()
            .map(|t| t.object_type.as_str())
            .collect();
        assert_eq!(names, vec!["radar", "ship"]);
    }

    #[test]
    fn serialises_with_dashboard_field_names() {
        let now = Utc::now();
        let records = vec![DetectionRecord::new("a", "tank", 0.9, 1.0, 2.0, now)];
        let value = serde_json::to_value(DetectionStats::compute(&records, window(now))).unwrap();
        assert_eq!(value["totalDetections"], 1);
        assert_eq!(value["objectTypes"][0]["_id"], "tank");
        assert_eq!(value["objectTypes"][0]["avgConfidence"], 0.9);
        assert_eq!(value["coordinateBounds"]["minLng"], 2.0);
        assert_eq!(value["highConfidenceCount"], 1);
    }
}
