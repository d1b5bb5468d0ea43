use crate::math::geo::haversine_km;
use crate::record::DetectionRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Combined search filter. Every present field must match.
///
/// The type filter is a case-insensitive substring match; the radius filter
/// only applies when centre and radius are all present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionQuery {
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    pub min_confidence: Option<f64>,
    pub max_confidence: Option<f64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

impl DetectionQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_QUERY_LIMIT)
    }

    fn radius(&self) -> Option<(f64, f64, f64)> {
        Some((self.lat?, self.lng?, self.radius_km?))
    }

    pub fn matches(&self, record: &DetectionRecord) -> bool {
        if let Some(object_type) = &self.object_type {
            let needle = object_type.to_lowercase();
            if !record.object_type.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if self.min_confidence.is_some_and(|min| record.confidence < min) {
            return false;
        }
        if self.max_confidence.is_some_and(|max| record.confidence > max) {
            return false;
        }
        if self.from.is_some_and(|from| record.timestamp < from) {
            return false;
        }
        if self.to.is_some_and(|to| record.timestamp > to) {
            return false;
        }
        if let Some((lat, lng, radius_km)) = self.radius() {
            return within_radius(record, lat, lng, radius_km);
        }
        true
    }
}

/// Records without a geographic position never match.
pub(crate) fn within_radius(
    record: &DetectionRecord,
    center_lat: f64,
    center_lng: f64,
    radius_km: f64,
) -> bool {
    record
        .lat_lng()
        .map(|(lat, lng)| haversine_km(center_lat, center_lng, lat, lng) <= radius_km)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record(object_type: &str, confidence: f64) -> DetectionRecord {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        DetectionRecord::new("id", object_type, confidence, 33.3, 44.3, ts)
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = DetectionQuery::default();
        assert!(query.matches(&record("tank", 0.1)));
        assert_eq!(query.limit(), DEFAULT_QUERY_LIMIT);
    }

    #[test]
    fn type_filter_is_case_insensitive_substring() {
        let query = DetectionQuery {
            object_type: Some("VEHICLE".into()),
            ..Default::default()
        };
        assert!(query.matches(&record("military_vehicle", 0.5)));
        assert!(!query.matches(&record("tank", 0.5)));
    }

    #[test]
    fn confidence_and_time_bounds_are_inclusive() {
        let rec = record("tank", 0.8);
        let query = DetectionQuery {
            min_confidence: Some(0.8),
            max_confidence: Some(0.8),
            from: Some(rec.timestamp),
            to: Some(rec.timestamp),
            ..Default::default()
        };
        assert!(query.matches(&rec));

        let later = DetectionQuery {
            from: Some(rec.timestamp + Duration::seconds(1)),
            ..Default::default()
        };
        assert!(!later.matches(&rec));
    }

    #[test]
    fn radius_filter_needs_all_three_fields() {
        let rec = record("tank", 0.5);
        let partial = DetectionQuery {
            lat: Some(0.0),
            lng: Some(0.0),
            ..Default::default()
        };
        assert!(partial.matches(&rec));

        let far = DetectionQuery {
            radius_km: Some(10.0),
            ..partial.clone()
        };
        assert!(!far.matches(&rec));

        let near = DetectionQuery {
            lat: Some(33.3),
            lng: Some(44.3),
            radius_km: Some(1.0),
            ..Default::default()
        };
        assert!(near.matches(&rec));
    }

    #[test]
    fn deserialises_from_camel_case() {
        let query: DetectionQuery =
            serde_json::from_str(r#"{"type": "tank", "minConfidence": 0.6, "radiusKm": 5}"#)
                .unwrap();
        assert_eq!(query.object_type.as_deref(), Some("tank"));
        assert_eq!(query.min_confidence, Some(0.6));
        assert_eq!(query.radius_km, Some(5.0));
    }
}
