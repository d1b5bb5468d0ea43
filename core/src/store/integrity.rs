use crate::math::geo::is_valid_lat_lng;
use crate::record::DetectionRecord;
use serde::Serialize;
use std::collections::HashSet;

/// A single discrepancy found by [`IntegrityReport::inspect`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IntegrityIssue {
    #[error("duplicate id {id}")]
    DuplicateId { id: String },
    #[error("id {id} is stored but not tracked")]
    UntrackedId { id: String },
    #[error("tracked id count {tracked} differs from unique record ids {unique}")]
    IdSetMismatch { tracked: usize, unique: usize },
    #[error("record {id} has invalid coordinates")]
    InvalidCoordinates { id: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub record_count: usize,
    pub tracked_ids: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn inspect<'a, I>(records: I, tracked: &HashSet<String>) -> Self
    where
        I: IntoIterator<Item = &'a DetectionRecord>,
    {
        let mut seen = HashSet::new();
        let mut issues = Vec::new();
        let mut record_count = 0;

        for record in records {
            record_count += 1;
            if !seen.insert(record.id.as_str()) {
                issues.push(IntegrityIssue::DuplicateId {
                    id: record.id.clone(),
                });
            }
            if !tracked.contains(&record.id) {
                issues.push(IntegrityIssue::UntrackedId {
                    id: record.id.clone(),
                });
            }
            let valid = record
                .lat_lng()
                .map(|(lat, lng)| is_valid_lat_lng(lat, lng))
                .unwrap_or(false);
            if !valid {
                issues.push(IntegrityIssue::InvalidCoordinates {
                    id: record.id.clone(),
                });
            }
        }

        if tracked.len() != seen.len() {
            issues.push(IntegrityIssue::IdSetMismatch {
                tracked: tracked.len(),
                unique: seen.len(),
            });
        }

        Self {
            record_count,
            tracked_ids: tracked.len(),
            issues,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn consistent_records_pass() {
        let now = Utc::now();
        let records = vec![
            DetectionRecord::new("a", "car", 0.5, 10.0, 10.0, now),
            DetectionRecord::new("b", "car", 0.5, 11.0, 11.0, now),
        ];
        let report = IntegrityReport::inspect(&records, &ids(&["a", "b"]));
        assert!(report.is_ok());
        assert_eq!(report.record_count, 2);
    }

    #[test]
    fn reports_every_discrepancy() {
        let now = Utc::now();
        let mut broken = DetectionRecord::new("b", "car", 0.5, 11.0, 11.0, now);
        broken.coordinates.lat = Some(120.0);
        let records = vec![
            DetectionRecord::new("a", "car", 0.5, 10.0, 10.0, now),
            DetectionRecord::new("a", "car", 0.5, 10.0, 10.0, now),
            broken,
        ];
        let report = IntegrityReport::inspect(&records, &ids(&["a", "c", "d"]));
        assert!(!report.is_ok());
        assert!(report
            .issues
            .contains(&IntegrityIssue::DuplicateId { id: "a".into() }));
        assert!(report
            .issues
            .contains(&IntegrityIssue::UntrackedId { id: "b".into() }));
        assert!(report
            .issues
            .contains(&IntegrityIssue::InvalidCoordinates { id: "b".into() }));
        assert!(report.issues.contains(&IntegrityIssue::IdSetMismatch {
            tracked: 3,
            unique: 2
        }));
    }
}
