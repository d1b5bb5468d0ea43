use crate::backend::HealthResponse;
use crate::ingest::{DetectionSource, IngestOutcome};
use serde::{Deserialize, Serialize};
use tactcore::store::IntegrityReport;
use tactcore::telemetry::MetricsSnapshot;
use tactcore::{DetectionRecord, DetectionStats};

pub const DEFAULT_LIST_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

impl ListParams {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

/// `POST /api/detections` accepts one record or an array of them. Each
/// element is parsed on its own so one malformed record only drops itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Submission {
    Many(Vec<serde_json::Value>),
    One(serde_json::Value),
}

#[derive(Debug, Default)]
pub struct ParsedSubmission {
    pub records: Vec<DetectionRecord>,
    pub malformed: usize,
}

impl Submission {
    pub fn parse(self) -> ParsedSubmission {
        let values = match self {
            Submission::Many(values) => values,
            Submission::One(value) => vec![value],
        };
        let mut parsed = ParsedSubmission::default();
        for value in values {
            match serde_json::from_value::<DetectionRecord>(value) {
                Ok(record) => parsed.records.push(record),
                Err(err) => {
                    log::warn!("skipping malformed detection: {}", err);
                    parsed.malformed += 1;
                }
            }
        }
        parsed
    }
}

#[derive(Debug, Serialize)]
pub struct DetectionList {
    pub detections: Vec<DetectionRecord>,
    pub total: usize,
}

impl From<Vec<DetectionRecord>> for DetectionList {
    fn from(detections: Vec<DetectionRecord>) -> Self {
        Self {
            total: detections.len(),
            detections,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub submitted: usize,
    pub admitted: usize,
    pub malformed: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub detections: Vec<DetectionRecord>,
    pub message: String,
    pub total_detections: usize,
    pub admitted: usize,
    pub model_loaded: bool,
    pub source: DetectionSource,
}

impl From<IngestOutcome> for UploadResponse {
    fn from(outcome: IngestOutcome) -> Self {
        let message = match outcome.records.len() {
            0 => "No objects detected".to_string(),
            1 => "Found 1 object".to_string(),
            n => format!("Found {n} objects"),
        };
        Self {
            success: true,
            total_detections: outcome.records.len(),
            detections: outcome.records,
            message,
            admitted: outcome.admitted,
            model_loaded: outcome.model_loaded,
            source: outcome.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub success: bool,
    pub stats: DetectionStats,
    pub integrity: IntegrityReport,
    pub metrics: MetricsSnapshot,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub detections: usize,
    pub capacity: usize,
    pub backend: Option<HealthResponse>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}
