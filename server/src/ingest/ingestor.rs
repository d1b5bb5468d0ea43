use crate::backend::mock::DEFAULT_MOCK_SHAPE;
use crate::backend::{BackendClient, BackendError, DetectResponse, MockGenerator};
use crate::config::ServerConfig;
use crate::ingest::mapper::{to_records, IdGenerator};
use crate::ingest::upload::ImageUpload;
use log::{info, warn};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tactcore::clock::{Clock, SystemClock};
use tactcore::{DetectionRecord, SharedDetectionStore};

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("no file provided")]
    MissingFile,
    #[error("file too large: {size} bytes (maximum {max} bytes)")]
    TooLarge { size: usize, max: usize },
    #[error("invalid file type {0}; allowed types: image/jpeg, image/png, image/gif, image/webp")]
    UnsupportedType(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl IngestError {
    /// The caller sent something unusable, as opposed to an upstream failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, IngestError::Backend(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSource {
    Backend,
    Mock,
}

#[derive(Debug, Clone, Copy)]
pub struct IngestSettings {
    pub max_upload_bytes: usize,
    pub mock_fallback: bool,
    pub mock_seed: u64,
}

impl From<&ServerConfig> for IngestSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            mock_fallback: config.mock_fallback,
            mock_seed: config.mock_seed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// Every record built from the reply, admitted or not.
    pub records: Vec<DetectionRecord>,
    pub admitted: usize,
    pub source: DetectionSource,
    pub model_loaded: bool,
}

/// Upload path: validate, detect, map, admit.
pub struct Ingestor {
    store: Arc<SharedDetectionStore>,
    backend: BackendClient,
    mock: Mutex<MockGenerator>,
    ids: IdGenerator,
    clock: Arc<dyn Clock>,
    settings: IngestSettings,
}

impl Ingestor {
    pub fn new(
        store: Arc<SharedDetectionStore>,
        backend: BackendClient,
        settings: IngestSettings,
    ) -> Self {
        Self {
            store,
            backend,
            mock: Mutex::new(MockGenerator::new(settings.mock_seed)),
            ids: IdGenerator::new(),
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    fn mock_response(&self, filename: &str) -> DetectResponse {
        let mut generator = self
            .mock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        generator.generate(filename, DEFAULT_MOCK_SHAPE)
    }

    pub async fn ingest(&self, upload: ImageUpload) -> Result<IngestOutcome, IngestError> {
        upload.validate(self.settings.max_upload_bytes)?;
        info!("processing {} ({} bytes)", upload.filename, upload.size());

        let (response, source) = match self.backend.detect(&upload).await {
            Ok(response) => (response, DetectionSource::Backend),
            Err(err) if self.settings.mock_fallback => {
                warn!("detection backend failed, serving mock detections: {}", err);
                (self.mock_response(&upload.filename), DetectionSource::Mock)
            }
            Err(err) => return Err(err.into()),
        };

        let records = to_records(&response, &upload.filename, self.clock.now(), &self.ids);
        let admitted = if records.is_empty() {
            0
        } else {
            self.store.add_detections(records.clone())
        };
        info!(
            "{} detections from {:?}, {} admitted",
            records.len(),
            source,
            admitted
        );

        Ok(IngestOutcome {
            records,
            admitted,
            source,
            model_loaded: response.model_loaded,
        })
    }
}
