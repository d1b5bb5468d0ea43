use crate::ingest::ingestor::IngestError;

pub const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// An image received from the dashboard, held in memory.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn validate(&self, max_bytes: usize) -> Result<(), IngestError> {
        if self.data.is_empty() {
            return Err(IngestError::MissingFile);
        }
        if self.size() > max_bytes {
            return Err(IngestError::TooLarge {
                size: self.size(),
                max: max_bytes,
            });
        }
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !ALLOWED_CONTENT_TYPES.contains(&essence.as_str()) {
            return Err(IngestError::UnsupportedType(self.content_type.clone()));
        }
        Ok(())
    }
}
