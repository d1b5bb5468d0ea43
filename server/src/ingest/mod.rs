pub mod ingestor;
pub mod mapper;
pub mod upload;

pub use ingestor::{DetectionSource, IngestOutcome, IngestSettings, Ingestor};
pub use upload::ImageUpload;
