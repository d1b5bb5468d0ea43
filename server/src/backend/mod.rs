pub mod client;
pub mod mock;
pub mod model;

pub use client::{BackendClient, BackendError};
pub use mock::MockGenerator;
pub use model::{DetectResponse, HealthResponse};
