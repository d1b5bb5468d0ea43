pub mod error;
pub mod handlers;
pub mod model;
pub mod routes;

pub use routes::{routes, AppState};
