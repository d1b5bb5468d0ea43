use crate::api::error::handle_rejection;
use crate::api::handlers;
use crate::api::model::{ListParams, Submission};
use crate::ingest::Ingestor;
use std::convert::Infallible;
use std::sync::Arc;
use tactcore::telemetry::MetricsRecorder;
use tactcore::{DetectionPatch, DetectionQuery, SharedDetectionStore};
use warp::{Filter, Reply};

const JSON_BODY_LIMIT: u64 = 4 * 1024 * 1024;
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Everything the handlers need; cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SharedDetectionStore>,
    pub ingestor: Arc<Ingestor>,
    pub metrics: Arc<MetricsRecorder>,
    pub max_upload_bytes: usize,
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(JSON_BODY_LIMIT).and(warp::body::json())
}

/// `/api/detections/{id}`; `search` is reserved for the search route so a
/// bad search query is reported instead of being looked up as an id.
fn detection_id() -> impl Filter<Extract = (String,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "detections" / String).and_then(|id: String| async move {
        if id == "search" {
            Err(warp::reject::not_found())
        } else {
            Ok(id)
        }
    })
}

/// The full HTTP surface: detections, stats, upload, debug and health.
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let detections = warp::path!("api" / "detections");

    let list = detections
        .and(warp::get())
        .and(warp::query::<ListParams>())
        .and(with_state(state.clone()))
        .map(handlers::list_detections);

    let search = warp::path!("api" / "detections" / "search")
        .and(warp::get())
        .and(warp::query::<DetectionQuery>())
        .and(with_state(state.clone()))
        .map(handlers::search_detections);

    let submit = detections
        .and(warp::post())
        .and(json_body::<Submission>())
        .and(with_state(state.clone()))
        .map(handlers::submit_detections);

    let get_one = detection_id()
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(handlers::get_detection);

    let update = detection_id()
        .and(warp::patch())
        .and(json_body::<DetectionPatch>())
        .and(with_state(state.clone()))
        .map(handlers::update_detection);

    let delete = detection_id()
        .and(warp::delete())
        .and(with_state(state.clone()))
        .map(handlers::delete_detection);

    let stats = warp::path!("api" / "stats")
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(handlers::stats);

    let upload = warp::path!("api" / "upload")
        .and(warp::post())
        .and(warp::multipart::form().max_length(state.max_upload_bytes as u64 + MULTIPART_OVERHEAD))
        .and(with_state(state.clone()))
        .and_then(handlers::upload);

    let clear = warp::path!("api" / "debug" / "clear")
        .and(warp::post())
        .and(with_state(state.clone()))
        .map(handlers::clear);

    let debug = warp::path!("api" / "debug")
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(handlers::debug);

    let health = warp::path!("health")
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::health);

    search
        .or(list)
        .or(submit)
        .or(get_one)
        .or(update)
        .or(delete)
        .or(stats)
        .or(upload)
        .or(clear)
        .or(debug)
        .or(health)
        .recover(handle_rejection)
}
