use crate::api::error::error_reply;
use crate::api::model::{
    DebugResponse, DetectionList, HealthStatus, ListParams, StatusResponse, SubmitResponse,
    Submission, UploadResponse,
};
use crate::api::routes::AppState;
use crate::ingest::ImageUpload;
use bytes::BufMut;
use futures_util::TryStreamExt;
use log::{info, warn};
use std::convert::Infallible;
use tactcore::{DetectionPatch, DetectionQuery};
use warp::http::StatusCode;
use warp::multipart::FormData;
use warp::reply::{json, Response};
use warp::Reply;

const UPLOAD_FIELD: &str = "file";

pub fn list_detections(params: ListParams, state: AppState) -> Response {
    let detections = state.store.get_detections(params.limit());
    json(&DetectionList::from(detections)).into_response()
}

pub fn search_detections(query: DetectionQuery, state: AppState) -> Response {
    let detections = state.store.read(|store| store.search(&query));
    json(&DetectionList::from(detections)).into_response()
}

pub fn submit_detections(submission: Submission, state: AppState) -> Response {
    let parsed = submission.parse();
    let submitted = parsed.records.len() + parsed.malformed;
    let admitted = state.store.add_detections(parsed.records);
    if admitted < submitted {
        warn!("{} of {} submitted detections rejected", submitted - admitted, submitted);
    }
    json(&SubmitResponse {
        success: true,
        submitted,
        admitted,
        malformed: parsed.malformed,
    })
    .into_response()
}

pub fn get_detection(id: String, state: AppState) -> Response {
    match state.store.get_detection_by_id(&id) {
        Some(record) => json(&record).into_response(),
        None => error_reply(StatusCode::NOT_FOUND, format!("detection {id} not found")),
    }
}

pub fn update_detection(id: String, patch: DetectionPatch, state: AppState) -> Response {
    if state.store.update_detection(&id, patch) {
        json(&StatusResponse {
            success: true,
            message: None,
        })
        .into_response()
    } else {
        error_reply(StatusCode::NOT_FOUND, format!("detection {id} not found"))
    }
}

pub fn delete_detection(id: String, state: AppState) -> Response {
    if state.store.remove_detection(&id) {
        json(&StatusResponse {
            success: true,
            message: None,
        })
        .into_response()
    } else {
        error_reply(StatusCode::NOT_FOUND, format!("detection {id} not found"))
    }
}

pub fn stats(state: AppState) -> Response {
    json(&state.store.get_stats()).into_response()
}

pub fn clear(state: AppState) -> Response {
    state.store.clear();
    info!("all detections cleared");
    json(&StatusResponse {
        success: true,
        message: Some("All detections cleared".into()),
    })
    .into_response()
}

pub fn debug(state: AppState) -> Response {
    let (stats, integrity) = state
        .store
        .read(|store| (store.get_stats(), store.integrity_report()));
    info!(
        "store debug: {} records, {} tracked ids, {} integrity issues",
        integrity.record_count,
        integrity.tracked_ids,
        integrity.issues.len()
    );
    json(&DebugResponse {
        success: integrity.is_ok(),
        stats,
        integrity,
        metrics: state.metrics.snapshot(),
    })
    .into_response()
}

pub async fn health(state: AppState) -> Result<Response, Infallible> {
    let backend = match state.ingestor.backend().health().await {
        Ok(health) => Some(health),
        Err(err) => {
            warn!("detection backend health check failed: {}", err);
            None
        }
    };
    let (detections, capacity) = state.store.read(|store| (store.len(), store.capacity()));
    Ok(json(&HealthStatus {
        status: "ok",
        detections,
        capacity,
        backend,
    })
    .into_response())
}

async fn read_upload(form: FormData) -> Result<Option<ImageUpload>, warp::Error> {
    futures_util::pin_mut!(form);
    while let Some(part) = form.try_next().await? {
        if part.name() != UPLOAD_FIELD {
            continue;
        }
        let filename = part.filename().unwrap_or("upload").to_string();
        let content_type = part
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = part
            .stream()
            .try_fold(Vec::new(), |mut data, chunk| async move {
                data.put(chunk);
                Ok::<_, warp::Error>(data)
            })
            .await?;
        return Ok(Some(ImageUpload::new(filename, content_type, data)));
    }
    Ok(None)
}

pub async fn upload(form: FormData, state: AppState) -> Result<Response, Infallible> {
    let upload = match read_upload(form).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return Ok(error_reply(StatusCode::BAD_REQUEST, "No file provided")),
        Err(err) => {
            return Ok(error_reply(
                StatusCode::BAD_REQUEST,
                format!("invalid multipart body: {err}"),
            ))
        }
    };

    match state.ingestor.ingest(upload).await {
        Ok(outcome) => Ok(json(&UploadResponse::from(outcome)).into_response()),
        Err(err) if err.is_client_error() => {
            Ok(error_reply(StatusCode::BAD_REQUEST, err.to_string()))
        }
        Err(err) => {
            warn!("upload failed: {}", err);
            Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
        }
    }
}
