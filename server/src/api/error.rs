use crate::api::model::ErrorBody;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

pub fn error_reply(status: StatusCode, message: impl Into<String>) -> Response {
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            success: false,
            error: message.into(),
        }),
        status,
    )
    .into_response()
}

/// Turns warp rejections into the JSON error shape used by every route.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let reply = if err.is_not_found() {
        error_reply(StatusCode::NOT_FOUND, "not found")
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        error_reply(StatusCode::BAD_REQUEST, format!("invalid body: {e}"))
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        error_reply(StatusCode::BAD_REQUEST, format!("invalid query: {e}"))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        error_reply(StatusCode::PAYLOAD_TOO_LARGE, "payload too large")
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        error_reply(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported content type, expected application/json",
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        error_reply(StatusCode::LENGTH_REQUIRED, "content-length header required")
    } else if let Some(e) = err.find::<warp::reject::InvalidHeader>() {
        error_reply(StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_reply(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
    } else {
        log::error!("unhandled rejection: {:?}", err);
        error_reply(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    };
    Ok(reply)
}
