use smartstats_types::ApiError;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

/// Handler failure carrying the status and message sent to the client
#[derive(Debug)]
pub struct ApiRejection {
    pub status: StatusCode,
    pub message: String,
}

impl ApiRejection {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Logs the underlying error; the client only sees `context`
    pub fn internal(context: &str, err: anyhow::Error) -> Self {
        tracing::error!("{}: {:#}", context, err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
    }
}

impl warp::reject::Reject for ApiRejection {}

pub fn error_reply(status: StatusCode, message: impl Into<String>) -> Response {
    warp::reply::with_status(warp::reply::json(&ApiError::new(message)), status).into_response()
}

/// Turns rejections into JSON error bodies. Unmatched routes stay rejected so
/// a static file filter placed after the API can still answer them.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Rejection> {
    if let Some(api) = err.find::<ApiRejection>() {
        return Ok(error_reply(api.status, api.message.clone()));
    }
    if err.is_not_found() {
        return Err(err);
    }

    let (status, message) = if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>()
    {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Upload too large".to_string())
    } else if let Some(e) = err.find::<warp::reject::UnsupportedMediaType>() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::LengthRequired>() {
        (StatusCode::LENGTH_REQUIRED, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidHeader>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        return Err(err);
    };

    Ok(error_reply(status, message))
}
