use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};

/// Envelope around every JSON body the server returns.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: &'static str,
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
    pub message: Option<String>,
}

pub type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

fn meta(status: StatusCode, message: Option<String>) -> ResponseMeta {
    ResponseMeta {
        status: if status.is_success() { "success" } else { "error" },
        status_code: status.as_u16(),
        timestamp: Utc::now(),
        message,
    }
}

pub fn success<T: Serialize>(data: T) -> Reply<T> {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: Some(data),
            meta: meta(StatusCode::OK, None),
        }),
    )
}

pub fn error<T>(status: StatusCode, message: String) -> Reply<T> {
    (
        status,
        Json(ApiResponse {
            data: None,
            meta: meta(status, Some(message)),
        }),
    )
}
