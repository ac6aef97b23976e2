//! Pieces shared by the RapidAPI-hosted services.

use reqwest::{Client, ClientBuilder, Response};
use serde::Deserialize;
use crate::error::{AppError, Result};

/// Error payload RapidAPI services send alongside non-success statuses.
#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Builds the HTTP client shared by the RapidAPI adapters.
pub(crate) fn build_client() -> Result<Client> {
    ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// Turns a non-success response into `UpstreamError`, keeping the provider message if any.
pub(crate) async fn upstream_error(response: Response) -> AppError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorBody>(&body).unwrap_or_default();
    AppError::UpstreamError {
        status,
        message: parsed.message.or(parsed.error),
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! A local stand-in for the RapidAPI services, served with axum.

    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use axum::{
        extract::{Form, Query, State},
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    #[derive(Debug, Clone)]
    pub struct Seen {
        pub params: HashMap<String, String>,
        pub api_key: Option<String>,
        pub host: Option<String>,
        pub content_type: Option<String>,
    }

    #[derive(Clone, Default)]
    pub struct MockState {
        pub requests: Arc<Mutex<Vec<Seen>>>,
    }

    fn seen(headers: &HeaderMap, params: HashMap<String, String>) -> Seen {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Seen {
            params,
            api_key: header("x-rapidapi-key"),
            host: header("x-rapidapi-host"),
            content_type: header("content-type"),
        }
    }

    async fn summarize(
        State(state): State<MockState>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        let url = params.get("url").cloned().unwrap_or_default();
        state.requests.lock().unwrap().push(seen(&headers, params));

        if url.contains("bad.example") {
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": "Could not extract" })))
        } else if url.contains("empty.example") {
            (StatusCode::OK, Json(json!({ "summary": "" })))
        } else {
            (StatusCode::OK, Json(json!({ "summary": format!("Summary of {}", url) })))
        }
    }

    async fn translate(
        State(state): State<MockState>,
        headers: HeaderMap,
        Form(params): Form<HashMap<String, String>>,
    ) -> impl IntoResponse {
        let to = params.get("to").cloned().unwrap_or_default();
        let text = params.get("text").cloned().unwrap_or_default();
        state.requests.lock().unwrap().push(seen(&headers, params));

        match to.as_str() {
            "de" => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "message": "You have exceeded the rate limit" })),
            ),
            "fr" => (
                StatusCode::OK,
                Json(json!({ "ok": false, "text_lang": "en", "translated_text": "" })),
            ),
            _ => (
                StatusCode::OK,
                Json(json!({
                    "ok": true,
                    "text_lang": "en",
                    "translated_text": format!("[{}] {}", to, text),
                })),
            ),
        }
    }

    pub async fn spawn() -> (SocketAddr, MockState) {
        let state = MockState::default();
        let app = Router::new()
            .route("/summarize", get(summarize))
            .route("/api/v3/translate", post(translate))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, state)
    }
}
