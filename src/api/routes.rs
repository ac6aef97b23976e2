use axum::{
    routing::{delete, get, post},
    Router,
    extract::{Json, State},
    response::{Html, IntoResponse},
};
use tower_http::cors::{CorsLayer, Any};
use tracing::info;

use crate::api::models::{CopyRequest, LanguageRequest, SelectRequest, SummarizeRequest};
use crate::api::{response, shell};
use crate::error::Result;
use crate::session::View;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(shell_handler))
        .route("/api/state", get(state_handler))
        .route("/api/summarize", post(summarize_handler))
        .route("/api/history", delete(clear_history_handler))
        .route("/api/history/select", post(select_handler))
        .route("/api/copy", post(copy_handler))
        .route("/api/language", post(language_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn shell_handler() -> Html<String> {
    Html(shell::render())
}

async fn state_handler(State(state): State<AppState>) -> impl IntoResponse {
    response::success(state.session.view().await)
}

/// Upstream failures are reported inside the view, not as HTTP errors.
async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Result<response::Reply<View>> {
    info!("Processing summary request for URL: {}", req.url);
    let start_time = std::time::Instant::now();

    let view = state.session.submit_url(&req.url).await?;

    info!("Summary request took {:?}", start_time.elapsed());
    Ok(response::success(view))
}

async fn select_handler(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<response::Reply<View>> {
    let view = state.session.select_history_entry(req.index).await?;
    Ok(response::success(view))
}

async fn clear_history_handler(State(state): State<AppState>) -> impl IntoResponse {
    response::success(state.session.clear_history().await)
}

async fn copy_handler(
    State(state): State<AppState>,
    Json(req): Json<CopyRequest>,
) -> Result<response::Reply<View>> {
    let view = state.session.copy_url(&req.url).await?;
    Ok(response::success(view))
}

async fn language_handler(
    State(state): State<AppState>,
    Json(req): Json<LanguageRequest>,
) -> Result<response::Reply<View>> {
    info!("Switching display language to {}", req.language);
    let view = state.session.change_language(req.language).await?;
    Ok(response::success(view))
}
