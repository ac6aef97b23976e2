use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use article_summarizer::{
    config::Config,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(
        "Keeping history in {} (summary length {})",
        config.history_path.display(),
        config.summary_length
    );

    let app_state = AppState::from_config(config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
