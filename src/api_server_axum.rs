use crate::app_config::AppConfig;
use crate::html;
use crate::nse_client::NSEClient;
use crate::processor::{self, ViewModel};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    response::{Html, Json},
    routing::get,
    Router,
};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

// -----------------------------------------------
// API RESPONSE MODEL
// -----------------------------------------------

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub processing_time_ms: Option<u64>,
}

// -----------------------------------------------
// APPLICATION STATE
// -----------------------------------------------

/// Per-process state. Holds only the upstream client; every request builds
/// its own view model.
#[derive(Clone)]
pub struct AppState {
    client: Arc<NSEClient>,
}

impl AppState {
    pub fn new(client: NSEClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

// -----------------------------------------------
// HANDLERS
// -----------------------------------------------

/// Fetch and transform, once per request
async fn load_view_model(app_state: &AppState) -> ViewModel {
    let start_time = Instant::now();

    let chain = app_state.client.fetch_option_chain().await;
    let view = processor::build_view_model(chain.as_ref());

    info!(
        rows = view.rows.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Built option chain view"
    );

    view
}

/// GET / - Full dashboard page
async fn index(State(app_state): State<AppState>) -> Html<String> {
    let view = load_view_model(&app_state).await;
    Html(html::render_page(&view))
}

/// GET /data - Table fragment for partial refresh
async fn data_fragment(State(app_state): State<AppState>) -> Html<String> {
    let view = load_view_model(&app_state).await;
    Html(html::render_table(&view))
}

/// GET /api/option-chain - The view model as JSON
async fn option_chain_json(State(app_state): State<AppState>) -> Json<ApiResponse<ViewModel>> {
    let start_time = Instant::now();
    let view = load_view_model(&app_state).await;

    let error = view
        .is_empty()
        .then(|| "No option chain data available".to_string());

    Json(ApiResponse {
        success: error.is_none(),
        data: Some(view),
        error,
        processing_time_ms: Some(start_time.elapsed().as_millis() as u64),
    })
}

// -----------------------------------------------
// SERVER SETUP
// -----------------------------------------------

pub fn router(app_state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/data", get(data_fragment))
        .route("/api/option-chain", get(option_chain_json))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

pub async fn start_server(app_config: &AppConfig, client: NSEClient) -> Result<()> {
    let app = router(AppState::new(client), &app_config.static_dir);

    let addr = format!("127.0.0.1:{}", app_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!(
        "{} Server is running on {}",
        "🚀".green(),
        format!("http://localhost:{}", app_config.port).cyan()
    );
    println!("{}", "📋 Available endpoints:".cyan());
    println!("   GET  /");
    println!("   GET  /data");
    println!("   GET  /api/option-chain");
    println!();
    info!(%addr, static_dir = %app_config.static_dir.display(), "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
