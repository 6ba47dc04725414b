//! Listing Studio Backend
//!
//! A REST API and WebSocket server that turns a product name into a
//! marketplace listing, ad concepts, a storyboard and rendered scene frames.

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use listing_studio::api;
use listing_studio::config::Config;
use listing_studio::gateway::GeminiGateway;
use listing_studio::state::AppState;
use listing_studio::studio::{AutomationOrchestrator, Project, RunOutcome};
use listing_studio::websocket;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Serialize)]
struct HelloResponse {
    message: String,
    status: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    message: String,
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    if config.gateway.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; generation requests will fail");
    }

    // Initialize application state
    let gateway = GeminiGateway::new(&config.gateway)
        .map_err(|e| anyhow::anyhow!("Failed to create Gemini gateway: {}", e))?;
    let project = Project::new(config.initial_product.clone().unwrap_or_default());
    let studio = Arc::new(AutomationOrchestrator::new(Arc::new(gateway), project));
    let app_state = Arc::new(RwLock::new(AppState::new(Arc::clone(&studio))));

    // A pre-seeded product starts automating right away
    if let Some(product) = &config.initial_product {
        info!(product = %product, "Starting automation for configured product");
        tokio::spawn(async move {
            if let RunOutcome::Interrupted(e) = studio.run().await {
                tracing::warn!(kind = e.kind(), "Startup automation interrupted");
            }
        });
    }

    // Build our application with routes
    let app = Router::new()
        // Health check and hello world
        .route("/", get(hello_world))
        .route("/api/health", get(health_check))
        // Studio project
        .route(
            "/api/project",
            get(api::project::get_project).put(api::project::update_project),
        )
        .route("/api/project/run", post(api::project::run_project))
        .route("/api/project/reset", post(api::project::reset_project))
        .route(
            "/api/project/scenes/:index/regenerate",
            post(api::project::regenerate_scene),
        )
        .route(
            "/api/project/listing/clipboard",
            get(api::project::listing_clipboard),
        )
        // Marketplace channels
        .route(
            "/api/channels",
            get(api::channels::list_channels).post(api::channels::create_channel),
        )
        .route("/api/channels/:id", delete(api::channels::delete_channel))
        // Standalone generator tools
        .route("/api/tools/analyze-image", post(api::tools::analyze_image))
        .route("/api/tools/listing", post(api::tools::generate_listing))
        .route("/api/tools/concepts", post(api::tools::generate_concepts))
        .route("/api/tools/storyboard", post(api::tools::generate_storyboard))
        .route("/api/tools/scene-image", post(api::tools::generate_scene_image))
        // WebSocket for real-time updates
        .route("/ws", get(websocket::websocket_handler))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive()) // Allow CORS for development
        .with_state(app_state);

    // Bind to address from config
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    info!("Server running on http://{}", addr);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Setup graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from Listing Studio Backend!".to_string(),
        status: "ok".to_string(),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Backend is healthy".to_string(),
    })
}
