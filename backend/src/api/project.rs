//! Studio project API handlers
//!
//! Thin wrappers over the [`AutomationOrchestrator`]: every command is
//! forwarded and the resulting project snapshot returned.

use crate::api::streaming::{run_stream, sse_response};
use crate::error::AppError;
use crate::state::AppState;
use crate::studio::clipboard::to_clipboard_text;
use crate::studio::{AutomationOrchestrator, Project, Scene, SceneRender, StudioError};
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Update project request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    /// Product to automate
    pub product_name: String,
    /// Concept to storyboard; skips brainstorming when present
    #[serde(default)]
    pub selected_concept: Option<String>,
}

/// Regenerate scene response
#[derive(Debug, Serialize)]
pub struct RegenerateSceneResponse {
    /// Whether both frames were replaced
    pub result: SceneRender,
    /// The scene after regeneration
    pub scene: Scene,
}

async fn studio(state: &Arc<RwLock<AppState>>) -> Arc<AutomationOrchestrator> {
    Arc::clone(&state.read().await.studio)
}

/// GET /api/project - Current project snapshot
pub async fn get_project(State(state): State<Arc<RwLock<AppState>>>) -> Json<Project> {
    Json(studio(&state).await.snapshot().await)
}

/// PUT /api/project - Choose the product (and optionally the concept)
pub async fn update_project(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let project = studio(&state)
        .await
        .set_product(&request.product_name, request.selected_concept)
        .await?;
    Ok(Json(project))
}

/// POST /api/project/run - Start automation and stream snapshots (SSE)
pub async fn run_project(State(state): State<Arc<RwLock<AppState>>>) -> Result<Response, AppError> {
    let studio = studio(&state).await;
    let updates = studio.subscribe();
    sse_response(run_stream(studio, updates))
}

/// POST /api/project/reset - Clear generated content
pub async fn reset_project(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<Json<Project>, AppError> {
    Ok(Json(studio(&state).await.reset().await?))
}

/// POST /api/project/scenes/:index/regenerate - Re-render one scene
pub async fn regenerate_scene(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(index): Path<usize>,
) -> Result<Json<RegenerateSceneResponse>, AppError> {
    let studio = studio(&state).await;
    let result = studio.regenerate_scene(index).await?;
    let scene = studio
        .snapshot()
        .await
        .storyboard
        .get(index)
        .cloned()
        .ok_or(StudioError::SceneNotFound(index))?;

    Ok(Json(RegenerateSceneResponse { result, scene }))
}

/// GET /api/project/listing/clipboard - Listing as plain text
pub async fn listing_clipboard(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<Response, AppError> {
    let project = studio(&state).await.snapshot().await;
    let listing = project.listing.ok_or(AppError::NoListing)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        to_clipboard_text(&listing),
    )
        .into_response())
}
