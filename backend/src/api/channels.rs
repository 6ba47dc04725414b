//! Marketplace channel API handlers
//!
//! Contains HTTP request handlers for channel CRUD operations.

use crate::error::AppError;
use crate::state::{AppState, Channel, ChannelId};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Channels list response
#[derive(Serialize)]
pub struct ChannelsListResponse {
    /// All channels, sorted by name
    pub channels: Vec<Channel>,
    /// Total number of channels
    pub count: usize,
}

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
    /// Status indicator (e.g., "ok", "error")
    pub status: String,
}

/// Create channel request
#[derive(Deserialize)]
pub struct CreateChannelRequest {
    /// Display name for the new channel
    pub name: String,
    /// Marketplace platform
    pub platform: String,
}

/// GET /api/channels - List all channels
pub async fn list_channels(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<Json<ChannelsListResponse>, AppError> {
    let state = state.read().await;
    let channels: Vec<Channel> = state.channels_list().into_iter().cloned().collect();

    Ok(Json(ChannelsListResponse {
        count: channels.len(),
        channels,
    }))
}

/// POST /api/channels - Register a channel
pub async fn create_channel(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<CreateChannelRequest>,
) -> Result<(StatusCode, Json<Channel>), AppError> {
    let channel = Channel::new(
        Channel::generate_id(),
        request.name.trim().to_string(),
        request.platform.trim().to_string(),
    );
    channel.validate().map_err(AppError::InvalidRequest)?;

    let mut state = state.write().await;
    if !state.add_channel(channel.clone()) {
        return Err(AppError::Internal(anyhow::anyhow!(
            "Failed to add channel (ID already exists)"
        )));
    }

    tracing::info!(channel_id = %channel.id, platform = %channel.platform, "Channel added");
    Ok((StatusCode::CREATED, Json(channel)))
}

/// DELETE /api/channels/:id - Remove a channel
pub async fn delete_channel(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(id): Path<ChannelId>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut state = state.write().await;
    state
        .remove_channel(&id)
        .ok_or_else(|| AppError::ChannelNotFound(id))?;

    Ok(Json(MessageResponse {
        message: "Channel deleted successfully".to_string(),
        status: "ok".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::test_support::ScriptedGateway;
    use crate::studio::{AutomationOrchestrator, Project};

    fn create_test_state() -> Arc<RwLock<AppState>> {
        let studio = AutomationOrchestrator::new(
            Arc::new(ScriptedGateway::default()),
            Project::default(),
        );
        Arc::new(RwLock::new(AppState::new(Arc::new(studio))))
    }

    #[tokio::test]
    async fn test_list_channels_seeded() {
        let state = create_test_state();
        let response = list_channels(State(state)).await.unwrap();
        assert_eq!(response.count, 2);
        assert_eq!(response.channels[0].platform, "Amazon");
    }

    #[tokio::test]
    async fn test_create_channel() {
        let state = create_test_state();
        let request = CreateChannelRequest {
            name: "Vintage Finds".to_string(),
            platform: "Etsy".to_string(),
        };

        let (status, response) = create_channel(State(state.clone()), Json(request))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.name, "Vintage Finds");
        assert!(response.connected);

        let list_response = list_channels(State(state)).await.unwrap();
        assert_eq!(list_response.count, 3);
    }

    #[tokio::test]
    async fn test_create_channel_rejects_blank_platform() {
        let state = create_test_state();
        let request = CreateChannelRequest {
            name: "Somewhere".to_string(),
            platform: " ".to_string(),
        };
        let result = create_channel(State(state), Json(request)).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_channel_not_found() {
        let state = create_test_state();
        let result = delete_channel(State(state.clone()), Path("nonexistent".to_string())).await;
        match result.unwrap_err() {
            AppError::ChannelNotFound(id) => assert_eq!(id, "nonexistent"),
            other => panic!("Expected ChannelNotFound error, got: {:?}", other),
        }

        assert!(delete_channel(State(state), Path("1".to_string())).await.is_ok());
    }
}
