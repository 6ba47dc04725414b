// Application state management
// Contains the studio orchestrator and the marketplace channel registry

use crate::studio::AutomationOrchestrator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a marketplace channel
pub type ChannelId = String;

/// Marketplace channel
/// A local entry describing where listings would be published; never synced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Unique identifier for the channel
    pub id: ChannelId,
    /// Display name (e.g. "Main Shopify Store")
    pub name: String,
    /// Marketplace platform (e.g. "Amazon", "eBay")
    pub platform: String,
    /// Whether the channel is connected
    pub connected: bool,
    /// When the channel last synced
    pub last_sync: DateTime<Utc>,
}

impl Channel {
    /// Create a connected channel that synced just now
    pub fn new(id: ChannelId, name: String, platform: String) -> Self {
        Self {
            id,
            name,
            platform,
            connected: true,
            last_sync: Utc::now(),
        }
    }

    /// Generate a new unique ID for a channel
    /// Uses UUID v4 for uniqueness
    pub fn generate_id() -> ChannelId {
        Uuid::new_v4().to_string()
    }

    /// Validate the channel
    /// Returns Ok(()) if valid, Err with message if invalid
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Channel name cannot be empty".to_string());
        }
        if self.platform.trim().is_empty() {
            return Err("Channel platform cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Main application state
/// Shared by all HTTP handlers behind `Arc<RwLock<_>>`
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator owning the studio project
    pub studio: Arc<AutomationOrchestrator>,
    /// Registry of marketplace channels (id -> Channel)
    pub channels: HashMap<ChannelId, Channel>,
}

impl AppState {
    /// Create application state with the default channels
    pub fn new(studio: Arc<AutomationOrchestrator>) -> Self {
        let mut state = Self {
            studio,
            channels: HashMap::new(),
        };
        state.add_channel(Channel::new(
            "1".to_string(),
            "Amazon North America".to_string(),
            "Amazon".to_string(),
        ));
        state.add_channel(Channel::new(
            "2".to_string(),
            "Main Shopify Store".to_string(),
            "Shopify".to_string(),
        ));
        state
    }

    /// Add a channel to the registry
    /// Returns true if the channel was added (false if ID already exists)
    pub fn add_channel(&mut self, channel: Channel) -> bool {
        if self.channels.contains_key(&channel.id) {
            false
        } else {
            self.channels.insert(channel.id.clone(), channel);
            true
        }
    }

    /// Remove a channel from the registry
    /// Returns the removed channel if it existed
    pub fn remove_channel(&mut self, id: &ChannelId) -> Option<Channel> {
        self.channels.remove(id)
    }

    /// Get all channels as a vector, sorted by name
    pub fn channels_list(&self) -> Vec<&Channel> {
        let mut channels: Vec<&Channel> = self.channels.values().collect();
        channels.sort_by(|a, b| a.name.cmp(&b.name));
        channels
    }

    /// Get the number of channels in the registry
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
