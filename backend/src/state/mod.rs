// State management module
// Handles application state: studio orchestrator and channel registry

pub mod app_state;

pub use app_state::{AppState, Channel, ChannelId};
