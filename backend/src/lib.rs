//! Listing Studio Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
/// Application state management
///
/// Holds the studio orchestrator and the marketplace channel registry.
pub mod state;
pub mod studio;
pub mod websocket;
