//! API module
//!
//! Contains HTTP request handlers for the studio, channel and tool endpoints

pub mod channels;
pub mod project;
pub mod streaming;
pub mod tools;
