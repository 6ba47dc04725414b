//! Automation studio
//!
//! The project aggregate, its pure transitions, and the orchestrator that
//! drives it through the listing and storyboard pipeline.

pub mod clipboard;
pub mod error;
pub mod orchestrator;
pub mod project;

pub use error::StudioError;
pub use orchestrator::{AutomationOrchestrator, RunOutcome, SceneRender, StudioUpdate};
pub use project::{AutomationStatus, Project, ProjectEvent, Scene};
