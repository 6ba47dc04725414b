//! Studio command errors

use thiserror::Error;

/// Errors returned by orchestrator commands other than `run`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudioError {
    /// An automation run (or a scene render) currently owns the project
    #[error("An automation run is in progress")]
    RunInProgress,

    /// The project holds a finished run
    #[error("Project is complete; reset it before choosing a new product")]
    NotIdle,

    /// The product name is empty
    #[error("Product name cannot be empty")]
    EmptyProductName,

    /// No scene at this storyboard index
    #[error("Scene not found: {0}")]
    SceneNotFound(usize),

    /// The scene is already rendering
    #[error("Scene {0} is already rendering")]
    SceneBusy(usize),
}
