//! Automation orchestrator
//!
//! Drives a project through the automation pipeline:
//!
//! 1. ANALYZING: listing generation and concept brainstorming, joined
//! 2. BRAINSTORMING: concept auto-selection
//! 3. STORYBOARDING: storyboard generation
//! 4. RENDERING: scene frames, scenes in order, each scene's pair joined
//!
//! Listing, concept and storyboard failures abort the run and reset the
//! project to IDLE. Scene image failures are logged and skipped.
//!
//! The orchestrator is the only writer of its [`Project`]. Every change goes
//! through [`Project::apply`] under the write lock and the resulting snapshot
//! is broadcast to subscribers.

use crate::gateway::{AiGateway, GatewayError, ListingRequest};
use crate::studio::error::StudioError;
use crate::studio::project::{AutomationStatus, Project, ProjectEvent};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock, RwLockWriteGuard};

/// Tone used for listings produced by the pipeline
pub const PIPELINE_TONE: &str = "Persuasive";

/// Context used for listings produced by the pipeline
pub const PIPELINE_CONTEXT: &str = "Focus on viral features";

/// Style directives appended to every scene frame prompt
pub const RENDER_SUFFIX: &str = " cinematic lighting, photorealistic, 4k, aspect ratio 16:9";

const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Update published to subscribers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StudioUpdate {
    /// Project after a change
    Snapshot {
        /// The new project state
        project: Project,
    },
    /// A run was abandoned
    AutomationInterrupted {
        /// Failing capability, see [`GatewayError::kind`]
        kind: String,
    },
}

/// Result of a `run` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The project was not IDLE (or had no product name); nothing happened
    Ignored,
    /// The run reached COMPLETE
    Completed,
    /// A fatal gateway error reset the project to IDLE
    Interrupted(GatewayError),
}

/// Result of regenerating one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneRender {
    /// Both frames were replaced
    Rendered,
    /// Rendering failed; previous frames are kept
    Failed,
}

/// Pick the concept to storyboard
///
/// The first concept mentioning "guerrilla" (any case) wins, otherwise the
/// first concept.
pub fn select_concept(concepts: &[String]) -> Option<String> {
    concepts
        .iter()
        .find(|c| c.to_lowercase().contains("guerrilla"))
        .or_else(|| concepts.first())
        .cloned()
}

/// Frame prompt with the render directives appended
pub fn render_prompt(frame_prompt: &str) -> String {
    format!("{}{}", frame_prompt, RENDER_SUFFIX)
}

/// Owns the project and sequences gateway calls over it
pub struct AutomationOrchestrator {
    gateway: Arc<dyn AiGateway>,
    project: RwLock<Project>,
    updates: broadcast::Sender<StudioUpdate>,
}

impl AutomationOrchestrator {
    /// Create an orchestrator over `project`
    pub fn new(gateway: Arc<dyn AiGateway>, project: Project) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            gateway,
            project: RwLock::new(project),
            updates,
        }
    }

    /// The gateway this orchestrator calls
    pub fn gateway(&self) -> Arc<dyn AiGateway> {
        Arc::clone(&self.gateway)
    }

    /// Read-only copy of the project
    pub async fn snapshot(&self) -> Project {
        self.project.read().await.clone()
    }

    /// Subscribe to snapshots and interruption signals
    pub fn subscribe(&self) -> broadcast::Receiver<StudioUpdate> {
        self.updates.subscribe()
    }

    fn publish(&self, update: StudioUpdate) {
        // No subscribers is fine.
        let _ = self.updates.send(update);
    }

    fn commit(&self, mut guard: RwLockWriteGuard<'_, Project>, event: ProjectEvent) -> Project {
        let next = guard.clone().apply(event);
        *guard = next.clone();
        drop(guard);
        self.publish(StudioUpdate::Snapshot {
            project: next.clone(),
        });
        next
    }

    async fn transition(&self, event: ProjectEvent) -> Project {
        let guard = self.project.write().await;
        self.commit(guard, event)
    }

    /// Choose the product (and optionally a concept that skips brainstorming)
    pub async fn set_product(
        &self,
        product_name: &str,
        preselected_concept: Option<String>,
    ) -> Result<Project, StudioError> {
        let product_name = product_name.trim();
        if product_name.is_empty() {
            return Err(StudioError::EmptyProductName);
        }
        let guard = self.project.write().await;
        if guard.status.is_running() || guard.has_generating_scene() {
            return Err(StudioError::RunInProgress);
        }
        if guard.status != AutomationStatus::Idle {
            return Err(StudioError::NotIdle);
        }
        let preselected_concept = preselected_concept
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(self.commit(
            guard,
            ProjectEvent::ProductSet {
                product_name: product_name.to_string(),
                preselected_concept,
            },
        ))
    }

    /// Return to an empty IDLE project, keeping the product
    pub async fn reset(&self) -> Result<Project, StudioError> {
        let guard = self.project.write().await;
        if guard.status.is_running() || guard.has_generating_scene() {
            return Err(StudioError::RunInProgress);
        }
        Ok(self.commit(guard, ProjectEvent::Reset))
    }

    /// Run the automation pipeline to completion or first fatal error
    ///
    /// A no-op unless the project is IDLE with a product name. There is no
    /// cancellation and no timeout beyond the gateway's own.
    pub async fn run(&self) -> RunOutcome {
        let started = {
            let guard = self.project.write().await;
            if guard.status != AutomationStatus::Idle
                || guard.product_name.trim().is_empty()
                || guard.has_generating_scene()
            {
                tracing::debug!(status = ?guard.status, "Ignoring run request");
                return RunOutcome::Ignored;
            }
            self.commit(guard, ProjectEvent::RunStarted)
        };

        tracing::info!(product = %started.product_name, "Automation run started");

        match self
            .run_pipeline(&started.product_name, started.selected_concept.clone())
            .await
        {
            Ok(()) => {
                self.transition(ProjectEvent::RunCompleted).await;
                tracing::info!(product = %started.product_name, "Automation run complete");
                RunOutcome::Completed
            }
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "Automation failed");
                self.transition(ProjectEvent::RunFailed).await;
                self.publish(StudioUpdate::AutomationInterrupted {
                    kind: e.kind().to_string(),
                });
                RunOutcome::Interrupted(e)
            }
        }
    }

    async fn run_pipeline(
        &self,
        product_name: &str,
        preselected_concept: Option<String>,
    ) -> Result<(), GatewayError> {
        let listing_request = ListingRequest {
            product_name: product_name.to_string(),
            tone: PIPELINE_TONE.to_string(),
            context: PIPELINE_CONTEXT.to_string(),
            image: None,
        };

        let (listing, concepts) = match preselected_concept.clone() {
            Some(concept) => {
                let listing = self.gateway.generate_listing(&listing_request).await?;
                (listing, vec![concept])
            }
            None => {
                let concepts = async {
                    Ok::<_, GatewayError>(
                        self.gateway.generate_marketing_concepts(product_name).await,
                    )
                };
                tokio::try_join!(self.gateway.generate_listing(&listing_request), concepts)?
            }
        };

        let project = self
            .transition(ProjectEvent::DraftReady { listing, concepts })
            .await;

        let concept = match preselected_concept {
            Some(concept) => concept,
            None => select_concept(&project.marketing_concepts).ok_or_else(|| {
                GatewayError::Storyboard("no marketing concept to storyboard".to_string())
            })?,
        };
        tracing::info!(concept = %concept, "Concept selected");
        self.transition(ProjectEvent::ConceptSelected(concept.clone()))
            .await;

        let scenes = self
            .gateway
            .generate_storyboard(product_name, &concept)
            .await?;
        let project = self.transition(ProjectEvent::StoryboardReady(scenes)).await;

        for index in 0..project.storyboard.len() {
            if let Err(e) = self.render_scene(index).await {
                tracing::warn!(scene = index + 1, error = %e, "Scene render failed, continuing");
            }
        }

        Ok(())
    }

    async fn render_scene(&self, index: usize) -> Result<(), GatewayError> {
        let project = self.transition(ProjectEvent::SceneRenderStarted(index)).await;
        self.render_frames(&project, index).await
    }

    // Renders both frames of an already claimed scene concurrently and
    // records the outcome. On failure the scene keeps its previous frames.
    async fn render_frames(&self, project: &Project, index: usize) -> Result<(), GatewayError> {
        let Some(scene) = project.storyboard.get(index) else {
            return Ok(());
        };
        let start_prompt = render_prompt(&scene.start_frame_prompt);
        let end_prompt = render_prompt(&scene.end_frame_prompt);

        let (start, end) = tokio::join!(
            self.gateway.generate_scene_image(&start_prompt),
            self.gateway.generate_scene_image(&end_prompt)
        );

        match (start, end) {
            (Ok(start_image), Ok(end_image)) => {
                self.transition(ProjectEvent::SceneRendered {
                    index,
                    start_image,
                    end_image,
                })
                .await;
                tracing::debug!(scene = index + 1, "Scene rendered");
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => {
                self.transition(ProjectEvent::SceneRenderFailed(index)).await;
                Err(e)
            }
        }
    }

    /// Re-render one scene's frames without touching status or progress
    ///
    /// Only allowed while no run is in flight.
    pub async fn regenerate_scene(&self, index: usize) -> Result<SceneRender, StudioError> {
        let claimed = {
            let guard = self.project.write().await;
            if guard.status.is_running() {
                return Err(StudioError::RunInProgress);
            }
            match guard.storyboard.get(index) {
                None => return Err(StudioError::SceneNotFound(index)),
                Some(scene) if scene.is_generating => return Err(StudioError::SceneBusy(index)),
                Some(_) => {}
            }
            self.commit(guard, ProjectEvent::SceneRenderStarted(index))
        };

        match self.render_frames(&claimed, index).await {
            Ok(()) => Ok(SceneRender::Rendered),
            Err(e) => {
                tracing::warn!(scene = index + 1, error = %e, "Scene regeneration failed");
                Ok(SceneRender::Failed)
            }
        }
    }
}
