//! Project aggregate and its transitions
//!
//! A [`Project`] is only ever changed by applying a [`ProjectEvent`].
//! `apply` is a pure function: it consumes the current value and returns
//! the next one, ignoring events that are not valid in the current status.

use crate::gateway::{EncodedImage, Listing, ScenePrompt};
use serde::{Deserialize, Serialize};

/// Progress after a run starts
pub const PROGRESS_ANALYZING: u8 = 10;
/// Progress once listing and concepts are in
pub const PROGRESS_BRAINSTORMING: u8 = 40;
/// Progress once a concept is selected
pub const PROGRESS_STORYBOARDING: u8 = 50;
/// Progress once the storyboard is in
pub const PROGRESS_RENDERING: u8 = 70;
/// Progress after the first scene resolves
pub const PROGRESS_FIRST_SCENE: u8 = 80;
/// Progress added per further scene
pub const PROGRESS_PER_SCENE: u8 = 4;
/// Progress of a finished run
pub const PROGRESS_COMPLETE: u8 = 100;

/// Automation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutomationStatus {
    /// No run in flight
    #[default]
    Idle,
    /// Listing generation and brainstorming in flight
    Analyzing,
    /// Reserved; never entered
    Drafting,
    /// Concept selection
    Brainstorming,
    /// Storyboard generation in flight
    Storyboarding,
    /// Scene images rendering
    Rendering,
    /// Run finished
    Complete,
}

impl AutomationStatus {
    /// Whether an automation run currently owns the project
    pub fn is_running(self) -> bool {
        !matches!(self, AutomationStatus::Idle | AutomationStatus::Complete)
    }
}

/// One storyboard scene with its rendered frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub scene_number: u32,
    pub start_frame_prompt: String,
    pub end_frame_prompt: String,
    pub video_motion_prompt: String,
    pub start_image: Option<EncodedImage>,
    pub end_image: Option<EncodedImage>,
    pub is_generating: bool,
}

impl From<ScenePrompt> for Scene {
    fn from(prompt: ScenePrompt) -> Self {
        Self {
            scene_number: prompt.scene_number,
            start_frame_prompt: prompt.start_frame_prompt,
            end_frame_prompt: prompt.end_frame_prompt,
            video_motion_prompt: prompt.video_motion_prompt,
            start_image: None,
            end_image: None,
            is_generating: false,
        }
    }
}

impl Scene {
    /// Both frames are present
    pub fn is_rendered(&self) -> bool {
        self.start_image.is_some() && self.end_image.is_some()
    }
}

/// The single project a studio session works on
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub product_name: String,
    pub listing: Option<Listing>,
    pub marketing_concepts: Vec<String>,
    pub selected_concept: Option<String>,
    /// Concept supplied up front; skips brainstorming when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preselected_concept: Option<String>,
    pub storyboard: Vec<Scene>,
    pub status: AutomationStatus,
    pub progress: u8,
}

/// Everything that can happen to a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectEvent {
    /// Product (and optional concept) chosen upstream
    ProductSet {
        product_name: String,
        preselected_concept: Option<String>,
    },
    /// run() accepted
    RunStarted,
    /// Listing and concepts both resolved
    DraftReady {
        listing: Listing,
        concepts: Vec<String>,
    },
    /// A concept was chosen for the storyboard
    ConceptSelected(String),
    /// Storyboard prompts resolved
    StoryboardReady(Vec<ScenePrompt>),
    /// Rendering of a scene's frame pair began
    SceneRenderStarted(usize),
    /// Both frames of a scene resolved
    SceneRendered {
        index: usize,
        start_image: EncodedImage,
        end_image: EncodedImage,
    },
    /// A scene's frames could not be rendered
    SceneRenderFailed(usize),
    /// Every scene has been attempted
    RunCompleted,
    /// A fatal gateway error abandoned the run
    RunFailed,
    /// Back to an empty IDLE project for the same product
    Reset,
}

impl Project {
    /// Empty project for `product_name`
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            ..Default::default()
        }
    }

    /// Whether a scene is currently rendering
    pub fn has_generating_scene(&self) -> bool {
        self.storyboard.iter().any(|s| s.is_generating)
    }

    /// Progress reached once scene `index` resolves
    pub fn scene_progress(index: usize) -> u8 {
        let step = (index as u32).saturating_mul(PROGRESS_PER_SCENE as u32);
        (PROGRESS_FIRST_SCENE as u32 + step).min(PROGRESS_COMPLETE as u32 - 1) as u8
    }

    fn clear_generated(&mut self) {
        self.listing = None;
        self.marketing_concepts.clear();
        self.selected_concept = None;
        self.storyboard.clear();
    }

    /// Apply `event`, returning the next project
    pub fn apply(mut self, event: ProjectEvent) -> Self {
        use AutomationStatus::*;

        match event {
            ProjectEvent::ProductSet {
                product_name,
                preselected_concept,
            } => {
                if self.status == Idle {
                    self.product_name = product_name;
                    self.preselected_concept = preselected_concept;
                    self.clear_generated();
                    self.progress = 0;
                }
            }
            ProjectEvent::RunStarted => {
                if self.status == Idle && !self.product_name.trim().is_empty() {
                    self.clear_generated();
                    self.selected_concept = self.preselected_concept.clone();
                    self.status = Analyzing;
                    self.progress = PROGRESS_ANALYZING;
                }
            }
            ProjectEvent::DraftReady { listing, concepts } => {
                if self.status == Analyzing {
                    self.listing = Some(listing);
                    self.marketing_concepts = concepts;
                    self.status = Brainstorming;
                    self.progress = self.progress.max(PROGRESS_BRAINSTORMING);
                }
            }
            ProjectEvent::ConceptSelected(concept) => {
                if self.status == Brainstorming {
                    self.selected_concept = Some(concept);
                    self.status = Storyboarding;
                    self.progress = self.progress.max(PROGRESS_STORYBOARDING);
                }
            }
            ProjectEvent::StoryboardReady(prompts) => {
                if self.status == Storyboarding {
                    self.storyboard = prompts.into_iter().map(Scene::from).collect();
                    self.status = Rendering;
                    self.progress = self.progress.max(PROGRESS_RENDERING);
                }
            }
            ProjectEvent::SceneRenderStarted(index) => {
                if let Some(scene) = self.storyboard.get_mut(index) {
                    scene.is_generating = true;
                }
            }
            ProjectEvent::SceneRendered {
                index,
                start_image,
                end_image,
            } => {
                if let Some(scene) = self.storyboard.get_mut(index) {
                    scene.start_image = Some(start_image);
                    scene.end_image = Some(end_image);
                    scene.is_generating = false;
                    self.advance_scene_progress(index);
                }
            }
            ProjectEvent::SceneRenderFailed(index) => {
                if let Some(scene) = self.storyboard.get_mut(index) {
                    scene.is_generating = false;
                    self.advance_scene_progress(index);
                }
            }
            ProjectEvent::RunCompleted => {
                if self.status == Rendering {
                    self.status = Complete;
                    self.progress = PROGRESS_COMPLETE;
                }
            }
            ProjectEvent::RunFailed => {
                if self.status != Idle {
                    // Stages before rendering never leave a partial storyboard behind.
                    if self.status != Rendering {
                        self.storyboard.clear();
                    }
                    for scene in &mut self.storyboard {
                        scene.is_generating = false;
                    }
                    self.status = Idle;
                    self.progress = 0;
                }
            }
            ProjectEvent::Reset => {
                self.clear_generated();
                self.status = Idle;
                self.progress = 0;
            }
        }
        self
    }

    // Regeneration outside a run leaves progress untouched.
    fn advance_scene_progress(&mut self, index: usize) {
        if self.status == AutomationStatus::Rendering {
            self.progress = self.progress.max(Self::scene_progress(index));
        }
    }
}
