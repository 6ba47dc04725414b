//! Standalone generator tools
//!
//! Direct access to the AI gateway operations, outside the automation run.

use crate::error::AppError;
use crate::gateway::{AiGateway, EncodedImage, Listing, ListingRequest, ScenePrompt};
use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Analyze image request
#[derive(Debug, Deserialize)]
pub struct AnalyzeImageRequest {
    /// Image as a `data:<mime>;base64,<data>` URL
    pub image: EncodedImage,
}

/// Analyze image response
#[derive(Debug, Serialize)]
pub struct AnalyzeImageResponse {
    /// Free-text visual description
    pub analysis: String,
}

/// Listing generator request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateListingRequest {
    /// Listing input
    #[serde(flatten)]
    pub listing: ListingRequest,
    /// Earlier image analysis to fold into the context
    #[serde(default)]
    pub image_analysis: Option<String>,
}

/// Concepts request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptsRequest {
    /// Product to brainstorm for
    pub product_name: String,
}

/// Concepts response
#[derive(Debug, Serialize)]
pub struct ConceptsResponse {
    /// Exactly three concepts
    pub concepts: Vec<String>,
}

/// Storyboard request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardRequest {
    /// Product featured in the ad
    pub product_name: String,
    /// Concept to storyboard
    pub concept: String,
}

/// Storyboard response
#[derive(Debug, Serialize)]
pub struct StoryboardResponse {
    /// Exactly five scenes
    pub scenes: Vec<ScenePrompt>,
}

/// Scene image request
#[derive(Debug, Deserialize)]
pub struct SceneImageRequest {
    /// Full frame prompt, style directives included
    pub prompt: String,
}

/// Scene image response
#[derive(Debug, Serialize)]
pub struct SceneImageResponse {
    /// Rendered frame as a data URL
    pub image: EncodedImage,
}

/// Append an image analysis to listing context
pub fn merge_visual_analysis(context: &str, analysis: &str) -> String {
    if context.is_empty() {
        format!("Visual Analysis: {}", analysis)
    } else {
        format!("{}\n\nVisual Analysis: {}", context, analysis)
    }
}

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidRequest(format!("{} cannot be empty", field)));
    }
    Ok(())
}

async fn gateway(state: &Arc<RwLock<AppState>>) -> Arc<dyn AiGateway> {
    state.read().await.studio.gateway()
}

/// POST /api/tools/analyze-image - Describe a product photo
pub async fn analyze_image(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<AnalyzeImageRequest>,
) -> Result<Json<AnalyzeImageResponse>, AppError> {
    let analysis = gateway(&state).await.analyze_image(&request.image).await?;
    Ok(Json(AnalyzeImageResponse { analysis }))
}

/// POST /api/tools/listing - Generate a listing
pub async fn generate_listing(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<GenerateListingRequest>,
) -> Result<Json<Listing>, AppError> {
    let mut listing_request = request.listing;
    require(&listing_request.product_name, "productName")?;

    if let Some(analysis) = request.image_analysis.filter(|a| !a.trim().is_empty()) {
        listing_request.context = merge_visual_analysis(&listing_request.context, &analysis);
    }

    let listing = gateway(&state)
        .await
        .generate_listing(&listing_request)
        .await?;
    Ok(Json(listing))
}

/// POST /api/tools/concepts - Brainstorm three ad concepts
pub async fn generate_concepts(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<ConceptsRequest>,
) -> Result<Json<ConceptsResponse>, AppError> {
    require(&request.product_name, "productName")?;
    let concepts = gateway(&state)
        .await
        .generate_marketing_concepts(&request.product_name)
        .await;
    Ok(Json(ConceptsResponse { concepts }))
}

/// POST /api/tools/storyboard - Storyboard a concept
pub async fn generate_storyboard(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<StoryboardRequest>,
) -> Result<Json<StoryboardResponse>, AppError> {
    require(&request.product_name, "productName")?;
    require(&request.concept, "concept")?;
    let scenes = gateway(&state)
        .await
        .generate_storyboard(&request.product_name, &request.concept)
        .await?;
    Ok(Json(StoryboardResponse { scenes }))
}

/// POST /api/tools/scene-image - Render one frame outside the project
pub async fn generate_scene_image(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<SceneImageRequest>,
) -> Result<Json<SceneImageResponse>, AppError> {
    require(&request.prompt, "prompt")?;
    let image = gateway(&state)
        .await
        .generate_scene_image(&request.prompt)
        .await?;
    Ok(Json(SceneImageResponse { image }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::test_support::ScriptedGateway;
    use crate::gateway::GatewayError;
    use crate::studio::{AutomationOrchestrator, Project};

    fn state_with(gateway: ScriptedGateway) -> Arc<RwLock<AppState>> {
        let studio = AutomationOrchestrator::new(Arc::new(gateway), Project::default());
        Arc::new(RwLock::new(AppState::new(Arc::new(studio))))
    }

    #[test]
    fn test_merge_visual_analysis() {
        assert_eq!(
            merge_visual_analysis("", "matte black"),
            "Visual Analysis: matte black"
        );
        assert_eq!(
            merge_visual_analysis("For campers", "matte black"),
            "For campers\n\nVisual Analysis: matte black"
        );
    }

    #[test]
    fn test_listing_request_deserializes_flattened() {
        let request: GenerateListingRequest = serde_json::from_value(serde_json::json!({
            "productName": "Solar Lantern",
            "imageAnalysis": "matte black"
        }))
        .unwrap();
        assert_eq!(request.listing.product_name, "Solar Lantern");
        assert_eq!(request.listing.tone, crate::gateway::DEFAULT_TONE);
        assert_eq!(request.image_analysis.as_deref(), Some("matte black"));
    }

    #[tokio::test]
    async fn test_analyze_image() {
        let state = state_with(ScriptedGateway::default());
        let request = AnalyzeImageRequest {
            image: EncodedImage::new("image/jpeg", "abc"),
        };
        let response = analyze_image(State(state), Json(request)).await.unwrap();
        assert_eq!(response.analysis, "A image/jpeg product photo");
    }

    #[tokio::test]
    async fn test_generate_concepts_returns_three() {
        let state = state_with(ScriptedGateway::default());
        let request = ConceptsRequest {
            product_name: "Solar Lantern".to_string(),
        };
        let response = generate_concepts(State(state), Json(request)).await.unwrap();
        assert_eq!(response.concepts.len(), 3);
    }

    #[tokio::test]
    async fn test_generate_storyboard_surfaces_gateway_error() {
        let state = state_with(ScriptedGateway {
            storyboard: Err(GatewayError::Storyboard("malformed".to_string())),
            ..Default::default()
        });
        let request = StoryboardRequest {
            product_name: "Solar Lantern".to_string(),
            concept: "Guerrilla".to_string(),
        };
        let result = generate_storyboard(State(state), Json(request)).await;
        assert!(matches!(
            result,
            Err(AppError::Gateway(GatewayError::Storyboard(_)))
        ));
    }

    #[tokio::test]
    async fn test_generate_listing_requires_product() {
        let state = state_with(ScriptedGateway::default());
        let request = GenerateListingRequest {
            listing: ListingRequest::default(),
            image_analysis: None,
        };
        let result = generate_listing(State(state), Json(request)).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_generate_scene_image() {
        let state = state_with(ScriptedGateway::default());
        let request = SceneImageRequest {
            prompt: "Iceberg at dawn, photorealistic".to_string(),
        };
        let response = generate_scene_image(State(state), Json(request)).await.unwrap();
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["image"], "data:image/png;base64,iVBOR");
    }

    #[tokio::test]
    async fn test_generate_scene_image_failure_is_bad_gateway() {
        let state = state_with(ScriptedGateway {
            failing_images: vec!["Iceberg".to_string()],
            ..Default::default()
        });
        let request = SceneImageRequest {
            prompt: "Iceberg at dawn".to_string(),
        };
        let err = generate_scene_image(State(state), Json(request))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Gateway(GatewayError::Image(_))));

        let response = axum::response::IntoResponse::into_response(err);
        assert_eq!(response.status(), axum::http::StatusCode::BAD_GATEWAY);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["kind"], "image");
    }

    #[tokio::test]
    async fn test_generate_scene_image_requires_prompt() {
        let state = state_with(ScriptedGateway::default());
        let request = SceneImageRequest {
            prompt: "  ".to_string(),
        };
        let result = generate_scene_image(State(state), Json(request)).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }
}
