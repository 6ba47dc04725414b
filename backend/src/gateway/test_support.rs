//! Minimal gateway for handler and state unit tests
//!
//! Integration tests under `tests/` carry a recording gateway of their own.

use super::*;

/// Gateway returning a fixed listing, the fallback concepts and a
/// five-scene storyboard
pub struct ScriptedGateway {
    pub storyboard: Result<Vec<ScenePrompt>, GatewayError>,
    /// Image prompts containing any of these fragments fail
    pub failing_images: Vec<String>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        let storyboard = (1..=STORYBOARD_SCENES as u32)
            .map(|n| ScenePrompt {
                scene_number: n,
                start_frame_prompt: format!("scene {} start", n),
                end_frame_prompt: format!("scene {} end", n),
                video_motion_prompt: format!("scene {} motion", n),
            })
            .collect();
        Self {
            storyboard: Ok(storyboard),
            failing_images: Vec::new(),
        }
    }
}

#[async_trait]
impl AiGateway for ScriptedGateway {
    async fn analyze_image(&self, image: &EncodedImage) -> Result<String, GatewayError> {
        Ok(format!("A {} product photo", image.mime_type))
    }

    async fn generate_listing(&self, _request: &ListingRequest) -> Result<Listing, GatewayError> {
        Ok(Listing {
            title: "Solar Lantern".to_string(),
            bullets: vec!["Bright".to_string(), "Waterproof".to_string()],
            description: "<p>Glows all night</p>".to_string(),
            keywords: vec!["solar".to_string(), "lantern".to_string()],
            suggested_price: "$20 - $30".to_string(),
        })
    }

    async fn generate_marketing_concepts(&self, _product_name: &str) -> Vec<String> {
        fallback_concepts()
    }

    async fn generate_storyboard(
        &self,
        _product_name: &str,
        _concept: &str,
    ) -> Result<Vec<ScenePrompt>, GatewayError> {
        self.storyboard.clone()
    }

    async fn generate_scene_image(&self, prompt: &str) -> Result<EncodedImage, GatewayError> {
        if self.failing_images.iter().any(|f| prompt.contains(f.as_str())) {
            return Err(GatewayError::Image("No image generated".to_string()));
        }
        Ok(EncodedImage::new("image/png", "iVBOR"))
    }
}
