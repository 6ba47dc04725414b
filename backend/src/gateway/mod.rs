//! AI gateway
//!
//! The single seam where unstructured model output is coerced into typed
//! domain records. Each operation is one request/response unit with no retry.
//! Callers never see partially parsed output: a response either validates
//! into the full record or surfaces as a [`GatewayError`].

pub mod api_client;
pub mod error;
pub mod gemini_types;
pub mod prompts;
pub mod schema;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use api_client::GeminiClient;
pub use error::{ClientError, GatewayError};
pub use types::{EncodedImage, Listing, ScenePrompt};

use crate::config::GatewayConfig;
use async_trait::async_trait;
use gemini_types::{GeminiApiRequest, RequestPart};
use serde::Deserialize;

/// Number of concepts a brainstorm yields
pub const CONCEPT_COUNT: usize = 3;

/// Number of scenes in a storyboard
pub const STORYBOARD_SCENES: usize = 5;

/// Input for listing generation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    /// Product the listing is written for
    pub product_name: String,
    /// Tone of voice, e.g. "Persuasive & Professional"
    #[serde(default = "default_tone")]
    pub tone: String,
    /// Free-text context
    #[serde(default)]
    pub context: String,
    /// Optional product image to ground the copy on
    #[serde(default)]
    pub image: Option<EncodedImage>,
}

/// Tone used when a caller does not pick one
pub const DEFAULT_TONE: &str = "Persuasive & Professional";

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

/// Operations offered by the generative model
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Describe a product image in free text
    async fn analyze_image(&self, image: &EncodedImage) -> Result<String, GatewayError>;

    /// Produce a complete listing
    async fn generate_listing(&self, request: &ListingRequest) -> Result<Listing, GatewayError>;

    /// Brainstorm exactly three ad concepts
    ///
    /// Never fails: any error yields [`prompts::FALLBACK_CONCEPTS`].
    async fn generate_marketing_concepts(&self, product_name: &str) -> Vec<String>;

    /// Produce exactly five scene prompt triples for `concept`
    async fn generate_storyboard(
        &self,
        product_name: &str,
        concept: &str,
    ) -> Result<Vec<ScenePrompt>, GatewayError>;

    /// Render one image from a prompt
    async fn generate_scene_image(&self, prompt: &str) -> Result<EncodedImage, GatewayError>;
}

/// The fallback concept triple as owned strings
pub fn fallback_concepts() -> Vec<String> {
    prompts::FALLBACK_CONCEPTS
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// Gateway backed by the Gemini REST API
#[derive(Clone)]
pub struct GeminiGateway {
    client: GeminiClient,
    text_model: String,
    image_model: String,
}

impl GeminiGateway {
    /// Build a gateway from configuration
    pub fn new(config: &GatewayConfig) -> Result<Self, ClientError> {
        Ok(Self::with_client(GeminiClient::new(config)?, config))
    }

    /// Build a gateway around an existing client
    pub fn with_client(client: GeminiClient, config: &GatewayConfig) -> Self {
        Self {
            client,
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        }
    }

    async fn text_call(&self, request: &GeminiApiRequest) -> Result<String, ClientError> {
        let response = self.client.generate_content(&self.text_model, request).await?;
        Ok(response.text())
    }
}

#[async_trait]
impl AiGateway for GeminiGateway {
    async fn analyze_image(&self, image: &EncodedImage) -> Result<String, GatewayError> {
        let request = GeminiApiRequest::from_parts(vec![
            RequestPart::inline(image.mime_type.clone(), image.data.clone()),
            RequestPart::text(prompts::IMAGE_ANALYSIS_PROMPT),
        ]);

        let text = self.text_call(&request).await.map_err(|e| {
            tracing::error!(error = %e, "Image analysis failed");
            GatewayError::Analysis(e.to_string())
        })?;

        let text = text.trim();
        if text.is_empty() {
            tracing::error!("Image analysis returned empty text");
            return Err(GatewayError::Analysis("model returned no text".to_string()));
        }
        Ok(text.to_string())
    }

    async fn generate_listing(&self, request: &ListingRequest) -> Result<Listing, GatewayError> {
        let prompt = prompts::listing_prompt(
            &request.product_name,
            &request.tone,
            &request.context,
            request.image.is_some(),
        );
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = &request.image {
            parts.push(RequestPart::inline(image.mime_type.clone(), image.data.clone()));
        }
        parts.push(RequestPart::text(prompt));

        let api_request = GeminiApiRequest::from_parts(parts)
            .with_system_instruction(prompts::COPYWRITER_INSTRUCTION)
            .with_json_schema(schema::listing_schema());

        let text = self.text_call(&api_request).await.map_err(|e| {
            tracing::error!(error = %e, product = %request.product_name, "Listing generation failed");
            GatewayError::Generation(e.to_string())
        })?;

        parse_listing(&text).map_err(|e| {
            tracing::error!(error = %e, product = %request.product_name, "Listing response rejected");
            GatewayError::Generation(e)
        })
    }

    async fn generate_marketing_concepts(&self, product_name: &str) -> Vec<String> {
        let request = GeminiApiRequest::from_text(prompts::concepts_prompt(product_name))
            .with_json_schema(schema::concepts_schema());

        let parsed = match self.text_call(&request).await {
            Ok(text) => parse_concepts(&text),
            Err(e) => Err(e.to_string()),
        };

        match parsed {
            Ok(concepts) => concepts,
            Err(e) => {
                tracing::warn!(error = %e, product = %product_name, "Concept generation failed, using fallback concepts");
                fallback_concepts()
            }
        }
    }

    async fn generate_storyboard(
        &self,
        product_name: &str,
        concept: &str,
    ) -> Result<Vec<ScenePrompt>, GatewayError> {
        let request = GeminiApiRequest::from_text(prompts::storyboard_prompt(product_name, concept))
            .with_json_schema(schema::storyboard_schema());

        let text = self.text_call(&request).await.map_err(|e| {
            tracing::error!(error = %e, product = %product_name, "Storyboard generation failed");
            GatewayError::Storyboard(e.to_string())
        })?;

        parse_storyboard(&text).map_err(|e| {
            tracing::error!(error = %e, product = %product_name, "Storyboard response rejected");
            GatewayError::Storyboard(e)
        })
    }

    async fn generate_scene_image(&self, prompt: &str) -> Result<EncodedImage, GatewayError> {
        let request = GeminiApiRequest::from_text(prompt);

        let response = self
            .client
            .generate_content(&self.image_model, &request)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Image generation failed");
                GatewayError::Image(e.to_string())
            })?;

        match response.first_inline_data() {
            Some(inline) => Ok(EncodedImage::new(
                inline.mime_type.clone(),
                inline.data.clone(),
            )),
            None => {
                tracing::error!(prompt_len = prompt.len(), "No image generated");
                Err(GatewayError::Image("No image generated".to_string()))
            }
        }
    }
}

/// Strip a Markdown code fence the model sometimes wraps JSON in
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parse and validate a listing response
pub(crate) fn parse_listing(text: &str) -> Result<Listing, String> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err("No response from AI".to_string());
    }
    let listing: Listing = serde_json::from_str(body)
        .map_err(|e| format!("response does not match the listing shape: {}", e))?;
    listing.validate()?;
    Ok(listing)
}

/// Parse a concepts response; any deviation from three strings is an error
pub(crate) fn parse_concepts(text: &str) -> Result<Vec<String>, String> {
    let concepts: Vec<String> = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| format!("response is not a list of strings: {}", e))?;
    let concepts: Vec<String> = concepts
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if concepts.len() != CONCEPT_COUNT {
        return Err(format!(
            "expected {} concepts, got {}",
            CONCEPT_COUNT,
            concepts.len()
        ));
    }
    Ok(concepts)
}

/// Parse a storyboard response and renumber scenes 1..=5 in order
pub(crate) fn parse_storyboard(text: &str) -> Result<Vec<ScenePrompt>, String> {
    let mut scenes: Vec<ScenePrompt> = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| format!("response does not match the storyboard shape: {}", e))?;
    if scenes.len() != STORYBOARD_SCENES {
        return Err(format!(
            "expected {} scenes, got {}",
            STORYBOARD_SCENES,
            scenes.len()
        ));
    }
    for (index, scene) in scenes.iter_mut().enumerate() {
        let expected = index as u32 + 1;
        if scene.scene_number != expected {
            tracing::debug!(
                returned = scene.scene_number,
                expected = expected,
                "Renumbering storyboard scene"
            );
            scene.scene_number = expected;
        }
    }
    Ok(scenes)
}
