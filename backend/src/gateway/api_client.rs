//! Gemini API client
//!
//! Direct HTTP client for the Gemini `generateContent` endpoint.
//! Handles transport, HTTP status and response-envelope checks; the gateway
//! operations built on top of it are responsible for domain validation.

use crate::config::GatewayConfig;
use crate::gateway::error::ClientError;
use crate::gateway::gemini_types::{GeminiApiRequest, GeminiApiResponse};
use std::time::Duration;

/// Header carrying the Gemini API key
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Thin wrapper around a shared `reqwest::Client` (connection pooling)
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client from gateway configuration
    pub fn new(config: &GatewayConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_http_client(
            http,
            &config.api_key,
            &config.api_base_url,
        ))
    }

    /// Build a client around an existing `reqwest::Client`
    pub fn with_http_client(http: reqwest::Client, api_key: &str, base_url: &str) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Call `generateContent` on `model`
    ///
    /// # Returns
    /// * `Ok(GeminiApiResponse)` - A response with at least one candidate
    /// * `Err(ClientError)` - If the key is missing, the request fails, the
    ///   status is not a success, the body does not parse, the prompt was
    ///   blocked, or no candidates were returned
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GeminiApiRequest,
    ) -> Result<GeminiApiResponse, ClientError> {
        if self.api_key.is_empty() {
            return Err(ClientError::MissingApiKey);
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        tracing::debug!(
            url = %url,
            model = %model,
            json_mode = request.generation_config.is_some(),
            "Calling Gemini API"
        );

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Gemini API returned error status"
            );

            if status_code == 429 {
                return Err(ClientError::RateLimited(error_body));
            }

            return Err(ClientError::Status {
                status: status_code,
                body: error_body,
            });
        }

        let response_body = response.text().await?;

        let parsed: GeminiApiResponse = serde_json::from_str(&response_body)
            .map_err(|e| ClientError::InvalidResponse(format!("{} - Response body: {}", e, response_body)))?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(ClientError::Blocked(reason.clone()));
        }

        if parsed.candidates.is_empty() {
            return Err(ClientError::NoCandidates);
        }

        tracing::debug!(
            parts = parsed.first_parts().len(),
            "Successfully received response from Gemini API"
        );

        Ok(parsed)
    }
}
