//! Gateway error types
//!
//! Errors surfaced by the AI gateway. Every variant means the external call
//! failed or its response did not conform to the expected structured shape.

use thiserror::Error;

/// Errors returned by [`AiGateway`](super::AiGateway) operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Image analysis failed or returned no text
    #[error("Image analysis failed: {0}")]
    Analysis(String),

    /// Listing generation failed or returned an invalid listing
    #[error("Listing generation failed: {0}")]
    Generation(String),

    /// Storyboard generation failed or returned an invalid storyboard
    #[error("Storyboard generation failed: {0}")]
    Storyboard(String),

    /// Scene image generation failed or returned no image
    #[error("Image generation failed: {0}")]
    Image(String),
}

impl GatewayError {
    /// Short label of the failing capability, used as the interruption kind
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Analysis(_) => "analysis",
            GatewayError::Generation(_) => "generation",
            GatewayError::Storyboard(_) => "storyboard",
            GatewayError::Image(_) => "image",
        }
    }
}

/// Transport-level errors from the Gemini client
///
/// These are wrapped into the [`GatewayError`] variant of the operation that
/// issued the call.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No API key was configured
    #[error("API key is empty")]
    MissingApiKey,

    /// The HTTP request could not be sent or its body could not be read
    #[error("HTTP request to Gemini API failed: {0}")]
    Http(reqwest::Error),

    /// Gemini answered with HTTP 429
    #[error("Gemini API rate limit exceeded (HTTP 429): {0}")]
    RateLimited(String),

    /// Gemini answered with a non-success status
    #[error("Gemini API returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if readable
        body: String,
    },

    /// The response body was not a valid Gemini response
    #[error("Failed to parse JSON response from Gemini API: {0}")]
    InvalidResponse(String),

    /// The prompt was blocked by the model's safety filters
    #[error("Gemini API blocked the prompt: {0}")]
    Blocked(String),

    /// The response contained no usable candidate content
    #[error("Gemini API response contains no candidates")]
    NoCandidates,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        // Transport errors reach HTTP bodies and logs; never echo the URL.
        ClientError::Http(err.without_url())
    }
}
