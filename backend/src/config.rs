//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;

/// Default Gemini REST endpoint
pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for text and structured JSON output
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default model for scene image generation
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Generative model gateway configuration
    pub gateway: GatewayConfig,
    /// Product name the studio project is pre-seeded with, if any
    pub initial_product: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Gateway configuration
#[derive(Clone)]
pub struct GatewayConfig {
    /// Gemini API key
    pub api_key: String,
    /// Gemini API base URL (overridden in tests)
    pub api_base_url: String,
    /// Model used for analysis, listings, concepts and storyboards
    pub text_model: String,
    /// Model used for scene images
    pub image_model: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

// Keeps the API key out of the startup log line.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key_set", &!self.api_key.is_empty())
            .field("api_base_url", &self.api_base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: DEFAULT_GEMINI_API_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = GatewayConfig::default();
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            gateway: GatewayConfig {
                api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
                api_base_url: env::var("GEMINI_API_BASE_URL").unwrap_or(defaults.api_base_url),
                text_model: non_empty_var("GEMINI_TEXT_MODEL").unwrap_or(defaults.text_model),
                image_model: non_empty_var("GEMINI_IMAGE_MODEL").unwrap_or(defaults.image_model),
                timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .filter(|t: &u64| *t > 0)
                    .unwrap_or(defaults.timeout_secs),
            },
            initial_product: non_empty_var("STUDIO_PRODUCT_NAME"),
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
