//! Typed domain records produced by the gateway
//!
//! These are the shapes unstructured model output is coerced into. Field
//! names on the wire are camelCase and must stay stable for any substitute
//! model provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum listing title length in characters
pub const MAX_TITLE_CHARS: usize = 200;

/// Generated product listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// SEO-optimised product title
    pub title: String,
    /// Feature bullet points (five requested)
    pub bullets: Vec<String>,
    /// HTML-formatted description
    pub description: String,
    /// Backend search keywords (ten requested)
    pub keywords: Vec<String>,
    /// Suggested price range, e.g. "$20 - $30"
    pub suggested_price: String,
}

impl Listing {
    /// Check the invariants a listing must satisfy beyond its JSON shape
    pub fn validate(&self) -> Result<(), String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("listing title is empty".to_string());
        }
        let title_len = title.chars().count();
        if title_len > MAX_TITLE_CHARS {
            return Err(format!(
                "listing title has {} characters (max {})",
                title_len, MAX_TITLE_CHARS
            ));
        }
        if self.bullets.iter().all(|b| b.trim().is_empty()) {
            return Err("listing has no bullet points".to_string());
        }
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err("listing has no keywords".to_string());
        }
        Ok(())
    }
}

/// Prompt triple for one storyboard scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePrompt {
    /// 1-based scene position
    pub scene_number: u32,
    /// Environment-only start frame description
    pub start_frame_prompt: String,
    /// Same environment with the product present
    pub end_frame_prompt: String,
    /// Motion between the two frames
    pub video_motion_prompt: String,
}

/// Encoded image payload returned by the model
///
/// Serialized as a `data:<mime>;base64,<data>` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedImage {
    /// MIME type, e.g. "image/png"
    pub mime_type: String,
    /// Base64 payload
    pub data: String,
}

impl EncodedImage {
    /// Create a new encoded image
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Render as a data URL
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_data_url())
    }
}

impl FromStr for EncodedImage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("data:")
            .ok_or_else(|| "image payload is not a data URL".to_string())?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| "image data URL is not base64 encoded".to_string())?;
        if mime_type.is_empty() || data.is_empty() {
            return Err("image data URL is missing its MIME type or payload".to_string());
        }
        Ok(Self::new(mime_type, data))
    }
}

impl TryFrom<String> for EncodedImage {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EncodedImage> for String {
    fn from(image: EncodedImage) -> Self {
        image.to_data_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        Listing {
            title: "Solar Lantern".to_string(),
            bullets: vec!["Bright".to_string()],
            description: "<p>Light</p>".to_string(),
            keywords: vec!["solar".to_string()],
            suggested_price: "$20 - $30".to_string(),
        }
    }

    #[test]
    fn test_listing_wire_names() {
        let value = serde_json::to_value(listing()).unwrap();
        assert_eq!(value["suggestedPrice"], "$20 - $30");
        assert!(value.get("suggested_price").is_none());
    }

    #[test]
    fn test_listing_validate() {
        assert!(listing().validate().is_ok());

        let mut long_title = listing();
        long_title.title = "x".repeat(MAX_TITLE_CHARS + 1);
        assert!(long_title.validate().is_err());

        let mut exact = listing();
        exact.title = "é".repeat(MAX_TITLE_CHARS);
        assert!(exact.validate().is_ok());

        let mut no_bullets = listing();
        no_bullets.bullets.clear();
        assert!(no_bullets.validate().is_err());

        let mut blank_title = listing();
        blank_title.title = "   ".to_string();
        assert!(blank_title.validate().is_err());
    }

    #[test]
    fn test_encoded_image_data_url() {
        let image = EncodedImage::new("image/png", "iVBOR");
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBOR");
        assert_eq!("data:image/png;base64,iVBOR".parse::<EncodedImage>().unwrap(), image);
        assert!("iVBOR".parse::<EncodedImage>().is_err());
        assert!("data:image/png,iVBOR".parse::<EncodedImage>().is_err());
    }

    #[test]
    fn test_encoded_image_serde_as_string() {
        let image = EncodedImage::new("image/jpeg", "abc");
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(json, r#""data:image/jpeg;base64,abc""#);
        let back: EncodedImage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
    }
}
