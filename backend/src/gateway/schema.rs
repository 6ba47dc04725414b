//! Response schemas forcing the model's JSON shape
//!
//! Uses the Gemini OpenAPI-subset type names (`OBJECT`, `ARRAY`, `STRING`,
//! `INTEGER`).

use serde_json::{json, Value};

/// Listing object with all five fields required
pub fn listing_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "SEO optimized product title for Amazon/Shopify (max 200 chars)."
            },
            "bullets": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "5 compelling bullet points highlighting features and benefits."
            },
            "description": {
                "type": "STRING",
                "description": "HTML formatted product description (use <p>, <b>, <ul> tags)."
            },
            "keywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of 10 backend search keywords."
            },
            "suggestedPrice": {
                "type": "STRING",
                "description": "A suggested price range based on the product type (e.g., '$20 - $30')."
            }
        },
        "required": ["title", "bullets", "description", "keywords", "suggestedPrice"]
    })
}

/// Flat list of strings
pub fn concepts_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

/// List of scene prompt objects
pub fn storyboard_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "sceneNumber": { "type": "INTEGER" },
                "startFramePrompt": {
                    "type": "STRING",
                    "description": "Highly detailed description of the environment/scene setup (80+ words), NO product visible."
                },
                "endFramePrompt": {
                    "type": "STRING",
                    "description": "Highly detailed description of the same scene but now containing the product (80+ words)."
                },
                "videoMotionPrompt": {
                    "type": "STRING",
                    "description": "Prompt describing the action/movement that happens between the start and end frame."
                }
            },
            "required": ["sceneNumber", "startFramePrompt", "endFramePrompt", "videoMotionPrompt"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_schema_required_fields() {
        let schema = listing_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(
            required,
            vec!["title", "bullets", "description", "keywords", "suggestedPrice"]
        );
    }

    #[test]
    fn test_storyboard_schema_is_array_of_objects() {
        let schema = storyboard_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["type"], "OBJECT");
        assert_eq!(schema["items"]["properties"]["sceneNumber"]["type"], "INTEGER");
    }
}
