//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use listing_studio::gateway::{
    fallback_concepts, AiGateway, EncodedImage, GatewayError, Listing, ListingRequest,
    ScenePrompt,
};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn solar_lantern_listing() -> Listing {
    Listing {
        title: "Solar Lantern - Waterproof LED Camping Light".to_string(),
        bullets: vec![
            "Charges in 6 hours of sunlight".to_string(),
            "IP67 waterproof housing".to_string(),
            "Three brightness modes".to_string(),
            "Collapsible silicone body".to_string(),
            "USB-C backup charging".to_string(),
        ],
        description: "<p>Light up any <b>campsite</b> without batteries.</p>".to_string(),
        keywords: vec![
            "solar lantern".to_string(),
            "camping light".to_string(),
            "emergency lamp".to_string(),
        ],
        suggested_price: "$20 - $30".to_string(),
    }
}

pub fn solar_lantern_concepts() -> Vec<String> {
    vec![
        "Lifestyle: evenings on the porch made brighter.".to_string(),
        "Guerrilla Marketing: the lantern lands on an iceberg.".to_string(),
        "Technical: waterproofing torture test.".to_string(),
    ]
}

pub fn scenes(count: u32) -> Vec<ScenePrompt> {
    (1..=count)
        .map(|n| ScenePrompt {
            scene_number: n,
            start_frame_prompt: format!("scene {} start", n),
            end_frame_prompt: format!("scene {} end", n),
            video_motion_prompt: format!("scene {} motion", n),
        })
        .collect()
}

/// Gateway replaying canned results and recording what it was asked
pub struct ScriptedGateway {
    pub listing: Result<Listing, GatewayError>,
    pub concepts: Vec<String>,
    pub storyboard: Result<Vec<ScenePrompt>, GatewayError>,
    /// Image prompts containing any of these fragments fail
    pub failing_images: Mutex<Vec<String>>,
    /// When set, listing generation waits for a notification
    pub listing_gate: Option<Arc<Notify>>,
    /// Image prompts containing the fragment wait for the notification
    pub image_gate: Option<(String, Arc<Notify>)>,
    pub calls: Mutex<Vec<String>>,
    pub image_prompts: Mutex<Vec<String>>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self {
            listing: Ok(solar_lantern_listing()),
            concepts: solar_lantern_concepts(),
            storyboard: Ok(scenes(5)),
            failing_images: Mutex::new(Vec::new()),
            listing_gate: None,
            image_gate: None,
            calls: Mutex::new(Vec::new()),
            image_prompts: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedGateway {
    pub fn failing_on(fragments: &[&str]) -> Self {
        Self {
            failing_images: Mutex::new(fragments.iter().map(|f| f.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn image_prompts(&self) -> Vec<String> {
        self.image_prompts.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AiGateway for ScriptedGateway {
    async fn analyze_image(&self, _image: &EncodedImage) -> Result<String, GatewayError> {
        self.record("analyze_image".to_string());
        Ok("A matte black collapsible lantern".to_string())
    }

    async fn generate_listing(&self, request: &ListingRequest) -> Result<Listing, GatewayError> {
        self.record(format!("listing:{}", request.product_name));
        if let Some(gate) = &self.listing_gate {
            gate.notified().await;
        }
        self.listing.clone()
    }

    async fn generate_marketing_concepts(&self, product_name: &str) -> Vec<String> {
        self.record(format!("concepts:{}", product_name));
        if self.concepts.len() == 3 {
            self.concepts.clone()
        } else {
            fallback_concepts()
        }
    }

    async fn generate_storyboard(
        &self,
        product_name: &str,
        concept: &str,
    ) -> Result<Vec<ScenePrompt>, GatewayError> {
        self.record(format!("storyboard:{}:{}", product_name, concept));
        self.storyboard.clone()
    }

    async fn generate_scene_image(&self, prompt: &str) -> Result<EncodedImage, GatewayError> {
        self.image_prompts.lock().unwrap().push(prompt.to_string());
        if let Some((fragment, gate)) = &self.image_gate {
            if prompt.contains(fragment.as_str()) {
                gate.notified().await;
            }
        }
        let fails = self
            .failing_images
            .lock()
            .unwrap()
            .iter()
            .any(|f| prompt.contains(f.as_str()));
        if fails {
            return Err(GatewayError::Image("No image generated".to_string()));
        }
        Ok(EncodedImage::new("image/png", "iVBORw0KGgo"))
    }
}
