//! Prompt templates sent to the model

/// System instruction for listing generation
pub const COPYWRITER_INSTRUCTION: &str = "You are an expert e-commerce copywriter. You write SEO-optimized, persuasive content for Amazon and Shopify listings.";

/// Instruction sent alongside an image for analysis
pub const IMAGE_ANALYSIS_PROMPT: &str = "Analyze this product image. Identify the product type, key materials, visible features, colors, and potential target audience. Keep it concise.";

/// Concepts returned when brainstorming fails
pub const FALLBACK_CONCEPTS: [&str; 3] = [
    "Guerrilla Marketing: Product appears in unexpected global locations.",
    "Lifestyle: Daily life improved by the product.",
    "Showcase: High-energy feature highlight.",
];

/// Listing prompt; the image variant asks the model to ground on the picture
pub fn listing_prompt(product_name: &str, tone: &str, context: &str, with_image: bool) -> String {
    if with_image {
        format!(
            "Create a product listing for this item. Product Name: \"{}\". Tone: {}. Additional Context: {}. Rely heavily on the visual details in the image.",
            product_name, tone, context
        )
    } else {
        format!(
            "Create a high-converting product listing. Product Name: \"{}\". Tone: {}. Additional Context: {}.",
            product_name, tone, context
        )
    }
}

/// Brainstorm prompt asking for three concepts
pub fn concepts_prompt(product_name: &str) -> String {
    format!(
        "Generate 3 distinct, creative video ad concepts for a product called \"{}\".\n\
         One should be \"Guerrilla Marketing\" style (product dropped in unexpected places).\n\
         One should be \"Lifestyle/Aspirational\".\n\
         One should be \"Technical/Feature-focused\".\n\
         Return ONLY the 3 concept titles and a 1-sentence description for each, formatted as a simple JSON list of strings.",
        product_name
    )
}

/// Five-scene storyboard prompt for one concept
pub fn storyboard_prompt(product_name: &str, concept: &str) -> String {
    format!(
        "I want to make an ad for {} a 5 scene ad in the concept of: {}.\n\
         The main idea is about being dropped in various places on earth, from Deserts, Icebergs, Even the ocean, and many more.\n\
         In total I want to get 5 scenes.\n\
         Each scene's starting image should just have the environment and not the product.\n\
         The last scene should have the product in the scene.\n\
         I want you to give me highly detailed prompts (at least 80 words) describing each scene, and then a video prompt for what's going to happen between the start and the end frame.\n\n\
         You will get:\n\
         a. Start Frame Image prompt\n\
         b. End Frame Image prompt\n\
         c. Middle motion video prompt",
        product_name, concept
    )
}
