//! Artwork generation. Every failure degrades to an absent slot; nothing here
//! returns an error.

use tracing::{info, warn};

use crate::llm_client::GenerationBackend;
use crate::models::{AnalysisResult, GeneratedImages, ImageSlot};

/// Style suffix appended to each slot's prompt.
pub fn style_suffix(slot: ImageSlot) -> &'static str {
    match slot {
        ImageSlot::Main => " --comic-book-style --vibrant-colors --high-detail",
        ImageSlot::Tarot => " --tarot-card-art --ornate-gold-border --mystical --high-detail",
        ImageSlot::Song => " --album-cover-art --bold-graphic-design --no-text",
        ImageSlot::Celebrity => " --stylized-pop-art-portrait --vibrant-colors --not-photographic",
    }
}

/// Generates one image and returns it as a `data:` URI, or `None` on any failure.
pub async fn request_image(
    backend: &dyn GenerationBackend,
    prompt: &str,
    style_suffix: &str,
) -> Option<String> {
    if prompt.trim().is_empty() {
        warn!("Skipping image request with an empty prompt");
        return None;
    }

    let full_prompt = format!("{}{}", prompt.trim(), style_suffix);
    match backend.generate_image(&full_prompt).await {
        Ok(Some(image)) => Some(image.to_data_uri()),
        Ok(None) => {
            warn!("Image model returned no inline image");
            None
        }
        Err(e) => {
            warn!("Image generation failed: {e}");
            None
        }
    }
}

/// Issues all four slot requests together and waits for every one to settle.
/// Slots that fail stay absent; the others are kept.
pub async fn generate_all_images(
    backend: &dyn GenerationBackend,
    analysis: &AnalysisResult,
) -> GeneratedImages {
    let (main, tarot, song, celebrity) = tokio::join!(
        request_slot(backend, analysis, ImageSlot::Main),
        request_slot(backend, analysis, ImageSlot::Tarot),
        request_slot(backend, analysis, ImageSlot::Song),
        request_slot(backend, analysis, ImageSlot::Celebrity),
    );

    let images = GeneratedImages {
        main,
        tarot,
        song,
        celebrity,
    };

    for slot in ImageSlot::ALL {
        if images.get(slot).is_none() {
            warn!(slot = %slot, "Image slot left empty");
        }
    }
    info!("Generated {}/4 images", images.populated());

    images
}

async fn request_slot(
    backend: &dyn GenerationBackend,
    analysis: &AnalysisResult,
    slot: ImageSlot,
) -> Option<String> {
    request_image(backend, analysis.prompt_for(slot), style_suffix(slot)).await
}
