//! The terminal aggregate of a quiz session.
//!
//! Text fields arrive from the analysis call; `images` is attached afterwards in
//! a single write once every image request has settled.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Dimension, RelationshipStatus};

/// One narrative card of the "wrapped" deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedSlide {
    pub title: String,
    pub content: String,
    pub bg_color: String,
    pub text_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TarotCard {
    pub card_name: String,
    pub meaning: String,
    pub image_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub reason: String,
    pub cover_art_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebrityMatch {
    pub name: String,
    pub reason: String,
    pub image_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleAdvice {
    pub dating_strategy: String,
    pub meeting_place: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartneredAdvice {
    pub red_flags: Vec<String>,
    pub green_flags: Vec<String>,
    /// 0 = all red, 100 = all green
    pub dominant_flag_score: f64,
}

/// Status-conditioned advice. The `status` tag selects exactly one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum RelationshipAdvice {
    Single(SingleAdvice),
    Relationship(PartneredAdvice),
    Complicated(PartneredAdvice),
    Married(PartneredAdvice),
}

impl RelationshipAdvice {
    pub fn status(&self) -> RelationshipStatus {
        match self {
            RelationshipAdvice::Single(_) => RelationshipStatus::Single,
            RelationshipAdvice::Relationship(_) => RelationshipStatus::Relationship,
            RelationshipAdvice::Complicated(_) => RelationshipStatus::Complicated,
            RelationshipAdvice::Married(_) => RelationshipStatus::Married,
        }
    }

    pub fn partnered(&self) -> Option<&PartneredAdvice> {
        match self {
            RelationshipAdvice::Single(_) => None,
            RelationshipAdvice::Relationship(p)
            | RelationshipAdvice::Complicated(p)
            | RelationshipAdvice::Married(p) => Some(p),
        }
    }
}

/// The four artwork slots requested after text analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSlot {
    Main,
    Tarot,
    Song,
    Celebrity,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 4] = [
        ImageSlot::Main,
        ImageSlot::Tarot,
        ImageSlot::Song,
        ImageSlot::Celebrity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSlot::Main => "main",
            ImageSlot::Tarot => "tarot",
            ImageSlot::Song => "song",
            ImageSlot::Celebrity => "celebrity",
        }
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generated artwork as `data:` URIs. A slot is either fully present or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImages {
    pub main: Option<String>,
    pub tarot: Option<String>,
    pub song: Option<String>,
    pub celebrity: Option<String>,
}

impl GeneratedImages {
    pub fn get(&self, slot: ImageSlot) -> Option<&str> {
        match slot {
            ImageSlot::Main => self.main.as_deref(),
            ImageSlot::Tarot => self.tarot.as_deref(),
            ImageSlot::Song => self.song.as_deref(),
            ImageSlot::Celebrity => self.celebrity.as_deref(),
        }
    }

    pub fn populated(&self) -> usize {
        ImageSlot::ALL
            .iter()
            .filter(|slot| self.get(**slot).is_some())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub two_letter_code: String,
    pub attachment_style_name: String,
    pub scores: BTreeMap<Dimension, f64>,
    pub summary: String,
    pub slides: Vec<WrappedSlide>,
    pub tarot: TarotCard,
    pub song: Song,
    pub celebrity_match: CelebrityMatch,
    pub advice: RelationshipAdvice,
    /// Prompt for the main "attachment soul" illustration.
    pub image_prompt: String,
    /// Never read from remote output; attached by the orchestrator.
    #[serde(default, skip_deserializing)]
    pub images: GeneratedImages,
}

impl AnalysisResult {
    /// The prompt that feeds each image slot.
    pub fn prompt_for(&self, slot: ImageSlot) -> &str {
        match slot {
            ImageSlot::Main => &self.image_prompt,
            ImageSlot::Tarot => &self.tarot.image_prompt,
            ImageSlot::Song => &self.song.cover_art_prompt,
            ImageSlot::Celebrity => &self.celebrity_match.image_prompt,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A well-formed analysis payload as the remote model would return it.
    pub fn analysis_json(status: &str) -> String {
        let advice = if status == "Single" {
            r#"{"status": "Single", "datingStrategy": "Slow burn over loud sparks", "meetingPlace": "A pottery class", "tips": ["Text back when you mean it"]}"#.to_string()
        } else {
            format!(
                r#"{{"status": "{status}", "redFlags": ["Silent treatment"], "greenFlags": ["Shared rituals", "Honest check-ins"], "dominantFlagScore": 68}}"#
            )
        };
        format!(
            r##"{{
                "twoLetterCode": "Ap",
                "attachmentStyleName": "Anxious-Preoccupied",
                "scores": {{
                    "Anxiety": 82, "Avoidance": 24, "Security": 41, "Independence": 35,
                    "Emotional Intimacy": 77, "Trust": 38.5, "Self-Reliance": 30, "Ambivalence": 64
                }},
                "summary": "You love loudly and listen for echoes.",
                "slides": [
                    {{"title": "Top Emotion", "content": "Hope, on repeat.", "bgColor": "#1e1b4b", "textColor": "#ffffff"}},
                    {{"title": "Pattern", "content": "Double texts.", "bgColor": "#831843", "textColor": "#fdf2f8"}}
                ],
                "tarot": {{"cardName": "Two of Cups", "meaning": "Union sought.", "imagePrompt": "two golden cups"}},
                "song": {{"title": "Dreams", "artist": "Fleetwood Mac", "reason": "Thunder only happens when it's raining.", "coverArtPrompt": "storm over a stage"}},
                "celebrityMatch": {{"name": "Zendaya", "reason": "Grounded warmth.", "imagePrompt": "stylized portrait"}},
                "advice": {advice},
                "imagePrompt": "a figure standing in a storm holding a lantern"
            }}"##
        )
    }

    pub fn analysis(status: &str) -> AnalysisResult {
        serde_json::from_str(&analysis_json(status)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_analysis_deserializes_remote_shape() {
        let result = analysis("Relationship");
        assert_eq!(result.two_letter_code, "Ap");
        assert_eq!(result.scores.len(), 8);
        assert_eq!(result.scores[&Dimension::Trust], 38.5);
        assert_eq!(result.advice.status(), RelationshipStatus::Relationship);
        assert_eq!(result.images, GeneratedImages::default());
    }

    #[test]
    fn test_remote_cannot_inject_images() {
        let mut value: serde_json::Value = serde_json::from_str(&analysis_json("Single")).unwrap();
        value["images"] = serde_json::json!({"main": "data:image/png;base64,AAAA"});
        let result: AnalysisResult = serde_json::from_value(value).unwrap();
        assert!(result.images.main.is_none());
    }

    #[test]
    fn test_single_advice_has_no_flags() {
        let result = analysis("Single");
        assert!(result.advice.partnered().is_none());
        match result.advice {
            RelationshipAdvice::Single(single) => {
                assert_eq!(single.meeting_place, "A pottery class");
                assert_eq!(single.tips.len(), 1);
                assert!(single.ideal_type.is_none());
            }
            other => panic!("expected single advice, got {other:?}"),
        }
    }

    #[test]
    fn test_advice_with_unknown_status_fails() {
        let json = r#"{"status": "Divorced", "redFlags": [], "greenFlags": [], "dominantFlagScore": 10}"#;
        let result: Result<RelationshipAdvice, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_partnered_advice_requires_flag_score() {
        let json = r#"{"status": "Married", "redFlags": [], "greenFlags": []}"#;
        let result: Result<RelationshipAdvice, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_scores_serialize_with_dimension_names() {
        let json = serde_json::to_value(analysis("Married")).unwrap();
        assert_eq!(json["scores"]["Emotional Intimacy"], 77.0);
        assert_eq!(json["advice"]["status"], "Married");
        assert!(json["images"]["main"].is_null());
    }

    #[test]
    fn test_prompt_for_each_slot() {
        let result = analysis("Single");
        assert_eq!(result.prompt_for(ImageSlot::Tarot), "two golden cups");
        assert_eq!(result.prompt_for(ImageSlot::Song), "storm over a stage");
        assert_eq!(result.prompt_for(ImageSlot::Celebrity), "stylized portrait");
        assert!(result.prompt_for(ImageSlot::Main).contains("lantern"));
    }

    #[test]
    fn test_generated_images_populated_count() {
        let images = GeneratedImages {
            main: Some("data:image/png;base64,AA".to_string()),
            song: Some("data:image/png;base64,BB".to_string()),
            ..Default::default()
        };
        assert_eq!(images.populated(), 2);
        assert!(images.get(ImageSlot::Tarot).is_none());
    }
}
