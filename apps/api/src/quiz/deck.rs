//! Slide deck for the presenting phase.
//!
//! Fixed frame around the remote narrative slides:
//! intro, story slides, chart, tarot, advice, celebrity, song, reveal.

use serde::Serialize;

use crate::models::{AnalysisResult, ImageSlot, RelationshipAdvice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideKind {
    Intro,
    Story,
    Chart,
    Tarot,
    Advice,
    Celebrity,
    Song,
    Reveal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSlide {
    pub kind: SlideKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Artwork slot shown on this slide, if any. The client falls back to a
    /// placeholder when the slot is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSlot>,
}

impl DeckSlide {
    fn framed(kind: SlideKind, title: &str, content: Option<String>, image: Option<ImageSlot>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            content,
            bg_color: None,
            text_color: None,
            image,
        }
    }
}

/// Title of the advice slide; depends on whether the user is single.
pub fn advice_title(advice: &RelationshipAdvice) -> &'static str {
    match advice {
        RelationshipAdvice::Single(_) => "The Hunt",
        _ => "The Health Check",
    }
}

/// Single users get a strategy and a place to look; partnered users get
/// their flags and where the balance tips.
fn advice_content(advice: &RelationshipAdvice) -> String {
    match (advice, advice.partnered()) {
        (RelationshipAdvice::Single(single), _) => format!(
            "Strategy: {}\nWhere to look: {}",
            single.dating_strategy, single.meeting_place
        ),
        (_, Some(partnered)) => format!(
            "Green flags: {}\nRed flags: {}\nGreen score: {:.0}/100",
            partnered.green_flags.join(", "),
            partnered.red_flags.join(", "),
            partnered.dominant_flag_score
        ),
        (_, None) => String::new(),
    }
}

pub fn build_deck(result: &AnalysisResult) -> Vec<DeckSlide> {
    let mut deck = Vec::with_capacity(result.slides.len() + 7);

    deck.push(DeckSlide::framed(
        SlideKind::Intro,
        "Your Soul's Data is Ready",
        None,
        None,
    ));

    deck.extend(result.slides.iter().map(|slide| DeckSlide {
        kind: SlideKind::Story,
        title: slide.title.clone(),
        content: Some(slide.content.clone()),
        bg_color: Some(slide.bg_color.clone()),
        text_color: Some(slide.text_color.clone()),
        image: None,
    }));

    deck.push(DeckSlide::framed(
        SlideKind::Chart,
        "The Shape of Your Heart",
        Some(result.summary.clone()),
        None,
    ));
    deck.push(DeckSlide::framed(
        SlideKind::Tarot,
        "Your Soul Card",
        Some(format!("{}: {}", result.tarot.card_name, result.tarot.meaning)),
        Some(ImageSlot::Tarot),
    ));
    deck.push(DeckSlide::framed(
        SlideKind::Advice,
        advice_title(&result.advice),
        Some(advice_content(&result.advice)),
        None,
    ));
    deck.push(DeckSlide::framed(
        SlideKind::Celebrity,
        "Your Celestial Match",
        Some(format!(
            "{}: {}",
            result.celebrity_match.name, result.celebrity_match.reason
        )),
        Some(ImageSlot::Celebrity),
    ));
    deck.push(DeckSlide::framed(
        SlideKind::Song,
        "Your Anthem",
        Some(format!(
            "{} by {}: {}",
            result.song.title, result.song.artist, result.song.reason
        )),
        Some(ImageSlot::Song),
    ));
    deck.push(DeckSlide::framed(
        SlideKind::Reveal,
        "Your Attachment Signature",
        Some(format!(
            "{} ({})",
            result.attachment_style_name, result.two_letter_code
        )),
        Some(ImageSlot::Main),
    ));

    deck
}
