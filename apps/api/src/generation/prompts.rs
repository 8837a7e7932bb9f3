// All prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System instruction for question batches.
pub const QUESTIONS_SYSTEM: &str = "You are a professional psychologist specializing in \
    Attachment Theory who writes short, clear Likert-scale test items. \
    You MUST respond with a valid JSON array only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Question batch prompt. Replace `{count}`, `{dimensions}`, `{profile}`.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Generate a list of exactly {count} statements (Likert scale, 1 = strongly disagree, 5 = strongly agree) that assess a person's attachment style.

The statements must cover these 8 dimensions evenly:
{dimensions}

Tailor the wording to this person without naming them or repeating their answers back:
{profile}

Return a JSON array of exactly {count} objects. Each object must have:
- "id": integer (1 to {count}, each used once, in order)
- "text": string (a first-person statement about feelings in relationships)
- "dimension": string (exactly one of the 8 dimensions above, spelled identically)"#;

/// Analysis prompt. Replace `{count}`, `{dimensions}`, `{profile}`,
/// `{answers_json}`, `{advice_instruction}`, `{care_instruction}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r##"Analyze the following answers to a {count}-question attachment style test.

PROFILE:
{profile}

ANSWERS (score: 1 = strongly disagree, 5 = strongly agree):
{answers_json}

Tasks:
1. Calculate normalized scores (0-100) for each of the 8 dimensions: {dimensions}.
2. Determine their specific attachment style (e.g. Secure, Anxious-Preoccupied, Dismissive-Avoidant, Fearful-Avoidant) from the context of their answers and profile.
3. Create a scientific-sounding 2-letter code for it (e.g. "Se" for Secure, "Ap" for Anxious-Preoccupied, "Da" for Dismissive-Avoidant, "Fa" for Fearful-Avoidant).
4. Write 5 witty, insightful "Spotify Wrapped" style slides about their personality and patterns.
5. Pick a tarot card that mirrors their attachment soul, with a prompt for an ornate card illustration.
6. Pick a song that is their relationship anthem, with a prompt for its album cover art.
7. Pick a celebrity whose public relationship energy matches theirs, with a prompt for a stylized (non-photographic) portrait.
8. {advice_instruction}
9. Write a prompt for a high-contrast, artistic COMIC BOOK STYLE illustration of a character or abstract scene that represents their "attachment soul" and emotional state (e.g. a figure standing in a storm for anxious, a figure in a glass tower for avoidant).

{care_instruction}

Return a JSON object with this EXACT schema (no extra fields):
{
  "twoLetterCode": "Ap",
  "attachmentStyleName": "Anxious-Preoccupied",
  "scores": { "Anxiety": 0, "Avoidance": 0, "Security": 0, "Independence": 0, "Emotional Intimacy": 0, "Trust": 0, "Self-Reliance": 0, "Ambivalence": 0 },
  "summary": "overall summary paragraph",
  "slides": [
    { "title": "string", "content": "string", "bgColor": "#hex (dark/vibrant)", "textColor": "#hex (light)" }
  ],
  "tarot": { "cardName": "string", "meaning": "string", "imagePrompt": "string" },
  "song": { "title": "string", "artist": "string", "reason": "string", "coverArtPrompt": "string" },
  "celebrityMatch": { "name": "string", "reason": "string", "imagePrompt": "string" },
  "advice": {advice_schema},
  "imagePrompt": "string"
}"##;

pub const SINGLE_ADVICE_INSTRUCTION: &str = "They are single: give a concrete dating strategy, \
    a place they are likely to meet a compatible partner, the type that suits them, \
    and up to three short tips.";

pub const SINGLE_ADVICE_SCHEMA: &str = r#"{ "status": "Single", "datingStrategy": "string", "meetingPlace": "string", "idealType": "string", "tips": ["string"] }"#;

pub const PARTNERED_ADVICE_INSTRUCTION: &str = "They are partnered: list the red flags and green \
    flags their pattern brings into the relationship, and a dominantFlagScore from 0 \
    (all red) to 100 (all green).";

/// Replace `{status}`.
pub const PARTNERED_ADVICE_SCHEMA: &str = r#"{ "status": "{status}", "redFlags": ["string"], "greenFlags": ["string"], "dominantFlagScore": 0 }"#;

/// Loading-screen facts.
pub const FACTS_PROMPT: &str = "Give 6 short, surprising, true facts about attachment theory \
    and relationships. Each fact must be a single sentence under 20 words. \
    Return a JSON array of strings.";

/// Fills `{key}` placeholders in one pass. Inserted values are never rescanned,
/// so text inside them that looks like a placeholder stays literal. Braces that
/// do not name a known key are kept.
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_placeholders_replaces_known_keys() {
        let out = fill_placeholders("a {x} b {y}", &[("x", "1"), ("y", "2")]);
        assert_eq!(out, "a 1 b 2");
    }

    #[test]
    fn test_fill_placeholders_keeps_json_braces() {
        let out = fill_placeholders(r#"{"status": "{s}"}"#, &[("s", "Single")]);
        assert_eq!(out, r#"{"status": "Single"}"#);
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let out = fill_placeholders(
            "{answers}|{profile}",
            &[("answers", "I said {profile}"), ("profile", "I said {answers}")],
        );
        assert_eq!(out, "I said {profile}|I said {answers}");
    }
}
