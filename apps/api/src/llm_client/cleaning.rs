//! Best-effort extraction of a JSON payload from model output.
//!
//! This is a pre-filter, not a guarantee: prose containing brackets before the
//! real payload still defeats it. Callers parse strictly afterwards and validate
//! the parsed shape.

use serde::de::DeserializeOwned;

/// Strips Markdown code fences, then trims everything outside the outermost
/// array or object. Whichever of `[` / `{` appears first decides the shape; the
/// payload ends at the last matching closer. Text with no opener is returned
/// trimmed and unchanged.
pub fn clean_json_response(text: &str) -> String {
    let unfenced = text.replace("```json", "").replace("```", "");
    let trimmed = unfenced.trim();

    let open_array = trimmed.find('[');
    let open_object = trimmed.find('{');

    let (start, closer) = match (open_array, open_object) {
        (Some(a), Some(o)) if a < o => (a, ']'),
        (Some(_), Some(o)) => (o, '}'),
        (Some(a), None) => (a, ']'),
        (None, Some(o)) => (o, '}'),
        (None, None) => return trimmed.to_string(),
    };

    match trimmed.rfind(closer) {
        Some(end) if end > start => trimmed[start..=end].to_string(),
        _ => trimmed[start..].to_string(),
    }
}

/// Cleans then strictly deserializes model output.
pub fn parse_json_response<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(&clean_json_response(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fences_and_surrounding_prose() {
        let input = "Here you go:\n```json\n[{\"id\":1}]\n```\nThanks";
        assert_eq!(clean_json_response(input), "[{\"id\":1}]");
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let input = "Sure! ```json\n{\"a\": [1, 2]}\n``` hope that helps";
        let once = clean_json_response(input);
        assert_eq!(once, "{\"a\": [1, 2]}");
        assert_eq!(clean_json_response(&once), once);
    }

    #[test]
    fn test_strips_fences_without_language_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(clean_json_response(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_object_wins_when_it_opens_first() {
        let input = "{\"slides\": [{\"title\": \"x\"}]} trailing";
        assert_eq!(
            clean_json_response(input),
            "{\"slides\": [{\"title\": \"x\"}]}"
        );
    }

    #[test]
    fn test_array_wins_when_it_opens_first() {
        let input = "facts: [\"a\", \"b\"] and {not this}";
        // The last `]` bounds the payload; the trailing object is cut.
        assert_eq!(clean_json_response(input), "[\"a\", \"b\"]");
    }

    #[test]
    fn test_no_brackets_returns_trimmed_text() {
        assert_eq!(clean_json_response("  I cannot help with that.  "), "I cannot help with that.");
        let parsed: Result<Vec<u32>, _> = parse_json_response("I cannot help with that.");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_missing_closer_keeps_tail() {
        assert_eq!(clean_json_response("ok: [1, 2"), "[1, 2");
    }

    #[test]
    fn test_parse_json_response_deserializes() {
        let parsed: Vec<String> =
            parse_json_response("```json\n[\"one\", \"two\"]\n```").unwrap();
        assert_eq!(parsed, vec!["one".to_string(), "two".to_string()]);
    }
}
