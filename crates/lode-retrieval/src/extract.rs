//! Pulling a JSON object out of a free-text answer.
//!
//! Services wrap structured output in code fences or surround it with prose
//! despite instructions. [`extract_json`] narrows the body to the first
//! complete object before [`parse_facts`] decodes it.

use lode_core::facts::RawFacts;
use serde_json::Value;

use crate::error::TransportError;

/// The first complete JSON object in `body`, after dropping code fences.
///
/// Each `{` is tried in turn as the start of an object; braces in prose
/// before or after the object are skipped. `None` when no object decodes.
#[must_use]
pub fn extract_json(body: &str) -> Option<&str> {
    let trimmed = body.trim();
    let inner = strip_fence(trimmed).unwrap_or(trimmed);
    inner
        .match_indices('{')
        .find_map(|(start, _)| object_at(&inner[start..]))
}

/// The object starting at the head of `text`, ignoring whatever follows it.
fn object_at(text: &str) -> Option<&str> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    match stream.next() {
        Some(Ok(Value::Object(_))) => Some(&text[..stream.byte_offset()]),
        _ => None,
    }
}

fn strip_fence(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    // Skip the language tag line.
    let body_start = after_open.find('\n').map_or(0, |i| i + 1);
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// Decode a response body into facts.
///
/// # Errors
///
/// Returns [`TransportError::Malformed`] when no JSON object is found or it
/// does not decode as facts.
pub fn parse_facts(body: &str) -> Result<RawFacts, TransportError> {
    let json = extract_json(body)
        .ok_or_else(|| TransportError::malformed("response contains no JSON object"))?;
    serde_json::from_str(json)
        .map_err(|e| TransportError::malformed(format!("response is not a facts object: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::bare(r#"{"a":1}"#, r#"{"a":1}"#)]
    #[case::preamble("Here is the data:\n{\"a\":1}\nHope this helps.", r#"{"a":1}"#)]
    #[case::fenced("```json\n{\"a\":{\"b\":2}}\n```", "{\"a\":{\"b\":2}}")]
    #[case::fenced_with_prose("Sure!\n```\n{\"a\":1}\n```\nDone.", r#"{"a":1}"#)]
    #[case::brace_in_trailer(
        "{\"a\":{\"b\":2}}\nNote: figures are in {USD millions}.",
        "{\"a\":{\"b\":2}}"
    )]
    #[case::brace_in_preamble("Results for {indication X}:\n{\"a\":1}", r#"{"a":1}"#)]
    #[case::two_objects(r#"{"a":1} and {"b":2}"#, r#"{"a":1}"#)]
    fn extracts_first_complete_object(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(extract_json(body), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("no json here")]
    #[case("} backwards {")]
    fn no_object_yields_none(#[case] body: &str) {
        assert_eq!(extract_json(body), None);
    }

    #[rstest]
    #[case::no_object("I could not find any data.")]
    #[case::wrong_shape(r#"{"deals": "not a list"}"#)]
    fn parse_failure_is_malformed(#[case] body: &str) {
        let err = parse_facts(body).unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)));
    }

    #[rstest]
    #[case::brace_in_trailer(
        "{\"market\":{\"peak_revenue_usd_m\":4500}}\nNote: figures are in {USD millions}."
    )]
    #[case::brace_in_preamble(
        "Results for {indication X}:\n{\"market\":{\"peak_revenue_usd_m\":4500}}"
    )]
    fn prose_braces_do_not_break_parsing(#[case] body: &str) {
        let facts = parse_facts(body).unwrap();
        assert_eq!(facts.market.peak_revenue_usd_m, Some(4500.0));
    }

    #[test]
    fn fenced_facts_parse() {
        let facts = parse_facts(
            "```json\n{\"market\": {\"peak_revenue_usd_m\": \"4,500\"}}\n```",
        )
        .unwrap();
        assert_eq!(facts.market.peak_revenue_usd_m, Some(4500.0));
    }
}
