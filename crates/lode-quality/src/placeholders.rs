//! Stand-in values the retrieval service emits under uncertainty.

/// Numbers that show up verbatim when the service invents a figure.
pub const PLACEHOLDER_NUMBERS: &[f64] = &[1234.0, 9999.0, 12345.0, 99999.0, 123_456.0, 999_999.0];

/// Whole-value text placeholders (compared trimmed, case-insensitive).
pub const PLACEHOLDER_NAMES: &[&str] = &[
    "tbd",
    "n/a",
    "na",
    "unknown",
    "placeholder",
    "example",
    "lorem ipsum",
    "company x",
    "drug x",
    "asset x",
    "xxx",
];

/// Phrases that mark free text as template filler wherever they occur.
pub const PLACEHOLDER_PHRASES: &[&str] = &[
    "lorem ipsum",
    "placeholder",
    "[insert",
    "to be determined",
];

#[must_use]
pub fn is_placeholder_number(value: f64) -> bool {
    PLACEHOLDER_NUMBERS.contains(&value)
}

#[must_use]
pub fn is_placeholder_name(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    PLACEHOLDER_NAMES.contains(&normalized.as_str())
}

/// The first placeholder phrase contained in `text`, if any.
#[must_use]
pub fn placeholder_phrase(text: &str) -> Option<&'static str> {
    let lowered = text.to_ascii_lowercase();
    PLACEHOLDER_PHRASES
        .iter()
        .copied()
        .find(|phrase| lowered.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_whole_value_only() {
        assert!(is_placeholder_name("  TBD "));
        assert!(is_placeholder_name("Company X"));
        assert!(!is_placeholder_name("TBD-1204"));
    }

    #[test]
    fn phrases_match_anywhere() {
        assert_eq!(
            placeholder_phrase("Deal value [INSERT amount] for rights"),
            Some("[insert")
        );
        assert_eq!(placeholder_phrase("Licensed global rights in 2023"), None);
    }

    #[test]
    fn numbers_match_exactly() {
        assert!(is_placeholder_number(12345.0));
        assert!(!is_placeholder_number(12345.5));
    }
}
