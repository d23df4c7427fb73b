//! Row parsing helpers.

use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// Parse a TEXT timestamp written either by `to_rfc3339()` or by SQLite's
/// `datetime('now')`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidRow`] if neither format matches.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::InvalidRow(format!("bad timestamp '{s}': {e}")))
}

/// Convert a stored INTEGER back into an unsigned count.
///
/// # Errors
///
/// Returns [`StoreError::InvalidRow`] for negative or oversized values.
pub fn to_unsigned<T: TryFrom<i64>>(column: &str, value: i64) -> Result<T, StoreError> {
    T::try_from(value)
        .map_err(|_| StoreError::InvalidRow(format!("{column} out of range: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_timestamp_formats_parse() {
        let a = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let b = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert_eq!(to_unsigned::<u32>("source_count", 3).unwrap(), 3);
        assert!(to_unsigned::<u32>("source_count", -1).is_err());
    }
}
