//! Timestamp encoding for `TEXT` columns.
//!
//! Timestamps are stored as RFC 3339 in UTC with fixed millisecond precision so
//! that lexical ordering in SQL matches chronological ordering.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

/// Encode a timestamp for storage.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decode a stored timestamp read from column `idx`.
///
/// # Errors
///
/// Returns a conversion error if the text is not valid RFC 3339.
pub fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
