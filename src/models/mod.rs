//! Data models for Biblioteca

pub mod book;
pub mod permission;
pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookPage, BookQuery, BookShort};
pub use permission::{Permission, PermissionSet};
pub use reservation::{BookHistory, Reservation, UserHistory};
pub use user::{User, UserSummary};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

/// `true` only for the literal string "true"; absent means false
pub(crate) fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.as_deref() == Some("true"))
}

/// Present values become `Some(value == "true")`
pub(crate) fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|v| v == "true"))
}

/// Numbers that fail to parse are treated as absent
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(|v| v.trim().parse().ok()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

fn invalid_date<E: serde::de::Error>(value: &str) -> E {
    E::custom(format!("fechaPublicacion must be a valid ISO 8601 date, got {value:?}"))
}

/// Calendar date given as `YYYY-MM-DD` or as an RFC 3339 timestamp
pub(crate) fn flexible_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_date(&value).ok_or_else(|| invalid_date(&value))
}

pub(crate) fn flexible_date_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => parse_date(&value).map(Some).ok_or_else(|| invalid_date(&value)),
    }
}

/// Query-string date filter: an empty value means no filter
pub(crate) fn query_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => parse_date(value.trim())
            .map(Some)
            .ok_or_else(|| invalid_date(&value)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(1605, 1, 1);
        assert_eq!(parse_date("1605-01-01"), expected);
        assert_eq!(parse_date("1605-01-01T10:00:00+00:00"), expected);
        assert_eq!(parse_date("01/01/1605"), None);
    }
}
