//! Query parameter parsing shared by the financial routes.

use chrono::{Datelike, NaiveDate};
use koperasi_shared::types::KoperasiId;
use serde::Deserialize;

use crate::error::ApiError;

/// Date format of every date query parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `?koperasi_id=` on routes that address a record by id.
///
/// Omitted means the caller's own koperasi. Naming another one requires the
/// tenant administrator role, as it does for list routes and request bodies.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScopeQuery {
    /// Koperasi the record belongs to.
    pub koperasi_id: Option<KoperasiId>,
}

/// Parses an optional `YYYY-MM-DD` parameter. Absent or blank yields `None`.
///
/// # Errors
///
/// Returns 400 naming the parameter if the value is not a calendar date.
pub fn parse_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                ApiError::validation(format!(
                    "parameter '{name}' must be a date in YYYY-MM-DD format, got '{value}'"
                ))
            }),
    }
}

/// Parses a date parameter, falling back to `default` when absent.
///
/// # Errors
///
/// Same as [`parse_date`].
pub fn date_or(name: &str, raw: Option<&str>, default: NaiveDate) -> Result<NaiveDate, ApiError> {
    Ok(parse_date(name, raw)?.unwrap_or(default))
}

/// January 1 of the year `date` falls in.
#[must_use]
pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    date.with_month(1)
        .and_then(|d| d.with_day(1))
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("2026-02-28"), NaiveDate::from_ymd_opt(2026, 2, 28))]
    #[case(Some(" 2026-01-01 "), NaiveDate::from_ymd_opt(2026, 1, 1))]
    fn test_parse_date_accepts(#[case] raw: Option<&str>, #[case] expected: Option<NaiveDate>) {
        assert_eq!(parse_date("tanggal", raw).unwrap(), expected);
    }

    #[rstest]
    #[case("2026-02-30")]
    #[case("28-02-2026")]
    #[case("kemarin")]
    fn test_parse_date_rejects(#[case] raw: &str) {
        let err = parse_date("tanggal", Some(raw)).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_start_of_year() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 17).unwrap();
        assert_eq!(start_of_year(date), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
