//! Journal listing filters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::journal::types::JournalStatus;
use crate::ledger::error::LedgerError;

/// Filter for listing journal entries of a koperasi.
///
/// Both date bounds are inclusive. All statuses are listed unless `status`
/// narrows it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalFilter {
    /// Earliest transaction date.
    pub date_from: Option<NaiveDate>,
    /// Latest transaction date.
    pub date_to: Option<NaiveDate>,
    /// Only entries in this status.
    pub status: Option<JournalStatus>,
}

impl JournalFilter {
    /// Rejects a range whose start is after its end.
    pub fn validate(self) -> Result<Self, LedgerError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to)
            && from > to
        {
            return Err(LedgerError::InvalidDateRange { from, to });
        }
        Ok(self)
    }

    /// Returns true if an entry with this date and status passes the filter.
    #[must_use]
    pub fn matches(&self, entry_date: NaiveDate, status: JournalStatus) -> bool {
        self.date_from.is_none_or(|from| entry_date >= from)
            && self.date_to.is_none_or(|to| entry_date <= to)
            && self.status.is_none_or(|s| s == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let filter = JournalFilter {
            date_from: Some(date(2, 1)),
            date_to: Some(date(1, 31)),
            status: None,
        };
        let err = filter.validate().unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filter = JournalFilter {
            date_from: Some(date(1, 1)),
            date_to: Some(date(1, 31)),
            status: None,
        }
        .validate()
        .unwrap();
        assert!(filter.matches(date(1, 1), JournalStatus::Draft));
        assert!(filter.matches(date(1, 31), JournalStatus::Cancelled));
        assert!(!filter.matches(date(2, 1), JournalStatus::Posted));
    }

    #[test]
    fn test_status_narrows() {
        let filter = JournalFilter {
            status: Some(JournalStatus::Posted),
            ..JournalFilter::default()
        };
        assert!(filter.matches(date(5, 5), JournalStatus::Posted));
        assert!(!filter.matches(date(5, 5), JournalStatus::Draft));
    }
}
