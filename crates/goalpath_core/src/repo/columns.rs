//! Column codecs shared by the SQLite repositories.

use super::error::{RepoError, RepoResult};
use crate::recurrence::{format_iso_date, parse_iso_date, WeekdaySet};
use chrono::NaiveDate;
use uuid::Uuid;

pub(super) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(super) fn parse_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    parse_iso_date(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid date value `{value}` in {column}")))
}

pub(super) fn date_to_db(date: NaiveDate) -> String {
    format_iso_date(date)
}

// Stored as comma-separated Sunday-based indices; the empty string is an
// empty (but present) weekly selection.
pub(super) fn days_of_week_to_db(days: WeekdaySet) -> String {
    days.indices()
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub(super) fn parse_days_of_week(value: &str, column: &str) -> RepoResult<WeekdaySet> {
    let invalid = || RepoError::InvalidData(format!("invalid weekday set `{value}` in {column}"));
    let indices = value
        .split(',')
        .filter(|part| !part.is_empty())
        .map(|part| part.trim().parse::<u8>().map_err(|_| invalid()))
        .collect::<RepoResult<Vec<_>>>()?;
    WeekdaySet::from_indices(&indices).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::{days_of_week_to_db, parse_days_of_week};
    use crate::recurrence::WeekdaySet;

    #[test]
    fn days_of_week_column_roundtrip_keeps_empty_set() {
        let empty = WeekdaySet::EMPTY;
        assert_eq!(days_of_week_to_db(empty), "");
        assert_eq!(parse_days_of_week("", "t.days").unwrap(), empty);

        let mwf = WeekdaySet::from_indices(&[5, 1, 3]).unwrap();
        assert_eq!(days_of_week_to_db(mwf), "1,3,5");
        assert_eq!(parse_days_of_week("1,3,5", "t.days").unwrap(), mwf);
    }

    #[test]
    fn parse_days_of_week_rejects_garbage() {
        assert!(parse_days_of_week("1,x", "t.days").is_err());
        assert!(parse_days_of_week("9", "t.days").is_err());
    }
}
