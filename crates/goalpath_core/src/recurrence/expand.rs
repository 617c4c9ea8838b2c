//! Recurrence expansion over a goal date window.
//!
//! # Responsibility
//! - Turn a `RecurrenceRule` plus `[start, due]` into concrete dates.
//! - Report which monthly modes produce at least one date.
//!
//! # Invariants
//! - Output is ascending, duplicate-free and inside `[start, due]`.
//! - `due < start` is rejected, never mapped to an empty list.
//! - Expansion is pure: same inputs, same output.

use super::rule::{MonthlyMode, RecurrenceError, RecurrenceResult, RecurrenceRule, WeekdaySet};
use chrono::{Datelike, NaiveDate, Weekday};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Wire/storage date format (`yyyy-MM-dd`).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
/// Years whose `yyyy-MM-dd` text sorts in date order.
pub const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

// chrono's `%m`/`%d` also take unpadded fields and `%Y` takes signs.
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid iso date regex"));

/// Picker state for one monthly mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyModeOption {
    pub mode: MonthlyMode,
    /// `false` when the mode yields no date inside the window.
    pub available: bool,
}

/// Expands `rule` into occurrence dates inside `[start, due]`.
///
/// # Errors
/// - `InvalidRange` when `due < start`.
/// - `DateOutsideRange` when a `Normal` rule carries a date outside the window.
pub fn expand(
    start: NaiveDate,
    due: NaiveDate,
    rule: &RecurrenceRule,
) -> RecurrenceResult<Vec<NaiveDate>> {
    ensure_range(start, due)?;

    let dates = match rule {
        RecurrenceRule::Normal { dates } => picked_dates(start, due, dates)?,
        RecurrenceRule::Daily => days_between(start, due).collect(),
        RecurrenceRule::Weekly { days } => weekly_dates(start, due, *days),
        RecurrenceRule::Monthly { mode } => monthly_dates(start, due, *mode),
    };

    debug!(
        "event=recurrence_expand module=recurrence status=ok type={} span_days={} count={}",
        rule.task_type(),
        (due - start).num_days() + 1,
        dates.len()
    );
    Ok(dates)
}

/// Availability of every monthly mode for the window, in picker order.
pub fn monthly_mode_options(
    start: NaiveDate,
    due: NaiveDate,
) -> RecurrenceResult<Vec<MonthlyModeOption>> {
    ensure_range(start, due)?;
    Ok(MonthlyMode::ALL
        .into_iter()
        .map(|mode| MonthlyModeOption {
            mode,
            available: !monthly_dates(start, due, mode).is_empty(),
        })
        .collect())
}

/// Sunday-started week (7 dates) that contains `date`.
pub fn week_containing(date: NaiveDate) -> Vec<NaiveDate> {
    date.week(Weekday::Sun).first_day().iter_days().take(7).collect()
}

/// Number of days in `month` (1-based) of `year`. Months outside `1..=12`
/// yield 0.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn format_iso_dates(dates: &[NaiveDate]) -> Vec<String> {
    dates.iter().copied().map(format_iso_date).collect()
}

/// Parses a strict `yyyy-MM-dd` date, ignoring surrounding whitespace.
pub fn parse_iso_date(value: &str) -> RecurrenceResult<NaiveDate> {
    let trimmed = value.trim();
    if !ISO_DATE_RE.is_match(trimmed) {
        return Err(RecurrenceError::InvalidDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .map_err(|_| RecurrenceError::InvalidDate(trimmed.to_string()))
}

pub fn is_supported_date(date: NaiveDate) -> bool {
    SUPPORTED_YEARS.contains(&date.year())
}

fn ensure_range(start: NaiveDate, due: NaiveDate) -> RecurrenceResult<()> {
    if due < start {
        return Err(RecurrenceError::InvalidRange { start, due });
    }
    Ok(())
}

fn days_between(start: NaiveDate, due: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= due)
}

fn picked_dates(
    start: NaiveDate,
    due: NaiveDate,
    picked: &[NaiveDate],
) -> RecurrenceResult<Vec<NaiveDate>> {
    let mut dates = picked.to_vec();
    dates.sort_unstable();
    dates.dedup();

    if let Some(&date) = dates.iter().find(|date| **date < start || **date > due) {
        return Err(RecurrenceError::DateOutsideRange { date, start, due });
    }
    Ok(dates)
}

// Walking the window directly is equivalent to building Sunday-started week
// grids and dropping the out-of-range edges.
fn weekly_dates(start: NaiveDate, due: NaiveDate, days: WeekdaySet) -> Vec<NaiveDate> {
    if days.is_empty() {
        return Vec::new();
    }
    days_between(start, due)
        .filter(|day| days.contains(day.weekday()))
        .collect()
}

fn monthly_dates(start: NaiveDate, due: NaiveDate, mode: MonthlyMode) -> Vec<NaiveDate> {
    months_between(start, due)
        .filter_map(|(year, month)| {
            NaiveDate::from_ymd_opt(year, month, mode.day_for(days_in_month(year, month)))
        })
        .filter(|date| *date >= start && *date <= due)
        .collect()
}

fn months_between(start: NaiveDate, due: NaiveDate) -> impl Iterator<Item = (i32, u32)> {
    let first = month_index(start);
    let last = month_index(due);
    (first..=last).map(|index| {
        // rem_euclid(12) is always 0..=11.
        (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
    })
}

fn month_index(date: NaiveDate) -> i32 {
    // month0() is always 0..=11.
    date.year() * 12 + date.month0() as i32
}
