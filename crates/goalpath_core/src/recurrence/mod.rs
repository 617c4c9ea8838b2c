//! Recurring-task date expansion.
//!
//! # Responsibility
//! - Describe how a task repeats (`RecurrenceRule`).
//! - Materialize occurrence dates inside a goal's `[start, due]` window.
//!
//! # Invariants
//! - Expansion is stateless and synchronous; callers recompute on every
//!   input change instead of merging with earlier results.

pub mod expand;
pub mod rule;

pub use expand::{
    days_in_month, expand, format_iso_date, format_iso_dates, is_supported_date,
    monthly_mode_options, parse_iso_date, week_containing, MonthlyModeOption, ISO_DATE_FORMAT,
    SUPPORTED_YEARS,
};
pub use rule::{
    MonthlyMode, RecurrenceError, RecurrenceResult, RecurrenceRule, TaskType, WeekdaySet,
};
