//! Release Calendar Module
//! Season classification, weekday ordering and holiday-window matching.

use chrono::{Datelike, NaiveDate};

/// Reference year for the fixed holiday table.
pub const HOLIDAY_YEAR: i32 = 2023;

/// Days on either side of a holiday that count as "near" (inclusive).
pub const HOLIDAY_WINDOW_DAYS: i64 = 3;

/// Weekday names in calendar order, used to reindex weekday aggregates.
pub const WEEKDAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Month abbreviations for chart axes, indexed by month - 1.
pub const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Release season, in the fixed display order used by seasonal charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Fixed display order: Winter, Spring, Summer, Fall.
    pub const ORDER: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Classify a month (1-12) into its season.
    ///
    /// Returns `None` outside 1-12; months derived from valid dates never
    /// hit that branch, so a `None` at a call site is an invariant violation.
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

/// Full weekday name for a date, per `WEEKDAY_ORDER`.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_ORDER[date.weekday().num_days_from_monday() as usize]
}

/// The fixed 2023 holiday table, in declaration order.
///
/// Declaration order is the tie-break when a release date falls inside two
/// holiday windows: the first match wins.
pub fn holiday_calendar() -> Vec<(&'static str, NaiveDate)> {
    [
        ("New Year's Day", (1, 1)),
        ("Valentine's Day", (2, 14)),
        ("Independence Day", (7, 4)),
        ("Halloween", (10, 31)),
        ("Christmas Day", (12, 25)),
    ]
    .into_iter()
    .filter_map(|(name, (m, d))| NaiveDate::from_ymd_opt(HOLIDAY_YEAR, m, d).map(|dt| (name, dt)))
    .collect()
}

/// Return the first holiday whose date lies within `HOLIDAY_WINDOW_DAYS`
/// days (inclusive, either side) of `release`, or `None`.
///
/// Linear scan; five comparisons per record at this scale.
pub fn nearest_holiday(
    release: NaiveDate,
    holidays: &[(&'static str, NaiveDate)],
) -> Option<&'static str> {
    holidays
        .iter()
        .find(|(_, holiday)| (*holiday - release).num_days().abs() <= HOLIDAY_WINDOW_DAYS)
        .map(|(name, _)| *name)
}
