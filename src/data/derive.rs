//! Derivation Step
//! Computes the release-calendar columns attached to each record.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use thiserror::Error;
use tracing::{error, warn};

use crate::calendar::{holiday_calendar, nearest_holiday, weekday_name, Season};
use crate::data::{NEAR_HOLIDAY, RELEASE_DATE, RELEASE_DAY, RELEASE_MONTH, RELEASE_SEASON};

#[derive(Error, Debug)]
pub enum DeriveError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Outcome of the derivation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeriveReport {
    pub rows: usize,
    pub undated: usize,
}

/// Date formats accepted for Release Date.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Append Release Month, Release Season, Release Day and Near Holiday.
///
/// Rows whose Release Date fails to parse get nulls in all four columns and
/// are counted as undated; date-based aggregates skip them. Returns a new
/// DataFrame with the columns attached, leaving the input untouched.
pub fn with_release_calendar(df: &DataFrame) -> Result<(DataFrame, DeriveReport), DeriveError> {
    let column = df.column(RELEASE_DATE)?;
    let casted;
    let dates = match column.dtype() {
        DataType::String => column.str()?,
        _ => {
            casted = column.cast(&DataType::String)?;
            casted.str()?
        }
    };

    let holidays = holiday_calendar();

    let height = df.height();
    let mut months: Vec<Option<i32>> = Vec::with_capacity(height);
    let mut seasons: Vec<Option<&'static str>> = Vec::with_capacity(height);
    let mut days: Vec<Option<&'static str>> = Vec::with_capacity(height);
    let mut near: Vec<Option<&'static str>> = Vec::with_capacity(height);

    let mut report = DeriveReport {
        rows: height,
        undated: 0,
    };

    for raw in dates.into_iter() {
        let Some(date) = raw.and_then(parse_release_date) else {
            report.undated += 1;
            months.push(None);
            seasons.push(None);
            days.push(None);
            near.push(None);
            continue;
        };

        let month = date.month();
        let Some(season) = Season::from_month(month) else {
            // Unreachable for a parsed date; treat the row as undated.
            error!(month, "month outside 1-12, excluding row from date aggregates");
            report.undated += 1;
            months.push(None);
            seasons.push(None);
            days.push(None);
            near.push(None);
            continue;
        };

        months.push(Some(month as i32));
        seasons.push(Some(season.name()));
        days.push(Some(weekday_name(date)));
        near.push(nearest_holiday(date, &holidays));
    }

    let augmented = df.hstack(&[
        Column::new(RELEASE_MONTH.into(), months),
        Column::new(RELEASE_SEASON.into(), seasons),
        Column::new(RELEASE_DAY.into(), days),
        Column::new(NEAR_HOLIDAY.into(), near),
    ])?;

    if report.undated > 0 {
        warn!(
            undated = report.undated,
            "rows without a parsable Release Date"
        );
    }

    Ok((augmented, report))
}

/// Drop every row without a Release Month (the `--undated global` policy).
pub fn drop_undated(df: &DataFrame) -> Result<DataFrame, DeriveError> {
    let filtered = df
        .clone()
        .lazy()
        .filter(col(RELEASE_MONTH).is_not_null())
        .collect()?;
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HOURS_VIEWED;

    fn input(dates: Vec<Option<&str>>) -> DataFrame {
        let hours: Vec<f64> = (0..dates.len()).map(|i| (i + 1) as f64 * 100.0).collect();
        DataFrame::new(vec![
            Column::new(RELEASE_DATE.into(), dates),
            Column::new(HOURS_VIEWED.into(), hours),
        ])
        .unwrap()
    }

    #[test]
    fn derives_calendar_columns_from_iso_dates() {
        let df = input(vec![Some("2023-12-22"), Some("2023-05-04")]);
        let (augmented, report) = with_release_calendar(&df).unwrap();

        assert_eq!(report.undated, 0);

        let months = augmented.column(RELEASE_MONTH).unwrap().i32().unwrap();
        assert_eq!(months.get(0), Some(12));
        assert_eq!(months.get(1), Some(5));

        let seasons = augmented.column(RELEASE_SEASON).unwrap().str().unwrap();
        assert_eq!(seasons.get(0), Some("Winter"));
        assert_eq!(seasons.get(1), Some("Spring"));

        let days = augmented.column(RELEASE_DAY).unwrap().str().unwrap();
        assert_eq!(days.get(0), Some("Friday"));
        assert_eq!(days.get(1), Some("Thursday"));

        let near = augmented.column(NEAR_HOLIDAY).unwrap().str().unwrap();
        assert_eq!(near.get(0), Some("Christmas Day"));
        assert_eq!(near.get(1), None);
    }

    #[test]
    fn accepts_us_style_dates() {
        let df = input(vec![Some("7/4/2023")]);
        let (augmented, report) = with_release_calendar(&df).unwrap();
        assert_eq!(report.undated, 0);
        let near = augmented.column(NEAR_HOLIDAY).unwrap().str().unwrap();
        assert_eq!(near.get(0), Some("Independence Day"));
    }

    #[test]
    fn counts_unparsable_dates_and_leaves_nulls() {
        let df = input(vec![Some("2023-01-01"), Some("not a date"), None]);
        let (augmented, report) = with_release_calendar(&df).unwrap();

        assert_eq!(report.rows, 3);
        assert_eq!(report.undated, 2);

        let months = augmented.column(RELEASE_MONTH).unwrap().i32().unwrap();
        assert_eq!(months.get(0), Some(1));
        assert_eq!(months.get(1), None);
        assert_eq!(months.get(2), None);
    }

    #[test]
    fn drop_undated_removes_rows_without_month() {
        let df = input(vec![Some("2023-01-01"), Some("bogus")]);
        let (augmented, _) = with_release_calendar(&df).unwrap();
        let kept = drop_undated(&augmented).unwrap();
        assert_eq!(kept.height(), 1);
    }
}
