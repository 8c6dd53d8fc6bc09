//! Aggregator Module
//! Groups the augmented table by derived keys and sums Hours Viewed.
//!
//! Month and weekday results are reindexed over their full fixed domains
//! (1-12, Monday-Sunday) with absent groups at zero, so charts always show
//! a complete axis.

use polars::prelude::*;
use thiserror::Error;

use crate::calendar::{Season, WEEKDAY_ORDER};
use crate::data::{HOURS_VIEWED, NEAR_HOLIDAY, RELEASE_DATE, RELEASE_DAY, RELEASE_MONTH, TITLE};

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Per-month release counts and summed hours, reindexed over months 1-12.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlyStats {
    pub hours: [f64; 12],
    pub releases: [u64; 12],
}

/// Per-weekday release counts and summed hours, in Monday-Sunday order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeekdayStats {
    pub hours: [f64; 7],
    pub releases: [u64; 7],
}

/// Sum Hours Viewed per distinct value of `key`, skipping null keys.
fn sum_by(df: &DataFrame, key: &str) -> Result<Vec<(String, f64)>, AggregateError> {
    let grouped = df
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg([col(HOURS_VIEWED).sum().alias("hours")])
        .collect()?;

    let keys = grouped.column(key)?;
    let hours = grouped.column("hours")?.f64()?;

    let mut pairs = Vec::with_capacity(grouped.height());
    for i in 0..grouped.height() {
        if let (Ok(k), Some(v)) = (keys.get(i), hours.get(i)) {
            pairs.push((k.to_string().trim_matches('"').to_string(), v));
        }
    }
    Ok(pairs)
}

/// Total hours per content type, key-ascending (Movie before Show).
pub fn hours_by_content_type(df: &DataFrame) -> Result<Vec<(String, f64)>, AggregateError> {
    let mut pairs = sum_by(df, crate::data::CONTENT_TYPE)?;
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(pairs)
}

/// Total hours per language indicator, descending by hours.
pub fn hours_by_language(df: &DataFrame) -> Result<Vec<(String, f64)>, AggregateError> {
    let mut pairs = sum_by(df, crate::data::LANGUAGE)?;
    pairs.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    Ok(pairs)
}

/// Total hours per season in fixed Winter/Spring/Summer/Fall order,
/// zero-filled for absent seasons.
pub fn hours_by_season(df: &DataFrame) -> Result<Vec<(String, f64)>, AggregateError> {
    let pairs = sum_by(df, crate::data::RELEASE_SEASON)?;
    Ok(Season::ORDER
        .iter()
        .map(|season| {
            let total = pairs
                .iter()
                .find(|(name, _)| name == season.name())
                .map(|(_, v)| *v)
                .unwrap_or(0.0);
            (season.name().to_string(), total)
        })
        .collect())
}

/// Total hours per holiday label, key-ascending.
pub fn hours_by_holiday(df: &DataFrame) -> Result<Vec<(String, f64)>, AggregateError> {
    let mut pairs = sum_by(df, NEAR_HOLIDAY)?;
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(pairs)
}

/// Release counts and summed hours per month, reindexed over 1-12.
pub fn monthly_stats(df: &DataFrame) -> Result<MonthlyStats, AggregateError> {
    let grouped = df
        .clone()
        .lazy()
        .filter(col(RELEASE_MONTH).is_not_null())
        .group_by([col(RELEASE_MONTH)])
        .agg([col(HOURS_VIEWED).sum().alias("hours"), len().alias("releases")])
        .collect()?;

    let months = grouped.column(RELEASE_MONTH)?.i32()?;
    let hours = grouped.column("hours")?.f64()?;
    let releases = grouped.column("releases")?.u32()?;

    let mut stats = MonthlyStats::default();
    for i in 0..grouped.height() {
        let Some(month) = months.get(i) else { continue };
        if !(1..=12).contains(&month) {
            continue;
        }
        let idx = (month - 1) as usize;
        stats.hours[idx] = hours.get(i).unwrap_or(0.0);
        stats.releases[idx] = releases.get(i).unwrap_or(0) as u64;
    }
    Ok(stats)
}

/// Release counts and summed hours per weekday, in Monday-Sunday order.
pub fn weekday_stats(df: &DataFrame) -> Result<WeekdayStats, AggregateError> {
    let grouped = df
        .clone()
        .lazy()
        .filter(col(RELEASE_DAY).is_not_null())
        .group_by([col(RELEASE_DAY)])
        .agg([col(HOURS_VIEWED).sum().alias("hours"), len().alias("releases")])
        .collect()?;

    let days = grouped.column(RELEASE_DAY)?.str()?;
    let hours = grouped.column("hours")?.f64()?;
    let releases = grouped.column("releases")?.u32()?;

    let mut stats = WeekdayStats::default();
    for i in 0..grouped.height() {
        let Some(day) = days.get(i) else { continue };
        let Some(idx) = WEEKDAY_ORDER.iter().position(|d| *d == day) else {
            continue;
        };
        stats.hours[idx] = hours.get(i).unwrap_or(0.0);
        stats.releases[idx] = releases.get(i).unwrap_or(0) as u64;
    }
    Ok(stats)
}

/// Top `n` records by raw Hours Viewed: stable descending sort, so ties
/// keep their original row order. Null hours sort last.
pub fn top_titles(df: &DataFrame, n: usize) -> Result<DataFrame, AggregateError> {
    let sorted = df.sort(
        [HOURS_VIEWED],
        SortMultipleOptions::default()
            .with_order_descending(true)
            .with_nulls_last(true)
            .with_maintain_order(true),
    )?;
    Ok(sorted.head(Some(n)))
}

/// All rows released within a holiday window, with the columns the holiday
/// summary table shows.
pub fn holiday_releases(df: &DataFrame) -> Result<DataFrame, AggregateError> {
    let filtered = df
        .clone()
        .lazy()
        .filter(col(NEAR_HOLIDAY).is_not_null())
        .select([
            col(TITLE),
            col(RELEASE_DATE),
            col(HOURS_VIEWED),
            col(NEAR_HOLIDAY),
        ])
        .collect()?;
    Ok(filtered)
}
