//! Run Summary Module
//! Printed summary tables plus the serialized summary.json artifact.

use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

use crate::data::{HOURS_VIEWED, NEAR_HOLIDAY, RELEASE_DATE, TITLE};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to write summary: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// One row of a printed title table.
#[derive(Debug, Clone, Serialize)]
pub struct TitleRow {
    pub title: String,
    pub release_date: Option<String>,
    pub hours_viewed: Option<f64>,
    pub near_holiday: Option<String>,
}

/// Everything a single run produced, written to summary.json so exclusions
/// are visible to the operator and the tables are machine-readable.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    pub bad_hours: usize,
    pub undated: usize,
    pub top_titles: Vec<TitleRow>,
    pub holiday_releases: Vec<TitleRow>,
    pub holiday_hours: Vec<(String, f64)>,
}

/// Extract printable rows from a (Title, Release Date, Hours Viewed[, Near
/// Holiday]) frame.
pub fn title_rows(df: &DataFrame) -> Result<Vec<TitleRow>, ReportError> {
    let titles = df.column(TITLE)?.str()?;
    let dates = df.column(RELEASE_DATE)?.str()?;
    let hours = df.column(HOURS_VIEWED)?.f64()?;
    let holidays = df.column(NEAR_HOLIDAY).ok().and_then(|c| c.str().ok());

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(TitleRow {
            title: titles.get(i).unwrap_or_default().to_string(),
            release_date: dates.get(i).map(str::to_string),
            hours_viewed: hours.get(i),
            near_holiday: holidays.as_ref().and_then(|ca| ca.get(i)).map(str::to_string),
        });
    }
    Ok(rows)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

pub fn print_top_titles(rows: &[TitleRow]) {
    println!("\nTop titles by Hours Viewed");
    println!("{:<52} {:>12} {:>16}", "Title", "Release", "Hours Viewed");
    for row in rows {
        println!(
            "{:<52} {:>12} {:>16.0}",
            truncate(&row.title, 50),
            row.release_date.as_deref().unwrap_or("-"),
            row.hours_viewed.unwrap_or(0.0),
        );
    }
}

pub fn print_holiday_releases(rows: &[TitleRow]) {
    println!("\nReleases within a holiday window");
    println!(
        "{:<52} {:>12} {:>16}  {}",
        "Title", "Release", "Hours Viewed", "Near Holiday"
    );
    for row in rows {
        println!(
            "{:<52} {:>12} {:>16.0}  {}",
            truncate(&row.title, 50),
            row.release_date.as_deref().unwrap_or("-"),
            row.hours_viewed.unwrap_or(0.0),
            row.near_holiday.as_deref().unwrap_or("-"),
        );
    }
}

/// Write the run summary as pretty-printed JSON.
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<(), ReportError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new(TITLE.into(), vec!["The Night Agent", "Wednesday"]),
            Column::new(
                RELEASE_DATE.into(),
                vec![Some("2023-03-23"), None],
            ),
            Column::new(HOURS_VIEWED.into(), vec![Some(812_100_000.0), None]),
            Column::new(
                NEAR_HOLIDAY.into(),
                vec![None::<&str>, None::<&str>],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn extracts_rows_with_missing_values() {
        let rows = title_rows(&frame()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "The Night Agent");
        assert_eq!(rows[0].hours_viewed, Some(812_100_000.0));
        assert_eq!(rows[1].release_date, None);
        assert_eq!(rows[1].hours_viewed, None);
    }

    #[test]
    fn works_without_a_holiday_column() {
        let df = frame().drop(NEAR_HOLIDAY).unwrap();
        let rows = title_rows(&df).unwrap();
        assert_eq!(rows[0].near_holiday, None);
    }

    #[test]
    fn writes_summary_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary = RunSummary {
            rows: 2,
            bad_hours: 0,
            undated: 1,
            top_titles: title_rows(&frame()).unwrap(),
            holiday_releases: Vec::new(),
            holiday_hours: vec![("Christmas Day".to_string(), 42.0)],
        };
        write_summary(&path, &summary).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"undated\": 1"));
        assert!(text.contains("Christmas Day"));
    }

    #[test]
    fn truncates_long_titles() {
        let long = "x".repeat(80);
        let out = truncate(&long, 50);
        assert_eq!(out.chars().count(), 50);
        assert!(out.ends_with('…'));
    }
}
