//! CSV Data Loader Module
//! Handles CSV file loading and Hours Viewed cleaning using Polars.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::data::{CONTENT_TYPE, HOURS_VIEWED, LANGUAGE, RELEASE_DATE, TITLE};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Columns the input CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [TITLE, CONTENT_TYPE, LANGUAGE, RELEASE_DATE, HOURS_VIEWED];

/// Outcome of the Hours Viewed cleaning pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanReport {
    pub rows: usize,
    pub bad_hours: usize,
}

/// Load a CSV file using Polars and verify the expected columns exist.
pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    // Use lazy evaluation for memory efficiency, then collect
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    for required in REQUIRED_COLUMNS {
        if df.column(required).is_err() {
            return Err(LoaderError::MissingColumn(required.to_string()));
        }
    }

    info!(rows = df.height(), "loaded {}", path.display());
    Ok(df)
}

/// Parse the Hours Viewed column (text with thousands separators) to Float64.
///
/// Values that still fail to parse after separator removal become null and
/// are counted in the report rather than silently coerced. Returns a new
/// DataFrame; the input is left untouched.
pub fn clean_hours(df: &DataFrame) -> Result<(DataFrame, CleanReport), LoaderError> {
    let column = df.column(HOURS_VIEWED)?;

    let mut report = CleanReport {
        rows: df.height(),
        bad_hours: 0,
    };

    let parsed = match column.dtype() {
        DataType::String => {
            let ca = column.str()?;
            let values: Vec<Option<f64>> = ca
                .into_iter()
                .map(|value| {
                    let parsed =
                        value.and_then(|v| v.replace(',', "").trim().parse::<f64>().ok());
                    if parsed.is_none() {
                        report.bad_hours += 1;
                    }
                    parsed
                })
                .collect();
            Column::new(HOURS_VIEWED.into(), values)
        }
        // Some exports carry the column already numeric; just widen it.
        _ => column.cast(&DataType::Float64)?,
    };

    let mut cleaned = df.clone();
    cleaned.with_column(parsed)?;

    if report.bad_hours > 0 {
        warn!(
            bad_hours = report.bad_hours,
            "unparsable Hours Viewed values set to null"
        );
    }

    Ok((cleaned, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Title,Content Type,Language Indicator,Release Date,Hours Viewed"
        )
        .unwrap();
        writeln!(file, "The Night Agent,Show,English,2023-03-23,\"812,100,000\"").unwrap();
        writeln!(file, "Queen Charlotte,Show,English,2023-05-04,\"503,000,000\"").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_csv_with_required_columns() {
        let file = sample_csv();
        let df = load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        for required in REQUIRED_COLUMNS {
            assert!(df.column(required).is_ok(), "missing {required}");
        }
    }

    #[test]
    fn rejects_csv_missing_a_required_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Title,Hours Viewed").unwrap();
        writeln!(file, "Something,\"1,000\"").unwrap();
        file.flush().unwrap();

        match load_csv(file.path()) {
            Err(LoaderError::MissingColumn(name)) => assert_eq!(name, CONTENT_TYPE),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn strips_thousands_separators() {
        let df = DataFrame::new(vec![Column::new(
            HOURS_VIEWED.into(),
            vec!["1,234,567", "900", "12,000.5"],
        )])
        .unwrap();

        let (cleaned, report) = clean_hours(&df).unwrap();
        let hours = cleaned.column(HOURS_VIEWED).unwrap().f64().unwrap();
        assert_eq!(hours.get(0), Some(1_234_567.0));
        assert_eq!(hours.get(1), Some(900.0));
        assert_eq!(hours.get(2), Some(12_000.5));
        assert_eq!(report.bad_hours, 0);
        assert_eq!(report.rows, 3);
    }

    #[test]
    fn counts_unparsable_values_as_null() {
        let df = DataFrame::new(vec![Column::new(
            HOURS_VIEWED.into(),
            vec![Some("1,000"), Some("n/a"), None],
        )])
        .unwrap();

        let (cleaned, report) = clean_hours(&df).unwrap();
        let hours = cleaned.column(HOURS_VIEWED).unwrap().f64().unwrap();
        assert_eq!(hours.get(0), Some(1000.0));
        assert_eq!(hours.get(1), None);
        assert_eq!(hours.get(2), None);
        assert_eq!(report.bad_hours, 2);
    }
}
