//! Pivot View Module
//! Two-dimensional month x content-type table of summed Hours Viewed.

use polars::prelude::*;
use thiserror::Error;

use crate::data::{CONTENT_TYPE, HOURS_VIEWED, RELEASE_MONTH};

#[derive(Error, Debug)]
pub enum PivotError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Summed hours per (month, content type) combination.
///
/// Rows are the fixed month domain 1-12; columns the distinct content
/// types, sorted. Missing combinations are zero, not null: the cells feed
/// line charts and totals, and zero keeps that arithmetic closed.
#[derive(Debug, Clone, Default)]
pub struct MonthlyByType {
    pub types: Vec<String>,
    hours: Vec<[f64; 12]>,
}

impl MonthlyByType {
    /// Summed hours for `month` (1-12) and the type at `type_idx`.
    pub fn cell(&self, month: u32, type_idx: usize) -> f64 {
        self.hours[type_idx][(month - 1) as usize]
    }

    /// (type name, 12 monthly sums) pairs, one per content type.
    pub fn series(&self) -> impl Iterator<Item = (&str, &[f64; 12])> {
        self.types
            .iter()
            .map(String::as_str)
            .zip(self.hours.iter())
    }
}

/// Build the month x content-type pivot, skipping rows without a month.
pub fn monthly_hours_by_type(df: &DataFrame) -> Result<MonthlyByType, PivotError> {
    let grouped = df
        .clone()
        .lazy()
        .filter(col(RELEASE_MONTH).is_not_null())
        .group_by([col(RELEASE_MONTH), col(CONTENT_TYPE)])
        .agg([col(HOURS_VIEWED).sum().alias("hours")])
        .collect()?;

    let months = grouped.column(RELEASE_MONTH)?.i32()?;
    let types = grouped.column(CONTENT_TYPE)?;
    let hours = grouped.column("hours")?.f64()?;

    let mut pivot = MonthlyByType::default();
    for i in 0..grouped.height() {
        let (Some(month), Ok(type_value), Some(value)) = (months.get(i), types.get(i), hours.get(i))
        else {
            continue;
        };
        if !(1..=12).contains(&month) || type_value.is_null() {
            continue;
        }
        let type_name = type_value.to_string().trim_matches('"').to_string();

        let type_idx = match pivot.types.iter().position(|t| *t == type_name) {
            Some(idx) => idx,
            None => {
                pivot.types.push(type_name);
                pivot.hours.push([0.0; 12]);
                pivot.types.len() - 1
            }
        };
        pivot.hours[type_idx][(month - 1) as usize] = value;
    }

    // Deterministic column order.
    let mut order: Vec<usize> = (0..pivot.types.len()).collect();
    order.sort_by(|a, b| pivot.types[*a].cmp(&pivot.types[*b]));
    let types = order.iter().map(|&i| pivot.types[i].clone()).collect();
    let hours = order.iter().map(|&i| pivot.hours[i]).collect();

    Ok(MonthlyByType { types, hours })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                RELEASE_MONTH.into(),
                vec![Some(1), Some(1), Some(6), None],
            ),
            Column::new(CONTENT_TYPE.into(), vec!["Show", "Movie", "Show", "Movie"]),
            Column::new(HOURS_VIEWED.into(), vec![500.0, 100.0, 250.0, 999.0]),
        ])
        .unwrap()
    }

    #[test]
    fn pivots_summed_hours_by_month_and_type() {
        let pivot = monthly_hours_by_type(&table()).unwrap();
        assert_eq!(pivot.types, vec!["Movie", "Show"]);
        assert_eq!(pivot.cell(1, 0), 100.0);
        assert_eq!(pivot.cell(1, 1), 500.0);
        assert_eq!(pivot.cell(6, 1), 250.0);
    }

    #[test]
    fn missing_combinations_are_zero() {
        let pivot = monthly_hours_by_type(&table()).unwrap();
        assert_eq!(pivot.cell(6, 0), 0.0);
        assert_eq!(pivot.cell(12, 1), 0.0);
        for (_, sums) in pivot.series() {
            assert_eq!(sums.len(), 12);
        }
    }

    #[test]
    fn undated_rows_are_excluded() {
        let pivot = monthly_hours_by_type(&table()).unwrap();
        let movie_total: f64 = pivot.hours[0].iter().sum();
        assert_eq!(movie_total, 100.0);
    }
}
