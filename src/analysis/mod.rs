//! Analysis module - grouped aggregation, top-N selection and the pivot view

pub mod aggregate;
pub mod pivot;

pub use aggregate::{
    holiday_releases, hours_by_content_type, hours_by_holiday, hours_by_language, hours_by_season,
    monthly_stats, top_titles, weekday_stats, MonthlyStats, WeekdayStats,
};
pub use pivot::{monthly_hours_by_type, MonthlyByType};
