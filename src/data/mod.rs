//! Data module - CSV loading, cleaning and derived release-calendar columns

pub mod derive;
pub mod loader;

pub use derive::{drop_undated, with_release_calendar, DeriveReport};
pub use loader::{clean_hours, load_csv, CleanReport};

// Input CSV column names.
pub const TITLE: &str = "Title";
pub const CONTENT_TYPE: &str = "Content Type";
pub const LANGUAGE: &str = "Language Indicator";
pub const RELEASE_DATE: &str = "Release Date";
pub const HOURS_VIEWED: &str = "Hours Viewed";

// Derived column names.
pub const RELEASE_MONTH: &str = "Release Month";
pub const RELEASE_SEASON: &str = "Release Season";
pub const RELEASE_DAY: &str = "Release Day";
pub const NEAR_HOLIDAY: &str = "Near Holiday";
