//! Viewtrends - Netflix Viewership CSV Analysis & Chart Generator
//!
//! A single-run batch tool: load the viewership CSV, clean Hours Viewed,
//! derive release-calendar columns, aggregate, and render charts.

mod analysis;
mod calendar;
mod charts;
mod data;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use charts::{ORANGE, SALMON, SKYBLUE};
use report::RunSummary;

/// What to do with rows whose Release Date does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UndatedPolicy {
    /// Keep them in non-date aggregates; date aggregates always skip them.
    Scoped,
    /// Drop them from every aggregate right after derivation.
    Global,
}

#[derive(Parser, Debug)]
#[command(
    name = "viewtrends",
    about = "Netflix viewership CSV analysis & chart generation"
)]
struct Args {
    /// Input CSV with Title, Content Type, Language Indicator, Release Date
    /// and Hours Viewed columns
    #[arg(default_value = "netflix_content_2023.csv")]
    input: PathBuf,

    /// Directory for rendered charts and summary.json
    #[arg(long, default_value = "charts")]
    out_dir: PathBuf,

    /// How many titles the top-titles table keeps
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Handling of rows without a parsable Release Date
    #[arg(long, value_enum, default_value_t = UndatedPolicy::Scoped)]
    undated: UndatedPolicy,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let raw = data::load_csv(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    let (cleaned, clean_report) = data::clean_hours(&raw)?;
    let (augmented, derive_report) = data::with_release_calendar(&cleaned)?;

    let table = match args.undated {
        UndatedPolicy::Scoped => augmented,
        UndatedPolicy::Global => data::drop_undated(&augmented)?,
    };

    render_charts(args, &table)?;

    let top = analysis::top_titles(&table, args.top)?;
    let top_rows = report::title_rows(&top)?;
    let holiday_rows = report::title_rows(&analysis::holiday_releases(&table)?)?;
    let holiday_hours = analysis::hours_by_holiday(&table)?;

    report::print_top_titles(&top_rows);
    report::print_holiday_releases(&holiday_rows);

    let summary = RunSummary {
        rows: clean_report.rows,
        bad_hours: clean_report.bad_hours,
        undated: derive_report.undated,
        top_titles: top_rows,
        holiday_releases: holiday_rows,
        holiday_hours,
    };
    let summary_path = args.out_dir.join("summary.json");
    report::write_summary(&summary_path, &summary)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    info!(
        rows = summary.rows,
        bad_hours = summary.bad_hours,
        undated = summary.undated,
        "run complete, outputs in {}",
        args.out_dir.display()
    );
    Ok(())
}

fn render_charts(args: &Args, table: &polars::prelude::DataFrame) -> Result<()> {
    let out = |name: &str| args.out_dir.join(name);

    charts::bar_chart(
        &out("content_type.png"),
        "Total Viewership Hours by Content Type",
        "Total Hours Viewed",
        &analysis::hours_by_content_type(table)?,
        &[SKYBLUE, SALMON],
    )?;

    charts::bar_chart(
        &out("language.png"),
        "Total Viewership Hours by Language Indicator",
        "Total Hours Viewed",
        &analysis::hours_by_language(table)?,
        &[SALMON],
    )?;

    let monthly = analysis::monthly_stats(table)?;
    charts::month_line_chart(
        &out("monthly_viewership.png"),
        "Monthly Viewership Trends",
        "Total Hours Viewed",
        &monthly.hours,
    )?;
    charts::month_dual_chart(
        &out("monthly_releases.png"),
        "Monthly Content Releases and Viewership Hours",
        &monthly.releases,
        &monthly.hours,
    )?;

    let pivot = analysis::monthly_hours_by_type(table)?;
    let series: Vec<(String, [f64; 12])> = pivot
        .series()
        .map(|(name, values)| (name.to_string(), *values))
        .collect();
    charts::month_multi_line_chart(
        &out("monthly_by_type.png"),
        "Monthly Viewership by Content Type",
        "Total Hours Viewed",
        &series,
    )?;

    charts::bar_chart(
        &out("seasonal_viewership.png"),
        "Total Viewership Hours by Release Season",
        "Total Hours Viewed",
        &analysis::hours_by_season(table)?,
        &[ORANGE],
    )?;

    let weekday = analysis::weekday_stats(table)?;
    charts::weekday_dual_chart(
        &out("weekday.png"),
        "Releases and Viewership by Day of the Week",
        &weekday.releases,
        &weekday.hours,
    )?;

    let holiday_hours = analysis::hours_by_holiday(table)?;
    if !holiday_hours.is_empty() {
        charts::bar_chart(
            &out("holiday_viewership.png"),
            "Total Viewership Hours near Holidays",
            "Total Hours Viewed",
            &holiday_hours,
            &[SALMON],
        )?;
    }

    info!("charts written to {}", args.out_dir.display());
    Ok(())
}
