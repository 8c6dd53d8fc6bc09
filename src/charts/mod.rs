//! Charts module - Static chart rendering

mod renderer;

pub use renderer::{
    bar_chart, month_dual_chart, month_line_chart, month_multi_line_chart, weekday_dual_chart,
    ChartError, ORANGE, SALMON, SKYBLUE,
};
