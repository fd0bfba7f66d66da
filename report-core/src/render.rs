//! Turn fetched records into artifacts on disk.

pub mod chart;
pub mod pdf;
pub mod text;

pub use chart::{render_covid_chart, render_weather_chart};
pub use pdf::{ReportSummary, write_report};
