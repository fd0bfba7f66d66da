//! Core library for the `report` CLI.
//!
//! This crate defines:
//! - Configuration of endpoints, locations and output paths
//! - Providers that fetch the remote records (Open-Meteo, disease.sh)
//! - Renderers for the temperature chart, the COVID-19 chart and the PDF report
//! - The two fetch → render pipelines tying them together
//!
//! It is used by `report-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod render;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, CovidSettings, WeatherSettings};
pub use error::{ReportError, ReportResult};
pub use model::{ChartArtifact, CovidSnapshot, MetricRow, WeatherPoint, WeatherQuery, WeatherSeries};
pub use provider::{CovidProvider, WeatherProvider};
