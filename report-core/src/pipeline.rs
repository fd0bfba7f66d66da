//! The two fetch → render pipelines.
//!
//! Each stage finishes before the next starts. A failed fetch returns
//! before anything is rendered, so no artifact is written for it.

use std::path::Path;
use tracing::{info, warn};

use crate::{
    config::CovidSettings,
    error::ReportResult,
    model::{ChartArtifact, CovidSnapshot, WeatherQuery, WeatherSeries},
    provider::{CovidProvider, WeatherProvider},
    render::{self, ReportSummary},
};

#[derive(Debug)]
pub struct WeatherReport {
    pub series: WeatherSeries,
    pub chart: ChartArtifact,
}

#[derive(Debug)]
pub struct CovidReport {
    pub snapshot: CovidSnapshot,
    pub report: ReportSummary,
}

/// Fetch one week of temperatures and draw them to `output`.
pub async fn weather_report(
    provider: &dyn WeatherProvider,
    query: &WeatherQuery,
    output: &Path,
) -> ReportResult<WeatherReport> {
    let series = provider.daily_mean_temperature(query).await?;
    info!(city = %series.city, points = series.len(), "weather series fetched");

    let chart = render::render_weather_chart(&series, output)?;
    Ok(WeatherReport { series, chart })
}

/// Fetch the country snapshot, draw the bar chart, then assemble the PDF.
pub async fn covid_report(
    provider: &dyn CovidProvider,
    settings: &CovidSettings,
) -> ReportResult<CovidReport> {
    let snapshot = provider.country_snapshot(&settings.country).await?;
    info!(country = %snapshot.country, "covid snapshot fetched");

    if !snapshot.is_consistent() {
        warn!(
            total = snapshot.total_cases,
            recovered = snapshot.recovered,
            deaths = snapshot.deaths,
            active = snapshot.active_cases,
            "active cases differ from total - recovered - deaths"
        );
    }

    let chart = render::render_covid_chart(&snapshot, &settings.chart_output)?;
    let report = render::write_report(&snapshot, chart, &settings.report_output)?;

    Ok(CovidReport { snapshot, report })
}
