use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

use crate::{
    error::{ReportError, ReportResult},
    model::{ChartArtifact, CovidSnapshot, WeatherSeries},
};

pub const WEATHER_CHART_SIZE: (u32, u32) = (1000, 500);
pub const COVID_CHART_SIZE: (u32, u32) = (1050, 750);

const FONT: &str = "sans-serif";
const LINE_COLOR: RGBColor = RGBColor(255, 127, 14);
const CASES_COLOR: RGBColor = RGBColor(255, 165, 0);
const RECOVERED_COLOR: RGBColor = RGBColor(0, 128, 0);
const DEATHS_COLOR: RGBColor = RGBColor(255, 0, 0);

/// Title and axis descriptions of a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLabels {
    pub title: String,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
}

pub fn weather_chart_labels(city: &str) -> ChartLabels {
    ChartLabels {
        title: format!("Average Daily Temperature – {city}"),
        x_desc: "Date",
        y_desc: "Temperature (°C)",
    }
}

pub fn covid_chart_labels(country: &str) -> ChartLabels {
    ChartLabels {
        title: format!("COVID-19 Summary - {country}"),
        x_desc: "",
        y_desc: "Number of People",
    }
}

/// The three compared categories with their bar colors.
pub fn covid_bars(snapshot: &CovidSnapshot) -> [(&'static str, u64, RGBColor); 3] {
    [
        ("Total Cases", snapshot.total_cases, CASES_COLOR),
        ("Recovered", snapshot.recovered, RECOVERED_COLOR),
        ("Deaths", snapshot.deaths, DEATHS_COLOR),
    ]
}

/// Line chart with markers, one point per day. Overwrites `path`.
pub fn render_weather_chart(series: &WeatherSeries, path: &Path) -> ReportResult<ChartArtifact> {
    let (min_t, max_t) = series
        .temperature_range()
        .ok_or_else(|| ReportError::render(path, "series has no temperature values"))?;

    let padding = if (max_t - min_t).abs() > 1e-6 {
        (max_t - min_t) * 0.1
    } else {
        1.0
    };

    let labels = weather_chart_labels(&series.city);
    let dates: Vec<String> = series
        .points
        .iter()
        .map(|p| p.date.format("%Y-%m-%d").to_string())
        .collect();
    // Integer ranges are inclusive once segmented.
    let last_day = (series.len() as i32 - 1).max(0);
    let fail = |err: &dyn std::fmt::Display| ReportError::render(path, err);

    let root = BitMapBackend::new(path, WEATHER_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| fail(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&labels.title, (FONT, 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0..last_day).into_segmented(),
            (min_t - padding)..(max_t + padding),
        )
        .map_err(|e| fail(&e))?;

    chart
        .configure_mesh()
        .x_desc(labels.x_desc)
        .y_desc(labels.y_desc)
        .x_labels(dates.len() + 1)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => dates.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .light_line_style(BLACK.mix(0.1))
        .draw()
        .map_err(|e| fail(&e))?;

    // Missing days break the line instead of being interpolated.
    let mut segment = Vec::new();
    let mut segments = Vec::new();
    for (i, point) in series.points.iter().enumerate() {
        match point.mean_temperature_c {
            Some(t) => segment.push((SegmentValue::CenterOf(i as i32), t)),
            None if !segment.is_empty() => segments.push(std::mem::take(&mut segment)),
            None => {}
        }
    }
    if !segment.is_empty() {
        segments.push(segment);
    }

    for line in &segments {
        chart
            .draw_series(LineSeries::new(line.iter().cloned(), LINE_COLOR.stroke_width(2)))
            .map_err(|e| fail(&e))?;
        chart
            .draw_series(
                line.iter()
                    .map(|(x, y)| Circle::new((x.clone(), *y), 4, LINE_COLOR.filled())),
            )
            .map_err(|e| fail(&e))?;
    }

    root.present().map_err(|e| fail(&e))?;
    debug!(path = %path.display(), points = series.len(), "weather chart written");

    Ok(ChartArtifact::new(path))
}

/// Bar chart of total cases, recoveries and deaths. Overwrites `path`.
pub fn render_covid_chart(snapshot: &CovidSnapshot, path: &Path) -> ReportResult<ChartArtifact> {
    let labels = covid_chart_labels(&snapshot.country);
    let bars = covid_bars(snapshot);
    let max = bars.iter().map(|(_, v, _)| *v).max().unwrap_or(0);
    let top = (max + max / 10).max(1);
    let fail = |err: &dyn std::fmt::Display| ReportError::render(path, err);

    let root = BitMapBackend::new(path, COVID_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| fail(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&labels.title, (FONT, 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d((0u32..bars.len() as u32 - 1).into_segmented(), 0u64..top)
        .map_err(|e| fail(&e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(labels.y_desc)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => bars
                .get(*i as usize)
                .map(|(name, _, _)| name.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()
        .map_err(|e| fail(&e))?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, value, color))| {
            let i = i as u32;
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), *value)],
                color.filled(),
            );
            bar.set_margin(0, 0, 30, 30);
            bar
        }))
        .map_err(|e| fail(&e))?;

    root.present().map_err(|e| fail(&e))?;
    debug!(path = %path.display(), "covid chart written");

    Ok(ChartArtifact::new(path))
}
