use chrono::{DateTime, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::WeatherSettings;

/// Days covered by [`WeatherQuery::last_week`], counted back from the end date.
pub const WEEK_SPAN_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WeatherQuery {
    /// Query ending `today` and starting seven days earlier.
    pub fn last_week(settings: &WeatherSettings, today: NaiveDate) -> Self {
        let start_date = today
            .checked_sub_days(Days::new(WEEK_SPAN_DAYS))
            .unwrap_or(NaiveDate::MIN);

        Self {
            city: settings.city.clone(),
            latitude: settings.latitude,
            longitude: settings.longitude,
            start_date,
            end_date: today,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherPoint {
    pub date: NaiveDate,
    /// `None` when the upstream reported no value for that day.
    pub mean_temperature_c: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSeries {
    pub city: String,
    pub points: Vec<WeatherPoint>,
}

impl WeatherSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Minimum and maximum of the known temperatures.
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.mean_temperature_c)
            .fold(None, |acc, t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovidSnapshot {
    pub country: String,
    pub total_cases: u64,
    pub recovered: u64,
    pub deaths: u64,
    pub active_cases: u64,
    pub today_cases: u64,
    pub today_deaths: u64,
    pub today_recovered: u64,
    pub last_updated: DateTime<Local>,
}

/// One `metric | value` line of the report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRow {
    pub metric: &'static str,
    pub value: u64,
}

impl CovidSnapshot {
    pub const TIMESTAMP_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Every field except the country and the timestamp, in report order.
    pub fn table_rows(&self) -> [MetricRow; 7] {
        [
            MetricRow { metric: "Total Cases", value: self.total_cases },
            MetricRow { metric: "Recovered", value: self.recovered },
            MetricRow { metric: "Deaths", value: self.deaths },
            MetricRow { metric: "Active Cases", value: self.active_cases },
            MetricRow { metric: "Today's Cases", value: self.today_cases },
            MetricRow { metric: "Today's Deaths", value: self.today_deaths },
            MetricRow { metric: "Today's Recovered", value: self.today_recovered },
        ]
    }

    pub fn last_updated_display(&self) -> String {
        self.last_updated.format(Self::TIMESTAMP_FORMAT).to_string()
    }

    /// Whether `active == total - recovered - deaths`. Upstream data does not always hold to it.
    pub fn is_consistent(&self) -> bool {
        self.total_cases
            .checked_sub(self.recovered)
            .and_then(|v| v.checked_sub(self.deaths))
            == Some(self.active_cases)
    }
}

/// A chart image on disk, handed to report assembly exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct ChartArtifact {
    path: PathBuf,
}

impl ChartArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}
