use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

use crate::{
    error::{ReportError, ReportResult},
    model::{WeatherPoint, WeatherQuery, WeatherSeries},
    provider::{field, get_json, http_client, parse_endpoint},
};

use super::WeatherProvider;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Daily mean temperatures from the Open-Meteo forecast API (no key required).
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    endpoint: Url,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(endpoint: &str, timeout: Duration) -> ReportResult<Self> {
        Ok(Self {
            endpoint: parse_endpoint(endpoint)?,
            http: http_client(endpoint, timeout)?,
        })
    }

    pub fn request_url(&self, query: &WeatherQuery) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &query.latitude.to_string())
            .append_pair("longitude", &query.longitude.to_string())
            .append_pair("start_date", &query.start_date.format(DATE_FORMAT).to_string())
            .append_pair("end_date", &query.end_date.format(DATE_FORMAT).to_string())
            .append_pair("daily", "temperature_2m_mean")
            .append_pair("timezone", "auto");
        url
    }
}

/// Zip `daily.time` with `daily.temperature_2m_mean`, which must be the same length.
pub fn parse_daily_series(city: &str, body: &Value) -> ReportResult<WeatherSeries> {
    let times: Vec<String> = field(body, "daily.time")?;
    let temps: Vec<Option<f64>> = field(body, "daily.temperature_2m_mean")?;

    if times.len() != temps.len() {
        return Err(ReportError::malformed(
            "daily.temperature_2m_mean",
            format!(
                "expected {} values to match daily.time, got {}",
                times.len(),
                temps.len()
            ),
        ));
    }

    let points = times
        .iter()
        .zip(temps)
        .enumerate()
        .map(|(i, (time, mean_temperature_c))| {
            let date = NaiveDate::parse_from_str(time, DATE_FORMAT)
                .map_err(|err| ReportError::malformed(format!("daily.time[{i}]"), err))?;
            Ok(WeatherPoint {
                date,
                mean_temperature_c,
            })
        })
        .collect::<ReportResult<Vec<_>>>()?;

    Ok(WeatherSeries {
        city: city.to_string(),
        points,
    })
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn daily_mean_temperature(&self, query: &WeatherQuery) -> ReportResult<WeatherSeries> {
        let body = get_json(&self.http, self.request_url(query)).await?;
        parse_daily_series(&query.city, &body)
    }
}
