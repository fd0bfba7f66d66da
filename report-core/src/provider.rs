use crate::{
    Config, CovidSnapshot, WeatherQuery, WeatherSeries,
    error::{ReportError, ReportResult},
    provider::{diseasesh::DiseaseShProvider, openmeteo::OpenMeteoProvider},
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

pub mod diseasesh;
pub mod openmeteo;

/// Source of daily mean temperatures.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn daily_mean_temperature(&self, query: &WeatherQuery) -> ReportResult<WeatherSeries>;
}

/// Source of per-country COVID-19 statistics.
#[async_trait]
pub trait CovidProvider: Send + Sync + Debug {
    async fn country_snapshot(&self, country: &str) -> ReportResult<CovidSnapshot>;
}

/// Construct the weather provider described by `config.weather`.
pub fn weather_provider_from_config(config: &Config) -> ReportResult<Box<dyn WeatherProvider>> {
    let settings = &config.weather;
    let provider = OpenMeteoProvider::new(&settings.endpoint, settings.timeout())?;
    Ok(Box::new(provider))
}

/// Construct the COVID provider described by `config.covid`.
pub fn covid_provider_from_config(config: &Config) -> ReportResult<Box<dyn CovidProvider>> {
    let settings = &config.covid;
    let provider = DiseaseShProvider::new(&settings.endpoint, settings.timeout())?;
    Ok(Box::new(provider))
}

pub(crate) fn parse_endpoint(endpoint: &str) -> ReportResult<Url> {
    Url::parse(endpoint).map_err(|err| ReportError::InvalidEndpoint {
        url: endpoint.to_string(),
        detail: err.to_string(),
    })
}

pub(crate) fn http_client(endpoint: &str, timeout: Duration) -> ReportResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| ReportError::InvalidEndpoint {
            url: endpoint.to_string(),
            detail: format!("could not build HTTP client: {err}"),
        })
}

/// Single GET attempt; returns the parsed JSON body of a 2xx response.
pub(crate) async fn get_json(http: &Client, url: Url) -> ReportResult<Value> {
    debug!(%url, "sending request");

    let unavailable = |source| ReportError::RemoteUnavailable {
        url: url.to_string(),
        source,
    };

    let res = http.get(url.clone()).send().await.map_err(unavailable)?;

    let status = res.status();
    let body = res.text().await.map_err(unavailable)?;
    debug!(%url, %status, bytes = body.len(), "received response");

    if !status.is_success() {
        return Err(ReportError::RemoteRequest {
            url: url.to_string(),
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|err| ReportError::malformed("<body>", err))
}

/// Fetch the value at a dotted path (`daily.time`) and deserialize it.
pub(crate) fn field<T: DeserializeOwned>(root: &Value, path: &str) -> ReportResult<T> {
    let value = path
        .split('.')
        .try_fold(root, |node, key| node.get(key))
        .ok_or_else(|| ReportError::missing(path))?;

    T::deserialize(value).map_err(|err| ReportError::malformed(path, err))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_walks_dotted_paths() {
        let body = json!({ "daily": { "time": ["2024-01-01"] } });
        let times: Vec<String> = field(&body, "daily.time").expect("field must resolve");
        assert_eq!(times, ["2024-01-01"]);
    }

    #[test]
    fn field_names_missing_path() {
        let body = json!({ "daily": {} });
        let err = field::<Vec<String>>(&body, "daily.time").unwrap_err();
        assert!(matches!(
            err,
            ReportError::MalformedResponse { ref field, .. } if field == "daily.time"
        ));
    }

    #[test]
    fn field_rejects_wrong_type() {
        let body = json!({ "cases": -3 });
        let err = field::<u64>(&body, "cases").unwrap_err();
        assert!(err.to_string().contains("`cases`"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn invalid_endpoint_is_reported() {
        let mut cfg = Config::default();
        cfg.covid.endpoint = "not a url".into();
        let err = covid_provider_from_config(&cfg).unwrap_err();
        assert!(matches!(err, ReportError::InvalidEndpoint { .. }));
    }

    #[test]
    fn providers_build_from_default_config() {
        let cfg = Config::default();
        assert!(weather_provider_from_config(&cfg).is_ok());
        assert!(covid_provider_from_config(&cfg).is_ok());
    }
}
