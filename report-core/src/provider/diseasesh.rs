use async_trait::async_trait;
use chrono::{Local, TimeZone};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

use crate::{
    error::{ReportError, ReportResult},
    model::CovidSnapshot,
    provider::{field, get_json, http_client, parse_endpoint},
};

use super::CovidProvider;

/// Per-country COVID-19 totals from disease.sh (no key required).
#[derive(Debug, Clone)]
pub struct DiseaseShProvider {
    endpoint: Url,
    http: Client,
}

impl DiseaseShProvider {
    pub fn new(endpoint: &str, timeout: Duration) -> ReportResult<Self> {
        let parsed = parse_endpoint(endpoint)?;
        if parsed.cannot_be_a_base() {
            return Err(ReportError::InvalidEndpoint {
                url: endpoint.to_string(),
                detail: "country cannot be appended as a path segment".to_string(),
            });
        }

        Ok(Self {
            endpoint: parsed,
            http: http_client(endpoint, timeout)?,
        })
    }

    /// `<endpoint>/<country>?strict=true`, the country percent-encoded.
    pub fn request_url(&self, country: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(country);
        }
        url.query_pairs_mut().append_pair("strict", "true");
        url
    }
}

/// Extract the snapshot fields; `updated` is epoch milliseconds.
pub fn parse_snapshot(body: &Value) -> ReportResult<CovidSnapshot> {
    let updated: i64 = field(body, "updated")?;
    let last_updated = Local
        .timestamp_millis_opt(updated)
        .single()
        .ok_or_else(|| ReportError::malformed("updated", format!("{updated} is out of range")))?;

    Ok(CovidSnapshot {
        country: field(body, "country")?,
        total_cases: field(body, "cases")?,
        recovered: field(body, "recovered")?,
        deaths: field(body, "deaths")?,
        active_cases: field(body, "active")?,
        today_cases: field(body, "todayCases")?,
        today_deaths: field(body, "todayDeaths")?,
        today_recovered: field(body, "todayRecovered")?,
        last_updated,
    })
}

#[async_trait]
impl CovidProvider for DiseaseShProvider {
    async fn country_snapshot(&self, country: &str) -> ReportResult<CovidSnapshot> {
        let body = get_json(&self.http, self.request_url(country)).await?;
        parse_snapshot(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> DiseaseShProvider {
        DiseaseShProvider::new("https://disease.sh/v3/covid-19/countries", Duration::from_secs(10))
            .expect("provider must build")
    }

    fn india_body() -> Value {
        json!({
            "country": "India",
            "cases": 1000,
            "recovered": 900,
            "deaths": 50,
            "active": 50,
            "todayCases": 10,
            "todayDeaths": 1,
            "todayRecovered": 5,
            "updated": 1_700_000_000_000_i64,
            "countryInfo": { "iso2": "IN" }
        })
    }

    #[test]
    fn request_url_appends_country_and_strict_flag() {
        assert_eq!(
            provider().request_url("India").as_str(),
            "https://disease.sh/v3/covid-19/countries/India?strict=true"
        );
        assert_eq!(
            provider().request_url("South Korea").as_str(),
            "https://disease.sh/v3/covid-19/countries/South%20Korea?strict=true"
        );
    }

    #[test]
    fn trailing_slash_in_endpoint_is_tolerated() {
        let provider =
            DiseaseShProvider::new("https://disease.sh/v3/covid-19/countries/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            provider.request_url("India").as_str(),
            "https://disease.sh/v3/covid-19/countries/India?strict=true"
        );
    }

    #[test]
    fn parses_every_field() {
        let snapshot = parse_snapshot(&india_body()).expect("valid body");

        assert_eq!(snapshot.country, "India");
        assert_eq!(snapshot.total_cases, 1000);
        assert_eq!(snapshot.recovered, 900);
        assert_eq!(snapshot.deaths, 50);
        assert_eq!(snapshot.active_cases, 50);
        assert_eq!(snapshot.today_cases, 10);
        assert_eq!(snapshot.today_deaths, 1);
        assert_eq!(snapshot.today_recovered, 5);
        assert_eq!(snapshot.last_updated.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn updated_is_rendered_in_local_time() {
        let snapshot = parse_snapshot(&india_body()).unwrap();
        let expected = Local
            .timestamp_millis_opt(1_700_000_000_000)
            .unwrap()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert_eq!(snapshot.last_updated_display(), expected);
    }

    #[test]
    fn missing_field_is_named() {
        let mut body = india_body();
        body.as_object_mut().unwrap().remove("todayRecovered");

        let err = parse_snapshot(&body).unwrap_err();
        assert!(matches!(
            err,
            ReportError::MalformedResponse { ref field, .. } if field == "todayRecovered"
        ));
    }

    #[test]
    fn negative_count_is_malformed() {
        let mut body = india_body();
        body["deaths"] = json!(-1);
        assert!(parse_snapshot(&body).unwrap_err().to_string().contains("`deaths`"));
    }
}
