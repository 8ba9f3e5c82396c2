use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::{config::ProviderConfig, error::ProviderError, model::WeatherQuery};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    config: ProviderConfig,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client for OpenWeatherMap")?;

        Ok(Self { config: config.clone(), http })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, query: &WeatherQuery) -> Result<String, ProviderError> {
        let url = self.config.weather_url()?;
        info!(%url, city = %query.city, "requesting current weather from OpenWeatherMap");

        let res = self
            .http
            .get(url)
            .query(&[
                (self.config.city_query_param.as_str(), query.city.as_str()),
                ("APPID", self.config.api_key.as_str()),
                ("units", query.units.as_str()),
            ])
            .send()
            .await
            .map_err(unavailable)?;

        let status = res.status();
        let body = res.text().await.map_err(unavailable)?;

        if !status.is_success() {
            warn!(%status, "OpenWeatherMap returned an error status");
            return Err(ProviderError::Unavailable(format!(
                "status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        if body.trim().is_empty() {
            return Err(ProviderError::EmptyBody);
        }

        Ok(body)
    }
}

// reqwest puts the full URL, API key included, into its error text.
fn unavailable(err: reqwest::Error) -> ProviderError {
    let err = err.without_url();
    if err.is_timeout() {
        ProviderError::Unavailable(format!("request timed out: {err}"))
    } else {
        ProviderError::Unavailable(err.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn config_for(server: &MockServer) -> ProviderConfig {
        ProviderConfig {
            endpoint: server.uri(),
            api_key: "KEY".into(),
            timeout_secs: 1,
            ..ProviderConfig::default()
        }
    }

    #[tokio::test]
    async fn sends_city_key_and_metric_units() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Newcastle upon Tyne"))
            .and(query_param("APPID", "KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"main":{}}"#))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new(&config_for(&server)).unwrap();
        let body = provider
            .fetch_current(&WeatherQuery::new("Newcastle upon Tyne"))
            .await
            .unwrap();

        assert_eq!(body, r#"{"main":{}}"#);
    }

    #[tokio::test]
    async fn uses_configured_city_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("city", "Oslo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let config = ProviderConfig { city_query_param: "city".into(), ..config_for(&server) };
        let provider = OpenWeatherProvider::new(&config).unwrap();

        assert!(provider.fetch_current(&WeatherQuery::new("Oslo")).await.is_ok());
    }

    #[tokio::test]
    async fn error_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new(&config_for(&server)).unwrap();
        let err = provider.fetch_current(&WeatherQuery::new("London")).await.unwrap_err();

        assert!(matches!(err, ProviderError::Unavailable(ref msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn blank_body_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new(&config_for(&server)).unwrap();
        let err = provider.fetch_current(&WeatherQuery::new("London")).await.unwrap_err();

        assert!(matches!(err, ProviderError::EmptyBody));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new(&config_for(&server)).unwrap();
        let err = provider.fetch_current(&WeatherQuery::new("London")).await.unwrap_err();

        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[tokio::test]
    async fn unparsable_endpoint_is_reported_before_any_request() {
        let config = ProviderConfig {
            endpoint: "not a url".into(),
            api_key: "KEY".into(),
            ..ProviderConfig::default()
        };
        let provider = OpenWeatherProvider::new(&config).unwrap();
        let err = provider.fetch_current(&WeatherQuery::new("London")).await.unwrap_err();

        assert!(matches!(err, ProviderError::InvalidEndpoint(_)));
    }

    #[test]
    fn truncates_long_bodies_on_char_boundary() {
        let body = "é".repeat(300);
        let short = truncate_body(&body);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
