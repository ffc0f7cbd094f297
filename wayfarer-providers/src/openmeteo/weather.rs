//! Open-Meteo current-weather adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;
use wayfarer_core::{Capability, Location, ProviderId, WeatherSnapshot};
use wayfarer_fetch::{Adapter, FetchContext, FetchError};

/// Public Open-Meteo forecast endpoint.
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    /// Unix timestamp; requested via `timeformat=unixtime`.
    time: i64,
    temperature_2m: f64,
    wind_speed_10m: f64,
    relative_humidity_2m: f64,
}

// ============================================================================
// Adapter
// ============================================================================

/// Current weather via Open-Meteo.
#[derive(Debug, Clone)]
pub struct OpenMeteoWeather {
    base_url: String,
}

impl OpenMeteoWeather {
    /// Creates an adapter against the public endpoint.
    pub fn new() -> Self {
        Self {
            base_url: FORECAST_URL.to_string(),
        }
    }

    /// Overrides the endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for OpenMeteoWeather {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter<Location, WeatherSnapshot> for OpenMeteoWeather {
    fn id(&self) -> &str {
        "weather.open_meteo"
    }

    fn provider(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    fn capability(&self) -> Capability {
        Capability::Weather
    }

    #[instrument(skip(self, ctx), fields(place = %params.name))]
    async fn fetch(&self, ctx: &FetchContext, params: &Location) -> Result<WeatherSnapshot, FetchError> {
        let request = ctx.http.get(&self.base_url).query(&[
            ("latitude", params.latitude.to_string()),
            ("longitude", params.longitude.to_string()),
            (
                "current",
                "temperature_2m,wind_speed_10m,relative_humidity_2m".to_string(),
            ),
            ("timeformat", "unixtime".to_string()),
        ]);

        let response = ctx.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: Some(status.as_u16()),
                message: format!("Open-Meteo returned HTTP {status}"),
            });
        }

        let body: ForecastResponse = response.json().await?;
        let observed_at = DateTime::<Utc>::from_timestamp(body.current.time, 0)
            .ok_or_else(|| FetchError::Parse(format!("Invalid timestamp {}", body.current.time)))?;

        Ok(WeatherSnapshot {
            temperature_c: body.current.temperature_2m,
            wind_kph: body.current.wind_speed_10m,
            humidity_pct: body.current.relative_humidity_2m,
            observed_at,
            source: ProviderId::OpenMeteo,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use wayfarer_fetch::CredentialStore;

    fn test_ctx() -> FetchContext {
        FetchContext::for_tests(CredentialStore::empty())
    }

    fn lisbon() -> Location {
        Location::new("Lisbon", 38.7077, -9.1365)
    }

    #[tokio::test]
    async fn test_normalizes_current_block() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).query_param("timeformat", "unixtime");
                then.status(200).json_body(serde_json::json!({
                    "current": {
                        "time": 1_717_243_200,
                        "temperature_2m": 21.4,
                        "wind_speed_10m": 12.3,
                        "relative_humidity_2m": 64.0
                    }
                }));
            })
            .await;

        let adapter = OpenMeteoWeather::new().with_base_url(server.url("/v1/forecast"));
        let snap = adapter.fetch(&test_ctx(), &lisbon()).await.unwrap();

        mock.assert_async().await;
        assert!((snap.temperature_c - 21.4).abs() < 1e-9);
        assert!((snap.wind_kph - 12.3).abs() < 1e-9);
        assert!((snap.humidity_pct - 64.0).abs() < 1e-9);
        assert_eq!(snap.source, ProviderId::OpenMeteo);
        assert_eq!(snap.observed_at.timestamp(), 1_717_243_200);
    }

    #[tokio::test]
    async fn test_missing_current_block_is_parse_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(serde_json::json!({"latitude": 38.7}));
            })
            .await;

        let adapter = OpenMeteoWeather::new().with_base_url(server.url("/v1/forecast"));
        let err = adapter.fetch(&test_ctx(), &lisbon()).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
