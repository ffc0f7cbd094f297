//! Nominatim geocoding adapter.
//!
//! Keyless; identified to the service by the transport's User-Agent.
//! Nominatim returns coordinates as strings, so parsing failures surface
//! as [`FetchError::Parse`] rather than silently coercing.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use wayfarer_core::{Capability, Location, ProviderId};
use wayfarer_fetch::{Adapter, FetchContext, FetchError};

use crate::query::GeocodeQuery;

/// Public Nominatim search endpoint.
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

// ============================================================================
// Adapter
// ============================================================================

/// Geocoding via the public Nominatim instance.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates an adapter against the public instance.
    pub fn new() -> Self {
        Self {
            base_url: NOMINATIM_URL.to_string(),
        }
    }

    /// Overrides the endpoint (tests, self-hosted instances).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter<GeocodeQuery, Location> for NominatimGeocoder {
    fn id(&self) -> &str {
        "geocoding.nominatim"
    }

    fn provider(&self) -> ProviderId {
        ProviderId::Nominatim
    }

    fn capability(&self) -> Capability {
        Capability::Geocoding
    }

    #[instrument(skip(self, ctx), fields(place = %params.place))]
    async fn fetch(&self, ctx: &FetchContext, params: &GeocodeQuery) -> Result<Location, FetchError> {
        let request = ctx
            .http
            .get(&self.base_url)
            .query(&[("q", params.place.as_str()), ("format", "json"), ("limit", "1")]);

        let response = ctx.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: Some(status.as_u16()),
                message: format!("Nominatim returned HTTP {status}"),
            });
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let Some(place) = places.into_iter().next() else {
            return Err(FetchError::NoResults);
        };

        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| FetchError::Parse(format!("Non-numeric latitude {:?}", place.lat)))?;
        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| FetchError::Parse(format!("Non-numeric longitude {:?}", place.lon)))?;

        debug!(name = %place.display_name, latitude, longitude, "Geocoded place");
        Ok(Location::new(place.display_name, latitude, longitude))
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

    #[tokio::test]
    async fn test_geocodes_first_match() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .query_param("q", "Lisbon")
                    .query_param("limit", "1");
                then.status(200).json_body(serde_json::json!([
                    {"lat": "38.7077", "lon": "-9.1365", "display_name": "Lisboa, Portugal"}
                ]));
            })
            .await;

        let adapter = NominatimGeocoder::new().with_base_url(server.url("/search"));
        let location = adapter
            .fetch(&test_ctx(), &GeocodeQuery::new("Lisbon"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(location.name, "Lisboa, Portugal");
        assert!((location.latitude - 38.7077).abs() < 1e-9);
        assert!((location.longitude + 9.1365).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_response_is_no_results() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(serde_json::json!([]));
            })
            .await;

        let adapter = NominatimGeocoder::new().with_base_url(server.url("/search"));
        let err = adapter
            .fetch(&test_ctx(), &GeocodeQuery::new("Nowhereville-xyz"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NoResults));
    }

    #[tokio::test]
    async fn test_unparseable_coordinates_are_parse_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(serde_json::json!([
                    {"lat": "not-a-number", "lon": "-9.1", "display_name": "Broken"}
                ]));
            })
            .await;

        let adapter = NominatimGeocoder::new().with_base_url(server.url("/search"));
        let err = adapter
            .fetch(&test_ctx(), &GeocodeQuery::new("Broken"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
