//! Google Places point-of-interest adapter.
//!
//! Keyed; without `GOOGLE_PLACES_API_KEY` the adapter reports itself
//! unconfigured and the chain skips it. Cuisine is pushed to the service
//! as a keyword; rating and price-level filters are applied client-side
//! because the nearby-search endpoint cannot express them exactly.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use wayfarer_core::{sort_poi_candidates, Capability, PoiCandidate, ProviderId};
use wayfarer_fetch::{Adapter, AuthError, FetchContext, FetchError};

use crate::query::PoiQuery;

/// Nearby-search endpoint.
const PLACES_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// Search radius around the destination, in meters.
const SEARCH_RADIUS_M: u32 = 3000;

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    price_level: Option<u8>,
    #[serde(default)]
    vicinity: Option<String>,
}

// ============================================================================
// Adapter
// ============================================================================

/// Restaurant candidates via the Places nearby search.
#[derive(Debug, Clone)]
pub struct PlacesPoi {
    base_url: String,
}

impl PlacesPoi {
    /// Creates an adapter against the public endpoint.
    pub fn new() -> Self {
        Self {
            base_url: PLACES_URL.to_string(),
        }
    }

    /// Overrides the endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for PlacesPoi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter<PoiQuery, Vec<PoiCandidate>> for PlacesPoi {
    fn id(&self) -> &str {
        "poi.places"
    }

    fn provider(&self) -> ProviderId {
        ProviderId::Places
    }

    fn capability(&self) -> Capability {
        Capability::PoiSearch
    }

    async fn is_configured(&self, ctx: &FetchContext) -> bool {
        ctx.credentials.has_places()
    }

    #[instrument(skip(self, ctx), fields(place = %params.location.name))]
    async fn fetch(
        &self,
        ctx: &FetchContext,
        params: &PoiQuery,
    ) -> Result<Vec<PoiCandidate>, FetchError> {
        let key = ctx
            .credentials
            .places_key()
            .ok_or_else(|| FetchError::NotConfigured("GOOGLE_PLACES_API_KEY not set".to_string()))?;

        let mut query = vec![
            (
                "location",
                format!("{},{}", params.location.latitude, params.location.longitude),
            ),
            ("radius", SEARCH_RADIUS_M.to_string()),
            ("type", "restaurant".to_string()),
            ("key", key.to_string()),
        ];
        if let Some(cuisine) = &params.filters.cuisine {
            query.push(("keyword", cuisine.clone()));
        }

        let response = ctx.http.execute(ctx.http.get(&self.base_url).query(&query)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: Some(status.as_u16()),
                message: format!("Places returned HTTP {status}"),
            });
        }

        let body: PlacesResponse = response.json().await?;
        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Err(FetchError::NoResults),
            "OVER_QUERY_LIMIT" => return Err(FetchError::RateLimited { retry_after: None }),
            "REQUEST_DENIED" => {
                return Err(AuthError::Rejected {
                    provider: ProviderId::Places,
                    detail: body.status,
                }
                .into())
            }
            other => {
                return Err(FetchError::Upstream {
                    status: None,
                    message: format!("Places returned status {other}"),
                })
            }
        }

        let cuisine_label = params.filters.cuisine.clone();
        let mut candidates: Vec<PoiCandidate> = body
            .results
            .into_iter()
            .map(|result| PoiCandidate {
                name: result.name,
                rating: result.rating,
                price_level: result.price_level,
                // The keyword already constrained the service-side match.
                cuisine: cuisine_label.clone(),
                address: result.vicinity,
            })
            .filter(|candidate| params.filters.matches(candidate))
            .collect();

        if candidates.is_empty() {
            return Err(FetchError::NoResults);
        }
        sort_poi_candidates(&mut candidates);
        candidates.truncate(params.limit);
        debug!(count = candidates.len(), "Filtered POI candidates");
        Ok(candidates)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use wayfarer_core::{Location, PoiFilters};
    use wayfarer_fetch::CredentialStore;

    fn keyed_ctx() -> FetchContext {
        FetchContext::for_tests(CredentialStore::empty().with_places("test-key"))
    }

    fn query() -> PoiQuery {
        PoiQuery::new(Location::new("Lisbon", 38.7077, -9.1365))
    }

    #[tokio::test]
    async fn test_unconfigured_without_key() {
        let adapter = PlacesPoi::new();
        let ctx = FetchContext::for_tests(CredentialStore::empty());
        assert!(!adapter.is_configured(&ctx).await);
    }

    #[tokio::test]
    async fn test_filters_and_sorts_candidates() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .query_param("key", "test-key")
                    .query_param("keyword", "seafood");
                then.status(200).json_body(serde_json::json!({
                    "status": "OK",
                    "results": [
                        {"name": "Cervejaria", "rating": 4.6, "price_level": 3,
                         "vicinity": "Rua das Portas"},
                        {"name": "Low Rated", "rating": 3.1, "price_level": 2},
                        {"name": "Marisqueira", "rating": 4.8, "price_level": 3,
                         "vicinity": "Av. Almirante"}
                    ]
                }));
            })
            .await;

        let mut q = query();
        q.filters = PoiFilters {
            cuisine: Some("seafood".to_string()),
            min_rating: Some(4.0),
            price_level: None,
        };

        let adapter = PlacesPoi::new().with_base_url(server.url("/nearbysearch/json"));
        let candidates = adapter.fetch(&keyed_ctx(), &q).await.unwrap();

        mock.assert_async().await;
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "Marisqueira");
        assert_eq!(candidates[0].cuisine.as_deref(), Some("seafood"));
    }

    #[tokio::test]
    async fn test_zero_results_is_no_results() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200)
                    .json_body(serde_json::json!({"status": "ZERO_RESULTS", "results": []}));
            })
            .await;

        let adapter = PlacesPoi::new().with_base_url(server.url("/nearbysearch/json"));
        let err = adapter.fetch(&keyed_ctx(), &query()).await.unwrap_err();
        assert!(matches!(err, FetchError::NoResults));
    }

    #[tokio::test]
    async fn test_request_denied_is_auth_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200)
                    .json_body(serde_json::json!({"status": "REQUEST_DENIED"}));
            })
            .await;

        let adapter = PlacesPoi::new().with_base_url(server.url("/nearbysearch/json"));
        let err = adapter.fetch(&keyed_ctx(), &query()).await.unwrap_err();
        assert!(matches!(err, FetchError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn test_everything_filtered_out_is_no_results() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(serde_json::json!({
                    "status": "OK",
                    "results": [{"name": "Unrated Cafe"}]
                }));
            })
            .await;

        let mut q = query();
        q.filters.min_rating = Some(4.0);

        let adapter = PlacesPoi::new().with_base_url(server.url("/nearbysearch/json"));
        let err = adapter.fetch(&keyed_ctx(), &q).await.unwrap_err();
        assert!(matches!(err, FetchError::NoResults));
    }
}
