//! End-to-end trip assembly against mocked provider endpoints.
//!
//! One mock server stands in for every external service; adapters are
//! pointed at it per-path. These tests exercise the whole path from
//! free-text request to assembled context: geocoding, fan-out, fallback,
//! degradation, and the shared deadline.

use std::time::Duration;

use httpmock::prelude::*;
use wayfarer_core::{Capability, OfferSource, ProviderId, TransportMode};
use wayfarer_fetch::{CredentialStore, FallbackChain, FetchContext, HttpClient, TokenManager};
use wayfarer_providers::aggregator::{AggregateError, Aggregator, TripRequest};
use wayfarer_providers::amadeus::{register_token_endpoint, AmadeusFlights, AmadeusHotels};
use wayfarer_providers::nominatim::NominatimGeocoder;
use wayfarer_providers::openmeteo::{OpenMeteoAirQuality, OpenMeteoWeather};
use wayfarer_providers::overpass::OverpassHotels;
use wayfarer_providers::places::PlacesPoi;
use wayfarer_providers::Chains;

/// Chains with every adapter pointed at the mock server.
fn mock_chains(base: &str) -> Chains {
    Chains {
        geocoding: FallbackChain::new(
            Capability::Geocoding,
            vec![Box::new(NominatimGeocoder::new().with_base_url(format!("{base}/geocode")))],
        ),
        weather: FallbackChain::new(
            Capability::Weather,
            vec![Box::new(OpenMeteoWeather::new().with_base_url(format!("{base}/forecast")))],
        ),
        air_quality: FallbackChain::new(
            Capability::AirQuality,
            vec![Box::new(
                OpenMeteoAirQuality::new().with_base_url(format!("{base}/air-quality")),
            )],
        ),
        hotels: FallbackChain::new(
            Capability::HotelSearch,
            vec![
                Box::new(AmadeusHotels::new().with_base_url(base.to_string())),
                Box::new(OverpassHotels::new().with_base_url(format!("{base}/overpass"))),
            ],
        ),
        flights: FallbackChain::new(
            Capability::FlightSearch,
            vec![Box::new(AmadeusFlights::new().with_base_url(base.to_string()))],
        ),
        pois: FallbackChain::new(
            Capability::PoiSearch,
            vec![Box::new(PlacesPoi::new().with_base_url(format!("{base}/places")))],
        ),
    }
}

fn ctx_with(credentials: CredentialStore, base: &str) -> FetchContext {
    let mut tokens = TokenManager::new();
    register_token_endpoint(&mut tokens, &credentials, base);
    FetchContext::new(HttpClient::new(), credentials, tokens)
}

fn mock_geocoding(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/geocode").query_param("q", "San Francisco");
        then.status(200).json_body(serde_json::json!([
            {"lat": "37.7749", "lon": "-122.4194", "display_name": "San Francisco, California"}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/geocode").query_param("q", "Los Angeles");
        then.status(200).json_body(serde_json::json!([
            {"lat": "34.0522", "lon": "-118.2437", "display_name": "Los Angeles, California"}
        ]));
    });
}

fn mock_weather(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/forecast");
        then.status(200).json_body(serde_json::json!({
            "current": {"time": 1_717_243_200, "temperature_2m": 22.0,
                        "wind_speed_10m": 9.0, "relative_humidity_2m": 55.0}
        }));
    });
}

fn mock_air(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/air-quality");
        then.status(200).json_body(serde_json::json!({
            "hourly": {"pm2_5": [6.5], "pm10": [11.0], "european_aqi": [18.0]}
        }));
    });
}

fn mock_places(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/places");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "results": [
                {"name": "Grand Central Market", "rating": 4.5, "price_level": 2,
                 "vicinity": "317 S Broadway"}
            ]
        }));
    });
}

fn mock_amadeus(server: &MockServer) {
    server.mock(|when, then| {
        when.method(POST).path("/v1/security/oauth2/token");
        then.status(200)
            .json_body(serde_json::json!({"access_token": "tok-e2e", "expires_in": 1799}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/v1/reference-data/locations/hotels/by-geocode")
            .header("authorization", "Bearer tok-e2e");
        then.status(200)
            .json_body(serde_json::json!({"data": [{"hotelId": "HLLAX1"}]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v3/shopping/hotel-offers");
        then.status(200).json_body(serde_json::json!({
            "data": [{"hotel": {"hotelId": "HLLAX1", "name": "Downtown Tower"},
                      "offers": [{"price": {"total": "210.00", "currency": "USD"}}]}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/v1/reference-data/locations")
            .query_param("keyword", "San Francisco");
        then.status(200).json_body(serde_json::json!({"data": [{"iataCode": "SFO"}]}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/v1/reference-data/locations")
            .query_param("keyword", "Los Angeles");
        then.status(200).json_body(serde_json::json!({"data": [{"iataCode": "LAX"}]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v2/shopping/flight-offers");
        then.status(200).json_body(serde_json::json!({
            "data": [{"itineraries": [{"segments": [
                {"carrierCode": "UA", "number": "507",
                 "departure": {"at": "2024-07-08T08:00:00"},
                 "arrival": {"at": "2024-07-08T09:35:00"}}
            ]}],
            "price": {"grandTotal": "128.40", "currency": "USD"}}]
        }));
    });
}

#[tokio::test]
async fn test_fully_provisioned_request_assembles_complete_context() {
    let server = MockServer::start_async().await;
    mock_geocoding(&server);
    mock_weather(&server);
    mock_air(&server);
    mock_places(&server);
    mock_amadeus(&server);

    let credentials = CredentialStore::empty()
        .with_amadeus("client-id", "client-secret")
        .with_places("places-key");
    let ctx = ctx_with(credentials, &server.base_url());
    let aggregator = Aggregator::new(mock_chains(&server.base_url()));

    let request = TripRequest::new("San Francisco", "Los Angeles");
    let context = aggregator.assemble(&ctx, &request).await.unwrap();

    assert!(context.is_complete());
    assert!((500.0..620.0).contains(&context.distance_km));
    assert_eq!(context.emissions.mode, TransportMode::Train);
    assert_eq!(context.destination_local_time.utc_offset_hours, -8);

    let hotels = context.hotels.value().unwrap();
    assert_eq!(hotels[0].name, "Downtown Tower");
    assert_eq!(hotels[0].source, OfferSource::Realtime);
    assert_eq!(context.hotels.status_label(), "ok");

    let flights = context.flights.value().unwrap();
    assert_eq!(flights[0].carrier, "UA");
    assert_eq!(flights[0].stops, 0);

    let weather = context.weather.value().unwrap();
    assert_eq!(weather.source, ProviderId::OpenMeteo);

    let pois = context.points_of_interest.value().unwrap();
    assert_eq!(pois[0].name, "Grand Central Market");
}

#[tokio::test]
async fn test_without_amadeus_hotels_fall_back_to_heuristics() {
    let server = MockServer::start_async().await;
    mock_geocoding(&server);
    mock_weather(&server);
    mock_air(&server);
    mock_places(&server);
    server.mock(|when, then| {
        when.method(POST).path("/overpass");
        then.status(200).json_body(serde_json::json!({
            "elements": [{"id": 42, "tags": {"name": "Roadside Lodge", "stars": "3"}}]
        }));
    });

    // No Amadeus credentials: the realtime adapter reports unconfigured,
    // the chain falls through to Overpass.
    let credentials = CredentialStore::empty().with_places("places-key");
    let ctx = ctx_with(credentials, &server.base_url());
    let aggregator = Aggregator::new(mock_chains(&server.base_url()));

    let request = TripRequest::new("San Francisco", "Los Angeles");
    let context = aggregator.assemble(&ctx, &request).await.unwrap();

    assert_eq!(context.hotels.status_label(), "degraded");
    let hotels = context.hotels.value().unwrap();
    assert!(hotels.iter().all(|o| o.source == OfferSource::Heuristic));
    assert_eq!(hotels[0].price_band.as_deref(), Some("$120-$200"));
    assert_eq!(hotels[0].price, Some(160.0));

    // Flights have no fallback, so that field fails while the rest stand.
    assert_eq!(context.flights.status_label(), "failed");
    assert_eq!(context.weather.status_label(), "ok");
    assert!(!context.is_complete());
}

#[tokio::test]
async fn test_slow_provider_hits_deadline_without_sinking_the_rest() {
    let server = MockServer::start_async().await;
    mock_geocoding(&server);
    mock_air(&server);
    mock_places(&server);
    server.mock(|when, then| {
        when.method(GET).path("/forecast");
        then.status(200)
            .delay(Duration::from_secs(10))
            .json_body(serde_json::json!({
                "current": {"time": 1_717_243_200, "temperature_2m": 22.0,
                            "wind_speed_10m": 9.0, "relative_humidity_2m": 55.0}
            }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/overpass");
        then.status(200).json_body(serde_json::json!({
            "elements": [{"id": 42, "tags": {"name": "Roadside Lodge"}}]
        }));
    });

    let credentials = CredentialStore::empty().with_places("places-key");
    let ctx = ctx_with(credentials, &server.base_url());
    let aggregator = Aggregator::new(mock_chains(&server.base_url()));

    let mut request = TripRequest::new("San Francisco", "Los Angeles");
    request.deadline = Duration::from_secs(2);

    let context = aggregator.assemble(&ctx, &request).await.unwrap();
    assert_eq!(context.weather.status_label(), "timed_out");
    assert_eq!(context.air_quality.status_label(), "ok");
    assert_eq!(context.points_of_interest.status_label(), "ok");
}

#[tokio::test]
async fn test_unknown_place_is_a_fatal_geocoding_error() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/geocode");
        then.status(200).json_body(serde_json::json!([]));
    });

    let ctx = ctx_with(CredentialStore::empty(), &server.base_url());
    let aggregator = Aggregator::new(mock_chains(&server.base_url()));

    let request = TripRequest::new("Atlantis", "El Dorado");
    let err = aggregator.assemble(&ctx, &request).await.unwrap_err();
    assert!(matches!(err, AggregateError::Geocoding { .. }));
}
