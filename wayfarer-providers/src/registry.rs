//! Capability registry: the standard chain wiring.
//!
//! One [`FallbackChain`] per capability, adapters in priority order.
//! Hotels is the only capability with a true fallback today: Amadeus
//! realtime pricing first, Overpass heuristics behind it. Everything else
//! is a single-adapter chain kept in chain form so provenance and the
//! attempt trail come for free.

use wayfarer_core::{
    AirQualitySnapshot, Capability, FlightOffer, HotelOffer, Location, PoiCandidate,
    WeatherSnapshot,
};
use wayfarer_fetch::{CredentialStore, FallbackChain, FetchContext, HttpClient, TokenManager, TransportSettings};

use crate::amadeus::{register_token_endpoint, AmadeusFlights, AmadeusHotels, AMADEUS_BASE_URL};
use crate::nominatim::NominatimGeocoder;
use crate::openmeteo::{OpenMeteoAirQuality, OpenMeteoWeather};
use crate::overpass::OverpassHotels;
use crate::places::PlacesPoi;
use crate::query::{FlightQuery, GeocodeQuery, HotelQuery, PoiQuery};

// ============================================================================
// Chains
// ============================================================================

/// All capability chains, one field per capability.
pub struct Chains {
    /// Free text to coordinates.
    pub geocoding: FallbackChain<GeocodeQuery, Location>,
    /// Current weather at a location.
    pub weather: FallbackChain<Location, WeatherSnapshot>,
    /// Air quality at a location.
    pub air_quality: FallbackChain<Location, AirQualitySnapshot>,
    /// Hotel offers near a location.
    pub hotels: FallbackChain<HotelQuery, Vec<HotelOffer>>,
    /// Flight offers between two endpoints.
    pub flights: FallbackChain<FlightQuery, Vec<FlightOffer>>,
    /// Points of interest near a location.
    pub pois: FallbackChain<PoiQuery, Vec<PoiCandidate>>,
}

impl Chains {
    /// The standard wiring against the public provider endpoints.
    pub fn standard() -> Self {
        Self {
            geocoding: FallbackChain::new(
                Capability::Geocoding,
                vec![Box::new(NominatimGeocoder::new())],
            ),
            weather: FallbackChain::new(
                Capability::Weather,
                vec![Box::new(OpenMeteoWeather::new())],
            ),
            air_quality: FallbackChain::new(
                Capability::AirQuality,
                vec![Box::new(OpenMeteoAirQuality::new())],
            ),
            hotels: FallbackChain::new(
                Capability::HotelSearch,
                vec![Box::new(AmadeusHotels::new()), Box::new(OverpassHotels::new())],
            ),
            flights: FallbackChain::new(
                Capability::FlightSearch,
                vec![Box::new(AmadeusFlights::new())],
            ),
            pois: FallbackChain::new(Capability::PoiSearch, vec![Box::new(PlacesPoi::new())]),
        }
    }
}

// ============================================================================
// Context Construction
// ============================================================================

/// Builds a ready-to-use fetch context from a credential store: transport
/// honoring the store's TLS flag, plus the Amadeus token endpoint when
/// the credential pair is present.
pub fn build_context(credentials: CredentialStore) -> FetchContext {
    let settings = TransportSettings {
        allow_insecure_tls: credentials.allow_insecure_tls(),
        ..TransportSettings::default()
    };
    let mut tokens = TokenManager::new();
    register_token_endpoint(&mut tokens, &credentials, AMADEUS_BASE_URL);
    FetchContext::new(HttpClient::with_settings(&settings), credentials, tokens)
}

// ============================================================================
// Tests
// ============================================================================
