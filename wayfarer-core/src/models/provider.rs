//! Provider-related types.
//!
//! This module contains types identifying the external data providers:
//! - [`ProviderId`] - Enum of supported providers
//! - [`Capability`] - The kind of data a provider can supply
//! - [`OfferSource`] - Realtime vs. heuristic provenance for offers

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Provider Id
// ============================================================================

/// Supported external data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// OpenStreetMap Nominatim geocoding (keyless).
    Nominatim,
    /// Open-Meteo forecast API (keyless).
    OpenMeteo,
    /// Open-Meteo air quality API (keyless).
    OpenMeteoAir,
    /// OpenStreetMap Overpass API (keyless).
    Overpass,
    /// Amadeus Self-Service APIs (client-credentials OAuth).
    Amadeus,
    /// Places search API (API key).
    Places,
}

impl ProviderId {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nominatim => "Nominatim",
            Self::OpenMeteo => "Open-Meteo",
            Self::OpenMeteoAir => "Open-Meteo Air Quality",
            Self::Overpass => "Overpass",
            Self::Amadeus => "Amadeus",
            Self::Places => "Places",
        }
    }

    /// Returns true if this provider requires credentials.
    pub fn requires_credentials(&self) -> bool {
        matches!(self, Self::Amadeus | Self::Places)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Capability
// ============================================================================

/// The kind of data a provider adapter can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Free-text place name to coordinates.
    Geocoding,
    /// Current weather conditions.
    Weather,
    /// Current air quality.
    AirQuality,
    /// Hotel offers near a location.
    HotelSearch,
    /// Flight offers between two locations.
    FlightSearch,
    /// Points of interest near a location.
    PoiSearch,
}

impl Capability {
    /// Returns the display name for this capability.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Geocoding => "Geocoding",
            Self::Weather => "Weather",
            Self::AirQuality => "Air Quality",
            Self::HotelSearch => "Hotel Search",
            Self::FlightSearch => "Flight Search",
            Self::PoiSearch => "POI Search",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Offer Source
// ============================================================================

/// Provenance of an offer: live priced data or a heuristic estimate.
///
/// Carried on every offer so downstream consumers can distinguish premium
/// realtime data from fallback listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferSource {
    /// Live priced offers from a booking provider.
    Realtime,
    /// Estimated price bands derived from listing metadata.
    Heuristic,
}

impl fmt::Display for OfferSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Realtime => write!(f, "realtime"),
            Self::Heuristic => write!(f, "heuristic"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_display_names() {
        assert_eq!(ProviderId::Nominatim.display_name(), "Nominatim");
        assert_eq!(ProviderId::Amadeus.display_name(), "Amadeus");
    }

    #[test]
    fn test_credential_requirements() {
        assert!(!ProviderId::Nominatim.requires_credentials());
        assert!(!ProviderId::OpenMeteo.requires_credentials());
        assert!(!ProviderId::Overpass.requires_credentials());
        assert!(ProviderId::Amadeus.requires_credentials());
        assert!(ProviderId::Places.requires_credentials());
    }

    #[test]
    fn test_offer_source_serde() {
        let json = serde_json::to_string(&OfferSource::Heuristic).unwrap();
        assert_eq!(json, "\"heuristic\"");
    }
}
