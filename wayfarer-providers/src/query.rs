//! Capability parameter types.
//!
//! Each fallback chain is generic over one of these. Adapters receive the
//! query by reference and translate it into provider-specific wire
//! parameters internally.

use chrono::NaiveDate;
use wayfarer_core::{Location, PoiFilters};

/// Default maximum number of offers/candidates returned by list-shaped
/// capabilities.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

// ============================================================================
// Queries
// ============================================================================

/// Free-text place lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    /// The place as the user typed it, e.g. "Lisbon" or "Portland, OR".
    pub place: String,
}

impl GeocodeQuery {
    /// Creates a query from free text.
    pub fn new(place: impl Into<String>) -> Self {
        Self {
            place: place.into(),
        }
    }
}

/// Hotel search around a geocoded location.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelQuery {
    /// Search center.
    pub location: Location,
    /// Maximum number of offers to return.
    pub limit: usize,
}

impl HotelQuery {
    /// Creates a query with the default result limit.
    pub fn new(location: Location) -> Self {
        Self {
            location,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// Flight search between two free-text endpoints.
///
/// Endpoints stay free-text here; the adapter resolves them to IATA codes
/// as part of its fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    /// Free-text origin.
    pub origin: String,
    /// Free-text destination.
    pub destination: String,
    /// Departure date.
    pub departure_date: NaiveDate,
    /// Maximum number of offers to return.
    pub limit: usize,
}

/// Point-of-interest search around a geocoded location.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiQuery {
    /// Search center.
    pub location: Location,
    /// Conjunctive filters; empty filters match everything.
    pub filters: PoiFilters,
    /// Maximum number of candidates to return.
    pub limit: usize,
}

impl PoiQuery {
    /// Creates an unfiltered query with the default result limit.
    pub fn new(location: Location) -> Self {
        Self {
            location,
            filters: PoiFilters::default(),
            limit: DEFAULT_RESULT_LIMIT,
        }
    }
}
