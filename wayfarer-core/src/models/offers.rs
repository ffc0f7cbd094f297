//! Hotel and flight offers.
//!
//! Both offer kinds share one ordering invariant: within a response set,
//! offers are sorted ascending by price, and offers without a price sort
//! after every priced offer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::provider::OfferSource;

// ============================================================================
// Hotel Offer
// ============================================================================

/// A single hotel offer, either realtime-priced or heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    /// Provider-scoped hotel identifier.
    pub hotel_id: String,
    /// Hotel display name.
    pub name: String,
    /// Street address, when the provider supplies one.
    pub address: Option<String>,
    /// Star rating, when the listing carries one.
    pub stars: Option<u8>,
    /// Total price for the stay. Heuristic offers may carry a band
    /// midpoint here; offers without any price estimate carry `None`.
    pub price: Option<f64>,
    /// ISO currency code for `price`.
    pub currency: Option<String>,
    /// Human-readable price band for heuristic offers, e.g. "$120-$200".
    pub price_band: Option<String>,
    /// Whether this offer is realtime-priced or heuristic.
    pub source: OfferSource,
}

/// Sorts hotel offers ascending by price, priceless offers last.
pub fn sort_hotel_offers(offers: &mut [HotelOffer]) {
    offers.sort_by(|a, b| compare_optional_prices(a.price, b.price));
}

// ============================================================================
// Flight Offer
// ============================================================================

/// A single priced flight offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    /// Operating carrier code.
    pub carrier: String,
    /// Flight number within the carrier.
    pub flight_number: String,
    /// Scheduled departure time.
    pub departure: DateTime<Utc>,
    /// Scheduled arrival time.
    pub arrival: DateTime<Utc>,
    /// Number of stops (0 for nonstop).
    pub stops: u32,
    /// Total price.
    pub price: f64,
    /// ISO currency code for `price`.
    pub currency: String,
}

/// Sorts flight offers ascending by price.
pub fn sort_flight_offers(offers: &mut [FlightOffer]) {
    offers.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));
}

/// Price comparison with `None` ordered after every priced value.
fn compare_optional_prices(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ============================================================================
// Tests
// ============================================================================
