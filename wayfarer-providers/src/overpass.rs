//! Overpass hotel-search adapter.
//!
//! Keyless fallback for hotel offers: queries OpenStreetMap for hotels
//! around the destination and attaches a heuristic price band derived from
//! the star rating. Every offer it produces is tagged
//! [`OfferSource::Heuristic`] so consumers can tell estimates from live
//! prices.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};
use wayfarer_core::{sort_hotel_offers, Capability, HotelOffer, OfferSource, ProviderId};
use wayfarer_fetch::{Adapter, FetchContext, FetchError};

use crate::query::HotelQuery;

/// Public Overpass interpreter endpoint.
const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Search radius around the destination, in meters.
const SEARCH_RADIUS_M: u32 = 5000;

/// Price bands per star rating: (low, high) nightly USD.
/// The offer price is the band midpoint.
fn price_band_for_stars(stars: Option<u8>) -> (f64, f64) {
    match stars {
        Some(s) if s >= 5 => (250.0, 400.0),
        Some(4) => (180.0, 300.0),
        Some(3) => (120.0, 200.0),
        Some(2) => (80.0, 120.0),
        Some(_) => (50.0, 80.0),
        None => (100.0, 180.0),
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: u64,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl OverpassElement {
    fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }

    fn stars(&self) -> Option<u8> {
        // OSM star values occasionally carry halves ("3.5"); truncate.
        self.tags
            .get("stars")
            .and_then(|s| s.parse::<f64>().ok())
            .map(|s| s.clamp(0.0, 7.0) as u8)
    }

    fn address(&self) -> Option<String> {
        let street = self.tags.get("addr:street")?;
        let mut address = match self.tags.get("addr:housenumber") {
            Some(number) => format!("{number} {street}"),
            None => street.clone(),
        };
        if let Some(city) = self.tags.get("addr:city") {
            address.push_str(", ");
            address.push_str(city);
        }
        Some(address)
    }
}

// ============================================================================
// Adapter
// ============================================================================

/// Hotel search via the Overpass API, heuristically priced.
#[derive(Debug, Clone)]
pub struct OverpassHotels {
    base_url: String,
}

impl OverpassHotels {
    /// Creates an adapter against the public interpreter.
    pub fn new() -> Self {
        Self {
            base_url: OVERPASS_URL.to_string(),
        }
    }

    /// Overrides the endpoint (tests, mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn query_for(latitude: f64, longitude: f64) -> String {
        format!(
            "[out:json][timeout:25];\
             (node[\"tourism\"=\"hotel\"](around:{SEARCH_RADIUS_M},{latitude},{longitude});\
             way[\"tourism\"=\"hotel\"](around:{SEARCH_RADIUS_M},{latitude},{longitude}););\
             out tags;"
        )
    }
}

impl Default for OverpassHotels {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter<HotelQuery, Vec<HotelOffer>> for OverpassHotels {
    fn id(&self) -> &str {
        "hotels.overpass"
    }

    fn provider(&self) -> ProviderId {
        ProviderId::Overpass
    }

    fn capability(&self) -> Capability {
        Capability::HotelSearch
    }

    #[instrument(skip(self, ctx), fields(place = %params.location.name))]
    async fn fetch(
        &self,
        ctx: &FetchContext,
        params: &HotelQuery,
    ) -> Result<Vec<HotelOffer>, FetchError> {
        let query = Self::query_for(params.location.latitude, params.location.longitude);
        let request = ctx.http.post(&self.base_url).form(&[("data", query)]);

        let response = ctx.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: Some(status.as_u16()),
                message: format!("Overpass returned HTTP {status}"),
            });
        }

        let body: OverpassResponse = response.json().await?;
        if body.elements.is_empty() {
            return Err(FetchError::NoResults);
        }

        let mut offers: Vec<HotelOffer> = body
            .elements
            .iter()
            .filter_map(|element| {
                let name = element.name()?;
                let stars = element.stars();
                let (low, high) = price_band_for_stars(stars);
                Some(HotelOffer {
                    hotel_id: format!("osm:{}", element.id),
                    name: name.to_string(),
                    address: element.address(),
                    stars,
                    price: Some((low + high) / 2.0),
                    currency: Some("USD".to_string()),
                    price_band: Some(format!("${low:.0}-${high:.0}")),
                    source: OfferSource::Heuristic,
                })
            })
            .collect();

        if offers.is_empty() {
            // Only unnamed elements came back; nothing presentable.
            return Err(FetchError::NoResults);
        }

        sort_hotel_offers(&mut offers);
        offers.truncate(params.limit);
        debug!(count = offers.len(), "Built heuristic hotel offers");
        Ok(offers)
    }
}

// ============================================================================
// Tests
// ============================================================================
