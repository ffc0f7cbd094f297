//! Amadeus realtime hotel pricing.
//!
//! Two-phase flow: list hotel ids around the destination, then price the
//! shortlist for the configured stay window. The id list is capped before
//! the pricing call; the offers endpoint rejects long id lists.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, instrument};
use wayfarer_core::{sort_hotel_offers, Capability, HotelOffer, OfferSource, ProviderId};
use wayfarer_fetch::{Adapter, FetchContext, FetchError};

use super::{parse_price, status_error, AMADEUS_BASE_URL};
use crate::query::HotelQuery;

/// Search radius for the id listing, in miles.
const SEARCH_RADIUS_MILES: u32 = 5;

/// Maximum number of hotel ids submitted to the pricing endpoint.
const MAX_HOTEL_IDS: usize = 20;

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct HotelListResponse {
    #[serde(default)]
    data: Vec<ListedHotel>,
}

#[derive(Debug, Deserialize)]
struct ListedHotel {
    #[serde(rename = "hotelId")]
    hotel_id: String,
}

#[derive(Debug, Deserialize)]
struct OffersResponse {
    #[serde(default)]
    data: Vec<HotelWithOffers>,
}

#[derive(Debug, Deserialize)]
struct HotelWithOffers {
    hotel: OfferedHotel,
    #[serde(default)]
    offers: Vec<Offer>,
}

#[derive(Debug, Deserialize)]
struct OfferedHotel {
    #[serde(rename = "hotelId")]
    hotel_id: String,
    name: String,
    #[serde(default)]
    address: Option<HotelAddress>,
}

#[derive(Debug, Deserialize)]
struct HotelAddress {
    #[serde(default)]
    lines: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Offer {
    price: OfferPrice,
}

#[derive(Debug, Deserialize)]
struct OfferPrice {
    total: String,
    #[serde(default)]
    currency: Option<String>,
}

// ============================================================================
// Adapter
// ============================================================================

/// Realtime hotel offers via Amadeus.
#[derive(Debug, Clone)]
pub struct AmadeusHotels {
    base_url: String,
}

impl AmadeusHotels {
    /// Creates an adapter against the standard API host.
    pub fn new() -> Self {
        Self {
            base_url: AMADEUS_BASE_URL.to_string(),
        }
    }

    /// Overrides the API host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for AmadeusHotels {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter<HotelQuery, Vec<HotelOffer>> for AmadeusHotels {
    fn id(&self) -> &str {
        "hotels.amadeus"
    }

    fn provider(&self) -> ProviderId {
        ProviderId::Amadeus
    }

    fn capability(&self) -> Capability {
        Capability::HotelSearch
    }

    async fn is_configured(&self, ctx: &FetchContext) -> bool {
        ctx.credentials.has_amadeus() && ctx.tokens.is_registered(ProviderId::Amadeus)
    }

    #[instrument(skip(self, ctx), fields(place = %params.location.name))]
    async fn fetch(
        &self,
        ctx: &FetchContext,
        params: &HotelQuery,
    ) -> Result<Vec<HotelOffer>, FetchError> {
        let token = ctx.tokens.get(&ctx.http, ProviderId::Amadeus).await?;
        let (check_in, check_out) = ctx.credentials.stay_dates(Utc::now().date_naive());

        // Phase 1: hotel ids around the destination.
        let list_url = format!("{}/v1/reference-data/locations/hotels/by-geocode", self.base_url);
        let request = ctx
            .http
            .get(&list_url)
            .header("Authorization", token.bearer_header())
            .query(&[
                ("latitude", params.location.latitude.to_string()),
                ("longitude", params.location.longitude.to_string()),
                ("radius", SEARCH_RADIUS_MILES.to_string()),
                ("radiusUnit", "MILE".to_string()),
            ]);

        let response = ctx.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, "hotel list"));
        }

        let listing: HotelListResponse = response.json().await?;
        let ids: Vec<String> = listing
            .data
            .into_iter()
            .take(MAX_HOTEL_IDS)
            .map(|h| h.hotel_id)
            .collect();
        if ids.is_empty() {
            return Err(FetchError::NoResults);
        }
        debug!(count = ids.len(), "Pricing hotel shortlist");

        // Phase 2: price the shortlist for the stay window.
        let offers_url = format!("{}/v3/shopping/hotel-offers", self.base_url);
        let request = ctx
            .http
            .get(&offers_url)
            .header("Authorization", token.bearer_header())
            .query(&[
                ("hotelIds", ids.join(",")),
                ("adults", "1".to_string()),
                ("checkInDate", check_in.to_string()),
                ("checkOutDate", check_out.to_string()),
                ("roomQuantity", "1".to_string()),
                ("bestRateOnly", "true".to_string()),
            ]);

        let response = ctx.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, "hotel offers"));
        }

        let priced: OffersResponse = response.json().await?;
        let mut offers = Vec::new();
        for entry in priced.data {
            let Some(cheapest) = cheapest_offer(&entry.offers)? else {
                continue;
            };
            offers.push(HotelOffer {
                hotel_id: entry.hotel.hotel_id,
                name: entry.hotel.name,
                address: entry
                    .hotel
                    .address
                    .filter(|a| !a.lines.is_empty())
                    .map(|a| a.lines.join(", ")),
                stars: None,
                price: Some(cheapest.0),
                currency: cheapest.1,
                price_band: None,
                source: OfferSource::Realtime,
            });
        }

        if offers.is_empty() {
            return Err(FetchError::NoResults);
        }
        sort_hotel_offers(&mut offers);
        offers.truncate(params.limit);
        Ok(offers)
    }
}

/// The lowest total among a hotel's offers, with its currency.
fn cheapest_offer(offers: &[Offer]) -> Result<Option<(f64, Option<String>)>, FetchError> {
    let mut best: Option<(f64, Option<String>)> = None;
    for offer in offers {
        let total = parse_price(&offer.price.total)?;
        if best.as_ref().is_none_or(|(b, _)| total < *b) {
            best = Some((total, offer.price.currency.clone()));
        }
    }
    Ok(best)
}

// ============================================================================
// Tests
// ============================================================================
