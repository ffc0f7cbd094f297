//! Amadeus flight offers.
//!
//! Two-phase flow like hotels: resolve each free-text endpoint to an IATA
//! code, then search priced offers between the codes. Segment timestamps
//! come back as local wall-clock times without an offset; they are kept
//! as-is on the UTC axis since ordering within one offer set is all the
//! aggregation needs.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};
use wayfarer_core::{sort_flight_offers, Capability, FlightOffer, ProviderId};
use wayfarer_fetch::{Adapter, FetchContext, FetchError};

use super::{parse_price, status_error, AMADEUS_BASE_URL};
use crate::query::FlightQuery;

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct LocationsResponse {
    #[serde(default)]
    data: Vec<LocationEntry>,
}

#[derive(Debug, Deserialize)]
struct LocationEntry {
    #[serde(rename = "iataCode")]
    iata_code: String,
}

#[derive(Debug, Deserialize)]
struct FlightOffersResponse {
    #[serde(default)]
    data: Vec<RawOffer>,
}

#[derive(Debug, Deserialize)]
struct RawOffer {
    itineraries: Vec<Itinerary>,
    price: RawPrice,
}

#[derive(Debug, Deserialize)]
struct Itinerary {
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(rename = "carrierCode")]
    carrier_code: String,
    number: String,
    departure: SegmentPoint,
    arrival: SegmentPoint,
}

#[derive(Debug, Deserialize)]
struct SegmentPoint {
    at: String,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    #[serde(rename = "grandTotal")]
    grand_total: String,
    currency: String,
}

fn parse_segment_time(raw: &str) -> Result<DateTime<Utc>, FetchError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|t| t.and_utc())
        .map_err(|_| FetchError::Parse(format!("Unrecognized segment time {raw:?}")))
}

// ============================================================================
// Adapter
// ============================================================================

/// Priced flight offers via Amadeus.
#[derive(Debug, Clone)]
pub struct AmadeusFlights {
    base_url: String,
}

impl AmadeusFlights {
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

    /// Resolves free text to the best-matching airport/city IATA code.
    async fn resolve_iata(
        &self,
        ctx: &FetchContext,
        bearer: &str,
        keyword: &str,
    ) -> Result<String, FetchError> {
        let url = format!("{}/v1/reference-data/locations", self.base_url);
        let request = ctx
            .http
            .get(&url)
            .header("Authorization", bearer)
            .query(&[
                ("keyword", keyword),
                ("subType", "CITY,AIRPORT"),
                ("page[limit]", "1"),
            ]);

        let response = ctx.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, "location lookup"));
        }

        let body: LocationsResponse = response.json().await?;
        body.data
            .into_iter()
            .next()
            .map(|entry| entry.iata_code)
            .ok_or(FetchError::NoResults)
    }
}

impl Default for AmadeusFlights {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter<FlightQuery, Vec<FlightOffer>> for AmadeusFlights {
    fn id(&self) -> &str {
        "flights.amadeus"
    }

    fn provider(&self) -> ProviderId {
        ProviderId::Amadeus
    }

    fn capability(&self) -> Capability {
        Capability::FlightSearch
    }

    async fn is_configured(&self, ctx: &FetchContext) -> bool {
        ctx.credentials.has_amadeus() && ctx.tokens.is_registered(ProviderId::Amadeus)
    }

    #[instrument(skip(self, ctx), fields(origin = %params.origin, destination = %params.destination))]
    async fn fetch(
        &self,
        ctx: &FetchContext,
        params: &FlightQuery,
    ) -> Result<Vec<FlightOffer>, FetchError> {
        let token = ctx.tokens.get(&ctx.http, ProviderId::Amadeus).await?;
        let bearer = token.bearer_header();

        let origin_code = self.resolve_iata(ctx, &bearer, &params.origin).await?;
        let destination_code = self.resolve_iata(ctx, &bearer, &params.destination).await?;
        debug!(%origin_code, %destination_code, "Resolved endpoints");

        let url = format!("{}/v2/shopping/flight-offers", self.base_url);
        let request = ctx
            .http
            .get(&url)
            .header("Authorization", &bearer)
            .query(&[
                ("originLocationCode", origin_code.as_str()),
                ("destinationLocationCode", destination_code.as_str()),
                ("departureDate", &params.departure_date.to_string()),
                ("adults", "1"),
                ("max", &params.limit.to_string()),
            ]);

        let response = ctx.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, "flight offers"));
        }

        let body: FlightOffersResponse = response.json().await?;
        if body.data.is_empty() {
            return Err(FetchError::NoResults);
        }

        let mut offers = Vec::with_capacity(body.data.len());
        for raw in &body.data {
            let segments = raw
                .itineraries
                .first()
                .map(|i| i.segments.as_slice())
                .unwrap_or_default();
            let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
                return Err(FetchError::Parse("Offer without segments".to_string()));
            };

            offers.push(FlightOffer {
                carrier: first.carrier_code.clone(),
                flight_number: first.number.clone(),
                departure: parse_segment_time(&first.departure.at)?,
                arrival: parse_segment_time(&last.arrival.at)?,
                stops: (segments.len() - 1) as u32,
                price: parse_price(&raw.price.grand_total)?,
                currency: raw.price.currency.clone(),
            });
        }

        sort_flight_offers(&mut offers);
        offers.truncate(params.limit);
        Ok(offers)
    }
}

// ============================================================================
// Tests
// ============================================================================
