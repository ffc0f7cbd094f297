//! Trip-context aggregation.
//!
//! Geocoding both endpoints is the only prerequisite the rest of the
//! fan-out cannot proceed without, so its failure is fatal. Everything
//! else runs concurrently under one shared deadline and lands in the
//! context as a per-field [`FieldOutcome`]; one provider having a bad day
//! never empties the whole context.

use chrono::{NaiveDate, Utc};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{timeout_at, Instant};
use tracing::{info, instrument, warn};
use wayfarer_core::{
    estimate, select_mode, AirQualitySnapshot, CoreError, FieldOutcome, HotelOffer, Location,
    OfferSource, PoiFilters, TransportMode, TripContext, TripQuery,
};
use wayfarer_fetch::{ChainOutcome, FetchContext, FetchError};

use crate::query::{FlightQuery, GeocodeQuery, HotelQuery, PoiQuery, DEFAULT_RESULT_LIMIT};
use crate::registry::Chains;

/// Default wall-clock budget for one assembly.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

// ============================================================================
// Trip Request
// ============================================================================

/// One trip-planning request.
#[derive(Debug, Clone)]
pub struct TripRequest {
    /// Free-text origin.
    pub origin: String,
    /// Free-text destination.
    pub destination: String,
    /// Departure date; defaults to the configured check-in date.
    pub departure_date: Option<NaiveDate>,
    /// Transport mode; defaults to the distance heuristic.
    pub mode: Option<TransportMode>,
    /// POI filters.
    pub poi_filters: PoiFilters,
    /// Maximum entries per list-shaped field.
    pub limit: usize,
    /// Wall-clock budget for the whole assembly.
    pub deadline: Duration,
}

impl TripRequest {
    /// Creates a request with default limit, deadline, and no filters.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure_date: None,
            mode: None,
            poi_filters: PoiFilters::default(),
            limit: DEFAULT_RESULT_LIMIT,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

// ============================================================================
// Aggregate Error
// ============================================================================

/// Fatal assembly errors. Per-field failures never surface here; they
/// land in the context as [`FieldOutcome`] states.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// An endpoint could not be geocoded, so nothing downstream can run.
    #[error("Could not geocode '{place}': {source}")]
    Geocoding {
        /// The free-text place that failed to resolve.
        place: String,
        /// The final chain error.
        source: FetchError,
    },

    /// The emissions estimate rejected its inputs.
    #[error("Emission estimate failed: {0}")]
    Emissions(#[from] CoreError),
}

// ============================================================================
// Aggregator
// ============================================================================

/// Assembles [`TripContext`]s by fanning requests out across the
/// capability chains.
pub struct Aggregator {
    chains: Chains,
}

impl Aggregator {
    /// Creates an aggregator over the given chains.
    pub fn new(chains: Chains) -> Self {
        Self { chains }
    }

    /// Aggregator over the standard public-endpoint wiring.
    pub fn standard() -> Self {
        Self::new(Chains::standard())
    }

    /// Assembles the full trip context for one request.
    #[instrument(skip(self, ctx, request), fields(origin = %request.origin, destination = %request.destination))]
    pub async fn assemble(
        &self,
        ctx: &FetchContext,
        request: &TripRequest,
    ) -> Result<TripContext, AggregateError> {
        let deadline = Instant::now() + request.deadline;

        // Both endpoints must resolve before anything else can run.
        let (origin, destination) = tokio::join!(
            self.geocode(ctx, &request.origin, deadline),
            self.geocode(ctx, &request.destination, deadline),
        );
        let origin = origin?;
        let destination = destination?;

        let distance_km = origin.distance_km(&destination);
        let mode = request.mode.unwrap_or_else(|| select_mode(distance_km));
        let emissions = estimate(mode, distance_km)?;
        let destination_local_time = destination.approximate_local_time(Utc::now());
        info!(distance_km, mode = %mode, "Endpoints resolved, fanning out");

        let today = Utc::now().date_naive();
        let departure_date = request
            .departure_date
            .unwrap_or_else(|| ctx.credentials.stay_dates(today).0);

        let hotel_query = HotelQuery {
            location: destination.clone(),
            limit: request.limit,
        };
        let flight_query = FlightQuery {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            departure_date,
            limit: request.limit,
        };
        let poi_query = PoiQuery {
            location: destination.clone(),
            filters: request.poi_filters.clone(),
            limit: request.limit,
        };

        let (weather, air_quality, hotels, flights, points_of_interest) = tokio::join!(
            bounded(deadline, self.chains.weather.execute(ctx, &destination)),
            bounded(deadline, self.chains.air_quality.execute(ctx, &destination)),
            bounded(deadline, self.chains.hotels.execute(ctx, &hotel_query)),
            bounded(deadline, self.chains.flights.execute(ctx, &flight_query)),
            bounded(deadline, self.chains.pois.execute(ctx, &poi_query)),
        );

        let context = TripContext {
            query: TripQuery {
                origin: request.origin.clone(),
                destination: request.destination.clone(),
                departure_date: request.departure_date,
                mode: request.mode,
                poi_filters: request.poi_filters.clone(),
            },
            origin,
            destination,
            distance_km,
            destination_local_time,
            emissions,
            weather,
            air_quality: refine_air_quality(air_quality),
            hotels: refine_hotels(hotels),
            flights,
            points_of_interest,
            assembled_at: Utc::now(),
        };

        info!(statuses = ?context.status_summary(), "Context assembled");
        Ok(context)
    }

    async fn geocode(
        &self,
        ctx: &FetchContext,
        place: &str,
        deadline: Instant,
    ) -> Result<Location, AggregateError> {
        let query = GeocodeQuery::new(place);
        let outcome = match timeout_at(deadline, self.chains.geocoding.execute(ctx, &query)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                return Err(AggregateError::Geocoding {
                    place: place.to_string(),
                    source: FetchError::Timeout(Duration::ZERO),
                })
            }
        };
        outcome.result.map(|r| r.value).map_err(|source| {
            warn!(place, %source, "Geocoding failed");
            AggregateError::Geocoding {
                place: place.to_string(),
                source,
            }
        })
    }
}

// ============================================================================
// Outcome Mapping
// ============================================================================

/// Runs a chain under the shared deadline and folds the result into a
/// per-field outcome.
async fn bounded<T, F>(deadline: Instant, fut: F) -> FieldOutcome<T>
where
    F: Future<Output = ChainOutcome<T>>,
{
    match timeout_at(deadline, fut).await {
        Ok(outcome) => {
            let used_fallback = outcome.used_fallback();
            match outcome.result {
                Ok(res) if used_fallback => FieldOutcome::Degraded {
                    note: format!("served by fallback provider {}", res.provider),
                    value: res.value,
                },
                Ok(res) => FieldOutcome::Ok { value: res.value },
                Err(error) => FieldOutcome::Failed {
                    reason: error.to_string(),
                },
            }
        }
        Err(_) => FieldOutcome::TimedOut,
    }
}

/// A reduced-mode snapshot downgrades its field even when the chain
/// itself reported a clean success.
fn refine_air_quality(outcome: FieldOutcome<AirQualitySnapshot>) -> FieldOutcome<AirQualitySnapshot> {
    match outcome {
        FieldOutcome::Ok { value } if value.degraded => FieldOutcome::Degraded {
            value,
            note: "reduced pollutant detail".to_string(),
        },
        other => other,
    }
}

/// Heuristic offers downgrade the hotels field.
fn refine_hotels(outcome: FieldOutcome<Vec<HotelOffer>>) -> FieldOutcome<Vec<HotelOffer>> {
    match outcome {
        FieldOutcome::Ok { value }
            if value.iter().any(|o| o.source == OfferSource::Heuristic) =>
        {
            FieldOutcome::Degraded {
                value,
                note: "heuristic price bands, no live pricing".to_string(),
            }
        }
        FieldOutcome::Degraded { value, .. }
            if value.iter().any(|o| o.source == OfferSource::Heuristic) =>
        {
            FieldOutcome::Degraded {
                value,
                note: "heuristic price bands, no live pricing".to_string(),
            }
        }
        other => other,
    }
}

// ============================================================================
// Tests
// ============================================================================
