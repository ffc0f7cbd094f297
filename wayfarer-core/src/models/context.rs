//! Per-field outcomes and the assembled trip context.
//!
//! Every fan-out lookup lands in the [`TripContext`] as a [`FieldOutcome`]
//! rather than a bare value, so "got data", "got reduced data", "failed",
//! and "ran out of time" stay distinguishable for downstream consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::location::{LocalTimeEstimate, Location};
use super::offers::{FlightOffer, HotelOffer};
use super::poi::{PoiCandidate, PoiFilters};
use super::weather::{AirQualitySnapshot, WeatherSnapshot};
use crate::emissions::{EmissionEstimate, TransportMode};

// ============================================================================
// Field Outcome
// ============================================================================

/// The outcome of one capability lookup inside an aggregation.
///
/// There is no `null` state: a lookup either produced a value, produced a
/// reduced-fidelity value, failed with a reason, or was abandoned at the
/// deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldOutcome<T> {
    /// The lookup succeeded.
    Ok {
        /// The normalized value.
        value: T,
    },
    /// The lookup produced a valid but reduced-fidelity value.
    Degraded {
        /// The normalized value.
        value: T,
        /// Why fidelity is reduced (e.g. fallback provider, missing fields).
        note: String,
    },
    /// The lookup failed after exhausting its fallback/retry options.
    Failed {
        /// Final error description.
        reason: String,
    },
    /// The lookup was abandoned when the aggregation deadline elapsed.
    TimedOut,
}

impl<T> FieldOutcome<T> {
    /// Returns the value for `Ok` and `Degraded` outcomes.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok { value } | Self::Degraded { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns true for `Ok` and `Degraded` outcomes.
    pub fn has_value(&self) -> bool {
        self.value().is_some()
    }

    /// Short status label for rendering and logs.
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Ok { .. } => "ok",
            Self::Degraded { .. } => "degraded",
            Self::Failed { .. } => "failed",
            Self::TimedOut => "timed_out",
        }
    }
}

// ============================================================================
// Trip Context
// ============================================================================

/// The original user request echoed into the context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripQuery {
    /// Free-text origin as given by the user.
    pub origin: String,
    /// Free-text destination as given by the user.
    pub destination: String,
    /// Requested departure date, when given.
    pub departure_date: Option<chrono::NaiveDate>,
    /// Explicitly requested transport mode, when given.
    pub mode: Option<TransportMode>,
    /// POI filters supplied with the request.
    pub poi_filters: PoiFilters,
}

/// The aggregated, normalized record of all data gathered for one
/// trip-planning request. Constructed once, immutable after assembly, and
/// passed by value to the external itinerary generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripContext {
    /// The request this context answers.
    pub query: TripQuery,
    /// Geocoded origin.
    pub origin: Location,
    /// Geocoded destination.
    pub destination: Location,
    /// Great-circle distance between the endpoints in kilometers.
    pub distance_km: f64,
    /// Coarse local-time estimate at the destination.
    pub destination_local_time: LocalTimeEstimate,
    /// Emission estimate for the selected transport mode.
    pub emissions: EmissionEstimate,
    /// Destination weather.
    pub weather: FieldOutcome<WeatherSnapshot>,
    /// Destination air quality.
    pub air_quality: FieldOutcome<AirQualitySnapshot>,
    /// Hotel offers near the destination, price ascending.
    pub hotels: FieldOutcome<Vec<HotelOffer>>,
    /// Flight offers between the endpoints, price ascending.
    pub flights: FieldOutcome<Vec<FlightOffer>>,
    /// Points of interest near the destination, rating descending.
    pub points_of_interest: FieldOutcome<Vec<PoiCandidate>>,
    /// When the context finished assembling.
    pub assembled_at: DateTime<Utc>,
}

impl TripContext {
    /// Returns the per-capability status labels, for summaries and tests.
    pub fn status_summary(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("weather", self.weather.status_label()),
            ("air_quality", self.air_quality.status_label()),
            ("hotels", self.hotels.status_label()),
            ("flights", self.flights.status_label()),
            ("points_of_interest", self.points_of_interest.status_label()),
        ]
    }

    /// True when every capability produced a value (possibly degraded).
    pub fn is_complete(&self) -> bool {
        self.weather.has_value()
            && self.air_quality.has_value()
            && self.hotels.has_value()
            && self.flights.has_value()
            && self.points_of_interest.has_value()
    }
}

// ============================================================================
// Tests
// ============================================================================
