// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Wayfarer Core
//!
//! Core types, models, and the emissions estimator for Wayfarer.
//!
//! This crate provides the foundational abstractions used across all other
//! Wayfarer crates, including:
//!
//! - Domain models (locations, weather, offers, points of interest)
//! - The assembled [`TripContext`] with per-field outcomes
//! - The pure emissions estimator over the static factor table
//! - Core error types
//!
//! ## Key Types
//!
//! ### Provenance
//! - [`ProviderId`] - Enum of all supported data providers
//! - [`Capability`] - The kind of data a provider supplies
//! - [`OfferSource`] - Realtime vs. heuristic provenance
//!
//! ### Trip Data
//! - [`Location`] - Geocoded place with derived distance and local time
//! - [`WeatherSnapshot`] / [`AirQualitySnapshot`] - Current conditions
//! - [`HotelOffer`] / [`FlightOffer`] - Price-sorted offers
//! - [`PoiCandidate`] / [`PoiFilters`] - Points of interest
//!
//! ### Aggregation
//! - [`FieldOutcome`] - Per-capability status (ok/degraded/failed/timed out)
//! - [`TripContext`] - The normalized record handed to the generator
//!
//! ### Emissions
//! - [`emissions::estimate`] - Pure estimate over the factor table
//! - [`emissions::TransportMode`] - Modes with known factors

pub mod emissions;
pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Provenance
    Capability,
    OfferSource,
    ProviderId,
    // Trip data
    AirQualitySnapshot,
    FlightOffer,
    HotelOffer,
    LocalTimeEstimate,
    Location,
    PoiCandidate,
    PoiFilters,
    WeatherSnapshot,
    // Aggregation
    FieldOutcome,
    TripContext,
    TripQuery,
    // Sorting invariants
    sort_flight_offers,
    sort_hotel_offers,
    sort_poi_candidates,
};

// Re-export emissions types
pub use emissions::{estimate, select_mode, EmissionEstimate, EmissionFactor, FactorTable, TransportMode};
