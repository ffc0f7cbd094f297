// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Wayfarer Providers
//!
//! Provider adapters and the trip-context aggregator.
//!
//! Each external service has one adapter module that owns its wire shapes
//! and normalizes responses into the `wayfarer-core` data model. The
//! [`registry`] wires adapters into per-capability fallback chains, and
//! the [`Aggregator`] fans a trip request out across them under a shared
//! deadline.
//!
//! ## Providers
//!
//! - [`nominatim`] - geocoding (keyless)
//! - [`openmeteo`] - weather and air quality (keyless)
//! - [`overpass`] - hotel search with heuristic pricing (keyless)
//! - [`amadeus`] - realtime hotel pricing and flight offers (OAuth)
//! - [`places`] - restaurant candidates (API key)

pub mod aggregator;
pub mod amadeus;
pub mod nominatim;
pub mod openmeteo;
pub mod overpass;
pub mod places;
pub mod query;
pub mod registry;

pub use aggregator::{AggregateError, Aggregator, TripRequest, DEFAULT_DEADLINE};
pub use query::{FlightQuery, GeocodeQuery, HotelQuery, PoiQuery, DEFAULT_RESULT_LIMIT};
pub use registry::{build_context, Chains};
