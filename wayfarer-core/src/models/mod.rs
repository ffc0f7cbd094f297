//! Domain models for Wayfarer.

pub mod context;
pub mod location;
pub mod offers;
pub mod poi;
pub mod provider;
pub mod weather;

pub use context::{FieldOutcome, TripContext, TripQuery};
pub use location::{LocalTimeEstimate, Location};
pub use offers::{sort_flight_offers, sort_hotel_offers, FlightOffer, HotelOffer};
pub use poi::{sort_poi_candidates, PoiCandidate, PoiFilters};
pub use provider::{Capability, OfferSource, ProviderId};
pub use weather::{AirQualitySnapshot, WeatherSnapshot};
