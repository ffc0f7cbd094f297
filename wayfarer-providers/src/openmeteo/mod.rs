//! Open-Meteo adapters: current weather and air quality.
//!
//! Both endpoints are keyless. Timestamps are requested in unixtime so
//! parsing does not depend on the service's local-time formatting.

pub mod air_quality;
pub mod weather;

pub use air_quality::OpenMeteoAirQuality;
pub use weather::OpenMeteoWeather;
