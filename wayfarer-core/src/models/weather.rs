//! Weather and air quality snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provider::ProviderId;

// ============================================================================
// Weather Snapshot
// ============================================================================

/// Current weather conditions at a location. One per (location, time)
/// request; not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Wind speed in kilometers per hour.
    pub wind_kph: f64,
    /// Relative humidity as a percentage.
    pub humidity_pct: f64,
    /// When the conditions were observed.
    pub observed_at: DateTime<Utc>,
    /// The provider that supplied this snapshot.
    pub source: ProviderId,
}

// ============================================================================
// Air Quality Snapshot
// ============================================================================

/// Current air quality at a location.
///
/// A degraded snapshot (`degraded = true`) comes from a reduced JSON
/// fallback mode where rich pollutant fields may be missing. Degraded is a
/// valid result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualitySnapshot {
    /// PM2.5 concentration in µg/m³, when available.
    pub pm25: Option<f64>,
    /// PM10 concentration in µg/m³, when available.
    pub pm10: Option<f64>,
    /// Aggregate quality index (European AQI scale), when available.
    pub quality_index: Option<u32>,
    /// The provider that supplied this snapshot.
    pub source: ProviderId,
    /// True when this snapshot was produced by the reduced fallback mode.
    pub degraded: bool,
}

impl AirQualitySnapshot {
    /// Returns true if any pollutant reading is present.
    pub fn has_readings(&self) -> bool {
        self.pm25.is_some() || self.pm10.is_some() || self.quality_index.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================
