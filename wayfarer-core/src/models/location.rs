//! Geocoded locations and derived geography.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Location
// ============================================================================

/// A geocoded place. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// The resolved place name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Location {
    /// Creates a new location.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another location in kilometers.
    pub fn distance_km(&self, other: &Location) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Kilometers,
        )
    }

    /// Approximate local time derived from longitude (15 degrees per hour).
    ///
    /// Real timezones can differ from simple longitude slices; this is a
    /// coarse estimate, not a timezone database lookup.
    pub fn approximate_local_time(&self, now: DateTime<Utc>) -> LocalTimeEstimate {
        let offset_hours = (self.longitude / 15.0).round() as i32;
        let local = now + Duration::hours(i64::from(offset_hours));
        LocalTimeEstimate {
            local_time: local.naive_utc(),
            utc_offset_hours: offset_hours,
        }
    }
}

// ============================================================================
// Local Time Estimate
// ============================================================================

/// A coarse local-time estimate for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalTimeEstimate {
    /// Estimated local wall-clock time.
    pub local_time: NaiveDateTime,
    /// Whole-hour UTC offset used for the estimate.
    pub utc_offset_hours: i32,
}

impl LocalTimeEstimate {
    /// Human-readable offset label, e.g. "UTC+2" or "UTC".
    pub fn offset_label(&self) -> String {
        if self.utc_offset_hours == 0 {
            "UTC".to_string()
        } else {
            format!("UTC{:+}", self.utc_offset_hours)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn san_francisco() -> Location {
        Location::new("San Francisco", 37.7749, -122.4194)
    }

    fn los_angeles() -> Location {
        Location::new("Los Angeles", 34.0522, -118.2437)
    }

    #[test]
    fn test_distance_sf_to_la() {
        let d = san_francisco().distance_km(&los_angeles());
        // Great-circle distance is roughly 559 km.
        assert!((500.0..620.0).contains(&d), "unexpected distance {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = san_francisco();
        let b = los_angeles();
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_distance() {
        let a = san_francisco();
        assert!(a.distance_km(&a).abs() < 1e-9);
    }

    #[test]
    fn test_local_time_offset_west() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let est = san_francisco().approximate_local_time(now);
        // -122.4 / 15 rounds to -8 hours.
        assert_eq!(est.utc_offset_hours, -8);
        assert_eq!(est.offset_label(), "UTC-8");
        assert_eq!(
            est.local_time,
            Utc.with_ymd_and_hms(2024, 6, 1, 4, 0, 0).unwrap().naive_utc()
        );
    }

    #[test]
    fn test_local_time_offset_zero() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let greenwich = Location::new("Greenwich", 51.48, 0.0);
        let est = greenwich.approximate_local_time(now);
        assert_eq!(est.utc_offset_hours, 0);
        assert_eq!(est.offset_label(), "UTC");
    }
}
