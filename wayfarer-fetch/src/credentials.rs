//! Provider credentials and tuning knobs.
//!
//! Credentials are read from the environment exactly once at startup and
//! held immutably for the process lifetime. The store never prints secret
//! material.

use chrono::{Duration, NaiveDate};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Environment variable for the Amadeus client id.
const AMADEUS_KEY_ENV: &str = "AMADEUS_API_KEY";

/// Environment variable for the Amadeus client secret.
const AMADEUS_SECRET_ENV: &str = "AMADEUS_API_SECRET";

/// Environment variable for the Places API key.
const PLACES_KEY_ENV: &str = "GOOGLE_PLACES_API_KEY";

/// Days from today to the hotel check-in date.
const CHECKIN_OFFSET_ENV: &str = "AMADEUS_CHECKIN_OFFSET_DAYS";

/// Length of the hotel stay in nights.
const STAY_NIGHTS_ENV: &str = "AMADEUS_STAY_NIGHTS";

/// Forces the air-quality adapter into its reduced JSON mode.
const FORCE_DEGRADED_AIR_ENV: &str = "OPENMETEO_FORCE_JSON";

/// Relaxes TLS verification. Diagnostic use only; never the default.
const ALLOW_INSECURE_TLS_ENV: &str = "WAYFARER_ALLOW_INSECURE_TLS";

const DEFAULT_CHECKIN_OFFSET_DAYS: i64 = 7;
const DEFAULT_STAY_NIGHTS: i64 = 1;

// ============================================================================
// Credential Store
// ============================================================================

/// Immutable store of provider credentials and tuning values.
#[derive(Clone, Default)]
pub struct CredentialStore {
    amadeus_key: Option<String>,
    amadeus_secret: Option<String>,
    places_key: Option<String>,
    checkin_offset_days: i64,
    stay_nights: i64,
    force_degraded_air: bool,
    allow_insecure_tls: bool,
}

impl CredentialStore {
    /// Reads credentials and tuning values from the environment.
    pub fn from_env() -> Self {
        Self {
            amadeus_key: read_env(AMADEUS_KEY_ENV),
            amadeus_secret: read_env(AMADEUS_SECRET_ENV),
            places_key: read_env(PLACES_KEY_ENV),
            checkin_offset_days: read_env(CHECKIN_OFFSET_ENV)
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CHECKIN_OFFSET_DAYS),
            stay_nights: read_env(STAY_NIGHTS_ENV)
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_STAY_NIGHTS)
                .max(1),
            force_degraded_air: read_flag(FORCE_DEGRADED_AIR_ENV),
            allow_insecure_tls: read_flag(ALLOW_INSECURE_TLS_ENV),
        }
    }

    /// An empty store (no provider configured). Useful for tests.
    pub fn empty() -> Self {
        Self {
            checkin_offset_days: DEFAULT_CHECKIN_OFFSET_DAYS,
            stay_nights: DEFAULT_STAY_NIGHTS,
            ..Default::default()
        }
    }

    /// Sets the Amadeus client id/secret pair.
    pub fn with_amadeus(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.amadeus_key = Some(key.into());
        self.amadeus_secret = Some(secret.into());
        self
    }

    /// Sets the Places API key.
    pub fn with_places(mut self, key: impl Into<String>) -> Self {
        self.places_key = Some(key.into());
        self
    }

    /// Sets the check-in offset and stay length (nights floored at 1).
    pub fn with_stay(mut self, checkin_offset_days: i64, stay_nights: i64) -> Self {
        self.checkin_offset_days = checkin_offset_days;
        self.stay_nights = stay_nights.max(1);
        self
    }

    /// Forces the reduced air-quality mode.
    pub fn with_forced_degraded_air(mut self) -> Self {
        self.force_degraded_air = true;
        self
    }

    /// True when both Amadeus credentials are present.
    pub fn has_amadeus(&self) -> bool {
        self.amadeus_key.is_some() && self.amadeus_secret.is_some()
    }

    /// True when the Places key is present.
    pub fn has_places(&self) -> bool {
        self.places_key.is_some()
    }

    /// The Amadeus client id/secret pair, when both are configured.
    pub fn amadeus_pair(&self) -> Option<(&str, &str)> {
        match (&self.amadeus_key, &self.amadeus_secret) {
            (Some(key), Some(secret)) => Some((key.as_str(), secret.as_str())),
            _ => None,
        }
    }

    /// The Places API key, when configured.
    pub fn places_key(&self) -> Option<&str> {
        self.places_key.as_deref()
    }

    /// Check-in and check-out dates derived from the tuning values.
    pub fn stay_dates(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let check_in = today + Duration::days(self.checkin_offset_days);
        let check_out = check_in + Duration::days(self.stay_nights);
        (check_in, check_out)
    }

    /// True when the air-quality adapter must use its reduced mode.
    pub fn force_degraded_air(&self) -> bool {
        self.force_degraded_air
    }

    /// True when TLS verification is relaxed (diagnostic only).
    pub fn allow_insecure_tls(&self) -> bool {
        self.allow_insecure_tls
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("amadeus", &self.has_amadeus())
            .field("places", &self.has_places())
            .field("checkin_offset_days", &self.checkin_offset_days)
            .field("stay_nights", &self.stay_nights)
            .field("force_degraded_air", &self.force_degraded_air)
            .field("allow_insecure_tls", &self.allow_insecure_tls)
            .finish()
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

// ============================================================================
// Tests
// ============================================================================
