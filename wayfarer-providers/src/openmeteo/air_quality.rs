//! Open-Meteo air-quality adapter.
//!
//! Two modes: the rich mode asks for PM2.5, PM10, and the European AQI;
//! the reduced mode (forced via the credential store's diagnostic flag)
//! asks only for the particulate series. A reduced snapshot is a valid
//! result flagged `degraded`, never an error.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use wayfarer_core::{AirQualitySnapshot, Capability, Location, ProviderId};
use wayfarer_fetch::{Adapter, FetchContext, FetchError};

/// Public Open-Meteo air-quality endpoint.
const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

/// Series requested in rich mode.
const RICH_FIELDS: &str = "pm2_5,pm10,european_aqi";

/// Series requested in reduced mode.
const REDUCED_FIELDS: &str = "pm2_5,pm10";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    hourly: HourlyBlock,
}

#[derive(Debug, Default, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    pm2_5: Vec<Option<f64>>,
    #[serde(default)]
    pm10: Vec<Option<f64>>,
    #[serde(default)]
    european_aqi: Vec<Option<f64>>,
}

fn first_reading(series: &[Option<f64>]) -> Option<f64> {
    series.first().copied().flatten()
}

// ============================================================================
// Adapter
// ============================================================================

/// Air quality via Open-Meteo.
#[derive(Debug, Clone)]
pub struct OpenMeteoAirQuality {
    base_url: String,
}

impl OpenMeteoAirQuality {
    /// Creates an adapter against the public endpoint.
    pub fn new() -> Self {
        Self {
            base_url: AIR_QUALITY_URL.to_string(),
        }
    }

    /// Overrides the endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for OpenMeteoAirQuality {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter<Location, AirQualitySnapshot> for OpenMeteoAirQuality {
    fn id(&self) -> &str {
        "air_quality.open_meteo"
    }

    fn provider(&self) -> ProviderId {
        ProviderId::OpenMeteoAir
    }

    fn capability(&self) -> Capability {
        Capability::AirQuality
    }

    #[instrument(skip(self, ctx), fields(place = %params.name))]
    async fn fetch(
        &self,
        ctx: &FetchContext,
        params: &Location,
    ) -> Result<AirQualitySnapshot, FetchError> {
        let reduced = ctx.credentials.force_degraded_air();
        let fields = if reduced { REDUCED_FIELDS } else { RICH_FIELDS };

        let request = ctx.http.get(&self.base_url).query(&[
            ("latitude", params.latitude.to_string()),
            ("longitude", params.longitude.to_string()),
            ("hourly", fields.to_string()),
        ]);

        let response = ctx.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: Some(status.as_u16()),
                message: format!("Open-Meteo air quality returned HTTP {status}"),
            });
        }

        let body: AirQualityResponse = response.json().await?;
        let pm25 = first_reading(&body.hourly.pm2_5);
        let pm10 = first_reading(&body.hourly.pm10);
        let quality_index = first_reading(&body.hourly.european_aqi).map(|v| v.round() as u32);

        // A rich request that came back without the index is still served,
        // just flagged as reduced fidelity.
        let degraded = reduced || quality_index.is_none();
        if degraded {
            debug!(reduced, "Serving reduced air-quality snapshot");
        }

        let snapshot = AirQualitySnapshot {
            pm25,
            pm10,
            quality_index,
            source: ProviderId::OpenMeteoAir,
            degraded,
        };

        if !snapshot.has_readings() {
            return Err(FetchError::NoResults);
        }
        Ok(snapshot)
    }
}

// ============================================================================
// Tests
// ============================================================================
