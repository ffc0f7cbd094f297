//! Text output formatting for assembled trip contexts.

use wayfarer_core::{FieldOutcome, TripContext};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the whole trip context as human-readable text.
    pub fn format_context(&self, context: &TripContext) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} -> {}",
            self.bold(&context.origin.name),
            self.bold(&context.destination.name)
        ));
        lines.push(format!(
            "  {:.0} km | local time {} ({})",
            context.distance_km,
            context.destination_local_time.local_time.format("%H:%M"),
            context.destination_local_time.offset_label()
        ));
        lines.push(format!(
            "  emissions: {:.1} kg CO2 by {}",
            context.emissions.total_kg_co2, context.emissions.mode
        ));
        lines.push(String::new());

        lines.push(self.field_header("Weather", &context.weather));
        if let Some(weather) = context.weather.value() {
            lines.push(format!(
                "  {:.1}°C, wind {:.0} km/h, humidity {:.0}%",
                weather.temperature_c, weather.wind_kph, weather.humidity_pct
            ));
        }

        lines.push(self.field_header("Air quality", &context.air_quality));
        if let Some(air) = context.air_quality.value() {
            let mut parts = Vec::new();
            if let Some(pm25) = air.pm25 {
                parts.push(format!("PM2.5 {pm25:.1}"));
            }
            if let Some(pm10) = air.pm10 {
                parts.push(format!("PM10 {pm10:.1}"));
            }
            if let Some(index) = air.quality_index {
                parts.push(format!("AQI {index}"));
            }
            lines.push(format!("  {}", parts.join(", ")));
        }

        lines.push(self.field_header("Hotels", &context.hotels));
        if let Some(hotels) = context.hotels.value() {
            for offer in hotels {
                let price = match (offer.price, &offer.price_band) {
                    (_, Some(band)) => format!("{band} (est.)"),
                    (Some(price), None) => format!(
                        "{price:.2} {}",
                        offer.currency.as_deref().unwrap_or("")
                    ),
                    (None, None) => "no price".to_string(),
                };
                lines.push(format!("  {:<32} {}", offer.name, self.cyan(&price)));
            }
        }

        lines.push(self.field_header("Flights", &context.flights));
        if let Some(flights) = context.flights.value() {
            for offer in flights {
                let stops = if offer.stops == 0 {
                    "nonstop".to_string()
                } else {
                    format!("{} stop(s)", offer.stops)
                };
                lines.push(format!(
                    "  {} {:<6} {} -> {} ({stops})  {}",
                    offer.carrier,
                    offer.flight_number,
                    offer.departure.format("%m-%d %H:%M"),
                    offer.arrival.format("%H:%M"),
                    self.cyan(&format!("{:.2} {}", offer.price, offer.currency))
                ));
            }
        }

        lines.push(self.field_header("Restaurants", &context.points_of_interest));
        if let Some(pois) = context.points_of_interest.value() {
            for poi in pois {
                let rating = poi
                    .rating
                    .map_or_else(|| "unrated".to_string(), |r| format!("{r:.1}"));
                lines.push(format!("  {:<32} {rating}", poi.name));
            }
        }

        lines.join("\n")
    }

    /// Section header with a colored status tag.
    fn field_header<T>(&self, label: &str, outcome: &FieldOutcome<T>) -> String {
        let status = outcome.status_label();
        let tag = if self.use_colors {
            let color = match status {
                "ok" => GREEN,
                "degraded" => YELLOW,
                _ => RED,
            };
            format!("{color}[{status}]{RESET}")
        } else {
            format!("[{status}]")
        };

        let detail = match outcome {
            FieldOutcome::Degraded { note, .. } => format!(" {}", self.dim(note)),
            FieldOutcome::Failed { reason } => format!(" {}", self.dim(reason)),
            _ => String::new(),
        };

        format!("{} {tag}{detail}", self.bold(label))
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            format!("{BOLD}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn cyan(&self, text: &str) -> String {
        if self.use_colors {
            format!("{CYAN}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wayfarer_core::{
        AirQualitySnapshot, EmissionEstimate, Location, PoiFilters, ProviderId, TransportMode,
        TripQuery, WeatherSnapshot,
    };

    fn sample_context() -> TripContext {
        let origin = Location::new("San Francisco", 37.7749, -122.4194);
        let destination = Location::new("Los Angeles", 34.0522, -118.2437);
        let local_time = destination.approximate_local_time(Utc::now());
        TripContext {
            query: TripQuery {
                origin: "San Francisco".to_string(),
                destination: "Los Angeles".to_string(),
                departure_date: None,
                mode: None,
                poi_filters: PoiFilters::default(),
            },
            origin,
            destination,
            distance_km: 559.0,
            destination_local_time: local_time,
            emissions: EmissionEstimate {
                mode: TransportMode::Train,
                distance_km: 559.0,
                total_kg_co2: 22.9,
            },
            weather: FieldOutcome::Ok {
                value: WeatherSnapshot {
                    temperature_c: 21.0,
                    wind_kph: 8.0,
                    humidity_pct: 50.0,
                    observed_at: Utc::now(),
                    source: ProviderId::OpenMeteo,
                },
            },
            air_quality: FieldOutcome::Degraded {
                value: AirQualitySnapshot {
                    pm25: Some(6.0),
                    pm10: None,
                    quality_index: None,
                    source: ProviderId::OpenMeteoAir,
                    degraded: true,
                },
                note: "reduced pollutant detail".to_string(),
            },
            hotels: FieldOutcome::Failed {
                reason: "All providers exhausted for hotel search".to_string(),
            },
            flights: FieldOutcome::TimedOut,
            points_of_interest: FieldOutcome::Ok { value: vec![] },
            assembled_at: Utc::now(),
        }
    }

    #[test]
    fn test_plain_output_carries_statuses() {
        let formatter = TextFormatter::new(false);
        let out = formatter.format_context(&sample_context());

        assert!(out.contains("[ok]"));
        assert!(out.contains("[degraded]"));
        assert!(out.contains("[failed]"));
        assert!(out.contains("[timed_out]"));
        assert!(out.contains("reduced pollutant detail"));
        assert!(!out.contains("\x1b["));
    }

    #[test]
    fn test_colored_output_uses_ansi() {
        let formatter = TextFormatter::new(true);
        let out = formatter.format_context(&sample_context());
        assert!(out.contains("\x1b[32m"));
        assert!(out.contains("\x1b[33m"));
    }
}
