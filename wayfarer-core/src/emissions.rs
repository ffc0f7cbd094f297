//! Transport emissions estimation.
//!
//! Pure computation over a static factor table: no network I/O. The table
//! is embedded as a CSV asset, loaded once per process, and read-only
//! thereafter.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::CoreError;

/// Embedded factor table, grams of CO2 per kilometer per mode.
const FACTOR_CSV: &str = include_str!("../data/emission_factors.csv");

/// Distances under this favor rail over driving when no mode is given.
const TRAIN_PREFERRED_MAX_KM: f64 = 800.0;

// ============================================================================
// Transport Mode
// ============================================================================

/// Transport modes with known emission factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Gasoline car.
    CarGas,
    /// Battery-electric car.
    CarElectric,
    /// Rail.
    Train,
    /// Coach/bus.
    Bus,
    /// Commercial aviation.
    Plane,
}

impl TransportMode {
    /// All known modes.
    pub fn all() -> &'static [TransportMode] {
        &[
            Self::CarGas,
            Self::CarElectric,
            Self::Train,
            Self::Bus,
            Self::Plane,
        ]
    }

    /// The canonical lowercase name used in the factor table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CarGas => "car_gas",
            Self::CarElectric => "car_electric",
            Self::Train => "train",
            Self::Bus => "bus",
            Self::Plane => "plane",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car_gas" => Ok(Self::CarGas),
            "car_electric" => Ok(Self::CarElectric),
            "train" => Ok(Self::Train),
            "bus" => Ok(Self::Bus),
            "plane" => Ok(Self::Plane),
            other => Err(CoreError::Validation(format!(
                "Unknown transport mode '{other}'. Choose from: car_gas, car_electric, train, bus, plane"
            ))),
        }
    }
}

// ============================================================================
// Emission Factor Table
// ============================================================================

/// One row of the factor table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionFactor {
    /// Transport mode the factor applies to.
    pub mode: TransportMode,
    /// Kilograms of CO2 emitted per kilometer.
    pub kg_co2_per_km: f64,
}

/// CSV row shape of the embedded dataset.
#[derive(Debug, Deserialize)]
struct FactorRow {
    mode: String,
    grams_co2_per_km: f64,
}

/// Emission factors keyed by transport mode. Loaded once, read-only.
#[derive(Debug, Clone)]
pub struct FactorTable {
    factors: HashMap<TransportMode, f64>,
}

static TABLE: OnceLock<FactorTable> = OnceLock::new();

impl FactorTable {
    /// Parses a factor table from CSV text (mode, grams_co2_per_km).
    pub fn from_csv(text: &str) -> Result<Self, CoreError> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let mut factors = HashMap::new();

        for row in reader.deserialize::<FactorRow>() {
            let row = row.map_err(|e| CoreError::InvalidData(format!("Bad factor row: {e}")))?;
            let mode = TransportMode::from_str(&row.mode)
                .map_err(|_| CoreError::InvalidData(format!("Unknown mode '{}'", row.mode)))?;
            if !row.grams_co2_per_km.is_finite() || row.grams_co2_per_km < 0.0 {
                return Err(CoreError::InvalidData(format!(
                    "Invalid factor for mode '{}': {}",
                    row.mode, row.grams_co2_per_km
                )));
            }
            factors.insert(mode, row.grams_co2_per_km / 1000.0);
        }

        if factors.is_empty() {
            return Err(CoreError::InvalidData("Empty factor table".to_string()));
        }
        Ok(Self { factors })
    }

    /// The process-wide table loaded from the embedded dataset.
    ///
    /// # Panics
    ///
    /// Panics if the embedded CSV asset is malformed, which indicates a
    /// broken build rather than a runtime condition.
    pub fn global() -> &'static FactorTable {
        TABLE.get_or_init(|| {
            Self::from_csv(FACTOR_CSV).expect("embedded emission factor table is malformed")
        })
    }

    /// The factor for a mode in kg CO2 per km.
    pub fn factor(&self, mode: TransportMode) -> Option<f64> {
        self.factors.get(&mode).copied()
    }

    /// All factors as rows.
    pub fn rows(&self) -> Vec<EmissionFactor> {
        let mut rows: Vec<EmissionFactor> = self
            .factors
            .iter()
            .map(|(mode, kg)| EmissionFactor {
                mode: *mode,
                kg_co2_per_km: *kg,
            })
            .collect();
        rows.sort_by(|a, b| a.mode.as_str().cmp(b.mode.as_str()));
        rows
    }
}

// ============================================================================
// Emission Estimate
// ============================================================================

/// A derived emission estimate. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionEstimate {
    /// Transport mode the estimate applies to.
    pub mode: TransportMode,
    /// Trip distance in kilometers.
    pub distance_km: f64,
    /// Total kilograms of CO2 for the trip.
    pub total_kg_co2: f64,
}

/// Estimates emissions for a trip using the global factor table.
///
/// A negative or non-finite distance is a validation error, never a zero
/// estimate: zero emissions must only ever represent a true zero-distance
/// trip.
pub fn estimate(mode: TransportMode, distance_km: f64) -> Result<EmissionEstimate, CoreError> {
    estimate_with(FactorTable::global(), mode, distance_km)
}

/// Estimates emissions against an explicit factor table.
pub fn estimate_with(
    table: &FactorTable,
    mode: TransportMode,
    distance_km: f64,
) -> Result<EmissionEstimate, CoreError> {
    if !distance_km.is_finite() {
        return Err(CoreError::Validation(format!(
            "Distance must be a finite number, got {distance_km}"
        )));
    }
    if distance_km < 0.0 {
        return Err(CoreError::Validation(format!(
            "Distance must be non-negative, got {distance_km}"
        )));
    }
    let factor = table.factor(mode).ok_or_else(|| {
        CoreError::InvalidData(format!("No emission factor for mode '{mode}'"))
    })?;

    Ok(EmissionEstimate {
        mode,
        distance_km,
        total_kg_co2: distance_km * factor,
    })
}

/// Picks a default mode for a distance when the caller did not choose one:
/// rail for shorter trips, electric car otherwise. Flying is never chosen
/// implicitly.
pub fn select_mode(distance_km: f64) -> TransportMode {
    if distance_km < TRAIN_PREFERRED_MAX_KM {
        TransportMode::Train
    } else {
        TransportMode::CarElectric
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_table_has_all_modes() {
        let table = FactorTable::global();
        for mode in TransportMode::all() {
            assert!(table.factor(*mode).is_some(), "missing factor for {mode}");
        }
    }

    #[test]
    fn test_estimate_is_linear_in_distance() {
        for mode in TransportMode::all() {
            let single = estimate(*mode, 125.0).unwrap();
            let double = estimate(*mode, 250.0).unwrap();
            assert!(
                (double.total_kg_co2 - 2.0 * single.total_kg_co2).abs() < 1e-9,
                "not linear for {mode}"
            );
        }
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let a = estimate(TransportMode::Bus, 42.0).unwrap();
        let b = estimate(TransportMode::Bus, 42.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_train_600km_exact() {
        let table = FactorTable::global();
        let factor = table.factor(TransportMode::Train).unwrap();
        let est = estimate(TransportMode::Train, 600.0).unwrap();
        assert_eq!(est.total_kg_co2, 600.0 * factor);
    }

    #[test]
    fn test_negative_distance_is_validation_error() {
        let err = estimate(TransportMode::Train, -1.0).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_nan_distance_is_validation_error() {
        let err = estimate(TransportMode::Plane, f64::NAN).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_zero_distance_yields_true_zero() {
        let est = estimate(TransportMode::CarGas, 0.0).unwrap();
        assert_eq!(est.total_kg_co2, 0.0);
    }

    #[test]
    fn test_mode_heuristic() {
        assert_eq!(select_mode(300.0), TransportMode::Train);
        assert_eq!(select_mode(799.9), TransportMode::Train);
        assert_eq!(select_mode(800.0), TransportMode::CarElectric);
        assert_eq!(select_mode(2500.0), TransportMode::CarElectric);
    }

    #[test]
    fn test_unknown_mode_string_rejected() {
        let err = TransportMode::from_str("zeppelin").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_malformed_csv_rejected() {
        assert!(FactorTable::from_csv("mode,grams_co2_per_km\ntrain,-5\n").is_err());
        assert!(FactorTable::from_csv("mode,grams_co2_per_km\n").is_err());
        assert!(FactorTable::from_csv("mode,grams_co2_per_km\nwarp_drive,10\n").is_err());
    }
}
