//! # Air Properties
//!
//! Thermophysical properties of dry air as functions of temperature and
//! pressure, plus the named reference conditions a system is designed for.
//!
//! - Density from the ideal gas law with R = 287.05 J/(kg·K)
//! - Dynamic viscosity from Sutherland's formula
//! - Specific heat from a linear fit around 1.005 kJ/(kg·°C)
//!
//! No validation is performed. Inputs at or below absolute zero simply
//! produce NaN or infinite values.
//!
//! ## Example
//!
//! ```rust
//! use duct_core::air;
//!
//! let rho = air::density(20.0, air::STANDARD_PRESSURE_KPA);
//! assert!((rho - 1.204).abs() < 0.001);
//! ```

use serde::{Deserialize, Serialize};

/// Specific gas constant for dry air, J/(kg·K)
pub const GAS_CONSTANT_AIR: f64 = 287.05;

/// Standard atmospheric pressure, kPa
pub const STANDARD_PRESSURE_KPA: f64 = 101.325;

/// Offset between °C and K
pub const KELVIN_OFFSET: f64 = 273.15;

/// Sutherland reference viscosity, Pa·s
const SUTHERLAND_MU0: f64 = 1.716e-5;
/// Sutherland reference temperature, K
const SUTHERLAND_T0: f64 = 273.15;
/// Sutherland constant for air, K
const SUTHERLAND_S: f64 = 110.4;

/// Air density in kg/m³.
pub fn density(temp_c: f64, pressure_kpa: f64) -> f64 {
    pressure_kpa * 1000.0 / (GAS_CONSTANT_AIR * (temp_c + KELVIN_OFFSET))
}

/// Air density at standard atmospheric pressure, kg/m³.
pub fn density_at_standard_pressure(temp_c: f64) -> f64 {
    density(temp_c, STANDARD_PRESSURE_KPA)
}

/// Dynamic viscosity in Pa·s (Sutherland's formula).
pub fn dynamic_viscosity(temp_c: f64) -> f64 {
    let t = temp_c + KELVIN_OFFSET;
    SUTHERLAND_MU0 * (t / SUTHERLAND_T0).powf(1.5) * (SUTHERLAND_T0 + SUTHERLAND_S) / (t + SUTHERLAND_S)
}

/// Kinematic viscosity in m²/s.
pub fn kinematic_viscosity(temp_c: f64, pressure_kpa: f64) -> f64 {
    dynamic_viscosity(temp_c) / density(temp_c, pressure_kpa)
}

/// Specific heat in kJ/(kg·°C).
pub fn specific_heat(temp_c: f64) -> f64 {
    1.005 + (temp_c / 100.0) * 0.004
}

/// A named design reference point for the air in the ducts.
///
/// Catalog entries are immutable; the derived properties are computed once
/// when the entry is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirCondition {
    /// Catalog key (e.g., "standard")
    pub id: String,
    /// Display name
    pub name: String,
    /// Dry-bulb temperature, °C
    pub temperature_c: f64,
    /// Relative humidity, %
    pub relative_humidity_pct: f64,
    /// Atmospheric pressure, kPa
    pub pressure_kpa: f64,
    /// Density, kg/m³
    pub density_kg_m3: f64,
    /// Dynamic viscosity, Pa·s
    pub dynamic_viscosity_pa_s: f64,
    /// Specific heat, kJ/(kg·°C)
    pub specific_heat_kj_kg_c: f64,
}

impl AirCondition {
    /// Build a condition, deriving density, viscosity and specific heat.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        temperature_c: f64,
        relative_humidity_pct: f64,
        pressure_kpa: f64,
    ) -> Self {
        AirCondition {
            id: id.into(),
            name: name.into(),
            temperature_c,
            relative_humidity_pct,
            pressure_kpa,
            density_kg_m3: density(temperature_c, pressure_kpa),
            dynamic_viscosity_pa_s: dynamic_viscosity(temperature_c),
            specific_heat_kj_kg_c: specific_heat(temperature_c),
        }
    }

    /// Kinematic viscosity, m²/s
    pub fn kinematic_viscosity(&self) -> f64 {
        self.dynamic_viscosity_pa_s / self.density_kg_m3
    }

    /// Specific heat in J/(kg·K), the unit the heat-loss model works in
    pub fn specific_heat_j_kg_k(&self) -> f64 {
        self.specific_heat_kj_kg_c * 1000.0
    }
}

/// The built-in reference conditions.
pub fn standard_conditions() -> Vec<AirCondition> {
    vec![
        AirCondition::new("standard", "Standard Air (20 °C, sea level)", 20.0, 50.0, STANDARD_PRESSURE_KPA),
        AirCondition::new("cooling", "Cooling Supply (13 °C)", 13.0, 90.0, STANDARD_PRESSURE_KPA),
        AirCondition::new("heating", "Heating Supply (40 °C)", 40.0, 20.0, STANDARD_PRESSURE_KPA),
        AirCondition::new("high_altitude", "High Altitude (1500 m)", 20.0, 50.0, 84.0),
    ]
}
