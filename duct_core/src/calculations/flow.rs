//! # Duct Flow Calculations
//!
//! Friction loss in a duct run by the Darcy-Weisbach equation.
//!
//! ## Method
//!
//! - Velocity from volumetric flow and cross-section area
//! - Reynolds number on the hydraulic diameter
//! - Friction factor: `64/Re` below Re = 2300, otherwise the Haaland
//!   approximation of Colebrook-White
//! - Friction loss per meter: `f ρ v² / (2 Dh)`
//! - Velocity pressure: `½ ρ v²`
//!
//! All quantities are SI (m, m/s, Pa, kg/m³, Pa·s). Zero flow gives zero
//! velocity, a zero friction factor and zero loss instead of `64/0`.
//!
//! ## Example
//!
//! ```rust
//! use duct_core::calculations::flow::{calculate, FlowInput};
//! use duct_core::dimensions::DuctDimensions;
//!
//! let input = FlowInput::standard_air(
//!     500.0,
//!     DuctDimensions::Rectangular { width_mm: 457.0, height_mm: 152.0 },
//! );
//! let result = calculate(&input).unwrap();
//! assert!(result.velocity_m_s > 3.0 && result.velocity_m_s < 4.0);
//! assert!(result.friction_loss_pa_m > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::air;
use crate::dimensions::DuctDimensions;
use crate::errors::{CalcError, CalcResult};
use crate::units::cfm_to_m3s;

/// Absolute roughness of galvanized steel duct, m
pub const DEFAULT_ROUGHNESS_M: f64 = 0.00015;

/// Reynolds number below which flow is treated as laminar
pub const LAMINAR_REYNOLDS_LIMIT: f64 = 2300.0;

/// Cross-sectional area, m²
pub fn area(duct: &DuctDimensions) -> f64 {
    duct.area_m2()
}

/// Hydraulic diameter, m
pub fn hydraulic_diameter(duct: &DuctDimensions) -> f64 {
    duct.hydraulic_diameter_m()
}

/// Mean velocity in m/s for an airflow in CFM
pub fn velocity(cfm: f64, duct: &DuctDimensions) -> f64 {
    cfm_to_m3s(cfm) / area(duct)
}

/// Reynolds number `ρ v Dh / μ`
pub fn reynolds(density: f64, velocity: f64, hydraulic_diameter: f64, dynamic_viscosity: f64) -> f64 {
    density * velocity * hydraulic_diameter / dynamic_viscosity
}

/// Darcy friction factor.
pub fn friction_factor(reynolds: f64, hydraulic_diameter: f64, roughness: f64) -> f64 {
    if reynolds <= 0.0 {
        0.0
    } else if reynolds < LAMINAR_REYNOLDS_LIMIT {
        64.0 / reynolds
    } else {
        haaland(reynolds, hydraulic_diameter, roughness)
    }
}

/// Haaland's explicit approximation of Colebrook-White
fn haaland(reynolds: f64, hydraulic_diameter: f64, roughness: f64) -> f64 {
    let relative = roughness / hydraulic_diameter / 3.7;
    let term = relative.powf(1.11) + 6.9 / reynolds;
    (-1.8 * term.log10()).powi(-2)
}

/// Friction loss per unit length, Pa/m
pub fn friction_loss(friction_factor: f64, density: f64, velocity: f64, hydraulic_diameter: f64) -> f64 {
    friction_factor * density * velocity * velocity / (2.0 * hydraulic_diameter)
}

/// Velocity pressure, Pa
pub fn velocity_pressure(density: f64, velocity: f64) -> f64 {
    0.5 * density * velocity * velocity
}

/// Input for a single duct flow calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowInput {
    /// Airflow, CFM
    pub cfm: f64,
    /// Duct cross-section
    pub dimensions: DuctDimensions,
    /// Air density, kg/m³
    pub density_kg_m3: f64,
    /// Air dynamic viscosity, Pa·s
    pub dynamic_viscosity_pa_s: f64,
    /// Absolute wall roughness, m
    pub roughness_m: f64,
}

impl FlowInput {
    /// Input using standard air (20 °C, 101.325 kPa) and galvanized steel
    pub fn standard_air(cfm: f64, dimensions: DuctDimensions) -> Self {
        FlowInput {
            cfm,
            dimensions,
            density_kg_m3: air::density(20.0, air::STANDARD_PRESSURE_KPA),
            dynamic_viscosity_pa_s: air::dynamic_viscosity(20.0),
            roughness_m: DEFAULT_ROUGHNESS_M,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.cfm.is_finite() || self.cfm < 0.0 {
            return Err(CalcError::invalid_input(
                "cfm",
                self.cfm.to_string(),
                "Airflow must be zero or positive",
            ));
        }
        self.dimensions.validate()?;
        if !(self.roughness_m >= 0.0) {
            return Err(CalcError::invalid_input(
                "roughness_m",
                self.roughness_m.to_string(),
                "Roughness must not be negative",
            ));
        }
        Ok(())
    }
}

/// Results of a duct flow calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowResult {
    /// Mean velocity, m/s
    pub velocity_m_s: f64,
    /// Reynolds number on hydraulic diameter
    pub reynolds: f64,
    /// Darcy friction factor
    pub friction_factor: f64,
    /// Friction loss rate, Pa/m
    pub friction_loss_pa_m: f64,
    /// Velocity pressure, Pa
    pub velocity_pressure_pa: f64,
}

impl FlowResult {
    /// Flow regime label for reports
    pub fn regime(&self) -> &'static str {
        if self.reynolds <= 0.0 {
            "No flow"
        } else if self.reynolds < LAMINAR_REYNOLDS_LIMIT {
            "Laminar"
        } else {
            "Turbulent"
        }
    }
}

/// Calculate velocity, Reynolds number, friction and velocity pressure.
pub fn calculate(input: &FlowInput) -> CalcResult<FlowResult> {
    input.validate()?;

    let dh = hydraulic_diameter(&input.dimensions);
    let v = velocity(input.cfm, &input.dimensions);
    let re = reynolds(input.density_kg_m3, v, dh, input.dynamic_viscosity_pa_s);
    let f = friction_factor(re, dh, input.roughness_m);

    Ok(FlowResult {
        velocity_m_s: v,
        reynolds: re,
        friction_factor: f,
        friction_loss_pa_m: friction_loss(f, input.density_kg_m3, v, dh),
        velocity_pressure_pa: velocity_pressure(input.density_kg_m3, v),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_200() -> DuctDimensions {
        DuctDimensions::Round { diameter_mm: 200.0 }
    }

    #[test]
    fn test_velocity() {
        // 0.0471947 m³/s through 0.0314159 m²
        let v = velocity(100.0, &round_200());
        assert!((v - 1.50225).abs() < 1e-4);
    }

    #[test]
    fn test_reynolds() {
        let re = reynolds(1.2, 5.0, 0.2, 1.8e-5);
        assert!((re - 66_666.67).abs() < 0.1);
    }

    #[test]
    fn test_laminar_friction_factor() {
        assert!((friction_factor(1000.0, 0.2, DEFAULT_ROUGHNESS_M) - 0.064).abs() < 1e-12);
    }

    #[test]
    fn test_zero_flow_is_not_nan() {
        assert_eq!(friction_factor(0.0, 0.2, DEFAULT_ROUGHNESS_M), 0.0);
        let result = calculate(&FlowInput::standard_air(0.0, round_200())).unwrap();
        assert_eq!(result.velocity_m_s, 0.0);
        assert_eq!(result.friction_loss_pa_m, 0.0);
        assert_eq!(result.regime(), "No flow");
    }

    #[test]
    fn test_turbulent_friction_factor_range() {
        // Galvanized duct, Re = 1e5: Moody chart gives roughly 0.019-0.022
        let f = friction_factor(1.0e5, 0.3, DEFAULT_ROUGHNESS_M);
        assert!(f > 0.018 && f < 0.023, "f = {}", f);
    }

    #[test]
    fn test_friction_factor_continuity_at_transition() {
        let laminar = 64.0 / LAMINAR_REYNOLDS_LIMIT;
        let turbulent = friction_factor(LAMINAR_REYNOLDS_LIMIT, 0.2, DEFAULT_ROUGHNESS_M);
        assert!((laminar - 0.0278).abs() < 1e-4);
        let ratio = turbulent / laminar;
        assert!(ratio > 0.4 && ratio < 2.5, "ratio = {}", ratio);
    }

    #[test]
    fn test_friction_loss_and_velocity_pressure() {
        assert!((velocity_pressure(1.2, 5.0) - 15.0).abs() < 1e-12);
        // 0.02 * 1.2 * 25 / 0.4
        assert!((friction_loss(0.02, 1.2, 5.0, 0.2) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_equal_friction_table_lands_near_design_rate() {
        // 500 CFM in the table's 457x152 option should sit near 0.8 Pa/m
        let input = FlowInput::standard_air(
            500.0,
            DuctDimensions::Rectangular { width_mm: 457.0, height_mm: 152.0 },
        );
        let result = calculate(&input).unwrap();
        assert_eq!(result.regime(), "Turbulent");
        assert!(result.friction_loss_pa_m > 0.3 && result.friction_loss_pa_m < 2.0);
    }

    #[test]
    fn test_validation() {
        let mut input = FlowInput::standard_air(100.0, round_200());
        input.cfm = -1.0;
        assert!(calculate(&input).is_err());

        let bad_dims = FlowInput::standard_air(100.0, DuctDimensions::Round { diameter_mm: 0.0 });
        assert!(calculate(&bad_dims).is_err());
    }
}
