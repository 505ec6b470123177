//! # Duct Heat Loss
//!
//! Temperature change of the air along a duct run, treating the run as a
//! heat exchanger between the duct air and the surrounding space (NTU
//! method).
//!
//! ```text
//! 1/U = 1/h_in + t/k + 1/h_out       (t/k = 0 when uninsulated)
//! A   = perimeter × length
//! NTU = U·A / (ṁ·cp)
//! ε   = 1 - exp(-NTU)
//! ΔT  = ε · (T_supply - T_ambient)
//! ```
//!
//! A positive ΔT is a drop (warm air losing heat); in cooling mode the
//! supply is colder than the surroundings and ΔT comes out negative.

use serde::{Deserialize, Serialize};

use crate::dimensions::DuctDimensions;
use crate::errors::{require_positive, CalcResult};
use crate::system::InsulationProperties;

/// Convective coefficient inside the duct, W/(m²·K)
pub const H_INSIDE_W_M2K: f64 = 25.0;

/// Combined coefficient at the outer surface, W/(m²·K)
pub const H_OUTSIDE_W_M2K: f64 = 10.0;

/// Overall heat transfer coefficient through the duct wall, W/(m²·K)
pub fn overall_u(insulation: Option<&InsulationProperties>) -> f64 {
    let r_insulation = insulation.map_or(0.0, |ins| (ins.thickness_mm / 1000.0) / ins.conductivity_w_mk);
    1.0 / (1.0 / H_INSIDE_W_M2K + r_insulation + 1.0 / H_OUTSIDE_W_M2K)
}

/// Input for a heat loss calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatLossInput {
    pub dimensions: DuctDimensions,
    /// Physical run length, m
    pub length_m: f64,
    /// Air mass flow, kg/s
    pub mass_flow_kg_s: f64,
    /// Air specific heat, J/(kg·K)
    pub specific_heat_j_kg_k: f64,
    pub supply_temp_c: f64,
    pub ambient_temp_c: f64,
    /// `None` for bare duct
    pub insulation: Option<InsulationProperties>,
}

/// Results of a heat loss calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatLossResult {
    /// Overall heat transfer coefficient, W/(m²·K)
    pub u_value_w_m2k: f64,
    /// Outer surface area, m²
    pub surface_area_m2: f64,
    /// Number of transfer units
    pub ntu: f64,
    /// Heat exchanger effectiveness, 0..1
    pub effectiveness: f64,
    /// Air temperature drop along the run, °C
    pub temp_drop_c: f64,
    /// Heat lost by the air, W
    pub heat_loss_w: f64,
}

/// Calculate the air temperature drop along a run.
///
/// A run with no airflow has nothing to cool, so it reports a zero drop.
pub fn calculate(input: &HeatLossInput) -> CalcResult<HeatLossResult> {
    input.dimensions.validate()?;
    require_positive("length_m", input.length_m)?;
    if let Some(ins) = &input.insulation {
        require_positive("thickness_mm", ins.thickness_mm)?;
        require_positive("conductivity_w_mk", ins.conductivity_w_mk)?;
    }

    let u = overall_u(input.insulation.as_ref());
    let area = input.dimensions.perimeter_m() * input.length_m;
    let capacity_rate = input.mass_flow_kg_s * input.specific_heat_j_kg_k;

    if !(capacity_rate > 0.0) {
        return Ok(HeatLossResult {
            u_value_w_m2k: u,
            surface_area_m2: area,
            ntu: 0.0,
            effectiveness: 0.0,
            temp_drop_c: 0.0,
            heat_loss_w: 0.0,
        });
    }

    let ntu = u * area / capacity_rate;
    let effectiveness = 1.0 - (-ntu).exp();
    let temp_drop_c = effectiveness * (input.supply_temp_c - input.ambient_temp_c);

    Ok(HeatLossResult {
        u_value_w_m2k: u,
        surface_area_m2: area,
        ntu,
        effectiveness,
        temp_drop_c,
        heat_loss_w: capacity_rate * temp_drop_c,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(insulation: Option<InsulationProperties>) -> HeatLossInput {
        HeatLossInput {
            dimensions: DuctDimensions::Round { diameter_mm: 200.0 },
            length_m: 10.0,
            mass_flow_kg_s: 0.1,
            specific_heat_j_kg_k: 1006.0,
            supply_temp_c: 40.0,
            ambient_temp_c: 10.0,
            insulation,
        }
    }

    fn fiberglass() -> InsulationProperties {
        InsulationProperties {
            material: "Fiberglass".to_string(),
            thickness_mm: 25.0,
            conductivity_w_mk: 0.04,
        }
    }

    #[test]
    fn test_bare_u_value() {
        // 1 / (0.04 + 0.1)
        assert!((overall_u(None) - 7.142857).abs() < 1e-6);
    }

    #[test]
    fn test_insulated_u_value() {
        // 1 / (0.04 + 0.625 + 0.1)
        assert!((overall_u(Some(&fiberglass())) - 1.30719).abs() < 1e-5);
    }

    #[test]
    fn test_bare_duct_drop() {
        let r = calculate(&input(None)).unwrap();
        // A = π·0.2·10 = 6.2832; NTU = 7.1429·6.2832/100.6 = 0.4461
        assert!((r.ntu - 0.4461).abs() < 1e-3);
        assert!((r.temp_drop_c - 30.0 * (1.0 - (-r.ntu).exp())).abs() < 1e-9);
        assert!(r.temp_drop_c > 10.0 && r.temp_drop_c < 12.0);
        assert!((r.heat_loss_w - 100.6 * r.temp_drop_c).abs() < 1e-9);
    }

    #[test]
    fn test_insulation_reduces_drop() {
        let bare = calculate(&input(None)).unwrap();
        let insulated = calculate(&input(Some(fiberglass()))).unwrap();
        assert!(insulated.temp_drop_c < bare.temp_drop_c);
        assert!(insulated.temp_drop_c > 0.0);
    }

    #[test]
    fn test_cooling_supply_gains_heat() {
        let mut cooling = input(None);
        cooling.supply_temp_c = 13.0;
        cooling.ambient_temp_c = 30.0;
        let r = calculate(&cooling).unwrap();
        assert!(r.temp_drop_c < 0.0);
    }

    #[test]
    fn test_zero_flow() {
        let mut still = input(None);
        still.mass_flow_kg_s = 0.0;
        let r = calculate(&still).unwrap();
        assert_eq!(r.temp_drop_c, 0.0);
        assert_eq!(r.heat_loss_w, 0.0);
    }

    #[test]
    fn test_rejects_bad_insulation() {
        let mut ins = fiberglass();
        ins.conductivity_w_mk = 0.0;
        assert!(calculate(&input(Some(ins))).is_err());
    }
}
