//! # Unit Types
//!
//! Type-safe wrappers for the units that cross the engine boundary. These
//! provide compile-time safety against unit confusion while remaining
//! lightweight (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Duct design uses a small, fixed set of units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## Units
//!
//! Calculations run in SI internally (m, Pa, m³/s). Airflow is entered in
//! CFM, the conventional HVAC unit, and the standard size table is kept in
//! inches:
//! - Airflow: cubic feet per minute (CFM), cubic meters per second (m³/s)
//! - Length: meters (m), millimeters (mm), feet (ft), inches (in)
//! - Pressure: pascals (Pa), inches of water gauge (in.wg)
//!
//! ## Example
//!
//! ```rust
//! use duct_core::units::{Cfm, CubicMetersPerSecond, Inches, Millimeters};
//!
//! let flow = Cfm(500.0);
//! let si: CubicMetersPerSecond = flow.into();
//! assert!((si.0 - 0.2359735).abs() < 1e-6);
//!
//! let width: Millimeters = Inches(18.0).into();
//! assert_eq!(width.rounded().0, 457.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// 1 CFM expressed in m³/s
pub const M3S_PER_CFM: f64 = 0.000471947;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Meters per foot
pub const M_PER_FOOT: f64 = 0.3048;

/// Pascals per inch of water gauge (at 4 °C)
pub const PA_PER_IN_WG: f64 = 249.0889;

/// Convert an airflow in CFM to m³/s
pub fn cfm_to_m3s(cfm: f64) -> f64 {
    cfm * M3S_PER_CFM
}

/// Convert an airflow in m³/s to CFM
pub fn m3s_to_cfm(m3s: f64) -> f64 {
    m3s / M3S_PER_CFM
}

// ============================================================================
// Airflow Units
// ============================================================================

/// Airflow in cubic feet per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cfm(pub f64);

/// Airflow in cubic meters per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMetersPerSecond(pub f64);

impl From<Cfm> for CubicMetersPerSecond {
    fn from(cfm: Cfm) -> Self {
        CubicMetersPerSecond(cfm_to_m3s(cfm.0))
    }
}

impl From<CubicMetersPerSecond> for Cfm {
    fn from(m3s: CubicMetersPerSecond) -> Self {
        Cfm(m3s_to_cfm(m3s.0))
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl Millimeters {
    /// Round to the nearest whole millimeter
    pub fn rounded(self) -> Self {
        Millimeters(self.0.round())
    }
}

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 * MM_PER_INCH)
    }
}

impl From<Millimeters> for Inches {
    fn from(mm: Millimeters) -> Self {
        Inches(mm.0 / MM_PER_INCH)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Feet> for Meters {
    fn from(ft: Feet) -> Self {
        Meters(ft.0 * M_PER_FOOT)
    }
}

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 / M_PER_FOOT)
    }
}

// ============================================================================
// Pressure Units
// ============================================================================

/// Pressure in pascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

/// Pressure in inches of water gauge
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InchesWaterGauge(pub f64);

impl From<Pascals> for InchesWaterGauge {
    fn from(pa: Pascals) -> Self {
        InchesWaterGauge(pa.0 / PA_PER_IN_WG)
    }
}

impl From<InchesWaterGauge> for Pascals {
    fn from(inwg: InchesWaterGauge) -> Self {
        Pascals(inwg.0 * PA_PER_IN_WG)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Cfm);
impl_arithmetic!(CubicMetersPerSecond);
impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Feet);
impl_arithmetic!(Inches);
impl_arithmetic!(Pascals);
impl_arithmetic!(InchesWaterGauge);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_inches_to_millimeters() {
        let mm: Millimeters = Inches(6.0).into();
        assert!((mm.0 - 152.4).abs() < 1e-9);
        assert_eq!(mm.rounded().0, 152.0);
    }

    #[test]
    fn test_cfm_conversion() {
        let si: CubicMetersPerSecond = Cfm(1000.0).into();
        assert!((si.0 - 0.471947).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_conversion() {
        let inwg: InchesWaterGauge = Pascals(249.0889).into();
        assert!((inwg.0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = Meters(10.0);
        let b = Meters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let flow = Cfm(450.5);
        let json = serde_json::to_string(&flow).unwrap();
        assert_eq!(json, "450.5");

        let roundtrip: Cfm = serde_json::from_str(&json).unwrap();
        assert_eq!(flow, roundtrip);
    }

    proptest! {
        #[test]
        fn cfm_round_trip(x in 0.0_f64..1.0e6) {
            let back = cfm_to_m3s(m3s_to_cfm(x));
            prop_assert!((back - x).abs() <= 1e-9 * x.max(1.0));
        }
    }
}
