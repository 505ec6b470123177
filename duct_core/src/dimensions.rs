//! # Duct Dimensions
//!
//! Cross-section of a duct run, stored in millimeters.
//!
//! ## JSON Serialization
//!
//! ```json
//! { "shape": "Round", "diameter_mm": 305.0 }
//! { "shape": "Rectangular", "width_mm": 457.0, "height_mm": 152.0 }
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcResult};

/// Cross-section shape requested when a segment is sized automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DuctShape {
    Round,
    #[default]
    Rectangular,
}

impl DuctShape {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            DuctShape::Round => "Round",
            DuctShape::Rectangular => "Rectangular",
        }
    }
}

/// Duct cross-section in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum DuctDimensions {
    Round { diameter_mm: f64 },
    Rectangular { width_mm: f64, height_mm: f64 },
}

impl DuctDimensions {
    /// Validated round section.
    pub fn round(diameter_mm: f64) -> CalcResult<Self> {
        require_positive("diameter_mm", diameter_mm)?;
        Ok(DuctDimensions::Round { diameter_mm })
    }

    /// Validated rectangular section.
    pub fn rectangular(width_mm: f64, height_mm: f64) -> CalcResult<Self> {
        require_positive("width_mm", width_mm)?;
        require_positive("height_mm", height_mm)?;
        Ok(DuctDimensions::Rectangular { width_mm, height_mm })
    }

    /// Check every dimension is finite and positive.
    ///
    /// Needed for values that arrive through deserialization instead of
    /// the validated constructors.
    pub fn validate(&self) -> CalcResult<()> {
        match *self {
            DuctDimensions::Round { diameter_mm } => require_positive("diameter_mm", diameter_mm),
            DuctDimensions::Rectangular { width_mm, height_mm } => {
                require_positive("width_mm", width_mm)?;
                require_positive("height_mm", height_mm)
            }
        }
    }

    pub fn shape(&self) -> DuctShape {
        match self {
            DuctDimensions::Round { .. } => DuctShape::Round,
            DuctDimensions::Rectangular { .. } => DuctShape::Rectangular,
        }
    }

    /// Cross-sectional area in m²
    pub fn area_m2(&self) -> f64 {
        match *self {
            DuctDimensions::Round { diameter_mm } => {
                let r = diameter_mm / 1000.0 / 2.0;
                PI * r * r
            }
            DuctDimensions::Rectangular { width_mm, height_mm } => (width_mm / 1000.0) * (height_mm / 1000.0),
        }
    }

    /// Wetted perimeter in m
    pub fn perimeter_m(&self) -> f64 {
        match *self {
            DuctDimensions::Round { diameter_mm } => PI * diameter_mm / 1000.0,
            DuctDimensions::Rectangular { width_mm, height_mm } => 2.0 * (width_mm + height_mm) / 1000.0,
        }
    }

    /// Hydraulic diameter in m: `d` for round, `4ab / 2(a+b)` for rectangular
    pub fn hydraulic_diameter_m(&self) -> f64 {
        match *self {
            DuctDimensions::Round { diameter_mm } => diameter_mm / 1000.0,
            DuctDimensions::Rectangular { width_mm, height_mm } => {
                let a = width_mm / 1000.0;
                let b = height_mm / 1000.0;
                4.0 * a * b / (2.0 * (a + b))
            }
        }
    }

    /// Round duct of equal friction, in mm.
    ///
    /// Rectangular: `De = 1.3 (ab)^0.625 / (a+b)^0.25` (Huebscher).
    pub fn equivalent_diameter_mm(&self) -> f64 {
        match *self {
            DuctDimensions::Round { diameter_mm } => diameter_mm,
            DuctDimensions::Rectangular { width_mm, height_mm } => {
                1.3 * (width_mm * height_mm).powf(0.625) / (width_mm + height_mm).powf(0.25)
            }
        }
    }

    /// Key used to group identical sizes in the bill of materials
    pub fn size_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DuctDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuctDimensions::Round { diameter_mm } => write!(f, "Round {}mm", diameter_mm),
            DuctDimensions::Rectangular { width_mm, height_mm } => {
                write!(f, "Rect {}x{}mm", width_mm, height_mm)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_reject_bad_values() {
        assert!(DuctDimensions::round(0.0).is_err());
        assert!(DuctDimensions::round(-100.0).is_err());
        assert!(DuctDimensions::rectangular(300.0, f64::NAN).is_err());
        assert!(DuctDimensions::rectangular(300.0, 200.0).is_ok());
    }

    #[test]
    fn test_round_geometry() {
        let d = DuctDimensions::round(200.0).unwrap();
        assert!((d.area_m2() - 0.0314159).abs() < 1e-6);
        assert_eq!(d.hydraulic_diameter_m(), 0.2);
        assert_eq!(d.equivalent_diameter_mm(), 200.0);
    }

    #[test]
    fn test_rectangular_geometry() {
        let d = DuctDimensions::rectangular(400.0, 200.0).unwrap();
        assert!((d.area_m2() - 0.08).abs() < 1e-12);
        // 4 * 0.08 / 1.2
        assert!((d.hydraulic_diameter_m() - 0.266667).abs() < 1e-5);
        assert!((d.perimeter_m() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_equivalent_diameter_of_square_is_larger_than_side() {
        // A square duct carries more than the inscribed circle: De ≈ 1.093 a
        let d = DuctDimensions::rectangular(300.0, 300.0).unwrap();
        let de = d.equivalent_diameter_mm();
        assert!((de / 300.0 - 1.093).abs() < 0.002);
    }

    #[test]
    fn test_size_key() {
        assert_eq!(DuctDimensions::round(305.0).unwrap().size_key(), "Round 305mm");
        assert_eq!(
            DuctDimensions::rectangular(457.0, 152.0).unwrap().size_key(),
            "Rect 457x152mm"
        );
    }

    #[test]
    fn test_serialization() {
        let d = DuctDimensions::rectangular(457.0, 152.0).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"shape\":\"Rectangular\""));
        let back: DuctDimensions = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }
}
