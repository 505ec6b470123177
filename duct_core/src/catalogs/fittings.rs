//! Fitting Library
//!
//! Catalog of duct fittings and the equivalent length each one adds to a
//! run. Equivalent lengths fold local losses into the same friction-loss
//! formula used for straight duct.
//!
//! ## Equivalent Length Rules
//!
//! - `Constant` - fixed length in meters regardless of duct size
//! - `BySize` - step function of the equivalent diameter of the duct the
//!   fitting is installed in. The first step whose `max_diameter_mm` covers
//!   the duct applies; larger ducts use the last step.
//!
//! Terminal devices (diffusers, registers, grilles) are in the catalog for
//! their loss coefficients but never contribute equivalent length to a
//! segment.
//!
//! ## Example
//!
//! ```rust
//! use duct_core::catalogs::FittingLibrary;
//! use duct_core::dimensions::DuctDimensions;
//!
//! let library = FittingLibrary::standard();
//! let elbow = library.get("elbow_90_smooth").expect("built-in fitting");
//! let duct = DuctDimensions::Round { diameter_mm: 250.0 };
//! assert_eq!(elbow.equivalent_length_m(&duct), 2.4);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dimensions::DuctDimensions;
use crate::errors::{CalcError, CalcResult};

/// Fitting classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FittingCategory {
    Elbow,
    Transition,
    Takeoff,
    Boot,
    Collar,
    Damper,
    Diffuser,
}

impl FittingCategory {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            FittingCategory::Elbow => "Elbow",
            FittingCategory::Transition => "Transition",
            FittingCategory::Takeoff => "Takeoff",
            FittingCategory::Boot => "Boot",
            FittingCategory::Collar => "Collar",
            FittingCategory::Damper => "Damper",
            FittingCategory::Diffuser => "Diffuser",
        }
    }

    /// Terminal devices sit at the end of a run, not in it
    pub fn is_terminal(&self) -> bool {
        matches!(self, FittingCategory::Diffuser)
    }
}

/// One step of a size-dependent equivalent length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeStep {
    /// Largest equivalent duct diameter this step covers, mm
    pub max_diameter_mm: f64,
    /// Equivalent length, m
    pub length_m: f64,
}

/// How a fitting's equivalent length is determined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule")]
pub enum EquivalentLength {
    /// Fixed equivalent length in meters
    Constant { length_m: f64 },
    /// Step function of equivalent duct diameter, ascending
    BySize { steps: Vec<SizeStep> },
}

impl EquivalentLength {
    /// Evaluate the rule for a duct of the given equivalent diameter.
    pub fn evaluate(&self, equivalent_diameter_mm: f64) -> f64 {
        match self {
            EquivalentLength::Constant { length_m } => *length_m,
            EquivalentLength::BySize { steps } => steps
                .iter()
                .find(|s| s.max_diameter_mm >= equivalent_diameter_mm)
                .or_else(|| steps.last())
                .map_or(0.0, |s| s.length_m),
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittingType {
    /// Catalog key referenced by segments
    pub id: String,
    /// Display name (used in the bill of materials)
    pub name: String,
    pub category: FittingCategory,
    pub equivalent_length: EquivalentLength,
    /// Local loss coefficient K, where published
    pub loss_coefficient: Option<f64>,
}

impl FittingType {
    /// Equivalent length in meters when installed in `duct`
    pub fn equivalent_length_m(&self, duct: &DuctDimensions) -> f64 {
        self.equivalent_length.evaluate(duct.equivalent_diameter_mm())
    }
}

fn constant(id: &str, name: &str, category: FittingCategory, length_m: f64, k: Option<f64>) -> FittingType {
    FittingType {
        id: id.to_string(),
        name: name.to_string(),
        category,
        equivalent_length: EquivalentLength::Constant { length_m },
        loss_coefficient: k,
    }
}

fn by_size(id: &str, name: &str, category: FittingCategory, steps: &[(f64, f64)], k: Option<f64>) -> FittingType {
    FittingType {
        id: id.to_string(),
        name: name.to_string(),
        category,
        equivalent_length: EquivalentLength::BySize {
            steps: steps
                .iter()
                .map(|&(max_diameter_mm, length_m)| SizeStep { max_diameter_mm, length_m })
                .collect(),
        },
        loss_coefficient: k,
    }
}

/// Fittings indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FittingLibrary {
    fittings: HashMap<String, FittingType>,
}

impl FittingLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fitting, rejecting duplicate ids and negative lengths.
    pub fn insert(&mut self, fitting: FittingType) -> CalcResult<()> {
        if self.fittings.contains_key(&fitting.id) {
            return Err(CalcError::invalid_input("id", fitting.id.clone(), "Duplicate fitting id"));
        }
        let negative = match &fitting.equivalent_length {
            EquivalentLength::Constant { length_m } => *length_m < 0.0,
            EquivalentLength::BySize { steps } => steps.iter().any(|s| s.length_m < 0.0),
        };
        if negative {
            return Err(CalcError::invalid_input(
                "equivalent_length",
                fitting.id.clone(),
                "Equivalent length must not be negative",
            ));
        }
        self.fittings.insert(fitting.id.clone(), fitting);
        Ok(())
    }

    /// The built-in residential/light-commercial fitting set.
    pub fn standard() -> Self {
        use FittingCategory::*;

        let entries = vec![
            by_size("elbow_90_smooth", "90° Elbow, smooth radius", Elbow,
                &[(200.0, 1.5), (300.0, 2.4), (450.0, 3.4), (600.0, 4.6), (f64::MAX, 6.1)], Some(0.22)),
            by_size("elbow_90_mitered", "90° Elbow, mitered with vanes", Elbow,
                &[(200.0, 3.0), (300.0, 4.6), (450.0, 6.1), (600.0, 7.6), (f64::MAX, 9.1)], Some(0.35)),
            by_size("elbow_45", "45° Elbow", Elbow,
                &[(200.0, 0.8), (300.0, 1.2), (450.0, 1.7), (f64::MAX, 2.3)], Some(0.11)),
            constant("transition_reducing", "Reducing transition", Transition, 1.0, Some(0.05)),
            constant("transition_square_to_round", "Square-to-round transition", Transition, 1.5, Some(0.1)),
            by_size("takeoff_tee", "Tee takeoff", Takeoff,
                &[(200.0, 7.6), (300.0, 10.7), (f64::MAX, 13.7)], Some(1.0)),
            constant("takeoff_wye", "Wye takeoff (45°)", Takeoff, 4.6, Some(0.4)),
            constant("takeoff_flex_collar", "Flexible duct collar takeoff", Takeoff, 6.1, Some(0.5)),
            constant("boot_straight", "Straight register boot", Boot, 3.0, Some(0.3)),
            constant("boot_angled", "Angled register boot", Boot, 9.1, Some(0.8)),
            constant("collar_start", "Starting collar", Collar, 3.0, Some(0.25)),
            constant("damper_volume", "Volume damper (open)", Damper, 0.6, Some(0.04)),
            constant("damper_fire", "Fire damper", Damper, 1.5, Some(0.12)),
            constant("diffuser_ceiling", "Ceiling diffuser", Diffuser, 0.0, Some(1.5)),
            constant("register_wall", "Wall register", Diffuser, 0.0, Some(1.2)),
            constant("grille_return", "Return grille", Diffuser, 0.0, Some(0.9)),
        ];

        let fittings = entries.into_iter().map(|f| (f.id.clone(), f)).collect();
        FittingLibrary { fittings }
    }

    /// Look up a fitting by id.
    ///
    /// Missing ids return `None`; whether that is skipped or an error is
    /// up to the caller.
    pub fn get(&self, id: &str) -> Option<&FittingType> {
        self.fittings.get(id)
    }

    /// Look up a fitting by id, failing with `FittingNotFound`.
    pub fn require(&self, id: &str) -> CalcResult<&FittingType> {
        self.get(id).ok_or_else(|| CalcError::fitting_not_found(id))
    }

    /// All fittings sorted by category, then id
    pub fn all(&self) -> Vec<&FittingType> {
        let mut list: Vec<_> = self.fittings.values().collect();
        list.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.id.cmp(&b.id)));
        list
    }

    pub fn len(&self) -> usize {
        self.fittings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fittings.is_empty()
    }
}
