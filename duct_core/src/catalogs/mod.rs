//! # Reference Catalogs
//!
//! Read-only lookup data the solver works from: standard duct sizes,
//! fittings, air conditions and insulation materials.
//!
//! The catalogs are bundled into one immutable [`Catalog`] value that is
//! passed into the solver, so tests and callers can swap in their own tables
//! (an imperial-only size table, a contractor's fitting list). The built-in
//! data is available through [`Catalog::standard`], built once and shared.
//!
//! ## Example
//!
//! ```rust
//! use duct_core::catalogs::Catalog;
//! use duct_core::dimensions::DuctShape;
//!
//! let catalog = Catalog::standard();
//! let size = catalog.duct_sizes.size_for_cfm(500.0, DuctShape::Rectangular).unwrap();
//! assert_eq!(size.to_string(), "Rect 457x152mm");
//! assert!(catalog.air_condition("standard").is_some());
//! ```

pub mod duct_sizes;
pub mod fittings;
pub mod insulation;

pub use duct_sizes::{DuctSizeTable, SizingStrategy, StandardDuctSize};
pub use fittings::{EquivalentLength, FittingCategory, FittingLibrary, FittingType, SizeStep};
pub use insulation::{standard_insulation, InsulationMaterial};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::air::{self, AirCondition};

static STANDARD_CATALOG: Lazy<Catalog> = Lazy::new(Catalog::build_standard);

/// All reference data the solver consults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub duct_sizes: DuctSizeTable,
    pub fittings: FittingLibrary,
    pub air_conditions: Vec<AirCondition>,
    pub insulation: Vec<InsulationMaterial>,
}

impl Catalog {
    /// The shared built-in catalog.
    pub fn standard() -> &'static Catalog {
        &STANDARD_CATALOG
    }

    fn build_standard() -> Catalog {
        Catalog {
            duct_sizes: DuctSizeTable::standard(),
            fittings: FittingLibrary::standard(),
            air_conditions: air::standard_conditions(),
            insulation: standard_insulation(),
        }
    }

    /// Look up an air condition preset by id
    pub fn air_condition(&self, id: &str) -> Option<&AirCondition> {
        self.air_conditions.iter().find(|c| c.id == id)
    }

    /// Look up an insulation material by id
    pub fn insulation_material(&self, id: &str) -> Option<&InsulationMaterial> {
        self.insulation.iter().find(|m| m.id == id)
    }

    /// Look up a fitting by id
    pub fn fitting(&self, id: &str) -> Option<&FittingType> {
        self.fittings.get(id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::build_standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_is_shared() {
        let a = Catalog::standard() as *const Catalog;
        let b = Catalog::standard() as *const Catalog;
        assert_eq!(a, b);
    }

    #[test]
    fn test_default_matches_standard() {
        assert_eq!(&Catalog::default(), Catalog::standard());
    }

    #[test]
    fn test_lookups() {
        let catalog = Catalog::standard();
        assert!(catalog.air_condition("cooling").is_some());
        assert!(catalog.air_condition("mars").is_none());
        assert!(catalog.insulation_material("polyiso").is_some());
        assert!(catalog.fitting("collar_start").is_some());
    }

    #[test]
    fn test_swapped_size_table() {
        let mut catalog = Catalog::default();
        catalog.duct_sizes = DuctSizeTable::new(vec![StandardDuctSize {
            max_cfm: 100_000.0,
            round_diameter_in: 10.0,
            rectangular_in: vec![(10.0, 10.0)],
        }])
        .unwrap();
        let size = catalog.duct_sizes.size_for_cfm(5.0, crate::dimensions::DuctShape::Round).unwrap();
        assert_eq!(size.to_string(), "Round 254mm");
    }
}
