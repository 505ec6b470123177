//! Standard Duct Sizes
//!
//! Airflow-to-size table for low-pressure supply ductwork sized by the
//! equal-friction method at 0.10 in.wg per 100 ft (≈0.82 Pa/m).
//!
//! ## Lookup Rule
//!
//! Entries are sorted by CFM threshold. A request picks the first entry
//! whose threshold is at or above the requested airflow, i.e. it rounds up
//! to the next standard size. Requests above the largest threshold saturate
//! at the last entry rather than failing.
//!
//! Each bracket lists several rectangular options for an operator to pick
//! from; the solver always takes the first one.
//!
//! Sizes are stored in inches and converted to whole millimeters at the
//! API boundary (18" → 457 mm, 6" → 152 mm).

use serde::{Deserialize, Serialize};

use crate::dimensions::{DuctDimensions, DuctShape};
use crate::errors::{CalcError, CalcResult};
use crate::units::{Inches, Millimeters};

/// One row of the standard size table (dimensions in inches)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardDuctSize {
    /// Largest airflow this size is rated for, CFM
    pub max_cfm: f64,
    /// Round diameter, inches
    pub round_diameter_in: f64,
    /// Rectangular (width, height) options, inches, preferred first
    pub rectangular_in: Vec<(f64, f64)>,
}

impl StandardDuctSize {
    /// Round size at the API boundary, whole millimeters
    pub fn round_mm(&self) -> DuctDimensions {
        DuctDimensions::Round {
            diameter_mm: inches_to_whole_mm(self.round_diameter_in),
        }
    }

    /// Preferred rectangular size at the API boundary, whole millimeters
    pub fn rectangular_mm(&self) -> Option<DuctDimensions> {
        self.rectangular_in.first().map(|&(w, h)| DuctDimensions::Rectangular {
            width_mm: inches_to_whole_mm(w),
            height_mm: inches_to_whole_mm(h),
        })
    }

    /// Dimensions for the requested shape.
    ///
    /// Fails for a rectangular request on a row with no rectangular option.
    pub fn dimensions(&self, shape: DuctShape) -> CalcResult<DuctDimensions> {
        match shape {
            DuctShape::Round => Ok(self.round_mm()),
            DuctShape::Rectangular => self.rectangular_mm().ok_or_else(|| {
                CalcError::invalid_input(
                    "rectangular_in",
                    self.max_cfm.to_string(),
                    "Size has no rectangular option",
                )
            }),
        }
    }
}

fn standard_size(max_cfm: f64, round_diameter_in: f64, rectangular_in: &[(f64, f64)]) -> StandardDuctSize {
    StandardDuctSize {
        max_cfm,
        round_diameter_in,
        rectangular_in: rectangular_in.to_vec(),
    }
}

fn inches_to_whole_mm(inches: f64) -> f64 {
    Millimeters::from(Inches(inches)).rounded().0
}

/// How automatic sizing resolves a duct size.
///
/// Both strategies currently read the same equal-friction table. The
/// velocity strategy does not iterate on velocity; it is kept so callers can
/// name their intent, and is labelled accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizingStrategy {
    /// Equal-friction table lookup
    EqualFriction,
    /// Velocity sizing, resolved through the equal-friction table
    TableLookupOnly,
}

/// Sorted airflow → size table.
///
/// Serializes as a plain list of entries; deserialization goes through the
/// same validation as [`DuctSizeTable::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StandardDuctSize>", into = "Vec<StandardDuctSize>")]
pub struct DuctSizeTable {
    entries: Vec<StandardDuctSize>,
}

impl DuctSizeTable {
    /// Build a table, rejecting empty, unsorted or option-less entries.
    pub fn new(entries: Vec<StandardDuctSize>) -> CalcResult<Self> {
        if entries.is_empty() {
            return Err(CalcError::invalid_input("entries", "[]", "Size table must not be empty"));
        }
        for pair in entries.windows(2) {
            if !(pair[1].max_cfm > pair[0].max_cfm) {
                return Err(CalcError::invalid_input(
                    "max_cfm",
                    pair[1].max_cfm.to_string(),
                    "Thresholds must be strictly ascending",
                ));
            }
        }
        for entry in &entries {
            if entry.rectangular_in.is_empty() {
                return Err(CalcError::invalid_input(
                    "rectangular_in",
                    entry.max_cfm.to_string(),
                    "Each size needs at least one rectangular option",
                ));
            }
        }
        Ok(DuctSizeTable { entries })
    }

    /// The built-in 0.10 in.wg/100 ft table.
    pub fn standard() -> Self {
        let entries = vec![
            standard_size(50.0, 5.0, &[(6.0, 4.0)]),
            standard_size(100.0, 6.0, &[(8.0, 4.0), (6.0, 6.0)]),
            standard_size(150.0, 7.0, &[(10.0, 4.0), (8.0, 6.0)]),
            standard_size(200.0, 8.0, &[(12.0, 4.0), (10.0, 6.0), (8.0, 8.0)]),
            standard_size(300.0, 9.0, &[(12.0, 6.0), (10.0, 8.0)]),
            standard_size(400.0, 10.0, &[(16.0, 6.0), (12.0, 8.0), (10.0, 10.0)]),
            standard_size(500.0, 11.0, &[(18.0, 6.0), (12.0, 8.0), (10.0, 10.0)]),
            standard_size(600.0, 12.0, &[(20.0, 6.0), (14.0, 8.0), (12.0, 10.0)]),
            standard_size(800.0, 13.0, &[(24.0, 6.0), (16.0, 8.0), (14.0, 10.0), (12.0, 12.0)]),
            standard_size(1000.0, 14.0, &[(22.0, 8.0), (18.0, 10.0), (14.0, 14.0)]),
            standard_size(1200.0, 15.0, &[(26.0, 8.0), (20.0, 10.0), (16.0, 12.0)]),
            standard_size(1500.0, 16.0, &[(24.0, 10.0), (20.0, 12.0), (16.0, 16.0)]),
            standard_size(2000.0, 18.0, &[(30.0, 10.0), (24.0, 12.0), (18.0, 18.0)]),
            standard_size(2500.0, 20.0, &[(30.0, 12.0), (24.0, 14.0), (20.0, 20.0)]),
            standard_size(3000.0, 22.0, &[(36.0, 12.0), (28.0, 14.0), (22.0, 22.0)]),
            standard_size(4000.0, 24.0, &[(40.0, 14.0), (32.0, 16.0), (24.0, 24.0)]),
            standard_size(5000.0, 26.0, &[(44.0, 16.0), (36.0, 18.0), (28.0, 28.0)]),
            standard_size(6000.0, 28.0, &[(48.0, 16.0), (40.0, 18.0), (30.0, 30.0)]),
            standard_size(8000.0, 32.0, &[(54.0, 18.0), (44.0, 20.0), (34.0, 34.0)]),
            standard_size(10000.0, 36.0, &[(60.0, 20.0), (48.0, 24.0), (38.0, 38.0)]),
        ];

        DuctSizeTable { entries }
    }

    /// All entries, ascending by threshold
    pub fn entries(&self) -> &[StandardDuctSize] {
        &self.entries
    }

    /// Index of the entry selected for `cfm` (round up, saturate at the end)
    pub fn index_for_cfm(&self, cfm: f64) -> usize {
        self.entries
            .iter()
            .position(|e| e.max_cfm >= cfm)
            .unwrap_or(self.entries.len() - 1)
    }

    /// Table entry selected for `cfm`
    pub fn entry_for_cfm(&self, cfm: f64) -> &StandardDuctSize {
        &self.entries[self.index_for_cfm(cfm)]
    }

    /// Standard size for `cfm` in the requested shape, whole millimeters.
    pub fn size_for_cfm(&self, cfm: f64, shape: DuctShape) -> CalcResult<DuctDimensions> {
        self.entry_for_cfm(cfm).dimensions(shape)
    }

    /// Size a duct with the given strategy.
    pub fn size_with(&self, strategy: SizingStrategy, cfm: f64, shape: DuctShape) -> CalcResult<DuctDimensions> {
        match strategy {
            SizingStrategy::EqualFriction | SizingStrategy::TableLookupOnly => self.size_for_cfm(cfm, shape),
        }
    }
}

impl TryFrom<Vec<StandardDuctSize>> for DuctSizeTable {
    type Error = CalcError;

    fn try_from(entries: Vec<StandardDuctSize>) -> CalcResult<Self> {
        DuctSizeTable::new(entries)
    }
}

impl From<DuctSizeTable> for Vec<StandardDuctSize> {
    fn from(table: DuctSizeTable) -> Self {
        table.entries
    }
}

impl Default for DuctSizeTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_standard_table_is_valid() {
        let table = DuctSizeTable::standard();
        assert!(DuctSizeTable::new(table.entries().to_vec()).is_ok());
    }

    #[test]
    fn test_500_cfm_rectangular() {
        let table = DuctSizeTable::standard();
        let size = table.size_for_cfm(500.0, DuctShape::Rectangular).unwrap();
        assert_eq!(
            size,
            DuctDimensions::Rectangular {
                width_mm: 457.0,
                height_mm: 152.0
            }
        );
    }

    #[test]
    fn test_rounds_up_to_next_bracket() {
        let table = DuctSizeTable::standard();
        // 501 CFM is past the 500 bracket
        assert_eq!(table.entry_for_cfm(501.0).max_cfm, 600.0);
        assert_eq!(table.entry_for_cfm(0.0).max_cfm, 50.0);
    }

    #[test]
    fn test_saturates_at_largest_entry() {
        let table = DuctSizeTable::standard();
        let size = table.size_for_cfm(50_000.0, DuctShape::Round).unwrap();
        assert_eq!(size, DuctDimensions::Round { diameter_mm: 914.0 });
    }

    #[test]
    fn test_strategies_agree() {
        let table = DuctSizeTable::standard();
        for cfm in [75.0, 450.0, 2200.0] {
            assert_eq!(
                table.size_with(SizingStrategy::EqualFriction, cfm, DuctShape::Rectangular).unwrap(),
                table.size_with(SizingStrategy::TableLookupOnly, cfm, DuctShape::Rectangular).unwrap(),
            );
        }
    }

    #[test]
    fn test_rejects_unsorted() {
        let entries = vec![
            StandardDuctSize { max_cfm: 200.0, round_diameter_in: 8.0, rectangular_in: vec![(8.0, 8.0)] },
            StandardDuctSize { max_cfm: 100.0, round_diameter_in: 6.0, rectangular_in: vec![(6.0, 6.0)] },
        ];
        assert!(DuctSizeTable::new(entries).is_err());
    }

    #[test]
    fn test_rejects_missing_rectangular_option() {
        let entries = vec![StandardDuctSize {
            max_cfm: 100.0,
            round_diameter_in: 6.0,
            rectangular_in: vec![],
        }];
        assert!(DuctSizeTable::new(entries).is_err());
        assert!(DuctSizeTable::new(vec![]).is_err());
    }

    #[test]
    fn test_row_without_rectangular_option() {
        let row = StandardDuctSize {
            max_cfm: 100.0,
            round_diameter_in: 6.0,
            rectangular_in: vec![],
        };
        assert!(row.rectangular_mm().is_none());
        assert_eq!(row.dimensions(DuctShape::Round).unwrap(), DuctDimensions::Round { diameter_mm: 152.0 });
        let err = row.dimensions(DuctShape::Rectangular).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_deserialization_validates() {
        assert!(serde_json::from_str::<DuctSizeTable>("[]").is_err());
        let json = serde_json::to_string(&DuctSizeTable::standard()).unwrap();
        let back: DuctSizeTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DuctSizeTable::standard());
    }

    proptest! {
        #[test]
        fn sizing_is_monotonic(a in 0.0_f64..20_000.0, b in 0.0_f64..20_000.0) {
            let table = DuctSizeTable::standard();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(table.entry_for_cfm(hi).max_cfm >= table.entry_for_cfm(lo).max_cfm);
            let d_lo = table.size_for_cfm(lo, DuctShape::Round).unwrap().equivalent_diameter_mm();
            let d_hi = table.size_for_cfm(hi, DuctShape::Round).unwrap().equivalent_diameter_mm();
            prop_assert!(d_hi >= d_lo);
        }
    }
}
