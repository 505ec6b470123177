//! Duct Insulation Materials
//!
//! Thermal conductivity of common duct wraps and liners, used to pre-fill
//! a segment's insulation properties.

use serde::{Deserialize, Serialize};

use crate::system::InsulationProperties;

/// An insulation product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsulationMaterial {
    pub id: String,
    pub name: String,
    /// Thermal conductivity, W/(m·K)
    pub conductivity_w_mk: f64,
    /// Thickness sold by default, mm
    pub default_thickness_mm: f64,
}

impl InsulationMaterial {
    fn new(id: &str, name: &str, conductivity_w_mk: f64, default_thickness_mm: f64) -> Self {
        InsulationMaterial {
            id: id.to_string(),
            name: name.to_string(),
            conductivity_w_mk,
            default_thickness_mm,
        }
    }

    /// Insulation properties for this material at its default thickness
    pub fn properties(&self) -> InsulationProperties {
        self.properties_with_thickness(self.default_thickness_mm)
    }

    /// Insulation properties for this material at a given thickness
    pub fn properties_with_thickness(&self, thickness_mm: f64) -> InsulationProperties {
        InsulationProperties {
            material: self.name.clone(),
            thickness_mm,
            conductivity_w_mk: self.conductivity_w_mk,
        }
    }
}

/// The built-in insulation materials.
pub fn standard_insulation() -> Vec<InsulationMaterial> {
    vec![
        InsulationMaterial::new("fiberglass_blanket", "Fiberglass blanket", 0.040, 38.0),
        InsulationMaterial::new("mineral_wool", "Mineral wool board", 0.036, 50.0),
        InsulationMaterial::new("elastomeric_foam", "Elastomeric foam", 0.035, 19.0),
        InsulationMaterial::new("polyiso", "Polyisocyanurate board", 0.024, 25.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_carry_material_name() {
        let mats = standard_insulation();
        let props = mats[0].properties();
        assert_eq!(props.material, "Fiberglass blanket");
        assert_eq!(props.thickness_mm, 38.0);
        assert_eq!(props.conductivity_w_mk, 0.040);
    }

    #[test]
    fn test_custom_thickness() {
        let mats = standard_insulation();
        let props = mats[1].properties_with_thickness(75.0);
        assert_eq!(props.thickness_mm, 75.0);
    }
}
