//! Bill of materials.
//!
//! Line items come out grouped as ducts, fittings, diffusers and then
//! insulation. Within a group they are sorted by key, so the same system
//! always produces the same list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalogs::Catalog;
use crate::dimensions::DuctDimensions;
use crate::system::DuctSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BomCategory {
    Duct,
    Fitting,
    Diffuser,
    Insulation,
}

/// One line of the bill of materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomItem {
    pub category: BomCategory,
    pub description: String,
    /// Size label, or empty where size does not apply
    pub size: String,
    /// Order quantity in `unit`
    pub quantity: f64,
    pub unit: String,
    /// Installed length before rounding, m
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

/// Build the bill of materials from resolved segment sizes.
///
/// `sizes` maps segment id to the size the solver used. Unknown fitting
/// ids are left out.
pub fn generate(
    system: &DuctSystem,
    sizes: &BTreeMap<String, DuctDimensions>,
    catalog: &Catalog,
) -> Vec<BomItem> {
    let mut ducts: BTreeMap<String, (DuctDimensions, f64)> = BTreeMap::new();
    let mut fittings: BTreeMap<&str, (&str, u64)> = BTreeMap::new();
    let mut insulation: BTreeMap<&str, f64> = BTreeMap::new();

    for segment in &system.segments {
        let Some(size) = sizes.get(&segment.id) else {
            continue;
        };

        ducts.entry(size.size_key()).or_insert((*size, 0.0)).1 += segment.length_m;

        for usage in &segment.fittings {
            if let Some(fitting) = catalog.fittings.get(&usage.fitting_id) {
                let count = &mut fittings.entry(fitting.id.as_str()).or_insert((fitting.name.as_str(), 0)).1;
                *count = count.saturating_add(u64::from(usage.quantity));
            }
        }

        if let Some(ins) = segment.active_insulation() {
            *insulation.entry(ins.material.as_str()).or_insert(0.0) += size.perimeter_m() * segment.length_m;
        }
    }

    let mut items = Vec::new();

    for (key, (size, length)) in ducts {
        items.push(BomItem {
            category: BomCategory::Duct,
            description: format!("{} duct", size.shape().display_name()),
            size: key,
            quantity: length.ceil(),
            unit: "m".to_string(),
            length_m: Some(length),
            material: None,
        });
    }

    for (id, (name, quantity)) in fittings {
        items.push(BomItem {
            category: BomCategory::Fitting,
            description: name.to_string(),
            size: id.to_string(),
            quantity: quantity as f64,
            unit: "ea".to_string(),
            length_m: None,
            material: None,
        });
    }

    let diffuser_count = system.diffusers().count();
    if diffuser_count > 0 {
        items.push(BomItem {
            category: BomCategory::Diffuser,
            description: "Supply diffuser".to_string(),
            size: String::new(),
            quantity: diffuser_count as f64,
            unit: "ea".to_string(),
            length_m: None,
            material: None,
        });
    }

    for (material, area) in insulation {
        items.push(BomItem {
            category: BomCategory::Insulation,
            description: format!("{} insulation", material),
            size: String::new(),
            quantity: area.ceil(),
            unit: "m²".to_string(),
            length_m: None,
            material: Some(material.to_string()),
        });
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{DuctNode, DuctSegment, InsulationProperties};

    fn sizes(entries: &[(&str, DuctDimensions)]) -> BTreeMap<String, DuctDimensions> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_lengths_are_summed_and_rounded_up() {
        let mut system = DuctSystem::new("t");
        system.nodes.push(DuctNode::ahu("ahu", "AHU"));
        system.nodes.push(DuctNode::junction("j", "J"));
        system.nodes.push(DuctNode::diffuser("d", "D", 100.0));
        system.segments.push(DuctSegment::new("a", "ahu", "j", 2.4).unwrap());
        system.segments.push(DuctSegment::new("b", "j", "d", 1.3).unwrap());
        let round = DuctDimensions::Round { diameter_mm: 203.0 };

        let bom = generate(&system, &sizes(&[("a", round), ("b", round)]), Catalog::standard());
        assert_eq!(bom.len(), 2);
        assert_eq!(bom[0].size, "Round 203mm");
        assert_eq!(bom[0].quantity, 4.0);
        assert!((bom[0].length_m.unwrap() - 3.7).abs() < 1e-12);
        assert_eq!(bom[1].category, BomCategory::Diffuser);
        assert_eq!(bom[1].quantity, 1.0);
    }

    #[test]
    fn test_group_order_and_fitting_totals() {
        let mut system = DuctSystem::new("t");
        system.nodes.push(DuctNode::ahu("ahu", "AHU"));
        system.nodes.push(DuctNode::diffuser("d", "D", 100.0));
        let insulation = InsulationProperties {
            material: "Mineral wool".to_string(),
            thickness_mm: 50.0,
            conductivity_w_mk: 0.036,
        };
        system.segments.push(
            DuctSegment::new("a", "ahu", "d", 10.0)
                .unwrap()
                .with_fitting("elbow_90_smooth", 2)
                .with_fitting("damper_volume", 1)
                .with_fitting("elbow_90_smooth", 1)
                .with_fitting("no_such_fitting", 4)
                .with_insulation(insulation),
        );
        let rect = DuctDimensions::Rectangular { width_mm: 300.0, height_mm: 200.0 };

        let bom = generate(&system, &sizes(&[("a", rect)]), Catalog::standard());
        let categories: Vec<BomCategory> = bom.iter().map(|i| i.category).collect();
        assert_eq!(
            categories,
            vec![
                BomCategory::Duct,
                BomCategory::Fitting,
                BomCategory::Fitting,
                BomCategory::Diffuser,
                BomCategory::Insulation,
            ]
        );
        // Sorted by fitting id
        assert_eq!(bom[1].size, "damper_volume");
        assert_eq!(bom[2].size, "elbow_90_smooth");
        assert_eq!(bom[2].quantity, 3.0);
        // 1.0 m perimeter × 10 m
        assert_eq!(bom[4].quantity, 10.0);
        assert_eq!(bom[4].material.as_deref(), Some("Mineral wool"));
    }

    #[test]
    fn test_fitting_totals_past_u32() {
        let mut system = DuctSystem::new("t");
        system.nodes.push(DuctNode::ahu("ahu", "AHU"));
        system.nodes.push(DuctNode::diffuser("d", "D", 100.0));
        system.segments.push(
            DuctSegment::new("a", "ahu", "d", 1.0)
                .unwrap()
                .with_fitting("damper_volume", u32::MAX)
                .with_fitting("damper_volume", 1),
        );
        let round = DuctDimensions::Round { diameter_mm: 152.0 };

        let bom = generate(&system, &sizes(&[("a", round)]), Catalog::standard());
        assert_eq!(bom[1].size, "damper_volume");
        assert_eq!(bom[1].quantity, 4_294_967_296.0);
    }

    #[test]
    fn test_empty_system_has_empty_bom() {
        let mut system = DuctSystem::new("t");
        system.nodes.push(DuctNode::ahu("ahu", "AHU"));
        assert!(generate(&system, &BTreeMap::new(), Catalog::standard()).is_empty());
    }
}
