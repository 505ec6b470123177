//! # System Solver
//!
//! Recomputes every derived value of a [`DuctSystem`] in one pass:
//!
//! 1. Airflow: total CFM through each node ([`airflow`])
//! 2. Segments: size, velocity, friction, fitting losses, heat loss
//! 3. Critical path: the highest-pressure AHU-to-diffuser run ([`critical_path`])
//! 4. Bill of materials ([`bom`])
//! 5. Warnings: segments running above the velocity limit
//!
//! The solver never mutates the system and keeps no state between calls,
//! so solving the same system twice gives identical results.
//!
//! ## Example
//!
//! ```rust
//! use duct_core::catalogs::Catalog;
//! use duct_core::solver::calculate_system;
//! use duct_core::system::{DuctNode, DuctSegment, DuctSystem};
//!
//! let mut system = DuctSystem::new("Single run");
//! system.add_node(DuctNode::ahu("ahu", "AHU-1")).unwrap();
//! system.add_node(DuctNode::diffuser("d1", "Office", 500.0)).unwrap();
//! system.add_segment(DuctSegment::new("s1", "ahu", "d1", 10.0).unwrap()).unwrap();
//!
//! let results = calculate_system(&system, Catalog::standard()).unwrap();
//! assert_eq!(results.total_cfm, 500.0);
//! assert_eq!(results.critical_path, vec!["s1".to_string()]);
//! assert!(results.warnings.is_empty());
//! ```

pub mod airflow;
pub mod bom;
pub mod critical_path;

pub use bom::{BomCategory, BomItem};
pub use critical_path::DuctPath;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::air::{self, AirCondition};
use crate::calculations::flow::{self, FlowInput, DEFAULT_ROUGHNESS_M};
use crate::calculations::heat_loss::{self, HeatLossInput};
use crate::catalogs::Catalog;
use crate::dimensions::DuctDimensions;
use crate::errors::{CalcError, CalcResult};
use crate::system::{DuctSegment, DuctSystem};
use crate::units::cfm_to_m3s;

/// Everything the solver derives for one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentCalculation {
    /// Airflow through the segment, CFM
    pub cfm: f64,
    /// Size used, either the manual override or the table size
    pub dimensions: DuctDimensions,
    /// True when the size came from the manual override
    pub manual_size: bool,
    pub velocity_m_s: f64,
    pub velocity_pressure_pa: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
    /// Pa/m
    pub friction_loss_pa_m: f64,
    /// Sum of fitting equivalent lengths, m
    pub equivalent_length_m: f64,
    /// Physical plus equivalent length, m
    pub effective_length_m: f64,
    pub total_pressure_drop_pa: f64,
    /// Air temperature drop along the run, °C
    pub temp_drop_c: f64,
    pub heat_loss_w: f64,
}

/// Output of [`calculate_system`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemResults {
    /// Flow leaving the AHU, CFM (0 without an AHU)
    pub total_cfm: f64,
    /// Sum of every segment's pressure drop, Pa
    pub total_pressure_drop_pa: f64,
    /// Segment ids of the critical path, AHU first
    pub critical_path: Vec<String>,
    pub critical_path_pressure_pa: f64,
    /// Total flow through each node, CFM (all zero without an AHU)
    pub node_cfm: BTreeMap<String, f64>,
    /// Per-segment results keyed by segment id
    pub segments: BTreeMap<String, SegmentCalculation>,
    pub bom: Vec<BomItem>,
    pub warnings: Vec<String>,
}

impl SystemResults {
    /// Results for one segment, failing with `SegmentNotFound`.
    pub fn segment(&self, id: &str) -> CalcResult<&SegmentCalculation> {
        self.segments.get(id).ok_or_else(|| CalcError::segment_not_found(id))
    }
}

/// Solve a duct system against a catalog.
///
/// Fails on invalid physical values (see [`DuctSystem::validate`]) or a
/// cyclic network. Other defects (no AHU, dangling segments, unknown
/// fittings) produce zero or empty values and, where useful, a warning.
pub fn calculate_system(system: &DuctSystem, catalog: &Catalog) -> CalcResult<SystemResults> {
    system.validate()?;
    let mut warnings = Vec::new();

    let air = air_for(system, catalog, &mut warnings);

    // 1. Airflow
    let node_cfm = airflow::node_totals(system)?;
    let total_cfm = system
        .ahu()
        .and_then(|ahu| node_cfm.get(&ahu.id).copied())
        .unwrap_or(0.0);
    debug!(nodes = node_cfm.len(), total_cfm, "airflow propagated");

    // 2. Segments
    let mut segments = BTreeMap::new();
    for segment in &system.segments {
        let cfm = node_cfm.get(&segment.to_node_id).copied().unwrap_or(0.0);
        let calc = resolve_segment(system, segment, cfm, &air, catalog, &mut warnings)?;
        segments.insert(segment.id.clone(), calc);
    }
    debug!(segments = segments.len(), "segments resolved");

    // 3. Critical path
    let pressure_drops: BTreeMap<String, f64> = segments
        .iter()
        .map(|(id, c)| (id.clone(), c.total_pressure_drop_pa))
        .collect();
    let (critical_path, critical_path_pressure_pa) = match critical_path::find(system, &pressure_drops) {
        Some(path) => (path.segment_ids, path.pressure_pa),
        None => (Vec::new(), 0.0),
    };
    debug!(length = critical_path.len(), pressure_pa = critical_path_pressure_pa, "critical path found");

    // 4. Bill of materials
    let sizes: BTreeMap<String, DuctDimensions> = segments
        .iter()
        .map(|(id, c)| (id.clone(), c.dimensions))
        .collect();
    let bom = bom::generate(system, &sizes, catalog);

    // 5. Velocity warnings, in segment order
    let max_velocity = system.settings.max_velocity_m_s;
    for segment in &system.segments {
        let Some(calc) = segments.get(&segment.id) else {
            continue;
        };
        if calc.velocity_m_s > max_velocity {
            let destination = system
                .node(&segment.to_node_id)
                .map_or(segment.to_node_id.as_str(), |n| n.label());
            warnings.push(format!(
                "Segment to {}: velocity {:.2} m/s exceeds maximum {:.2} m/s",
                destination, calc.velocity_m_s, max_velocity
            ));
        }
    }

    let total_pressure_drop_pa = segments.values().map(|c| c.total_pressure_drop_pa).sum();

    Ok(SystemResults {
        total_cfm,
        total_pressure_drop_pa,
        critical_path,
        critical_path_pressure_pa,
        node_cfm,
        segments,
        bom,
        warnings,
    })
}

/// Air properties for the system's air condition.
///
/// Unknown ids fall back to the supply temperature at standard pressure.
fn air_for(system: &DuctSystem, catalog: &Catalog, warnings: &mut Vec<String>) -> AirCondition {
    let id = &system.settings.air_condition_id;
    match catalog.air_condition(id) {
        Some(condition) => condition.clone(),
        None => {
            warn!(air_condition = %id, "unknown air condition, using supply temperature");
            warnings.push(format!(
                "Unknown air condition '{}', using properties at supply temperature",
                id
            ));
            AirCondition::new(
                "supply",
                "Supply air",
                system.settings.supply_temp_c,
                50.0,
                air::STANDARD_PRESSURE_KPA,
            )
        }
    }
}

fn resolve_segment(
    system: &DuctSystem,
    segment: &DuctSegment,
    cfm: f64,
    air: &AirCondition,
    catalog: &Catalog,
    warnings: &mut Vec<String>,
) -> CalcResult<SegmentCalculation> {
    let strategy = system.settings.design_method.sizing_strategy();
    let dimensions = match segment.manual_size {
        Some(size) => size,
        None => catalog.duct_sizes.size_with(strategy, cfm, segment.shape)?,
    };

    let flow = flow::calculate(&FlowInput {
        cfm,
        dimensions,
        density_kg_m3: air.density_kg_m3,
        dynamic_viscosity_pa_s: air.dynamic_viscosity_pa_s,
        roughness_m: DEFAULT_ROUGHNESS_M,
    })?;

    let equivalent_length_m = fitting_equivalent_length(segment, &dimensions, catalog, warnings);
    let effective_length_m = segment.length_m + equivalent_length_m;

    let heat = heat_loss::calculate(&HeatLossInput {
        dimensions,
        length_m: segment.length_m,
        mass_flow_kg_s: air.density_kg_m3 * cfm_to_m3s(cfm),
        specific_heat_j_kg_k: air.specific_heat_j_kg_k(),
        supply_temp_c: system.settings.supply_temp_c,
        ambient_temp_c: system.settings.ambient_temp_c,
        insulation: segment.active_insulation().cloned(),
    })?;

    Ok(SegmentCalculation {
        cfm,
        dimensions,
        manual_size: segment.manual_size.is_some(),
        velocity_m_s: flow.velocity_m_s,
        velocity_pressure_pa: flow.velocity_pressure_pa,
        reynolds: flow.reynolds,
        friction_factor: flow.friction_factor,
        friction_loss_pa_m: flow.friction_loss_pa_m,
        equivalent_length_m,
        effective_length_m,
        total_pressure_drop_pa: flow.friction_loss_pa_m * effective_length_m,
        temp_drop_c: heat.temp_drop_c,
        heat_loss_w: heat.heat_loss_w,
    })
}

/// Sum of fitting equivalent lengths in a segment, m.
///
/// Terminal devices are not part of the run and are left out. Unknown
/// fitting ids are skipped with a warning.
fn fitting_equivalent_length(
    segment: &DuctSegment,
    dimensions: &DuctDimensions,
    catalog: &Catalog,
    warnings: &mut Vec<String>,
) -> f64 {
    let mut total = 0.0;
    for usage in &segment.fittings {
        let Some(fitting) = catalog.fittings.get(&usage.fitting_id) else {
            warn!(segment = %segment.id, fitting = %usage.fitting_id, "unknown fitting skipped");
            warnings.push(format!(
                "Segment {}: unknown fitting '{}' skipped",
                segment.id, usage.fitting_id
            ));
            continue;
        };
        if fitting.category.is_terminal() {
            continue;
        }
        let each = usage
            .custom_equivalent_length_m
            .unwrap_or_else(|| fitting.equivalent_length_m(dimensions));
        total += f64::from(usage.quantity) * each;
    }
    total
}
