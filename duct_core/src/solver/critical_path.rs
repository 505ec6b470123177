//! Critical path search.
//!
//! The critical path is the AHU-to-diffuser run with the highest total
//! pressure drop. It sets the static pressure the fan has to deliver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::system::DuctSystem;

/// A run from the AHU to one diffuser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuctPath {
    /// Diffuser at the end of the run
    pub terminal_id: String,
    /// Segment ids, AHU first
    pub segment_ids: Vec<String>,
    /// Sum of segment pressure drops, Pa
    pub pressure_pa: f64,
}

/// Walk parent segments from `terminal_id` back to the AHU.
///
/// Returns `None` when the walk dead-ends before reaching the AHU.
pub fn trace_to_ahu(
    system: &DuctSystem,
    pressure_drops: &BTreeMap<String, f64>,
    terminal_id: &str,
) -> Option<DuctPath> {
    let mut segment_ids = Vec::new();
    let mut pressure_pa = 0.0;
    let mut current = terminal_id;

    // Each segment is entered at most once on a loop-free walk
    for _ in 0..=system.segments.len() {
        if system.node(current).is_some_and(|n| n.is_ahu()) {
            segment_ids.reverse();
            return Some(DuctPath {
                terminal_id: terminal_id.to_string(),
                segment_ids,
                pressure_pa,
            });
        }
        let segment = system.parent_segment_of(current)?;
        pressure_pa += pressure_drops.get(&segment.id).copied().unwrap_or(0.0);
        segment_ids.push(segment.id.clone());
        current = &segment.from_node_id;
    }
    None
}

/// Every AHU-to-diffuser run, in diffuser order
pub fn all_paths(system: &DuctSystem, pressure_drops: &BTreeMap<String, f64>) -> Vec<DuctPath> {
    system
        .diffusers()
        .filter_map(|d| trace_to_ahu(system, pressure_drops, &d.id))
        .collect()
}

/// The run with the highest pressure drop.
///
/// On a tie the first diffuser in node order wins.
pub fn find(system: &DuctSystem, pressure_drops: &BTreeMap<String, f64>) -> Option<DuctPath> {
    all_paths(system, pressure_drops)
        .into_iter()
        .fold(None, |best: Option<DuctPath>, path| match best {
            Some(b) if path.pressure_pa <= b.pressure_pa => Some(b),
            _ => Some(path),
        })
}
