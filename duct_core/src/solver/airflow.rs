//! Airflow propagation.
//!
//! Each node's total flow is the sum of everything downstream of it. A
//! diffuser adds its own requirement on top of any children it feeds.
//! The traversal starts at the AHU and then picks up nodes the AHU does not
//! reach, so disconnected branches still get a flow.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::errors::{CalcError, CalcResult};
use crate::system::{DuctNode, DuctSystem};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Visit {
    InProgress,
    Done(f64),
}

struct Traversal<'a> {
    nodes: HashMap<&'a str, &'a DuctNode>,
    children: HashMap<&'a str, Vec<&'a str>>,
    state: HashMap<&'a str, Visit>,
}

impl<'a> Traversal<'a> {
    fn new(system: &'a DuctSystem) -> Self {
        let nodes: HashMap<&str, &DuctNode> = system.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for segment in &system.segments {
            if !nodes.contains_key(segment.to_node_id.as_str()) {
                warn!(segment = %segment.id, node = %segment.to_node_id, "segment points at a missing node");
                continue;
            }
            children
                .entry(segment.from_node_id.as_str())
                .or_default()
                .push(segment.to_node_id.as_str());
        }
        Traversal {
            nodes,
            children,
            state: HashMap::new(),
        }
    }

    fn visit(&mut self, id: &'a str) -> CalcResult<f64> {
        match self.state.get(id) {
            Some(Visit::Done(total)) => return Ok(*total),
            Some(Visit::InProgress) => return Err(CalcError::cyclic_topology(id)),
            None => {}
        }
        self.state.insert(id, Visit::InProgress);

        let downstream = self.children.get(id).cloned().unwrap_or_default();
        let mut total = 0.0;
        for child in downstream {
            total += self.visit(child)?;
        }

        if let Some(node) = self.nodes.get(id) {
            if node.is_diffuser() {
                total += node.cfm.unwrap_or(0.0);
            }
        }

        self.state.insert(id, Visit::Done(total));
        Ok(total)
    }
}

/// Total airflow through every node, in CFM, keyed by node id.
///
/// Fails with `CyclicTopology` if the segments loop back on themselves.
/// Without an AHU nothing is supplied, so every node reports zero; the
/// network is still walked so that cycles are reported.
pub fn node_totals(system: &DuctSystem) -> CalcResult<BTreeMap<String, f64>> {
    let mut traversal = Traversal::new(system);

    let ahu = system.ahu();
    if let Some(ahu) = ahu {
        traversal.visit(&ahu.id)?;
    }
    for node in &system.nodes {
        traversal.visit(&node.id)?;
    }

    if ahu.is_none() {
        return Ok(system.nodes.iter().map(|n| (n.id.clone(), 0.0)).collect());
    }

    Ok(system
        .nodes
        .iter()
        .map(|n| {
            let total = match traversal.state.get(n.id.as_str()) {
                Some(Visit::Done(total)) => *total,
                _ => 0.0,
            };
            (n.id.clone(), total)
        })
        .collect())
}
