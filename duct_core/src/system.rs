//! # Duct System Data Structures
//!
//! The `DuctSystem` struct is the root container for a duct network.
//! Systems serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! DuctSystem
//! ├── meta: SystemMetadata (schema version, timestamps)
//! ├── settings: DesignSettings (design method, velocity limit, temperatures)
//! ├── nodes: Vec<DuctNode> (AHU, junctions, diffusers, ...)
//! └── segments: Vec<DuctSegment> (directed duct runs, parent → child)
//! ```
//!
//! Segments point away from the air handler: `from_node_id` is the
//! upstream node, `to_node_id` the downstream one. Calculated values are
//! not stored here; see [`crate::solver::SystemResults`].
//!
//! ## Example
//!
//! ```rust
//! use duct_core::system::{DuctNode, DuctSegment, DuctSystem};
//!
//! let mut system = DuctSystem::new("Level 1 Supply");
//! system.add_node(DuctNode::ahu("ahu-1", "AHU-1")).unwrap();
//! system.add_node(DuctNode::diffuser("d-1", "Office 101", 250.0)).unwrap();
//! system
//!     .add_segment(DuctSegment::new("s-1", "ahu-1", "d-1", 8.0).unwrap())
//!     .unwrap();
//!
//! let json = serde_json::to_string_pretty(&system).unwrap();
//! assert!(json.contains("Office 101"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::catalogs::{FittingLibrary, SizingStrategy};
use crate::dimensions::{DuctDimensions, DuctShape};
use crate::errors::{require_positive, CalcError, CalcResult};

/// Current schema version for saved systems
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Largest fitting quantity a single segment entry may carry
pub const MAX_FITTING_QUANTITY: u32 = 10_000;

// ============================================================================
// Nodes
// ============================================================================

/// Role of a node in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Air handling unit, the root of the network
    Ahu,
    Junction,
    /// Supply terminal with a required airflow
    Diffuser,
    End,
    Return,
}

impl NodeType {
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeType::Ahu => "AHU",
            NodeType::Junction => "Junction",
            NodeType::Diffuser => "Diffuser",
            NodeType::End => "End",
            NodeType::Return => "Return",
        }
    }
}

/// Editor canvas position (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A vertex of the duct network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuctNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    #[serde(default)]
    pub position: Position,
    /// Required airflow, CFM. Only read for diffusers; other nodes derive
    /// their flow from downstream.
    #[serde(default)]
    pub cfm: Option<f64>,
    #[serde(default)]
    pub zone: Option<String>,
    /// Free-form equipment tag (e.g., a diffuser model)
    #[serde(default)]
    pub component: Option<String>,
}

impl DuctNode {
    pub fn new(id: impl Into<String>, node_type: NodeType, name: impl Into<String>) -> Self {
        DuctNode {
            id: id.into(),
            node_type,
            name: name.into(),
            position: Position::default(),
            cfm: None,
            zone: None,
            component: None,
        }
    }

    pub fn ahu(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, NodeType::Ahu, name)
    }

    pub fn junction(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, NodeType::Junction, name)
    }

    pub fn diffuser(id: impl Into<String>, name: impl Into<String>, cfm: f64) -> Self {
        let mut node = Self::new(id, NodeType::Diffuser, name);
        node.cfm = Some(cfm);
        node
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn in_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn is_ahu(&self) -> bool {
        self.node_type == NodeType::Ahu
    }

    pub fn is_diffuser(&self) -> bool {
        self.node_type == NodeType::Diffuser
    }

    /// Name for messages, falling back to the id when unnamed
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

// ============================================================================
// Segments
// ============================================================================

/// A fitting installed in a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentFitting {
    /// Key into the fitting library
    pub fitting_id: String,
    pub quantity: u32,
    /// Overrides the library rule, m per fitting
    #[serde(default)]
    pub custom_equivalent_length_m: Option<f64>,
}

impl SegmentFitting {
    pub fn new(fitting_id: impl Into<String>, quantity: u32) -> Self {
        SegmentFitting {
            fitting_id: fitting_id.into(),
            quantity,
            custom_equivalent_length_m: None,
        }
    }
}

/// Duct wrap or liner on a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsulationProperties {
    /// Material name (used in the bill of materials)
    pub material: String,
    pub thickness_mm: f64,
    /// Thermal conductivity, W/(m·K)
    pub conductivity_w_mk: f64,
}

impl Default for InsulationProperties {
    fn default() -> Self {
        InsulationProperties {
            material: "Fiberglass blanket".to_string(),
            thickness_mm: 38.0,
            conductivity_w_mk: 0.040,
        }
    }
}

/// A directed duct run from an upstream node to a downstream node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuctSegment {
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
    /// Physical length, m
    pub length_m: f64,
    #[serde(default)]
    pub fittings: Vec<SegmentFitting>,
    #[serde(default)]
    pub insulated: bool,
    #[serde(default)]
    pub insulation: InsulationProperties,
    /// Fixed size; skips table sizing when set
    #[serde(default)]
    pub manual_size: Option<DuctDimensions>,
    /// Shape used when the segment is sized from the table
    #[serde(default)]
    pub shape: DuctShape,
}

impl DuctSegment {
    /// Create a bare segment, rejecting non-positive lengths.
    pub fn new(
        id: impl Into<String>,
        from_node_id: impl Into<String>,
        to_node_id: impl Into<String>,
        length_m: f64,
    ) -> CalcResult<Self> {
        require_positive("length_m", length_m)?;
        Ok(DuctSegment {
            id: id.into(),
            from_node_id: from_node_id.into(),
            to_node_id: to_node_id.into(),
            length_m,
            fittings: Vec::new(),
            insulated: false,
            insulation: InsulationProperties::default(),
            manual_size: None,
            shape: DuctShape::default(),
        })
    }

    pub fn with_fitting(mut self, fitting_id: impl Into<String>, quantity: u32) -> Self {
        self.fittings.push(SegmentFitting::new(fitting_id, quantity));
        self
    }

    pub fn with_manual_size(mut self, size: DuctDimensions) -> Self {
        self.manual_size = Some(size);
        self
    }

    pub fn with_insulation(mut self, insulation: InsulationProperties) -> Self {
        self.insulated = true;
        self.insulation = insulation;
        self
    }

    pub fn with_shape(mut self, shape: DuctShape) -> Self {
        self.shape = shape;
        self
    }

    /// Insulation that applies, if the segment is insulated
    pub fn active_insulation(&self) -> Option<&InsulationProperties> {
        self.insulated.then_some(&self.insulation)
    }

    /// Validate lengths and dimensions.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("length_m", self.length_m)?;
        if let Some(size) = &self.manual_size {
            size.validate()?;
        }
        if let Some(ins) = self.active_insulation() {
            require_positive("thickness_mm", ins.thickness_mm)?;
            require_positive("conductivity_w_mk", ins.conductivity_w_mk)?;
        }
        for fitting in &self.fittings {
            if fitting.quantity > MAX_FITTING_QUANTITY {
                return Err(CalcError::invalid_input(
                    format!("segments[{}].fittings[{}].quantity", self.id, fitting.fitting_id),
                    fitting.quantity.to_string(),
                    format!("Quantity must not exceed {}", MAX_FITTING_QUANTITY),
                ));
            }
            if let Some(el) = fitting.custom_equivalent_length_m {
                if !el.is_finite() || el < 0.0 {
                    return Err(CalcError::invalid_dimension(
                        "custom_equivalent_length_m",
                        el,
                        "Equivalent length must not be negative",
                    ));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Duct design method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesignMethod {
    #[default]
    EqualFriction,
    StaticRegain,
    VelocityReduction,
}

impl DesignMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            DesignMethod::EqualFriction => "Equal Friction",
            DesignMethod::StaticRegain => "Static Regain",
            DesignMethod::VelocityReduction => "Velocity Reduction",
        }
    }

    /// How automatic sizing resolves sizes for this method.
    ///
    /// Only equal friction has a dedicated table. Static regain is not
    /// implemented and falls back to the same lookup.
    pub fn sizing_strategy(&self) -> SizingStrategy {
        match self {
            DesignMethod::EqualFriction | DesignMethod::StaticRegain => SizingStrategy::EqualFriction,
            DesignMethod::VelocityReduction => SizingStrategy::TableLookupOnly,
        }
    }
}

/// Display unit system for the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

/// System-wide design parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    pub design_method: DesignMethod,
    /// Target friction rate, Pa/m (0.10 in.wg/100 ft ≈ 0.82 Pa/m)
    pub target_friction_pa_m: f64,
    /// Target velocity, m/s
    pub target_velocity_m_s: f64,
    /// Velocity above which a warning is raised, m/s
    pub max_velocity_m_s: f64,
    pub supply_temp_c: f64,
    /// Temperature of the space the ducts run through
    pub ambient_temp_c: f64,
    /// Key into the air condition presets
    pub air_condition_id: String,
    pub unit_system: UnitSystem,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            design_method: DesignMethod::EqualFriction,
            target_friction_pa_m: 0.8,
            target_velocity_m_s: 5.0,
            max_velocity_m_s: 8.0,
            supply_temp_c: 13.0,
            ambient_temp_c: 25.0,
            air_condition_id: "standard".to_string(),
            unit_system: UnitSystem::Metric,
        }
    }
}

/// Metadata stored with a saved system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

// ============================================================================
// System
// ============================================================================

/// Root container for a duct network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuctSystem {
    pub id: Uuid,
    pub name: String,
    pub meta: SystemMetadata,
    #[serde(default)]
    pub settings: DesignSettings,
    #[serde(default)]
    pub nodes: Vec<DuctNode>,
    #[serde(default)]
    pub segments: Vec<DuctSegment>,
}

impl DuctSystem {
    /// Create a new empty system.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        DuctSystem {
            id: Uuid::new_v4(),
            name: name.into(),
            meta: SystemMetadata {
                version: SCHEMA_VERSION.to_string(),
                created: now,
                modified: now,
            },
            settings: DesignSettings::default(),
            nodes: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Generate a fresh id for a node or segment
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Add a node.
    ///
    /// Rejects duplicate ids and a second AHU.
    pub fn add_node(&mut self, node: DuctNode) -> CalcResult<()> {
        if self.node(&node.id).is_some() {
            return Err(CalcError::invalid_input("id", node.id.clone(), "Duplicate node id"));
        }
        if node.is_ahu() && self.ahu().is_some() {
            return Err(CalcError::invalid_input(
                "type",
                node.id.clone(),
                "A system has exactly one AHU",
            ));
        }
        if let Some(cfm) = node.cfm {
            if !cfm.is_finite() || cfm < 0.0 {
                return Err(CalcError::invalid_input("cfm", cfm.to_string(), "Airflow must be zero or positive"));
            }
        }
        self.nodes.push(node);
        self.touch();
        Ok(())
    }

    /// Remove a node and every segment attached to it.
    pub fn remove_node(&mut self, id: &str) -> Option<DuctNode> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        let node = self.nodes.remove(index);
        self.segments.retain(|s| s.from_node_id != id && s.to_node_id != id);
        self.touch();
        Some(node)
    }

    /// Add a segment between two existing nodes.
    ///
    /// Rejects self-loops, segments leaving a diffuser and segments entering
    /// the AHU.
    pub fn add_segment(&mut self, segment: DuctSegment) -> CalcResult<()> {
        if self.segment(&segment.id).is_some() {
            return Err(CalcError::invalid_input("id", segment.id.clone(), "Duplicate segment id"));
        }
        segment.validate()?;
        let from = self
            .node(&segment.from_node_id)
            .ok_or_else(|| CalcError::node_not_found(&segment.from_node_id))?;
        let to = self
            .node(&segment.to_node_id)
            .ok_or_else(|| CalcError::node_not_found(&segment.to_node_id))?;
        if let Some(reason) = direction_violation(&segment, from, to) {
            return Err(CalcError::invalid_topology(segment.id.clone(), reason));
        }
        self.segments.push(segment);
        self.touch();
        Ok(())
    }

    /// Remove a segment by id.
    pub fn remove_segment(&mut self, id: &str) -> Option<DuctSegment> {
        let index = self.segments.iter().position(|s| s.id == id)?;
        let segment = self.segments.remove(index);
        self.touch();
        Some(segment)
    }

    pub fn node(&self, id: &str) -> Option<&DuctNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Mutable node access; marks the system as modified.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut DuctNode> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        self.touch();
        self.nodes.get_mut(index)
    }

    pub fn segment(&self, id: &str) -> Option<&DuctSegment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Mutable segment access; marks the system as modified.
    pub fn segment_mut(&mut self, id: &str) -> Option<&mut DuctSegment> {
        let index = self.segments.iter().position(|s| s.id == id)?;
        self.touch();
        self.segments.get_mut(index)
    }

    /// Mutable settings access; marks the system as modified.
    pub fn settings_mut(&mut self) -> &mut DesignSettings {
        self.touch();
        &mut self.settings
    }

    /// The AHU node, if present
    pub fn ahu(&self) -> Option<&DuctNode> {
        self.nodes.iter().find(|n| n.is_ahu())
    }

    /// Diffuser nodes in insertion order
    pub fn diffusers(&self) -> impl Iterator<Item = &DuctNode> {
        self.nodes.iter().filter(|n| n.is_diffuser())
    }

    /// Segments leaving a node
    pub fn children_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a DuctSegment> + 'a {
        self.segments.iter().filter(move |s| s.from_node_id == node_id)
    }

    /// First segment entering a node
    pub fn parent_segment_of(&self, node_id: &str) -> Option<&DuctSegment> {
        self.segments.iter().find(|s| s.to_node_id == node_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Check every node and segment for invalid physical values.
    pub fn validate(&self) -> CalcResult<()> {
        for node in &self.nodes {
            if let Some(cfm) = node.cfm {
                if !cfm.is_finite() || cfm < 0.0 {
                    return Err(CalcError::invalid_input(
                        format!("nodes[{}].cfm", node.id),
                        cfm.to_string(),
                        "Airflow must be zero or positive",
                    ));
                }
            }
        }
        for segment in &self.segments {
            segment.validate()?;
        }
        Ok(())
    }

    /// Check that every fitting id resolves in `library`.
    ///
    /// The solver skips unknown fittings; this is the strict alternative.
    pub fn check_fittings(&self, library: &FittingLibrary) -> CalcResult<()> {
        for segment in &self.segments {
            for usage in &segment.fittings {
                library.require(&usage.fitting_id)?;
            }
        }
        Ok(())
    }

    /// Remove segments that break the direction rules or point at missing
    /// nodes. Returns how many were removed.
    ///
    /// This is an explicit repair step; the solver never calls it.
    pub fn cleanup_invalid_segments(&mut self) -> usize {
        let before = self.segments.len();
        let nodes = &self.nodes;
        self.segments.retain(|segment| {
            let from = nodes.iter().find(|n| n.id == segment.from_node_id);
            let to = nodes.iter().find(|n| n.id == segment.to_node_id);
            let reason = match (from, to) {
                (Some(from), Some(to)) => direction_violation(segment, from, to),
                _ => Some("references a missing node"),
            };
            match reason {
                Some(reason) => {
                    warn!(segment = %segment.id, reason, "removing invalid segment");
                    false
                }
                None => true,
            }
        });
        let removed = before - self.segments.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }
}

impl Default for DuctSystem {
    fn default() -> Self {
        DuctSystem::new("")
    }
}

/// Reason a segment breaks the flow direction rules, if it does
fn direction_violation(segment: &DuctSegment, from: &DuctNode, to: &DuctNode) -> Option<&'static str> {
    if segment.from_node_id == segment.to_node_id {
        Some("segment connects a node to itself")
    } else if from.is_diffuser() {
        Some("a diffuser cannot feed another node")
    } else if to.is_ahu() {
        Some("the AHU cannot receive flow")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_system() -> DuctSystem {
        let mut system = DuctSystem::new("Test");
        system.add_node(DuctNode::ahu("ahu", "AHU-1")).unwrap();
        system.add_node(DuctNode::junction("j1", "J-1")).unwrap();
        system.add_node(DuctNode::diffuser("d1", "D-1", 300.0)).unwrap();
        system.add_segment(DuctSegment::new("s1", "ahu", "j1", 5.0).unwrap()).unwrap();
        system.add_segment(DuctSegment::new("s2", "j1", "d1", 3.0).unwrap()).unwrap();
        system
    }

    #[test]
    fn test_system_creation() {
        let system = DuctSystem::new("Supply A");
        assert_eq!(system.name, "Supply A");
        assert_eq!(system.meta.version, SCHEMA_VERSION);
        assert_eq!(system.settings.max_velocity_m_s, 8.0);
        assert_eq!(system.settings.design_method, DesignMethod::EqualFriction);
    }

    #[test]
    fn test_segment_rejects_non_positive_length() {
        let err = DuctSegment::new("s", "a", "b", 0.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DIMENSION");
        assert!(DuctSegment::new("s", "a", "b", -2.0).is_err());
    }

    #[test]
    fn test_add_and_query() {
        let system = simple_system();
        assert_eq!(system.node_count(), 3);
        assert_eq!(system.segment_count(), 2);
        assert_eq!(system.ahu().unwrap().id, "ahu");
        assert_eq!(system.children_of("ahu").count(), 1);
        assert_eq!(system.parent_segment_of("d1").unwrap().id, "s2");
        assert!(system.parent_segment_of("ahu").is_none());
        assert_eq!(system.diffusers().count(), 1);
    }

    #[test]
    fn test_rejects_second_ahu_and_duplicate_ids() {
        let mut system = simple_system();
        assert!(system.add_node(DuctNode::ahu("ahu2", "AHU-2")).is_err());
        assert!(system.add_node(DuctNode::junction("j1", "dup")).is_err());
        assert!(system
            .add_segment(DuctSegment::new("s1", "ahu", "d1", 1.0).unwrap())
            .is_err());
    }

    #[test]
    fn test_add_segment_enforces_direction() {
        let mut system = simple_system();

        let into_ahu = DuctSegment::new("x1", "j1", "ahu", 1.0).unwrap();
        assert_eq!(system.add_segment(into_ahu).unwrap_err().error_code(), "INVALID_TOPOLOGY");

        let from_diffuser = DuctSegment::new("x2", "d1", "j1", 1.0).unwrap();
        assert_eq!(system.add_segment(from_diffuser).unwrap_err().error_code(), "INVALID_TOPOLOGY");

        let self_loop = DuctSegment::new("x3", "j1", "j1", 1.0).unwrap();
        assert_eq!(system.add_segment(self_loop).unwrap_err().error_code(), "INVALID_TOPOLOGY");

        let dangling = DuctSegment::new("x4", "j1", "nowhere", 1.0).unwrap();
        assert_eq!(system.add_segment(dangling).unwrap_err().error_code(), "NODE_NOT_FOUND");

        assert_eq!(system.segment_count(), 2);
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut system = simple_system();
        let removed = system.remove_node("j1").unwrap();
        assert_eq!(removed.id, "j1");
        assert_eq!(system.segment_count(), 0);
        assert!(system.remove_node("j1").is_none());
    }

    #[test]
    fn test_remove_segment() {
        let mut system = simple_system();
        assert!(system.remove_segment("s2").is_some());
        assert!(system.segment("s2").is_none());
        assert!(system.remove_segment("s2").is_none());
    }

    #[test]
    fn test_cleanup_removes_diffuser_to_ahu_segment() {
        let mut system = simple_system();
        // Bypass add_segment, as a hand-edited file would
        system.segments.push(DuctSegment::new("bad", "d1", "ahu", 2.0).unwrap());
        assert_eq!(system.cleanup_invalid_segments(), 1);
        assert!(system.segment("bad").is_none());
        assert_eq!(system.segment_count(), 2);
        assert_eq!(system.cleanup_invalid_segments(), 0);
    }

    #[test]
    fn test_cleanup_removes_self_loops_and_dangling() {
        let mut system = simple_system();
        system.segments.push(DuctSegment::new("loop", "j1", "j1", 2.0).unwrap());
        system.segments.push(DuctSegment::new("ghost", "j1", "missing", 2.0).unwrap());
        assert_eq!(system.cleanup_invalid_segments(), 2);
    }

    #[test]
    fn test_validate_catches_bad_manual_size() {
        let mut system = simple_system();
        system.segment_mut("s1").unwrap().manual_size = Some(DuctDimensions::Round { diameter_mm: -5.0 });
        assert_eq!(system.validate().unwrap_err().error_code(), "INVALID_DIMENSION");
    }

    #[test]
    fn test_validate_catches_bad_insulation() {
        let mut system = simple_system();
        let mut ins = InsulationProperties::default();
        ins.thickness_mm = 0.0;
        system.segment_mut("s2").unwrap().insulated = true;
        system.segment_mut("s2").unwrap().insulation = ins;
        assert!(system.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_fitting_quantity() {
        let mut system = simple_system();
        system.segment_mut("s1").unwrap().fittings.push(SegmentFitting::new("damper_volume", MAX_FITTING_QUANTITY));
        assert!(system.validate().is_ok());

        system.segment_mut("s2").unwrap().fittings.push(SegmentFitting::new("damper_volume", u32::MAX));
        let err = system.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let segment = DuctSegment::new("s9", "j1", "d1", 1.0).unwrap().with_fitting("elbow_45", u32::MAX);
        assert!(system.add_segment(segment).is_err());
    }

    #[test]
    fn test_check_fittings() {
        let mut system = simple_system();
        let library = FittingLibrary::standard();
        system.segment_mut("s1").unwrap().fittings.push(SegmentFitting::new("elbow_45", 2));
        assert!(system.check_fittings(&library).is_ok());

        system.segment_mut("s2").unwrap().fittings.push(SegmentFitting::new("mystery_box", 1));
        let err = system.check_fittings(&library).unwrap_err();
        assert_eq!(err, CalcError::fitting_not_found("mystery_box"));
    }

    #[test]
    fn test_design_method_strategy() {
        assert_eq!(DesignMethod::EqualFriction.sizing_strategy(), SizingStrategy::EqualFriction);
        assert_eq!(DesignMethod::VelocityReduction.sizing_strategy(), SizingStrategy::TableLookupOnly);
        assert_eq!(DesignMethod::StaticRegain.sizing_strategy(), SizingStrategy::EqualFriction);
    }

    #[test]
    fn test_system_serialization() {
        let system = simple_system();
        let json = serde_json::to_string_pretty(&system).unwrap();
        assert!(json.contains("\"type\": \"ahu\""));
        assert!(json.contains("\"design_method\": \"equal-friction\""));

        let roundtrip: DuctSystem = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, system);
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000000",
            "name": "Minimal",
            "meta": { "version": "0.1.0", "created": "2025-01-01T00:00:00Z", "modified": "2025-01-01T00:00:00Z" },
            "nodes": [ { "id": "a", "type": "ahu", "name": "AHU" } ],
            "segments": []
        }"#;
        let system: DuctSystem = serde_json::from_str(json).unwrap();
        assert_eq!(system.settings, DesignSettings::default());
        assert_eq!(system.nodes[0].cfm, None);
    }

    #[test]
    fn test_node_label_falls_back_to_id() {
        let node = DuctNode::junction("j-9", "");
        assert_eq!(node.label(), "j-9");
    }
}
