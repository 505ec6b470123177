//! # duct_core - HVAC Duct Network Calculation Engine
//!
//! `duct_core` sizes the ducts of a supply air network and works out its
//! pressure losses. Given a graph of nodes (an air handler, junctions,
//! diffusers) joined by duct segments, it propagates airflow from the
//! diffusers back to the air handler, sizes each segment from a standard
//! table, computes friction and fitting losses, finds the critical path and
//! builds a bill of materials.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: [`calculate_system`] takes the network and a catalog and returns fresh results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Injected Catalogs**: Reference data is passed in, never read from globals
//!
//! ## Quick Start
//!
//! ```rust
//! use duct_core::{calculate_system, Catalog, DuctNode, DuctSegment, DuctSystem};
//!
//! let mut system = DuctSystem::new("Level 1 Supply");
//! system.add_node(DuctNode::ahu("ahu", "AHU-1")).unwrap();
//! system.add_node(DuctNode::junction("j1", "Main tee")).unwrap();
//! system.add_node(DuctNode::diffuser("d1", "Office 101", 300.0)).unwrap();
//! system.add_node(DuctNode::diffuser("d2", "Office 102", 700.0)).unwrap();
//! system.add_segment(DuctSegment::new("s1", "ahu", "j1", 12.0).unwrap()).unwrap();
//! system.add_segment(DuctSegment::new("s2", "j1", "d1", 4.0).unwrap()).unwrap();
//! system.add_segment(DuctSegment::new("s3", "j1", "d2", 6.0).unwrap()).unwrap();
//!
//! let results = calculate_system(&system, Catalog::standard()).unwrap();
//! assert_eq!(results.total_cfm, 1000.0);
//! ```
//!
//! ## Modules
//!
//! - [`system`] - Network model (nodes, segments, design settings) and editing operations
//! - [`solver`] - Airflow, segment sizing, critical path, bill of materials
//! - [`calculations`] - Flow friction and heat loss formulas
//! - [`catalogs`] - Duct sizes, fittings, air conditions, insulation
//! - [`air`] - Air properties from temperature and pressure
//! - [`dimensions`] - Round and rectangular cross-sections
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - JSON save and load with schema version checks

pub mod air;
pub mod calculations;
pub mod catalogs;
pub mod dimensions;
pub mod errors;
pub mod file_io;
pub mod solver;
pub mod system;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use catalogs::Catalog;
pub use dimensions::{DuctDimensions, DuctShape};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_system, save_system};
pub use solver::{calculate_system, SegmentCalculation, SystemResults};
pub use system::{DesignMethod, DesignSettings, DuctNode, DuctSegment, DuctSystem, NodeType};
