//! # Duct Calculations
//!
//! Pure calculation modules used by the system solver. Each follows the
//! pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! The building-block formulas are also exposed as free functions so they
//! can be checked in isolation against literal inputs.
//!
//! ## Available Calculations
//!
//! - [`flow`] - Velocity, Reynolds number, friction factor and friction loss
//! - [`heat_loss`] - Air temperature drop along a run (NTU method)

pub mod flow;
pub mod heat_loss;

pub use flow::{FlowInput, FlowResult};
pub use heat_loss::{HeatLossInput, HeatLossResult};
