//! Supporting utilities used by the cycle models.
//!
//! - [`constraint`]: Type-level numeric constraints enforced at construction.
//! - [`solver`]: The equation solver closing implicit cycle topologies.
//! - [`units`]: Extensions to [`uom`] needed for thermodynamic modeling.

pub mod constraint;
pub mod solver;
pub mod units;
