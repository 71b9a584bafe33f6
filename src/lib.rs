//! # VCRC
//!
//! Models of vapor-compression refrigeration cycles (VCRC): state-point
//! solving, performance metrics (capacities, specific work, EER/COP), and an
//! entropy-based breakdown of each cycle's irreversibilities.
//!
//! ## Crate layout
//!
//! - [`components`]: Immutable, range-validated specifications of the
//!   physical devices a cycle is built from.
//! - [`cycles`]: One evaluator per cycle topology, from the four-point
//!   single-stage cycle to the Mitsubishi Zubadan circuit.
//! - [`analysis`]: Entropy (exergy) analysis of a solved cycle.
//! - [`refrigerant`]: The fluid-property contract cycles are solved against,
//!   plus an idealized analytic backend.
//! - [`support`]: Numeric constraints, unit extensions, and the equation
//!   solver used to close implicit topologies.
//!
//! ## Design
//!
//! Every cycle is computed once, inside its constructor, against a
//! [`refrigerant::PropertyModel`]. Construction is all-or-nothing: a cycle
//! value either satisfies all of its topology's invariants or is never
//! observable. Solved cycles own plain data and can be evaluated, compared,
//! and analyzed with no further property lookups.

pub mod analysis;
pub mod components;
pub mod cycles;
pub mod refrigerant;
pub mod support;
