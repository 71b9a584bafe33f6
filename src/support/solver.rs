//! Equation solving for implicit cycle closures.
//!
//! Some topologies cannot be evaluated by a forward chain of property
//! lookups alone: the ejector's flow ratio and the Zubadan injection
//! circuit are fixed points of their own state computations. This module
//! provides the scalar root-finder those closures use.

pub mod newton_raphson;
