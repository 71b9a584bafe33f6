//! Property model backends.
//!
//! Contains the [`PropertyModel`](super::PropertyModel) implementations
//! shipped with this crate. [`Idealized`] is an analytic
//! equation-of-state approximation that is fast, dependency-free, and
//! thermodynamically self-consistent; it is the backend used throughout the
//! crate's tests and is adequate for comparative cycle studies. Higher
//! fidelity backends (e.g. a wrapped native property library) can be plugged
//! in by implementing the trait.

mod idealized;

pub use idealized::Idealized;
