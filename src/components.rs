//! Component specifications.
//!
//! A component value describes one piece of hardware in a cycle: its
//! operating temperature, approach temperature difference, or efficiency.
//! Every constructor validates its inputs against the component's physical
//! range and fails with a [`ComponentError`] otherwise, so a constructed
//! component is always usable and cycles never re-validate.
//!
//! Components that fix a state directly ([`Evaporator`], [`HeatReleaser`])
//! also know how to resolve their outlet state against a
//! [`PropertyModel`](crate::refrigerant::PropertyModel).

mod compressor;
mod condenser;
mod economizer;
mod ejector;
mod error;
mod evaporator;
mod gas_cooler;
mod heat_releaser;
mod recuperator;

pub use compressor::Compressor;
pub use condenser::Condenser;
pub use economizer::{Economizer, EconomizerTPI};
pub use ejector::Ejector;
pub use error::ComponentError;
pub use evaporator::Evaporator;
pub use gas_cooler::GasCooler;
pub use heat_releaser::HeatReleaser;
pub use recuperator::Recuperator;
