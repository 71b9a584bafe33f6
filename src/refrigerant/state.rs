use uom::si::f64::{Pressure, Ratio, ThermodynamicTemperature};

use crate::support::units::{SpecificEnthalpy, SpecificEntropy};

use super::Refrigerant;

/// Phase of the refrigerant at a state point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Liquid below the saturation temperature.
    Subcooled,
    /// Inside the vapor dome; the state carries a quality.
    TwoPhase,
    /// Vapor above the saturation temperature.
    Superheated,
    /// At or above the critical pressure.
    Supercritical,
}

/// A fully determined thermodynamic state of a refrigerant.
///
/// State points are immutable snapshots produced only by
/// [`PropertyModel`](super::PropertyModel) lookups; cycles never mutate a
/// point, only derive new ones from it via the transformation methods in
/// [`process`](super::process).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatePoint {
    pub fluid: Refrigerant,
    pub pressure: Pressure,
    pub temperature: ThermodynamicTemperature,
    pub enthalpy: SpecificEnthalpy,
    pub entropy: SpecificEntropy,
    /// Vapor mass fraction; `Some` only in the two-phase region.
    pub quality: Option<Ratio>,
    pub phase: Phase,
}

impl StatePoint {
    /// Whether the point lies inside the vapor dome.
    #[must_use]
    pub fn is_two_phase(&self) -> bool {
        self.phase == Phase::TwoPhase
    }
}
