//! Refrigerant property modeling.
//!
//! Cycles are solved against a [`PropertyModel`]: given a fluid and two
//! independent intensive properties, it returns a fully determined
//! [`StatePoint`] or fails with [`PropertyError`]. Everything a cycle does to
//! a point (compression, expansion, heating, cooling, mixing) is a derived
//! transformation built on that single lookup; see the [`StatePoint`]
//! methods. All operations are pure, deterministic, and side-effect free.
//!
//! [`model::Idealized`] provides an analytic backend suitable for tests and
//! engineering estimates; a wrapped native property library can implement
//! [`PropertyModel`] for production-grade accuracy.

mod error;
mod state;

pub mod model;
pub mod process;

pub use error::{ProcessError, PropertyError};
pub use state::{Phase, StatePoint};

use std::fmt;

use uom::{
    ConstZero,
    si::f64::{Pressure, Ratio, ThermodynamicTemperature},
};

use crate::support::units::{SpecificEnthalpy, SpecificEntropy};

/// Refrigerants known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Refrigerant {
    R32,
    R134a,
    R407C,
    R410A,
    /// Carbon dioxide; its heat release is typically transcritical.
    R744,
}

impl fmt::Display for Refrigerant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::R32 => "R32",
            Self::R134a => "R134a",
            Self::R407C => "R407C",
            Self::R410A => "R410A",
            Self::R744 => "R744",
        };
        f.write_str(name)
    }
}

/// Pairs of independent intensive properties that determine a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateInput {
    PressureTemperature(Pressure, ThermodynamicTemperature),
    PressureEnthalpy(Pressure, SpecificEnthalpy),
    PressureEntropy(Pressure, SpecificEntropy),
    PressureQuality(Pressure, Ratio),
    TemperatureQuality(ThermodynamicTemperature, Ratio),
    EnthalpyEntropy(SpecificEnthalpy, SpecificEntropy),
}

/// A fluid property oracle.
///
/// Implementations must be deterministic: the same input always produces the
/// same state. The saturation conveniences are thin wrappers over
/// [`Self::state`] at quality zero (bubble) and one (dew).
pub trait PropertyModel {
    /// Critical temperature of the fluid.
    fn critical_temperature(&self, fluid: Refrigerant) -> ThermodynamicTemperature;

    /// Critical pressure of the fluid.
    fn critical_pressure(&self, fluid: Refrigerant) -> Pressure;

    /// Resolves a fully determined state from two independent properties.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the input pair is infeasible for the
    /// fluid (e.g. a quality above the critical pressure).
    fn state(&self, fluid: Refrigerant, input: StateInput) -> Result<StatePoint, PropertyError>;

    /// Saturated liquid state at the given temperature.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if no saturation state exists there.
    fn bubble_point_at_temperature(
        &self,
        fluid: Refrigerant,
        temperature: ThermodynamicTemperature,
    ) -> Result<StatePoint, PropertyError> {
        self.state(
            fluid,
            StateInput::TemperatureQuality(temperature, Ratio::ZERO),
        )
    }

    /// Saturated liquid state at the given pressure.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if no saturation state exists there.
    fn bubble_point_at_pressure(
        &self,
        fluid: Refrigerant,
        pressure: Pressure,
    ) -> Result<StatePoint, PropertyError> {
        self.state(fluid, StateInput::PressureQuality(pressure, Ratio::ZERO))
    }

    /// Saturated vapor state at the given temperature.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if no saturation state exists there.
    fn dew_point_at_temperature(
        &self,
        fluid: Refrigerant,
        temperature: ThermodynamicTemperature,
    ) -> Result<StatePoint, PropertyError> {
        self.state(fluid, StateInput::TemperatureQuality(temperature, unit()))
    }

    /// Saturated vapor state at the given pressure.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if no saturation state exists there.
    fn dew_point_at_pressure(
        &self,
        fluid: Refrigerant,
        pressure: Pressure,
    ) -> Result<StatePoint, PropertyError> {
        self.state(fluid, StateInput::PressureQuality(pressure, unit()))
    }

    /// Two-phase state at the given pressure and vapor quality.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the quality is outside `[0, 1]` or no
    /// two-phase region exists at the pressure.
    fn two_phase_point_at(
        &self,
        fluid: Refrigerant,
        pressure: Pressure,
        quality: Ratio,
    ) -> Result<StatePoint, PropertyError> {
        self.state(fluid, StateInput::PressureQuality(pressure, quality))
    }
}

fn unit() -> Ratio {
    Ratio::new::<uom::si::ratio::ratio>(1.0)
}
