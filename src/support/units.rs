//! Extensions to [`uom`].
//!
//! All physical quantities in this crate are [`uom`] `f64` SI quantities.
//! This module adds the few pieces [`uom`] does not provide directly:
//! specific enthalpy/entropy quantity aliases and arithmetic between
//! absolute temperatures and temperature intervals.

use uom::{
    si::{
        ISQ, Quantity, SI,
        f64::{TemperatureInterval, ThermodynamicTemperature},
        temperature_interval::kelvin as delta_kelvin,
        thermodynamic_temperature::kelvin as abs_kelvin,
    },
    typenum::{N1, N2, P2, Z0},
};

/// Specific enthalpy, J/kg in SI.
pub type SpecificEnthalpy = Quantity<ISQ<P2, Z0, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Specific entropy, J/kg·K in SI.
pub type SpecificEntropy = Quantity<ISQ<P2, Z0, N2, Z0, N1, Z0, Z0>, SI<f64>, f64>;

/// Arithmetic between [`ThermodynamicTemperature`] and [`TemperatureInterval`].
///
/// [`uom`] distinguishes absolute temperatures from temperature differences
/// but does not provide the full set of operations between them, so
/// subtracting two absolute temperatures (yielding an interval) and shifting
/// an absolute temperature by an interval are supplied here.
pub trait TemperatureDifference {
    /// Returns the temperature difference `self - other`.
    fn minus(self, other: Self) -> TemperatureInterval;

    /// Returns this temperature raised by `delta`.
    #[must_use]
    fn plus(self, delta: TemperatureInterval) -> Self;

    /// Returns this temperature lowered by `delta`.
    #[must_use]
    fn less(self, delta: TemperatureInterval) -> Self;

    /// Returns this absolute temperature as an interval above 0 K.
    ///
    /// [`ThermodynamicTemperature`] carries [`uom`]'s `TemperatureKind` and
    /// cannot be multiplied or divided with other quantities; converting to
    /// the default-kind [`TemperatureInterval`] unlocks dimensional
    /// arithmetic such as `T · Δs` or `Δh / T`.
    fn above_zero(self) -> TemperatureInterval;
}

impl TemperatureDifference for ThermodynamicTemperature {
    fn minus(self, other: Self) -> TemperatureInterval {
        TemperatureInterval::new::<delta_kelvin>(
            self.get::<abs_kelvin>() - other.get::<abs_kelvin>(),
        )
    }

    fn plus(self, delta: TemperatureInterval) -> Self {
        Self::new::<abs_kelvin>(self.get::<abs_kelvin>() + delta.get::<delta_kelvin>())
    }

    fn less(self, delta: TemperatureInterval) -> Self {
        Self::new::<abs_kelvin>(self.get::<abs_kelvin>() - delta.get::<delta_kelvin>())
    }

    fn above_zero(self) -> TemperatureInterval {
        TemperatureInterval::new::<delta_kelvin>(self.get::<abs_kelvin>())
    }
}
