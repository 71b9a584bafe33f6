//! Derived state transformations.
//!
//! Each operation takes the inlet point, a [`PropertyModel`], and the
//! defining parameter of the process, and resolves the outlet point with a
//! single property lookup. Operations are directional: asking a compression
//! to lower the pressure, or a heating to lower the enthalpy, is an error
//! rather than a silently reversed process.

use uom::si::f64::{Pressure, Ratio, ThermodynamicTemperature};

use crate::support::units::SpecificEnthalpy;

use super::{ProcessError, PropertyModel, StateInput, StatePoint};

impl StatePoint {
    /// Outlet of an ideal (constant-entropy) compression to `pressure`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NotCompression`] if `pressure` is not above
    /// the inlet pressure, or a property error from the lookup.
    pub fn isentropic_compression_to(
        &self,
        model: &impl PropertyModel,
        pressure: Pressure,
    ) -> Result<StatePoint, ProcessError> {
        if pressure <= self.pressure {
            return Err(ProcessError::NotCompression {
                inlet: self.pressure,
                target: pressure,
            });
        }
        Ok(model.state(
            self.fluid,
            StateInput::PressureEntropy(pressure, self.entropy),
        )?)
    }

    /// Outlet of a real compression to `pressure` with the given isentropic
    /// efficiency: outlet enthalpy = inlet + isentropic Δh / efficiency.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NotCompression`] if `pressure` is not above
    /// the inlet pressure, or a property error from the lookups.
    pub fn compression_to(
        &self,
        model: &impl PropertyModel,
        pressure: Pressure,
        isentropic_efficiency: Ratio,
    ) -> Result<StatePoint, ProcessError> {
        let ideal = self.isentropic_compression_to(model, pressure)?;
        let enthalpy = self.enthalpy + (ideal.enthalpy - self.enthalpy) / isentropic_efficiency;
        Ok(model.state(
            self.fluid,
            StateInput::PressureEnthalpy(pressure, enthalpy),
        )?)
    }

    /// Outlet of a real expansion to `pressure` with the given isentropic
    /// efficiency: outlet enthalpy = inlet − efficiency · isentropic Δh.
    ///
    /// Used for the ejector's nozzle and suction streams.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NotExpansion`] if `pressure` is not below the
    /// inlet pressure, or a property error from the lookups.
    pub fn expansion_to(
        &self,
        model: &impl PropertyModel,
        pressure: Pressure,
        isentropic_efficiency: Ratio,
    ) -> Result<StatePoint, ProcessError> {
        if pressure >= self.pressure {
            return Err(ProcessError::NotExpansion {
                inlet: self.pressure,
                target: pressure,
            });
        }
        let ideal = model.state(
            self.fluid,
            StateInput::PressureEntropy(pressure, self.entropy),
        )?;
        let enthalpy = self.enthalpy - isentropic_efficiency * (self.enthalpy - ideal.enthalpy);
        Ok(model.state(
            self.fluid,
            StateInput::PressureEnthalpy(pressure, enthalpy),
        )?)
    }

    /// Outlet of a throttling (constant-enthalpy) expansion to `pressure`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NotExpansion`] if `pressure` is not below the
    /// inlet pressure, or a property error from the lookup.
    pub fn isenthalpic_expansion_to(
        &self,
        model: &impl PropertyModel,
        pressure: Pressure,
    ) -> Result<StatePoint, ProcessError> {
        if pressure >= self.pressure {
            return Err(ProcessError::NotExpansion {
                inlet: self.pressure,
                target: pressure,
            });
        }
        Ok(model.state(
            self.fluid,
            StateInput::PressureEnthalpy(pressure, self.enthalpy),
        )?)
    }

    /// Isobaric heating to the target temperature.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NotHeating`] if the target does not exceed
    /// the inlet temperature, or a property error from the lookup.
    pub fn heating_to_temperature(
        &self,
        model: &impl PropertyModel,
        temperature: ThermodynamicTemperature,
    ) -> Result<StatePoint, ProcessError> {
        if temperature <= self.temperature {
            return Err(ProcessError::NotHeating);
        }
        Ok(model.state(
            self.fluid,
            StateInput::PressureTemperature(self.pressure, temperature),
        )?)
    }

    /// Isobaric heating to the target enthalpy.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NotHeating`] if the target does not exceed
    /// the inlet enthalpy, or a property error from the lookup.
    pub fn heating_to_enthalpy(
        &self,
        model: &impl PropertyModel,
        enthalpy: SpecificEnthalpy,
    ) -> Result<StatePoint, ProcessError> {
        if enthalpy <= self.enthalpy {
            return Err(ProcessError::NotHeating);
        }
        Ok(model.state(
            self.fluid,
            StateInput::PressureEnthalpy(self.pressure, enthalpy),
        )?)
    }

    /// Isobaric cooling to the target temperature.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NotCooling`] if the target is not below the
    /// inlet temperature, or a property error from the lookup.
    pub fn cooling_to_temperature(
        &self,
        model: &impl PropertyModel,
        temperature: ThermodynamicTemperature,
    ) -> Result<StatePoint, ProcessError> {
        if temperature >= self.temperature {
            return Err(ProcessError::NotCooling);
        }
        Ok(model.state(
            self.fluid,
            StateInput::PressureTemperature(self.pressure, temperature),
        )?)
    }

    /// Isobaric cooling to the target enthalpy.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NotCooling`] if the target is not below the
    /// inlet enthalpy, or a property error from the lookup.
    pub fn cooling_to_enthalpy(
        &self,
        model: &impl PropertyModel,
        enthalpy: SpecificEnthalpy,
    ) -> Result<StatePoint, ProcessError> {
        if enthalpy >= self.enthalpy {
            return Err(ProcessError::NotCooling);
        }
        Ok(model.state(
            self.fluid,
            StateInput::PressureEnthalpy(self.pressure, enthalpy),
        )?)
    }

    /// Adiabatic mass- and energy-weighted mix of two streams.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::FluidMismatch`] or
    /// [`ProcessError::PressureMismatch`] for incompatible streams, or a
    /// property error from the lookup.
    pub fn mixing(
        model: &impl PropertyModel,
        flow_a: Ratio,
        a: &StatePoint,
        flow_b: Ratio,
        b: &StatePoint,
    ) -> Result<StatePoint, ProcessError> {
        if a.fluid != b.fluid {
            return Err(ProcessError::FluidMismatch);
        }
        // The streams reach the mixing node through different arithmetic
        // paths to the same nominal pressure.
        let relative_gap = ((a.pressure - b.pressure) / a.pressure).abs();
        if relative_gap.get::<uom::si::ratio::ratio>() > 1e-6 {
            return Err(ProcessError::PressureMismatch);
        }
        let enthalpy = (flow_a * a.enthalpy + flow_b * b.enthalpy) / (flow_a + flow_b);
        Ok(model.state(
            a.fluid,
            StateInput::PressureEnthalpy(a.pressure, enthalpy),
        )?)
    }
}
