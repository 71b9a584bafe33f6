use uom::{
    ConstZero,
    si::{
        f64::{TemperatureInterval, ThermodynamicTemperature},
        temperature_interval::kelvin,
    },
};

use crate::{
    refrigerant::{ProcessError, PropertyModel, Refrigerant, StatePoint},
    support::units::TemperatureDifference,
};

use super::ComponentError;

const MAX_SUPERHEAT_KELVIN: f64 = 50.0;

/// Evaporator spec: evaporating temperature and outlet superheat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaporator {
    temperature: ThermodynamicTemperature,
    superheat: TemperatureInterval,
}

impl Evaporator {
    /// Creates an evaporator spec.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Superheat`] unless the superheat lies in
    /// the closed range 0 to 50 K.
    pub fn new(
        temperature: ThermodynamicTemperature,
        superheat: TemperatureInterval,
    ) -> Result<Self, ComponentError> {
        if !(0.0..=MAX_SUPERHEAT_KELVIN).contains(&superheat.get::<kelvin>()) {
            return Err(ComponentError::Superheat { value: superheat });
        }
        Ok(Self {
            temperature,
            superheat,
        })
    }

    #[must_use]
    pub fn temperature(&self) -> ThermodynamicTemperature {
        self.temperature
    }

    #[must_use]
    pub fn superheat(&self) -> TemperatureInterval {
        self.superheat
    }

    /// Refrigerant state leaving the evaporator: saturated vapor at the
    /// evaporating temperature, superheated by the spec's superheat.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessError`] if the property lookups fail.
    pub fn outlet(
        &self,
        model: &impl PropertyModel,
        fluid: Refrigerant,
    ) -> Result<StatePoint, ProcessError> {
        let dew = model.dew_point_at_temperature(fluid, self.temperature)?;
        if self.superheat > TemperatureInterval::ZERO {
            dew.heating_to_temperature(model, self.temperature.plus(self.superheat))
        } else {
            Ok(dew)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::thermodynamic_temperature::{degree_celsius, kelvin as abs_kelvin};

    use crate::refrigerant::{Phase, model::Idealized};

    fn spec(superheat_kelvin: f64) -> Result<Evaporator, ComponentError> {
        Evaporator::new(
            ThermodynamicTemperature::new::<degree_celsius>(5.0),
            TemperatureInterval::new::<kelvin>(superheat_kelvin),
        )
    }

    #[test]
    fn superheat_bounds_are_inclusive() {
        assert!(spec(0.0).is_ok());
        assert!(spec(50.0).is_ok());
        assert!(matches!(
            spec(-0.1),
            Err(ComponentError::Superheat { .. })
        ));
        assert!(matches!(
            spec(50.1),
            Err(ComponentError::Superheat { .. })
        ));
    }

    #[test]
    fn outlet_without_superheat_is_saturated_vapor() {
        let outlet = spec(0.0)
            .unwrap()
            .outlet(&Idealized, Refrigerant::R410A)
            .unwrap();
        assert_eq!(outlet.phase, Phase::TwoPhase);
        assert_relative_eq!(outlet.quality.unwrap().value, 1.0);
    }

    #[test]
    fn outlet_with_superheat_is_superheated_vapor() {
        let outlet = spec(8.0)
            .unwrap()
            .outlet(&Idealized, Refrigerant::R410A)
            .unwrap();
        assert_eq!(outlet.phase, Phase::Superheated);
        assert_relative_eq!(outlet.temperature.get::<abs_kelvin>(), 286.15, epsilon = 1e-9);
    }
}
