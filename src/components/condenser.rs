use uom::si::{
    f64::{TemperatureInterval, ThermodynamicTemperature},
    temperature_interval::kelvin,
};

use super::ComponentError;

const MAX_SUBCOOLING_KELVIN: f64 = 50.0;

/// Condenser spec: condensing temperature and outlet subcooling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condenser {
    temperature: ThermodynamicTemperature,
    subcooling: TemperatureInterval,
}

impl Condenser {
    /// Creates a condenser spec.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Subcooling`] unless the subcooling lies in
    /// the closed range 0 to 50 K.
    pub fn new(
        temperature: ThermodynamicTemperature,
        subcooling: TemperatureInterval,
    ) -> Result<Self, ComponentError> {
        if !(0.0..=MAX_SUBCOOLING_KELVIN).contains(&subcooling.get::<kelvin>()) {
            return Err(ComponentError::Subcooling { value: subcooling });
        }
        Ok(Self {
            temperature,
            subcooling,
        })
    }

    #[must_use]
    pub fn temperature(&self) -> ThermodynamicTemperature {
        self.temperature
    }

    #[must_use]
    pub fn subcooling(&self) -> TemperatureInterval {
        self.subcooling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::thermodynamic_temperature::degree_celsius;

    #[test]
    fn subcooling_bounds_are_inclusive() {
        let t = ThermodynamicTemperature::new::<degree_celsius>(45.0);
        assert!(Condenser::new(t, TemperatureInterval::new::<kelvin>(0.0)).is_ok());
        assert!(Condenser::new(t, TemperatureInterval::new::<kelvin>(50.0)).is_ok());
        assert!(matches!(
            Condenser::new(t, TemperatureInterval::new::<kelvin>(-1.0)),
            Err(ComponentError::Subcooling { .. })
        ));
        assert!(matches!(
            Condenser::new(t, TemperatureInterval::new::<kelvin>(51.0)),
            Err(ComponentError::Subcooling { .. })
        ));
    }
}
