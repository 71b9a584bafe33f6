use uom::si::{f64::TemperatureInterval, temperature_interval::kelvin};

use super::ComponentError;

const MAX_TEMPERATURE_DIFFERENCE_KELVIN: f64 = 50.0;
const MAX_SUPERHEAT_KELVIN: f64 = 50.0;

fn check_temperature_difference(value: TemperatureInterval) -> Result<(), ComponentError> {
    let k = value.get::<kelvin>();
    if k > 0.0 && k <= MAX_TEMPERATURE_DIFFERENCE_KELVIN {
        Ok(())
    } else {
        Err(ComponentError::TemperatureDifference { value })
    }
}

/// Economizer spec: the approach temperature difference between its cold
/// outlet and the main-stream hot outlet, and the superheat of the vapor
/// leaving its cold side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Economizer {
    temperature_difference: TemperatureInterval,
    superheat: TemperatureInterval,
}

impl Economizer {
    /// Creates an economizer spec.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::TemperatureDifference`] unless the approach
    /// lies in (0, 50] K, or [`ComponentError::Superheat`] unless the
    /// superheat lies in the closed range 0 to 50 K.
    pub fn new(
        temperature_difference: TemperatureInterval,
        superheat: TemperatureInterval,
    ) -> Result<Self, ComponentError> {
        check_temperature_difference(temperature_difference)?;
        if !(0.0..=MAX_SUPERHEAT_KELVIN).contains(&superheat.get::<kelvin>()) {
            return Err(ComponentError::Superheat { value: superheat });
        }
        Ok(Self {
            temperature_difference,
            superheat,
        })
    }

    #[must_use]
    pub fn temperature_difference(&self) -> TemperatureInterval {
        self.temperature_difference
    }

    #[must_use]
    pub fn superheat(&self) -> TemperatureInterval {
        self.superheat
    }
}

/// Economizer spec for two-phase injection: the injected stream leaves the
/// economizer wet, so only the approach temperature difference is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomizerTPI {
    temperature_difference: TemperatureInterval,
}

impl EconomizerTPI {
    /// Creates a two-phase-injection economizer spec.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::TemperatureDifference`] unless the approach
    /// lies in (0, 50] K.
    pub fn new(temperature_difference: TemperatureInterval) -> Result<Self, ComponentError> {
        check_temperature_difference(temperature_difference)?;
        Ok(Self {
            temperature_difference,
        })
    }

    #[must_use]
    pub fn temperature_difference(&self) -> TemperatureInterval {
        self.temperature_difference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(k: f64) -> TemperatureInterval {
        TemperatureInterval::new::<kelvin>(k)
    }

    #[test]
    fn approach_must_be_positive_and_at_most_fifty() {
        assert!(Economizer::new(delta(5.0), delta(5.0)).is_ok());
        assert!(Economizer::new(delta(50.0), delta(0.0)).is_ok());
        assert!(matches!(
            Economizer::new(delta(0.0), delta(5.0)),
            Err(ComponentError::TemperatureDifference { .. })
        ));
        assert!(matches!(
            EconomizerTPI::new(delta(50.1)),
            Err(ComponentError::TemperatureDifference { .. })
        ));
    }

    #[test]
    fn superheat_bounds_are_inclusive() {
        assert!(Economizer::new(delta(5.0), delta(0.0)).is_ok());
        assert!(matches!(
            Economizer::new(delta(5.0), delta(-1.0)),
            Err(ComponentError::Superheat { .. })
        ));
    }
}
