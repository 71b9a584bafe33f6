use uom::si::{f64::TemperatureInterval, temperature_interval::kelvin};

use super::ComponentError;

const MAX_TEMPERATURE_DIFFERENCE_KELVIN: f64 = 50.0;

/// Recuperator (suction-line heat exchanger) spec: the approach temperature
/// difference between its hot inlet and cold inlet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recuperator {
    temperature_difference: TemperatureInterval,
}

impl Recuperator {
    /// Creates a recuperator spec.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::TemperatureDifference`] unless the approach
    /// lies in (0, 50] K.
    pub fn new(temperature_difference: TemperatureInterval) -> Result<Self, ComponentError> {
        let k = temperature_difference.get::<kelvin>();
        if !(k > 0.0 && k <= MAX_TEMPERATURE_DIFFERENCE_KELVIN) {
            return Err(ComponentError::TemperatureDifference {
                value: temperature_difference,
            });
        }
        Ok(Self {
            temperature_difference,
        })
    }

    #[must_use]
    pub fn temperature_difference(&self) -> TemperatureInterval {
        self.temperature_difference
    }
}
