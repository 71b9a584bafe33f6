use thiserror::Error;
use uom::si::f64::{Pressure, Ratio, TemperatureInterval, ThermodynamicTemperature};

/// Errors from component spec validation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ComponentError {
    /// Isentropic efficiencies are meaningful only strictly inside (0, 100)%.
    #[error("isentropic efficiency must lie strictly between 0 and 100%, got {value:?}")]
    Efficiency { value: Ratio },

    /// Superheat is limited to the closed range 0 to 50 K.
    #[error("superheat must lie between 0 and 50 K inclusive, got {value:?}")]
    Superheat { value: TemperatureInterval },

    /// Subcooling is limited to the closed range 0 to 50 K.
    #[error("subcooling must lie between 0 and 50 K inclusive, got {value:?}")]
    Subcooling { value: TemperatureInterval },

    /// Approach temperature differences must be positive and at most 50 K.
    #[error("temperature difference must lie in (0, 50] K, got {value:?}")]
    TemperatureDifference { value: TemperatureInterval },

    /// Gas cooler pressure must be positive.
    #[error("gas cooler pressure must be positive, got {value:?}")]
    Pressure { value: Pressure },

    /// The optimal-pressure correlation has no positive solution here.
    #[error("no optimal gas cooler pressure exists at {outlet_temperature:?}")]
    NoOptimalPressure {
        outlet_temperature: ThermodynamicTemperature,
    },
}
