use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::{bar, pascal},
    thermodynamic_temperature::degree_celsius,
};

use super::ComponentError;

/// Gas cooler spec for transcritical heat rejection: the refrigerant outlet
/// temperature and the gas cooler operating pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasCooler {
    outlet_temperature: ThermodynamicTemperature,
    pressure: Pressure,
}

impl GasCooler {
    /// Creates a gas cooler spec with an explicit operating pressure.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Pressure`] unless the pressure is positive.
    pub fn new(
        outlet_temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<Self, ComponentError> {
        let pascals = pressure.get::<pascal>();
        if !pascals.is_finite() || pascals <= 0.0 {
            return Err(ComponentError::Pressure { value: pressure });
        }
        Ok(Self {
            outlet_temperature,
            pressure,
        })
    }

    /// Creates a gas cooler at the COP-optimal pressure for transcritical
    /// CO2, `p[bar] = 2.759 · t[°C] − 9.912`, from the outlet temperature.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::NoOptimalPressure`] when the correlation
    /// yields a non-positive pressure (outlet temperatures below about 4°C).
    pub fn with_optimal_pressure(
        outlet_temperature: ThermodynamicTemperature,
    ) -> Result<Self, ComponentError> {
        let optimal_bar = 2.759 * outlet_temperature.get::<degree_celsius>() - 9.912;
        if optimal_bar <= 0.0 {
            return Err(ComponentError::NoOptimalPressure { outlet_temperature });
        }
        Ok(Self {
            outlet_temperature,
            pressure: Pressure::new::<bar>(optimal_bar),
        })
    }

    #[must_use]
    pub fn outlet_temperature(&self) -> ThermodynamicTemperature {
        self.outlet_temperature
    }

    #[must_use]
    pub fn pressure(&self) -> Pressure {
        self.pressure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn optimal_pressure_follows_the_correlation() {
        let cooler = GasCooler::with_optimal_pressure(ThermodynamicTemperature::new::<
            degree_celsius,
        >(35.0))
        .unwrap();
        assert_relative_eq!(
            cooler.pressure().get::<bar>(),
            2.759 * 35.0 - 9.912,
            epsilon = 1e-9
        );
    }

    #[test]
    fn optimal_pressure_fails_for_cold_outlets() {
        assert!(matches!(
            GasCooler::with_optimal_pressure(ThermodynamicTemperature::new::<degree_celsius>(0.0)),
            Err(ComponentError::NoOptimalPressure { .. })
        ));
    }

    #[test]
    fn explicit_pressure_must_be_positive() {
        let t = ThermodynamicTemperature::new::<degree_celsius>(35.0);
        assert!(GasCooler::new(t, Pressure::new::<bar>(100.0)).is_ok());
        assert!(matches!(
            GasCooler::new(t, Pressure::new::<bar>(0.0)),
            Err(ComponentError::Pressure { .. })
        ));
    }
}
