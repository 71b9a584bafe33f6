use uom::{
    ConstZero,
    si::f64::{Pressure, TemperatureInterval},
};

use crate::{
    refrigerant::{ProcessError, PropertyError, PropertyModel, Refrigerant, StateInput, StatePoint},
    support::units::TemperatureDifference,
};

use super::{Condenser, GasCooler};

/// The high-side heat rejection device of a cycle.
///
/// Subcritical cycles condense against a [`Condenser`]; transcritical CO2
/// cycles reject heat through a [`GasCooler`] above the critical pressure.
/// The enum lets every cycle accept either without caring which.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeatReleaser {
    Condenser(Condenser),
    GasCooler(GasCooler),
}

impl HeatReleaser {
    /// The high-side pressure the compressor discharges against.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the condensing pressure lookup fails.
    pub fn pressure(
        &self,
        model: &impl PropertyModel,
        fluid: Refrigerant,
    ) -> Result<Pressure, PropertyError> {
        match self {
            Self::Condenser(condenser) => Ok(model
                .bubble_point_at_temperature(fluid, condenser.temperature())?
                .pressure),
            Self::GasCooler(cooler) => Ok(cooler.pressure()),
        }
    }

    /// Refrigerant state leaving the heat rejection device.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessError`] if the property lookups fail.
    pub fn outlet(
        &self,
        model: &impl PropertyModel,
        fluid: Refrigerant,
    ) -> Result<StatePoint, ProcessError> {
        match self {
            Self::Condenser(condenser) => {
                let bubble = model.bubble_point_at_temperature(fluid, condenser.temperature())?;
                if condenser.subcooling() > TemperatureInterval::ZERO {
                    bubble.cooling_to_temperature(
                        model,
                        condenser.temperature().less(condenser.subcooling()),
                    )
                } else {
                    Ok(bubble)
                }
            }
            Self::GasCooler(cooler) => Ok(model.state(
                fluid,
                StateInput::PressureTemperature(cooler.pressure(), cooler.outlet_temperature()),
            )?),
        }
    }

    /// Whether heat rejection happens above the critical pressure.
    #[must_use]
    pub fn is_transcritical(&self) -> bool {
        matches!(self, Self::GasCooler(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        pressure::pascal,
        temperature_interval::kelvin,
        thermodynamic_temperature::{degree_celsius, kelvin as abs_kelvin},
    };
    use uom::si::f64::ThermodynamicTemperature;

    use crate::refrigerant::{Phase, model::Idealized};

    #[test]
    fn condenser_outlet_carries_the_subcooling() {
        let condenser = Condenser::new(
            ThermodynamicTemperature::new::<degree_celsius>(45.0),
            TemperatureInterval::new::<kelvin>(5.0),
        )
        .unwrap();
        let releaser = HeatReleaser::Condenser(condenser);

        let outlet = releaser.outlet(&Idealized, Refrigerant::R134a).unwrap();
        assert_eq!(outlet.phase, Phase::Subcooled);
        assert_relative_eq!(outlet.temperature.get::<abs_kelvin>(), 313.15, epsilon = 1e-9);
        assert!(!releaser.is_transcritical());
    }

    #[test]
    fn gas_cooler_outlet_is_at_the_stored_pressure() {
        let cooler = GasCooler::with_optimal_pressure(ThermodynamicTemperature::new::<
            degree_celsius,
        >(35.0))
        .unwrap();
        let releaser = HeatReleaser::GasCooler(cooler);

        let pressure = releaser.pressure(&Idealized, Refrigerant::R744).unwrap();
        let outlet = releaser.outlet(&Idealized, Refrigerant::R744).unwrap();

        assert_relative_eq!(
            pressure.get::<pascal>(),
            cooler.pressure().get::<pascal>()
        );
        assert_eq!(outlet.phase, Phase::Supercritical);
        assert!(releaser.is_transcritical());
    }
}
