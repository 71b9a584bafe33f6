use crate::{
    analysis::{AnalysisNodes, ExchangerNode, Stream},
    components::{Compressor, Evaporator, HeatReleaser, Recuperator},
    refrigerant::{PropertyModel, Refrigerant, StatePoint},
    support::units::{SpecificEnthalpy, TemperatureDifference},
};

use super::{CycleError, HasRecuperator, RefrigerationCycle, check_lift, cycle_via_nodes};

/// Single-stage cycle with a suction-line heat exchanger: liquid leaving
/// the heat releaser preheats the compressor suction, gaining subcooling in
/// exchange for hotter suction gas.
#[derive(Debug, Clone, PartialEq)]
pub struct WithRecuperator {
    fluid: Refrigerant,
    nodes: AnalysisNodes,
    /// Vapor leaving the evaporator, entering the recuperator cold side.
    pub evaporator_outlet: StatePoint,
    /// Preheated compressor suction.
    pub suction: StatePoint,
    /// Compressor discharge.
    pub discharge: StatePoint,
    /// Liquid leaving the heat releaser, entering the recuperator hot side.
    pub liquid: StatePoint,
    /// Subcooled liquid leaving the recuperator.
    pub subcooled: StatePoint,
    /// Two-phase state entering the evaporator.
    pub evaporator_inlet: StatePoint,
}

impl WithRecuperator {
    /// Solves the cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the recuperator cannot realize its
    /// temperature approach or a state cannot be resolved.
    pub fn new(
        model: &impl PropertyModel,
        fluid: Refrigerant,
        evaporator: Evaporator,
        compressor: Compressor,
        heat_releaser: HeatReleaser,
        recuperator: Recuperator,
    ) -> Result<Self, CycleError> {
        let evaporator_outlet = evaporator.outlet(model, fluid)?;
        let high_pressure = heat_releaser.pressure(model, fluid)?;
        check_lift(evaporator_outlet.pressure, high_pressure)?;

        let liquid = heat_releaser.outlet(model, fluid)?;

        // The hot side cools toward the cold inlet down to the approach.
        let hot_outlet_temperature = evaporator_outlet
            .temperature
            .plus(recuperator.temperature_difference());
        if hot_outlet_temperature >= liquid.temperature {
            return Err(CycleError::WrongTemperatureDifference {
                location: "recuperator",
            });
        }
        let subcooled = liquid.cooling_to_temperature(model, hot_outlet_temperature)?;

        let suction =
            evaporator_outlet.heating_to_enthalpy(
                model,
                evaporator_outlet.enthalpy + (liquid.enthalpy - subcooled.enthalpy),
            )?;
        if suction.temperature > liquid.temperature {
            return Err(CycleError::WrongTemperatureDifference {
                location: "recuperator",
            });
        }

        let ideal_discharge = suction.isentropic_compression_to(model, high_pressure)?;
        let discharge =
            suction.compression_to(model, high_pressure, compressor.isentropic_efficiency())?;
        let evaporator_inlet =
            subcooled.isenthalpic_expansion_to(model, evaporator_outlet.pressure)?;

        let mut nodes = AnalysisNodes::basic(
            ideal_discharge.enthalpy - suction.enthalpy,
            discharge.enthalpy - suction.enthalpy,
            Stream::full(evaporator_inlet, evaporator_outlet),
            Stream::full(suction, discharge),
            Stream::full(discharge, liquid),
            heat_releaser.is_transcritical(),
            Stream::full(subcooled, evaporator_inlet),
        );
        nodes.recuperator = Some(ExchangerNode {
            cold: Stream::full(evaporator_outlet, suction),
            hot: Stream::full(liquid, subcooled),
        });

        Ok(Self {
            fluid,
            nodes,
            evaporator_outlet,
            suction,
            discharge,
            liquid,
            subcooled,
            evaporator_inlet,
        })
    }
}

cycle_via_nodes!(WithRecuperator);

impl HasRecuperator for WithRecuperator {
    fn recuperator_heat(&self) -> SpecificEnthalpy {
        self.liquid.enthalpy - self.subcooled.enthalpy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{Ratio, TemperatureInterval, ThermodynamicTemperature},
        ratio::{percent, ratio},
        temperature_interval::kelvin,
        thermodynamic_temperature::degree_celsius,
    };

    use crate::{
        analysis::EntropyAnalysis, components::Condenser, refrigerant::model::Idealized,
    };

    fn celsius(t: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(t)
    }

    fn cycle() -> WithRecuperator {
        WithRecuperator::new(
            &Idealized,
            Refrigerant::R134a,
            Evaporator::new(celsius(5.0), TemperatureInterval::new::<kelvin>(5.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            HeatReleaser::Condenser(
                Condenser::new(celsius(45.0), TemperatureInterval::new::<kelvin>(0.0)).unwrap(),
            ),
            Recuperator::new(TemperatureInterval::new::<kelvin>(25.0)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn recuperator_moves_heat_between_the_sides() {
        let cycle = cycle();
        assert!(cycle.suction.temperature > cycle.evaporator_outlet.temperature);
        assert!(cycle.subcooled.temperature < cycle.liquid.temperature);
        assert_relative_eq!(
            cycle.recuperator_heat().value,
            (cycle.suction.enthalpy - cycle.evaporator_outlet.enthalpy).value,
            max_relative = 1e-9
        );
    }

    #[test]
    fn energy_balance_closes() {
        let cycle = cycle();
        assert_relative_eq!(
            cycle.cop().get::<ratio>(),
            cycle.eer().get::<ratio>() + 1.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn entropy_decomposition_reconstructs_the_work() {
        let cycle = cycle();
        for indoor in [18.0, 21.0, 24.0] {
            for outdoor in [30.0, 37.0, 44.0] {
                let result = cycle
                    .entropy_analysis(celsius(indoor), celsius(outdoor))
                    .unwrap();

                assert!(
                    result.analysis_relative_error.get::<ratio>() < 1e-9,
                    "indoor {indoor}, outdoor {outdoor}"
                );
                assert!(result.recuperator_energy_loss_ratio.get::<ratio>() > 0.0);

                let sum = result.min_specific_work_ratio
                    + result.compressor_energy_loss_ratio
                    + result.condenser_energy_loss_ratio
                    + result.gas_cooler_energy_loss_ratio
                    + result.expansion_valves_energy_loss_ratio
                    + result.ejector_energy_loss_ratio
                    + result.evaporator_energy_loss_ratio
                    + result.recuperator_energy_loss_ratio
                    + result.economizer_energy_loss_ratio
                    + result.mixing_energy_loss_ratio;
                assert_relative_eq!(sum.get::<ratio>(), 1.0, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn rejects_an_impossible_approach() {
        let result = WithRecuperator::new(
            &Idealized,
            Refrigerant::R134a,
            Evaporator::new(celsius(5.0), TemperatureInterval::new::<kelvin>(5.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            HeatReleaser::Condenser(
                Condenser::new(celsius(45.0), TemperatureInterval::new::<kelvin>(0.0)).unwrap(),
            ),
            Recuperator::new(TemperatureInterval::new::<kelvin>(40.0)).unwrap(),
        );
        assert!(matches!(
            result,
            Err(CycleError::WrongTemperatureDifference { .. })
        ));
    }
}
