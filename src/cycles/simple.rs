use crate::{
    analysis::{AnalysisNodes, Stream},
    components::{Compressor, Evaporator, HeatReleaser},
    refrigerant::{PropertyModel, Refrigerant, StatePoint},
};

use super::{CycleError, check_lift, cycle_via_nodes};

/// The single-stage cycle: evaporator, compressor, heat releaser, and one
/// expansion valve.
#[derive(Debug, Clone, PartialEq)]
pub struct Simple {
    fluid: Refrigerant,
    nodes: AnalysisNodes,
    /// Compressor suction, leaving the evaporator.
    pub suction: StatePoint,
    /// Compressor discharge, entering the heat releaser.
    pub discharge: StatePoint,
    /// Liquid (or supercritical fluid) leaving the heat releaser.
    pub liquid: StatePoint,
    /// Two-phase state entering the evaporator.
    pub evaporator_inlet: StatePoint,
}

impl Simple {
    /// Solves the cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the pressures are not ordered or a state
    /// cannot be resolved.
    pub fn new(
        model: &impl PropertyModel,
        fluid: Refrigerant,
        evaporator: Evaporator,
        compressor: Compressor,
        heat_releaser: HeatReleaser,
    ) -> Result<Self, CycleError> {
        let suction = evaporator.outlet(model, fluid)?;
        let high_pressure = heat_releaser.pressure(model, fluid)?;
        check_lift(suction.pressure, high_pressure)?;

        let ideal_discharge = suction.isentropic_compression_to(model, high_pressure)?;
        let discharge =
            suction.compression_to(model, high_pressure, compressor.isentropic_efficiency())?;
        let liquid = heat_releaser.outlet(model, fluid)?;
        let evaporator_inlet = liquid.isenthalpic_expansion_to(model, suction.pressure)?;

        let nodes = AnalysisNodes::basic(
            ideal_discharge.enthalpy - suction.enthalpy,
            discharge.enthalpy - suction.enthalpy,
            Stream::full(evaporator_inlet, suction),
            Stream::full(suction, discharge),
            Stream::full(discharge, liquid),
            heat_releaser.is_transcritical(),
            Stream::full(liquid, evaporator_inlet),
        );

        Ok(Self {
            fluid,
            nodes,
            suction,
            discharge,
            liquid,
            evaporator_inlet,
        })
    }
}

cycle_via_nodes!(Simple);

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        available_energy::joule_per_kilogram,
        f64::{Ratio, TemperatureInterval, ThermodynamicTemperature},
        pressure::pascal,
        ratio::{percent, ratio},
        temperature_interval::kelvin,
        thermodynamic_temperature::degree_celsius,
    };

    use crate::{
        analysis::EntropyAnalysis,
        components::{Condenser, GasCooler},
        cycles::RefrigerationCycle,
        refrigerant::{PropertyModel, model::Idealized},
    };

    fn celsius(t: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(t)
    }

    fn subcritical() -> Simple {
        Simple::new(
            &Idealized,
            Refrigerant::R407C,
            Evaporator::new(celsius(5.0), TemperatureInterval::new::<kelvin>(8.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            HeatReleaser::Condenser(
                Condenser::new(celsius(45.0), TemperatureInterval::new::<kelvin>(3.0)).unwrap(),
            ),
        )
        .unwrap()
    }

    #[test]
    fn energy_balance_closes() {
        let cycle = subcritical();

        // Heat rejected equals heat absorbed plus work.
        assert_relative_eq!(
            cycle.specific_heating_capacity().get::<joule_per_kilogram>(),
            (cycle.specific_cooling_capacity() + cycle.specific_work())
                .get::<joule_per_kilogram>(),
            max_relative = 1e-9
        );
        assert_relative_eq!(
            cycle.cop().get::<ratio>(),
            cycle.eer().get::<ratio>() + 1.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn actual_work_exceeds_isentropic_by_the_efficiency() {
        let cycle = subcritical();
        assert_relative_eq!(
            cycle.specific_work().get::<joule_per_kilogram>(),
            cycle.isentropic_specific_work().get::<joule_per_kilogram>() / 0.75,
            max_relative = 1e-9
        );
    }

    #[test]
    fn performance_is_in_a_plausible_range() {
        let cycle = subcritical();
        let eer = cycle.eer().get::<ratio>();
        assert!(eer > 2.0 && eer < 8.0, "eer = {eer}");
        assert!(cycle.discharge.temperature > cycle.suction.temperature);
    }

    #[test]
    fn solved_points_follow_the_component_specs() {
        let model = Idealized;
        let cycle = Simple::new(
            &model,
            Refrigerant::R407C,
            Evaporator::new(celsius(5.0), TemperatureInterval::new::<kelvin>(8.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(80.0)).unwrap(),
            HeatReleaser::Condenser(
                Condenser::new(celsius(45.0), TemperatureInterval::new::<kelvin>(3.0)).unwrap(),
            ),
        )
        .unwrap();

        // Suction: dew pressure at 5 °C, superheated by 8 K.
        let dew = model
            .dew_point_at_temperature(Refrigerant::R407C, celsius(5.0))
            .unwrap();
        assert_relative_eq!(
            cycle.suction.pressure.get::<pascal>(),
            dew.pressure.get::<pascal>(),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            cycle.suction.temperature.get::<degree_celsius>(),
            13.0,
            epsilon = 1e-9
        );

        // Discharge: condensing pressure, work scaled by the efficiency.
        let bubble = model
            .bubble_point_at_temperature(Refrigerant::R407C, celsius(45.0))
            .unwrap();
        assert_relative_eq!(
            cycle.discharge.pressure.get::<pascal>(),
            bubble.pressure.get::<pascal>(),
            max_relative = 1e-12
        );
        let ideal = cycle
            .suction
            .isentropic_compression_to(&model, bubble.pressure)
            .unwrap();
        assert_relative_eq!(
            (cycle.discharge.enthalpy - cycle.suction.enthalpy).get::<joule_per_kilogram>(),
            (ideal.enthalpy - cycle.suction.enthalpy).get::<joule_per_kilogram>() / 0.8,
            max_relative = 1e-9
        );

        // Liquid subcooled by 3 K; the valve is isenthalpic.
        assert_relative_eq!(
            cycle.liquid.temperature.get::<degree_celsius>(),
            42.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            cycle.evaporator_inlet.enthalpy.get::<joule_per_kilogram>(),
            cycle.liquid.enthalpy.get::<joule_per_kilogram>(),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            cycle.evaporator_inlet.pressure.get::<pascal>(),
            cycle.suction.pressure.get::<pascal>(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn rejects_unordered_pressures() {
        let result = Simple::new(
            &Idealized,
            Refrigerant::R407C,
            Evaporator::new(celsius(50.0), TemperatureInterval::new::<kelvin>(0.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            HeatReleaser::Condenser(
                Condenser::new(celsius(45.0), TemperatureInterval::new::<kelvin>(0.0)).unwrap(),
            ),
        );
        assert!(matches!(result, Err(CycleError::PressureOrder)));
    }

    #[test]
    fn entropy_decomposition_reconstructs_the_work() {
        let cycle = subcritical();
        for indoor in [18.0, 21.0, 24.0] {
            for outdoor in [30.0, 35.0, 41.0] {
                let result = cycle
                    .entropy_analysis(celsius(indoor), celsius(outdoor))
                    .unwrap();

                assert!(
                    result.analysis_relative_error.get::<ratio>() < 1e-9,
                    "indoor {indoor}, outdoor {outdoor}"
                );
                assert!(result.thermodynamic_perfection.get::<ratio>() < 1.0);
                assert!(result.gas_cooler_energy_loss_ratio.get::<ratio>().abs() < 1e-15);

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
    fn transcritical_rejection_reports_through_the_gas_cooler() {
        let cycle = Simple::new(
            &Idealized,
            Refrigerant::R744,
            Evaporator::new(celsius(0.0), TemperatureInterval::new::<kelvin>(5.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            HeatReleaser::GasCooler(GasCooler::with_optimal_pressure(celsius(35.0)).unwrap()),
        )
        .unwrap();

        let result = cycle.entropy_analysis(celsius(20.0), celsius(30.0)).unwrap();
        assert!(result.condenser_energy_loss_ratio.get::<ratio>().abs() < 1e-15);
        assert!(result.gas_cooler_energy_loss_ratio.get::<ratio>() > 0.0);
        assert!(result.analysis_relative_error.get::<ratio>() < 1e-9);
    }
}
