use uom::si::{
    f64::{Pressure, Ratio},
    ratio::ratio,
};

use crate::{
    analysis::{AnalysisNodes, MixingNode, Stream},
    components::{Compressor, Evaporator, HeatReleaser},
    refrigerant::{PropertyModel, Refrigerant, StatePoint},
};

use super::{
    CycleError, RefrigerationCycle, TwoStage, check_lift, cycle_via_nodes, flow_fraction,
    intermediate_pressure,
};

/// Two-stage cycle with incomplete intercooling: flash vapor from the
/// intermediate-pressure separator mixes with the first-stage discharge, so
/// the second stage ingests slightly superheated vapor rather than
/// saturated vapor.
#[derive(Debug, Clone, PartialEq)]
pub struct WithIncompleteIntercooling {
    fluid: Refrigerant,
    nodes: AnalysisNodes,
    intermediate: Pressure,
    /// Share of the flow that passes through the evaporator.
    pub evaporator_fraction: Ratio,
    /// Flash vapor share separated at the intermediate pressure.
    pub vapor_fraction: Ratio,
    /// First-stage suction, leaving the evaporator.
    pub suction: StatePoint,
    /// First-stage discharge at the intermediate pressure.
    pub intercooler_inlet: StatePoint,
    /// Second-stage suction after mixing with the flash vapor.
    pub second_suction: StatePoint,
    /// Second-stage discharge, entering the heat releaser.
    pub discharge: StatePoint,
    /// Liquid leaving the heat releaser.
    pub liquid: StatePoint,
    /// Two-phase state entering the separator.
    pub separator_inlet: StatePoint,
    /// Saturated liquid leaving the separator.
    pub separator_liquid: StatePoint,
    /// Two-phase state entering the evaporator.
    pub evaporator_inlet: StatePoint,
}

impl WithIncompleteIntercooling {
    /// Solves the cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the pressures are not ordered, the
    /// separator inlet is not two-phase, or a state cannot be resolved.
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
        let intermediate = intermediate_pressure(model, fluid, suction.pressure, high_pressure);
        check_lift(suction.pressure, intermediate)?;
        check_lift(intermediate, high_pressure)?;

        let efficiency = compressor.isentropic_efficiency();
        let first_ideal = suction.isentropic_compression_to(model, intermediate)?;
        let intercooler_inlet = suction.compression_to(model, intermediate, efficiency)?;

        let liquid = heat_releaser.outlet(model, fluid)?;
        let separator_inlet = liquid.isenthalpic_expansion_to(model, intermediate)?;
        let Some(flash_quality) = separator_inlet.quality else {
            return Err(CycleError::NotTwoPhase {
                location: "separator inlet",
            });
        };
        let vapor_fraction = flash_quality;
        let evaporator_fraction =
            flow_fraction(Ratio::new::<ratio>(1.0) - flash_quality, "separator outlet")?;

        let separator_vapor = model.dew_point_at_pressure(fluid, intermediate)?;
        let separator_liquid = model.bubble_point_at_pressure(fluid, intermediate)?;

        let second_suction = StatePoint::mixing(
            model,
            evaporator_fraction,
            &intercooler_inlet,
            vapor_fraction,
            &separator_vapor,
        )?;
        let second_ideal = second_suction.isentropic_compression_to(model, high_pressure)?;
        let discharge = second_suction.compression_to(model, high_pressure, efficiency)?;

        let evaporator_inlet =
            separator_liquid.isenthalpic_expansion_to(model, suction.pressure)?;

        let mut nodes = AnalysisNodes::basic(
            evaporator_fraction * (first_ideal.enthalpy - suction.enthalpy)
                + (second_ideal.enthalpy - second_suction.enthalpy),
            evaporator_fraction * (intercooler_inlet.enthalpy - suction.enthalpy)
                + (discharge.enthalpy - second_suction.enthalpy),
            Stream::part(evaporator_fraction, evaporator_inlet, suction),
            Stream::part(evaporator_fraction, suction, intercooler_inlet),
            Stream::full(discharge, liquid),
            heat_releaser.is_transcritical(),
            Stream::full(liquid, separator_inlet),
        );
        nodes
            .compressions
            .push(Stream::full(second_suction, discharge));
        nodes
            .expansion_valves
            .push(Stream::part(evaporator_fraction, separator_liquid, evaporator_inlet));
        nodes.mixing = Some(MixingNode {
            inlets: vec![
                (evaporator_fraction, intercooler_inlet),
                (Ratio::new::<ratio>(1.0), separator_inlet),
            ],
            outlets: vec![
                (Ratio::new::<ratio>(1.0), second_suction),
                (evaporator_fraction, separator_liquid),
            ],
        });

        Ok(Self {
            fluid,
            nodes,
            intermediate,
            evaporator_fraction,
            vapor_fraction,
            suction,
            intercooler_inlet,
            second_suction,
            discharge,
            liquid,
            separator_inlet,
            separator_liquid,
            evaporator_inlet,
        })
    }
}

cycle_via_nodes!(WithIncompleteIntercooling);

impl TwoStage for WithIncompleteIntercooling {
    fn intermediate_pressure(&self) -> Pressure {
        self.intermediate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{TemperatureInterval, ThermodynamicTemperature},
        pressure::pascal,
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

    fn cycle() -> WithIncompleteIntercooling {
        WithIncompleteIntercooling::new(
            &Idealized,
            Refrigerant::R410A,
            Evaporator::new(celsius(-10.0), TemperatureInterval::new::<kelvin>(5.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            HeatReleaser::Condenser(
                Condenser::new(celsius(45.0), TemperatureInterval::new::<kelvin>(0.0)).unwrap(),
            ),
        )
        .unwrap()
    }

    #[test]
    fn intermediate_pressure_is_the_geometric_mean() {
        let cycle = cycle();
        let low = cycle.suction.pressure.get::<pascal>();
        let high = cycle.discharge.pressure.get::<pascal>();
        assert_relative_eq!(
            cycle.intermediate_pressure().get::<pascal>(),
            (low * high).sqrt(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn fractions_complement_each_other() {
        let cycle = cycle();
        assert_relative_eq!(
            (cycle.evaporator_fraction + cycle.vapor_fraction).get::<ratio>(),
            1.0,
            max_relative = 1e-12
        );
        assert!(cycle.vapor_fraction.get::<ratio>() > 0.0);
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
    fn splitting_the_lift_beats_the_simple_cycle() {
        let two_stage = cycle();
        let simple = crate::cycles::Simple::new(
            &Idealized,
            Refrigerant::R410A,
            Evaporator::new(celsius(-10.0), TemperatureInterval::new::<kelvin>(5.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            HeatReleaser::Condenser(
                Condenser::new(celsius(45.0), TemperatureInterval::new::<kelvin>(0.0)).unwrap(),
            ),
        )
        .unwrap();
        assert!(two_stage.eer() > simple.eer());
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
                assert!(result.mixing_energy_loss_ratio.get::<ratio>() > 0.0);

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
}
