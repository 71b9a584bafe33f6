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

/// Two-stage cycle with complete intercooling: the first-stage discharge
/// bubbles through the intermediate-pressure separator, so the second stage
/// ingests saturated vapor. The evaporator flow share follows from the
/// separator's energy balance.
#[derive(Debug, Clone, PartialEq)]
pub struct WithCompleteIntercooling {
    fluid: Refrigerant,
    nodes: AnalysisNodes,
    intermediate: Pressure,
    /// Share of the flow that passes through the evaporator.
    pub evaporator_fraction: Ratio,
    /// First-stage suction, leaving the evaporator.
    pub suction: StatePoint,
    /// First-stage discharge into the separator.
    pub intercooler_inlet: StatePoint,
    /// Saturated vapor leaving the separator into the second stage.
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

impl WithCompleteIntercooling {
    /// Solves the cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the pressures are not ordered, the
    /// separator balance has no physical flow split, or a state cannot be
    /// resolved.
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

        let second_suction = model.dew_point_at_pressure(fluid, intermediate)?;
        let separator_liquid = model.bubble_point_at_pressure(fluid, intermediate)?;

        // Separator energy balance: the first-stage discharge desuperheats
        // against the flash pool, boiling off the second-stage suction.
        let evaporator_fraction = flow_fraction(
            (second_suction.enthalpy - separator_inlet.enthalpy)
                / (intercooler_inlet.enthalpy - separator_liquid.enthalpy),
            "separator balance",
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
        nodes.expansion_valves.push(Stream::part(
            evaporator_fraction,
            separator_liquid,
            evaporator_inlet,
        ));
        nodes.mixing = Some(MixingNode {
            inlets: vec![
                (Ratio::new::<ratio>(1.0), separator_inlet),
                (evaporator_fraction, intercooler_inlet),
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

cycle_via_nodes!(WithCompleteIntercooling);

impl TwoStage for WithCompleteIntercooling {
    fn intermediate_pressure(&self) -> Pressure {
        self.intermediate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        available_energy::joule_per_kilogram,
        f64::{TemperatureInterval, ThermodynamicTemperature},
        ratio::percent,
        temperature_interval::kelvin,
        thermodynamic_temperature::degree_celsius,
    };

    use crate::{
        analysis::EntropyAnalysis, components::Condenser, refrigerant::model::Idealized,
    };

    fn celsius(t: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(t)
    }

    fn cycle() -> WithCompleteIntercooling {
        WithCompleteIntercooling::new(
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
    fn separator_balance_closes() {
        let cycle = cycle();
        let f = cycle.evaporator_fraction;

        let inflow = cycle.separator_inlet.enthalpy + f * cycle.intercooler_inlet.enthalpy;
        let outflow = cycle.second_suction.enthalpy + f * cycle.separator_liquid.enthalpy;
        assert_relative_eq!(
            inflow.get::<joule_per_kilogram>(),
            outflow.get::<joule_per_kilogram>(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn second_stage_ingests_saturated_vapor() {
        let cycle = cycle();
        assert_relative_eq!(cycle.second_suction.quality.unwrap().value, 1.0);
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
