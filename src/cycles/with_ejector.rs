use uom::si::{f64::Ratio, ratio::ratio};

use crate::{
    analysis::{AnalysisNodes, MixingNode, Stream},
    components::{Compressor, Ejector, Evaporator, HeatReleaser},
    refrigerant::{PropertyModel, Refrigerant, StatePoint},
};

use super::{
    CycleError, HasEjector, RefrigerationCycle, check_lift, cycle_via_nodes,
    ejector_flows::{self, EjectorFlows},
};

/// Cycle where an ejector replaces the main expansion valve: the motive
/// stream from the heat releaser entrains the evaporator outlet and lifts
/// it to the separator pressure, so the compressor starts above the
/// evaporating pressure.
#[derive(Debug, Clone, PartialEq)]
pub struct WithEjector {
    fluid: Refrigerant,
    nodes: AnalysisNodes,
    flows: EjectorFlows,
    /// Share of the compressor flow drawn through the evaporator.
    pub evaporator_fraction: Ratio,
    /// Compressor suction: saturated vapor from the separator.
    pub suction: StatePoint,
    /// Compressor discharge, entering the heat releaser.
    pub discharge: StatePoint,
    /// Liquid leaving the heat releaser into the motive nozzle.
    pub liquid: StatePoint,
    /// Vapor leaving the evaporator into the suction nozzle.
    pub evaporator_outlet: StatePoint,
    /// Saturated liquid leaving the separator.
    pub separator_liquid: StatePoint,
    /// Two-phase state entering the evaporator.
    pub evaporator_inlet: StatePoint,
}

impl WithEjector {
    /// Solves the cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the ejector operating point cannot be
    /// found, the diffuser fails to lift above the evaporating pressure, or
    /// a state cannot be resolved.
    pub fn new(
        model: &impl PropertyModel,
        fluid: Refrigerant,
        evaporator: Evaporator,
        compressor: Compressor,
        heat_releaser: HeatReleaser,
        ejector: Ejector,
    ) -> Result<Self, CycleError> {
        let evaporator_outlet = evaporator.outlet(model, fluid)?;
        let high_pressure = heat_releaser.pressure(model, fluid)?;
        check_lift(evaporator_outlet.pressure, high_pressure)?;

        let liquid = heat_releaser.outlet(model, fluid)?;
        let flows = ejector_flows::solve(model, &ejector, liquid, evaporator_outlet)?;

        let separator_pressure = flows.diffuser_outlet.pressure;
        check_lift(evaporator_outlet.pressure, separator_pressure)?;

        // The diffuser outlet leaves the solver strictly inside the dome,
        // so the entrainment ratio is finite and positive.
        let evaporator_fraction = flows.entrainment_ratio();

        let suction = model.dew_point_at_pressure(fluid, separator_pressure)?;
        let separator_liquid = model.bubble_point_at_pressure(fluid, separator_pressure)?;

        let efficiency = compressor.isentropic_efficiency();
        let ideal = suction.isentropic_compression_to(model, high_pressure)?;
        let discharge = suction.compression_to(model, high_pressure, efficiency)?;

        let evaporator_inlet =
            separator_liquid.isenthalpic_expansion_to(model, evaporator_outlet.pressure)?;

        let mut nodes = AnalysisNodes::basic(
            ideal.enthalpy - suction.enthalpy,
            discharge.enthalpy - suction.enthalpy,
            Stream::part(evaporator_fraction, evaporator_inlet, evaporator_outlet),
            Stream::full(suction, discharge),
            Stream::full(discharge, liquid),
            heat_releaser.is_transcritical(),
            Stream::part(evaporator_fraction, separator_liquid, evaporator_inlet),
        );
        nodes.ejector = Some(MixingNode {
            inlets: vec![
                (Ratio::new::<ratio>(1.0), liquid),
                (evaporator_fraction, evaporator_outlet),
            ],
            outlets: vec![
                (Ratio::new::<ratio>(1.0), suction),
                (evaporator_fraction, separator_liquid),
            ],
        });

        Ok(Self {
            fluid,
            nodes,
            flows,
            evaporator_fraction,
            suction,
            discharge,
            liquid,
            evaporator_outlet,
            separator_liquid,
            evaporator_inlet,
        })
    }
}

cycle_via_nodes!(WithEjector);

impl HasEjector for WithEjector {
    fn ejector_flows(&self) -> &EjectorFlows {
        &self.flows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
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

    fn cycle() -> WithEjector {
        WithEjector::new(
            &Idealized,
            Refrigerant::R134a,
            Evaporator::new(celsius(5.0), TemperatureInterval::new::<kelvin>(5.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            HeatReleaser::Condenser(
                Condenser::new(celsius(45.0), TemperatureInterval::new::<kelvin>(0.0)).unwrap(),
            ),
            Ejector::new(
                Ratio::new::<percent>(85.0),
                Ratio::new::<percent>(85.0),
                Ratio::new::<percent>(75.0),
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn diffuser_lifts_the_compressor_suction() {
        let cycle = cycle();
        assert!(cycle.suction.pressure > cycle.evaporator_outlet.pressure);
        assert!(cycle.suction.pressure < cycle.discharge.pressure);
        assert!(cycle.ejector_flows().entrainment_ratio().get::<ratio>() > 0.0);
    }

    #[test]
    fn separator_splits_the_diffuser_outlet() {
        let cycle = cycle();
        let outlet = cycle.ejector_flows().diffuser_outlet;
        assert!(outlet.is_two_phase());
        assert_relative_eq!(
            cycle.evaporator_fraction.get::<ratio>(),
            cycle.ejector_flows().entrainment_ratio().get::<ratio>(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn energy_balance_closes() {
        let cycle = cycle();
        assert_relative_eq!(
            cycle.cop().get::<ratio>(),
            cycle.eer().get::<ratio>() + 1.0,
            max_relative = 1e-6
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
                    result.analysis_relative_error.get::<ratio>() < 1e-4,
                    "indoor {indoor}, outdoor {outdoor}"
                );
                assert!(result.ejector_energy_loss_ratio.get::<ratio>() > 0.0);

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
