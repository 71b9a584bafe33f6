use uom::si::{
    f64::{Pressure, Ratio},
    ratio::ratio,
};

use crate::{
    analysis::{AnalysisNodes, ExchangerNode, MixingNode, Stream},
    components::{Compressor, EconomizerTPI, Ejector, Evaporator, HeatReleaser},
    refrigerant::{PropertyModel, Refrigerant, StateInput, StatePoint},
    support::units::TemperatureDifference,
};

use super::{
    CycleError, HasEconomizer, HasEjector, RefrigerationCycle, TwoStage, check_lift,
    cycle_via_nodes,
    ejector_flows::{self, EjectorFlows},
    flow_fraction, intermediate_pressure,
};

/// Ejector cycle with a two-phase-injection economizer: the wet side stream
/// desuperheats the first-stage discharge onto the dew line at the
/// intermediate pressure, while the ejector lifts the evaporator loop to
/// the separator pressure.
#[derive(Debug, Clone, PartialEq)]
pub struct WithEjectorEconomizerTPI {
    fluid: Refrigerant,
    nodes: AnalysisNodes,
    flows: EjectorFlows,
    intermediate: Pressure,
    main: Ratio,
    injected: Ratio,
    /// Evaporator loop flow relative to the heat releaser flow.
    pub evaporator_fraction: Ratio,
    /// First-stage suction: saturated vapor from the separator.
    pub suction: StatePoint,
    /// First-stage discharge at the intermediate pressure.
    pub first_discharge: StatePoint,
    /// Second-stage suction: saturated vapor at the intermediate pressure.
    pub second_suction: StatePoint,
    /// Second-stage discharge, entering the heat releaser.
    pub discharge: StatePoint,
    /// Liquid leaving the heat releaser.
    pub liquid: StatePoint,
    /// Throttled side stream entering the economizer cold side.
    pub economizer_cold_inlet: StatePoint,
    /// Two-phase stream leaving the economizer cold side for injection.
    pub injection_outlet: StatePoint,
    /// Subcooled motive stream entering the ejector nozzle.
    pub subcooled: StatePoint,
    /// Vapor leaving the evaporator into the suction nozzle.
    pub evaporator_outlet: StatePoint,
    /// Saturated liquid leaving the separator.
    pub separator_liquid: StatePoint,
    /// Two-phase state entering the evaporator.
    pub evaporator_inlet: StatePoint,
}

impl WithEjectorEconomizerTPI {
    /// Solves the cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the economizer cannot realize its
    /// approach, the injection stream leaves it outside the dome, the
    /// ejector operating point cannot be found, or a state cannot be
    /// resolved.
    pub fn new(
        model: &impl PropertyModel,
        fluid: Refrigerant,
        evaporator: Evaporator,
        compressor: Compressor,
        heat_releaser: HeatReleaser,
        economizer: EconomizerTPI,
        ejector: Ejector,
    ) -> Result<Self, CycleError> {
        let evaporator_outlet = evaporator.outlet(model, fluid)?;
        let high_pressure = heat_releaser.pressure(model, fluid)?;
        check_lift(evaporator_outlet.pressure, high_pressure)?;
        let intermediate =
            intermediate_pressure(model, fluid, evaporator_outlet.pressure, high_pressure);
        check_lift(evaporator_outlet.pressure, intermediate)?;
        check_lift(intermediate, high_pressure)?;

        let liquid = heat_releaser.outlet(model, fluid)?;
        let economizer_cold_inlet = liquid.isenthalpic_expansion_to(model, intermediate)?;
        let second_suction = model.dew_point_at_pressure(fluid, intermediate)?;

        let hot_outlet_temperature = second_suction
            .temperature
            .plus(economizer.temperature_difference());
        if hot_outlet_temperature >= liquid.temperature {
            return Err(CycleError::WrongTemperatureDifference {
                location: "economizer",
            });
        }
        let subcooled = liquid.cooling_to_temperature(model, hot_outlet_temperature)?;

        let flows = ejector_flows::solve(model, &ejector, subcooled, evaporator_outlet)?;
        let separator_pressure = flows.diffuser_outlet.pressure;
        check_lift(evaporator_outlet.pressure, separator_pressure)?;
        check_lift(separator_pressure, intermediate)?;

        let suction = model.dew_point_at_pressure(fluid, separator_pressure)?;
        let separator_liquid = model.bubble_point_at_pressure(fluid, separator_pressure)?;

        let efficiency = compressor.isentropic_efficiency();
        let first_ideal = suction.isentropic_compression_to(model, intermediate)?;
        let first_discharge = suction.compression_to(model, intermediate, efficiency)?;

        // The throttled side stream enters at the liquid enthalpy, so the
        // combined mixing and economizer balances collapse to one ratio.
        let main = flow_fraction(
            (second_suction.enthalpy - liquid.enthalpy)
                / (first_discharge.enthalpy - subcooled.enthalpy),
            "economizer balance",
        )?;
        let injected = Ratio::new::<ratio>(1.0) - main;
        let evaporator_fraction = main * flows.entrainment_ratio();

        let injection_enthalpy =
            (second_suction.enthalpy - main * first_discharge.enthalpy) / injected;
        let injection_outlet = model.state(
            fluid,
            StateInput::PressureEnthalpy(intermediate, injection_enthalpy),
        )?;
        if !injection_outlet.is_two_phase() {
            return Err(CycleError::NotTwoPhase {
                location: "economizer injection stream",
            });
        }

        let second_ideal = second_suction.isentropic_compression_to(model, high_pressure)?;
        let discharge = second_suction.compression_to(model, high_pressure, efficiency)?;

        let evaporator_inlet =
            separator_liquid.isenthalpic_expansion_to(model, evaporator_outlet.pressure)?;

        let mut nodes = AnalysisNodes::basic(
            main * (first_ideal.enthalpy - suction.enthalpy)
                + (second_ideal.enthalpy - second_suction.enthalpy),
            main * (first_discharge.enthalpy - suction.enthalpy)
                + (discharge.enthalpy - second_suction.enthalpy),
            Stream::part(evaporator_fraction, evaporator_inlet, evaporator_outlet),
            Stream::part(main, suction, first_discharge),
            Stream::full(discharge, liquid),
            heat_releaser.is_transcritical(),
            Stream::part(injected, liquid, economizer_cold_inlet),
        );
        nodes
            .compressions
            .push(Stream::full(second_suction, discharge));
        nodes.expansion_valves.push(Stream::part(
            evaporator_fraction,
            separator_liquid,
            evaporator_inlet,
        ));
        nodes.economizer = Some(ExchangerNode {
            cold: Stream::part(injected, economizer_cold_inlet, injection_outlet),
            hot: Stream::part(main, liquid, subcooled),
        });
        nodes.ejector = Some(MixingNode {
            inlets: vec![
                (main, subcooled),
                (evaporator_fraction, evaporator_outlet),
            ],
            outlets: vec![
                (main, suction),
                (evaporator_fraction, separator_liquid),
            ],
        });
        nodes.mixing = Some(MixingNode {
            inlets: vec![(main, first_discharge), (injected, injection_outlet)],
            outlets: vec![(Ratio::new::<ratio>(1.0), second_suction)],
        });

        Ok(Self {
            fluid,
            nodes,
            flows,
            intermediate,
            main,
            injected,
            evaporator_fraction,
            suction,
            first_discharge,
            second_suction,
            discharge,
            liquid,
            economizer_cold_inlet,
            injection_outlet,
            subcooled,
            evaporator_outlet,
            separator_liquid,
            evaporator_inlet,
        })
    }
}

cycle_via_nodes!(WithEjectorEconomizerTPI);

impl TwoStage for WithEjectorEconomizerTPI {
    fn intermediate_pressure(&self) -> Pressure {
        self.intermediate
    }
}

impl HasEconomizer for WithEjectorEconomizerTPI {
    fn main_fraction(&self) -> Ratio {
        self.main
    }

    fn injection_fraction(&self) -> Ratio {
        self.injected
    }
}

impl HasEjector for WithEjectorEconomizerTPI {
    fn ejector_flows(&self) -> &EjectorFlows {
        &self.flows
    }
}
