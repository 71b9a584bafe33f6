use uom::si::{
    f64::{Pressure, Ratio},
    ratio::ratio,
};

use crate::{
    analysis::{AnalysisNodes, ExchangerNode, MixingNode, Stream},
    components::{Compressor, EconomizerTPI, Evaporator, HeatReleaser},
    refrigerant::{PropertyModel, Refrigerant, StateInput, StatePoint},
    support::units::TemperatureDifference,
};

use super::{
    CycleError, HasEconomizer, RefrigerationCycle, TwoStage, check_lift, cycle_via_nodes,
    flow_fraction, intermediate_pressure,
};

/// Two-stage economizer cycle with two-phase injection: the side stream
/// leaves the economizer still wet, sized so that mixing it into the
/// first-stage discharge lands exactly on the dew line at the intermediate
/// pressure.
#[derive(Debug, Clone, PartialEq)]
pub struct WithEconomizerTPI {
    fluid: Refrigerant,
    nodes: AnalysisNodes,
    intermediate: Pressure,
    main: Ratio,
    injected: Ratio,
    /// First-stage suction, leaving the evaporator.
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
    /// Subcooled main liquid leaving the economizer hot side.
    pub subcooled: StatePoint,
    /// Two-phase state entering the evaporator.
    pub evaporator_inlet: StatePoint,
}

impl WithEconomizerTPI {
    /// Solves the cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the economizer cannot realize its
    /// approach, the injection stream leaves it outside the dome, the flow
    /// split is unphysical, or a state cannot be resolved.
    pub fn new(
        model: &impl PropertyModel,
        fluid: Refrigerant,
        evaporator: Evaporator,
        compressor: Compressor,
        heat_releaser: HeatReleaser,
        economizer: EconomizerTPI,
    ) -> Result<Self, CycleError> {
        let suction = evaporator.outlet(model, fluid)?;
        let high_pressure = heat_releaser.pressure(model, fluid)?;
        check_lift(suction.pressure, high_pressure)?;
        let intermediate = intermediate_pressure(model, fluid, suction.pressure, high_pressure);
        check_lift(suction.pressure, intermediate)?;
        check_lift(intermediate, high_pressure)?;

        let efficiency = compressor.isentropic_efficiency();
        let first_ideal = suction.isentropic_compression_to(model, intermediate)?;
        let first_discharge = suction.compression_to(model, intermediate, efficiency)?;

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

        // The mixing and economizer balances together pin the flow split:
        // what the side stream absorbs must desuperheat the first-stage
        // discharge down to the dew line.
        let main = flow_fraction(
            (second_suction.enthalpy - economizer_cold_inlet.enthalpy)
                / ((first_discharge.enthalpy - economizer_cold_inlet.enthalpy)
                    + (liquid.enthalpy - subcooled.enthalpy)),
            "economizer balance",
        )?;
        let injected = Ratio::new::<ratio>(1.0) - main;

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

        let evaporator_inlet = subcooled.isenthalpic_expansion_to(model, suction.pressure)?;

        let mut nodes = AnalysisNodes::basic(
            main * (first_ideal.enthalpy - suction.enthalpy)
                + (second_ideal.enthalpy - second_suction.enthalpy),
            main * (first_discharge.enthalpy - suction.enthalpy)
                + (discharge.enthalpy - second_suction.enthalpy),
            Stream::part(main, evaporator_inlet, suction),
            Stream::part(main, suction, first_discharge),
            Stream::full(discharge, liquid),
            heat_releaser.is_transcritical(),
            Stream::part(injected, liquid, economizer_cold_inlet),
        );
        nodes
            .compressions
            .push(Stream::full(second_suction, discharge));
        nodes
            .expansion_valves
            .push(Stream::part(main, subcooled, evaporator_inlet));
        nodes.economizer = Some(ExchangerNode {
            cold: Stream::part(injected, economizer_cold_inlet, injection_outlet),
            hot: Stream::part(main, liquid, subcooled),
        });
        nodes.mixing = Some(MixingNode {
            inlets: vec![(main, first_discharge), (injected, injection_outlet)],
            outlets: vec![(Ratio::new::<ratio>(1.0), second_suction)],
        });

        Ok(Self {
            fluid,
            nodes,
            intermediate,
            main,
            injected,
            suction,
            first_discharge,
            second_suction,
            discharge,
            liquid,
            economizer_cold_inlet,
            injection_outlet,
            subcooled,
            evaporator_inlet,
        })
    }
}

cycle_via_nodes!(WithEconomizerTPI);

impl TwoStage for WithEconomizerTPI {
    fn intermediate_pressure(&self) -> Pressure {
        self.intermediate
    }
}

impl HasEconomizer for WithEconomizerTPI {
    fn main_fraction(&self) -> Ratio {
        self.main
    }

    fn injection_fraction(&self) -> Ratio {
        self.injected
    }
}
