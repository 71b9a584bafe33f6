use uom::{
    ConstZero,
    si::{
        f64::{Pressure, Ratio, TemperatureInterval},
        ratio::ratio,
    },
};

use crate::{
    analysis::{AnalysisNodes, ExchangerNode, MixingNode, Stream},
    components::{Compressor, Economizer, Ejector, Evaporator, HeatReleaser},
    refrigerant::{PropertyModel, Refrigerant, StatePoint},
    support::units::TemperatureDifference,
};

use super::{
    CycleError, HasEconomizer, HasEjector, RefrigerationCycle, TwoStage, check_lift,
    cycle_via_nodes,
    ejector_flows::{self, EjectorFlows},
    flow_fraction, intermediate_pressure,
};

/// Two-stage economizer cycle driven by an ejector: the subcooled motive
/// stream entrains the evaporator outlet up to the separator pressure,
/// while the economizer vapor joins between the compression stages.
#[derive(Debug, Clone, PartialEq)]
pub struct WithEjectorAndEconomizer {
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
    /// Second-stage suction after mixing in the injection stream.
    pub second_suction: StatePoint,
    /// Second-stage discharge, entering the heat releaser.
    pub discharge: StatePoint,
    /// Liquid leaving the heat releaser.
    pub liquid: StatePoint,
    /// Throttled side stream entering the economizer cold side.
    pub economizer_cold_inlet: StatePoint,
    /// Vapor leaving the economizer cold side for injection.
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

impl WithEjectorAndEconomizer {
    /// Solves the cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the economizer cannot realize its
    /// approach, the ejector operating point cannot be found, the diffuser
    /// pressure falls outside the evaporating and intermediate pressures,
    /// or a state cannot be resolved.
    pub fn new(
        model: &impl PropertyModel,
        fluid: Refrigerant,
        evaporator: Evaporator,
        compressor: Compressor,
        heat_releaser: HeatReleaser,
        economizer: Economizer,
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

        let dew = model.dew_point_at_pressure(fluid, intermediate)?;
        let injection_outlet = if economizer.superheat() > TemperatureInterval::ZERO {
            dew.heating_to_temperature(model, dew.temperature.plus(economizer.superheat()))?
        } else {
            dew
        };

        let hot_outlet_temperature = economizer_cold_inlet
            .temperature
            .plus(economizer.temperature_difference());
        if hot_outlet_temperature >= liquid.temperature {
            return Err(CycleError::WrongTemperatureDifference {
                location: "economizer",
            });
        }
        let subcooled = liquid.cooling_to_temperature(model, hot_outlet_temperature)?;

        let subcooling_duty = liquid.enthalpy - subcooled.enthalpy;
        let injected = flow_fraction(
            subcooling_duty
                / ((injection_outlet.enthalpy - economizer_cold_inlet.enthalpy)
                    + subcooling_duty),
            "economizer balance",
        )?;
        let main = Ratio::new::<ratio>(1.0) - injected;

        let flows = ejector_flows::solve(model, &ejector, subcooled, evaporator_outlet)?;
        let separator_pressure = flows.diffuser_outlet.pressure;
        check_lift(evaporator_outlet.pressure, separator_pressure)?;
        check_lift(separator_pressure, intermediate)?;
        let evaporator_fraction = main * flows.entrainment_ratio();

        let suction = model.dew_point_at_pressure(fluid, separator_pressure)?;
        let separator_liquid = model.bubble_point_at_pressure(fluid, separator_pressure)?;

        let efficiency = compressor.isentropic_efficiency();
        let first_ideal = suction.isentropic_compression_to(model, intermediate)?;
        let first_discharge = suction.compression_to(model, intermediate, efficiency)?;

        let second_suction = StatePoint::mixing(
            model,
            main,
            &first_discharge,
            injected,
            &injection_outlet,
        )?;
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

cycle_via_nodes!(WithEjectorAndEconomizer);

impl TwoStage for WithEjectorAndEconomizer {
    fn intermediate_pressure(&self) -> Pressure {
        self.intermediate
    }
}

impl HasEconomizer for WithEjectorAndEconomizer {
    fn main_fraction(&self) -> Ratio {
        self.main
    }

    fn injection_fraction(&self) -> Ratio {
        self.injected
    }
}

impl HasEjector for WithEjectorAndEconomizer {
    fn ejector_flows(&self) -> &EjectorFlows {
        &self.flows
    }
}
