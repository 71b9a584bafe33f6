use uom::{
    ConstZero,
    si::{
        f64::{Pressure, Ratio, TemperatureInterval},
        ratio::ratio,
    },
};

use crate::{
    analysis::{AnalysisNodes, ExchangerNode, MixingNode, Stream},
    components::{Compressor, Economizer, Evaporator, HeatReleaser},
    refrigerant::{PropertyModel, Refrigerant, StatePoint},
    support::units::TemperatureDifference,
};

use super::{
    CycleError, HasEconomizer, RefrigerationCycle, TwoStage, check_lift, cycle_via_nodes,
    flow_fraction, intermediate_pressure,
};

/// Cycle combining an economizer with parallel compression: the vapor the
/// economizer generates at the intermediate pressure is lifted by its own
/// compressor directly to the heat rejection pressure, while the main
/// stream is compressed in a single stage from the evaporator.
#[derive(Debug, Clone, PartialEq)]
pub struct WithEconomizerAndParallelCompression {
    fluid: Refrigerant,
    nodes: AnalysisNodes,
    intermediate: Pressure,
    main: Ratio,
    injected: Ratio,
    /// Main compressor suction, leaving the evaporator.
    pub suction: StatePoint,
    /// Main compressor discharge.
    pub main_discharge: StatePoint,
    /// Vapor leaving the economizer into the parallel compressor.
    pub parallel_suction: StatePoint,
    /// Parallel compressor discharge.
    pub parallel_discharge: StatePoint,
    /// Merged stream entering the heat releaser.
    pub releaser_inlet: StatePoint,
    /// Liquid leaving the heat releaser.
    pub liquid: StatePoint,
    /// Throttled side stream entering the economizer cold side.
    pub economizer_cold_inlet: StatePoint,
    /// Subcooled main liquid leaving the economizer hot side.
    pub subcooled: StatePoint,
    /// Two-phase state entering the evaporator.
    pub evaporator_inlet: StatePoint,
}

impl WithEconomizerAndParallelCompression {
    /// Solves the cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the economizer cannot realize its
    /// approach, the flow split is unphysical, or a state cannot be
    /// resolved.
    pub fn new(
        model: &impl PropertyModel,
        fluid: Refrigerant,
        evaporator: Evaporator,
        compressor: Compressor,
        heat_releaser: HeatReleaser,
        economizer: Economizer,
    ) -> Result<Self, CycleError> {
        let suction = evaporator.outlet(model, fluid)?;
        let high_pressure = heat_releaser.pressure(model, fluid)?;
        check_lift(suction.pressure, high_pressure)?;
        let intermediate = intermediate_pressure(model, fluid, suction.pressure, high_pressure);
        check_lift(suction.pressure, intermediate)?;
        check_lift(intermediate, high_pressure)?;

        let efficiency = compressor.isentropic_efficiency();
        let main_ideal = suction.isentropic_compression_to(model, high_pressure)?;
        let main_discharge = suction.compression_to(model, high_pressure, efficiency)?;

        let liquid = heat_releaser.outlet(model, fluid)?;
        let economizer_cold_inlet = liquid.isenthalpic_expansion_to(model, intermediate)?;

        let dew = model.dew_point_at_pressure(fluid, intermediate)?;
        let parallel_suction = if economizer.superheat() > TemperatureInterval::ZERO {
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
                / ((parallel_suction.enthalpy - economizer_cold_inlet.enthalpy)
                    + subcooling_duty),
            "economizer balance",
        )?;
        let main = Ratio::new::<ratio>(1.0) - injected;

        let parallel_ideal = parallel_suction.isentropic_compression_to(model, high_pressure)?;
        let parallel_discharge =
            parallel_suction.compression_to(model, high_pressure, efficiency)?;

        let releaser_inlet = StatePoint::mixing(
            model,
            main,
            &main_discharge,
            injected,
            &parallel_discharge,
        )?;

        let evaporator_inlet = subcooled.isenthalpic_expansion_to(model, suction.pressure)?;

        let mut nodes = AnalysisNodes::basic(
            main * (main_ideal.enthalpy - suction.enthalpy)
                + injected * (parallel_ideal.enthalpy - parallel_suction.enthalpy),
            main * (main_discharge.enthalpy - suction.enthalpy)
                + injected * (parallel_discharge.enthalpy - parallel_suction.enthalpy),
            Stream::part(main, evaporator_inlet, suction),
            Stream::part(main, suction, main_discharge),
            Stream::full(releaser_inlet, liquid),
            heat_releaser.is_transcritical(),
            Stream::part(injected, liquid, economizer_cold_inlet),
        );
        nodes.compressions.push(Stream::part(
            injected,
            parallel_suction,
            parallel_discharge,
        ));
        nodes
            .expansion_valves
            .push(Stream::part(main, subcooled, evaporator_inlet));
        nodes.economizer = Some(ExchangerNode {
            cold: Stream::part(injected, economizer_cold_inlet, parallel_suction),
            hot: Stream::part(main, liquid, subcooled),
        });
        nodes.mixing = Some(MixingNode {
            inlets: vec![(main, main_discharge), (injected, parallel_discharge)],
            outlets: vec![(Ratio::new::<ratio>(1.0), releaser_inlet)],
        });

        Ok(Self {
            fluid,
            nodes,
            intermediate,
            main,
            injected,
            suction,
            main_discharge,
            parallel_suction,
            parallel_discharge,
            releaser_inlet,
            liquid,
            economizer_cold_inlet,
            subcooled,
            evaporator_inlet,
        })
    }
}

cycle_via_nodes!(WithEconomizerAndParallelCompression);

impl TwoStage for WithEconomizerAndParallelCompression {
    fn intermediate_pressure(&self) -> Pressure {
        self.intermediate
    }
}

impl HasEconomizer for WithEconomizerAndParallelCompression {
    fn main_fraction(&self) -> Ratio {
        self.main
    }

    fn injection_fraction(&self) -> Ratio {
        self.injected
    }
}
