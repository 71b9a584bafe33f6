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

/// Cycle with parallel compression: flash vapor separated at the
/// intermediate pressure is compressed by its own compressor directly to
/// the heat rejection pressure instead of being throttled back down.
#[derive(Debug, Clone, PartialEq)]
pub struct WithParallelCompression {
    fluid: Refrigerant,
    nodes: AnalysisNodes,
    intermediate: Pressure,
    /// Share of the flow that passes through the evaporator.
    pub evaporator_fraction: Ratio,
    /// Flash vapor share handled by the parallel compressor.
    pub vapor_fraction: Ratio,
    /// Main compressor suction, leaving the evaporator.
    pub suction: StatePoint,
    /// Main compressor discharge.
    pub main_discharge: StatePoint,
    /// Parallel compressor suction: saturated vapor at the intermediate
    /// pressure.
    pub parallel_suction: StatePoint,
    /// Parallel compressor discharge.
    pub parallel_discharge: StatePoint,
    /// Merged stream entering the heat releaser.
    pub releaser_inlet: StatePoint,
    /// Liquid leaving the heat releaser.
    pub liquid: StatePoint,
    /// Two-phase state entering the separator.
    pub separator_inlet: StatePoint,
    /// Saturated liquid leaving the separator.
    pub separator_liquid: StatePoint,
    /// Two-phase state entering the evaporator.
    pub evaporator_inlet: StatePoint,
}

impl WithParallelCompression {
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

        let main_ideal = suction.isentropic_compression_to(model, high_pressure)?;
        let main_discharge = suction.compression_to(model, high_pressure, efficiency)?;

        let parallel_suction = model.dew_point_at_pressure(fluid, intermediate)?;
        let parallel_ideal = parallel_suction.isentropic_compression_to(model, high_pressure)?;
        let parallel_discharge =
            parallel_suction.compression_to(model, high_pressure, efficiency)?;

        let releaser_inlet = StatePoint::mixing(
            model,
            evaporator_fraction,
            &main_discharge,
            vapor_fraction,
            &parallel_discharge,
        )?;

        let separator_liquid = model.bubble_point_at_pressure(fluid, intermediate)?;
        let evaporator_inlet =
            separator_liquid.isenthalpic_expansion_to(model, suction.pressure)?;

        let mut nodes = AnalysisNodes::basic(
            evaporator_fraction * (main_ideal.enthalpy - suction.enthalpy)
                + vapor_fraction * (parallel_ideal.enthalpy - parallel_suction.enthalpy),
            evaporator_fraction * (main_discharge.enthalpy - suction.enthalpy)
                + vapor_fraction * (parallel_discharge.enthalpy - parallel_suction.enthalpy),
            Stream::part(evaporator_fraction, evaporator_inlet, suction),
            Stream::part(evaporator_fraction, suction, main_discharge),
            Stream::full(releaser_inlet, liquid),
            heat_releaser.is_transcritical(),
            Stream::full(liquid, separator_inlet),
        );
        nodes.compressions.push(Stream::part(
            vapor_fraction,
            parallel_suction,
            parallel_discharge,
        ));
        nodes.expansion_valves.push(Stream::part(
            evaporator_fraction,
            separator_liquid,
            evaporator_inlet,
        ));
        nodes.mixing = Some(MixingNode {
            inlets: vec![
                (Ratio::new::<ratio>(1.0), separator_inlet),
                (evaporator_fraction, main_discharge),
                (vapor_fraction, parallel_discharge),
            ],
            outlets: vec![
                (vapor_fraction, parallel_suction),
                (evaporator_fraction, separator_liquid),
                (Ratio::new::<ratio>(1.0), releaser_inlet),
            ],
        });

        Ok(Self {
            fluid,
            nodes,
            intermediate,
            evaporator_fraction,
            vapor_fraction,
            suction,
            main_discharge,
            parallel_suction,
            parallel_discharge,
            releaser_inlet,
            liquid,
            separator_inlet,
            separator_liquid,
            evaporator_inlet,
        })
    }
}

cycle_via_nodes!(WithParallelCompression);

impl TwoStage for WithParallelCompression {
    fn intermediate_pressure(&self) -> Pressure {
        self.intermediate
    }
}
