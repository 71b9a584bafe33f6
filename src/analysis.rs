//! Entropy-based irreversibility analysis.
//!
//! Implements the Gouy–Stodola decomposition of a cycle's specific work: the
//! minimal (Carnot) work to move the cooling load between the two source
//! temperatures, plus one entropy-generation loss term per component group.
//! Summing the minimal work and every loss reconstructs the actual specific
//! work; the residual between the two is reported as the analysis relative
//! error and is a direct check that a cycle wired its [`AnalysisNodes`]
//! completely.
//!
//! Every cycle implements [`EntropyAnalysis`] by exposing its flow topology
//! as [`AnalysisNodes`]; the provided [`EntropyAnalysis::entropy_analysis`]
//! does the rest.

mod nodes;
mod result;

pub use nodes::{AnalysisNodes, ExchangerNode, MixingNode, Stream};
pub use result::{EntropyAnalysisResult, average};

use thiserror::Error;
use uom::{
    ConstZero,
    si::f64::{Ratio, ThermodynamicTemperature},
};

use crate::{
    cycles::RefrigerationCycle,
    support::units::{SpecificEnthalpy, SpecificEntropy, TemperatureDifference},
};

/// Errors from an entropy analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// The two source temperatures coincide, so no work is thermodynamically
    /// required and no decomposition exists.
    #[error("indoor and outdoor temperatures must differ")]
    EqualSourceTemperatures,

    /// Heat cannot flow from the cold source into a warmer evaporator.
    #[error("the cold source must be warmer than the refrigerant leaving the evaporator")]
    ColdSourceTooCold,

    /// Heat cannot flow from the heat releaser into a warmer sink.
    #[error("the hot sink must be colder than the refrigerant leaving the heat releaser")]
    HotSinkTooHot,

    /// Batch inputs must pair one temperature point with each cycle.
    #[error("cycles and temperature lists must have equal lengths")]
    LengthMismatch,

    /// Averaging needs at least one analysis.
    #[error("cannot average an empty list of analyses")]
    Empty,
}

/// A cycle whose irreversibilities can be decomposed by component.
pub trait EntropyAnalysis: RefrigerationCycle {
    /// The cycle's flow topology, with every stream that generates entropy.
    fn analysis_nodes(&self) -> AnalysisNodes;

    /// Decomposes the cycle's specific work between the given source
    /// temperatures.
    ///
    /// `indoor` is the cooled space and `outdoor` the environment the heat
    /// is rejected to; whichever is warmer acts as the reference sink.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] if the temperatures are equal or
    /// incompatible with the cycle's own temperatures.
    fn entropy_analysis(
        &self,
        indoor: ThermodynamicTemperature,
        outdoor: ThermodynamicTemperature,
    ) -> Result<EntropyAnalysisResult, AnalysisError> {
        analyze(&self.analysis_nodes(), indoor, outdoor)
    }
}

/// Runs one analysis per cycle at its paired temperature point and averages
/// the results, for rating a design over a climate profile.
///
/// # Errors
///
/// Returns [`AnalysisError::LengthMismatch`] unless all three slices have
/// equal lengths, or the first error any single analysis produces.
pub fn entropy_analysis_in<C: EntropyAnalysis>(
    cycles: &[C],
    indoor: &[ThermodynamicTemperature],
    outdoor: &[ThermodynamicTemperature],
) -> Result<EntropyAnalysisResult, AnalysisError> {
    if cycles.len() != indoor.len() || cycles.len() != outdoor.len() {
        return Err(AnalysisError::LengthMismatch);
    }
    let results = cycles
        .iter()
        .zip(indoor.iter().zip(outdoor))
        .map(|(cycle, (&indoor, &outdoor))| cycle.entropy_analysis(indoor, outdoor))
        .collect::<Result<Vec<_>, _>>()?;
    average(&results)
}

fn analyze(
    nodes: &AnalysisNodes,
    indoor: ThermodynamicTemperature,
    outdoor: ThermodynamicTemperature,
) -> Result<EntropyAnalysisResult, AnalysisError> {
    if indoor == outdoor {
        return Err(AnalysisError::EqualSourceTemperatures);
    }
    let hot = indoor.max(outdoor).above_zero();
    let cold = indoor.min(outdoor).above_zero();

    if cold <= nodes.evaporator.outlet.temperature.above_zero() {
        return Err(AnalysisError::ColdSourceTooCold);
    }
    if hot >= nodes.heat_releaser.outlet.temperature.above_zero() {
        return Err(AnalysisError::HotSinkTooHot);
    }

    let cooling = nodes.evaporator.enthalpy_rise();
    let minimal_work = cooling * ((hot - cold) / cold);

    let compressor = entropy_rise(&nodes.compressions) * hot;
    // Heat rejected above the sink temperature: Δh released minus the part
    // a reversible engine at the sink could have recovered.
    let heat_releaser =
        -nodes.heat_releaser.enthalpy_rise() + nodes.heat_releaser.entropy_rise() * hot;
    let expansion_valves = entropy_rise(&nodes.expansion_valves) * hot;
    let evaporator = (nodes.evaporator.entropy_rise() - cooling / cold) * hot;
    let ejector = mixing_entropy(nodes.ejector.as_ref()) * hot;
    let mixing = mixing_entropy(nodes.mixing.as_ref()) * hot;
    let recuperator = exchanger_entropy(nodes.recuperator.as_ref()) * hot;
    let economizer = exchanger_entropy(nodes.economizer.as_ref()) * hot;

    let (condenser, gas_cooler) = if nodes.transcritical {
        (SpecificEnthalpy::ZERO, heat_releaser)
    } else {
        (heat_releaser, SpecificEnthalpy::ZERO)
    };

    let calculated = minimal_work
        + compressor
        + condenser
        + gas_cooler
        + expansion_valves
        + evaporator
        + ejector
        + mixing
        + recuperator
        + economizer;

    let ratio = |loss: SpecificEnthalpy| -> Ratio { loss / calculated };

    Ok(EntropyAnalysisResult {
        thermodynamic_perfection: minimal_work / nodes.specific_work,
        min_specific_work_ratio: ratio(minimal_work),
        compressor_energy_loss_ratio: ratio(compressor),
        condenser_energy_loss_ratio: ratio(condenser),
        gas_cooler_energy_loss_ratio: ratio(gas_cooler),
        expansion_valves_energy_loss_ratio: ratio(expansion_valves),
        ejector_energy_loss_ratio: ratio(ejector),
        evaporator_energy_loss_ratio: ratio(evaporator),
        recuperator_energy_loss_ratio: ratio(recuperator),
        economizer_energy_loss_ratio: ratio(economizer),
        mixing_energy_loss_ratio: ratio(mixing),
        analysis_relative_error: ((calculated - nodes.specific_work) / nodes.specific_work).abs(),
    })
}

fn entropy_rise(streams: &[Stream]) -> SpecificEntropy {
    streams.iter().map(Stream::entropy_rise).sum()
}

fn mixing_entropy(node: Option<&MixingNode>) -> SpecificEntropy {
    node.map_or(SpecificEntropy::ZERO, MixingNode::entropy_generation)
}

fn exchanger_entropy(node: Option<&ExchangerNode>) -> SpecificEntropy {
    node.map_or(SpecificEntropy::ZERO, |n| {
        n.cold.entropy_rise() + n.hot.entropy_rise()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::TemperatureInterval,
        ratio::{percent, ratio},
        temperature_interval::kelvin,
        thermodynamic_temperature::degree_celsius,
    };

    use crate::{
        components::{Compressor, Condenser, Evaporator, HeatReleaser},
        cycles::Simple,
        refrigerant::{Refrigerant, model::Idealized},
    };

    fn celsius(t: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(t)
    }

    // Evaporator outlet at 13 °C, condenser liquid at 42 °C.
    fn cycle() -> Simple {
        Simple::new(
            &Idealized,
            Refrigerant::R407C,
            Evaporator::new(celsius(5.0), TemperatureInterval::new::<kelvin>(8.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(80.0)).unwrap(),
            HeatReleaser::Condenser(
                Condenser::new(celsius(45.0), TemperatureInterval::new::<kelvin>(3.0)).unwrap(),
            ),
        )
        .unwrap()
    }

    #[test]
    fn rejects_equal_source_temperatures() {
        assert!(matches!(
            cycle().entropy_analysis(celsius(25.0), celsius(25.0)),
            Err(AnalysisError::EqualSourceTemperatures)
        ));
    }

    #[test]
    fn rejects_a_cold_source_below_the_evaporator_outlet() {
        assert!(matches!(
            cycle().entropy_analysis(celsius(10.0), celsius(35.0)),
            Err(AnalysisError::ColdSourceTooCold)
        ));
    }

    #[test]
    fn rejects_a_hot_sink_above_the_heat_releaser_outlet() {
        assert!(matches!(
            cycle().entropy_analysis(celsius(20.0), celsius(43.0)),
            Err(AnalysisError::HotSinkTooHot)
        ));
    }

    #[test]
    fn batch_analysis_requires_matching_lengths() {
        let cycles = [cycle()];
        assert!(matches!(
            entropy_analysis_in(&cycles, &[celsius(20.0), celsius(22.0)], &[celsius(35.0)]),
            Err(AnalysisError::LengthMismatch)
        ));
        assert!(matches!(
            entropy_analysis_in(&cycles, &[celsius(20.0)], &[]),
            Err(AnalysisError::LengthMismatch)
        ));
    }

    #[test]
    fn batch_analysis_averages_over_the_profile() {
        let cycles = [cycle(), cycle()];
        let indoor = [celsius(20.0), celsius(24.0)];
        let outdoor = [celsius(30.0), celsius(40.0)];

        let averaged = entropy_analysis_in(&cycles, &indoor, &outdoor).unwrap();
        let first = cycles[0].entropy_analysis(indoor[0], outdoor[0]).unwrap();
        let second = cycles[1].entropy_analysis(indoor[1], outdoor[1]).unwrap();

        assert_relative_eq!(
            averaged.thermodynamic_perfection.get::<ratio>(),
            0.5 * (first.thermodynamic_perfection + second.thermodynamic_perfection)
                .get::<ratio>(),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            averaged.compressor_energy_loss_ratio.get::<ratio>(),
            0.5 * (first.compressor_energy_loss_ratio + second.compressor_energy_loss_ratio)
                .get::<ratio>(),
            max_relative = 1e-12
        );
        assert!(averaged.analysis_relative_error.get::<ratio>() < 1e-9);
    }
}
