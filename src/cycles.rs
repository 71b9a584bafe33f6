//! Refrigeration cycle topologies.
//!
//! Each cycle is a value type whose constructor solves every state point of
//! the topology against a [`PropertyModel`] up front; a constructed cycle is
//! fully determined and all queries on it are cheap field reads. Specific
//! quantities are normalized to a unit mass flow through the heat releaser,
//! so mass-flow fractions of auxiliary streams are plain ratios.
//!
//! The topologies range from the four-point [`Simple`] cycle to the
//! triple-exchanger [`MitsubishiZubadan`] cycle, which nests a quality
//! solver inside a feasibility search over its recuperator pressure. All of
//! them implement [`RefrigerationCycle`] for performance metrics and
//! [`EntropyAnalysis`](crate::analysis::EntropyAnalysis) for loss
//! decomposition.

pub mod ejector_flows;

mod error;

pub use error::CycleError;

use uom::si::f64::{Pressure, Ratio};

use crate::{
    refrigerant::{PropertyModel, Refrigerant},
    support::{
        constraint::UnitIntervalOpen,
        units::SpecificEnthalpy,
    },
};

/// Performance metrics common to every cycle.
pub trait RefrigerationCycle {
    /// The working fluid the cycle was solved for.
    fn refrigerant(&self) -> Refrigerant;

    /// Heat absorbed in the evaporator per unit heat releaser mass flow.
    fn specific_cooling_capacity(&self) -> SpecificEnthalpy;

    /// Heat rejected by the condenser or gas cooler per unit mass flow.
    fn specific_heating_capacity(&self) -> SpecificEnthalpy;

    /// Compression work if every stage were isentropic.
    fn isentropic_specific_work(&self) -> SpecificEnthalpy;

    /// Actual compression work per unit heat releaser mass flow.
    fn specific_work(&self) -> SpecificEnthalpy;

    /// Energy efficiency ratio: cooling capacity over work.
    fn eer(&self) -> Ratio {
        self.specific_cooling_capacity() / self.specific_work()
    }

    /// Coefficient of performance for heating: heat rejected over work.
    fn cop(&self) -> Ratio {
        self.specific_heating_capacity() / self.specific_work()
    }
}

/// Cycles that compress in two stages through an intermediate pressure.
pub trait TwoStage: RefrigerationCycle {
    fn intermediate_pressure(&self) -> Pressure;
}

/// Cycles that split off an injection stream through an economizer.
pub trait HasEconomizer: RefrigerationCycle {
    /// Fraction of the heat releaser flow that reaches the evaporator side.
    fn main_fraction(&self) -> Ratio;

    /// Fraction split off for injection; complements the main fraction.
    fn injection_fraction(&self) -> Ratio;
}

/// Cycles with a suction-line heat exchanger.
pub trait HasRecuperator: RefrigerationCycle {
    /// Heat moved across the recuperator per unit heat releaser mass flow.
    fn recuperator_heat(&self) -> SpecificEnthalpy;
}

/// Cycles whose expansion work is recovered by an ejector.
pub trait HasEjector: RefrigerationCycle {
    fn ejector_flows(&self) -> &ejector_flows::EjectorFlows;
}

/// Implements the metric and analysis traits for a cycle that stores its
/// solved topology in a `nodes: AnalysisNodes` field.
macro_rules! cycle_via_nodes {
    ($cycle:ty) => {
        impl $crate::cycles::RefrigerationCycle for $cycle {
            fn refrigerant(&self) -> $crate::refrigerant::Refrigerant {
                self.fluid
            }

            fn specific_cooling_capacity(&self) -> $crate::support::units::SpecificEnthalpy {
                self.nodes.evaporator.enthalpy_rise()
            }

            fn specific_heating_capacity(&self) -> $crate::support::units::SpecificEnthalpy {
                -self.nodes.heat_releaser.enthalpy_rise()
            }

            fn isentropic_specific_work(&self) -> $crate::support::units::SpecificEnthalpy {
                self.nodes.isentropic_specific_work
            }

            fn specific_work(&self) -> $crate::support::units::SpecificEnthalpy {
                self.nodes.specific_work
            }
        }

        impl $crate::analysis::EntropyAnalysis for $cycle {
            fn analysis_nodes(&self) -> $crate::analysis::AnalysisNodes {
                self.nodes.clone()
            }
        }
    };
}

pub(crate) use cycle_via_nodes;

mod simple;
mod with_complete_intercooling;
mod with_economizer;
mod with_economizer_and_parallel_compression;
mod with_economizer_tpi;
mod with_ejector;
mod with_ejector_and_economizer;
mod with_ejector_economizer_tpi;
mod with_incomplete_intercooling;
mod with_parallel_compression;
mod with_recuperator;
mod zubadan;

pub use simple::Simple;
pub use with_complete_intercooling::WithCompleteIntercooling;
pub use with_economizer::WithEconomizer;
pub use with_economizer_and_parallel_compression::WithEconomizerAndParallelCompression;
pub use with_economizer_tpi::WithEconomizerTPI;
pub use with_ejector::WithEjector;
pub use with_ejector_and_economizer::WithEjectorAndEconomizer;
pub use with_ejector_economizer_tpi::WithEjectorEconomizerTPI;
pub use with_incomplete_intercooling::WithIncompleteIntercooling;
pub use with_parallel_compression::WithParallelCompression;
pub use with_recuperator::WithRecuperator;
pub use zubadan::MitsubishiZubadan;

/// Geometric mean of the suction and discharge pressures, clipped below the
/// critical pressure so the intermediate state stays subcritical.
pub(crate) fn intermediate_pressure(
    model: &impl PropertyModel,
    fluid: Refrigerant,
    low: Pressure,
    high: Pressure,
) -> Pressure {
    let geometric = (low * high).sqrt();
    geometric.min(0.9 * model.critical_pressure(fluid))
}

/// The suction pressure must lie below the heat rejection pressure.
pub(crate) fn check_lift(low: Pressure, high: Pressure) -> Result<(), CycleError> {
    if low < high {
        Ok(())
    } else {
        Err(CycleError::PressureOrder)
    }
}

/// Validates a solved mass-flow fraction, which is only physical strictly
/// inside (0, 1).
pub(crate) fn flow_fraction(value: Ratio, location: &'static str) -> Result<Ratio, CycleError> {
    UnitIntervalOpen::new(value)
        .map(|checked| *checked.as_ref())
        .map_err(|_| CycleError::FractionOutOfRange { location, value })
}
