use thiserror::Error;
use uom::si::f64::Ratio;

use crate::{
    refrigerant::{ProcessError, PropertyError},
    support::solver::newton_raphson,
};

/// Errors from solving a cycle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CycleError {
    /// A property lookup failed.
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// A state transformation failed.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The evaporating pressure does not lie below the heat rejection
    /// pressure.
    #[error("the evaporating pressure must lie below the heat rejection pressure")]
    PressureOrder,

    /// A state that must carry a vapor quality is not two-phase.
    #[error("expected a two-phase state at the {location}")]
    NotTwoPhase { location: &'static str },

    /// A heat exchanger cannot realize its temperature approach.
    #[error("temperature approach cannot be realized at the {location}")]
    WrongTemperatureDifference { location: &'static str },

    /// An energy balance produced an unphysical mass-flow split.
    #[error("mass-flow fraction at the {location} fell outside (0, 1): {value:?}")]
    FractionOutOfRange {
        location: &'static str,
        value: Ratio,
    },

    /// An iterative flow solve hit its iteration limit.
    #[error("flow solver did not converge within {iters} iterations")]
    SolverDivergence { iters: usize },

    /// An iterative flow solve could not proceed at all.
    #[error("flow solver could not proceed: {detail}")]
    SolverSetup { detail: String },

    /// No recuperator pressure satisfies every feasibility check.
    #[error("no feasible recuperator pressure between the intermediate and condensing pressures")]
    NoFeasibleRecuperatorPressure,
}

impl From<newton_raphson::Error<CycleError>> for CycleError {
    fn from(error: newton_raphson::Error<CycleError>) -> Self {
        match error {
            newton_raphson::Error::Evaluation(inner) => inner,
            other => Self::SolverSetup {
                detail: other.to_string(),
            },
        }
    }
}
