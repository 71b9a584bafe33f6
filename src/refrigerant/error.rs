use thiserror::Error;
use uom::si::f64::Pressure;

/// Errors that may occur when resolving thermodynamic states.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    /// The input pair does not determine a valid state.
    #[error("invalid state: {context}")]
    InvalidState { context: String },

    /// The input lies outside the model's valid domain.
    #[error("out of domain: {context}")]
    OutOfDomain { context: String },

    /// A numerical evaluation failed (e.g. an inversion did not converge).
    #[error("calculation error: {context}")]
    Calculation { context: String },
}

impl PropertyError {
    pub(crate) fn invalid_state(context: impl Into<String>) -> Self {
        Self::InvalidState {
            context: context.into(),
        }
    }

    pub(crate) fn out_of_domain(context: impl Into<String>) -> Self {
        Self::OutOfDomain {
            context: context.into(),
        }
    }

    pub(crate) fn calculation(context: impl Into<String>) -> Self {
        Self::Calculation {
            context: context.into(),
        }
    }
}

/// Errors from derived state transformations.
///
/// Every transformation is directional and fails fast when asked to run the
/// wrong way; see the [`StatePoint`](super::StatePoint) methods.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// Compression requires an outlet pressure above the inlet pressure.
    #[error("compression target {target:?} is not above the inlet pressure {inlet:?}")]
    NotCompression { inlet: Pressure, target: Pressure },

    /// Expansion requires an outlet pressure below the inlet pressure.
    #[error("expansion target {target:?} is not below the inlet pressure {inlet:?}")]
    NotExpansion { inlet: Pressure, target: Pressure },

    /// Heating must raise temperature or enthalpy.
    #[error("heating target does not exceed the inlet state")]
    NotHeating,

    /// Cooling must lower temperature or enthalpy.
    #[error("cooling target is not below the inlet state")]
    NotCooling,

    /// Streams of different fluids cannot mix.
    #[error("cannot mix different fluids")]
    FluidMismatch,

    /// Adiabatic mixing requires a common pressure.
    #[error("cannot mix streams at different pressures")]
    PressureMismatch,

    /// The underlying property lookup failed.
    #[error(transparent)]
    Property(#[from] PropertyError),
}
