use uom::si::f64::Ratio;

use crate::support::constraint::{Constrained, UnitIntervalOpen};

use super::ComponentError;

/// Compressor spec: an isentropic efficiency strictly inside (0, 100)%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compressor {
    efficiency: Constrained<Ratio, UnitIntervalOpen>,
}

impl Compressor {
    /// Creates a compressor spec.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Efficiency`] unless `0 < efficiency < 1`.
    pub fn new(isentropic_efficiency: Ratio) -> Result<Self, ComponentError> {
        let efficiency = UnitIntervalOpen::new(isentropic_efficiency)
            .map_err(|_| ComponentError::Efficiency {
                value: isentropic_efficiency,
            })?;
        Ok(Self { efficiency })
    }

    #[must_use]
    pub fn isentropic_efficiency(&self) -> Ratio {
        *self.efficiency.as_ref()
    }
}
