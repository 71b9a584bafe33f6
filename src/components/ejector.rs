use uom::si::f64::Ratio;

use crate::support::constraint::{Constrained, UnitIntervalOpen};

use super::ComponentError;

/// Ejector spec: isentropic efficiencies of its nozzle, suction, and
/// diffuser sections, each strictly inside (0, 100)%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ejector {
    nozzle: Constrained<Ratio, UnitIntervalOpen>,
    suction: Constrained<Ratio, UnitIntervalOpen>,
    diffuser: Constrained<Ratio, UnitIntervalOpen>,
}

impl Ejector {
    /// Creates an ejector spec.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Efficiency`] for the first efficiency that
    /// does not lie strictly between 0 and 1.
    pub fn new(
        nozzle_efficiency: Ratio,
        suction_efficiency: Ratio,
        diffuser_efficiency: Ratio,
    ) -> Result<Self, ComponentError> {
        let check = |value: Ratio| {
            UnitIntervalOpen::new(value).map_err(|_| ComponentError::Efficiency { value })
        };
        Ok(Self {
            nozzle: check(nozzle_efficiency)?,
            suction: check(suction_efficiency)?,
            diffuser: check(diffuser_efficiency)?,
        })
    }

    #[must_use]
    pub fn nozzle_efficiency(&self) -> Ratio {
        *self.nozzle.as_ref()
    }

    #[must_use]
    pub fn suction_efficiency(&self) -> Ratio {
        *self.suction.as_ref()
    }

    #[must_use]
    pub fn diffuser_efficiency(&self) -> Ratio {
        *self.diffuser.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::ratio::percent;

    #[test]
    fn all_three_efficiencies_are_validated() {
        let good = Ratio::new::<percent>(80.0);
        let bad = Ratio::new::<percent>(100.0);

        assert!(Ejector::new(good, good, good).is_ok());
        for args in [(bad, good, good), (good, bad, good), (good, good, bad)] {
            assert!(matches!(
                Ejector::new(args.0, args.1, args.2),
                Err(ComponentError::Efficiency { .. })
            ));
        }
    }
}
