//! Type-level numeric constraints with zero runtime cost.
//!
//! A [`Constrained<T, C>`] wraps a value that was checked against the marker
//! constraint `C` when it was constructed, so code receiving it never has to
//! re-validate. The markers provided here are the ones refrigeration
//! components and cycles need:
//!
//! - [`UnitInterval`]: Closed unit interval `0 ≤ x ≤ 1` (vapor qualities)
//! - [`UnitIntervalOpen`]: Open unit interval `0 < x < 1` (isentropic
//!   efficiencies, mass-flow fractions)
//!
//! Both markers work with any type implementing [`UnitBounds`]; impls are
//! provided for `f64` and [`Ratio`](uom::si::f64::Ratio).
//!
//! Custom invariants can be added by implementing [`Constraint<T>`] for a
//! zero-sized marker type.

use std::{cmp::Ordering, marker::PhantomData};

use thiserror::Error;
use uom::si::{f64::Ratio, ratio::ratio};

/// A trait for enforcing numeric invariants at construction time.
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value is not a number")]
    NotANumber,
    #[error("value is below the minimum allowed")]
    BelowMinimum,
    #[error("value is above the maximum allowed")]
    AboveMaximum,
}

/// A wrapper enforcing a numeric constraint at construction time.
///
/// # Example
///
/// ```
/// use vcrc::support::constraint::{Constrained, UnitIntervalOpen};
///
/// let efficiency = UnitIntervalOpen::new(0.8).unwrap();
/// assert_eq!(efficiency.into_inner(), 0.8);
/// assert!(UnitIntervalOpen::new(1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Constructs a new constrained value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

/// Zero and one of a unit-interval-comparable type.
///
/// Required by the unit-interval markers. Comparison is via [`PartialOrd`]
/// so NaN inputs are reported as [`ConstraintError::NotANumber`] rather than
/// silently accepted.
pub trait UnitBounds: PartialOrd + Sized {
    fn zero() -> Self;
    fn one() -> Self;
}

impl UnitBounds for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }
}

impl UnitBounds for Ratio {
    fn zero() -> Self {
        Ratio::new::<ratio>(0.0)
    }

    fn one() -> Self {
        Ratio::new::<ratio>(1.0)
    }
}

/// Marker type enforcing the closed unit interval: `0 ≤ x ≤ 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitInterval;

impl UnitInterval {
    /// Constructs `Constrained<T, UnitInterval>` if `0 ≤ value ≤ 1`.
    ///
    /// # Errors
    ///
    /// Fails with [`ConstraintError`] if the value lies outside the closed
    /// unit interval or cannot be compared (NaN).
    pub fn new<T: UnitBounds>(value: T) -> Result<Constrained<T, UnitInterval>, ConstraintError> {
        Constrained::new(value)
    }
}

impl<T: UnitBounds> Constraint<T> for UnitInterval {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match (value.partial_cmp(&T::zero()), value.partial_cmp(&T::one())) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}

/// Marker type enforcing the open unit interval: `0 < x < 1`.
///
/// This is the constraint behind every isentropic efficiency in the crate:
/// an efficiency of exactly zero or one is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitIntervalOpen;

impl UnitIntervalOpen {
    /// Constructs `Constrained<T, UnitIntervalOpen>` if `0 < value < 1`.
    ///
    /// # Errors
    ///
    /// Fails with [`ConstraintError`] if the value lies outside the open
    /// unit interval or cannot be compared (NaN).
    pub fn new<T: UnitBounds>(
        value: T,
    ) -> Result<Constrained<T, UnitIntervalOpen>, ConstraintError> {
        Constrained::new(value)
    }
}

impl<T: UnitBounds> Constraint<T> for UnitIntervalOpen {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match (value.partial_cmp(&T::zero()), value.partial_cmp(&T::one())) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less | Ordering::Equal), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater | Ordering::Equal)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::ratio::percent;

    #[test]
    fn open_interval_rejects_bounds() {
        assert!(UnitIntervalOpen::new(0.5).is_ok());
        assert!(matches!(
            UnitIntervalOpen::new(0.0),
            Err(ConstraintError::BelowMinimum)
        ));
        assert!(matches!(
            UnitIntervalOpen::new(1.0),
            Err(ConstraintError::AboveMaximum)
        ));
        assert!(matches!(
            UnitIntervalOpen::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        ));
    }

    #[test]
    fn closed_interval_accepts_bounds() {
        assert!(UnitInterval::new(0.0).is_ok());
        assert!(UnitInterval::new(1.0).is_ok());
        assert!(matches!(
            UnitInterval::new(-0.1),
            Err(ConstraintError::BelowMinimum)
        ));
        assert!(matches!(
            UnitInterval::new(1.1),
            Err(ConstraintError::AboveMaximum)
        ));
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn uom_ratio_bounds() {
        let eff = UnitIntervalOpen::new(Ratio::new::<percent>(80.0)).unwrap();
        assert_eq!(eff.as_ref().get::<percent>(), 80.0);

        assert!(UnitIntervalOpen::new(Ratio::new::<percent>(100.0)).is_err());
        assert!(UnitInterval::new(Ratio::new::<percent>(100.0)).is_ok());
    }
}
