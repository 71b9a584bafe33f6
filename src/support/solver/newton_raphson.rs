//! Newton–Raphson root-finding with a finite-difference derivative.
//!
//! The residual function is an arbitrary fallible closure; its error type is
//! propagated unchanged through [`Error::Evaluation`]. The iteration is
//! clamped to a bracket so a wild Newton step cannot leave the feasible
//! region, and convergence is judged on the residual alone. Hitting the
//! iteration limit is reported as [`Status::MaxIters`] rather than an error:
//! the caller decides whether a non-converged solve is fatal.

use thiserror::Error;

/// Solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Maximum iteration count.
    pub max_iters: usize,

    /// Absolute tolerance on the residual.
    pub residual_tol: f64,

    /// Step used for the finite-difference derivative.
    pub derivative_step: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 50,
            residual_tol: 1e-9,
            derivative_step: 1e-4,
        }
    }
}

/// Termination status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The residual tolerance was met.
    Converged,
    /// The iteration limit was reached first.
    MaxIters,
}

/// Result of a solve.
#[derive(Debug, Clone, Copy)]
pub struct Solution {
    /// Best root estimate.
    pub root: f64,
    /// Residual at [`Self::root`].
    pub residual: f64,
    /// Iterations performed.
    pub iters: usize,
    /// Whether the solve converged.
    pub status: Status,
}

/// Errors that abort a solve outright.
#[derive(Debug, Error)]
pub enum Error<E> {
    /// The bracket is empty, inverted, or non-finite.
    #[error("invalid bracket [{min}, {max}]")]
    InvalidBracket { min: f64, max: f64 },

    /// The seed lies outside the bracket.
    #[error("seed {seed} lies outside the bracket [{min}, {max}]")]
    SeedOutsideBracket { seed: f64, min: f64, max: f64 },

    /// The residual evaluated to NaN or infinity.
    #[error("residual is not finite at x = {x}")]
    NonFiniteResidual { x: f64 },

    /// The derivative vanished and no progress is possible.
    #[error("derivative vanished at x = {x}")]
    ZeroDerivative { x: f64 },

    /// The residual function itself failed.
    #[error("residual evaluation failed")]
    Evaluation(#[source] E),
}

/// Finds a root of `residual` inside the open bracket `(min, max)`.
///
/// Iterates from `seed`, estimating the derivative by a forward difference
/// of [`Config::derivative_step`] and clamping each step strictly inside the
/// bracket.
///
/// # Errors
///
/// Returns an [`Error`] if the bracket or seed is invalid, the residual is
/// non-finite, the derivative vanishes, or the residual closure fails.
pub fn solve<E>(
    mut residual: impl FnMut(f64) -> Result<f64, E>,
    seed: f64,
    bracket: [f64; 2],
    config: &Config,
) -> Result<Solution, Error<E>> {
    let [min, max] = bracket;

    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(Error::InvalidBracket { min, max });
    }
    if !(min..=max).contains(&seed) {
        return Err(Error::SeedOutsideBracket { seed, min, max });
    }

    // Keep iterates strictly inside the open bracket.
    let margin = (max - min) * 1e-9;
    let clamp = |x: f64| x.clamp(min + margin, max - margin);

    let mut eval = |x: f64| -> Result<f64, Error<E>> {
        let r = residual(x).map_err(Error::Evaluation)?;
        if !r.is_finite() {
            return Err(Error::NonFiniteResidual { x });
        }
        Ok(r)
    };

    let mut x = clamp(seed);
    let mut r = eval(x)?;

    for iter in 0..config.max_iters {
        if r.abs() <= config.residual_tol {
            return Ok(Solution {
                root: x,
                residual: r,
                iters: iter,
                status: Status::Converged,
            });
        }

        // Forward difference, flipped near the upper bound so the probe
        // stays inside the bracket.
        let step = if x + config.derivative_step <= max - margin {
            config.derivative_step
        } else {
            -config.derivative_step
        };
        let r_probe = eval(x + step)?;
        let derivative = (r_probe - r) / step;

        if derivative == 0.0 {
            return Err(Error::ZeroDerivative { x });
        }

        x = clamp(x - r / derivative);
        r = eval(x)?;
    }

    Ok(Solution {
        root: x,
        residual: r,
        iters: config.max_iters,
        status: Status::MaxIters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    fn ok(f: impl Fn(f64) -> f64) -> impl FnMut(f64) -> Result<f64, Infallible> {
        move |x| Ok(f(x))
    }

    #[test]
    fn finds_root_of_quadratic() {
        let solution = solve(
            ok(|x| x * x - 2.0),
            1.0,
            [0.0, 10.0],
            &Config::default(),
        )
        .unwrap();

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.root, 2.0_f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn converges_from_far_seed_inside_bracket() {
        let solution = solve(
            ok(|x| x.exp() - 10.0),
            8.0,
            [0.0, 9.0],
            &Config::default(),
        )
        .unwrap();

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.root, 10.0_f64.ln(), epsilon = 1e-6);
    }

    #[test]
    fn reports_max_iters_without_erroring() {
        let config = Config {
            max_iters: 2,
            residual_tol: 1e-15,
            ..Config::default()
        };
        let solution = solve(ok(|x| x.powi(3) - 7.0), 0.1, [0.0, 100.0], &config).unwrap();

        assert_eq!(solution.status, Status::MaxIters);
        assert_eq!(solution.iters, 2);
    }

    #[test]
    fn rejects_bad_bracket_and_seed() {
        assert!(matches!(
            solve(ok(|x| x), 0.5, [1.0, 0.0], &Config::default()),
            Err(Error::InvalidBracket { .. })
        ));
        assert!(matches!(
            solve(ok(|x| x), 5.0, [0.0, 1.0], &Config::default()),
            Err(Error::SeedOutsideBracket { .. })
        ));
    }

    #[test]
    fn propagates_evaluation_errors() {
        #[derive(Debug, thiserror::Error)]
        #[error("boom")]
        struct Boom;

        let result = solve(|_| Err::<f64, _>(Boom), 0.5, [0.0, 1.0], &Config::default());
        assert!(matches!(result, Err(Error::Evaluation(Boom))));
    }
}
