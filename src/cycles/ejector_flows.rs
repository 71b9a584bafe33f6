//! One-dimensional ejector flow model.
//!
//! The motive stream expands through the nozzle and the entrained stream
//! through the suction section, both to a common mixing pressure taken as
//! 90% of the suction inlet pressure. Momentum mixing merges them at that
//! pressure; the kinetic energy the mixture retains is recovered into
//! pressure by the diffuser at its own isentropic efficiency, which fixes
//! the outlet pressure. Total enthalpy is conserved end to end, so all
//! mixing losses reappear as entropy in the outlet state.
//!
//! The one unknown is the motive share of the mixed flow. Downstream, a
//! separator must return exactly the motive flow as vapor, so at the
//! consistent operating point the outlet vapor quality equals that share;
//! [`solve`] finds it by Newton iteration on this fixed point.

use uom::si::f64::{Ratio, Velocity};
use uom::si::ratio::ratio;

use crate::{
    components::Ejector,
    refrigerant::{Phase, PropertyModel, StateInput, StatePoint},
    support::{solver::newton_raphson, units::SpecificEnthalpy},
};

use super::CycleError;

const MIXING_PRESSURE_DROP: f64 = 0.9;

/// Converged ejector operating point, per unit mixed mass flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EjectorFlows {
    /// Motive (nozzle) share of the mixed flow.
    pub flow_ratio: Ratio,
    /// Nozzle outlet at the mixing pressure.
    pub nozzle_outlet: StatePoint,
    /// Suction outlet at the mixing pressure.
    pub suction_outlet: StatePoint,
    /// Kinetic energy of the mixed stream ahead of the diffuser.
    pub kinetic_energy: SpecificEnthalpy,
    /// Stagnation state leaving the diffuser.
    pub diffuser_outlet: StatePoint,
}

impl EjectorFlows {
    /// Entrained flow per unit motive flow.
    #[must_use]
    pub fn entrainment_ratio(&self) -> Ratio {
        (Ratio::new::<ratio>(1.0) - self.flow_ratio) / self.flow_ratio
    }
}

/// Solves the ejector operating point for the given inlet streams.
///
/// # Errors
///
/// Returns a [`CycleError`] if the motive pressure does not exceed the
/// suction pressure, a property lookup fails, the Newton iteration
/// diverges, or the converged outlet is not two-phase.
pub fn solve(
    model: &impl PropertyModel,
    ejector: &Ejector,
    nozzle_inlet: StatePoint,
    suction_inlet: StatePoint,
) -> Result<EjectorFlows, CycleError> {
    // The motive stream drives the entrainment; without a pressure excess
    // over the suction inlet there is nothing to expand through the nozzle.
    if nozzle_inlet.pressure <= suction_inlet.pressure {
        return Err(CycleError::PressureOrder);
    }

    let mixing_pressure = MIXING_PRESSURE_DROP * suction_inlet.pressure;

    let nozzle_outlet =
        nozzle_inlet.expansion_to(model, mixing_pressure, ejector.nozzle_efficiency())?;
    let suction_outlet =
        suction_inlet.expansion_to(model, mixing_pressure, ejector.suction_efficiency())?;

    let nozzle_velocity = stream_velocity(&nozzle_inlet, &nozzle_outlet);
    let suction_velocity = stream_velocity(&suction_inlet, &suction_outlet);

    let operating_point = |flow_ratio: f64| -> Result<EjectorFlows, CycleError> {
        let r = Ratio::new::<ratio>(flow_ratio);
        let one = Ratio::new::<ratio>(1.0);

        let total_enthalpy = r * nozzle_inlet.enthalpy + (one - r) * suction_inlet.enthalpy;
        let mixed_velocity: Velocity = r * nozzle_velocity + (one - r) * suction_velocity;
        let kinetic_energy: SpecificEnthalpy = 0.5 * mixed_velocity * mixed_velocity;

        // Static state after momentum mixing; the kinetic energy shortfall
        // of the merged jet has already dissipated into enthalpy here.
        let mixed = model.state(
            nozzle_inlet.fluid,
            StateInput::PressureEnthalpy(mixing_pressure, total_enthalpy - kinetic_energy),
        )?;

        // An isentropic diffuser recovering the efficiency-weighted kinetic
        // energy fixes the outlet pressure.
        let ideal_recovery = model.state(
            nozzle_inlet.fluid,
            StateInput::EnthalpyEntropy(
                mixed.enthalpy + ejector.diffuser_efficiency() * kinetic_energy,
                mixed.entropy,
            ),
        )?;

        let diffuser_outlet = model.state(
            nozzle_inlet.fluid,
            StateInput::PressureEnthalpy(ideal_recovery.pressure, total_enthalpy),
        )?;

        Ok(EjectorFlows {
            flow_ratio: r,
            nozzle_outlet,
            suction_outlet,
            kinetic_energy,
            diffuser_outlet,
        })
    };

    let residual = |flow_ratio: f64| -> Result<f64, CycleError> {
        let point = operating_point(flow_ratio)?;
        Ok(effective_quality(&point.diffuser_outlet) - flow_ratio)
    };

    let config = newton_raphson::Config {
        max_iters: 50,
        residual_tol: 1e-8,
        derivative_step: 1e-6,
    };
    let solution = newton_raphson::solve(residual, 0.5, [0.0, 1.0], &config)?;
    if solution.status == newton_raphson::Status::MaxIters {
        return Err(CycleError::SolverDivergence {
            iters: solution.iters,
        });
    }

    let flows = operating_point(solution.root)?;
    if !flows.diffuser_outlet.is_two_phase() {
        return Err(CycleError::NotTwoPhase {
            location: "ejector diffuser outlet",
        });
    }
    Ok(flows)
}

fn stream_velocity(inlet: &StatePoint, outlet: &StatePoint) -> Velocity {
    (2.0 * (inlet.enthalpy - outlet.enthalpy)).sqrt()
}

/// Vapor quality extended beyond the dome so the residual stays defined
/// while the iteration passes through single-phase trial states.
fn effective_quality(point: &StatePoint) -> f64 {
    match point.phase {
        Phase::TwoPhase => point.quality.map_or(0.0, |q| q.get::<ratio>()),
        Phase::Subcooled => 0.0,
        Phase::Superheated | Phase::Supercritical => 1.0,
    }
}
