use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{Pressure, Ratio},
    ratio::ratio,
};

use crate::{
    analysis::{AnalysisNodes, ExchangerNode, MixingNode, Stream},
    components::{Compressor, Condenser, EconomizerTPI, Evaporator, HeatReleaser, Recuperator},
    refrigerant::{PropertyModel, Refrigerant, StateInput, StatePoint},
    support::{solver::newton_raphson, units::TemperatureDifference},
};

use super::{
    CycleError, HasEconomizer, HasRecuperator, RefrigerationCycle, TwoStage, check_lift,
    cycle_via_nodes, flow_fraction, intermediate_pressure,
};

/// Trials before giving up on a feasible recuperator pressure.
const MAX_ESCALATIONS: usize = 12;

/// Mitsubishi's hyper-heating topology: a two-stage cycle where the
/// condensate is flashed to a recuperator pressure above the intermediate
/// pressure, the flash vapor recondenses against the compressor suction in
/// the recuperator, and a two-phase-injection economizer desuperheats the
/// first-stage discharge onto the dew line.
///
/// The recuperator pressure is not an input: the constructor searches for
/// one where the injection quality solve converges and both exchangers keep
/// a positive driving temperature difference, escalating the trial pressure
/// toward the condensing pressure until the topology closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MitsubishiZubadan {
    fluid: Refrigerant,
    nodes: AnalysisNodes,
    intermediate: Pressure,
    recuperator_pressure: Pressure,
    main: Ratio,
    injected: Ratio,
    /// Vapor leaving the evaporator into the recuperator cold side.
    pub evaporator_outlet: StatePoint,
    /// First-stage suction, preheated by the recuperator.
    pub suction: StatePoint,
    /// First-stage discharge at the intermediate pressure.
    pub first_discharge: StatePoint,
    /// Second-stage suction: saturated vapor at the intermediate pressure.
    pub second_suction: StatePoint,
    /// Second-stage discharge, entering the condenser.
    pub discharge: StatePoint,
    /// Liquid leaving the condenser.
    pub liquid: StatePoint,
    /// Two-phase state entering the recuperator hot side.
    pub recuperator_inlet: StatePoint,
    /// Saturated liquid leaving the recuperator hot side.
    pub recuperator_outlet: StatePoint,
    /// Throttled side stream entering the economizer cold side.
    pub economizer_cold_inlet: StatePoint,
    /// Two-phase stream leaving the economizer cold side for injection.
    pub injection_outlet: StatePoint,
    /// Subcooled main liquid leaving the economizer hot side.
    pub subcooled: StatePoint,
    /// Two-phase state entering the evaporator.
    pub evaporator_inlet: StatePoint,
}

/// States pinned down by one converged trial pressure.
struct Trial {
    recuperator_inlet: StatePoint,
    recuperator_outlet: StatePoint,
    economizer_cold_inlet: StatePoint,
    injection_outlet: StatePoint,
    subcooled: StatePoint,
    suction: StatePoint,
    first_discharge: StatePoint,
    main: Ratio,
    injected: Ratio,
}

impl MitsubishiZubadan {
    /// Solves the cycle, searching for a feasible recuperator pressure.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::NoFeasibleRecuperatorPressure`] if no trial
    /// pressure closes the topology, or another [`CycleError`] if the
    /// boundary states themselves cannot be resolved.
    pub fn new(
        model: &impl PropertyModel,
        fluid: Refrigerant,
        evaporator: Evaporator,
        compressor: Compressor,
        condenser: Condenser,
        recuperator: Recuperator,
        economizer: EconomizerTPI,
    ) -> Result<Self, CycleError> {
        let heat_releaser = HeatReleaser::Condenser(condenser);
        let evaporator_outlet = evaporator.outlet(model, fluid)?;
        let condensing = heat_releaser.pressure(model, fluid)?;
        check_lift(evaporator_outlet.pressure, condensing)?;
        let intermediate =
            intermediate_pressure(model, fluid, evaporator_outlet.pressure, condensing);
        check_lift(evaporator_outlet.pressure, intermediate)?;
        check_lift(intermediate, condensing)?;

        let liquid = heat_releaser.outlet(model, fluid)?;
        let second_suction = model.dew_point_at_pressure(fluid, intermediate)?;
        let economizer_outlet_temperature = second_suction
            .temperature
            .plus(economizer.temperature_difference());

        let efficiency = compressor.isentropic_efficiency();

        let solve_at = |trial_pressure: Pressure| -> Result<Trial, CycleError> {
            let recuperator_inlet = liquid.isenthalpic_expansion_to(model, trial_pressure)?;
            if !recuperator_inlet.is_two_phase() {
                return Err(CycleError::NotTwoPhase {
                    location: "recuperator inlet",
                });
            }
            let recuperator_outlet = model.bubble_point_at_pressure(fluid, trial_pressure)?;
            let subcooled = model.state(
                fluid,
                StateInput::PressureTemperature(trial_pressure, economizer_outlet_temperature),
            )?;
            let economizer_cold_inlet =
                recuperator_outlet.isenthalpic_expansion_to(model, intermediate)?;
            let recuperator_duty = recuperator_inlet.enthalpy - recuperator_outlet.enthalpy;

            // For a trial injection quality, the economizer balance fixes
            // the flow split and the recuperator balance fixes the suction
            // superheat; the residual is the distance of the mixed
            // second-stage suction from the dew line.
            let operating_point = |quality: f64| -> Result<Trial, CycleError> {
                let injection_outlet = model.two_phase_point_at(
                    fluid,
                    intermediate,
                    Ratio::new::<ratio>(quality),
                )?;
                let injected = flow_fraction(
                    (recuperator_outlet.enthalpy - subcooled.enthalpy)
                        / (injection_outlet.enthalpy - subcooled.enthalpy),
                    "economizer balance",
                )?;
                let main = Ratio::new::<ratio>(1.0) - injected;

                let suction = model.state(
                    fluid,
                    StateInput::PressureEnthalpy(
                        evaporator_outlet.pressure,
                        evaporator_outlet.enthalpy + recuperator_duty / main,
                    ),
                )?;
                let first_discharge = suction.compression_to(model, intermediate, efficiency)?;

                Ok(Trial {
                    recuperator_inlet,
                    recuperator_outlet,
                    economizer_cold_inlet,
                    injection_outlet,
                    subcooled,
                    suction,
                    first_discharge,
                    main,
                    injected,
                })
            };

            let config = newton_raphson::Config {
                max_iters: 50,
                residual_tol: 1e-3,
                derivative_step: 1e-4,
            };
            let solution = newton_raphson::solve(
                |quality| {
                    let trial = operating_point(quality)?;
                    Ok::<_, CycleError>(
                        (trial.main * trial.first_discharge.enthalpy
                            + trial.injected * trial.injection_outlet.enthalpy
                            - second_suction.enthalpy)
                            .get::<joule_per_kilogram>(),
                    )
                },
                0.8,
                [0.0, 1.0],
                &config,
            )?;
            if solution.status != newton_raphson::Status::Converged {
                return Err(CycleError::SolverDivergence {
                    iters: solution.iters,
                });
            }
            let trial = operating_point(solution.root)?;

            if trial.suction.temperature.plus(recuperator.temperature_difference())
                > trial.recuperator_inlet.temperature
            {
                return Err(CycleError::WrongTemperatureDifference {
                    location: "recuperator",
                });
            }
            if trial.recuperator_outlet.temperature < trial.injection_outlet.temperature {
                return Err(CycleError::WrongTemperatureDifference {
                    location: "economizer",
                });
            }

            Ok(trial)
        };

        let mut recuperator_pressure = (intermediate * condensing).sqrt();
        let mut solved = None;
        for _ in 0..=MAX_ESCALATIONS {
            match solve_at(recuperator_pressure) {
                Ok(trial) => {
                    solved = Some((recuperator_pressure, trial));
                    break;
                }
                Err(_) => recuperator_pressure = (recuperator_pressure * condensing).sqrt(),
            }
        }
        let Some((recuperator_pressure, trial)) = solved else {
            return Err(CycleError::NoFeasibleRecuperatorPressure);
        };
        let Trial {
            recuperator_inlet,
            recuperator_outlet,
            economizer_cold_inlet,
            injection_outlet,
            subcooled,
            suction,
            first_discharge,
            main,
            injected,
        } = trial;

        let first_ideal = suction.isentropic_compression_to(model, intermediate)?;
        let second_ideal = second_suction.isentropic_compression_to(model, condensing)?;
        let discharge = second_suction.compression_to(model, condensing, efficiency)?;

        let evaporator_inlet =
            subcooled.isenthalpic_expansion_to(model, evaporator_outlet.pressure)?;

        let mut nodes = AnalysisNodes::basic(
            main * (first_ideal.enthalpy - suction.enthalpy)
                + (second_ideal.enthalpy - second_suction.enthalpy),
            main * (first_discharge.enthalpy - suction.enthalpy)
                + (discharge.enthalpy - second_suction.enthalpy),
            Stream::part(main, evaporator_inlet, evaporator_outlet),
            Stream::part(main, suction, first_discharge),
            Stream::full(discharge, liquid),
            heat_releaser.is_transcritical(),
            Stream::full(liquid, recuperator_inlet),
        );
        nodes
            .compressions
            .push(Stream::full(second_suction, discharge));
        nodes.expansion_valves.push(Stream::part(
            injected,
            recuperator_outlet,
            economizer_cold_inlet,
        ));
        nodes
            .expansion_valves
            .push(Stream::part(main, subcooled, evaporator_inlet));
        nodes.recuperator = Some(ExchangerNode {
            cold: Stream::part(main, evaporator_outlet, suction),
            hot: Stream::full(recuperator_inlet, recuperator_outlet),
        });
        nodes.economizer = Some(ExchangerNode {
            cold: Stream::part(injected, economizer_cold_inlet, injection_outlet),
            hot: Stream::part(main, recuperator_outlet, subcooled),
        });
        nodes.mixing = Some(MixingNode {
            inlets: vec![(main, first_discharge), (injected, injection_outlet)],
            outlets: vec![(Ratio::new::<ratio>(1.0), second_suction)],
        });

        Ok(Self {
            fluid,
            nodes,
            intermediate,
            recuperator_pressure,
            main,
            injected,
            evaporator_outlet,
            suction,
            first_discharge,
            second_suction,
            discharge,
            liquid,
            recuperator_inlet,
            recuperator_outlet,
            economizer_cold_inlet,
            injection_outlet,
            subcooled,
            evaporator_inlet,
        })
    }

    /// The pressure the feasibility search settled on for the recuperator
    /// loop; lies between the intermediate and condensing pressures.
    #[must_use]
    pub fn recuperator_pressure(&self) -> Pressure {
        self.recuperator_pressure
    }
}

cycle_via_nodes!(MitsubishiZubadan);

impl TwoStage for MitsubishiZubadan {
    fn intermediate_pressure(&self) -> Pressure {
        self.intermediate
    }
}

impl HasEconomizer for MitsubishiZubadan {
    fn main_fraction(&self) -> Ratio {
        self.main
    }

    fn injection_fraction(&self) -> Ratio {
        self.injected
    }
}

impl HasRecuperator for MitsubishiZubadan {
    fn recuperator_heat(&self) -> crate::support::units::SpecificEnthalpy {
        self.recuperator_inlet.enthalpy - self.recuperator_outlet.enthalpy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        available_energy::joule_per_kilogram,
        f64::{TemperatureInterval, ThermodynamicTemperature},
        ratio::percent,
        temperature_interval::kelvin,
        thermodynamic_temperature::degree_celsius,
    };

    use crate::{analysis::EntropyAnalysis, refrigerant::model::Idealized};

    fn celsius(t: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(t)
    }

    fn delta(k: f64) -> TemperatureInterval {
        TemperatureInterval::new::<kelvin>(k)
    }

    fn cycle() -> MitsubishiZubadan {
        MitsubishiZubadan::new(
            &Idealized,
            Refrigerant::R410A,
            Evaporator::new(celsius(-20.0), delta(5.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            Condenser::new(celsius(50.0), delta(3.0)).unwrap(),
            Recuperator::new(delta(10.0)).unwrap(),
            EconomizerTPI::new(delta(5.0)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn recuperator_pressure_sits_between_intermediate_and_condensing() {
        let cycle = cycle();
        assert!(cycle.recuperator_pressure() > cycle.intermediate_pressure());
        assert!(cycle.recuperator_pressure() < cycle.discharge.pressure);
        assert!(cycle.recuperator_inlet.is_two_phase());
    }

    #[test]
    fn recuperator_preheats_the_suction() {
        let cycle = cycle();
        assert!(cycle.suction.enthalpy > cycle.evaporator_outlet.enthalpy);
        let absorbed = cycle.main.get::<ratio>()
            * (cycle.suction.enthalpy - cycle.evaporator_outlet.enthalpy)
                .get::<joule_per_kilogram>();
        assert_relative_eq!(
            absorbed,
            cycle.recuperator_heat().get::<joule_per_kilogram>(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn injection_lands_on_the_dew_line() {
        let cycle = cycle();
        assert!(cycle.injection_outlet.is_two_phase());
        let mixed = cycle.main.get::<ratio>()
            * cycle.first_discharge.enthalpy.get::<joule_per_kilogram>()
            + cycle.injected.get::<ratio>()
                * cycle.injection_outlet.enthalpy.get::<joule_per_kilogram>();
        let dew = cycle.second_suction.enthalpy.get::<joule_per_kilogram>();
        assert!((mixed - dew).abs() < 1e-2);
    }

    #[test]
    fn energy_balance_closes() {
        let cycle = cycle();
        assert_relative_eq!(
            cycle.cop().get::<ratio>(),
            cycle.eer().get::<ratio>() + 1.0,
            max_relative = 1e-6
        );
    }

    #[test]
    fn heating_performance_is_plausible_for_a_cold_climate() {
        let cycle = cycle();
        let cop = cycle.cop().get::<ratio>();
        assert!(cop > 2.0 && cop < 5.0, "cop = {cop}");
    }

    #[test]
    fn reports_infeasibility_when_every_trial_pressure_fails() {
        // A 45 K recuperator approach cannot fit under a 30 °C condenser:
        // the hot inlet saturates below the required temperature at every
        // trial pressure, so the escalation loop runs out.
        let result = MitsubishiZubadan::new(
            &Idealized,
            Refrigerant::R410A,
            Evaporator::new(celsius(-5.0), delta(5.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            Condenser::new(celsius(30.0), delta(0.0)).unwrap(),
            Recuperator::new(delta(45.0)).unwrap(),
            EconomizerTPI::new(delta(5.0)).unwrap(),
        );
        assert!(matches!(
            result,
            Err(CycleError::NoFeasibleRecuperatorPressure)
        ));
    }

    #[test]
    fn entropy_decomposition_reconstructs_the_work() {
        let cycle = cycle();
        for indoor in [18.0, 21.0, 24.0] {
            for outdoor in [30.0, 38.0, 44.0] {
                let result = cycle
                    .entropy_analysis(celsius(indoor), celsius(outdoor))
                    .unwrap();

                assert!(
                    result.analysis_relative_error.get::<ratio>() < 1e-4,
                    "indoor {indoor}, outdoor {outdoor}"
                );
                assert!(result.recuperator_energy_loss_ratio.get::<ratio>() > 0.0);
                assert!(result.economizer_energy_loss_ratio.get::<ratio>() > 0.0);
                assert!(result.mixing_energy_loss_ratio.get::<ratio>() > 0.0);

                let sum = result.min_specific_work_ratio
                    + result.compressor_energy_loss_ratio
                    + result.condenser_energy_loss_ratio
                    + result.gas_cooler_energy_loss_ratio
                    + result.expansion_valves_energy_loss_ratio
                    + result.ejector_energy_loss_ratio
                    + result.evaporator_energy_loss_ratio
                    + result.recuperator_energy_loss_ratio
                    + result.economizer_energy_loss_ratio
                    + result.mixing_energy_loss_ratio;
                assert_relative_eq!(sum.get::<ratio>(), 1.0, max_relative = 1e-12);
            }
        }
    }
}
