use uom::{
    ConstZero,
    si::{
        f64::{Pressure, Ratio, TemperatureInterval},
        ratio::ratio,
    },
};

use crate::{
    analysis::{AnalysisNodes, ExchangerNode, MixingNode, Stream},
    components::{Compressor, Economizer, Evaporator, HeatReleaser},
    refrigerant::{PropertyModel, Refrigerant, StatePoint},
    support::units::TemperatureDifference,
};

use super::{
    CycleError, HasEconomizer, RefrigerationCycle, TwoStage, check_lift, cycle_via_nodes,
    flow_fraction, intermediate_pressure,
};

/// Two-stage cycle with an economizer: a side stream throttled to the
/// intermediate pressure subcools the main liquid, then joins the
/// first-stage discharge as superheated vapor.
#[derive(Debug, Clone, PartialEq)]
pub struct WithEconomizer {
    fluid: Refrigerant,
    nodes: AnalysisNodes,
    intermediate: Pressure,
    main: Ratio,
    injected: Ratio,
    /// First-stage suction, leaving the evaporator.
    pub suction: StatePoint,
    /// First-stage discharge at the intermediate pressure.
    pub first_discharge: StatePoint,
    /// Second-stage suction after mixing in the injection stream.
    pub second_suction: StatePoint,
    /// Second-stage discharge, entering the heat releaser.
    pub discharge: StatePoint,
    /// Liquid leaving the heat releaser.
    pub liquid: StatePoint,
    /// Throttled side stream entering the economizer cold side.
    pub economizer_cold_inlet: StatePoint,
    /// Vapor leaving the economizer cold side for injection.
    pub injection_outlet: StatePoint,
    /// Subcooled main liquid leaving the economizer hot side.
    pub subcooled: StatePoint,
    /// Two-phase state entering the evaporator.
    pub evaporator_inlet: StatePoint,
}

impl WithEconomizer {
    /// Solves the cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the economizer cannot realize its
    /// approach, the flow split is unphysical, or a state cannot be
    /// resolved.
    pub fn new(
        model: &impl PropertyModel,
        fluid: Refrigerant,
        evaporator: Evaporator,
        compressor: Compressor,
        heat_releaser: HeatReleaser,
        economizer: Economizer,
    ) -> Result<Self, CycleError> {
        let suction = evaporator.outlet(model, fluid)?;
        let high_pressure = heat_releaser.pressure(model, fluid)?;
        check_lift(suction.pressure, high_pressure)?;
        let intermediate = intermediate_pressure(model, fluid, suction.pressure, high_pressure);
        check_lift(suction.pressure, intermediate)?;
        check_lift(intermediate, high_pressure)?;

        let efficiency = compressor.isentropic_efficiency();
        let first_ideal = suction.isentropic_compression_to(model, intermediate)?;
        let first_discharge = suction.compression_to(model, intermediate, efficiency)?;

        let liquid = heat_releaser.outlet(model, fluid)?;
        let economizer_cold_inlet = liquid.isenthalpic_expansion_to(model, intermediate)?;

        let dew = model.dew_point_at_pressure(fluid, intermediate)?;
        let injection_outlet = if economizer.superheat() > TemperatureInterval::ZERO {
            dew.heating_to_temperature(model, dew.temperature.plus(economizer.superheat()))?
        } else {
            dew
        };

        let hot_outlet_temperature = economizer_cold_inlet
            .temperature
            .plus(economizer.temperature_difference());
        if hot_outlet_temperature >= liquid.temperature {
            return Err(CycleError::WrongTemperatureDifference {
                location: "economizer",
            });
        }
        let subcooled = liquid.cooling_to_temperature(model, hot_outlet_temperature)?;

        // Energy balance across the economizer fixes the flow split.
        let subcooling_duty = liquid.enthalpy - subcooled.enthalpy;
        let injected = flow_fraction(
            subcooling_duty
                / ((injection_outlet.enthalpy - economizer_cold_inlet.enthalpy)
                    + subcooling_duty),
            "economizer balance",
        )?;
        let main = Ratio::new::<ratio>(1.0) - injected;

        let second_suction = StatePoint::mixing(
            model,
            main,
            &first_discharge,
            injected,
            &injection_outlet,
        )?;
        let second_ideal = second_suction.isentropic_compression_to(model, high_pressure)?;
        let discharge = second_suction.compression_to(model, high_pressure, efficiency)?;

        let evaporator_inlet = subcooled.isenthalpic_expansion_to(model, suction.pressure)?;

        let mut nodes = AnalysisNodes::basic(
            main * (first_ideal.enthalpy - suction.enthalpy)
                + (second_ideal.enthalpy - second_suction.enthalpy),
            main * (first_discharge.enthalpy - suction.enthalpy)
                + (discharge.enthalpy - second_suction.enthalpy),
            Stream::part(main, evaporator_inlet, suction),
            Stream::part(main, suction, first_discharge),
            Stream::full(discharge, liquid),
            heat_releaser.is_transcritical(),
            Stream::part(injected, liquid, economizer_cold_inlet),
        );
        nodes
            .compressions
            .push(Stream::full(second_suction, discharge));
        nodes
            .expansion_valves
            .push(Stream::part(main, subcooled, evaporator_inlet));
        nodes.economizer = Some(ExchangerNode {
            cold: Stream::part(injected, economizer_cold_inlet, injection_outlet),
            hot: Stream::part(main, liquid, subcooled),
        });
        nodes.mixing = Some(MixingNode {
            inlets: vec![(main, first_discharge), (injected, injection_outlet)],
            outlets: vec![(Ratio::new::<ratio>(1.0), second_suction)],
        });

        Ok(Self {
            fluid,
            nodes,
            intermediate,
            main,
            injected,
            suction,
            first_discharge,
            second_suction,
            discharge,
            liquid,
            economizer_cold_inlet,
            injection_outlet,
            subcooled,
            evaporator_inlet,
        })
    }
}

cycle_via_nodes!(WithEconomizer);

impl TwoStage for WithEconomizer {
    fn intermediate_pressure(&self) -> Pressure {
        self.intermediate
    }
}

impl HasEconomizer for WithEconomizer {
    fn main_fraction(&self) -> Ratio {
        self.main
    }

    fn injection_fraction(&self) -> Ratio {
        self.injected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        available_energy::joule_per_kilogram,
        f64::ThermodynamicTemperature,
        ratio::percent,
        temperature_interval::kelvin,
        thermodynamic_temperature::degree_celsius,
    };

    use crate::{
        analysis::EntropyAnalysis, components::Condenser, refrigerant::model::Idealized,
    };

    fn celsius(t: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(t)
    }

    fn delta(k: f64) -> TemperatureInterval {
        TemperatureInterval::new::<kelvin>(k)
    }

    fn cycle() -> WithEconomizer {
        WithEconomizer::new(
            &Idealized,
            Refrigerant::R407C,
            Evaporator::new(celsius(-15.0), delta(5.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            HeatReleaser::Condenser(Condenser::new(celsius(45.0), delta(0.0)).unwrap()),
            Economizer::new(delta(5.0), delta(5.0)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn economizer_balance_closes() {
        let cycle = cycle();
        let absorbed = cycle.injection_fraction().get::<ratio>()
            * (cycle.injection_outlet.enthalpy - cycle.economizer_cold_inlet.enthalpy)
                .get::<joule_per_kilogram>();
        let released = cycle.main_fraction().get::<ratio>()
            * (cycle.liquid.enthalpy - cycle.subcooled.enthalpy).get::<joule_per_kilogram>();
        assert_relative_eq!(absorbed, released, max_relative = 1e-9);
    }

    #[test]
    fn fractions_complement_each_other() {
        let cycle = cycle();
        assert_relative_eq!(
            (cycle.main_fraction() + cycle.injection_fraction()).get::<ratio>(),
            1.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn energy_balance_closes() {
        let cycle = cycle();
        assert_relative_eq!(
            cycle.cop().get::<ratio>(),
            cycle.eer().get::<ratio>() + 1.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn entropy_decomposition_reconstructs_the_work() {
        let cycle = cycle();
        for indoor in [18.0, 21.0, 24.0] {
            for outdoor in [30.0, 37.0, 44.0] {
                let result = cycle
                    .entropy_analysis(celsius(indoor), celsius(outdoor))
                    .unwrap();

                assert!(
                    result.analysis_relative_error.get::<ratio>() < 1e-9,
                    "indoor {indoor}, outdoor {outdoor}"
                );
                assert!(result.economizer_energy_loss_ratio.get::<ratio>() > 0.0);

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

    #[test]
    fn rejects_an_impossible_approach() {
        let result = WithEconomizer::new(
            &Idealized,
            Refrigerant::R407C,
            Evaporator::new(celsius(-15.0), delta(5.0)).unwrap(),
            Compressor::new(Ratio::new::<percent>(75.0)).unwrap(),
            HeatReleaser::Condenser(Condenser::new(celsius(45.0), delta(0.0)).unwrap()),
            Economizer::new(delta(50.0), delta(5.0)).unwrap(),
        );
        assert!(matches!(
            result,
            Err(CycleError::WrongTemperatureDifference { .. })
        ));
    }
}
