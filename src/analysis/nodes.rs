//! Flow topology a cycle hands to the analyzer.
//!
//! All mass-flow fractions are relative to the flow through the heat
//! releaser, matching the normalization the cycles use for their specific
//! quantities.

use uom::si::f64::Ratio;

use crate::{
    refrigerant::StatePoint,
    support::units::{SpecificEnthalpy, SpecificEntropy},
};

/// One refrigerant stream through a component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stream {
    /// Mass-flow fraction of the stream.
    pub fraction: Ratio,
    pub inlet: StatePoint,
    pub outlet: StatePoint,
}

impl Stream {
    /// A stream carrying the full heat releaser flow.
    #[must_use]
    pub fn full(inlet: StatePoint, outlet: StatePoint) -> Self {
        Self {
            fraction: Ratio::new::<uom::si::ratio::ratio>(1.0),
            inlet,
            outlet,
        }
    }

    /// A stream carrying a fraction of the heat releaser flow.
    #[must_use]
    pub fn part(fraction: Ratio, inlet: StatePoint, outlet: StatePoint) -> Self {
        Self {
            fraction,
            inlet,
            outlet,
        }
    }

    /// Flow-weighted enthalpy gain across the stream.
    #[must_use]
    pub fn enthalpy_rise(&self) -> SpecificEnthalpy {
        self.fraction * (self.outlet.enthalpy - self.inlet.enthalpy)
    }

    /// Flow-weighted entropy gain across the stream.
    #[must_use]
    pub fn entropy_rise(&self) -> SpecificEntropy {
        self.fraction * (self.outlet.entropy - self.inlet.entropy)
    }
}

/// A counterflow heat exchanger internal to the cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangerNode {
    pub cold: Stream,
    pub hot: Stream,
}

/// An adiabatic junction where streams merge or split.
#[derive(Debug, Clone, PartialEq)]
pub struct MixingNode {
    pub inlets: Vec<(Ratio, StatePoint)>,
    pub outlets: Vec<(Ratio, StatePoint)>,
}

impl MixingNode {
    /// Entropy generated at the junction: outgoing minus incoming
    /// flow-weighted entropy.
    #[must_use]
    pub fn entropy_generation(&self) -> SpecificEntropy {
        let total = |streams: &[(Ratio, StatePoint)]| -> SpecificEntropy {
            streams
                .iter()
                .map(|&(fraction, point)| fraction * point.entropy)
                .sum()
        };
        total(&self.outlets) - total(&self.inlets)
    }
}

/// Everything the analyzer needs to decompose one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisNodes {
    /// Specific work of an ideal (isentropic) compression train.
    pub isentropic_specific_work: SpecificEnthalpy,
    /// Actual specific work; the decomposition must reconstruct this.
    pub specific_work: SpecificEnthalpy,
    /// The cooling stream, flow-weighted.
    pub evaporator: Stream,
    /// Every compression stage with its flow fraction.
    pub compressions: Vec<Stream>,
    /// The full flow through the condenser or gas cooler.
    pub heat_releaser: Stream,
    /// Routes the heat rejection loss to the gas cooler instead of the
    /// condenser in the reported ratios.
    pub transcritical: bool,
    /// Every throttling valve with its flow fraction.
    pub expansion_valves: Vec<Stream>,
    /// The ejector's merge of motive and suction flows, if present.
    pub ejector: Option<MixingNode>,
    /// Suction-line heat exchanger streams, if present.
    pub recuperator: Option<ExchangerNode>,
    /// Economizer streams, if present.
    pub economizer: Option<ExchangerNode>,
    /// Any other junction where streams merge or split, if present.
    pub mixing: Option<MixingNode>,
}

impl AnalysisNodes {
    /// Nodes for a topology with one compression stage, one valve, and no
    /// internal exchangers; richer cycles fill in the optional fields.
    #[must_use]
    pub fn basic(
        isentropic_specific_work: SpecificEnthalpy,
        specific_work: SpecificEnthalpy,
        evaporator: Stream,
        compression: Stream,
        heat_releaser: Stream,
        transcritical: bool,
        expansion_valve: Stream,
    ) -> Self {
        Self {
            isentropic_specific_work,
            specific_work,
            evaporator,
            compressions: vec![compression],
            heat_releaser,
            transcritical,
            expansion_valves: vec![expansion_valve],
            ejector: None,
            recuperator: None,
            economizer: None,
            mixing: None,
        }
    }
}
