//! Analytic refrigerant property backend.
//!
//! The model combines a Clausius–Clapeyron saturation curve, a Watson
//! correlation for the latent heat, and constant liquid and vapor heat
//! capacities. Entropies are derived from the same expressions as the
//! enthalpies (`s_fg = h_fg / T_sat`), so every state the model produces is
//! internally consistent: isentropic paths conserve entropy exactly and
//! entropy balances over a closed cycle sum to the compressor work. Accuracy
//! against reference data is a few percent, which is sufficient for
//! comparative cycle studies and for exercising every solver in this crate.

use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{Pressure, Ratio, ThermodynamicTemperature},
    pressure::pascal,
    ratio::ratio,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::UnitInterval,
    units::{SpecificEnthalpy, SpecificEntropy},
};

use super::super::{Phase, PropertyError, Refrigerant, StateInput, StatePoint};

/// Reference temperature where liquid enthalpy and entropy are zero.
const T_REF: f64 = 273.15;

/// Watson exponent for the latent heat correlation.
const WATSON_EXPONENT: f64 = 0.38;

/// The analytic property backend.
///
/// Stateless and trivially `Copy`; every lookup is a closed-form evaluation
/// except the enthalpy/entropy input pair, which bisects on pressure.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idealized;

/// Per-fluid correlation constants, all in SI base units.
struct Constants {
    /// Critical temperature, K.
    t_crit: f64,
    /// Critical pressure, Pa.
    p_crit: f64,
    /// Clausius–Clapeyron slope of the saturation curve.
    slope: f64,
    /// Liquid isobaric heat capacity, J/(kg·K).
    cp_liquid: f64,
    /// Vapor isobaric heat capacity, J/(kg·K).
    cp_vapor: f64,
    /// Latent heat of vaporization at [`T_REF`], J/kg.
    latent_ref: f64,
}

fn constants(fluid: Refrigerant) -> &'static Constants {
    match fluid {
        Refrigerant::R32 => &Constants {
            t_crit: 351.26,
            p_crit: 5.782e6,
            slope: 6.86,
            cp_liquid: 1940.0,
            cp_vapor: 1120.0,
            latent_ref: 315.0e3,
        },
        Refrigerant::R134a => &Constants {
            t_crit: 374.21,
            p_crit: 4.059e6,
            slope: 7.11,
            cp_liquid: 1340.0,
            cp_vapor: 900.0,
            latent_ref: 198.6e3,
        },
        // Treated as azeotropic: one saturation curve, no temperature glide.
        Refrigerant::R407C => &Constants {
            t_crit: 359.35,
            p_crit: 4.63e6,
            slope: 6.99,
            cp_liquid: 1540.0,
            cp_vapor: 1000.0,
            latent_ref: 212.0e3,
        },
        Refrigerant::R410A => &Constants {
            t_crit: 344.49,
            p_crit: 4.901e6,
            slope: 6.95,
            cp_liquid: 1650.0,
            cp_vapor: 1170.0,
            latent_ref: 221.0e3,
        },
        Refrigerant::R744 => &Constants {
            t_crit: 304.13,
            p_crit: 7.377e6,
            slope: 6.615,
            cp_liquid: 2430.0,
            cp_vapor: 1700.0,
            latent_ref: 230.9e3,
        },
    }
}

impl Constants {
    fn saturation_pressure(&self, t: f64) -> f64 {
        self.p_crit * (self.slope * (1.0 - self.t_crit / t)).exp()
    }

    /// Inverse of [`Self::saturation_pressure`]; extends smoothly above the
    /// critical point, where it acts as the pseudo-boiling temperature.
    fn saturation_temperature(&self, p: f64) -> Result<f64, PropertyError> {
        let denominator = 1.0 - (p / self.p_crit).ln() / self.slope;
        if denominator <= 0.0 {
            return Err(PropertyError::out_of_domain(format!(
                "pressure {p} Pa is beyond the saturation correlation"
            )));
        }
        Ok(self.t_crit / denominator)
    }

    /// Watson latent heat; zero at and above the critical temperature.
    fn latent_heat(&self, t: f64) -> f64 {
        let reduced = ((self.t_crit - t) / (self.t_crit - T_REF)).max(0.0);
        self.latent_ref * reduced.powf(WATSON_EXPONENT)
    }

    fn liquid_enthalpy(&self, t: f64) -> f64 {
        self.cp_liquid * (t - T_REF)
    }

    fn liquid_entropy(&self, t: f64) -> f64 {
        self.cp_liquid * (t / T_REF).ln()
    }
}

/// Raw resolved state in SI base units, before wrapping into quantities.
struct Resolved {
    temperature: f64,
    enthalpy: f64,
    entropy: f64,
    quality: Option<f64>,
    phase: Phase,
}

fn resolve_pt(c: &Constants, p: f64, t: f64) -> Result<Resolved, PropertyError> {
    let ts = c.saturation_temperature(p)?;

    if p >= c.p_crit {
        return Ok(resolve_supercritical_at_temperature(c, ts, t));
    }

    if (t - ts).abs() < 1e-9 * ts {
        return Err(PropertyError::invalid_state(format!(
            "temperature {t} K coincides with the saturation temperature at {p} Pa; \
             use a quality input to fix the state"
        )));
    }

    if t < ts {
        Ok(Resolved {
            temperature: t,
            enthalpy: c.liquid_enthalpy(t),
            entropy: c.liquid_entropy(t),
            quality: None,
            phase: Phase::Subcooled,
        })
    } else {
        let latent = c.latent_heat(ts);
        Ok(Resolved {
            temperature: t,
            enthalpy: c.liquid_enthalpy(ts) + latent + c.cp_vapor * (t - ts),
            entropy: c.liquid_entropy(ts) + latent / ts + c.cp_vapor * (t / ts).ln(),
            quality: None,
            phase: Phase::Superheated,
        })
    }
}

/// Above the critical pressure the latent heat vanishes, so the liquid and
/// vapor branches meet continuously at the pseudo-boiling temperature.
fn resolve_supercritical_at_temperature(c: &Constants, ts: f64, t: f64) -> Resolved {
    let (enthalpy, entropy) = if t < ts {
        (c.liquid_enthalpy(t), c.liquid_entropy(t))
    } else {
        (
            c.liquid_enthalpy(ts) + c.cp_vapor * (t - ts),
            c.liquid_entropy(ts) + c.cp_vapor * (t / ts).ln(),
        )
    };
    Resolved {
        temperature: t,
        enthalpy,
        entropy,
        quality: None,
        phase: Phase::Supercritical,
    }
}

fn resolve_ph(c: &Constants, p: f64, h: f64) -> Result<Resolved, PropertyError> {
    let ts = c.saturation_temperature(p)?;

    if p >= c.p_crit {
        let h_sat = c.liquid_enthalpy(ts);
        let t = if h < h_sat {
            T_REF + h / c.cp_liquid
        } else {
            ts + (h - h_sat) / c.cp_vapor
        };
        return Ok(resolve_supercritical_at_temperature(c, ts, t));
    }

    let latent = c.latent_heat(ts);
    let h_liquid = c.liquid_enthalpy(ts);
    let h_vapor = h_liquid + latent;

    if h < h_liquid {
        let t = T_REF + h / c.cp_liquid;
        Ok(Resolved {
            temperature: t,
            enthalpy: h,
            entropy: c.liquid_entropy(t),
            quality: None,
            phase: Phase::Subcooled,
        })
    } else if h <= h_vapor {
        let quality = (h - h_liquid) / latent;
        Ok(Resolved {
            temperature: ts,
            enthalpy: h,
            entropy: c.liquid_entropy(ts) + quality * latent / ts,
            quality: Some(quality),
            phase: Phase::TwoPhase,
        })
    } else {
        let t = ts + (h - h_vapor) / c.cp_vapor;
        Ok(Resolved {
            temperature: t,
            enthalpy: h,
            entropy: c.liquid_entropy(ts) + latent / ts + c.cp_vapor * (t / ts).ln(),
            quality: None,
            phase: Phase::Superheated,
        })
    }
}

fn resolve_ps(c: &Constants, p: f64, s: f64) -> Result<Resolved, PropertyError> {
    let ts = c.saturation_temperature(p)?;

    if p >= c.p_crit {
        let s_sat = c.liquid_entropy(ts);
        let t = if s < s_sat {
            T_REF * (s / c.cp_liquid).exp()
        } else {
            ts * ((s - s_sat) / c.cp_vapor).exp()
        };
        return Ok(resolve_supercritical_at_temperature(c, ts, t));
    }

    let latent = c.latent_heat(ts);
    let s_liquid = c.liquid_entropy(ts);
    let s_fg = latent / ts;
    let s_vapor = s_liquid + s_fg;

    if s < s_liquid {
        let t = T_REF * (s / c.cp_liquid).exp();
        Ok(Resolved {
            temperature: t,
            enthalpy: c.liquid_enthalpy(t),
            entropy: s,
            quality: None,
            phase: Phase::Subcooled,
        })
    } else if s <= s_vapor {
        let quality = (s - s_liquid) / s_fg;
        Ok(Resolved {
            temperature: ts,
            enthalpy: c.liquid_enthalpy(ts) + quality * latent,
            entropy: s,
            quality: Some(quality),
            phase: Phase::TwoPhase,
        })
    } else {
        let t = ts * ((s - s_vapor) / c.cp_vapor).exp();
        Ok(Resolved {
            temperature: t,
            enthalpy: c.liquid_enthalpy(ts) + latent + c.cp_vapor * (t - ts),
            entropy: s,
            quality: None,
            phase: Phase::Superheated,
        })
    }
}

fn resolve_saturated(c: &Constants, ts: f64, quality: f64) -> Resolved {
    let latent = c.latent_heat(ts);
    Resolved {
        temperature: ts,
        enthalpy: c.liquid_enthalpy(ts) + quality * latent,
        entropy: c.liquid_entropy(ts) + quality * latent / ts,
        quality: Some(quality),
        phase: Phase::TwoPhase,
    }
}

fn check_quality(quality: Ratio) -> Result<f64, PropertyError> {
    UnitInterval::new(quality.get::<ratio>())
        .map(crate::support::constraint::Constrained::into_inner)
        .map_err(|e| PropertyError::out_of_domain(format!("vapor quality: {e}")))
}

impl Idealized {
    fn resolve(
        fluid: Refrigerant,
        input: StateInput,
    ) -> Result<(f64, Resolved), PropertyError> {
        let c = constants(fluid);

        match input {
            StateInput::PressureTemperature(pressure, temperature) => {
                let p = positive(pressure.get::<pascal>(), "pressure")?;
                let t = positive(temperature.get::<kelvin>(), "temperature")?;
                Ok((p, resolve_pt(c, p, t)?))
            }
            StateInput::PressureEnthalpy(pressure, enthalpy) => {
                let p = positive(pressure.get::<pascal>(), "pressure")?;
                Ok((p, resolve_ph(c, p, enthalpy.get::<joule_per_kilogram>())?))
            }
            StateInput::PressureEntropy(pressure, entropy) => {
                let p = positive(pressure.get::<pascal>(), "pressure")?;
                Ok((
                    p,
                    resolve_ps(c, p, entropy.get::<joule_per_kilogram_kelvin>())?,
                ))
            }
            StateInput::PressureQuality(pressure, quality) => {
                let p = positive(pressure.get::<pascal>(), "pressure")?;
                if p >= c.p_crit {
                    return Err(PropertyError::out_of_domain(format!(
                        "no two-phase region at {p} Pa, at or above the critical pressure"
                    )));
                }
                let q = check_quality(quality)?;
                let ts = c.saturation_temperature(p)?;
                Ok((p, resolve_saturated(c, ts, q)))
            }
            StateInput::TemperatureQuality(temperature, quality) => {
                let t = positive(temperature.get::<kelvin>(), "temperature")?;
                if t >= c.t_crit {
                    return Err(PropertyError::out_of_domain(format!(
                        "no two-phase region at {t} K, at or above the critical temperature"
                    )));
                }
                let q = check_quality(quality)?;
                let p = c.saturation_pressure(t);
                Ok((p, resolve_saturated(c, t, q)))
            }
            StateInput::EnthalpyEntropy(enthalpy, entropy) => {
                let h = enthalpy.get::<joule_per_kilogram>();
                let s = entropy.get::<joule_per_kilogram_kelvin>();
                let p = invert_hs(c, h, s)?;
                Ok((p, resolve_ph(c, p, h)?))
            }
        }
    }
}

fn positive(value: f64, name: &str) -> Result<f64, PropertyError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PropertyError::out_of_domain(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

/// Finds the pressure matching an enthalpy/entropy pair.
///
/// At fixed enthalpy the entropy decreases monotonically with pressure, so a
/// plain bisection is reliable.
fn invert_hs(c: &Constants, h: f64, s: f64) -> Result<f64, PropertyError> {
    let mut lo = 1e2;
    let mut hi = 2.0 * c.p_crit;

    let entropy_at = |p: f64| resolve_ph(c, p, h).map(|r| r.entropy);

    if entropy_at(lo)? < s || entropy_at(hi)? > s {
        return Err(PropertyError::calculation(format!(
            "no pressure matches enthalpy {h} J/kg and entropy {s} J/(kg K)"
        )));
    }

    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if entropy_at(mid)? > s {
            lo = mid;
        } else {
            hi = mid;
        }
        if (hi - lo) < 1e-9 * hi {
            return Ok(0.5 * (lo + hi));
        }
    }

    Err(PropertyError::calculation(format!(
        "pressure bisection did not converge for enthalpy {h} J/kg and entropy {s} J/(kg K)"
    )))
}

impl super::super::PropertyModel for Idealized {
    fn critical_temperature(&self, fluid: Refrigerant) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(constants(fluid).t_crit)
    }

    fn critical_pressure(&self, fluid: Refrigerant) -> Pressure {
        Pressure::new::<pascal>(constants(fluid).p_crit)
    }

    fn state(&self, fluid: Refrigerant, input: StateInput) -> Result<StatePoint, PropertyError> {
        let (p, resolved) = Self::resolve(fluid, input)?;
        Ok(StatePoint {
            fluid,
            pressure: Pressure::new::<pascal>(p),
            temperature: ThermodynamicTemperature::new::<kelvin>(resolved.temperature),
            enthalpy: SpecificEnthalpy::new::<joule_per_kilogram>(resolved.enthalpy),
            entropy: SpecificEntropy::new::<joule_per_kilogram_kelvin>(resolved.entropy),
            quality: resolved.quality.map(Ratio::new::<ratio>),
            phase: resolved.phase,
        })
    }
}
