use uom::{ConstZero, si::f64::Ratio};

use super::AnalysisError;

/// Decomposition of a cycle's specific work into its minimal part and one
/// loss share per component group.
///
/// [`Self::min_specific_work_ratio`] and the loss ratios sum to one; each is
/// that term's share of the reconstructed specific work. Component groups a
/// topology does not have report a zero ratio.
/// [`Self::thermodynamic_perfection`] relates the minimal work to the actual
/// specific work instead and is not part of the sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyAnalysisResult {
    /// Minimal work over actual work; the exergy efficiency of the cycle.
    pub thermodynamic_perfection: Ratio,
    /// Share of the work that is thermodynamically unavoidable.
    pub min_specific_work_ratio: Ratio,
    pub compressor_energy_loss_ratio: Ratio,
    pub condenser_energy_loss_ratio: Ratio,
    pub gas_cooler_energy_loss_ratio: Ratio,
    pub expansion_valves_energy_loss_ratio: Ratio,
    pub ejector_energy_loss_ratio: Ratio,
    pub evaporator_energy_loss_ratio: Ratio,
    pub recuperator_energy_loss_ratio: Ratio,
    pub economizer_energy_loss_ratio: Ratio,
    pub mixing_energy_loss_ratio: Ratio,
    /// Relative gap between the reconstructed and actual specific work.
    pub analysis_relative_error: Ratio,
}

/// Field-wise arithmetic mean of several analyses.
///
/// # Errors
///
/// Returns [`AnalysisError::Empty`] for an empty slice.
pub fn average(results: &[EntropyAnalysisResult]) -> Result<EntropyAnalysisResult, AnalysisError> {
    if results.is_empty() {
        return Err(AnalysisError::Empty);
    }
    let n = results.len() as f64;
    let mean = |field: fn(&EntropyAnalysisResult) -> Ratio| -> Ratio {
        results.iter().map(field).fold(Ratio::ZERO, |a, b| a + b) / n
    };

    Ok(EntropyAnalysisResult {
        thermodynamic_perfection: mean(|r| r.thermodynamic_perfection),
        min_specific_work_ratio: mean(|r| r.min_specific_work_ratio),
        compressor_energy_loss_ratio: mean(|r| r.compressor_energy_loss_ratio),
        condenser_energy_loss_ratio: mean(|r| r.condenser_energy_loss_ratio),
        gas_cooler_energy_loss_ratio: mean(|r| r.gas_cooler_energy_loss_ratio),
        expansion_valves_energy_loss_ratio: mean(|r| r.expansion_valves_energy_loss_ratio),
        ejector_energy_loss_ratio: mean(|r| r.ejector_energy_loss_ratio),
        evaporator_energy_loss_ratio: mean(|r| r.evaporator_energy_loss_ratio),
        recuperator_energy_loss_ratio: mean(|r| r.recuperator_energy_loss_ratio),
        economizer_energy_loss_ratio: mean(|r| r.economizer_energy_loss_ratio),
        mixing_energy_loss_ratio: mean(|r| r.mixing_energy_loss_ratio),
        analysis_relative_error: mean(|r| r.analysis_relative_error),
    })
}
