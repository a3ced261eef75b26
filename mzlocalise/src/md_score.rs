//! The MD score (Savitski et al., Mol. Cell. Proteomics 2011): the difference in search engine
//! score between the best candidate with the given localisation and the best candidate with the
//! same sequence but a different localisation.

use context_error::*;
use mzpeptide::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{LocalisationError, LocalisationErrorKind};

/// A peptide as proposed by a search engine for a spectrum
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchEngineCandidate {
    /// The peptide with its modifications
    pub peptide: Peptide,
    /// The search engine e-value, lower is better
    pub e_value: f64,
}

/// Calculate the MD score for the localisation of the given modifications on the peptide, based
/// on the candidates a search engine reported for the same spectrum. The score is
/// `-10 * (log10(e_best) - log10(e_second))` where `e_best` is the e-value of the best candidate
/// with the same sequence and the same sites, and `e_second` is the e-value of the best candidate
/// with the same sequence and number of modifications but with different sites. When either
/// candidate is not present there is no score.
/// # Errors
/// If any of the e-values is not a positive finite number.
pub fn md_score(
    candidates: &[SearchEngineCandidate],
    peptide: &Peptide,
    modification_names: &[&str],
) -> Result<Option<f64>, LocalisationError> {
    if let Some(invalid) = candidates
        .iter()
        .find(|c| !c.e_value.is_finite() || c.e_value <= 0.0)
    {
        return Err(BoxedError::new(
            LocalisationErrorKind::InvalidInput,
            "Invalid e-value",
            "Search engine e-values have to be positive",
            Context::show(format!("{} e-value {}", invalid.peptide, invalid.e_value)),
        ));
    }

    let sites = peptide.variable_sites(modification_names);
    let count = peptide.count_variable(modification_names);
    let mut best: Option<f64> = None;
    let mut second: Option<f64> = None;
    for candidate in candidates
        .iter()
        .filter(|c| c.peptide.sequence() == peptide.sequence())
    {
        let better = |current: Option<f64>| current.is_none_or(|e| candidate.e_value < e);
        if candidate.peptide.variable_sites(modification_names) == sites {
            if better(best) {
                best = Some(candidate.e_value);
            }
        } else if candidate.peptide.count_variable(modification_names) == count
            && better(second)
        {
            second = Some(candidate.e_value);
        }
    }

    Ok(best
        .zip(second)
        .map(|(best, second)| -10.0 * (best.log10() - second.log10())))
}
