//! The AScore algorithm (Beausoleil et al., Nat. Biotechnol. 2006) for localising a single
//! modification by comparing the best and second best site.

use std::collections::BTreeMap;

use context_error::*;
use itertools::Itertools;
use mzpeptide::{parse_json::use_serde, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    binomial::BinomialTail,
    candidates::{LocalisationProblem, scoring_parameters},
    error::{LocalisationError, LocalisationErrorKind},
    precision::Precision,
    reduction::top_peaks_per_window,
};

/// The AScore parameters
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct AScore {
    /// The width of the windows used to reduce the spectrum, the chance of a random match at
    /// depth `d` is `d / window_size` (in Th)
    pub window_size: MassOverCharge,
    /// The number of depths, depth `d` keeps the `d` most intense peaks per window
    pub max_depth: usize,
    /// The weight of the score at every depth in the peptide score
    pub depth_weights: Vec<f64>,
    /// The numeric precision of the probabilities
    pub precision: Precision,
    /// If neutral losses are part of the scored fragments
    pub account_neutral_losses: bool,
}

impl Default for AScore {
    fn default() -> Self {
        Self {
            window_size: mz(100.0),
            max_depth: 10,
            depth_weights: vec![0.5, 0.75, 1.0, 1.0, 1.0, 1.0, 0.75, 0.5, 0.25, 0.25],
            precision: Precision::default(),
            account_neutral_losses: false,
        }
    }
}

impl ParseJson for AScore {
    fn from_json_value(value: serde_json::Value) -> Result<Self, BoxedError<'static, BasicKind>> {
        let parameters: Self = use_serde(value)?;
        parameters.validate().map_err(|err| {
            err.convert::<BasicKind, BoxedError<'static, BasicKind>>(|_| BasicKind::Error)
        })?;
        Ok(parameters)
    }
}

/// The binomial scores of one site at every depth
struct SiteScores {
    site: usize,
    fragments: Vec<Fragment>,
    depth_scores: Vec<f64>,
    peptide_score: f64,
}

impl AScore {
    /// Set the maximal depth together with the weights for every depth
    #[must_use]
    pub fn depths(self, depth_weights: Vec<f64>) -> Self {
        Self {
            max_depth: depth_weights.len(),
            depth_weights,
            ..self
        }
    }
    /// Set if neutral losses are scored
    #[must_use]
    pub fn account_neutral_losses(self, account_neutral_losses: bool) -> Self {
        Self {
            account_neutral_losses,
            ..self
        }
    }

    /// Check that these parameters can be used
    /// # Errors
    /// If the window size is not positive or there is not a weight for every depth.
    pub fn validate(&self) -> Result<(), LocalisationError> {
        if !self.window_size.value.is_finite() || self.window_size.value <= 0.0 {
            return Err(BoxedError::new(
                LocalisationErrorKind::Configuration,
                "Invalid window size",
                "The AScore window size has to be a positive number",
                Context::show(self.window_size.value.to_string()),
            ));
        }
        if self.max_depth == 0 || self.depth_weights.len() < self.max_depth {
            return Err(BoxedError::new(
                LocalisationErrorKind::Configuration,
                "Invalid depths",
                format!(
                    "AScore needs at least one depth and a weight for every depth, found {} depths and {} weights",
                    self.max_depth,
                    self.depth_weights.len()
                ),
                Context::none(),
            ));
        }
        Ok(())
    }

    /// Localise a single modification on the peptide. Returns the best site with its score, or
    /// when the best sites cannot be distinguished both sites with score zero. When only one
    /// site is possible that site gets a score of 100.
    /// # Errors
    /// * [`LocalisationErrorKind::Configuration`] if these parameters or the fragment tolerance are invalid.
    /// * [`LocalisationErrorKind::InvalidInput`] if the modifications cannot be localised or if more than one modification is present.
    /// * [`LocalisationErrorKind::NumericInconsistency`] if a probability fell out of range.
    pub fn score(
        &self,
        peptide: &Peptide,
        modifications: &[Modification],
        spectrum: &Spectrum,
        annotation_parameters: &AnnotationParameters,
        specific_parameters: &SpecificAnnotationParameters,
        annotator: &impl SpectrumAnnotator,
    ) -> Result<BTreeMap<usize, f64>, LocalisationError> {
        self.validate()?;
        let tolerance = specific_parameters.fragment_tolerance;
        if !tolerance.is_positive() {
            return Err(BoxedError::new(
                LocalisationErrorKind::Configuration,
                "Invalid tolerance",
                "The fragment tolerance has to be positive",
                Context::show(tolerance.to_string()),
            ));
        }
        let reference_mz = spectrum.max_mz().unwrap_or(spectrum.precursor().mz);
        let mass_tolerance = da(tolerance.absolute_at(reference_mz).value);
        let problem = LocalisationProblem::new(peptide, modifications, mass_tolerance)?;
        if problem.count > 1 {
            return Err(BoxedError::new(
                LocalisationErrorKind::InvalidInput,
                "Multiple modifications",
                format!(
                    "AScore can only localise a single modification, found {}",
                    problem.count
                ),
                Context::show(peptide.to_string()),
            ));
        }
        if problem.is_unambiguous() {
            return Ok(problem
                .possible_sites
                .iter()
                .map(|site| (*site, 100.0))
                .collect());
        }

        let parameters = scoring_parameters(
            specific_parameters,
            modifications,
            self.account_neutral_losses,
            mass_tolerance,
        );
        let depths = (1..=self.max_depth)
            .map(|depth| top_peaks_per_window(spectrum, mz(0.0), self.window_size, depth))
            .collect_vec();
        let mut binomial = BinomialTail::new();
        let count_matches = |fragments: &[Fragment], depth: usize| {
            annotator
                .match_fragments(fragments, &depths[depth], annotation_parameters, &parameters)
                .len()
        };

        let mut sites = Vec::with_capacity(problem.possible_sites.len());
        for site in &problem.possible_sites {
            let fragments = annotator.fragments(&problem.candidate(&[*site])?, &parameters);
            let mut depth_scores = Vec::with_capacity(self.max_depth);
            for depth in 0..self.max_depth {
                let ln_p = self.precision.check_ln(binomial.ln_tail(
                    fragments.len(),
                    count_matches(&fragments, depth),
                    self.random_match_probability(depth),
                ))?;
                depth_scores.push(phred(ln_p));
            }
            let peptide_score = depth_scores
                .iter()
                .zip(&self.depth_weights)
                .map(|(score, weight)| score * weight)
                .sum();
            sites.push(SiteScores {
                site: *site,
                fragments,
                depth_scores,
                peptide_score,
            });
        }

        // Group the sites on identical peptide scores, highest first
        let groups = sites
            .iter()
            .sorted_by(|a, b| b.peptide_score.total_cmp(&a.peptide_score))
            .chunk_by(|s| s.peptide_score.to_bits())
            .into_iter()
            .map(|(_, group)| group.collect_vec())
            .collect_vec();
        let pairs = match groups.as_slice() {
            [best, ..] if best.len() > 1 => best.iter().copied().tuple_combinations().collect_vec(),
            [best, second, ..] => second.iter().map(|s| (best[0], *s)).collect_vec(),
            _ => Vec::new(),
        };

        let mut result: Option<BTreeMap<usize, f64>> = None;
        for (first, second) in pairs {
            let pair = self.score_pair(first, second, peptide.len(), &mut binomial, &count_matches)?;
            let lowest = |map: &BTreeMap<usize, f64>| {
                map.values().copied().fold(f64::INFINITY, f64::min)
            };
            result = Some(match result {
                None => pair,
                Some(current) => match lowest(&pair).total_cmp(&lowest(&current)) {
                    std::cmp::Ordering::Less => pair,
                    std::cmp::Ordering::Equal => current.into_iter().chain(pair).collect(),
                    std::cmp::Ordering::Greater => current,
                },
            });
        }
        let result = result.unwrap_or_default();
        debug!(peptide = %peptide, scores = ?result, "AScore");
        Ok(result)
    }

    /// The chance of a random match at the given depth index
    fn random_match_probability(&self, depth: usize) -> f64 {
        ((depth + 1) as f64 / self.window_size.value).min(1.0)
    }

    /// The AScore between two sites, using the depth where their scores differ most and only the
    /// fragments that differ between the two sites.
    fn score_pair(
        &self,
        first: &SiteScores,
        second: &SiteScores,
        length: usize,
        binomial: &mut BinomialTail,
        count_matches: &impl Fn(&[Fragment], usize) -> usize,
    ) -> Result<BTreeMap<usize, f64>, LocalisationError> {
        let depth = first
            .depth_scores
            .iter()
            .zip(&second.depth_scores)
            .map(|(a, b)| a - b)
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(0, |(depth, _)| depth);
        let (low, high) = (first.site.min(second.site), first.site.max(second.site));
        let p = self.random_match_probability(depth);
        let mut ln_p = |fragments: &[Fragment]| {
            let fragments = site_determining_fragments(fragments, length, low, high);
            self.precision.check_ln(binomial.ln_tail(
                fragments.len(),
                count_matches(&fragments, depth),
                p,
            ))
        };
        let (first_ln_p, second_ln_p) = (ln_p(&first.fragments)?, ln_p(&second.fragments)?);
        Ok(match first_ln_p.total_cmp(&second_ln_p) {
            std::cmp::Ordering::Equal => [(first.site, 0.0), (second.site, 0.0)].into(),
            std::cmp::Ordering::Less => {
                [(first.site, (phred(first_ln_p) - phred(second_ln_p)).abs())].into()
            }
            std::cmp::Ordering::Greater => {
                [(second.site, (phred(first_ln_p) - phred(second_ln_p)).abs())].into()
            }
        })
    }
}

/// `-10 log10 P` from `ln P`
fn phred(ln_p: f64) -> f64 {
    -10.0 * ln_p / std::f64::consts::LN_10
}

/// The backbone fragments that contain exactly one of the sites `low` and `high`
fn site_determining_fragments(
    fragments: &[Fragment],
    length: usize,
    low: usize,
    high: usize,
) -> Vec<Fragment> {
    fragments
        .iter()
        .filter(|fragment| match fragment.ion {
            FragmentType::PeptideFragment {
                kind,
                series_number,
            } => {
                let position = if kind.is_n_terminal() {
                    series_number
                } else {
                    length - series_number
                };
                low <= position && position < high
            }
            FragmentType::Precursor | FragmentType::Immonium(_) => false,
        })
        .cloned()
        .collect()
}
