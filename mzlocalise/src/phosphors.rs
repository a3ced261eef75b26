//! The PhosphoRS algorithm (Taus et al., J. Proteome Res. 2011) for localising modifications
//! based on the binomial probability of the fragment matches being random.

use std::collections::BTreeMap;

use context_error::*;
use itertools::Itertools;
use mzpeptide::{parse_json::use_serde, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    binomial::{BinomialTail, random_match_probability},
    candidates::{LocalisationProblem, scoring_parameters},
    error::{LocalisationError, LocalisationErrorKind},
    normalise::{ProfileScore, normalise},
    precision::Precision,
    profiles::site_profiles,
    reduction::{depth_spectra, noise_filter},
    site_determining::SiteDeterminingIons,
};

/// The outcome of a PhosphoRS localisation
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum SiteLocalisation {
    /// There are exactly as many possible sites as modifications, all sites are occupied
    Unambiguous {
        /// The occupied sites
        sites: Vec<usize>,
    },
    /// The sites were scored
    Scored {
        /// The percentage for every possible site, summing to 100 times the number of modifications
        sites: BTreeMap<usize, f64>,
        /// The score of every placement profile
        profiles: Vec<ProfileScore>,
    },
}

impl SiteLocalisation {
    /// The percentage for every possible site
    pub fn site_probabilities(&self) -> BTreeMap<usize, f64> {
        match self {
            Self::Unambiguous { sites } => sites.iter().map(|site| (*site, 100.0)).collect(),
            Self::Scored { sites, .. } => sites.clone(),
        }
    }

    /// The site with the highest percentage, the lowest site wins ties
    pub fn best_site(&self) -> Option<(usize, f64)> {
        self.site_probabilities()
            .into_iter()
            .rev()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// If no scoring was needed
    pub const fn is_unambiguous(&self) -> bool {
        matches!(self, Self::Unambiguous { .. })
    }
}

/// The PhosphoRS parameters
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct PhosphoRs {
    /// The width of the windows in which the best peak depth is determined
    pub window_size: MassOverCharge,
    /// The maximal number of peaks retained per window
    pub max_depth: usize,
    /// The minimal number of peaks retained per window, when the window holds that many peaks
    /// and has site determining ions
    pub min_depth: usize,
    /// The numeric precision of the probabilities
    pub precision: Precision,
    /// If neutral losses are part of the scored fragments
    pub account_neutral_losses: bool,
}

impl Default for PhosphoRs {
    fn default() -> Self {
        Self {
            window_size: mz(100.0),
            max_depth: 8,
            min_depth: 1,
            precision: Precision::default(),
            account_neutral_losses: false,
        }
    }
}

impl ParseJson for PhosphoRs {
    fn from_json_value(value: serde_json::Value) -> Result<Self, BoxedError<'static, BasicKind>> {
        let parameters: Self = use_serde(value)?;
        parameters.validate().map_err(|err| {
            err.convert::<BasicKind, BoxedError<'static, BasicKind>>(|_| BasicKind::Error)
        })?;
        Ok(parameters)
    }
}

impl PhosphoRs {
    /// Set the window size
    #[must_use]
    pub fn window_size(self, window_size: MassOverCharge) -> Self {
        Self {
            window_size,
            ..self
        }
    }
    /// Set the maximal depth
    #[must_use]
    pub fn max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }
    /// Set the minimal depth
    #[must_use]
    pub fn min_depth(self, min_depth: usize) -> Self {
        Self { min_depth, ..self }
    }
    /// Set the precision
    #[must_use]
    pub fn precision(self, precision: Precision) -> Self {
        Self { precision, ..self }
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
    /// If the window size is not positive, or if the depths are zero or the minimal depth exceeds the maximal depth.
    pub fn validate(&self) -> Result<(), LocalisationError> {
        if !self.window_size.value.is_finite() || self.window_size.value <= 0.0 {
            return Err(BoxedError::new(
                LocalisationErrorKind::Configuration,
                "Invalid window size",
                "The PhosphoRS window size has to be a positive number",
                Context::show(self.window_size.value.to_string()),
            ));
        }
        if self.min_depth == 0 || self.max_depth < self.min_depth {
            return Err(BoxedError::new(
                LocalisationErrorKind::Configuration,
                "Invalid depth",
                format!(
                    "The PhosphoRS depths have to satisfy 1 <= minimal depth ({}) <= maximal depth ({})",
                    self.min_depth, self.max_depth
                ),
                Context::none(),
            ));
        }
        Ok(())
    }

    /// Localise the given modifications on the peptide. The peptide has to carry the
    /// modifications as variable modifications, their number is the number of modifications to
    /// place. All given modifications need to have the same mass, they are treated as
    /// indistinguishable. The result has a percentage for every possible site.
    /// # Errors
    /// * [`LocalisationErrorKind::Configuration`] if these parameters or the fragment tolerance are invalid.
    /// * [`LocalisationErrorKind::InvalidInput`] if the peptide and modifications cannot be localised, see [`SiteLocalisation`].
    /// * [`LocalisationErrorKind::NumericInconsistency`] if a probability fell out of range.
    /// * [`LocalisationErrorKind::MissingSiteScore`] if a possible site did not receive a score.
    pub fn score(
        &self,
        peptide: &Peptide,
        modifications: &[Modification],
        spectrum: &Spectrum,
        annotation_parameters: &AnnotationParameters,
        specific_parameters: &SpecificAnnotationParameters,
        annotator: &impl SpectrumAnnotator,
    ) -> Result<SiteLocalisation, LocalisationError> {
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
        debug!(
            peptide = %peptide,
            sites = ?problem.possible_sites,
            modifications = ?problem.names,
            count = problem.count,
            "PhosphoRS localisation"
        );
        if problem.is_unambiguous() {
            return Ok(SiteLocalisation::Unambiguous {
                sites: problem.possible_sites,
            });
        }

        let parameters = scoring_parameters(
            specific_parameters,
            modifications,
            self.account_neutral_losses,
            mass_tolerance,
        );
        let profiles = site_profiles(&problem.possible_sites, problem.count);
        let fragments = profiles
            .iter()
            .map(|profile| {
                problem
                    .candidate(profile)
                    .map(|candidate| annotator.fragments(&candidate, &parameters))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut scorer = Scorer {
            annotator,
            annotation_parameters,
            parameters: &parameters,
            precision: self.precision,
            binomial: BinomialTail::new(),
        };
        let filtered = noise_filter(spectrum, tolerance)?;
        let site_determining = SiteDeterminingIons::new(&fragments);
        let input_fragments = annotator.fragments(peptide, &parameters);
        let reduced = self.reduce(
            &filtered,
            &fragments,
            &input_fragments,
            &site_determining,
            &mut scorer,
        )?;

        let (min, max) = (
            filtered.min_mz().unwrap_or_default(),
            filtered.max_mz().unwrap_or_default(),
        );
        let width = max - min;
        let p = random_match_probability(
            tolerance.absolute_at(min + width * 0.5).value,
            reduced.len(),
            width.value,
        );
        let ln_probabilities = fragments
            .iter()
            .map(|fragments| scorer.ln_probability(fragments, &reduced, p))
            .collect::<Result<Vec<_>, _>>()?;
        let (sites, profiles) = normalise(
            &profiles,
            &ln_probabilities,
            &problem.possible_sites,
            self.precision,
        )?;
        debug!(
            peptide = %peptide,
            reduced_peaks = reduced.len(),
            p,
            sites = ?sites,
            "PhosphoRS scored"
        );
        Ok(SiteLocalisation::Scored { sites, profiles })
    }

    /// Localise the modifications on many independent peptide spectrum matches in parallel, see [`Self::score`].
    #[cfg(feature = "rayon")]
    pub fn score_all(
        &self,
        matches: &[(Peptide, Spectrum)],
        modifications: &[Modification],
        annotation_parameters: &AnnotationParameters,
        specific_parameters: &SpecificAnnotationParameters,
        annotator: &(impl SpectrumAnnotator + Sync),
    ) -> Vec<Result<SiteLocalisation, LocalisationError>> {
        use rayon::prelude::*;
        matches
            .par_iter()
            .map(|(peptide, spectrum)| {
                self.score(
                    peptide,
                    modifications,
                    spectrum,
                    annotation_parameters,
                    specific_parameters,
                    annotator,
                )
            })
            .collect()
    }

    /// Build the spectrum with, for every window, the peak depth that best separates the profiles.
    fn reduce<A: SpectrumAnnotator>(
        &self,
        filtered: &Spectrum,
        fragments: &[Vec<Fragment>],
        input_fragments: &[Fragment],
        site_determining: &SiteDeterminingIons,
        scorer: &mut Scorer<'_, A>,
    ) -> Result<Spectrum, LocalisationError> {
        let (Some(min), Some(max)) = (filtered.min_mz(), filtered.max_mz()) else {
            return Ok(filtered.clone());
        };
        let mut kept = Vec::new();
        let mut start = min;
        while start <= max {
            let end = start + self.window_size;
            if end <= start {
                break;
            }
            let depths = depth_spectra(filtered.window(start, end), self.max_depth);
            if !depths.is_empty() {
                let tolerance = scorer
                    .parameters
                    .fragment_tolerance
                    .absolute_at(start + self.window_size * 0.5)
                    .value;
                let depths = depths
                    .into_iter()
                    .map(|peaks| {
                        let p = random_match_probability(
                            tolerance,
                            peaks.len(),
                            self.window_size.value,
                        );
                        (filtered.with_peaks(peaks), p)
                    })
                    .collect_vec();
                let chosen = match site_determining.window_groups(start, end, fragments.len()) {
                    Some(groups) => {
                        let representatives = groups.iter().map(|g| &fragments[*g][..]).collect_vec();
                        self.most_discriminating_depth(&depths, &representatives, scorer)?
                    }
                    None => Self::most_significant_depth(&depths, input_fragments, scorer)?,
                };
                trace!(
                    start = start.value,
                    end = end.value,
                    depth = chosen + 1,
                    "PhosphoRS window"
                );
                kept.extend_from_slice(depths[chosen].0.peaks());
            }
            start = end;
        }
        Ok(filtered.with_peaks(kept))
    }

    /// The depth index with the largest separation between the profile groups. The separations
    /// are the differences between consecutive probabilities sorted descending, the first
    /// difference that is positive for any depth decides, and the first depth wins ties.
    fn most_discriminating_depth<A: SpectrumAnnotator>(
        &self,
        depths: &[(Spectrum, f64)],
        representatives: &[&[Fragment]],
        scorer: &mut Scorer<'_, A>,
    ) -> Result<usize, LocalisationError> {
        let mut deltas = Vec::with_capacity(depths.len());
        for (spectrum, p) in depths {
            let mut probabilities = representatives
                .iter()
                .map(|fragments| scorer.ln_probability(fragments, spectrum, *p).map(f64::exp))
                .collect::<Result<Vec<_>, _>>()?;
            probabilities.sort_unstable_by(|a, b| b.total_cmp(a));
            deltas.push(probabilities.windows(2).map(|w| w[0] - w[1]).collect_vec());
        }

        let longest = deltas.iter().map(Vec::len).max().unwrap_or_default();
        let mut best = None;
        for j in 0..longest {
            let mut largest = 0.0;
            for (i, delta) in deltas.iter().enumerate() {
                if let Some(delta) = delta.get(j) {
                    if *delta > largest {
                        largest = *delta;
                        best = Some(i);
                    }
                }
            }
            if best.is_some() {
                break;
            }
        }

        let index = best.unwrap_or_else(|| {
            let fallback = self.max_depth.min(depths.len() - 1);
            trace!(depth = fallback + 1, "PhosphoRS window without separation");
            fallback
        });
        Ok(
            if index < self.min_depth - 1 && self.min_depth - 1 < depths.len() {
                self.min_depth - 1
            } else {
                index.min(self.max_depth - 1)
            },
        )
    }

    /// The depth index at which the input peptide has the lowest probability, the shallowest depth wins ties.
    fn most_significant_depth<A: SpectrumAnnotator>(
        depths: &[(Spectrum, f64)],
        fragments: &[Fragment],
        scorer: &mut Scorer<'_, A>,
    ) -> Result<usize, LocalisationError> {
        let mut best = (0, f64::INFINITY);
        for (index, (spectrum, p)) in depths.iter().enumerate() {
            let ln_p = scorer.ln_probability(fragments, spectrum, *p)?;
            if ln_p < best.1 {
                best = (index, ln_p);
            }
        }
        Ok(best.0)
    }
}

/// The shared state while scoring one peptide spectrum match
struct Scorer<'a, A: SpectrumAnnotator> {
    annotator: &'a A,
    annotation_parameters: &'a AnnotationParameters,
    parameters: &'a SpecificAnnotationParameters,
    precision: Precision,
    binomial: BinomialTail,
}

impl<A: SpectrumAnnotator> Scorer<'_, A> {
    /// `ln P(X >= k)` with `k` the number of fragments matched in the spectrum, `n` the number
    /// of fragments, and `p` the chance of a random match.
    fn ln_probability(
        &mut self,
        fragments: &[Fragment],
        spectrum: &Spectrum,
        p: f64,
    ) -> Result<f64, LocalisationError> {
        let k = self
            .annotator
            .match_fragments(fragments, spectrum, self.annotation_parameters, self.parameters)
            .len();
        self.precision
            .check_ln(self.binomial.ln_tail(fragments.len(), k, p))
    }
}
