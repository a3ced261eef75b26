use serde::{Deserialize, Serialize};

use crate::{
    annotation::{AnnotationParameters, SpecificAnnotationParameters, TieBreaking},
    fragment::Fragment,
    sequence::Peptide,
    spectrum::{Peak, Spectrum},
};

/// A theoretical fragment matched to an observed peak
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IonMatch {
    /// The theoretical fragment
    pub fragment: Fragment,
    /// The matched peak
    pub peak: Peak,
}

/// Something that can generate theoretical fragments for a peptide and match them against a spectrum.
pub trait SpectrumAnnotator {
    /// Generate all theoretical fragments for this peptide.
    fn fragments(&self, peptide: &Peptide, parameters: &SpecificAnnotationParameters) -> Vec<Fragment>;

    /// Match the given fragments to the peaks in the spectrum, every fragment is matched to at most one peak.
    fn match_fragments(
        &self,
        fragments: &[Fragment],
        spectrum: &Spectrum,
        parameters: &AnnotationParameters,
        specific_parameters: &SpecificAnnotationParameters,
    ) -> Vec<IonMatch>;

    /// Generate the fragments for this peptide and match them against the spectrum.
    fn annotate(
        &self,
        peptide: &Peptide,
        spectrum: &Spectrum,
        parameters: &AnnotationParameters,
        specific_parameters: &SpecificAnnotationParameters,
    ) -> Vec<IonMatch> {
        let fragments = self.fragments(peptide, specific_parameters);
        self.match_fragments(&fragments, spectrum, parameters, specific_parameters)
    }
}

/// The default annotator, using [`Fragment::generate`] for fragment generation.
#[derive(Clone, Copy, Debug, Default)]
pub struct PeptideSpectrumAnnotator;

impl SpectrumAnnotator for PeptideSpectrumAnnotator {
    fn fragments(&self, peptide: &Peptide, parameters: &SpecificAnnotationParameters) -> Vec<Fragment> {
        Fragment::generate(peptide, parameters)
    }

    fn match_fragments(
        &self,
        fragments: &[Fragment],
        spectrum: &Spectrum,
        parameters: &AnnotationParameters,
        specific_parameters: &SpecificAnnotationParameters,
    ) -> Vec<IonMatch> {
        let threshold = spectrum.max_intensity().unwrap_or_default() * parameters.intensity_limit;
        fragments
            .iter()
            .filter_map(|fragment| {
                let tolerance = specific_parameters.fragment_tolerance.absolute_at(fragment.mz);
                let candidates = spectrum.peaks()[spectrum.matching_indices(fragment.mz, tolerance)]
                    .iter()
                    .filter(|peak| peak.intensity >= threshold);
                let peak = match parameters.tie_breaking {
                    TieBreaking::MostIntense => {
                        candidates.max_by(|a, b| a.intensity.total_cmp(&b.intensity))
                    }
                    TieBreaking::MostAccurate => candidates.min_by(|a, b| {
                        (a.mz - fragment.mz)
                            .value
                            .abs()
                            .total_cmp(&(b.mz - fragment.mz).value.abs())
                    }),
                }?;
                Some(IonMatch {
                    fragment: fragment.clone(),
                    peak: *peak,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::{
        chemistry::PROTON,
        fragment::{FragmentKind, FragmentType},
        spectrum::Precursor,
        system::mz,
        tolerance::Tolerance,
    };

    #[test]
    fn match_b_and_y() {
        let peptide = Peptide::new("PEPTIDE").unwrap();
        let parameters = SpecificAnnotationParameters::default();
        let fragments = PeptideSpectrumAnnotator.fragments(&peptide, &parameters);
        // b1..b6 and y1..y6
        assert_eq!(fragments.len(), 12);
        let b2 = fragments
            .iter()
            .find(|f| {
                f.ion
                    == FragmentType::PeptideFragment {
                        kind: FragmentKind::B,
                        series_number: 2,
                    }
            })
            .unwrap();
        assert!((b2.mz.value - 227.102_635).abs() < 1e-3);
        let y1 = fragments
            .iter()
            .find(|f| {
                f.ion
                    == FragmentType::PeptideFragment {
                        kind: FragmentKind::Y,
                        series_number: 1,
                    }
            })
            .unwrap();
        assert!((y1.mz.value - (129.042_59 + 18.010_565 + PROTON.value)).abs() < 1e-6);

        let spectrum = Spectrum::new(
            Precursor::new(mz(400.69), 2),
            [
                Peak::new(mz(227.2), 10.0),
                Peak::new(mz(227.0), 20.0),
                Peak::new(y1.mz + mz(0.01), 5.0),
                Peak::new(mz(500.0), 100.0),
            ],
        )
        .unwrap();
        let matches = PeptideSpectrumAnnotator.match_fragments(
            &fragments,
            &spectrum,
            &AnnotationParameters::default(),
            &parameters,
        );
        assert_eq!(matches.len(), 2);
        let b2_match = matches.iter().find(|m| m.fragment == *b2).unwrap();
        assert!((b2_match.peak.mz.value - 227.0).abs() < f64::EPSILON);

        let accurate = PeptideSpectrumAnnotator.match_fragments(
            &fragments,
            &spectrum,
            &AnnotationParameters::default().tie_breaking(TieBreaking::MostAccurate),
            &parameters,
        );
        let b2_match = accurate.iter().find(|m| m.fragment == *b2).unwrap();
        assert!((b2_match.peak.mz.value - 227.2).abs() < f64::EPSILON);

        let limited = PeptideSpectrumAnnotator.match_fragments(
            &fragments,
            &spectrum,
            &AnnotationParameters::default().intensity_limit(0.1),
            &parameters,
        );
        assert_eq!(limited.len(), 1);

        let narrow = PeptideSpectrumAnnotator.annotate(
            &peptide,
            &spectrum,
            &AnnotationParameters::default(),
            &parameters.fragment_tolerance(Tolerance::new_ppm(1.0)),
        );
        assert!(narrow.is_empty());
    }
}
