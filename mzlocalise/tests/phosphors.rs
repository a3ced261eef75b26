//! PhosphoRS localisation on synthetic spectra
use mzlocalise::prelude::*;
use mzpeptide::{parse_json::ParseJson, prelude::*};

fn test_modification() -> Modification {
    Modification::new("TestMod", da(42.010_565), "EI", ModificationPosition::Anywhere)
}

/// A spectrum with all b (except b1) and y ions of the given peptide at equal intensity
fn spectrum_of(peptide: &Peptide) -> Spectrum {
    let fragments =
        PeptideSpectrumAnnotator.fragments(peptide, &SpecificAnnotationParameters::default());
    Spectrum::new(
        Precursor::new(mz(peptide.mass().value / 2.0 + 1.007_276), 2),
        fragments
            .iter()
            .filter(|f| {
                f.ion
                    != FragmentType::PeptideFragment {
                        kind: FragmentKind::B,
                        series_number: 1,
                    }
            })
            .map(|f| Peak::new(f.mz, 100.0)),
    )
    .unwrap()
}

fn score(
    phosphors: &PhosphoRs,
    peptide: &Peptide,
    modifications: &[Modification],
    spectrum: &Spectrum,
    tolerance: Tolerance<MassOverCharge>,
) -> Result<SiteLocalisation, LocalisationError> {
    phosphors.score(
        peptide,
        modifications,
        spectrum,
        &AnnotationParameters::default(),
        &SpecificAnnotationParameters::default().fragment_tolerance(tolerance),
        &PeptideSpectrumAnnotator,
    )
}

#[test]
fn supported_site_wins() {
    let base = Peptide::new("PEPTIDES").unwrap();
    let truth = base.clone().with_modification(test_modification(), 5, true).unwrap();
    let input = base.with_modification(test_modification(), 2, true).unwrap();
    let spectrum = spectrum_of(&truth);

    let result = score(
        &PhosphoRs::default(),
        &input,
        &[test_modification()],
        &spectrum,
        Tolerance::new_absolute(mz(0.5)),
    )
    .unwrap();
    let sites = result.site_probabilities();
    assert_eq!(sites.keys().copied().collect::<Vec<_>>(), vec![2, 5, 7]);
    assert!((sites.values().sum::<f64>() - 100.0).abs() < 1e-6);
    assert!(sites.values().all(|p| (0.0..=100.0).contains(p)));
    assert!(sites[&5] > sites[&7]);
    assert!(sites[&5] > sites[&2]);
    assert_eq!(result.best_site().map(|(site, _)| site), Some(5));
    assert!(!result.is_unambiguous());

    let SiteLocalisation::Scored { profiles, .. } = &result else {
        panic!("Expected a scored localisation");
    };
    assert_eq!(profiles.len(), 3);
    assert!((profiles.iter().map(|p| p.percentage).sum::<f64>() - 100.0).abs() < 1e-6);

    // Independent of the initial placement
    let other_input = Peptide::new("PEPTIDES")
        .unwrap()
        .with_modification(test_modification(), 7, true)
        .unwrap();
    let other = score(
        &PhosphoRs::default(),
        &other_input,
        &[test_modification()],
        &spectrum,
        Tolerance::new_absolute(mz(0.5)),
    )
    .unwrap();
    assert_eq!(other.best_site().map(|(site, _)| site), Some(5));
}

#[test]
fn deterministic() {
    let peptide = Peptide::new("PEPTSIDE")
        .unwrap()
        .with_modification(Modification::phospho(), 4, true)
        .unwrap();
    let spectrum = spectrum_of(&peptide);
    let run = || {
        score(
            &PhosphoRs::default(),
            &peptide,
            &[Modification::phospho()],
            &spectrum,
            Tolerance::new_absolute(mz(0.5)),
        )
        .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn no_evidence_gives_equal_sites() {
    let peptide = Peptide::new("PEPTIDES")
        .unwrap()
        .with_modification(test_modification(), 2, true)
        .unwrap();
    let spectrum = Spectrum::new(
        Precursor::new(mz(500.0), 2),
        [Peak::new(mz(1500.0), 10.0), Peak::new(mz(1600.0), 20.0)],
    )
    .unwrap();
    let empty = Spectrum::new(Precursor::new(mz(500.0), 2), Vec::new()).unwrap();
    for spectrum in [spectrum, empty] {
        let sites = score(
            &PhosphoRs::default(),
            &peptide,
            &[test_modification()],
            &spectrum,
            Tolerance::new_absolute(mz(0.5)),
        )
        .unwrap()
        .site_probabilities();
        assert_eq!(sites.len(), 3);
        for p in sites.values() {
            assert!((p - 100.0 / 3.0).abs() < 1e-6);
        }
    }
}

#[test]
fn two_modifications() {
    let base = Peptide::new("PEPTSIDES").unwrap();
    let truth = base
        .clone()
        .with_modification(Modification::phospho(), 4, true)
        .unwrap()
        .with_modification(Modification::phospho(), 5, true)
        .unwrap();
    let input = base
        .with_modification(Modification::phospho(), 5, true)
        .unwrap()
        .with_modification(Modification::phospho(), 9, true)
        .unwrap();
    let result = score(
        &PhosphoRs::default(),
        &input,
        &[Modification::phospho()],
        &spectrum_of(&truth),
        Tolerance::new_absolute(mz(0.5)),
    )
    .unwrap();
    let sites = result.site_probabilities();
    assert_eq!(sites.keys().copied().collect::<Vec<_>>(), vec![4, 5, 9]);
    assert!((sites.values().sum::<f64>() - 200.0).abs() < 1e-6);
    assert!(sites.values().all(|p| (0.0..=100.0 + 1e-9).contains(p)));
    assert!(sites[&9] < sites[&4]);
    assert!(sites[&9] < sites[&5]);
}

#[test]
fn unambiguous() {
    let peptide = Peptide::new("PEPTIDE")
        .unwrap()
        .with_modification(Modification::phospho(), 4, true)
        .unwrap();
    let spectrum = spectrum_of(&peptide);
    let result = score(
        &PhosphoRs::default(),
        &peptide,
        &[Modification::phospho()],
        &spectrum,
        Tolerance::new_absolute(mz(0.5)),
    )
    .unwrap();
    assert!(result.is_unambiguous());
    assert_eq!(result.site_probabilities(), [(4, 100.0)].into());
}

#[test]
fn relative_tolerance() {
    let peptide = Peptide::new("PEPTSIDE")
        .unwrap()
        .with_modification(Modification::phospho(), 4, true)
        .unwrap();
    let result = score(
        &PhosphoRs::default(),
        &peptide,
        &[Modification::phospho()],
        &spectrum_of(&peptide),
        Tolerance::new_ppm(20.0),
    )
    .unwrap();
    assert_eq!(result.best_site().map(|(site, _)| site), Some(4));
    assert!((result.site_probabilities().values().sum::<f64>() - 100.0).abs() < 1e-6);
}

#[test]
fn neutral_losses() {
    let peptide = Peptide::new("PEPTSIDE")
        .unwrap()
        .with_modification(Modification::phospho(), 4, true)
        .unwrap();
    let parameters = SpecificAnnotationParameters::default()
        .neutral_losses([NeutralLoss::water(), NeutralLoss::phosphoric_acid()]);
    let fragments = PeptideSpectrumAnnotator.fragments(&peptide, &parameters);
    assert!(
        fragments
            .iter()
            .any(|f| f.neutral_loss == Some(NeutralLoss::phosphoric_acid()))
    );
    let spectrum = Spectrum::new(
        Precursor::new(mz(peptide.mass().value / 2.0 + 1.007_276), 2),
        fragments.iter().map(|f| Peak::new(f.mz, 100.0)),
    )
    .unwrap();
    let result = PhosphoRs::default()
        .account_neutral_losses(true)
        .score(
            &peptide,
            &[Modification::phospho()],
            &spectrum,
            &AnnotationParameters::default(),
            &parameters,
            &PeptideSpectrumAnnotator,
        )
        .unwrap();
    assert_eq!(result.best_site().map(|(site, _)| site), Some(4));
    assert!((result.site_probabilities().values().sum::<f64>() - 100.0).abs() < 1e-6);
}

#[test]
fn invalid_input() {
    let unmodified = Peptide::new("PEPTSIDE").unwrap();
    let spectrum = spectrum_of(&unmodified);
    let phospho = [Modification::phospho()];
    let kind = |result: Result<SiteLocalisation, LocalisationError>| result.unwrap_err().get_kind();

    // No modification on the peptide
    assert_eq!(
        kind(score(&PhosphoRs::default(), &unmodified, &phospho, &spectrum, Tolerance::default())),
        LocalisationErrorKind::InvalidInput
    );
    // No modifications to localise
    let modified = unmodified
        .with_modification(Modification::phospho(), 4, true)
        .unwrap();
    assert_eq!(
        kind(score(&PhosphoRs::default(), &modified, &[], &spectrum, Tolerance::default())),
        LocalisationErrorKind::InvalidInput
    );
    // Different masses
    assert_eq!(
        kind(score(
            &PhosphoRs::default(),
            &modified,
            &[Modification::phospho(), Modification::oxidation()],
            &spectrum,
            Tolerance::default()
        )),
        LocalisationErrorKind::InvalidInput
    );
    // More modifications than sites
    let crowded = Peptide::new("PEPTIDE")
        .unwrap()
        .with_modification(Modification::phospho(), 4, true)
        .unwrap()
        .with_modification(Modification::phospho(), 2, true)
        .unwrap();
    assert_eq!(
        kind(score(&PhosphoRs::default(), &crowded, &phospho, &spectrum, Tolerance::default())),
        LocalisationErrorKind::InvalidInput
    );
    // Unusable settings
    assert_eq!(
        kind(score(
            &PhosphoRs::default(),
            &modified,
            &phospho,
            &spectrum,
            Tolerance::new_absolute(mz(0.0))
        )),
        LocalisationErrorKind::Configuration
    );
    assert_eq!(
        kind(score(
            &PhosphoRs::default().min_depth(4).max_depth(2),
            &modified,
            &phospho,
            &spectrum,
            Tolerance::default()
        )),
        LocalisationErrorKind::Configuration
    );
    assert_eq!(
        kind(score(
            &PhosphoRs::default(),
            &modified,
            &phospho,
            &spectrum,
            Tolerance::new_absolute(mz(150.0))
        )),
        LocalisationErrorKind::Configuration
    );
}

#[test]
fn parameters_from_json() {
    let parameters =
        PhosphoRs::from_json(r#"{"window_size": 50.0, "max_depth": 6, "precision": 10}"#).unwrap();
    assert_eq!(
        parameters,
        PhosphoRs::default()
            .window_size(mz(50.0))
            .max_depth(6)
            .precision(Precision::new(10).unwrap())
    );
    assert!(PhosphoRs::from_json(r#"{"min_depth": 0}"#).is_err());
    assert!(PhosphoRs::from_json(r#"{"precision": 16}"#).is_err());
    assert!(PhosphoRs::from_json(r#"{"window_size": -1.0}"#).is_err());
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_matches_sequential() {
    let matches = [4, 5]
        .map(|site| {
            let peptide = Peptide::new("PEPTSIDE")
                .unwrap()
                .with_modification(Modification::phospho(), site, true)
                .unwrap();
            let spectrum = spectrum_of(&peptide);
            (peptide, spectrum)
        })
        .to_vec();
    let parameters = SpecificAnnotationParameters::default();
    let parallel = PhosphoRs::default().score_all(
        &matches,
        &[Modification::phospho()],
        &AnnotationParameters::default(),
        &parameters,
        &PeptideSpectrumAnnotator,
    );
    for ((peptide, spectrum), result) in matches.iter().zip(parallel) {
        assert_eq!(
            result.unwrap(),
            score(
                &PhosphoRs::default(),
                peptide,
                &[Modification::phospho()],
                spectrum,
                parameters.fragment_tolerance
            )
            .unwrap()
        );
    }
}
