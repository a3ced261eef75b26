//! Fragment generation for modified peptides
use mzpeptide::prelude::*;

fn fragment<'a>(fragments: &'a [Fragment], kind: FragmentKind, series_number: usize) -> &'a Fragment {
    fragments
        .iter()
        .find(|f| {
            f.ion
                == FragmentType::PeptideFragment {
                    kind,
                    series_number,
                }
                && f.neutral_loss.is_none()
        })
        .unwrap()
}

#[test]
fn modification_shifts_fragments() {
    let base = Peptide::new("PEPTSIDE").unwrap();
    let on_t = base.clone().with_modification(Modification::phospho(), 4, true).unwrap();
    let on_s = base.with_modification(Modification::phospho(), 5, true).unwrap();
    let parameters = SpecificAnnotationParameters::default();
    let t = PeptideSpectrumAnnotator.fragments(&on_t, &parameters);
    let s = PeptideSpectrumAnnotator.fragments(&on_s, &parameters);

    // b4 only carries the modification when it is on T
    let shift = fragment(&t, FragmentKind::B, 4).mz - fragment(&s, FragmentKind::B, 4).mz;
    assert!((shift.value - 79.966_331).abs() < 1e-6);
    // b5 carries it in both cases
    assert!(
        (fragment(&t, FragmentKind::B, 5).mz - fragment(&s, FragmentKind::B, 5).mz)
            .value
            .abs()
            < 1e-6
    );
    // y4 (SIDE) only carries it when it is on S
    let shift = fragment(&s, FragmentKind::Y, 4).mz - fragment(&t, FragmentKind::Y, 4).mz;
    assert!((shift.value - 79.966_331).abs() < 1e-6);
}

#[test]
fn charges_losses_and_other_ions() {
    let peptide = Peptide::new("PEPTSIDE")
        .unwrap()
        .with_modification(Modification::phospho(), 5, true)
        .unwrap();
    let parameters = SpecificAnnotationParameters::default()
        .fragment_charges([1, 2])
        .peptide_fragments([FragmentKind::B])
        .neutral_losses([NeutralLoss::phosphoric_acid()])
        .precursor_ions(true)
        .immonium_ions(true)
        .precursor_charge(3);
    let fragments = PeptideSpectrumAnnotator.fragments(&peptide, &parameters);
    let b7_single = fragment(&fragments, FragmentKind::B, 7);
    let b7_double = fragments
        .iter()
        .find(|f| {
            f.ion
                == FragmentType::PeptideFragment {
                    kind: FragmentKind::B,
                    series_number: 7,
                }
                && f.charge == 2
                && f.neutral_loss.is_none()
        })
        .unwrap();
    assert!(((b7_single.mz.value + 1.007_276_4) / 2.0 - b7_double.mz.value).abs() < 1e-9);
    // Only b5 and up contain the phosphorylated serine, so 3 loss fragments per charge
    assert_eq!(
        fragments.iter().filter(|f| f.neutral_loss.is_some()).count(),
        6
    );
    assert_eq!(
        fragments
            .iter()
            .filter(|f| f.ion.ion_type() == IonType::Precursor)
            .count(),
        3
    );
    // P E T S I D
    assert_eq!(
        fragments
            .iter()
            .filter(|f| f.ion.ion_type() == IonType::Immonium)
            .count(),
        6
    );
}
