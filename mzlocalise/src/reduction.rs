use context_error::*;
use itertools::Itertools;
use mzpeptide::prelude::*;

use crate::error::{LocalisationError, LocalisationErrorKind};

/// The `count` most intense peaks, ties are broken on the lowest m/z. The result is sorted on m/z.
pub fn top_peaks(peaks: &[Peak], count: usize) -> Vec<Peak> {
    let mut top = ranked(peaks).take(count).copied().collect_vec();
    top.sort_unstable_by(|a, b| a.mz.value.total_cmp(&b.mz.value));
    top
}

/// All peaks ranked from most to least intense, ties are broken on the lowest m/z.
fn ranked(peaks: &[Peak]) -> impl Iterator<Item = &Peak> {
    peaks.iter().sorted_by(|a, b| {
        b.intensity
            .total_cmp(&a.intensity)
            .then(a.mz.value.total_cmp(&b.mz.value))
    })
}

/// Split the spectrum in windows of `width` Thomson starting at `origin` and keep only the `count`
/// most intense peaks in every window.
#[must_use]
pub fn top_peaks_per_window(
    spectrum: &Spectrum,
    origin: MassOverCharge,
    width: MassOverCharge,
    count: usize,
) -> Spectrum {
    let kept = spectrum
        .peaks()
        .iter()
        .chunk_by(|peak| ((peak.mz - origin) / width).value.floor() as i64)
        .into_iter()
        .flat_map(|(_, window)| top_peaks(&window.copied().collect_vec(), count))
        .collect_vec();
    spectrum.with_peaks(kept)
}

/// The reduced peak lists of a single window, index `i` holds the `i + 1` most intense peaks.
/// There are `min(max_depth, peaks.len())` depths and every depth contains the previous depth.
pub fn depth_spectra(peaks: &[Peak], max_depth: usize) -> Vec<Vec<Peak>> {
    let ranked = ranked(peaks).copied().collect_vec();
    (1..=max_depth.min(ranked.len()))
        .map(|depth| {
            let mut peaks = ranked[..depth].to_vec();
            peaks.sort_unstable_by(|a, b| a.mz.value.total_cmp(&b.mz.value));
            peaks
        })
        .collect()
}

/// Remove noise so that the chance of a random match stays below one. The spectrum is split in
/// windows of ten times the tolerance keeping the 10 most intense peaks in each, or for tolerances
/// above 10 Th in windows of 100 Th keeping `100 / tolerance` peaks. The tolerance is evaluated
/// at the highest m/z in the spectrum.
/// # Errors
/// If the tolerance is not positive, or if it is so wide that no peaks would be retained.
pub fn noise_filter(
    spectrum: &Spectrum,
    tolerance: Tolerance<MassOverCharge>,
) -> Result<Spectrum, LocalisationError> {
    let (Some(min), Some(max)) = (spectrum.min_mz(), spectrum.max_mz()) else {
        return Ok(spectrum.clone());
    };
    let tolerance = tolerance.absolute_at(max).value;
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(BoxedError::new(
            LocalisationErrorKind::Configuration,
            "Invalid tolerance",
            "The fragment tolerance has to be positive to filter a spectrum",
            Context::show(tolerance.to_string()),
        ));
    }
    let (window, cap) = if tolerance <= 10.0 {
        (10.0 * tolerance, 10)
    } else {
        (100.0, (100.0 / tolerance) as usize)
    };
    if cap < 1 {
        return Err(BoxedError::new(
            LocalisationErrorKind::Configuration,
            "All peaks removed by filtering",
            format!(
                "A fragment tolerance of {tolerance} Th is wider than the filter window of 100 Th"
            ),
            Context::none(),
        ));
    }
    Ok(top_peaks_per_window(spectrum, min, mz(window), cap))
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    fn spectrum(peaks: impl IntoIterator<Item = (f64, f64)>) -> Spectrum {
        Spectrum::new(
            Precursor::new(mz(1000.0), 2),
            peaks.into_iter().map(|(value, i)| Peak::new(mz(value), i)),
        )
        .unwrap()
    }

    #[test]
    fn depths_grow() {
        let peaks = [(100.0, 5.0), (110.0, 50.0), (120.0, 20.0), (130.0, 20.0), (140.0, 1.0)]
            .map(|(value, i)| Peak::new(mz(value), i));
        let depths = depth_spectra(&peaks, 8);
        assert_eq!(depths.len(), 5);
        for (index, depth) in depths.iter().enumerate() {
            assert!(depth.len() <= index + 1);
            if index > 0 {
                assert!(depths[index - 1].iter().all(|p| depth.contains(p)));
            }
        }
        assert_eq!(depths[0], vec![Peak::new(mz(110.0), 50.0)]);
        // Ties go to the lowest m/z
        assert_eq!(
            depths[1],
            vec![Peak::new(mz(110.0), 50.0), Peak::new(mz(120.0), 20.0)]
        );
        assert_eq!(depth_spectra(&peaks, 3).len(), 3);
        assert!(depth_spectra(&[], 8).is_empty());
    }

    #[test]
    fn windows() {
        let spectrum = spectrum((0..40).map(|i| (150.0 + f64::from(i) * 10.0, f64::from(i % 7))));
        let reduced = top_peaks_per_window(&spectrum, mz(0.0), mz(100.0), 3);
        for window in 0..6 {
            let start = f64::from(window) * 100.0;
            assert!(reduced.window(mz(start), mz(start + 100.0)).len() <= 3);
        }
        assert_eq!(reduced.window(mz(100.0), mz(200.0)).len(), 3);
    }

    #[test]
    fn noise_filter_caps() {
        // 30 peaks in a 10 Th window (tolerance 1 Th)
        let spectrum = spectrum((0..30).map(|i| (200.0 + f64::from(i) * 0.3, f64::from(i))));
        let filtered = noise_filter(&spectrum, Tolerance::new_absolute(mz(1.0))).unwrap();
        assert_eq!(filtered.len(), 10);
        assert!(filtered.peaks().iter().all(|p| p.intensity >= 20.0));

        let wide = noise_filter(&spectrum, Tolerance::new_absolute(mz(20.0))).unwrap();
        assert_eq!(wide.len(), 5);

        assert_eq!(
            noise_filter(&spectrum, Tolerance::new_absolute(mz(200.0)))
                .unwrap_err()
                .get_kind(),
            LocalisationErrorKind::Configuration
        );
        assert!(noise_filter(&spectrum, Tolerance::new_absolute(mz(0.0))).is_err());
        assert!(
            noise_filter(&Spectrum::default(), Tolerance::new_absolute(mz(0.0)))
                .unwrap()
                .is_empty()
        );
    }
}
