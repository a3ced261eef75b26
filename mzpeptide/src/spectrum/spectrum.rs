use std::ops::Range;

use context_error::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    spectrum::{Peak, Precursor},
    system::MassOverCharge,
};

/// A centroided fragment spectrum. The peaks are sorted on m/z and every m/z occurs only once.
/// Deserialising goes through the same checks as [`Spectrum::new`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "UncheckedSpectrum")]
pub struct Spectrum {
    precursor: Precursor,
    peaks: Vec<Peak>,
}

/// The serialised form of a spectrum, before its peaks are checked
#[derive(Deserialize)]
struct UncheckedSpectrum {
    precursor: Precursor,
    peaks: Vec<Peak>,
}

impl TryFrom<UncheckedSpectrum> for Spectrum {
    type Error = String;
    fn try_from(value: UncheckedSpectrum) -> Result<Self, Self::Error> {
        Self::new(value.precursor, value.peaks).map_err(|err| err.get_long_description().to_string())
    }
}

impl Spectrum {
    /// Create a new spectrum, the peaks will be sorted on m/z.
    /// # Errors
    /// If any m/z or intensity is not finite, if any intensity is negative, or if an m/z occurs multiple times.
    pub fn new(
        precursor: Precursor,
        peaks: impl IntoIterator<Item = Peak>,
    ) -> Result<Self, BoxedError<'static, BasicKind>> {
        let mut peaks = peaks.into_iter().collect_vec();
        if let Some(peak) = peaks.iter().find(|p| {
            !p.mz.value.is_finite() || !p.intensity.is_finite() || p.intensity < 0.0
        }) {
            return Err(BoxedError::new(
                BasicKind::Error,
                "Invalid peak",
                format!(
                    "Peaks need a finite m/z and a finite non negative intensity, found m/z {} with intensity {}",
                    peak.mz.value, peak.intensity
                ),
                Context::none(),
            ));
        }
        peaks.sort_unstable_by(|a, b| a.mz.value.total_cmp(&b.mz.value));
        if let Some((a, _)) = peaks.iter().tuple_windows().find(|(a, b)| a.mz == b.mz) {
            return Err(BoxedError::new(
                BasicKind::Error,
                "Invalid spectrum",
                format!(
                    "Every m/z can only occur once in a spectrum, found m/z {} multiple times",
                    a.mz.value
                ),
                Context::none(),
            ));
        }
        Ok(Self { precursor, peaks })
    }

    /// Create a spectrum with the same precursor but with a subset of the peaks of this spectrum.
    /// The peaks are sorted and deduplicated on m/z.
    #[must_use]
    pub fn with_peaks(&self, peaks: impl IntoIterator<Item = Peak>) -> Self {
        let mut peaks = peaks.into_iter().collect_vec();
        peaks.sort_unstable_by(|a, b| a.mz.value.total_cmp(&b.mz.value));
        peaks.dedup_by(|a, b| a.mz == b.mz);
        Self {
            precursor: self.precursor,
            peaks,
        }
    }

    /// The precursor
    pub const fn precursor(&self) -> Precursor {
        self.precursor
    }

    /// All peaks, sorted on m/z
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// The number of peaks
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// If there are no peaks
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// The lowest m/z
    pub fn min_mz(&self) -> Option<MassOverCharge> {
        self.peaks.first().map(|p| p.mz)
    }

    /// The highest m/z
    pub fn max_mz(&self) -> Option<MassOverCharge> {
        self.peaks.last().map(|p| p.mz)
    }

    /// The highest intensity
    pub fn max_intensity(&self) -> Option<f64> {
        self.peaks.iter().map(|p| p.intensity).max_by(f64::total_cmp)
    }

    /// The indices of all peaks with `start <= mz < end`
    pub fn window_indices(&self, start: MassOverCharge, end: MassOverCharge) -> Range<usize> {
        let low = self.peaks.partition_point(|p| p.mz < start);
        let high = self.peaks.partition_point(|p| p.mz < end);
        low..high.max(low)
    }

    /// All peaks with `start <= mz < end`
    pub fn window(&self, start: MassOverCharge, end: MassOverCharge) -> &[Peak] {
        &self.peaks[self.window_indices(start, end)]
    }

    /// The indices of all peaks within `tolerance` of the given m/z (inclusive)
    pub fn matching_indices(
        &self,
        mz: MassOverCharge,
        tolerance: MassOverCharge,
    ) -> Range<usize> {
        let low = self.peaks.partition_point(|p| p.mz < mz - tolerance);
        let high = self.peaks.partition_point(|p| p.mz <= mz + tolerance);
        low..high.max(low)
    }
}
