use context_error::*;
use serde::{Deserialize, Serialize};

use crate::error::{LocalisationError, LocalisationErrorKind};

/// The numeric precision of probabilities, given in significant decimal digits. Probabilities
/// that fall outside of `0..=1` by no more than the resolution limit (`10^-digits`) are clamped,
/// anything further out is an error.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Precision {
    digits: u8,
}

impl Precision {
    /// The most digits a 64 bit float can honour
    pub const MAX_DIGITS: u8 = 15;

    /// Create a new precision
    /// # Errors
    /// If the number of digits is zero or more than [`Self::MAX_DIGITS`].
    pub fn new(digits: u8) -> Result<Self, LocalisationError> {
        if digits == 0 || digits > Self::MAX_DIGITS {
            Err(BoxedError::new(
                LocalisationErrorKind::Configuration,
                "Invalid precision",
                format!(
                    "The precision has to be between 1 and {} digits, not {digits}",
                    Self::MAX_DIGITS
                ),
                Context::none(),
            ))
        } else {
            Ok(Self { digits })
        }
    }

    /// The number of significant digits
    pub const fn digits(self) -> u8 {
        self.digits
    }

    /// The resolution limit `10^-digits`
    pub fn resolution_limit(self) -> f64 {
        10_f64.powi(-i32::from(self.digits))
    }

    /// Check that the given probability lies within `0..=1` up to the resolution limit, and clamp it into that range.
    /// # Errors
    /// If the probability is not a number or lies outside the range by more than the resolution limit.
    pub fn check(self, probability: f64) -> Result<f64, LocalisationError> {
        let limit = self.resolution_limit();
        if probability.is_nan() || probability < -limit || probability > 1.0 + limit {
            Err(BoxedError::new(
                LocalisationErrorKind::NumericInconsistency,
                "Probability out of range",
                format!(
                    "The probability {probability:e} lies outside of [0, 1] by more than the resolution limit {limit:e}"
                ),
                Context::none(),
            ))
        } else {
            Ok(probability.clamp(0.0, 1.0))
        }
    }

    /// Check a natural log probability, see [`Self::check`]. Returns the clamped log probability.
    /// # Errors
    /// If the probability is not a number or lies above one by more than the resolution limit.
    pub fn check_ln(self, ln_probability: f64) -> Result<f64, LocalisationError> {
        if ln_probability <= 0.0 {
            Ok(ln_probability)
        } else {
            self.check(ln_probability.exp()).map(f64::ln)
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self { digits: 12 }
    }
}

impl TryFrom<u8> for Precision {
    type Error = String;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).map_err(|err| err.get_long_description().to_string())
    }
}

impl From<Precision> for u8 {
    fn from(value: Precision) -> Self {
        value.digits
    }
}
