use serde::{Deserialize, Serialize};

use crate::system::{MassOverCharge, Ratio, mz, ppm, thomson};

/// A tolerance around a given value for searching purposes
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum Tolerance<T> {
    /// An absolute tolerance defined by a constant offset from the value (bounds are `value - offset` and `value + offset`)
    Absolute(T),
    /// A relative tolerance defined by a ratio of the value (bounds are `value - value * ratio` and `value + value * ratio`)
    Relative(Ratio),
}

impl Tolerance<MassOverCharge> {
    /// Create a new ppm value
    pub fn new_ppm(value: f64) -> Self {
        Self::Relative(Ratio::new::<ppm>(value))
    }

    /// Create a new absolute value
    pub const fn new_absolute(value: MassOverCharge) -> Self {
        Self::Absolute(value)
    }

    /// Get the width of this tolerance (one sided) around the given m/z
    pub fn absolute_at(self, value: MassOverCharge) -> MassOverCharge {
        match self {
            Self::Absolute(offset) => offset,
            Self::Relative(ratio) => mz(value.value.abs() * ratio.value),
        }
    }

    /// Check if the measured m/z falls within this tolerance from the theoretical m/z
    pub fn within(self, theoretical: MassOverCharge, measured: MassOverCharge) -> bool {
        (theoretical.value - measured.value).abs() <= self.absolute_at(theoretical).value
    }

    /// Check if this tolerance can ever match anything
    pub fn is_positive(self) -> bool {
        let value = match self {
            Self::Absolute(offset) => offset.value,
            Self::Relative(ratio) => ratio.value,
        };
        value.is_finite() && value > 0.0
    }
}

impl Default for Tolerance<MassOverCharge> {
    fn default() -> Self {
        Self::Absolute(mz(0.5))
    }
}

impl std::fmt::Display for Tolerance<MassOverCharge> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute(offset) => write!(f, "{} Th", offset.get::<thomson>()),
            Self::Relative(ratio) => write!(f, "{} ppm", ratio.get::<ppm>()),
        }
    }
}
