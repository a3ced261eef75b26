use serde::{Deserialize, Serialize};

use crate::system::MassOverCharge;

/// A centroided peak
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Peak {
    /// The mass over charge of the peak
    pub mz: MassOverCharge,
    /// The intensity of the peak
    pub intensity: f64,
}

impl Peak {
    /// Create a new peak
    pub const fn new(mz: MassOverCharge, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

/// The precursor of a fragment spectrum
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Precursor {
    /// The mass over charge of the precursor
    pub mz: MassOverCharge,
    /// The charge of the precursor
    pub charge: u8,
}

impl Precursor {
    /// Create a new precursor
    pub const fn new(mz: MassOverCharge, charge: u8) -> Self {
        Self { mz, charge }
    }
}
