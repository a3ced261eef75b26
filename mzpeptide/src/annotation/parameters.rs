use serde::{Deserialize, Serialize};

use crate::{
    chemistry::NeutralLoss,
    fragment::FragmentKind,
    parse_json::{ParseJson, use_serde},
    system::MassOverCharge,
    tolerance::Tolerance,
};

/// Which peak is chosen when multiple peaks match a single theoretical fragment
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum TieBreaking {
    /// The most intense peak
    #[default]
    MostIntense,
    /// The peak closest to the theoretical m/z
    MostAccurate,
}

/// Settings for the annotation of spectra that do not depend on the peptide or spectrum
#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AnnotationParameters {
    /// Peaks with an intensity below this fraction of the most intense peak are ignored
    pub intensity_limit: f64,
    /// How to pick a peak when multiple match the same fragment
    pub tie_breaking: TieBreaking,
}

impl AnnotationParameters {
    /// Set the intensity limit
    #[must_use]
    pub fn intensity_limit(self, intensity_limit: f64) -> Self {
        Self {
            intensity_limit,
            ..self
        }
    }
    /// Set the tie breaking
    #[must_use]
    pub fn tie_breaking(self, tie_breaking: TieBreaking) -> Self {
        Self {
            tie_breaking,
            ..self
        }
    }
}

impl ParseJson for AnnotationParameters {
    fn from_json_value(
        value: serde_json::Value,
    ) -> Result<Self, context_error::BoxedError<'static, context_error::BasicKind>> {
        use_serde(value)
    }
}

/// Settings for the annotation of one particular peptide spectrum match
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SpecificAnnotationParameters {
    /// The fragment matching tolerance
    pub fragment_tolerance: Tolerance<MassOverCharge>,
    /// The charge of the precursor
    pub precursor_charge: u8,
    /// The charges to consider for backbone fragments
    pub fragment_charges: Vec<u8>,
    /// The backbone fragments to generate
    pub peptide_fragments: Vec<FragmentKind>,
    /// If precursor ions are generated
    pub precursor_ions: bool,
    /// If immonium ions are generated
    pub immonium_ions: bool,
    /// The neutral losses to consider for backbone fragments
    pub neutral_losses: Vec<NeutralLoss>,
}

impl SpecificAnnotationParameters {
    /// Set the fragment tolerance
    #[must_use]
    pub fn fragment_tolerance(self, fragment_tolerance: Tolerance<MassOverCharge>) -> Self {
        Self {
            fragment_tolerance,
            ..self
        }
    }
    /// Set the precursor charge
    #[must_use]
    pub fn precursor_charge(self, precursor_charge: u8) -> Self {
        Self {
            precursor_charge,
            ..self
        }
    }
    /// Set the fragment charges
    #[must_use]
    pub fn fragment_charges(self, fragment_charges: impl IntoIterator<Item = u8>) -> Self {
        Self {
            fragment_charges: fragment_charges.into_iter().collect(),
            ..self
        }
    }
    /// Set the backbone fragments
    #[must_use]
    pub fn peptide_fragments(self, peptide_fragments: impl IntoIterator<Item = FragmentKind>) -> Self {
        Self {
            peptide_fragments: peptide_fragments.into_iter().collect(),
            ..self
        }
    }
    /// Set if precursor ions are generated
    #[must_use]
    pub fn precursor_ions(self, precursor_ions: bool) -> Self {
        Self {
            precursor_ions,
            ..self
        }
    }
    /// Set if immonium ions are generated
    #[must_use]
    pub fn immonium_ions(self, immonium_ions: bool) -> Self {
        Self {
            immonium_ions,
            ..self
        }
    }
    /// Set the neutral losses
    #[must_use]
    pub fn neutral_losses(self, neutral_losses: impl IntoIterator<Item = NeutralLoss>) -> Self {
        Self {
            neutral_losses: neutral_losses.into_iter().collect(),
            ..self
        }
    }
}

impl Default for SpecificAnnotationParameters {
    fn default() -> Self {
        Self {
            fragment_tolerance: Tolerance::default(),
            precursor_charge: 2,
            fragment_charges: vec![1],
            peptide_fragments: vec![FragmentKind::B, FragmentKind::Y],
            precursor_ions: false,
            immonium_ions: false,
            neutral_losses: Vec::new(),
        }
    }
}

impl ParseJson for SpecificAnnotationParameters {
    fn from_json_value(
        value: serde_json::Value,
    ) -> Result<Self, context_error::BoxedError<'static, context_error::BasicKind>> {
        use_serde(value)
    }
}
