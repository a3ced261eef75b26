use context_error::*;
use serde::{Deserialize, Serialize};

use crate::system::{Mass, da};

/// The 20 standard amino acids
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[expect(missing_docs)]
pub enum AminoAcid {
    Alanine,
    Arginine,
    Asparagine,
    AsparticAcid,
    Cysteine,
    Glutamine,
    GlutamicAcid,
    Glycine,
    Histidine,
    Isoleucine,
    Leucine,
    Lysine,
    Methionine,
    Phenylalanine,
    Proline,
    Serine,
    Threonine,
    Tryptophan,
    Tyrosine,
    Valine,
}

impl AminoAcid {
    /// All amino acids in one letter code alphabetical order
    pub const ALL: [Self; 20] = [
        Self::Alanine,
        Self::Cysteine,
        Self::AsparticAcid,
        Self::GlutamicAcid,
        Self::Phenylalanine,
        Self::Glycine,
        Self::Histidine,
        Self::Isoleucine,
        Self::Lysine,
        Self::Leucine,
        Self::Methionine,
        Self::Asparagine,
        Self::Proline,
        Self::Glutamine,
        Self::Arginine,
        Self::Serine,
        Self::Threonine,
        Self::Valine,
        Self::Tryptophan,
        Self::Tyrosine,
    ];

    /// The monoisotopic residue mass
    pub fn monoisotopic_mass(self) -> Mass {
        da(match self {
            Self::Alanine => 71.037_12,
            Self::Arginine => 156.101_1,
            Self::Asparagine => 114.042_93,
            Self::AsparticAcid => 115.026_94,
            Self::Cysteine => 103.009_186,
            Self::Glutamine => 128.058_58,
            Self::GlutamicAcid => 129.042_59,
            Self::Glycine => 57.021_465,
            Self::Histidine => 137.058_91,
            Self::Isoleucine | Self::Leucine => 113.084_06,
            Self::Lysine => 128.094_96,
            Self::Methionine => 131.040_48,
            Self::Phenylalanine => 147.068_42,
            Self::Proline => 97.052_765,
            Self::Serine => 87.032_03,
            Self::Threonine => 101.047_68,
            Self::Tryptophan => 186.079_31,
            Self::Tyrosine => 163.063_33,
            Self::Valine => 99.068_41,
        })
    }

    /// The one letter code
    pub const fn char(self) -> char {
        match self {
            Self::Alanine => 'A',
            Self::Arginine => 'R',
            Self::Asparagine => 'N',
            Self::AsparticAcid => 'D',
            Self::Cysteine => 'C',
            Self::Glutamine => 'Q',
            Self::GlutamicAcid => 'E',
            Self::Glycine => 'G',
            Self::Histidine => 'H',
            Self::Isoleucine => 'I',
            Self::Leucine => 'L',
            Self::Lysine => 'K',
            Self::Methionine => 'M',
            Self::Phenylalanine => 'F',
            Self::Proline => 'P',
            Self::Serine => 'S',
            Self::Threonine => 'T',
            Self::Tryptophan => 'W',
            Self::Tyrosine => 'Y',
            Self::Valine => 'V',
        }
    }
}

impl TryFrom<char> for AminoAcid {
    type Error = BoxedError<'static, BasicKind>;
    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|aa| aa.char() == value.to_ascii_uppercase())
            .ok_or_else(|| {
                BoxedError::new(
                    BasicKind::Error,
                    "Invalid amino acid",
                    format!("'{value}' is not one of the 20 standard amino acids"),
                    Context::none(),
                )
            })
    }
}

impl std::fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.char())
    }
}
