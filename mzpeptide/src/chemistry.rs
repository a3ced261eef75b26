use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::{sequence::AminoAcid, system::Mass};

/// A mass in dalton usable in constants
const fn dalton(value: f64) -> Mass {
    Mass {
        dimension: PhantomData,
        units: PhantomData,
        value,
    }
}

/// The monoisotopic mass of a proton
pub const PROTON: Mass = dalton(1.007_276_4);
/// The monoisotopic mass of a hydrogen atom
pub const H: Mass = dalton(1.007_825);
/// The monoisotopic mass of water
pub const H2O: Mass = dalton(18.010_565);
/// The monoisotopic mass of ammonia
pub const NH3: Mass = dalton(17.026_548);
/// The monoisotopic mass of carbon monoxide
pub const CO: Mass = dalton(27.994_915);
/// The monoisotopic mass of phosphoric acid
pub const H3PO4: Mass = dalton(97.976_896);

/// A neutral loss that can be applied to fragments.
///
/// A loss is triggered when the fragment covers one of the listed residues or carries one of the
/// listed modifications. A loss without any trigger applies to every peptide fragment.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NeutralLoss {
    /// The name, used for display and logging
    pub name: String,
    /// The monoisotopic mass that is lost
    pub mass: Mass,
    /// Residues that enable this loss
    #[serde(default)]
    pub residues: Vec<AminoAcid>,
    /// Names of modifications that enable this loss
    #[serde(default)]
    pub modifications: Vec<String>,
}

impl NeutralLoss {
    /// Create a new neutral loss without any triggers
    pub fn new(name: impl Into<String>, mass: Mass) -> Self {
        Self {
            name: name.into(),
            mass,
            residues: Vec::new(),
            modifications: Vec::new(),
        }
    }

    /// Set the residues that enable this loss
    #[must_use]
    pub fn residues(self, residues: impl IntoIterator<Item = AminoAcid>) -> Self {
        Self {
            residues: residues.into_iter().collect(),
            ..self
        }
    }

    /// Set the modifications that enable this loss
    #[must_use]
    pub fn modifications(self, modifications: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            modifications: modifications.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Loss of water from S, T, E or D
    pub fn water() -> Self {
        Self::new("-H2O", H2O).residues([
            AminoAcid::Serine,
            AminoAcid::Threonine,
            AminoAcid::GlutamicAcid,
            AminoAcid::AsparticAcid,
        ])
    }

    /// Loss of phosphoric acid from a phosphorylated residue
    pub fn phosphoric_acid() -> Self {
        Self::new("-H3PO4", H3PO4).modifications(["Phospho"])
    }

    /// Check if this loss applies to a fragment covering the given residues and modifications
    pub fn applies_to<'a>(
        &self,
        residues: &[AminoAcid],
        modifications: impl IntoIterator<Item = &'a str>,
    ) -> bool {
        if self.residues.is_empty() && self.modifications.is_empty() {
            return true;
        }
        residues.iter().any(|aa| self.residues.contains(aa))
            || modifications
                .into_iter()
                .any(|name| self.modifications.iter().any(|m| m == name))
    }
}

impl std::fmt::Display for NeutralLoss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
