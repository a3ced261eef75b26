use serde::{Deserialize, Serialize};

use crate::{
    sequence::{AminoAcid, Peptide},
    system::{Mass, da},
};

/// Where on a peptide a modification is allowed
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ModificationPosition {
    /// On any of the allowed residues
    #[default]
    Anywhere,
    /// Only on the peptide N-terminus
    PeptideNTerm,
    /// Only on the peptide C-terminus
    PeptideCTerm,
}

/// A modification with its placement rules
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Modification {
    /// The name, modifications are identified by name
    pub name: String,
    /// The monoisotopic mass difference
    pub mass: Mass,
    /// The residues this modification can be placed on, for terminal modifications an empty
    /// list means any residue can be on the terminus
    pub residues: Vec<AminoAcid>,
    /// Where on the peptide this modification can be placed
    pub position: ModificationPosition,
}

impl Modification {
    /// Create a new modification. The residues are given as one letter codes, characters that
    /// are not one of the 20 standard amino acids are ignored.
    pub fn new(
        name: impl Into<String>,
        mass: Mass,
        residues: &str,
        position: ModificationPosition,
    ) -> Self {
        Self {
            name: name.into(),
            mass,
            residues: residues
                .chars()
                .filter_map(|c| AminoAcid::try_from(c).ok())
                .collect(),
            position,
        }
    }

    /// Phosphorylation on S, T or Y
    pub fn phospho() -> Self {
        Self::new("Phospho", da(79.966_331), "STY", ModificationPosition::Anywhere)
    }

    /// Oxidation on M
    pub fn oxidation() -> Self {
        Self::new("Oxidation", da(15.994_915), "M", ModificationPosition::Anywhere)
    }

    /// Check if the given amino acid is allowed by this modification
    fn allows(&self, aa: AminoAcid) -> bool {
        self.residues.is_empty() || self.residues.contains(&aa)
    }

    /// All sites where this modification could be placed on the given peptide, in ascending order.
    /// Sites are `0` for the N-terminus, `1..=len` for residues and `len + 1` for the C-terminus.
    pub fn possible_sites(&self, peptide: &Peptide) -> Vec<usize> {
        let sequence = peptide.sequence();
        match self.position {
            ModificationPosition::Anywhere => sequence
                .iter()
                .enumerate()
                .filter(|(_, aa)| self.residues.contains(aa))
                .map(|(index, _)| index + 1)
                .collect(),
            ModificationPosition::PeptideNTerm => sequence
                .first()
                .filter(|aa| self.allows(**aa))
                .map(|_| vec![0])
                .unwrap_or_default(),
            ModificationPosition::PeptideCTerm => sequence
                .last()
                .filter(|aa| self.allows(**aa))
                .map(|_| vec![sequence.len() + 1])
                .unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for Modification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A modification placed on a peptide
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ModificationMatch {
    /// The modification
    pub modification: Modification,
    /// The site, see [`Modification::possible_sites`] for the numbering
    pub site: usize,
    /// If this is a variable modification (in contrast to a fixed one)
    pub variable: bool,
}
