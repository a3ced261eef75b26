use context_error::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    chemistry::H2O,
    sequence::{AminoAcid, Modification, ModificationMatch, SequencePosition},
    system::Mass,
};

/// A peptide with its placed modifications. Sites are numbered `0` for the N-terminus,
/// `1..=len` for the residues and `len + 1` for the C-terminus. Deserialising goes through the
/// same checks as [`Peptide::new`] and [`Peptide::with_modification`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "UncheckedPeptide")]
pub struct Peptide {
    sequence: Vec<AminoAcid>,
    modifications: Vec<ModificationMatch>,
}

/// The serialised form of a peptide, before its modification sites are checked
#[derive(Deserialize)]
struct UncheckedPeptide {
    sequence: Vec<AminoAcid>,
    modifications: Vec<ModificationMatch>,
}

impl TryFrom<UncheckedPeptide> for Peptide {
    type Error = String;
    fn try_from(value: UncheckedPeptide) -> Result<Self, Self::Error> {
        if value.sequence.is_empty() {
            return Err("A peptide needs at least one amino acid".to_string());
        }
        value
            .modifications
            .into_iter()
            .try_fold(
                Self {
                    sequence: value.sequence,
                    modifications: Vec::new(),
                },
                |peptide, m| peptide.with_modification(m.modification, m.site, m.variable),
            )
            .map_err(|err| err.get_long_description().to_string())
    }
}

impl Peptide {
    /// Create an unmodified peptide from its one letter code sequence
    /// # Errors
    /// If the sequence is empty or contains a character that is not a standard amino acid.
    pub fn new(sequence: &str) -> Result<Self, BoxedError<'static, BasicKind>> {
        if sequence.is_empty() {
            return Err(BoxedError::new(
                BasicKind::Error,
                "Invalid peptide",
                "A peptide needs at least one amino acid",
                Context::none(),
            ));
        }
        let sequence = sequence
            .char_indices()
            .map(|(index, c)| {
                AminoAcid::try_from(c).map_err(|_| {
                    BoxedError::new(
                        BasicKind::Error,
                        "Invalid peptide",
                        format!("'{c}' is not one of the 20 standard amino acids"),
                        Context::line(None, sequence, index, 1).to_owned(),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            sequence,
            modifications: Vec::new(),
        })
    }

    /// Add a modification at the given site
    /// # Errors
    /// If the site is outside of the peptide.
    pub fn with_modification(
        mut self,
        modification: Modification,
        site: usize,
        variable: bool,
    ) -> Result<Self, BoxedError<'static, BasicKind>> {
        if SequencePosition::from_site(site, self.len()).is_none() {
            return Err(BoxedError::new(
                BasicKind::Error,
                "Invalid modification site",
                format!(
                    "Site {site} is outside of peptide {self} which has sites 0..={}",
                    self.len() + 1
                ),
                Context::none(),
            ));
        }
        self.modifications.push(ModificationMatch {
            modification,
            site,
            variable,
        });
        self.modifications.sort_by_key(|m| m.site);
        Ok(self)
    }

    /// Remove all variable modifications with one of the given names
    #[must_use]
    pub fn without_variable_modifications(&self, names: &[&str]) -> Self {
        Self {
            sequence: self.sequence.clone(),
            modifications: self
                .modifications
                .iter()
                .filter(|m| !(m.variable && names.contains(&m.modification.name.as_str())))
                .cloned()
                .collect(),
        }
    }

    /// The amino acid sequence
    pub fn sequence(&self) -> &[AminoAcid] {
        &self.sequence
    }

    /// The placed modifications, sorted by site
    pub fn modifications(&self) -> &[ModificationMatch] {
        &self.modifications
    }

    /// The number of residues
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// If the peptide has no residues
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The number of variable modifications with one of the given names
    pub fn count_variable(&self, names: &[&str]) -> usize {
        self.modifications
            .iter()
            .filter(|m| m.variable && names.contains(&m.modification.name.as_str()))
            .count()
    }

    /// The sites of all variable modifications with one of the given names, sorted and deduplicated
    pub fn variable_sites(&self, names: &[&str]) -> Vec<usize> {
        self.modifications
            .iter()
            .filter(|m| m.variable && names.contains(&m.modification.name.as_str()))
            .map(|m| m.site)
            .dedup()
            .collect()
    }

    /// The names of the modifications placed on the given site
    pub fn modifications_at(&self, site: usize) -> impl Iterator<Item = &str> {
        self.modifications
            .iter()
            .filter(move |m| m.site == site)
            .map(|m| m.modification.name.as_str())
    }

    /// The mass of every site, so index `0` holds the N-terminal modifications, `1..=len` the
    /// residues including their modifications, and `len + 1` the C-terminal modifications.
    pub fn site_masses(&self) -> Vec<Mass> {
        let mut masses = Vec::with_capacity(self.len() + 2);
        masses.push(Mass::default());
        masses.extend(self.sequence.iter().map(|aa| aa.monoisotopic_mass()));
        masses.push(Mass::default());
        for m in &self.modifications {
            masses[m.site] += m.modification.mass;
        }
        masses
    }

    /// The monoisotopic neutral mass of the full peptide
    pub fn mass(&self) -> Mass {
        self.site_masses()
            .into_iter()
            .fold(H2O, |total, mass| total + mass)
    }
}

impl std::fmt::Display for Peptide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = |site: usize| {
            self.modifications
                .iter()
                .filter(|m| m.site == site)
                .map(|m| format!("[{}]", m.modification.name))
                .join("")
        };
        let n_term = tag(0);
        if !n_term.is_empty() {
            write!(f, "{n_term}-")?;
        }
        for (index, aa) in self.sequence.iter().enumerate() {
            write!(f, "{aa}{}", tag(index + 1))?;
        }
        let c_term = tag(self.len() + 1);
        if !c_term.is_empty() {
            write!(f, "-{c_term}")?;
        }
        Ok(())
    }
}
