//! Theoretical fragments and their generation from a peptide

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    annotation::SpecificAnnotationParameters,
    chemistry::{CO, H, H2O, NH3, NeutralLoss, PROTON},
    sequence::{AminoAcid, Peptide},
    system::{Charge, Mass, MassOverCharge, e},
};

/// The kind of backbone cleavage fragment
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[expect(missing_docs)]
pub enum FragmentKind {
    A,
    B,
    C,
    X,
    Y,
    Z,
}

impl FragmentKind {
    /// If this fragment contains the N-terminus of the peptide
    pub const fn is_n_terminal(self) -> bool {
        matches!(self, Self::A | Self::B | Self::C)
    }

    /// The mass offset of this fragment relative to the summed site masses
    fn offset(self) -> Mass {
        match self {
            Self::A => -CO,
            Self::B => Mass::default(),
            Self::C => NH3,
            Self::X => H2O + CO - H * 2.0,
            Self::Y => H2O,
            Self::Z => H2O - NH3,
        }
    }
}

impl std::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        write!(f, "{kind}")
    }
}

/// The broad type of an ion
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum IonType {
    /// Backbone cleavage fragments
    PeptideFragment,
    /// The intact precursor
    Precursor,
    /// Immonium ions
    Immonium,
}

/// The annotation of a fragment
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum FragmentType {
    /// A backbone cleavage fragment, the series number counts the residues from the terminus the fragment contains
    PeptideFragment {
        /// The kind of fragment
        kind: FragmentKind,
        /// The number of residues from the terminus
        series_number: usize,
    },
    /// The intact precursor
    Precursor,
    /// An immonium ion of the given residue
    Immonium(AminoAcid),
}

impl FragmentType {
    /// The broad type of this fragment
    pub const fn ion_type(&self) -> IonType {
        match self {
            Self::PeptideFragment { .. } => IonType::PeptideFragment,
            Self::Precursor => IonType::Precursor,
            Self::Immonium(_) => IonType::Immonium,
        }
    }
}

/// A theoretical fragment
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Fragment {
    /// The annotation for this fragment
    pub ion: FragmentType,
    /// The charge
    pub charge: u8,
    /// The neutral loss applied, if any
    pub neutral_loss: Option<NeutralLoss>,
    /// The theoretical mass over charge
    pub mz: MassOverCharge,
}

impl Fragment {
    /// Create a fragment from its neutral mass
    pub fn new(
        ion: FragmentType,
        neutral_mass: Mass,
        charge: u8,
        neutral_loss: Option<NeutralLoss>,
    ) -> Self {
        let charge = charge.max(1);
        let mass = neutral_mass - neutral_loss.as_ref().map_or_else(Mass::default, |l| l.mass);
        let z = f64::from(charge);
        Self {
            ion,
            charge,
            neutral_loss,
            mz: (mass + PROTON * z) / Charge::new::<e>(z),
        }
    }

    /// Generate all theoretical fragments for the given peptide with the selected ion types,
    /// charges, and neutral losses.
    pub fn generate(peptide: &Peptide, parameters: &SpecificAnnotationParameters) -> Vec<Self> {
        let masses = peptide.site_masses();
        let length = peptide.len();
        let charges = parameters.fragment_charges.iter().copied().unique().collect_vec();
        let mut fragments = Vec::new();

        for kind in parameters.peptide_fragments.iter().copied().unique() {
            for series_number in 1..length {
                // The sites covered by this fragment, including the terminal site
                let sites = if kind.is_n_terminal() {
                    0..=series_number
                } else {
                    length + 1 - series_number..=length + 1
                };
                let neutral_mass = masses[sites.clone()]
                    .iter()
                    .fold(kind.offset(), |total, mass| total + *mass);
                let residues = if kind.is_n_terminal() {
                    &peptide.sequence()[..series_number]
                } else {
                    &peptide.sequence()[length - series_number..]
                };
                let losses = parameters
                    .neutral_losses
                    .iter()
                    .filter(|loss| {
                        loss.applies_to(
                            residues,
                            sites.clone().flat_map(|site| peptide.modifications_at(site)),
                        )
                    })
                    .collect_vec();
                let ion = FragmentType::PeptideFragment {
                    kind,
                    series_number,
                };
                for charge in &charges {
                    fragments.push(Self::new(ion, neutral_mass, *charge, None));
                    for loss in &losses {
                        fragments.push(Self::new(ion, neutral_mass, *charge, Some((*loss).clone())));
                    }
                }
            }
        }

        if parameters.precursor_ions {
            let mass = peptide.mass();
            for charge in 1..=parameters.precursor_charge.max(1) {
                fragments.push(Self::new(FragmentType::Precursor, mass, charge, None));
            }
        }

        if parameters.immonium_ions {
            for aa in peptide.sequence().iter().copied().unique() {
                fragments.push(Self::new(
                    FragmentType::Immonium(aa),
                    aa.monoisotopic_mass() - CO,
                    1,
                    None,
                ));
            }
        }

        fragments
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.ion {
            FragmentType::PeptideFragment {
                kind,
                series_number,
            } => write!(f, "{kind}{series_number}")?,
            FragmentType::Precursor => write!(f, "p")?,
            FragmentType::Immonium(aa) => write!(f, "I{aa}")?,
        }
        if let Some(loss) = &self.neutral_loss {
            write!(f, "{loss}")?;
        }
        write!(f, "^{}+", self.charge)
    }
}
