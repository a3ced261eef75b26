#![doc = include_str!("../README.md")]
#![expect(macro_use_extern_crate)] // Could not get uom to work without

/// Contains all things related to annotations (fragment spectrum annotations that is).
pub mod annotation;
/// Contains the chemical constants and neutral losses.
pub mod chemistry;
pub mod fragment;
/// Contains logic to parse parameter sets from JSON.
pub mod parse_json;
/// Contains all things related to sequences, amongst others amino acids, modifications and peptides.
pub mod sequence;
/// Defines centroided fragment spectra.
pub mod spectrum;
pub mod system;
mod tolerance;

pub use tolerance::Tolerance;

/// A subset of the types and traits that are envisioned to be used the most, importing this is a good starting point for working with the crate
pub mod prelude {
    pub use crate::annotation::{
        AnnotationParameters, IonMatch, PeptideSpectrumAnnotator, SpecificAnnotationParameters,
        SpectrumAnnotator, TieBreaking,
    };
    pub use crate::chemistry::NeutralLoss;
    pub use crate::fragment::{Fragment, FragmentKind, FragmentType, IonType};
    pub use crate::parse_json::ParseJson;
    pub use crate::sequence::{
        AminoAcid, Modification, ModificationMatch, ModificationPosition, Peptide,
        SequencePosition,
    };
    pub use crate::spectrum::{Peak, Precursor, Spectrum};
    pub use crate::system::{Mass, MassOverCharge, Ratio, da, mz};
    pub use crate::tolerance::Tolerance;
}

#[macro_use]
extern crate uom;
