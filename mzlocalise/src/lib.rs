#![doc = include_str!("../README.md")]

pub mod ascore;
/// Contains the binomial tail probabilities in the log domain.
pub mod binomial;
mod candidates;
pub mod error;
pub mod md_score;
/// Contains the normalisation of profile probabilities into site percentages.
pub mod normalise;
pub mod phosphors;
/// Contains the numeric precision settings shared by all scores.
pub mod precision;
/// Contains the enumeration of modification placements.
pub mod profiles;
/// Contains the peak selection used to reduce spectra.
pub mod reduction;
pub mod site_determining;

/// The most used types, importing this is a good starting point for working with the crate
pub mod prelude {
    pub use crate::ascore::AScore;
    pub use crate::error::{LocalisationError, LocalisationErrorKind};
    pub use crate::md_score::{SearchEngineCandidate, md_score};
    pub use crate::normalise::ProfileScore;
    pub use crate::phosphors::{PhosphoRs, SiteLocalisation};
    pub use crate::precision::Precision;
}
