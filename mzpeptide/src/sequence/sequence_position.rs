use serde::{Deserialize, Serialize};

/// A position on a sequence
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum SequencePosition {
    /// N-terminal
    NTerm,
    /// An amino acid at the given index (0 based)
    Index(usize),
    /// C-terminal
    CTerm,
}

impl std::fmt::Display for SequencePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NTerm => write!(f, "N-terminal"),
            Self::Index(index) => write!(f, "{index}"),
            Self::CTerm => write!(f, "C-terminal"),
        }
    }
}

impl SequencePosition {
    /// Convert a site to a sequence position.
    /// The site is defined as follows:
    /// * `0` is N term
    /// * `1..=peptide_length` is in the sequence
    /// * `peptide_length + 1` is C term
    ///
    /// Anything outside of this range results in `None`.
    pub const fn from_site(site: usize, peptide_length: usize) -> Option<Self> {
        if site == 0 {
            Some(Self::NTerm)
        } else if site == peptide_length + 1 {
            Some(Self::CTerm)
        } else if site <= peptide_length {
            Some(Self::Index(site - 1))
        } else {
            None
        }
    }

    /// Convert this position back into a site, see [`Self::from_site`].
    pub const fn site(self, peptide_length: usize) -> usize {
        match self {
            Self::NTerm => 0,
            Self::Index(index) => index + 1,
            Self::CTerm => peptide_length + 1,
        }
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn sites() {
        assert_eq!(SequencePosition::from_site(0, 8), Some(SequencePosition::NTerm));
        assert_eq!(SequencePosition::from_site(1, 8), Some(SequencePosition::Index(0)));
        assert_eq!(SequencePosition::from_site(8, 8), Some(SequencePosition::Index(7)));
        assert_eq!(SequencePosition::from_site(9, 8), Some(SequencePosition::CTerm));
        assert_eq!(SequencePosition::from_site(10, 8), None);
        for site in 0..=9 {
            assert_eq!(
                SequencePosition::from_site(site, 8).unwrap().site(8),
                site
            );
        }
    }
}
