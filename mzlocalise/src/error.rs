//! The [`LocalisationErrorKind`] which makes it easy for downstream users of the error type to match on the exact error.

use context_error::{BoxedError, ErrorKind};

/// The kind of failure of a localisation run
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LocalisationErrorKind {
    /// The peptide, modifications or spectrum do not allow localisation, for example no
    /// modification to localise or fewer possible sites than modifications
    #[default]
    InvalidInput,
    /// The scoring parameters are unusable
    Configuration,
    /// A probability fell outside of its valid range beyond the resolution limit
    NumericInconsistency,
    /// A possible site ended up without a score
    MissingSiteScore,
}

impl ErrorKind for LocalisationErrorKind {
    type Settings = ();
    fn descriptor(&self) -> &'static str {
        "error"
    }
    fn ignored(&self, _settings: Self::Settings) -> bool {
        false
    }
    fn is_error(&self, _settings: Self::Settings) -> bool {
        true
    }
}

/// The error returned by all localisation algorithms
pub type LocalisationError = BoxedError<'static, LocalisationErrorKind>;
