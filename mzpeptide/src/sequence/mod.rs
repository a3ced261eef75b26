mod aminoacid;
mod modification;
mod peptide;
mod sequence_position;

pub use aminoacid::*;
pub use modification::*;
pub use peptide::*;
pub use sequence_position::*;
