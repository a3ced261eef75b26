mod annotator;
mod parameters;

pub use annotator::*;
pub use parameters::*;
