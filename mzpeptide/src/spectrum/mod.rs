mod peak;
#[expect(clippy::module_inception)]
mod spectrum;

pub use peak::*;
pub use spectrum::*;
