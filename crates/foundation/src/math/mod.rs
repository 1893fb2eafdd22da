pub mod coordinate;
pub mod geodesy;
pub mod precision;

pub use coordinate::*;
pub use geodesy::*;
pub use precision::*;
