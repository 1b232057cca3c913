pub mod mercator;
pub mod precision;
pub mod vec;

pub use mercator::*;
pub use precision::*;
pub use vec::*;
