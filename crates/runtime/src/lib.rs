pub mod clock;
pub mod frame;
pub mod loads;

pub use clock::*;
pub use frame::*;
pub use loads::*;
