/// Group of useful computations
pub mod computations;
pub mod types;

pub use computations::*;
pub use types::Types;
