//! Force sources added on top of the pair potential.

mod constant;
mod harmonic_bond;

pub use constant::ConstantForce;
pub use harmonic_bond::{Bond, BondParams, HarmonicBond};
