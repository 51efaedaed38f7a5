pub mod coeff;
pub mod evaluator;
pub mod lj;
pub mod morse;

pub use coeff::{CoeffTable, ParamSpec};
pub use evaluator::{PairForces, PotentialPair, ShiftMode};
pub use lj::LennardJones;
pub use morse::Morse;

use enum_dispatch::enum_dispatch;

/// Per-pair constants precomputed from a resolved coefficient entry.
pub type PairCoeff = [f64; 4];

#[enum_dispatch]
/// Trait for the closed-form part of a short-ranged pair potential
pub trait PairPotentialTrait {
    /// Short name used in log and error messages
    fn name(&self) -> &'static str;

    /// Named parameters of the potential, excluding `r_cut` and `r_on`
    fn params(&self) -> &'static [ParamSpec];

    /// Precompute per-pair constants from parameter values given in `params()` order
    fn prepare(&self, values: &[f64]) -> PairCoeff;

    /// Force divided by r and energy at squared separation `rsq`
    fn evaluate(&self, rsq: f64, coeff: &PairCoeff) -> (f64, f64);
}

#[enum_dispatch(PairPotentialTrait)]
#[derive(Clone, Copy, Debug)]
pub enum PairPotential {
    LennardJones,
    Morse,
}
