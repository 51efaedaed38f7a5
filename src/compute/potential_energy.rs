use crate::Simulation;

use super::{ComputeTrait, ComputeValue};

/// Total pair energy from the most recent force evaluation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PotentialEnergy;

pub(super) fn compute(sim: &Simulation) -> f64 {
    sim.pair_forces().total_energy()
}

impl ComputeTrait for PotentialEnergy {
    fn name(&self) -> &'static str {
        "PE"
    }
    fn compute(&self, sim: &Simulation) -> ComputeValue {
        ComputeValue::Float(compute(sim))
    }
}
