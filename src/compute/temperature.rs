use crate::Simulation;

use super::{kinetic_energy, ComputeTrait, ComputeValue};

/// Kinetic degrees of freedom: three per body and free particle, plus one per
/// non-degenerate principal axis of each body
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DegreesOfFreedom;

/// Kinetic temperature in energy units
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Temperature;

pub(super) fn dof(sim: &Simulation) -> usize {
    let free = sim.particles().bodies().iter().filter(|b| b.is_none()).count();
    let bodies: usize = sim
        .rigid()
        .bodies()
        .iter()
        .map(|b| 3 + b.rotational_dof())
        .sum();
    3 * free + bodies
}

pub(super) fn compute(sim: &Simulation) -> f64 {
    match dof(sim) {
        0 => 0.0,
        n => 2.0 * (kinetic_energy::translational(sim) + kinetic_energy::rotational(sim)) / n as f64,
    }
}

impl ComputeTrait for DegreesOfFreedom {
    fn name(&self) -> &'static str {
        "dof"
    }
    fn compute(&self, sim: &Simulation) -> ComputeValue {
        ComputeValue::Usize(dof(sim))
    }
}

impl ComputeTrait for Temperature {
    fn name(&self) -> &'static str {
        "Temp"
    }
    fn compute(&self, sim: &Simulation) -> ComputeValue {
        ComputeValue::Float(compute(sim))
    }
}
