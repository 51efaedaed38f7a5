use crate::Simulation;

use super::{ComputeTrait, ComputeValue};

/// Translational kinetic energy of rigid bodies and free particles
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KineticEnergy;

/// Rotational kinetic energy of rigid bodies
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationalKineticEnergy;

pub(super) fn translational(sim: &Simulation) -> f64 {
    let particles = sim.particles();
    let bodies: f64 = sim
        .rigid()
        .bodies()
        .iter()
        .map(|b| b.translational_kinetic_energy())
        .sum();
    let free: f64 = (0..particles.len())
        .filter(|&i| particles.bodies[i].is_none())
        .map(|i| 0.5 * particles.masses[i] * particles.velocities[i].norm_squared())
        .sum();
    bodies + free
}

pub(super) fn rotational(sim: &Simulation) -> f64 {
    sim.rigid()
        .bodies()
        .iter()
        .map(|b| b.rotational_kinetic_energy())
        .sum()
}

impl ComputeTrait for KineticEnergy {
    fn name(&self) -> &'static str {
        "KE"
    }
    fn compute(&self, sim: &Simulation) -> ComputeValue {
        ComputeValue::Float(translational(sim))
    }
}

impl ComputeTrait for RotationalKineticEnergy {
    fn name(&self) -> &'static str {
        "KE_rot"
    }
    fn compute(&self, sim: &Simulation) -> ComputeValue {
        ComputeValue::Float(rotational(sim))
    }
}
