use std::fmt;

use crate::Simulation;

use super::{
    ComputeTrait, DegreesOfFreedom, KineticEnergy, PotentialEnergy, RotationalKineticEnergy,
    Temperature,
};

/// Thermodynamic quantities at one step, as written to the log.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thermo {
    pub step: usize,
    pub potential_energy: f64,
    pub translational_kinetic_energy: f64,
    pub rotational_kinetic_energy: f64,
    pub degrees_of_freedom: usize,
    pub temperature: f64,
}
impl Thermo {
    pub fn compute(sim: &Simulation) -> Self {
        Self {
            step: sim.step(),
            potential_energy: PotentialEnergy.compute(sim).as_f64(),
            translational_kinetic_energy: KineticEnergy.compute(sim).as_f64(),
            rotational_kinetic_energy: RotationalKineticEnergy.compute(sim).as_f64(),
            degrees_of_freedom: DegreesOfFreedom.compute(sim).as_f64() as usize,
            temperature: Temperature.compute(sim).as_f64(),
        }
    }
    pub fn total_energy(&self) -> f64 {
        self.potential_energy + self.translational_kinetic_energy + self.rotational_kinetic_energy
    }
}
impl fmt::Display for Thermo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} PE {:.6} KE {:.6} KE_rot {:.6} Temp {:.6}",
            self.step,
            self.potential_energy,
            self.translational_kinetic_energy,
            self.rotational_kinetic_energy,
            self.temperature
        )
    }
}
