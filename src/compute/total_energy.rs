use crate::Simulation;

use super::{kinetic_energy, potential_energy, ComputeTrait, ComputeValue};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TotalEnergy;

impl ComputeTrait for TotalEnergy {
    fn name(&self) -> &'static str {
        "TotEng"
    }
    fn compute(&self, sim: &Simulation) -> ComputeValue {
        ComputeValue::Float(
            potential_energy::compute(sim)
                + kinetic_energy::translational(sim)
                + kinetic_energy::rotational(sim),
        )
    }
}
