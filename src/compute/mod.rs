use std::fmt;

use enum_dispatch::enum_dispatch;

use crate::Simulation;

mod kinetic_energy;
mod potential_energy;
mod temperature;
mod thermo;
mod total_energy;

pub use kinetic_energy::{KineticEnergy, RotationalKineticEnergy};
pub use potential_energy::PotentialEnergy;
pub use temperature::{DegreesOfFreedom, Temperature};
pub use thermo::Thermo;
pub use total_energy::TotalEnergy;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ComputeValue {
    Float(f64),
    Usize(usize),
}
impl ComputeValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            ComputeValue::Float(x) => x,
            ComputeValue::Usize(n) => n as f64,
        }
    }
}
impl fmt::Display for ComputeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeValue::Float(x) => write!(f, "{x:.6}"),
            ComputeValue::Usize(n) => write!(f, "{n}"),
        }
    }
}

/// A scalar quantity derived from the current simulation state
#[enum_dispatch]
pub trait ComputeTrait {
    fn name(&self) -> &'static str;
    fn compute(&self, sim: &Simulation) -> ComputeValue;
}

#[enum_dispatch(ComputeTrait)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Compute {
    PotentialEnergy,
    KineticEnergy,
    RotationalKineticEnergy,
    TotalEnergy,
    DegreesOfFreedom,
    Temperature,
}
impl Compute {
    /// Quantities written to the thermo log unless configured otherwise
    pub fn thermo_defaults() -> Vec<Compute> {
        vec![
            PotentialEnergy.into(),
            KineticEnergy.into(),
            RotationalKineticEnergy.into(),
            Temperature.into(),
        ]
    }
}

/// One `name value` entry per quantity, separated by spaces.
pub fn format_line(computes: &[Compute], sim: &Simulation) -> String {
    computes
        .iter()
        .map(|c| format!("{} {}", c.name(), c.compute(sim)))
        .collect::<Vec<_>>()
        .join(" ")
}
