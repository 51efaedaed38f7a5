pub use super::compute::{
    Compute, ComputeTrait, ComputeValue, DegreesOfFreedom, KineticEnergy, PotentialEnergy,
    RotationalKineticEnergy, Temperature, Thermo, TotalEnergy,
};
pub use super::container::{Container, BC};
pub use super::error::{Error, ErrorKind, Result};
pub use super::execution::ExecutionConfig;
pub use super::forces::{ConstantForce, HarmonicBond};
pub use super::group::Group;
pub use super::integrators::{BdConfig, BdNvtRigid, IntegratorTrait};
pub use super::neighbor::{NeighborList, SpatialIndex, Storage, UpdateSettings};
pub use super::pair::{LennardJones, Morse, PairPotentialTrait, PotentialPair, ShiftMode};
pub use super::particles::{Particle, Particles};
pub use super::simulation::Simulation;
pub use super::type_registry::TypeRegistry;
pub use super::utils::Types;
