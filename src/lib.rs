//! Rigid-body Brownian dynamics with short-ranged pair potentials.
//!
//! A [`Simulation`] owns the particles, the rigid bodies built from them, a pair
//! potential evaluated over a neighbor list, and the integrators that advance
//! the bodies each step.

pub mod compute;
pub mod container;
pub mod error;
pub mod execution;
pub mod forces;
pub mod group;
pub mod integrators;
pub mod neighbor;
pub mod pair;
pub mod particles;
pub mod prelude;
pub mod rigid;
pub mod simulation;
pub mod type_registry;
pub mod utils;

pub use container::{Container, BC};
pub use error::{Error, ErrorKind, Result};
pub use execution::ExecutionConfig;
pub use forces::{ConstantForce, HarmonicBond};
pub use group::Group;
pub use integrators::{BdConfig, BdNvtRigid, Integrator, IntegratorState, IntegratorTrait};
pub use neighbor::{NeighborList, SpatialIndex, Storage, UpdateSettings};
pub use pair::{LennardJones, Morse, PotentialPair, ShiftMode};
pub use particles::{Particle, Particles};
pub use rigid::{RigidBody, RigidData};
pub use simulation::{IntegratorId, Simulation};
pub use type_registry::{TypeObserver, TypeRegistry};
