mod bd_rigid;
mod gamma;

pub use bd_rigid::{BdConfig, BdNvtRigid};
pub use gamma::GammaTable;

use enum_dispatch::enum_dispatch;
use nalgebra::Vector3;

use crate::{
    type_registry::{TypeObserver, TypeRegistry},
    Container, Group, Particles, RigidData, Result,
};

/// Lifecycle of an integrator. Only enabled integrators advance the system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegratorState {
    Constructed,
    Enabled,
    Disabled,
}

/// System state handed to an integrator for one step.
pub struct StepContext<'a> {
    pub step: usize,
    pub dt: f64,
    pub particles: &'a mut Particles,
    pub rigid: &'a mut RigidData,
    pub container: &'a Container,
    /// Per-particle forces, already summed onto the bodies
    pub forces: &'a [Vector3<f64>],
}

/// Simulation integrator
#[enum_dispatch]
pub trait IntegratorTrait {
    fn group(&self) -> &Group;
    fn state(&self) -> IntegratorState;
    fn enable(&mut self);
    fn disable(&mut self);

    /// Checks the integrator against the current system before a run.
    fn prepare(&mut self, particles: &Particles, rigid: &RigidData) -> Result<()>;

    /// Advances every body the integrator is responsible for by one step.
    fn integrate_step(&mut self, ctx: StepContext<'_>) -> Result<()>;

    fn is_enabled(&self) -> bool {
        self.state() == IntegratorState::Enabled
    }
}

#[enum_dispatch(IntegratorTrait)]
#[derive(Clone, Debug)]
pub enum Integrator {
    BdNvtRigid,
}
impl Integrator {
    pub fn as_bd_nvt_rigid(&self) -> Option<&BdNvtRigid> {
        match self {
            Integrator::BdNvtRigid(bd) => Some(bd),
        }
    }
    pub fn as_bd_nvt_rigid_mut(&mut self) -> Option<&mut BdNvtRigid> {
        match self {
            Integrator::BdNvtRigid(bd) => Some(bd),
        }
    }
}
impl TypeObserver for Integrator {
    fn ensure_type_capacity(&mut self, types: &TypeRegistry) {
        match self {
            Integrator::BdNvtRigid(bd) => bd.ensure_type_capacity(types),
        }
    }
}
