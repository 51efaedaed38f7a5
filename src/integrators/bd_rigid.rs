use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;
use tracing::{debug, instrument};

use super::{GammaTable, IntegratorState, IntegratorTrait, StepContext};
use crate::{
    rigid::write_body,
    type_registry::{TypeObserver, TypeRegistry},
    utils::mix_seed,
    Error, Group, Particles, RigidBody, RigidData, Result,
};

/// Friction coefficient used when no per-type value is given.
pub const DEFAULT_GAMMA: f64 = 1.0;

/// Settings for a [`BdNvtRigid`] integrator.
#[derive(Clone, Debug, PartialEq)]
pub struct BdConfig {
    pub temperature: f64,
    pub seed: u64,
    /// Take each particle's friction from its diameter instead of its type
    pub gamma_diam: bool,
    /// Per-type friction overrides, by type index
    pub gammas: Vec<(usize, f64)>,
    /// Largest distance a body's center of mass may move in one step
    pub limit: Option<f64>,
}
impl BdConfig {
    pub fn new(temperature: f64) -> Self {
        Self {
            temperature,
            seed: 0,
            gamma_diam: false,
            gammas: Vec::new(),
            limit: None,
        }
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
    pub fn with_gamma_diam(mut self, gamma_diam: bool) -> Self {
        self.gamma_diam = gamma_diam;
        self
    }
    pub fn with_gamma(mut self, type_id: usize, gamma: f64) -> Self {
        self.gammas.push((type_id, gamma));
        self
    }
    pub fn with_limit(mut self, limit: f64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Friction {
    PerType(GammaTable),
    Diameter,
}
impl Friction {
    fn gamma(&self, particles: &Particles, i: usize) -> Result<f64> {
        match self {
            Friction::PerType(table) => table.require(particles.types[i]),
            Friction::Diameter => Ok(particles.diameters[i]),
        }
    }
}

/// Brownian dynamics for rigid bodies at constant temperature.
///
/// Every constituent particle feels a drag `-γ v` and a Gaussian random force of
/// variance `2 γ T / dt` per component. Both are summed into the force and torque
/// on its body, so translation and rotation are thermalized together.
#[derive(Clone, Debug)]
pub struct BdNvtRigid {
    group: Group,
    temperature: f64,
    seed: u64,
    friction: Friction,
    limit: Option<f64>,
    state: IntegratorState,
    bodies: Vec<usize>,
}
impl BdNvtRigid {
    pub fn new(group: Group, config: BdConfig, types: &TypeRegistry) -> Result<Self> {
        check_temperature(config.temperature)?;
        if let Some(limit) = config.limit {
            check_limit(limit)?;
        }
        let friction = if config.gamma_diam {
            if !config.gammas.is_empty() {
                return Err(Error::Configuration(
                    "diameter-scaled friction and per-type friction cannot be combined".into(),
                ));
            }
            Friction::Diameter
        } else {
            let mut table = GammaTable::new(types, DEFAULT_GAMMA);
            for &(type_id, gamma) in &config.gammas {
                table.set(type_id, gamma)?;
            }
            Friction::PerType(table)
        };
        Ok(Self {
            group,
            temperature: config.temperature,
            seed: config.seed,
            friction,
            limit: config.limit,
            state: IntegratorState::Constructed,
            bodies: Vec::new(),
        })
    }

    // Getters
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn limit(&self) -> Option<f64> {
        self.limit
    }
    pub fn gamma_diam(&self) -> bool {
        matches!(self.friction, Friction::Diameter)
    }
    /// Friction for a type, `None` with diameter scaling or when unset
    pub fn gamma(&self, type_id: usize) -> Option<f64> {
        match &self.friction {
            Friction::PerType(table) => table.get(type_id),
            Friction::Diameter => None,
        }
    }
    /// Ids of the bodies advanced by this integrator, known after `prepare`
    pub fn body_ids<'a>(&'a self, rigid: &'a RigidData) -> impl Iterator<Item = usize> + 'a {
        self.bodies.iter().map(|&k| rigid.bodies()[k].id())
    }

    // Setters
    /// Takes effect on the next step.
    pub fn set_gamma(&mut self, type_id: usize, gamma: f64) -> Result<()> {
        match &mut self.friction {
            Friction::PerType(table) => table.set(type_id, gamma),
            Friction::Diameter => Err(Error::Configuration(
                "cannot set per-type friction on an integrator using diameter-scaled friction"
                    .into(),
            )),
        }
    }
    /// Takes effect on the next step.
    pub fn set_params(&mut self, temperature: f64) -> Result<()> {
        check_temperature(temperature)?;
        self.temperature = temperature;
        Ok(())
    }
    /// Caps the center-of-mass displacement of every body per step.
    pub fn set_limit(&mut self, limit: f64) -> Result<()> {
        check_limit(limit)?;
        self.limit = Some(limit);
        Ok(())
    }
    pub fn remove_limit(&mut self) {
        self.limit = None;
    }

    fn add_drag_and_noise(
        &self,
        body: &mut RigidBody,
        particles: &Particles,
        rng: &mut StdRng,
        dt: f64,
    ) -> Result<()> {
        let omega = body.angular_velocity();
        let mut force = Vector3::zeros();
        let mut torque = Vector3::zeros();
        for (k, &i) in body.members().iter().enumerate() {
            let gamma = self.friction.gamma(particles, i)?;
            let arm = body.lever_arm(k);
            let velocity = body.velocity() + omega.cross(&arm);
            let xi = Vector3::from_fn(|_, _| rng.sample::<f64, _>(StandardNormal));
            let f = xi * (2.0 * gamma * self.temperature / dt).sqrt() - velocity * gamma;
            force += f;
            torque += arm.cross(&f);
        }
        body.add_force_and_torque(force, torque);
        Ok(())
    }
}

impl IntegratorTrait for BdNvtRigid {
    fn group(&self) -> &Group {
        &self.group
    }
    fn state(&self) -> IntegratorState {
        self.state
    }
    fn enable(&mut self) {
        debug!(group = self.group.name(), "BD rigid integrator enabled");
        self.state = IntegratorState::Enabled;
    }
    fn disable(&mut self) {
        debug!(group = self.group.name(), "BD rigid integrator disabled");
        self.state = IntegratorState::Disabled;
    }

    fn prepare(&mut self, particles: &Particles, rigid: &RigidData) -> Result<()> {
        let mut bodies = Vec::new();
        for (k, body) in rigid.bodies().iter().enumerate() {
            let covered = body
                .members()
                .iter()
                .filter(|&&i| self.group.contains(i))
                .count();
            if covered == 0 {
                continue;
            }
            if covered < body.len() {
                return Err(Error::Configuration(format!(
                    "group '{}' covers only {covered} of the {} particles of body {}",
                    self.group.name(),
                    body.len(),
                    body.id()
                )));
            }
            for &i in body.members() {
                self.friction.gamma(particles, i)?;
            }
            bodies.push(k);
        }
        let free = self
            .group
            .members()
            .iter()
            .filter(|&&i| particles.bodies().get(i).copied().flatten().is_none())
            .count();
        if free > 0 {
            debug!(
                group = self.group.name(),
                free, "free particles are not moved by the rigid BD integrator"
            );
        }
        self.bodies = bodies;
        Ok(())
    }

    #[instrument(skip_all, fields(step = ctx.step))]
    fn integrate_step(&mut self, ctx: StepContext<'_>) -> Result<()> {
        if self.bodies.is_empty() {
            return Ok(());
        }
        let StepContext {
            step,
            dt,
            particles,
            rigid,
            container,
            ..
        } = ctx;
        let this = &*self;
        let step_seed = mix_seed(this.seed, step as u64);
        let selected = &this.bodies;
        {
            let particles: &Particles = particles;
            rigid
                .bodies_mut()
                .par_iter_mut()
                .enumerate()
                .filter(|(k, _)| selected.binary_search(k).is_ok())
                .try_for_each(|(_, body)| {
                    let mut rng = StdRng::seed_from_u64(mix_seed(step_seed, body.id() as u64));
                    this.add_drag_and_noise(body, particles, &mut rng, dt)?;
                    body.advance(dt, this.limit);
                    body.com = container.wrap(body.com);
                    Ok::<(), Error>(())
                })?;
        }
        for &k in selected {
            write_body(&rigid.bodies()[k], particles, container);
        }
        Ok(())
    }
}

impl TypeObserver for BdNvtRigid {
    fn ensure_type_capacity(&mut self, types: &TypeRegistry) {
        if let Friction::PerType(table) = &mut self.friction {
            table.ensure_type_capacity(types);
        }
    }
}

fn check_temperature(temperature: f64) -> Result<()> {
    if !(temperature >= 0.0) || !temperature.is_finite() {
        return Err(Error::InvalidInput(format!(
            "temperature should be non-negative, found {temperature}"
        )));
    }
    Ok(())
}

fn check_limit(limit: f64) -> Result<()> {
    if !(limit > 0.0) || !limit.is_finite() {
        return Err(Error::InvalidInput(format!(
            "movement limit should be positive, found {limit}"
        )));
    }
    Ok(())
}
