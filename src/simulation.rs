use std::sync::Arc;

use rayon::ThreadPool;
use tracing::{debug, info, instrument};

use crate::{
    compute::{self, Compute, Thermo},
    integrators::{Integrator, IntegratorTrait, StepContext},
    neighbor::{NeighborList, SpatialIndex},
    pair::{PairForces, PairPotential, PotentialPair},
    type_registry::{TypeObserver, TypeRegistry},
    ConstantForce, Container, Error, ExecutionConfig, HarmonicBond, Particles, RigidData, Result,
};

/// Default skin distance of the neighbor list built by [`Simulation::new`].
pub const DEFAULT_R_BUFF: f64 = 0.4;

/// Handle to an integrator added with [`Simulation::add_integrator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntegratorId(usize);

/// Owns the system state and every force and integrator acting on it.
pub struct Simulation {
    types: TypeRegistry,
    particles: Particles,
    container: Container,
    rigid: RigidData,
    pair: Option<PotentialPair>,
    neighbor_list: Box<dyn SpatialIndex>,
    constant_force: Option<ConstantForce>,
    harmonic_bond: Option<HarmonicBond>,
    integrators: Vec<Integrator>,
    pool: Arc<ThreadPool>,
    pair_forces: PairForces,
    step: usize,
    thermo_period: usize,
    thermo_computes: Vec<Compute>,
}
impl Simulation {
    /// Create a new simulation; rigid bodies are built from the particles' body ids.
    pub fn new(
        types: TypeRegistry,
        mut particles: Particles,
        container: Container,
        execution: ExecutionConfig,
    ) -> Result<Self> {
        if let Some(t) = particles.max_type() {
            if t >= types.len() {
                return Err(Error::InvalidInput(format!(
                    "particle type index {t} out of range for {} known types",
                    types.len()
                )));
            }
        }
        let rigid = RigidData::initialize(&mut particles, &container)?;
        let neighbor_list = NeighborList::new(0.0, DEFAULT_R_BUFF)?.with_filter_body(true);
        let pair_forces = PairForces::zeros(particles.len());
        Ok(Self {
            types,
            particles,
            container,
            rigid,
            pair: None,
            neighbor_list: Box::new(neighbor_list),
            constant_force: None,
            harmonic_bond: None,
            integrators: Vec::new(),
            pool: execution.build_pool()?,
            pair_forces,
            step: 0,
            thermo_period: 0,
            thermo_computes: Compute::thermo_defaults(),
        })
    }

    // Getters
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }
    pub fn particles(&self) -> &Particles {
        &self.particles
    }
    /// Direct access to particle state. Rigid constituents are overwritten from
    /// their bodies on the next step.
    pub fn particles_mut(&mut self) -> &mut Particles {
        &mut self.particles
    }
    pub fn container(&self) -> &Container {
        &self.container
    }
    pub fn rigid(&self) -> &RigidData {
        &self.rigid
    }
    pub fn rigid_mut(&mut self) -> &mut RigidData {
        &mut self.rigid
    }
    pub fn pair(&self) -> Option<&PotentialPair> {
        self.pair.as_ref()
    }
    pub fn pair_mut(&mut self) -> Option<&mut PotentialPair> {
        self.pair.as_mut()
    }
    pub fn neighbor_list(&self) -> &dyn SpatialIndex {
        self.neighbor_list.as_ref()
    }
    pub fn constant_force(&self) -> Option<&ConstantForce> {
        self.constant_force.as_ref()
    }
    pub fn harmonic_bond(&self) -> Option<&HarmonicBond> {
        self.harmonic_bond.as_ref()
    }
    pub fn harmonic_bond_mut(&mut self) -> Option<&mut HarmonicBond> {
        self.harmonic_bond.as_mut()
    }
    pub fn integrator(&self, id: IntegratorId) -> Option<&Integrator> {
        self.integrators.get(id.0)
    }
    pub fn integrator_mut(&mut self, id: IntegratorId) -> Option<&mut Integrator> {
        self.integrators.get_mut(id.0)
    }
    /// Forces, energies and virials from the most recent step, pair and bond terms included
    pub fn pair_forces(&self) -> &PairForces {
        &self.pair_forces
    }
    /// Number of steps taken so far
    pub fn step(&self) -> usize {
        self.step
    }
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
    pub fn thermo(&self) -> Thermo {
        Thermo::compute(self)
    }
    pub fn thermo_computes(&self) -> &[Compute] {
        &self.thermo_computes
    }

    // Setters
    /// Registers a new particle type and grows every per-type table.
    pub fn add_type(&mut self, name: &str) -> Result<usize> {
        let id = self.types.add_type(name)?;
        if let Some(pair) = &mut self.pair {
            pair.ensure_type_capacity(&self.types);
        }
        for integrator in &mut self.integrators {
            integrator.ensure_type_capacity(&self.types);
        }
        Ok(id)
    }
    /// Installs a pair potential with `r_cut` as the default cutoff of every type pair.
    pub fn set_pair_potential(
        &mut self,
        potential: impl Into<PairPotential>,
        r_cut: f64,
    ) -> Result<&mut PotentialPair> {
        let pair = PotentialPair::new(potential, r_cut, &self.types)?;
        Ok(self.pair.insert(pair))
    }
    pub fn set_neighbor_list(&mut self, neighbor_list: impl SpatialIndex + 'static) {
        self.neighbor_list = Box::new(neighbor_list);
    }
    pub fn set_constant_force(&mut self, constant_force: Option<ConstantForce>) {
        self.constant_force = constant_force;
    }
    pub fn set_harmonic_bond(&mut self, harmonic_bond: Option<HarmonicBond>) {
        self.harmonic_bond = harmonic_bond;
    }
    /// Log thermodynamic quantities every `period` steps, never when 0.
    pub fn set_thermo_period(&mut self, period: usize) {
        self.thermo_period = period;
    }
    /// Quantities written on each thermo log line, in order.
    pub fn set_thermo_computes(&mut self, computes: Vec<Compute>) {
        self.thermo_computes = computes;
    }

    /// Adds an integrator in the constructed state; see [`Simulation::enable_integrator`].
    pub fn add_integrator(&mut self, integrator: impl Into<Integrator>) -> IntegratorId {
        let mut integrator = integrator.into();
        integrator.ensure_type_capacity(&self.types);
        self.integrators.push(integrator);
        IntegratorId(self.integrators.len() - 1)
    }
    /// Enables an integrator, rejecting it if its group overlaps an enabled one.
    pub fn enable_integrator(&mut self, id: IntegratorId) -> Result<()> {
        let candidate = self.integrators.get(id.0).ok_or_else(|| unknown_integrator(id))?;
        if let Some(other) = self
            .integrators
            .iter()
            .enumerate()
            .find(|(k, other)| {
                *k != id.0 && other.is_enabled() && other.group().overlaps(candidate.group())
            })
            .map(|(_, other)| other)
        {
            return Err(Error::Configuration(format!(
                "group '{}' overlaps group '{}' of an enabled integrator",
                candidate.group().name(),
                other.group().name()
            )));
        }
        self.integrators[id.0].enable();
        Ok(())
    }
    pub fn disable_integrator(&mut self, id: IntegratorId) -> Result<()> {
        self.integrators
            .get_mut(id.0)
            .ok_or_else(|| unknown_integrator(id))?
            .disable();
        Ok(())
    }

    // Other public functions
    /// Advances the system `num_steps` steps of size `timestep`.
    ///
    /// All configuration is checked before the first step; a failure leaves the
    /// system untouched.
    pub fn run(&mut self, timestep: f64, num_steps: usize) -> Result<()> {
        if !(timestep > 0.0) || !timestep.is_finite() {
            return Err(Error::InvalidInput(format!(
                "timestep should be positive, found {timestep}"
            )));
        }
        self.pre_check()?;

        info!(
            num_steps,
            timestep,
            r_cut = self.neighbor_list.r_cut(),
            threads = self.num_threads(),
            "run start"
        );
        let pool = Arc::clone(&self.pool);
        pool.install(|| {
            for _ in 0..num_steps {
                self.advance(timestep)?;
                if self.thermo_period > 0 && self.step % self.thermo_period == 0 {
                    info!(step = self.step, "{}", self.thermo_line());
                }
            }
            Ok::<(), Error>(())
        })?;
        info!(step = self.step, "run complete");
        Ok(())
    }

    /// The configured thermo quantities at the current step.
    pub fn thermo_line(&self) -> String {
        compute::format_line(&self.thermo_computes, self)
    }

    // Run methods
    fn pre_check(&mut self) -> Result<()> {
        if let Some(pair) = &self.pair {
            pair.update_coeffs()?;
            self.neighbor_list.update_cutoff(pair.max_rcut())?;
        }
        if let Some(bonds) = &self.harmonic_bond {
            bonds.validate(self.particles.len())?;
        }
        self.rigid.check_consistency(&self.particles)?;

        let enabled: Vec<usize> = (0..self.integrators.len())
            .filter(|&k| self.integrators[k].is_enabled())
            .collect();
        for (n, &a) in enabled.iter().enumerate() {
            for &b in &enabled[n + 1..] {
                if self.integrators[a]
                    .group()
                    .overlaps(self.integrators[b].group())
                {
                    return Err(Error::Configuration(format!(
                        "enabled integrators on groups '{}' and '{}' overlap",
                        self.integrators[a].group().name(),
                        self.integrators[b].group().name()
                    )));
                }
            }
        }
        for &k in &enabled {
            self.integrators[k].prepare(&self.particles, &self.rigid)?;
        }
        Ok(())
    }

    #[instrument(skip_all, fields(step = self.step))]
    fn advance(&mut self, dt: f64) -> Result<()> {
        self.compute_forces()?;
        self.rigid.accumulate_forces(&self.pair_forces.forces);

        for integrator in self.integrators.iter_mut().filter(|i| i.is_enabled()) {
            integrator.integrate_step(StepContext {
                step: self.step,
                dt,
                particles: &mut self.particles,
                rigid: &mut self.rigid,
                container: &self.container,
                forces: &self.pair_forces.forces,
            })?;
        }
        self.step += 1;
        Ok(())
    }

    fn compute_forces(&mut self) -> Result<()> {
        self.pair_forces = match &self.pair {
            Some(pair) => {
                let r_cut = pair.max_rcut();
                if r_cut != self.neighbor_list.r_cut() {
                    debug!(r_cut, "propagating pair cutoff to the neighbor list");
                    self.neighbor_list.update_cutoff(r_cut)?;
                }
                self.neighbor_list
                    .build(&self.particles, &self.container, self.step)?;
                pair.compute(&self.particles, &self.container, self.neighbor_list.as_ref())?
            }
            None => PairForces::zeros(self.particles.len()),
        };
        if let Some(bonds) = &self.harmonic_bond {
            bonds.apply(&self.particles, &self.container, &mut self.pair_forces)?;
        }
        if let Some(cf) = &self.constant_force {
            cf.apply(&mut self.pair_forces.forces);
        }
        Ok(())
    }
}

fn unknown_integrator(id: IntegratorId) -> Error {
    Error::InvalidInput(format!("no integrator with id {}", id.0))
}
