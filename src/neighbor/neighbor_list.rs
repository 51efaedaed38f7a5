use nalgebra::Vector3;
use rayon::prelude::*;
use tracing::debug;

use super::{SpatialIndex, Storage, UpdateSettings};
use crate::{Container, Error, Particles, Result};

/// Reference O(N^2) neighbor list over `r_cut + r_buff`.
#[derive(Clone, Debug)]
pub struct NeighborList {
    r_cut: f64,
    r_buff: f64,
    storage: Storage,
    filter_body: bool,
    settings: UpdateSettings,
    neighbors: Vec<Vec<usize>>,
    pos_at_prev_build: Vec<Vector3<f64>>,
    last_update_step: usize,
    force_update: bool,
    num_builds: usize,
}
impl NeighborList {
    pub fn new(r_cut: f64, r_buff: f64) -> Result<Self> {
        check_distance("cutoff", r_cut)?;
        check_distance("buffer", r_buff)?;
        Ok(Self {
            r_cut,
            r_buff,
            storage: Storage::Half,
            filter_body: false,
            settings: UpdateSettings::default(),
            neighbors: Vec::new(),
            pos_at_prev_build: Vec::new(),
            last_update_step: 0,
            force_update: true,
            num_builds: 0,
        })
    }
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        self.force_update = true;
        self
    }
    /// Exclude pairs of particles that belong to the same rigid body.
    pub fn with_filter_body(mut self, filter_body: bool) -> Self {
        self.filter_body = filter_body;
        self.force_update = true;
        self
    }

    // Getters
    pub fn r_buff(&self) -> f64 {
        self.r_buff
    }
    pub fn update_settings(&self) -> UpdateSettings {
        self.settings
    }
    pub fn num_builds(&self) -> usize {
        self.num_builds
    }

    // Setters
    pub fn set_update_settings(&mut self, settings: UpdateSettings) {
        self.settings = settings;
    }
    pub fn set_r_buff(&mut self, r_buff: f64) -> Result<()> {
        check_distance("buffer", r_buff)?;
        self.r_buff = r_buff;
        self.force_update = true;
        Ok(())
    }
    pub fn force_update(&mut self) {
        self.force_update = true;
    }

    fn should_update(&self, particles: &Particles, step: usize) -> bool {
        if self.force_update || self.pos_at_prev_build.len() != particles.len() {
            return true;
        }
        self.settings.may_update(step, self.last_update_step)
            && (!self.settings.check || self.particles_moved_too_far(particles))
    }

    fn particles_moved_too_far(&self, particles: &Particles) -> bool {
        let half_skin = 0.5 * self.r_buff;
        self.pos_at_prev_build
            .iter()
            .zip(particles.positions())
            .map(|(old, new)| (new - old).norm_squared())
            .reduce(f64::max)
            .map_or(false, |max_dist_sq| max_dist_sq > half_skin * half_skin)
    }

    fn rebuild(&mut self, particles: &Particles, container: &Container) -> Result<()> {
        let rmax = self.r_cut + self.r_buff;
        if rmax >= container.max_range() {
            return Err(Error::Configuration(format!(
                "simulation box is too small for neighbor range {rmax}, \
                 particles would interact with their own images"
            )));
        }
        let rmaxsq = rmax * rmax;
        let positions = particles.positions();
        let bodies = particles.bodies();
        let filter_body = self.filter_body;
        let storage = self.storage;

        self.neighbors = (0..particles.len())
            .into_par_iter()
            .map(|i| {
                let start = match storage {
                    Storage::Half => i + 1,
                    Storage::Full => 0,
                };
                (start..positions.len())
                    .filter(|&j| {
                        if i == j {
                            return false;
                        }
                        let excluded = filter_body && bodies[i].is_some() && bodies[i] == bodies[j];
                        let dx = container.min_image(positions[j] - positions[i]);
                        !excluded && dx.norm_squared() <= rmaxsq
                    })
                    .collect()
            })
            .collect();
        self.pos_at_prev_build = positions.to_vec();
        self.num_builds += 1;
        Ok(())
    }
}

impl SpatialIndex for NeighborList {
    fn update_cutoff(&mut self, r_cut: f64) -> Result<()> {
        check_distance("cutoff", r_cut)?;
        if r_cut != self.r_cut {
            debug!(old = self.r_cut, new = r_cut, "neighbor list cutoff changed");
            self.r_cut = r_cut;
            self.force_update = true;
        }
        Ok(())
    }
    fn r_cut(&self) -> f64 {
        self.r_cut
    }
    fn build(&mut self, particles: &Particles, container: &Container, step: usize) -> Result<bool> {
        if !self.should_update(particles, step) {
            return Ok(false);
        }
        self.rebuild(particles, container)?;
        self.last_update_step = step;
        self.force_update = false;
        debug!(step, builds = self.num_builds, "neighbor list rebuilt");
        Ok(true)
    }
    fn neighbors(&self) -> &[Vec<usize>] {
        &self.neighbors
    }
    fn storage(&self) -> Storage {
        self.storage
    }
}

fn check_distance(what: &str, value: f64) -> Result<()> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(Error::InvalidInput(format!(
            "neighbor list {what} radius should be non-negative, found {value}"
        )));
    }
    Ok(())
}
