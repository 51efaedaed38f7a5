pub mod neighbor_list;
pub mod neighbor_update_settings;

pub use neighbor_list::NeighborList;
pub use neighbor_update_settings::UpdateSettings;

use crate::{Container, Particles, Result};

/// Whether each pair appears once (`i < j`) or under both particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Storage {
    Half,
    Full,
}

/// Spatial index producing the neighbor enumeration consumed by pair forces.
pub trait SpatialIndex: Send + Sync {
    /// Set the interaction cutoff the index must cover; takes effect on the next build.
    fn update_cutoff(&mut self, r_cut: f64) -> Result<()>;

    fn r_cut(&self) -> f64;

    /// Rebuild if needed for `step`; returns whether the list was rebuilt.
    fn build(&mut self, particles: &Particles, container: &Container, step: usize) -> Result<bool>;

    /// Neighbors of every particle
    fn neighbors(&self) -> &[Vec<usize>];

    fn storage(&self) -> Storage;
}
