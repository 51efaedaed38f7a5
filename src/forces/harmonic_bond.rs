use nalgebra::Vector3;
use tracing::debug;

use crate::{pair::PairForces, Container, Error, Particles, Result, TypeRegistry};

/// Spring constant and rest length of one bond type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BondParams {
    pub k: f64,
    pub r_0: f64,
}

/// A bond of type `bond_type` between particles `a` and `b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bond {
    pub bond_type: usize,
    pub a: usize,
    pub b: usize,
}

/// Harmonic springs, `V = K (r - r_0)^2 / 2` per bond.
///
/// Bond types are named with their own [`TypeRegistry`], separate from the
/// particle types. Every bond type that is used must have its parameters set
/// before a run.
#[derive(Clone, Debug)]
pub struct HarmonicBond {
    bond_types: TypeRegistry,
    params: Vec<Option<BondParams>>,
    bonds: Vec<Bond>,
}
impl HarmonicBond {
    pub fn new(bond_types: TypeRegistry) -> Result<Self> {
        if bond_types.is_empty() {
            return Err(Error::InvalidInput("no bond types specified".into()));
        }
        Ok(Self {
            params: vec![None; bond_types.len()],
            bond_types,
            bonds: Vec::new(),
        })
    }

    // Getters
    pub fn bond_types(&self) -> &TypeRegistry {
        &self.bond_types
    }
    pub fn params(&self, bond_type: usize) -> Option<BondParams> {
        self.params.get(bond_type).copied().flatten()
    }
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    // Setters
    pub fn set_params(&mut self, bond_type: usize, k: f64, r_0: f64) -> Result<()> {
        if !(k >= 0.0) || !k.is_finite() || !(r_0 >= 0.0) || !r_0.is_finite() {
            return Err(Error::InvalidInput(format!(
                "bond parameters should be finite and non-negative, found K = {k}, r_0 = {r_0}"
            )));
        }
        let slot = self.params.get_mut(bond_type).ok_or_else(|| {
            Error::InvalidInput(format!("no bond type with index {bond_type}"))
        })?;
        *slot = Some(BondParams { k, r_0 });
        Ok(())
    }
    pub fn add_bond(&mut self, bond_type: usize, a: usize, b: usize) -> Result<()> {
        if bond_type >= self.bond_types.len() {
            return Err(Error::InvalidInput(format!(
                "no bond type with index {bond_type}"
            )));
        }
        if a == b {
            return Err(Error::InvalidInput(format!(
                "particle {a} cannot be bonded to itself"
            )));
        }
        self.bonds.push(Bond { bond_type, a, b });
        Ok(())
    }

    /// Checks that every bond refers to existing particles and a parameterized type.
    pub fn validate(&self, num_particles: usize) -> Result<()> {
        for bond in &self.bonds {
            if bond.a.max(bond.b) >= num_particles {
                return Err(Error::Configuration(format!(
                    "bond ({}, {}) refers to a particle out of range for {num_particles} particles",
                    bond.a, bond.b
                )));
            }
            self.require(bond.bond_type)?;
        }
        Ok(())
    }

    /// Adds bond forces, energies and virials onto `out`.
    ///
    /// Bonds are visited in insertion order, so the sums do not depend on threading.
    pub fn apply(
        &self,
        particles: &Particles,
        container: &Container,
        out: &mut PairForces,
    ) -> Result<()> {
        for bond in &self.bonds {
            let BondParams { k, r_0 } = self.require(bond.bond_type)?;
            let dx: Vector3<f64> =
                container.min_image(particles.positions[bond.b] - particles.positions[bond.a]);
            let rsq = dx.norm_squared();
            let r = rsq.sqrt();
            let energy = 0.25 * k * (r - r_0) * (r - r_0);
            out.energies[bond.a] += energy;
            out.energies[bond.b] += energy;
            if r > 0.0 {
                let force_divr = k * (r_0 / r - 1.0);
                let virial = rsq * force_divr / 6.0;
                out.forces[bond.b] += dx * force_divr;
                out.forces[bond.a] -= dx * force_divr;
                out.virials[bond.a] += virial;
                out.virials[bond.b] += virial;
            }
        }
        debug!(num_bonds = self.bonds.len(), "harmonic bonds applied");
        Ok(())
    }

    fn require(&self, bond_type: usize) -> Result<BondParams> {
        self.params(bond_type).ok_or_else(|| {
            let name = self.bond_types.name(bond_type).unwrap_or("?");
            Error::Configuration(format!("no parameters set for bond type '{name}'"))
        })
    }
}
