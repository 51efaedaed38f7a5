use std::{borrow::Cow, fmt, str::FromStr};

use nalgebra::Vector3;
use rayon::prelude::*;
use tracing::{debug, instrument};

use super::{CoeffTable, PairCoeff, PairPotential, PairPotentialTrait, ParamSpec};
use crate::{
    neighbor::{SpatialIndex, Storage},
    type_registry::{TypeObserver, TypeRegistry},
    Container, Error, Particles, Result,
};

/// How pair energies are reported near the cutoff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShiftMode {
    /// Raw potential energy
    #[default]
    NoShift,
    /// Energy shifted so that it is zero at the pair cutoff, forces unchanged
    Shift,
    /// XPLOR switching of energy and force between `r_on` and the cutoff
    Xplor,
}
impl FromStr for ShiftMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "no_shift" => Ok(ShiftMode::NoShift),
            "shift" => Ok(ShiftMode::Shift),
            "xplor" => Ok(ShiftMode::Xplor),
            _ => Err(Error::InvalidInput(format!(
                "invalid shift mode '{s}', expected one of no_shift, shift, xplor"
            ))),
        }
    }
}
impl fmt::Display for ShiftMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShiftMode::NoShift => "no_shift",
            ShiftMode::Shift => "shift",
            ShiftMode::Xplor => "xplor",
        };
        f.write_str(s)
    }
}

/// Per-particle accumulators produced by a force pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PairForces {
    pub forces: Vec<Vector3<f64>>,
    /// Half of every pair energy is assigned to each particle of the pair
    pub energies: Vec<f64>,
    /// Scalar virial, r . f / 6 per particle per pair
    pub virials: Vec<f64>,
}
impl PairForces {
    pub fn zeros(num_particles: usize) -> Self {
        Self {
            forces: vec![Vector3::zeros(); num_particles],
            energies: vec![0.0; num_particles],
            virials: vec![0.0; num_particles],
        }
    }
    pub fn total_energy(&self) -> f64 {
        self.energies.iter().sum()
    }
    pub fn total_virial(&self) -> f64 {
        self.virials.iter().sum()
    }
}

/// Resolved constants for one pair of types.
#[derive(Clone, Copy, Debug)]
struct PreparedPair {
    coeff: PairCoeff,
    rcutsq: f64,
    ronsq: f64,
    ecut: f64,
}

/// Short-ranged pair force over a type-indexed coefficient table.
#[derive(Clone, Debug)]
pub struct PotentialPair {
    potential: PairPotential,
    coeffs: CoeffTable,
    mode: ShiftMode,
}
impl PotentialPair {
    /// Create a pair force; `r_cut` is the default cutoff (and default `r_on`) for every pair.
    pub fn new(
        potential: impl Into<PairPotential>,
        r_cut: f64,
        types: &TypeRegistry,
    ) -> Result<Self> {
        if !(r_cut >= 0.0) || !r_cut.is_finite() {
            return Err(Error::InvalidInput(format!(
                "r_cut should be non-negative, found {r_cut}"
            )));
        }
        let potential = potential.into();
        let mut specs: Vec<ParamSpec> = potential.params().to_vec();
        specs.push(ParamSpec::with_default("r_cut", r_cut));
        specs.push(ParamSpec::with_default("r_on", r_cut));
        let coeffs = CoeffTable::new(specs, "r_cut", types)?;
        Ok(Self {
            potential,
            coeffs,
            mode: ShiftMode::NoShift,
        })
    }

    // Getters
    pub fn potential(&self) -> &PairPotential {
        &self.potential
    }
    pub fn shift_mode(&self) -> ShiftMode {
        self.mode
    }
    pub fn pair_coeff(&self) -> &CoeffTable {
        &self.coeffs
    }
    pub fn pair_coeff_mut(&mut self) -> &mut CoeffTable {
        &mut self.coeffs
    }
    /// Largest cutoff over all set pairs, the radius the spatial index must cover.
    pub fn max_rcut(&self) -> f64 {
        self.coeffs.max_cutoff()
    }

    // Setters
    /// Select the energy shift mode by name.
    pub fn set_params(&mut self, mode: &str) -> Result<()> {
        self.set_shift_mode(mode.parse()?);
        Ok(())
    }
    pub fn set_shift_mode(&mut self, mode: ShiftMode) {
        debug!(potential = self.potential.name(), %mode, "shift mode set");
        self.mode = mode;
    }

    /// Checks that every pair of known types has all required coefficients.
    pub fn update_coeffs(&self) -> Result<()> {
        self.coeffs.validate()
    }

    /// Force and energy for a single pair at squared separation `rsq`,
    /// `None` beyond the pair cutoff.
    pub fn evaluate_pair(&self, type_a: usize, type_b: usize, rsq: f64) -> Result<Option<(f64, f64)>> {
        let prepared = self.prepare_pair(type_a, type_b)?;
        Ok(self.eval(rsq, &prepared))
    }

    /// Computes per-particle forces, energies and virials over a neighbor enumeration.
    ///
    /// Coefficients are validated before any force is evaluated.
    #[instrument(skip_all, name = "pair_compute", fields(potential = self.potential.name()))]
    pub fn compute(
        &self,
        particles: &Particles,
        container: &Container,
        nlist: &dyn SpatialIndex,
    ) -> Result<PairForces> {
        let num_types = self.coeffs.num_types();
        let prepared = self.prepare()?;

        if let Some(t) = particles.max_type() {
            if t >= num_types {
                return Err(Error::InvariantViolation(format!(
                    "particle type {t} is not covered by the {num_types}-type coefficient table"
                )));
            }
        }
        let lists = nlist.neighbors();
        if lists.len() != particles.len() {
            return Err(Error::InvariantViolation(format!(
                "neighbor list covers {} particles but {} exist",
                lists.len(),
                particles.len()
            )));
        }
        let full: Cow<[Vec<usize>]> = match nlist.storage() {
            Storage::Full => Cow::Borrowed(lists),
            Storage::Half => Cow::Owned(full_from_half(lists)),
        };
        if let Some(&j) = full.iter().flatten().find(|&&j| j >= particles.len()) {
            return Err(Error::InvariantViolation(format!(
                "neighbor index {j} out of range for {} particles",
                particles.len()
            )));
        }

        let positions = particles.positions();
        let types = particles.types();
        let per_particle: Vec<(Vector3<f64>, f64, f64)> = (0..particles.len())
            .into_par_iter()
            .map(|i| {
                let mut force = Vector3::zeros();
                let mut energy = 0.0;
                let mut virial = 0.0;
                for &j in &full[i] {
                    if i == j {
                        continue;
                    }
                    let dx = container.min_image(positions[i] - positions[j]);
                    let rsq = dx.norm_squared();
                    let pair = &prepared[types[i] * num_types + types[j]];
                    if let Some((force_divr, pair_eng)) = self.eval(rsq, pair) {
                        force += dx * force_divr;
                        energy += 0.5 * pair_eng;
                        virial += rsq * force_divr / 6.0;
                    }
                }
                (force, energy, virial)
            })
            .collect();

        let mut out = PairForces::zeros(0);
        for (f, e, v) in per_particle {
            out.forces.push(f);
            out.energies.push(e);
            out.virials.push(v);
        }
        Ok(out)
    }

    /// Dense `num_types x num_types` table of resolved pair constants.
    fn prepare(&self) -> Result<Vec<PreparedPair>> {
        self.coeffs.validate()?;
        let n = self.coeffs.num_types();
        let mut prepared = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                prepared.push(self.prepare_pair(i, j)?);
            }
        }
        Ok(prepared)
    }

    fn prepare_pair(&self, type_a: usize, type_b: usize) -> Result<PreparedPair> {
        let values = self.coeffs.resolve(type_a, type_b)?;
        let nparams = self.potential.params().len();
        let coeff = self.potential.prepare(&values[..nparams]);
        let (r_cut, r_on) = (values[nparams], values[nparams + 1]);
        let rcutsq = r_cut * r_cut;
        let ecut = if rcutsq > 0.0 {
            self.potential.evaluate(rcutsq, &coeff).1
        } else {
            0.0
        };
        Ok(PreparedPair {
            coeff,
            rcutsq,
            ronsq: r_on * r_on,
            ecut,
        })
    }

    fn eval(&self, rsq: f64, pair: &PreparedPair) -> Option<(f64, f64)> {
        if pair.rcutsq <= 0.0 || rsq > pair.rcutsq {
            return None;
        }
        let (mut force_divr, mut pair_eng) = self.potential.evaluate(rsq, &pair.coeff);
        match self.mode {
            ShiftMode::NoShift => {}
            ShiftMode::Shift => pair_eng -= pair.ecut,
            ShiftMode::Xplor if pair.ronsq >= pair.rcutsq => pair_eng -= pair.ecut,
            ShiftMode::Xplor => {
                if rsq > pair.ronsq {
                    let (rc, ro) = (pair.rcutsq, pair.ronsq);
                    let denom = (rc - ro) * (rc - ro) * (rc - ro);
                    let s = (rc - rsq) * (rc - rsq) * (rc + 2.0 * rsq - 3.0 * ro) / denom;
                    let ds_dr_divr = 12.0 * (rc - rsq) * (ro - rsq) / denom;
                    force_divr = s * force_divr - ds_dr_divr * pair_eng;
                    pair_eng *= s;
                }
            }
        }
        Some((force_divr, pair_eng))
    }
}

impl TypeObserver for PotentialPair {
    fn ensure_type_capacity(&mut self, types: &TypeRegistry) {
        self.coeffs.ensure_type_capacity(types);
    }
}

/// Two-sided neighbor lists from one-sided ones, in a deterministic order.
fn full_from_half(half: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut full: Vec<Vec<usize>> = vec![Vec::new(); half.len()];
    for (i, neighbors) in half.iter().enumerate() {
        for &j in neighbors {
            full[i].push(j);
            if let Some(list) = full.get_mut(j) {
                list.push(i);
            }
        }
    }
    full
}
