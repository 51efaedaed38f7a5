use nalgebra::Vector3;

use crate::{Error, Result};

/// Boundary conditions along one axis of the simulation box.
///
/// P: Periodic
/// F: Fixed boundary, no wrapping or minimum image
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BC {
    P,
    F,
}
impl BC {
    /// Check whether the boundary condition is periodic
    pub fn is_periodic(&self) -> bool {
        matches!(self, BC::P)
    }
}

/// Simulation box, represented by a rectangular box and boundary conditions
#[derive(Clone, Debug)]
pub struct Container {
    lo: Vector3<f64>,
    hi: Vector3<f64>,
    bc: [BC; 3],
}
impl Container {
    // Creation

    /// Create a new container from its corners and boundary conditions
    pub fn new(lo: Vector3<f64>, hi: Vector3<f64>, bc: [BC; 3]) -> Result<Self> {
        if (0..3).any(|i| !(hi[i] > lo[i]) || !lo[i].is_finite() || !hi[i].is_finite()) {
            return Err(Error::InvalidInput(format!(
                "box upper corner {:?} should exceed lower corner {:?}",
                hi.as_slice(),
                lo.as_slice()
            )));
        }
        Ok(Self { lo, hi, bc })
    }
    /// Create a fully periodic cube of side `l` centered on the origin
    pub fn cube_periodic(l: f64) -> Result<Self> {
        let half = Vector3::repeat(0.5 * l);
        Self::new(-half, half, [BC::P, BC::P, BC::P])
    }

    // Getters
    pub fn lo(&self) -> &Vector3<f64> {
        &self.lo
    }
    pub fn hi(&self) -> &Vector3<f64> {
        &self.hi
    }
    pub fn lengths(&self) -> Vector3<f64> {
        self.hi - self.lo
    }
    /// Check whether the boundary condition along axis `i` is periodic
    pub fn is_periodic(&self, i: usize) -> bool {
        self.bc[i].is_periodic()
    }

    /// Nearest periodic image of a separation vector.
    pub fn min_image(&self, mut dx: Vector3<f64>) -> Vector3<f64> {
        let l = self.lengths();
        for i in 0..3 {
            if self.is_periodic(i) {
                dx[i] -= l[i] * (dx[i] / l[i]).round();
            }
        }
        dx
    }
    /// Wrap a position back into the box along periodic axes.
    pub fn wrap(&self, mut pos: Vector3<f64>) -> Vector3<f64> {
        let l = self.lengths();
        for i in 0..3 {
            if self.is_periodic(i) {
                pos[i] -= l[i] * ((pos[i] - self.lo[i]) / l[i]).floor();
            }
        }
        pos
    }
    /// Half the smallest periodic box length, the largest usable interaction range.
    pub fn max_range(&self) -> f64 {
        let l = self.lengths();
        (0..3)
            .filter(|&i| self.is_periodic(i))
            .map(|i| 0.5 * l[i])
            .fold(f64::INFINITY, f64::min)
    }
}
