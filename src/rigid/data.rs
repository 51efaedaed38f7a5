use std::collections::BTreeMap;

use nalgebra::{Matrix3, Rotation3, SymmetricEigen, UnitQuaternion, Vector3};
use rayon::prelude::*;
use tracing::debug;

use super::RigidBody;
use crate::{utils::point_inertia, Container, Error, Particles, Result};

/// Principal moments below this fraction of the largest one are treated as zero.
const DEGENERATE_MOMENT_TOL: f64 = 1e-10;

/// All rigid bodies of a system, ordered by body id.
#[derive(Clone, Debug, Default)]
pub struct RigidData {
    bodies: Vec<RigidBody>,
    index: BTreeMap<usize, usize>,
}
impl RigidData {
    /// Builds every body from the particles carrying its id and writes the exact
    /// rigid state back onto those particles.
    pub fn initialize(particles: &mut Particles, container: &Container) -> Result<Self> {
        let mut by_body: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, body) in particles.bodies().iter().enumerate() {
            if let Some(b) = body {
                by_body.entry(*b).or_default().push(i);
            }
        }

        let bodies = by_body
            .into_iter()
            .map(|(id, members)| build_body(id, members, particles, container))
            .collect::<Result<Vec<_>>>()?;
        let index = bodies
            .iter()
            .enumerate()
            .map(|(k, b)| (b.id, k))
            .collect();
        let data = Self { bodies, index };
        data.write_particles(particles, container);
        debug!(num_bodies = data.len(), "rigid bodies initialized");
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }
    pub fn bodies_mut(&mut self) -> &mut [RigidBody] {
        &mut self.bodies
    }
    pub fn body(&self, id: usize) -> Option<&RigidBody> {
        self.index.get(&id).map(|&k| &self.bodies[k])
    }
    pub fn body_mut(&mut self, id: usize) -> Option<&mut RigidBody> {
        self.index.get(&id).map(|&k| &mut self.bodies[k])
    }

    /// Sums per-particle forces onto every body.
    pub fn accumulate_forces(&mut self, forces: &[Vector3<f64>]) {
        self.bodies
            .par_iter_mut()
            .for_each(|body| body.accumulate(forces));
    }

    /// Places every constituent particle from its body's transform.
    pub fn write_particles(&self, particles: &mut Particles, container: &Container) {
        for body in &self.bodies {
            write_body(body, particles, container);
        }
    }

    /// Checks that body membership lists and particle body fields agree.
    pub fn check_consistency(&self, particles: &Particles) -> Result<()> {
        for (i, body) in particles.bodies().iter().enumerate() {
            let Some(b) = body else { continue };
            let owner = self.body(*b).ok_or_else(|| {
                Error::InvariantViolation(format!(
                    "particle {i} claims body {b} but no such rigid body exists"
                ))
            })?;
            if owner.members.binary_search(&i).is_err() {
                return Err(Error::InvariantViolation(format!(
                    "particle {i} claims body {b} but is not one of its constituents"
                )));
            }
        }
        for body in &self.bodies {
            if let Some(&i) = body
                .members
                .iter()
                .find(|&&i| particles.bodies().get(i).copied().flatten() != Some(body.id))
            {
                return Err(Error::InvariantViolation(format!(
                    "body {} lists particle {i} which does not belong to it",
                    body.id
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn write_body(body: &RigidBody, particles: &mut Particles, container: &Container) {
    let omega = body.angular_velocity();
    for (k, &i) in body.members.iter().enumerate() {
        let arm = body.lever_arm(k);
        particles.positions[i] = container.wrap(body.com + arm);
        particles.velocities[i] = body.velocity + omega.cross(&arm);
        particles.orientations[i] = body.member_orientation(k);
    }
}

fn build_body(
    id: usize,
    members: Vec<usize>,
    particles: &Particles,
    container: &Container,
) -> Result<RigidBody> {
    let masses: Vec<f64> = members.iter().map(|&i| particles.masses[i]).collect();
    let mass: f64 = masses.iter().sum();

    // Unwrap constituents around the first one before averaging.
    let origin = particles.positions[members[0]];
    let unwrapped: Vec<Vector3<f64>> = members
        .iter()
        .map(|&i| container.min_image(particles.positions[i] - origin))
        .collect();
    let shift = unwrapped
        .iter()
        .zip(&masses)
        .fold(Vector3::zeros(), |acc, (d, &m)| acc + d * m)
        / mass;
    let arms: Vec<Vector3<f64>> = unwrapped.iter().map(|d| d - shift).collect();
    let com = container.wrap(origin + shift);

    let inertia = arms
        .iter()
        .zip(&masses)
        .fold(Matrix3::zeros(), |acc, (d, &m)| acc + point_inertia(m, d));
    let (moments, orientation) = principal_frame(inertia)?;

    let velocity = members
        .iter()
        .zip(&masses)
        .fold(Vector3::zeros(), |acc, (&i, &m)| acc + particles.velocities[i] * m)
        / mass;
    let angular_momentum = members
        .iter()
        .zip(&arms)
        .zip(&masses)
        .fold(Vector3::zeros(), |acc, ((&i, d), &m)| {
            acc + d.cross(&(particles.velocities[i] - velocity)) * m
        });

    let offsets = arms
        .iter()
        .map(|d| orientation.inverse_transform_vector(d))
        .collect();
    let orientation_offsets = members
        .iter()
        .map(|&i| orientation.inverse() * particles.orientations[i])
        .collect();

    let mut body = RigidBody {
        id,
        members,
        offsets,
        orientation_offsets,
        mass,
        moments,
        com,
        velocity,
        orientation,
        angular_momentum,
        force: Vector3::zeros(),
        torque: Vector3::zeros(),
    };
    // Drop angular momentum along degenerate axes.
    let omega = body.angular_velocity();
    body.set_angular_velocity(omega);
    Ok(body)
}

/// Principal moments and the right-handed rotation taking the body frame to the world frame.
fn principal_frame(inertia: Matrix3<f64>) -> Result<(Vector3<f64>, UnitQuaternion<f64>)> {
    let eigen = SymmetricEigen::new(inertia);
    let mut axes = eigen.eigenvectors;
    if axes.determinant() < 0.0 {
        let flipped = -axes.column(2);
        axes.set_column(2, &flipped);
    }
    let rotation = Rotation3::from_matrix_unchecked(axes);
    if !rotation.matrix().iter().all(|x| x.is_finite()) {
        return Err(Error::InvalidInput(
            "rigid body inertia tensor has no finite principal frame".into(),
        ));
    }

    let largest = eigen.eigenvalues.max();
    let moments = eigen
        .eigenvalues
        .map(|m| if m > DEGENERATE_MOMENT_TOL * largest { m } else { 0.0 });
    Ok((moments, UnitQuaternion::from_rotation_matrix(&rotation)))
}
