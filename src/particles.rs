use nalgebra::{UnitQuaternion, Vector3};

use crate::{Error, Result};

/// A single particle, used to add particles to [`Particles`].
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub type_id: usize,
    pub mass: f64,
    pub diameter: f64,
    pub orientation: UnitQuaternion<f64>,
    pub body: Option<usize>,
}
impl Particle {
    pub fn new(position: Vector3<f64>, type_id: usize) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            type_id,
            mass: 1.0,
            diameter: 1.0,
            orientation: UnitQuaternion::identity(),
            body: None,
        }
    }
    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }
    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = diameter;
        self
    }
    pub fn with_orientation(mut self, orientation: UnitQuaternion<f64>) -> Self {
        self.orientation = orientation;
        self
    }
    pub fn with_body(mut self, body: usize) -> Self {
        self.body = Some(body);
        self
    }
}

/// Particle properties during simulation, not including forces
#[derive(Clone, Debug, Default)]
pub struct Particles {
    pub positions: Vec<Vector3<f64>>,
    pub velocities: Vec<Vector3<f64>>,
    pub types: Vec<usize>,
    pub masses: Vec<f64>,
    pub diameters: Vec<f64>,
    pub orientations: Vec<UnitQuaternion<f64>>,
    pub bodies: Vec<Option<usize>>,
}
impl Particles {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.positions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
    pub fn positions(&self) -> &[Vector3<f64>] {
        &self.positions
    }
    pub fn velocities(&self) -> &[Vector3<f64>] {
        &self.velocities
    }
    pub fn types(&self) -> &[usize] {
        &self.types
    }
    pub fn bodies(&self) -> &[Option<usize>] {
        &self.bodies
    }

    /// Adds a particle and returns its index.
    pub fn add(&mut self, particle: Particle) -> Result<usize> {
        if !(particle.mass > 0.0) || !particle.mass.is_finite() {
            return Err(Error::InvalidInput(format!(
                "particle mass should be positive, found {}",
                particle.mass
            )));
        }
        if !(particle.diameter >= 0.0) || !particle.diameter.is_finite() {
            return Err(Error::InvalidInput(format!(
                "particle diameter should be non-negative, found {}",
                particle.diameter
            )));
        }
        self.positions.push(particle.position);
        self.velocities.push(particle.velocity);
        self.types.push(particle.type_id);
        self.masses.push(particle.mass);
        self.diameters.push(particle.diameter);
        self.orientations.push(particle.orientation);
        self.bodies.push(particle.body);
        Ok(self.len() - 1)
    }

    pub fn get(&self, idx: usize) -> Option<Particle> {
        (idx < self.len()).then(|| Particle {
            position: self.positions[idx],
            velocity: self.velocities[idx],
            type_id: self.types[idx],
            mass: self.masses[idx],
            diameter: self.diameters[idx],
            orientation: self.orientations[idx],
            body: self.bodies[idx],
        })
    }
    pub fn set_diameter(&mut self, idx: usize, diameter: f64) -> Result<()> {
        if !(diameter >= 0.0) || !diameter.is_finite() {
            return Err(Error::InvalidInput(format!(
                "particle diameter should be non-negative, found {diameter}"
            )));
        }
        let d = self
            .diameters
            .get_mut(idx)
            .ok_or_else(|| Error::InvalidInput(format!("no particle with index {idx}")))?;
        *d = diameter;
        Ok(())
    }

    pub(crate) fn max_type(&self) -> Option<usize> {
        self.types.iter().copied().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fields_land_in_arrays() {
        let mut particles = Particles::new();
        let idx = particles
            .add(
                Particle::new(Vector3::new(1.0, 2.0, 3.0), 1)
                    .with_mass(2.0)
                    .with_diameter(0.5)
                    .with_body(4),
            )
            .unwrap();
        assert_eq!(idx, 0);
        assert_eq!(particles.masses[0], 2.0);
        assert_eq!(particles.diameters[0], 0.5);
        assert_eq!(particles.bodies[0], Some(4));
        assert_eq!(particles.get(0).unwrap().type_id, 1);
        assert!(particles.get(1).is_none());
    }

    #[test]
    fn non_positive_mass_is_rejected() {
        let mut particles = Particles::new();
        assert!(particles
            .add(Particle::new(Vector3::zeros(), 0).with_mass(0.0))
            .is_err());
        assert!(particles.is_empty());
    }

    #[test]
    fn diameter_must_be_finite_and_non_negative() {
        let mut particles = Particles::new();
        particles.add(Particle::new(Vector3::zeros(), 0)).unwrap();
        assert!(particles.set_diameter(0, f64::INFINITY).is_err());
        assert!(particles.set_diameter(0, f64::NAN).is_err());
        assert!(particles.set_diameter(0, -1.0).is_err());
        assert!(particles.set_diameter(1, 1.0).is_err());
        particles.set_diameter(0, 2.0).unwrap();
        assert_eq!(particles.diameters[0], 2.0);
    }
}
