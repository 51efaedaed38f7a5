use nalgebra::Vector3;

use crate::{Error, Group, Result};

/// The same force on every particle of a group, for example gravity or an
/// applied field.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantForce {
    force: Vector3<f64>,
    group: Group,
}
impl ConstantForce {
    pub fn new(force: Vector3<f64>, group: Group) -> Result<Self> {
        if !force.iter().all(|f| f.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "constant force should be finite, found {:?}",
                force.as_slice()
            )));
        }
        Ok(Self { force, group })
    }

    pub fn force(&self) -> &Vector3<f64> {
        &self.force
    }
    pub fn group(&self) -> &Group {
        &self.group
    }
    pub fn set_force(&mut self, force: Vector3<f64>) -> Result<()> {
        *self = Self::new(force, self.group.clone())?;
        Ok(())
    }

    /// Adds the force onto every group member.
    pub fn apply(&self, forces: &mut [Vector3<f64>]) {
        for &i in self.group.members() {
            if let Some(f) = forces.get_mut(i) {
                *f += self.force;
            }
        }
    }
}
