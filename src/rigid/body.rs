use nalgebra::{UnitQuaternion, Vector3};

use crate::utils::inverse_moments;

/// A set of particles moving as one rigid assembly.
///
/// Constituent positions are never stored here; they follow from the body
/// transform and the fixed body-frame offsets.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidBody {
    pub(crate) id: usize,
    pub(crate) members: Vec<usize>,
    pub(crate) offsets: Vec<Vector3<f64>>,
    pub(crate) orientation_offsets: Vec<UnitQuaternion<f64>>,
    pub(crate) mass: f64,
    pub(crate) moments: Vector3<f64>,
    pub(crate) com: Vector3<f64>,
    pub(crate) velocity: Vector3<f64>,
    pub(crate) orientation: UnitQuaternion<f64>,
    pub(crate) angular_momentum: Vector3<f64>,
    pub(crate) force: Vector3<f64>,
    pub(crate) torque: Vector3<f64>,
}
impl RigidBody {
    // Getters
    pub fn id(&self) -> usize {
        self.id
    }
    /// Constituent particle indices, sorted
    pub fn members(&self) -> &[usize] {
        &self.members
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn mass(&self) -> f64 {
        self.mass
    }
    /// Principal moments of inertia, zero along degenerate axes
    pub fn moments(&self) -> &Vector3<f64> {
        &self.moments
    }
    pub fn center_of_mass(&self) -> &Vector3<f64> {
        &self.com
    }
    pub fn velocity(&self) -> &Vector3<f64> {
        &self.velocity
    }
    pub fn orientation(&self) -> &UnitQuaternion<f64> {
        &self.orientation
    }
    /// Angular momentum in the world frame
    pub fn angular_momentum(&self) -> &Vector3<f64> {
        &self.angular_momentum
    }
    pub fn force(&self) -> &Vector3<f64> {
        &self.force
    }
    pub fn torque(&self) -> &Vector3<f64> {
        &self.torque
    }
    /// Body-frame offset of the `k`-th constituent from the center of mass
    pub fn offset(&self, k: usize) -> &Vector3<f64> {
        &self.offsets[k]
    }

    /// Angular velocity in the world frame. Degenerate axes do not rotate.
    pub fn angular_velocity(&self) -> Vector3<f64> {
        let l_body = self.orientation.inverse_transform_vector(&self.angular_momentum);
        let w_body = inverse_moments(&self.moments).component_mul(&l_body);
        self.orientation.transform_vector(&w_body)
    }
    /// Sets the angular momentum reproducing `omega`, dropping components along degenerate axes.
    pub fn set_angular_velocity(&mut self, omega: Vector3<f64>) {
        let w_body = self.orientation.inverse_transform_vector(&omega);
        self.angular_momentum = self
            .orientation
            .transform_vector(&self.moments.component_mul(&w_body));
    }
    pub fn set_velocity(&mut self, velocity: Vector3<f64>) {
        self.velocity = velocity;
    }

    /// World-frame vector from the center of mass to the `k`-th constituent.
    pub fn lever_arm(&self, k: usize) -> Vector3<f64> {
        self.orientation.transform_vector(&self.offsets[k])
    }
    /// World-frame velocity of the `k`-th constituent.
    pub fn member_velocity(&self, k: usize) -> Vector3<f64> {
        self.velocity + self.angular_velocity().cross(&self.lever_arm(k))
    }
    pub fn member_orientation(&self, k: usize) -> UnitQuaternion<f64> {
        self.orientation * self.orientation_offsets[k]
    }

    /// Number of rotational degrees of freedom, one per non-degenerate principal axis.
    pub fn rotational_dof(&self) -> usize {
        self.moments.iter().filter(|&&m| m > 0.0).count()
    }
    pub fn translational_kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }
    pub fn rotational_kinetic_energy(&self) -> f64 {
        0.5 * self.angular_velocity().dot(&self.angular_momentum)
    }

    /// Sums per-particle forces into the net force and torque about the center of mass.
    pub fn accumulate(&mut self, forces: &[Vector3<f64>]) {
        let mut force = Vector3::zeros();
        let mut torque = Vector3::zeros();
        for (k, &i) in self.members.iter().enumerate() {
            force += forces[i];
            torque += self.lever_arm(k).cross(&forces[i]);
        }
        self.force = force;
        self.torque = torque;
    }
    pub fn add_force_and_torque(&mut self, force: Vector3<f64>, torque: Vector3<f64>) {
        self.force += force;
        self.torque += torque;
    }

    /// Advances the body one step with its current net force and torque.
    ///
    /// Momenta are updated first and positions follow from the new velocities.
    /// With a `limit`, the velocity is scaled down so the center of mass moves at
    /// most that distance. The center of mass is left unwrapped.
    pub fn advance(&mut self, dt: f64, limit: Option<f64>) {
        self.velocity += self.force * (dt / self.mass);
        if let Some(limit) = limit {
            let step = self.velocity.norm() * dt;
            if step > limit {
                self.velocity *= limit / step;
            }
        }
        self.angular_momentum += self.torque * dt;
        self.com += self.velocity * dt;
        let omega = self.angular_velocity();
        self.orientation = UnitQuaternion::from_scaled_axis(omega * dt) * self.orientation;
        self.orientation.renormalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dumbbell() -> RigidBody {
        RigidBody {
            id: 0,
            members: vec![0, 1],
            offsets: vec![Vector3::new(0.0, 0.0, -0.5), Vector3::new(0.0, 0.0, 0.5)],
            orientation_offsets: vec![UnitQuaternion::identity(); 2],
            mass: 2.0,
            moments: Vector3::new(0.5, 0.5, 0.0),
            com: Vector3::zeros(),
            velocity: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            angular_momentum: Vector3::zeros(),
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
        }
    }

    #[test]
    fn torque_from_opposite_forces() {
        let mut b = dumbbell();
        let forces = vec![Vector3::new(-1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)];
        b.accumulate(&forces);
        assert_eq!(b.force, Vector3::zeros());
        assert!((b.torque - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn degenerate_axis_does_not_spin() {
        let mut b = dumbbell();
        b.set_angular_velocity(Vector3::new(0.0, 2.0, 3.0));
        assert!((b.angular_velocity() - Vector3::new(0.0, 2.0, 0.0)).norm() < 1e-12);
        assert_eq!(b.rotational_dof(), 2);
        assert!((b.rotational_kinetic_energy() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn free_rotation_preserves_rotational_energy() {
        let mut b = dumbbell();
        b.set_angular_velocity(Vector3::new(0.3, 0.0, 0.0));
        let ke = b.rotational_kinetic_energy();
        for _ in 0..100 {
            b.advance(0.01, None);
        }
        assert!((b.rotational_kinetic_energy() - ke).abs() < 1e-12);
        assert!((b.lever_arm(1).norm() - 0.5).abs() < 1e-12);
        assert_eq!(b.com, Vector3::zeros());
    }

    #[test]
    fn limit_caps_center_of_mass_step() {
        let mut b = dumbbell();
        b.force = Vector3::new(400.0, 300.0, 0.0);
        b.advance(0.1, Some(0.05));
        assert!((b.com.norm() - 0.05).abs() < 1e-12);
        assert!((b.velocity.norm() - 0.5).abs() < 1e-12);

        // Below the limit nothing changes.
        let mut b = dumbbell();
        b.velocity = Vector3::new(0.1, 0.0, 0.0);
        b.advance(0.1, Some(0.05));
        assert!((b.com - Vector3::new(0.01, 0.0, 0.0)).norm() < 1e-15);
        assert_eq!(b.velocity, Vector3::new(0.1, 0.0, 0.0));
    }
}
