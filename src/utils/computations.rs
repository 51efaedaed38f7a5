use nalgebra::{Matrix3, Vector3};

/// Inverse of a diagonal of principal moments, leaving degenerate axes at zero.
///
/// ```rust
/// use nalgebra::Vector3;
/// use rbd::utils::inverse_moments;
///
/// let inv = inverse_moments(&Vector3::new(2.0, 0.0, 4.0));
/// assert_eq!(inv, Vector3::new(0.5, 0.0, 0.25));
/// ```
pub fn inverse_moments(moments: &Vector3<f64>) -> Vector3<f64> {
    moments.map(|m| if m > 0.0 { 1.0 / m } else { 0.0 })
}

/// Moment of inertia tensor contribution of a point mass at `d` from the origin.
pub fn point_inertia(mass: f64, d: &Vector3<f64>) -> Matrix3<f64> {
    mass * (Matrix3::identity() * d.norm_squared() - d * d.transpose())
}

/// 64-bit mixing function used to derive independent random stream seeds.
pub fn mix_seed(a: u64, b: u64) -> u64 {
    let mut z = a ^ b.wrapping_add(0x9e37_79b9_7f4a_7c15).wrapping_add(a << 6);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_inertia_on_axis() {
        let i = point_inertia(2.0, &Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(i[(0, 0)], 0.0);
        assert_eq!(i[(1, 1)], 2.0);
        assert_eq!(i[(2, 2)], 2.0);
    }

    #[test]
    fn mixed_seeds_differ_per_input() {
        assert_ne!(mix_seed(1, 2), mix_seed(2, 1));
        assert_ne!(mix_seed(0, 0), mix_seed(0, 1));
        assert_eq!(mix_seed(7, 9), mix_seed(7, 9));
    }
}
