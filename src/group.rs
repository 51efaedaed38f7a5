use nalgebra::Vector3;

use crate::{Error, Particles, Result};

/// Immutable, ordered selection of particle indices fixed at construction time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    name: String,
    members: Vec<usize>,
}
impl Group {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            members: Vec::new(),
        }
    }
    pub fn all(particles: &Particles) -> Self {
        Self {
            name: "all".to_owned(),
            members: (0..particles.len()).collect(),
        }
    }
    /// Selects the given indices, sorted and deduplicated.
    pub fn from_indices(name: &str, particles: &Particles, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= particles.len()) {
            return Err(Error::InvalidInput(format!(
                "group '{name}' selects particle {bad} but only {} exist",
                particles.len()
            )));
        }
        let mut members = indices.to_vec();
        members.sort_unstable();
        members.dedup();
        Ok(Self {
            name: name.to_owned(),
            members,
        })
    }
    /// Selects every particle for which `predicate(index, particles)` holds.
    pub fn filter<F>(name: &str, particles: &Particles, predicate: F) -> Self
    where
        F: Fn(usize, &Particles) -> bool,
    {
        Self {
            name: name.to_owned(),
            members: (0..particles.len())
                .filter(|&i| predicate(i, particles))
                .collect(),
        }
    }
    /// Selects particles inside the axis-aligned box `[lo, hi)`.
    pub fn cuboid(name: &str, particles: &Particles, lo: Vector3<f64>, hi: Vector3<f64>) -> Self {
        Self::filter(name, particles, |i, p| {
            let x = p.positions[i];
            (0..3).all(|k| x[k] >= lo[k] && x[k] < hi[k])
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn members(&self) -> &[usize] {
        &self.members
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn contains(&self, idx: usize) -> bool {
        self.members.binary_search(&idx).is_ok()
    }
    pub fn overlaps(&self, other: &Group) -> bool {
        self.members.iter().any(|&i| other.contains(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Particle;

    fn line(n: usize) -> Particles {
        let mut p = Particles::new();
        for i in 0..n {
            p.add(Particle::new(Vector3::new(i as f64, 0.0, 0.0), i % 2))
                .unwrap();
        }
        p
    }

    #[test]
    fn indices_are_sorted_and_deduplicated() {
        let p = line(5);
        let g = Group::from_indices("g", &p, &[3, 1, 3]).unwrap();
        assert_eq!(g.members(), &[1, 3]);
        assert!(g.contains(3));
        assert!(!g.contains(2));
        assert!(Group::from_indices("bad", &p, &[5]).is_err());
    }

    #[test]
    fn cuboid_far_away_is_empty() {
        let p = line(5);
        let g = Group::cuboid(
            "empty",
            &p,
            Vector3::repeat(-100.0),
            Vector3::repeat(-100.0),
        );
        assert!(g.is_empty());
        assert!(!g.overlaps(&Group::all(&p)));
    }

    #[test]
    fn filter_by_type() {
        let p = line(5);
        let odd = Group::filter("odd", &p, |i, p| p.types[i] == 1);
        assert_eq!(odd.members(), &[1, 3]);
        assert!(odd.overlaps(&Group::all(&p)));
    }
}
