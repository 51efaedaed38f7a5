//! Pair force evaluation over a neighbor list.

use nalgebra::Vector3;
use rbd::{pair::PairForces, prelude::*};

const TOL: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOL * b.abs().max(1.0)
}

/// Three particles on the x axis: 0 and 2 both interact with 1 but not with each other.
fn three_in_a_row(order: [f64; 3]) -> (TypeRegistry, Particles, Container) {
    let types = TypeRegistry::new(&["A"]).unwrap();
    let r = 2f64.powf(1.0 / 6.0);
    let mut particles = Particles::new();
    for k in order {
        particles
            .add(Particle::new(Vector3::new(k * r, 0.0, 0.0), 0))
            .unwrap();
    }
    (types, particles, Container::cube_periodic(1000.0).unwrap())
}

fn compute(pair: &PotentialPair, particles: &Particles, container: &Container) -> PairForces {
    let mut nlist = NeighborList::new(1.3, 3.0).unwrap();
    nlist.build(particles, container, 0).unwrap();
    pair.compute(particles, container, &nlist).unwrap()
}

#[test]
fn lj_three_particles() -> Result<()> {
    let (types, particles, container) = three_in_a_row([0.0, 1.0, 2.0]);
    let mut lj = PotentialPair::new(LennardJones, 1.3, &types)?;

    lj.pair_coeff_mut()
        .set_pair(0, 0, &[("epsilon", 1.15), ("sigma", 1.0)])?;
    let out = compute(&lj, &particles, &container);
    for i in 0..3 {
        assert!(out.forces[i].norm() < 1e-10);
        assert!(out.virials[i].abs() < 1e-10);
    }
    assert!(approx_eq(out.energies[0], -0.575));
    assert!(approx_eq(out.energies[1], -1.15));
    assert!(approx_eq(out.energies[2], -0.575));

    lj.pair_coeff_mut()
        .set_pair(0, 0, &[("sigma", 1.2), ("alpha", 0.45)])?;
    let out = compute(&lj, &particles, &container);
    assert!(approx_eq(out.forces[0].x, -93.09822608552962));
    assert!(approx_eq(out.energies[0], 3.5815110377468));
    assert!(approx_eq(out.virials[0], 17.416537590989));
    assert!(out.forces[1].norm() < 1e-9);
    assert!(approx_eq(out.energies[1], 7.1630220754935));
    assert!(approx_eq(out.virials[1], 34.833075181975));
    assert!(approx_eq(out.forces[2].x, 93.09822608552962));
    assert!(approx_eq(out.total_energy(), 2.0 * 7.1630220754935));
    Ok(())
}

#[test]
fn force_follows_particles_when_storage_order_changes() -> Result<()> {
    let (types, particles, container) = three_in_a_row([2.0, 1.0, 0.0]);
    let mut lj = PotentialPair::new(LennardJones, 1.3, &types)?;
    lj.pair_coeff_mut().set_pair(
        0,
        0,
        &[("epsilon", 1.15), ("sigma", 1.2), ("alpha", 0.45)],
    )?;
    let out = compute(&lj, &particles, &container);
    assert!(approx_eq(out.forces[0].x, 93.09822608552962));
    assert!(approx_eq(out.forces[2].x, -93.09822608552962));
    Ok(())
}

#[test]
fn full_and_half_lists_agree() -> Result<()> {
    let (types, particles, container) = three_in_a_row([0.0, 1.0, 2.0]);
    let mut lj = PotentialPair::new(LennardJones, 3.0, &types)?;
    lj.pair_coeff_mut()
        .set_pair(0, 0, &[("epsilon", 1.0), ("sigma", 1.1)])?;
    lj.set_params("xplor")?;
    lj.pair_coeff_mut().set_pair(0, 0, &[("r_on", 2.0)])?;

    let mut half = NeighborList::new(3.0, 0.2)?;
    let mut full = NeighborList::new(3.0, 0.2)?.with_storage(Storage::Full);
    half.build(&particles, &container, 0)?;
    full.build(&particles, &container, 0)?;
    let a = lj.compute(&particles, &container, &half)?;
    let b = lj.compute(&particles, &container, &full)?;
    assert_eq!(a.forces, b.forces);
    assert_eq!(a.energies, b.energies);
    Ok(())
}

#[test]
fn per_pair_cutoff_below_global_is_respected() -> Result<()> {
    let types = TypeRegistry::new(&["A", "B"])?;
    let mut particles = Particles::new();
    particles.add(Particle::new(Vector3::zeros(), 0))?;
    particles.add(Particle::new(Vector3::new(1.5, 0.0, 0.0), 1))?;
    let container = Container::cube_periodic(20.0)?;

    let mut lj = PotentialPair::new(LennardJones, 3.0, &types)?;
    lj.pair_coeff_mut().set(
        Types::Range(0..2),
        Types::Range(0..2),
        &[("epsilon", 1.0), ("sigma", 1.0)],
    )?;
    lj.pair_coeff_mut().set_pair(0, 1, &[("r_cut", 1.2)])?;
    assert_eq!(lj.max_rcut(), 3.0);

    let mut nlist = NeighborList::new(lj.max_rcut(), 0.4)?;
    nlist.build(&particles, &container, 0)?;
    assert_eq!(nlist.neighbors()[0], vec![1]);
    let out = lj.compute(&particles, &container, &nlist)?;
    assert_eq!(out.forces[0], Vector3::zeros());
    assert_eq!(out.total_energy(), 0.0);
    Ok(())
}

#[test]
fn unknown_mode_is_rejected_at_configuration() -> Result<()> {
    let types = TypeRegistry::new(&["A"])?;
    let mut morse = PotentialPair::new(Morse, 2.0, &types)?;
    let e = morse.set_params("blah").unwrap_err();
    assert_eq!(e.kind(), ErrorKind::InputValidation);
    assert_eq!(morse.shift_mode(), ShiftMode::NoShift);
    morse.set_params("shift")?;
    assert_eq!(morse.shift_mode(), ShiftMode::Shift);
    Ok(())
}

#[test]
fn morse_pair_matches_closed_form() -> Result<()> {
    let types = TypeRegistry::new(&["A"])?;
    let mut particles = Particles::new();
    particles.add(Particle::new(Vector3::zeros(), 0))?;
    particles.add(Particle::new(Vector3::new(0.0, 1.0, 0.0), 0))?;
    let container = Container::cube_periodic(20.0)?;

    let mut morse = PotentialPair::new(Morse, 2.0, &types)?;
    morse
        .pair_coeff_mut()
        .set_pair(0, 0, &[("D0", 1.0), ("alpha", 3.0), ("r0", 0.9)])?;
    let mut nlist = NeighborList::new(2.0, 0.4)?;
    nlist.build(&particles, &container, 0)?;
    let out = morse.compute(&particles, &container, &nlist)?;

    // attractive beyond r0
    assert!(approx_eq(out.forces[0].y, 1.1520395075261485));
    assert!(approx_eq(out.forces[1].y, -1.1520395075261485));
    assert!(approx_eq(out.total_energy(), -0.9328248052694093));
    Ok(())
}
