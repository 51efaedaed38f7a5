//! Rigid trimers under Brownian dynamics with a shifted Lennard-Jones interaction.
//!
//! Run with `RUST_LOG=info cargo run --example rigid_bd`.

use nalgebra::{UnitQuaternion, Vector3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rbd::prelude::*;

const N_SIDE: usize = 4;
const SPACING: f64 = 3.5;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let types = TypeRegistry::new(&["A", "B"])?;
    let l = N_SIDE as f64 * SPACING;
    let container = Container::cube_periodic(l)?;

    // Bent trimers with random initial orientations
    let mut rng = StdRng::seed_from_u64(2024);
    let shape = [
        (Vector3::new(-0.8, 0.0, 0.0), 0),
        (Vector3::new(0.0, 0.0, 0.0), 1),
        (Vector3::new(0.5, 0.7, 0.0), 0),
    ];
    let mut particles = Particles::new();
    let mut body = 0;
    for i in 0..N_SIDE {
        for j in 0..N_SIDE {
            for k in 0..N_SIDE {
                let center = Vector3::new(i as f64, j as f64, k as f64) * SPACING
                    - Vector3::repeat(0.5 * l - 0.5 * SPACING);
                let axis = Vector3::new(rng.gen(), rng.gen(), rng.gen::<f64>()) * 2.0
                    - Vector3::repeat(1.0);
                let q = UnitQuaternion::from_scaled_axis(axis);
                for (offset, type_id) in shape {
                    particles.add(Particle::new(center + q * offset, type_id).with_body(body))?;
                }
                body += 1;
            }
        }
    }

    let mut sim = Simulation::new(types, particles, container, ExecutionConfig::default())?;
    let lj = sim.set_pair_potential(LennardJones, 2.5)?;
    lj.pair_coeff_mut().set(
        Types::Range(0..2),
        Types::Range(0..2),
        &[("epsilon", 1.0), ("sigma", 1.0)],
    )?;
    lj.pair_coeff_mut()
        .set_pair(0, 1, &[("sigma", 0.9), ("alpha", 0.5)])?;
    lj.set_params("xplor")?;
    lj.pair_coeff_mut()
        .set(Types::Range(0..2), Types::Range(0..2), &[("r_on", 2.0)])?;

    let all = Group::all(sim.particles());
    let config = BdConfig::new(1.0)
        .with_seed(12345)
        .with_gamma(1, 2.0)
        .with_limit(0.1);
    let bd = sim.add_integrator(BdNvtRigid::new(all, config, sim.types())?);
    sim.enable_integrator(bd)?;
    sim.set_thermo_period(200);

    sim.run(0.005, 1000)?;

    // Cool down
    if let Some(bd) = sim.integrator_mut(bd).and_then(|i| i.as_bd_nvt_rigid_mut()) {
        bd.set_params(0.5)?;
    }
    sim.run(0.005, 1000)?;

    println!("{}", sim.thermo());
    Ok(())
}
