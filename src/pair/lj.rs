use super::{PairCoeff, PairPotentialTrait, ParamSpec};

const PARAMS: [ParamSpec; 3] = [
    ParamSpec::required("epsilon"),
    ParamSpec::required("sigma"),
    ParamSpec::with_default("alpha", 1.0),
];

/// Lennard-Jones 12-6 potential
///
/// U(r) = 4 eps ((sig/r)^12 - alpha (sig/r)^6)
#[derive(Clone, Copy, Debug, Default)]
pub struct LennardJones;

impl PairPotentialTrait for LennardJones {
    fn name(&self) -> &'static str {
        "lj"
    }
    fn params(&self) -> &'static [ParamSpec] {
        &PARAMS
    }
    fn prepare(&self, values: &[f64]) -> PairCoeff {
        let [epsilon, sigma, alpha] = [values[0], values[1], values[2]];
        let sigma6 = sigma.powi(6);
        let lj1 = 4.0 * epsilon * sigma6 * sigma6;
        let lj2 = alpha * 4.0 * epsilon * sigma6;
        [lj1, lj2, 0.0, 0.0]
    }
    fn evaluate(&self, rsq: f64, coeff: &PairCoeff) -> (f64, f64) {
        // f(r) / r = -dU/dr / r = (12 lj1 r^-12 - 6 lj2 r^-6) / r^2
        let [lj1, lj2, _, _] = *coeff;
        let r2inv = 1.0 / rsq;
        let r6inv = r2inv * r2inv * r2inv;
        let force_divr = r2inv * r6inv * (12.0 * lj1 * r6inv - 6.0 * lj2);
        let energy = r6inv * (lj1 * r6inv - lj2);
        (force_divr, energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn minimum_of_standard_lj_has_zero_force() {
        let lj = LennardJones;
        let coeff = lj.prepare(&[1.0, 1.0, 1.0]);
        let rmin2 = 2f64.powf(1.0 / 3.0);
        let (f, e) = lj.evaluate(rmin2, &coeff);
        assert!(f.abs() < TOLERANCE);
        assert!((e + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn energy_vanishes_at_sigma() {
        let lj = LennardJones;
        let coeff = lj.prepare(&[2.0, 1.5, 1.0]);
        let (_, e) = lj.evaluate(1.5 * 1.5, &coeff);
        assert!(e.abs() < TOLERANCE);
    }
}
