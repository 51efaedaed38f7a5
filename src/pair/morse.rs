use super::{PairCoeff, PairPotentialTrait, ParamSpec};

const PARAMS: [ParamSpec; 3] = [
    ParamSpec::required("D0"),
    ParamSpec::required("alpha"),
    ParamSpec::required("r0"),
];

/// Morse potential
///
/// U(r) = D0 (exp(-2 alpha (r - r0)) - 2 exp(-alpha (r - r0)))
#[derive(Clone, Copy, Debug, Default)]
pub struct Morse;

impl PairPotentialTrait for Morse {
    fn name(&self) -> &'static str {
        "morse"
    }
    fn params(&self) -> &'static [ParamSpec] {
        &PARAMS
    }
    fn prepare(&self, values: &[f64]) -> PairCoeff {
        [values[0], values[1], values[2], 0.0]
    }
    fn evaluate(&self, rsq: f64, coeff: &PairCoeff) -> (f64, f64) {
        let [d0, alpha, r0, _] = *coeff;
        let r = rsq.sqrt();
        let e1 = (-alpha * (r - r0)).exp();
        let e2 = e1 * e1;
        let force_divr = 2.0 * d0 * alpha * (e2 - e1) / r;
        let energy = d0 * (e2 - 2.0 * e1);
        (force_divr, energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_depth_at_r0() {
        let morse = Morse;
        let coeff = morse.prepare(&[1.5, 3.0, 0.9]);
        let (f, e) = morse.evaluate(0.81, &coeff);
        assert!(f.abs() < 1e-12);
        assert!((e + 1.5).abs() < 1e-12);
    }

    #[test]
    fn attractive_beyond_r0() {
        let morse = Morse;
        let coeff = morse.prepare(&[1.0, 3.0, 0.9]);
        let (f, e) = morse.evaluate(1.0, &coeff);
        assert!((f * 1.0 + 1.1520395075261485).abs() < 1e-9);
        assert!((e + 0.9328248052694093).abs() < 1e-9);
    }
}
