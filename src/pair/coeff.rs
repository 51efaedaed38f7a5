use tracing::debug;

use crate::{
    type_registry::{TypeObserver, TypeRegistry},
    utils::Types,
    Error, Result,
};

/// A named pair coefficient with an optional declared default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: Option<f64>,
}
impl ParamSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            default: None,
        }
    }
    pub const fn with_default(name: &'static str, default: f64) -> Self {
        Self {
            name,
            default: Some(default),
        }
    }
}

/// Index of the unordered pair {i, j} in packed lower-triangular storage.
///
/// The layout does not depend on the number of types, so growing the table
/// only appends entries.
fn pair_idx(i: usize, j: usize) -> usize {
    let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
    hi * (hi + 1) / 2 + lo
}

fn num_pairs(num_types: usize) -> usize {
    num_types * (num_types + 1) / 2
}

/// Symmetric per-type-pair table of named coefficients.
///
/// Entries are merged on `set` and checked for completeness lazily by `validate`.
#[derive(Clone, Debug)]
pub struct CoeffTable {
    specs: Vec<ParamSpec>,
    cutoff_param: usize,
    type_names: Vec<String>,
    entries: Vec<Option<Vec<Option<f64>>>>,
    max_cutoff: f64,
}
impl CoeffTable {
    /// Create a table over `specs`; `cutoff_name` designates the parameter reported by
    /// [`CoeffTable::max_cutoff`].
    pub fn new(specs: Vec<ParamSpec>, cutoff_name: &str, types: &TypeRegistry) -> Result<Self> {
        let cutoff_param = specs
            .iter()
            .position(|s| s.name == cutoff_name)
            .ok_or_else(|| {
                Error::InvalidInput(format!("cutoff parameter '{cutoff_name}' is not declared"))
            })?;
        let mut table = Self {
            specs,
            cutoff_param,
            type_names: Vec::new(),
            entries: Vec::new(),
            max_cutoff: 0.0,
        };
        table.ensure_type_capacity(types);
        Ok(table)
    }

    pub fn num_types(&self) -> usize {
        self.type_names.len()
    }
    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    /// Stores the given parameters on every pair of the product `types_a` x `types_b`,
    /// leaving other parameters already set on those pairs untouched.
    pub fn set(
        &mut self,
        types_a: impl Into<Types>,
        types_b: impl Into<Types>,
        params: &[(&str, f64)],
    ) -> Result<()> {
        let types_a = types_a.into();
        let types_b = types_b.into();
        for t in [&types_a, &types_b] {
            if let Some(max) = t.max() {
                if max >= self.num_types() {
                    return Err(Error::InvalidInput(format!(
                        "type index {max} out of range for {} known types",
                        self.num_types()
                    )));
                }
            }
        }

        let mut resolved = Vec::with_capacity(params.len());
        for &(name, value) in params {
            let idx = self.param_idx(name).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown pair coefficient '{name}', expected one of {:?}",
                    self.specs.iter().map(|s| s.name).collect::<Vec<_>>()
                ))
            })?;
            if !value.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "pair coefficient '{name}' should be finite, found {value}"
                )));
            }
            if idx == self.cutoff_param && value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "cutoff '{name}' should be non-negative, found {value}"
                )));
            }
            resolved.push((idx, value));
        }

        let nspecs = self.specs.len();
        for (i, j) in types_a.product(&types_b) {
            let entry = self.entries[pair_idx(i, j)].get_or_insert_with(|| vec![None; nspecs]);
            for &(idx, value) in &resolved {
                entry[idx] = Some(value);
            }
        }
        self.update_max_cutoff();
        Ok(())
    }

    /// Stores parameters on the single unordered pair {type_a, type_b}.
    pub fn set_pair(&mut self, type_a: usize, type_b: usize, params: &[(&str, f64)]) -> Result<()> {
        self.set(Types::One(type_a), Types::One(type_b), params)
    }

    /// Value of a parameter for a pair, falling back to its declared default.
    /// Returns `None` for pairs that were never set.
    pub fn get(&self, type_a: usize, type_b: usize, name: &str) -> Option<f64> {
        let idx = self.param_idx(name)?;
        self.value(type_a, type_b, idx)
    }
    pub fn is_set(&self, type_a: usize, type_b: usize) -> bool {
        self.entry(type_a, type_b).is_some()
    }

    /// Checks every pair of known types for parameters without defaults.
    pub fn validate(&self) -> Result<()> {
        for j in 0..self.num_types() {
            for i in 0..=j {
                self.resolve(i, j)?;
            }
        }
        Ok(())
    }

    /// All parameter values for a pair in `specs()` order, defaults applied.
    pub fn resolve(&self, type_a: usize, type_b: usize) -> Result<Vec<f64>> {
        (0..self.specs.len())
            .map(|idx| {
                self.value(type_a, type_b, idx)
                    .ok_or_else(|| Error::MissingCoefficient {
                        type_a: self.type_label(type_a),
                        type_b: self.type_label(type_b),
                        param: self.specs[idx].name,
                    })
            })
            .collect()
    }

    /// Largest cutoff over all pairs that have been set, 0 if none.
    pub fn max_cutoff(&self) -> f64 {
        self.max_cutoff
    }

    fn param_idx(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.name == name)
    }
    fn entry(&self, type_a: usize, type_b: usize) -> Option<&Vec<Option<f64>>> {
        self.entries
            .get(pair_idx(type_a, type_b))
            .and_then(Option::as_ref)
    }
    fn value(&self, type_a: usize, type_b: usize, idx: usize) -> Option<f64> {
        match self.entry(type_a, type_b) {
            Some(e) => e[idx].or(self.specs[idx].default),
            None if self.specs.iter().all(|s| s.default.is_some()) => self.specs[idx].default,
            None => None,
        }
    }
    fn type_label(&self, t: usize) -> String {
        self.type_names
            .get(t)
            .cloned()
            .unwrap_or_else(|| format!("#{t}"))
    }
    fn update_max_cutoff(&mut self) {
        let cutoff = self.cutoff_param;
        let default = self.specs[cutoff].default;
        self.max_cutoff = self
            .entries
            .iter()
            .flatten()
            .filter_map(|e| e[cutoff].or(default))
            .fold(0.0, f64::max);
    }
}

impl TypeObserver for CoeffTable {
    fn ensure_type_capacity(&mut self, types: &TypeRegistry) {
        if types.len() < self.num_types() {
            return;
        }
        self.type_names = types.names().to_vec();
        self.entries.resize(num_pairs(types.len()), None);
        debug!(num_types = types.len(), "pair coefficient table resized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn specs() -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("epsilon"),
            ParamSpec::required("sigma"),
            ParamSpec::with_default("alpha", 1.0),
            ParamSpec::with_default("r_cut", 2.5),
        ]
    }

    fn table(names: &[&str]) -> CoeffTable {
        let types = TypeRegistry::new(names).unwrap();
        CoeffTable::new(specs(), "r_cut", &types).unwrap()
    }

    #[test]
    fn pair_index_is_symmetric_and_dense() {
        assert_eq!(pair_idx(0, 0), 0);
        assert_eq!(pair_idx(0, 1), 1);
        assert_eq!(pair_idx(1, 0), 1);
        assert_eq!(pair_idx(1, 1), 2);
        assert_eq!(pair_idx(2, 0), 3);
        assert_eq!(num_pairs(3), 6);
    }

    #[test]
    fn set_merges_and_applies_defaults() {
        let mut t = table(&["A", "B"]);
        t.set_pair(0, 1, &[("epsilon", 1.0)]).unwrap();
        t.set_pair(1, 0, &[("sigma", 2.0)]).unwrap();
        assert_eq!(t.get(0, 1, "epsilon"), Some(1.0));
        assert_eq!(t.get(1, 0, "sigma"), Some(2.0));
        assert_eq!(t.get(0, 1, "alpha"), Some(1.0));
        assert_eq!(t.get(0, 0, "alpha"), None);
    }

    #[test]
    fn validate_names_missing_parameter_and_pair() {
        let mut t = table(&["A", "B"]);
        t.set(Types::Range(0..2), Types::Range(0..2), &[("epsilon", 1.0), ("sigma", 1.0)])
            .unwrap();
        assert!(t.validate().is_ok());

        let mut t = table(&["A", "B"]);
        t.set_pair(0, 0, &[("epsilon", 1.0), ("sigma", 1.0)]).unwrap();
        t.set_pair(1, 1, &[("epsilon", 1.0), ("sigma", 1.0)]).unwrap();
        t.set_pair(0, 1, &[("sigma", 1.0)]).unwrap();
        match t.validate().unwrap_err() {
            Error::MissingCoefficient {
                type_a,
                type_b,
                param,
            } => {
                assert_eq!((type_a.as_str(), type_b.as_str()), ("A", "B"));
                assert_eq!(param, "epsilon");
            }
            e => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn unknown_parameter_and_type_are_rejected_at_set() {
        let mut t = table(&["A"]);
        let e = t.set_pair(0, 0, &[("simga", 1.0)]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InputValidation);
        let e = t.set_pair(0, 1, &[("sigma", 1.0)]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InputValidation);
        let e = t.set_pair(0, 0, &[("r_cut", -1.0)]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InputValidation);
        assert!(!t.is_set(0, 0));
    }

    #[test]
    fn max_cutoff_tracks_every_set() {
        let mut t = table(&["A", "B"]);
        assert_eq!(t.max_cutoff(), 0.0);
        t.set_pair(0, 0, &[("epsilon", 1.0)]).unwrap();
        assert_eq!(t.max_cutoff(), 2.5);
        t.set_pair(0, 0, &[("r_cut", 2.0)]).unwrap();
        assert_eq!(t.max_cutoff(), 2.0);
        t.set_pair(0, 1, &[("r_cut", 3.0)]).unwrap();
        assert_eq!(t.max_cutoff(), 3.0);
        t.set_pair(1, 0, &[("r_cut", 1.0)]).unwrap();
        assert_eq!(t.max_cutoff(), 2.0);
    }

    #[test]
    fn growing_keeps_entries_and_leaves_new_pairs_unset() {
        let mut types = TypeRegistry::new(&["A"]).unwrap();
        let mut t = CoeffTable::new(specs(), "r_cut", &types).unwrap();
        t.set_pair(0, 0, &[("epsilon", 1.0), ("sigma", 1.0), ("r_cut", 3.0)])
            .unwrap();
        types.add_type("B").unwrap();
        t.ensure_type_capacity(&types);

        assert_eq!(t.get(0, 0, "r_cut"), Some(3.0));
        assert_eq!(t.max_cutoff(), 3.0);
        assert!(!t.is_set(0, 1));
        assert!(!t.is_set(1, 1));
        assert_eq!(t.validate().unwrap_err().kind(), ErrorKind::Configuration);

        t.set_pair(0, 1, &[("epsilon", 1.0), ("sigma", 1.0)]).unwrap();
        t.set_pair(1, 1, &[("epsilon", 1.0), ("sigma", 1.0)]).unwrap();
        assert!(t.validate().is_ok());
    }
}
