use tracing::debug;

use crate::{
    type_registry::{TypeObserver, TypeRegistry},
    Error, Result,
};

/// Friction coefficient per particle type.
#[derive(Clone, Debug, PartialEq)]
pub struct GammaTable {
    type_names: Vec<String>,
    gammas: Vec<Option<f64>>,
}
impl GammaTable {
    /// Every type currently known gets `default`; types added later start unset.
    pub fn new(types: &TypeRegistry, default: f64) -> Self {
        Self {
            type_names: types.names().to_vec(),
            gammas: vec![Some(default); types.len()],
        }
    }

    pub fn get(&self, type_id: usize) -> Option<f64> {
        self.gammas.get(type_id).copied().flatten()
    }

    pub fn set(&mut self, type_id: usize, gamma: f64) -> Result<()> {
        if !(gamma >= 0.0) || !gamma.is_finite() {
            return Err(Error::InvalidInput(format!(
                "friction coefficient should be non-negative, found {gamma}"
            )));
        }
        let slot = self.gammas.get_mut(type_id).ok_or_else(|| {
            Error::InvalidInput(format!("no particle type with index {type_id}"))
        })?;
        *slot = Some(gamma);
        Ok(())
    }

    /// Friction for a type that is about to be integrated.
    pub fn require(&self, type_id: usize) -> Result<f64> {
        self.get(type_id).ok_or_else(|| {
            let name = self
                .type_names
                .get(type_id)
                .cloned()
                .unwrap_or_else(|| format!("#{type_id}"));
            Error::Configuration(format!(
                "no friction coefficient set for particle type '{name}'"
            ))
        })
    }
}

impl TypeObserver for GammaTable {
    fn ensure_type_capacity(&mut self, types: &TypeRegistry) {
        if types.len() < self.gammas.len() {
            return;
        }
        self.type_names = types.names().to_vec();
        self.gammas.resize(types.len(), None);
        debug!(num_types = types.len(), "friction table resized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn new_types_have_no_friction_until_set() {
        let mut types = TypeRegistry::new(&["A"]).unwrap();
        let mut table = GammaTable::new(&types, 1.0);
        assert_eq!(table.require(0).unwrap(), 1.0);

        types.add_type("B").unwrap();
        table.ensure_type_capacity(&types);
        let e = table.require(1).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Configuration);
        assert!(e.to_string().contains("'B'"));

        table.set(1, 2.5).unwrap();
        assert_eq!(table.get(1), Some(2.5));
        assert!(table.set(1, -1.0).is_err());
        assert!(table.set(2, 1.0).is_err());
    }
}
