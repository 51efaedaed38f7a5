use tracing::debug;

use crate::{utils::Types, Error, Result};

/// Tables indexed by particle type that must grow whenever a type is added.
pub trait TypeObserver {
    /// Grow to cover every type in `types`, keeping existing entries and leaving
    /// entries involving new types unset.
    fn ensure_type_capacity(&mut self, types: &TypeRegistry);
}

/// Named particle types. A type's index is stable for the lifetime of the registry.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    names: Vec<String>,
}
impl TypeRegistry {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut registry = Self { names: Vec::new() };
        for name in names {
            registry.add_type(name.as_ref())?;
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    pub fn names(&self) -> &[String] {
        &self.names
    }
    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn id(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| Error::InvalidInput(format!("unknown particle type '{name}'")))
    }
    pub fn ids<S: AsRef<str>>(&self, names: &[S]) -> Result<Types> {
        let ids = names
            .iter()
            .map(|n| self.id(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Types::List(ids))
    }

    /// Registers a new type and returns its index. Observers are notified by the owner
    /// of the registry, see [`crate::Simulation::add_type`].
    pub fn add_type(&mut self, name: &str) -> Result<usize> {
        if name.is_empty() {
            return Err(Error::InvalidInput("type name must not be empty".into()));
        }
        if self.names.iter().any(|n| n == name) {
            return Err(Error::InvalidInput(format!(
                "particle type '{name}' already exists"
            )));
        }
        self.names.push(name.to_owned());
        debug!(name, id = self.names.len() - 1, "added particle type");
        Ok(self.names.len() - 1)
    }
}
