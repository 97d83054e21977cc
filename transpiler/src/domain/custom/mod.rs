//! Custom operator registry
//!
//! Users extend the operator set with handlers that receive the rendered SQL
//! of each argument and return a SQL fragment. Built-in operator names are
//! reserved.

mod handler;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

pub use handler::{CustomOperator, DialectAwareOperatorHandler, OperatorHandler, RegistryError};

use crate::domain::transpiler::{BoxError, is_reserved_operator};
use crate::sql::Dialect;

/// Thread-safe registry of custom operators
///
/// `Clone` produces an independent snapshot.
#[derive(Default)]
pub struct CustomOperatorRegistry {
    operators: RwLock<FxHashMap<String, CustomOperator>>,
}

impl CustomOperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a plain handler
    pub fn register(
        &self,
        name: &str,
        handler: impl OperatorHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.insert(name, CustomOperator::Plain(Arc::new(handler)))
    }

    /// Register a closure as a plain handler
    pub fn register_fn<F>(&self, name: &str, handler: F) -> Result<(), RegistryError>
    where
        F: Fn(&str, &[String]) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.register(name, handler)
    }

    /// Register (or replace) a dialect-aware handler
    pub fn register_dialect_aware(
        &self,
        name: &str,
        handler: impl DialectAwareOperatorHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.insert(name, CustomOperator::DialectAware(Arc::new(handler)))
    }

    /// Register a closure as a dialect-aware handler
    pub fn register_dialect_aware_fn<F>(&self, name: &str, handler: F) -> Result<(), RegistryError>
    where
        F: Fn(&str, &[String], Dialect) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.register_dialect_aware(name, handler)
    }

    fn insert(&self, name: &str, operator: CustomOperator) -> Result<(), RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if is_reserved_operator(name) {
            return Err(RegistryError::Reserved(name.to_string()));
        }
        let replaced = self
            .operators
            .write()
            .insert(name.to_string(), operator)
            .is_some();
        tracing::debug!(operator = name, replaced, "Registered custom operator");
        Ok(())
    }

    /// Remove an operator, returning whether it was registered
    pub fn unregister(&self, name: &str) -> bool {
        self.operators.write().remove(name).is_some()
    }

    pub fn has(&self, name: &str) -> bool {
        self.operators.read().contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<CustomOperator> {
        self.operators.read().get(name).cloned()
    }

    /// Registered names in sorted order
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.operators.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.operators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.read().is_empty()
    }

    pub fn clear(&self) {
        self.operators.write().clear();
    }

    /// Copy every operator of `other` into this registry, replacing duplicates
    pub fn merge(&self, other: &CustomOperatorRegistry) {
        let snapshot = other.operators.read().clone();
        self.operators.write().extend(snapshot);
    }
}

impl Clone for CustomOperatorRegistry {
    fn clone(&self) -> Self {
        Self {
            operators: RwLock::new(self.operators.read().clone()),
        }
    }
}

impl fmt::Debug for CustomOperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomOperatorRegistry")
            .field("operators", &self.list())
            .finish()
    }
}
