//! Registry of known record types
//!
//! The registry is the only shared mutable state in the crate. Polymorphic
//! parent resolution scans it in full, so writers take an exclusive lock and
//! readers clone out what they need under a shared lock.
//!
//! `clear()` exists for test isolation and for dynamic re-registration; it
//! must not be called while resolutions against the same registry are in
//! flight.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::schema::RecordType;

/// Ordered, thread-safe set of registered record types
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<Vec<RecordType>>,
}

impl TypeRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `types` in the given order
    pub fn with_types(types: impl IntoIterator<Item = RecordType>) -> Self {
        let registry = Self::new();
        for record in types {
            registry.register(record);
        }
        registry
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<RecordType>> {
        self.types.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<RecordType>> {
        self.types.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a type.
    ///
    /// Re-registering a name replaces the handle but keeps its original
    /// position. Returns true when the name was new.
    pub fn register(&self, record: RecordType) -> bool {
        let mut types = self.write();
        match types.iter_mut().find(|t| t.name() == record.name()) {
            Some(existing) => {
                *existing = record;
                false
            }
            None => {
                debug!(record_type = record.name(), "record type registered");
                types.push(record);
                true
            }
        }
    }

    /// Removes a type by name
    pub fn unregister(&self, name: &str) -> Option<RecordType> {
        let mut types = self.write();
        let position = types.iter().position(|t| t.name() == name)?;
        debug!(record_type = name, "record type unregistered");
        Some(types.remove(position))
    }

    /// Removes every type
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Looks up a type by name
    pub fn find(&self, name: &str) -> Option<RecordType> {
        self.read().iter().find(|t| t.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().iter().any(|t| t.name() == name)
    }

    /// Snapshot of every registered type, in registration order
    pub fn registered_types(&self) -> Vec<RecordType> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
