//! Admin model facade
//!
//! Binds one record type to the reflector, registry and config it is
//! described and queried with, so callers stop threading all four through
//! every call.

use crate::association::{
    describe_associations, AssociationDescriptor, AssociationError, AssociationResult,
    TypeRegistry,
};
use crate::config::AdminConfig;
use crate::filter::{CompiledCondition, FilterCompiler, FilterSpec, SearchCompiler};
use crate::query::{build_list_query, ListOptions, ListQuery};
use crate::schema::{describe_fields, queryable_fields, FieldDescriptor, RecordType, SchemaReflector};

/// A record type as seen by the admin interface
pub struct AdminModel<'a, R: SchemaReflector + ?Sized> {
    record: RecordType,
    reflector: &'a R,
    registry: &'a TypeRegistry,
    config: &'a AdminConfig,
}

impl<'a, R: SchemaReflector + ?Sized> AdminModel<'a, R> {
    pub fn new(
        record: RecordType,
        reflector: &'a R,
        registry: &'a TypeRegistry,
        config: &'a AdminConfig,
    ) -> Self {
        Self {
            record,
            reflector,
            registry,
            config,
        }
    }

    /// Model for a registered type name
    pub fn lookup(
        name: &str,
        reflector: &'a R,
        registry: &'a TypeRegistry,
        config: &'a AdminConfig,
    ) -> AssociationResult<Self> {
        let record = registry
            .find(name)
            .ok_or_else(|| AssociationError::resolution(name))?;
        Ok(Self::new(record, reflector, registry, config))
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record
    }

    pub fn table_name(&self) -> &str {
        self.record.table_name()
    }

    pub fn primary_key(&self) -> &str {
        self.record.primary_key()
    }

    /// Scalar fields in native column order
    pub fn properties(&self) -> Vec<FieldDescriptor> {
        describe_fields(&self.record, self.reflector)
    }

    /// Fields matched by free-text search
    pub fn queryable_fields(&self) -> Vec<FieldDescriptor> {
        queryable_fields(&self.record, self.reflector)
    }

    pub fn associations(&self) -> AssociationResult<Vec<AssociationDescriptor>> {
        describe_associations(&self.record, self.reflector, self.registry, self.config)
    }

    /// One association by name
    pub fn association(&self, name: &str) -> AssociationResult<Option<AssociationDescriptor>> {
        Ok(self.associations()?.into_iter().find(|a| a.name == name))
    }

    pub fn filter_conditions(&self, spec: &FilterSpec) -> AssociationResult<CompiledCondition> {
        FilterCompiler::new(self.reflector, self.registry, self.config).compile(&self.record, spec)
    }

    pub fn query_conditions(&self, term: &str) -> AssociationResult<CompiledCondition> {
        SearchCompiler::new(self.reflector, self.registry, self.config).compile(&self.record, term)
    }

    pub fn list_query(&self, options: &ListOptions) -> AssociationResult<ListQuery> {
        build_list_query(&self.record, options, self.reflector, self.registry, self.config)
    }
}
