//! adminql - record type introspection and query compilation for admin interfaces
//!
//! Describes the fields and relationships of registered record types and
//! compiles untyped admin input (filter maps, search terms) into
//! parameterized SQL conditions.

pub mod association;
pub mod cli;
pub mod config;
pub mod filter;
pub mod identifier;
pub mod inflect;
pub mod model;
pub mod query;
pub mod schema;

pub use association::{
    describe_associations, AssociationDescriptor, AssociationError, AssociationKind,
    AssociationResult, ParentRef, TypeRef, TypeRegistry,
};
pub use config::{AdminConfig, ConfigError};
pub use filter::{
    build_condition, compile_filters, compile_search, BoundValue, CompiledCondition, Dialect,
    FilterEntry, FilterSpec,
};
pub use model::AdminModel;
pub use query::{ListOptions, ListQuery, SortDirection, SortSpec};
pub use schema::{
    describe_fields, Catalog, FieldDescriptor, RawColumn, RecordType, RelationshipDecl,
    SchemaReflector, StorageType, TypeDecl,
};
