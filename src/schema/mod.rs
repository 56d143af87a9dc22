//! Schema reflection and field descriptors
//!
//! Turns raw column metadata reported by the store into ordered, normalized
//! `FieldDescriptor`s. Nothing here is cached: every call reflects again, so
//! schema changes are picked up immediately.

mod catalog;
mod errors;
mod fields;
mod reflector;
mod types;

pub use catalog::{Catalog, TypeDecl};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use fields::{describe_fields, label_field, queryable_fields};
pub use reflector::{RelationshipDecl, SchemaReflector};
pub use types::{FieldDescriptor, RawColumn, RecordType, StorageType};
