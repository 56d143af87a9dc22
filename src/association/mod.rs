//! Relationship metadata
//!
//! `describe_associations` turns relationship declarations into
//! `AssociationDescriptor`s. Related types are referenced through
//! `TypeRef`/`ParentRef` and resolved against a `TypeRegistry` on demand.

mod errors;
mod registry;
mod resolver;
mod types;

pub use errors::{AssociationError, AssociationResult};
pub use registry::TypeRegistry;
pub use resolver::describe_associations;
pub use types::{AssociationDescriptor, AssociationKind, ParentRef, TypeRef};
