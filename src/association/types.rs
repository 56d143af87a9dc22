//! Association descriptor types
//!
//! Related types are held as tagged thunks (`TypeRef`, `ParentRef`) and
//! only looked up when `resolve` is called, so describing one type never
//! walks the whole type graph.

use serde::Serialize;
use tracing::debug;

use super::errors::{AssociationError, AssociationResult};
use super::registry::TypeRegistry;
use crate::schema::{RecordType, SchemaReflector};

/// Relationship kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    /// This type holds the foreign key (many-to-one or one-to-one owner side)
    BelongsTo,
    /// The other type holds a foreign key to this one, single record
    HasOne,
    /// The other type holds a foreign key to this one, many records
    HasMany,
    /// Linked through a join relation
    ManyToMany,
}

impl AssociationKind {
    /// Parses a declaration token. `has_and_belongs_to_many` is an alias of `many_to_many`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "belongs_to" => Some(AssociationKind::BelongsTo),
            "has_one" => Some(AssociationKind::HasOne),
            "has_many" => Some(AssociationKind::HasMany),
            "many_to_many" | "has_and_belongs_to_many" => Some(AssociationKind::ManyToMany),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationKind::BelongsTo => "belongs_to",
            AssociationKind::HasOne => "has_one",
            AssociationKind::HasMany => "has_many",
            AssociationKind::ManyToMany => "many_to_many",
        }
    }

    /// belongs_to or has_one
    pub fn is_singular(&self) -> bool {
        matches!(self, AssociationKind::BelongsTo | AssociationKind::HasOne)
    }

    /// has_many or many_to_many
    pub fn is_collection(&self) -> bool {
        !self.is_singular()
    }
}

/// Lazily resolved reference to a record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "type", rename_all = "snake_case")]
pub enum TypeRef {
    Resolved(RecordType),
    Unresolved(String),
}

impl TypeRef {
    /// Name of the referenced type
    pub fn type_name(&self) -> &str {
        match self {
            TypeRef::Resolved(record) => record.name(),
            TypeRef::Unresolved(name) => name,
        }
    }

    /// Looks the type up in `registry`
    pub fn resolve(&self, registry: &TypeRegistry) -> AssociationResult<RecordType> {
        match self {
            TypeRef::Resolved(record) => Ok(record.clone()),
            TypeRef::Unresolved(name) => registry
                .find(name)
                .ok_or_else(|| AssociationError::resolution(name)),
        }
    }
}

/// Parent side of an association
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentRef {
    /// A single parent type
    Single(TypeRef),
    /// Every registered type that declares `has_one`/`has_many ... as: role`
    Polymorphic { role: String },
}

impl ParentRef {
    /// Resolves to the parent type(s).
    ///
    /// Polymorphic parents are recomputed from the registry on every call and
    /// come back in registration order; the result may hold any number of types.
    pub fn resolve<R>(
        &self,
        registry: &TypeRegistry,
        reflector: &R,
    ) -> AssociationResult<Vec<RecordType>>
    where
        R: SchemaReflector + ?Sized,
    {
        match self {
            ParentRef::Single(target) => Ok(vec![target.resolve(registry)?]),
            ParentRef::Polymorphic { role } => {
                let parents: Vec<RecordType> = registry
                    .registered_types()
                    .into_iter()
                    .filter(|candidate| declares_role(reflector, candidate, role))
                    .collect();
                debug!(role = %role, parents = parents.len(), "polymorphic parents resolved");
                Ok(parents)
            }
        }
    }
}

fn declares_role<R>(reflector: &R, candidate: &RecordType, role: &str) -> bool
where
    R: SchemaReflector + ?Sized,
{
    reflector
        .reflect_relationships(candidate)
        .iter()
        .any(|decl| {
            let owning_side = decl
                .kind
                .as_deref()
                .and_then(AssociationKind::parse)
                .map_or(false, |kind| {
                    matches!(kind, AssociationKind::HasOne | AssociationKind::HasMany)
                });
            owning_side && decl.as_role.as_deref() == Some(role)
        })
}

/// Relationship metadata for one association of a record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationDescriptor {
    /// Association name
    pub name: String,
    /// Human-readable label
    pub pretty_name: String,
    /// Relationship kind
    pub kind: AssociationKind,
    /// Key column(s) on the parent side
    pub parent_key: Vec<String>,
    /// Foreign key column on the child side (or in the join relation)
    pub child_key: String,
    /// Column holding the parent's type name; set exactly when polymorphic
    pub foreign_type_column: Option<String>,
    /// Value the child's type column holds for this owner (`as:` associations)
    pub polymorphic_discriminator: Option<String>,
    /// Polymorphic role alias (`as:`)
    pub as_role: Option<String>,
    /// Parent type is decided per row by `foreign_type_column`
    pub is_polymorphic: bool,
    /// Inverse association on the related type
    pub inverse_name: Option<String>,
    /// Not writable through the admin
    pub read_only: bool,
    /// Edited inline with the owner
    pub nested_form: bool,
    /// Type holding `child_key`
    pub child_type: TypeRef,
    /// Type(s) referenced by `parent_key`
    pub parent_type: ParentRef,
}

impl AssociationDescriptor {
    pub fn resolve_child_type(&self, registry: &TypeRegistry) -> AssociationResult<RecordType> {
        self.child_type.resolve(registry)
    }

    pub fn resolve_parent_types<R>(
        &self,
        registry: &TypeRegistry,
        reflector: &R,
    ) -> AssociationResult<Vec<RecordType>>
    where
        R: SchemaReflector + ?Sized,
    {
        self.parent_type.resolve(registry, reflector)
    }

    /// The type on the far side of the association, when it is a single type.
    ///
    /// For belongs_to that is the parent; otherwise the child. Polymorphic
    /// belongs_to has no single target.
    pub fn target(&self) -> Option<&TypeRef> {
        match (self.kind, &self.parent_type) {
            (AssociationKind::BelongsTo, ParentRef::Single(parent)) => Some(parent),
            (AssociationKind::BelongsTo, ParentRef::Polymorphic { .. }) => None,
            _ => Some(&self.child_type),
        }
    }
}
