//! Association descriptor resolution
//!
//! Key derivation:
//! - belongs_to: child key `<name>_id` (or `<as>_id`) on the owner, parent key
//!   is the target's primary key
//! - has_one / has_many: child key `<as>_id` or the owner's foreign key on the
//!   target, parent key is the owner's primary key
//! - many_to_many: child key is the owner's foreign key inside the join relation
//!
//! Declaration overrides (`foreign_key`, `primary_key`, `foreign_type`) win.

use tracing::debug;

use super::errors::{AssociationError, AssociationResult};
use super::registry::TypeRegistry;
use super::types::{AssociationDescriptor, AssociationKind, ParentRef, TypeRef};
use crate::config::AdminConfig;
use crate::identifier::is_identifier;
use crate::inflect;
use crate::schema::{RecordType, RelationshipDecl, SchemaReflector};

/// Describes every relationship of `record`, in declaration order.
///
/// Related types stay unresolved; an unknown target only fails when its
/// `TypeRef` is resolved.
pub fn describe_associations<R>(
    record: &RecordType,
    reflector: &R,
    registry: &TypeRegistry,
    config: &AdminConfig,
) -> AssociationResult<Vec<AssociationDescriptor>>
where
    R: SchemaReflector + ?Sized,
{
    let descriptors = reflector
        .reflect_relationships(record)
        .iter()
        .map(|decl| describe_one(record, decl, registry, config))
        .collect::<AssociationResult<Vec<_>>>()?;

    debug!(
        record_type = record.name(),
        associations = descriptors.len(),
        "associations described"
    );
    Ok(descriptors)
}

fn describe_one(
    owner: &RecordType,
    decl: &RelationshipDecl,
    registry: &TypeRegistry,
    config: &AdminConfig,
) -> AssociationResult<AssociationDescriptor> {
    let invalid = |reason: String| AssociationError::configuration(owner.name(), &decl.name, reason);

    if decl.name.trim().is_empty() {
        return Err(invalid("association name is empty".to_string()));
    }

    let kind = match decl.kind.as_deref() {
        None => return Err(invalid("missing association kind".to_string())),
        Some(token) => AssociationKind::parse(token)
            .ok_or_else(|| invalid(format!("unknown association kind '{}'", token)))?,
    };

    if decl.polymorphic && kind != AssociationKind::BelongsTo {
        return Err(invalid(format!(
            "polymorphic is only valid on belongs_to, not {}",
            kind.as_str()
        )));
    }

    let target_name = decl
        .class_name
        .clone()
        .unwrap_or_else(|| inflect::camelize(&inflect::singularize(&decl.name)));
    let target = if target_name == owner.name() {
        TypeRef::Resolved(owner.clone())
    } else {
        TypeRef::Unresolved(target_name)
    };

    let descriptor = match kind {
        AssociationKind::BelongsTo => belongs_to(owner, decl, target, registry, config),
        AssociationKind::HasOne | AssociationKind::HasMany | AssociationKind::ManyToMany => {
            owned(owner, decl, kind, target)
        }
    };

    let mut columns: Vec<&str> = descriptor.parent_key.iter().map(String::as_str).collect();
    columns.push(&descriptor.child_key);
    if let Some(type_column) = &descriptor.foreign_type_column {
        columns.push(type_column);
    }
    if let Some(column) = columns.into_iter().find(|c| !is_identifier(c)) {
        return Err(invalid(format!("'{}' is not a valid column name", column)));
    }

    Ok(descriptor)
}

fn belongs_to(
    owner: &RecordType,
    decl: &RelationshipDecl,
    target: TypeRef,
    registry: &TypeRegistry,
    config: &AdminConfig,
) -> AssociationDescriptor {
    let role = decl.as_role.clone().unwrap_or_else(|| decl.name.clone());
    let child_key = decl
        .foreign_key
        .clone()
        .unwrap_or_else(|| format!("{}_id", role));

    let parent_key = match &decl.primary_key {
        Some(key) => key.clone(),
        None if decl.polymorphic => config.default_primary_key.clone(),
        None => match &target {
            TypeRef::Resolved(parent) => parent.primary_key().to_string(),
            TypeRef::Unresolved(name) => registry
                .find(name)
                .map(|parent| parent.primary_key().to_string())
                .unwrap_or_else(|| config.default_primary_key.clone()),
        },
    };

    let (parent_type, foreign_type_column) = if decl.polymorphic {
        let type_column = decl
            .foreign_type
            .clone()
            .unwrap_or_else(|| format!("{}_type", role));
        (ParentRef::Polymorphic { role: role.clone() }, Some(type_column))
    } else {
        (ParentRef::Single(target), None)
    };

    AssociationDescriptor {
        name: decl.name.clone(),
        pretty_name: inflect::humanize(&decl.name),
        kind: AssociationKind::BelongsTo,
        parent_key: vec![parent_key],
        child_key,
        foreign_type_column,
        polymorphic_discriminator: None,
        as_role: decl.as_role.clone(),
        is_polymorphic: decl.polymorphic,
        inverse_name: decl.inverse_of.clone(),
        read_only: decl.read_only,
        nested_form: decl.nested_form,
        child_type: TypeRef::Resolved(owner.clone()),
        parent_type,
    }
}

fn owned(
    owner: &RecordType,
    decl: &RelationshipDecl,
    kind: AssociationKind,
    target: TypeRef,
) -> AssociationDescriptor {
    let role = match kind {
        AssociationKind::ManyToMany => None,
        _ => decl.as_role.clone(),
    };

    let child_key = match (&decl.foreign_key, &role) {
        (Some(key), _) => key.clone(),
        (None, Some(role)) => format!("{}_id", role),
        (None, None) => owner.foreign_key(),
    };

    let parent_key = decl
        .primary_key
        .clone()
        .unwrap_or_else(|| owner.primary_key().to_string());

    AssociationDescriptor {
        name: decl.name.clone(),
        pretty_name: inflect::humanize(&decl.name),
        kind,
        parent_key: vec![parent_key],
        child_key,
        foreign_type_column: None,
        polymorphic_discriminator: role.as_ref().map(|_| owner.name().to_string()),
        as_role: decl.as_role.clone(),
        is_polymorphic: false,
        inverse_name: decl.inverse_of.clone(),
        read_only: decl.read_only,
        nested_form: decl.nested_form,
        child_type: target,
        parent_type: ParentRef::Single(TypeRef::Resolved(owner.clone())),
    }
}
