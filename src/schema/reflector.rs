//! Schema reflection capability
//!
//! The store driver implements `SchemaReflector`; the resolvers never assume a
//! concrete store technology.

use serde::{Deserialize, Serialize};

use super::types::{RawColumn, RecordType};

/// Reflects raw column and relationship metadata for a record type
pub trait SchemaReflector {
    /// Columns in the store's native order
    fn reflect_schema(&self, record: &RecordType) -> Vec<RawColumn>;

    /// Relationship declarations in declaration order
    fn reflect_relationships(&self, record: &RecordType) -> Vec<RelationshipDecl>;
}

/// A raw relationship declaration as written on the record type
///
/// `kind` stays a string here: classification (and rejection of unknown
/// kinds) happens in the association resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDecl {
    /// `belongs_to`, `has_one`, `has_many`, `many_to_many` or `has_and_belongs_to_many`
    #[serde(default)]
    pub kind: Option<String>,
    /// Association name
    pub name: String,
    /// Target type name, derived from `name` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Child key override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    /// Parent key override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    /// Polymorphic role this side plays (`has_many :comments, as: :commentable`)
    #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
    pub as_role: Option<String>,
    /// Polymorphic belongs_to
    #[serde(default)]
    pub polymorphic: bool,
    /// Type-column override for polymorphic belongs_to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_type: Option<String>,
    /// Name of the inverse association on the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_of: Option<String>,
    /// Association cannot be written through the admin
    #[serde(default)]
    pub read_only: bool,
    /// Association is edited inline with its owner
    #[serde(default)]
    pub nested_form: bool,
}

impl RelationshipDecl {
    fn with_kind(kind: &str, name: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.to_string()),
            name: name.into(),
            ..Self::default()
        }
    }

    /// `belongs_to :name`
    pub fn belongs_to(name: impl Into<String>) -> Self {
        Self::with_kind("belongs_to", name)
    }

    /// `has_one :name`
    pub fn has_one(name: impl Into<String>) -> Self {
        Self::with_kind("has_one", name)
    }

    /// `has_many :name`
    pub fn has_many(name: impl Into<String>) -> Self {
        Self::with_kind("has_many", name)
    }

    /// `has_and_belongs_to_many :name`
    pub fn has_and_belongs_to_many(name: impl Into<String>) -> Self {
        Self::with_kind("has_and_belongs_to_many", name)
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub fn primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    pub fn as_role(mut self, role: impl Into<String>) -> Self {
        self.as_role = Some(role.into());
        self
    }

    pub fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }

    pub fn foreign_type(mut self, column: impl Into<String>) -> Self {
        self.foreign_type = Some(column.into());
        self
    }

    pub fn inverse_of(mut self, inverse: impl Into<String>) -> Self {
        self.inverse_of = Some(inverse.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn nested_form(mut self) -> Self {
        self.nested_form = true;
        self
    }
}
