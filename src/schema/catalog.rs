//! JSON-backed record type catalog
//!
//! A `Catalog` holds type declarations (columns plus relationships) and acts
//! as a `SchemaReflector`. It is what the CLI and the tests reflect against;
//! a live store driver implements `SchemaReflector` directly instead.
//!
//! File format:
//!
//! ```json
//! {"types": [{"name": "Team", "table": "teams", "primary_key": "id",
//!   "columns": [{"name": "id", "type": "integer", "primary": true}],
//!   "relationships": [{"kind": "belongs_to", "name": "division"}]}]}
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::reflector::{RelationshipDecl, SchemaReflector};
use super::types::{RawColumn, RecordType};
use crate::association::TypeRegistry;
use crate::identifier::is_identifier;

/// Declaration of one record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Type name
    pub name: String,
    /// Table name, derived from the type name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Primary key column, `id` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    /// Columns in native order
    #[serde(default)]
    pub columns: Vec<RawColumn>,
    /// Relationship declarations in declaration order
    #[serde(default)]
    pub relationships: Vec<RelationshipDecl>,
}

impl TypeDecl {
    /// Create an empty declaration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            primary_key: None,
            columns: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    pub fn column(mut self, column: RawColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn relationship(mut self, relationship: RelationshipDecl) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Handle for this declaration
    pub fn record_type(&self) -> RecordType {
        let mut record = RecordType::new(&self.name);
        if let Some(table) = &self.table {
            record = record.with_table(table);
        }
        if let Some(primary_key) = &self.primary_key {
            record = record.with_primary_key(primary_key);
        }
        record
    }

    /// Checks that every name interpolated into SQL is a safe identifier
    pub fn validate(&self) -> SchemaResult<()> {
        if !is_identifier(&self.name) {
            return Err(SchemaError::invalid_identifier(&self.name, &self.name));
        }

        let record = self.record_type();
        for identifier in [record.table_name(), record.primary_key()] {
            if !is_identifier(identifier) {
                return Err(SchemaError::invalid_identifier(&self.name, identifier));
            }
        }

        for column in &self.columns {
            if !is_identifier(&column.name) {
                return Err(SchemaError::invalid_identifier(&self.name, &column.name));
            }
        }

        Ok(())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    types: Vec<TypeDecl>,
}

/// In-memory set of type declarations, kept in declaration order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: Vec<TypeDecl>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog file
    pub fn load(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_catalog(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        Self::parse(&content, &path.display().to_string())
    }

    /// Parses catalog JSON held in memory
    pub fn from_json(content: &str) -> SchemaResult<Self> {
        Self::parse(content, "<in-memory>")
    }

    fn parse(content: &str, source: &str) -> SchemaResult<Self> {
        let file: CatalogFile = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed_catalog(source, format!("Invalid JSON: {}", e)))?;

        let mut catalog = Self::new();
        for decl in file.types {
            catalog.register(decl)?;
        }
        Ok(catalog)
    }

    /// Adds a declaration. Type names are unique.
    pub fn register(&mut self, decl: TypeDecl) -> SchemaResult<()> {
        decl.validate()?;

        if self.get(&decl.name).is_some() {
            return Err(SchemaError::duplicate_type(&decl.name));
        }

        self.types.push(decl);
        Ok(())
    }

    /// Builder form of `register` for fixtures
    pub fn with(mut self, decl: TypeDecl) -> SchemaResult<Self> {
        self.register(decl)?;
        Ok(self)
    }

    /// Gets a declaration by type name
    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|decl| decl.name == name)
    }

    /// Handle for a declared type
    pub fn record_type(&self, name: &str) -> Option<RecordType> {
        self.get(name).map(TypeDecl::record_type)
    }

    /// Handles for every declared type, in declaration order
    pub fn record_types(&self) -> Vec<RecordType> {
        self.types.iter().map(TypeDecl::record_type).collect()
    }

    /// A registry holding every declared type, in declaration order
    pub fn registry(&self) -> TypeRegistry {
        TypeRegistry::with_types(self.record_types())
    }

    /// Returns the number of declared types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl SchemaReflector for Catalog {
    fn reflect_schema(&self, record: &RecordType) -> Vec<RawColumn> {
        self.get(record.name())
            .map(|decl| decl.columns.clone())
            .unwrap_or_default()
    }

    fn reflect_relationships(&self, record: &RecordType) -> Vec<RelationshipDecl> {
        self.get(record.name())
            .map(|decl| decl.relationships.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;

    const TEAMS: &str = r#"{
        "types": [
            {"name": "Division", "columns": [
                {"name": "id", "type": "integer", "primary": true},
                {"name": "name", "type": "varchar(50)"}
            ]},
            {"name": "Team", "table": "teams", "columns": [
                {"name": "id", "type": "integer", "primary": true},
                {"name": "division_id", "type": "integer"},
                {"name": "name", "type": "varchar(50)", "null": false}
            ], "relationships": [
                {"kind": "belongs_to", "name": "division"}
            ]}
        ]
    }"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_json(TEAMS).unwrap();
        assert_eq!(catalog.len(), 2);

        let team = catalog.record_type("Team").unwrap();
        assert_eq!(team.table_name(), "teams");
        assert_eq!(catalog.reflect_schema(&team).len(), 3);
        assert_eq!(catalog.reflect_relationships(&team)[0].name, "division");

        let division = catalog.record_type("Division").unwrap();
        assert_eq!(division.table_name(), "divisions");
    }

    #[test]
    fn test_registry_follows_declaration_order() {
        let catalog = Catalog::from_json(TEAMS).unwrap();
        let names: Vec<_> = catalog
            .registry()
            .registered_types()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, ["Division", "Team"]);
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut catalog = Catalog::new();
        catalog.register(TypeDecl::new("Team")).unwrap();
        let err = catalog.register(TypeDecl::new("Team")).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AdminDuplicateType);
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        let decl = TypeDecl::new("Team").column(RawColumn::new("name; --", "varchar"));
        let err = Catalog::new().with(decl).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AdminInvalidIdentifier);

        let decl = TypeDecl::new("Team").table("teams x");
        assert!(Catalog::new().with(decl).is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = Catalog::from_json("{not json").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AdminCatalogMalformed);
    }

    #[test]
    fn test_unknown_type_reflects_nothing() {
        let catalog = Catalog::from_json(TEAMS).unwrap();
        let ghost = RecordType::new("Ghost");
        assert!(catalog.reflect_schema(&ghost).is_empty());
        assert!(catalog.reflect_relationships(&ghost).is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("catalog.json");
        fs::write(&path, TEAMS).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert!(catalog.get("Team").is_some());

        let missing = Catalog::load(&tmp.path().join("missing.json")).unwrap_err();
        assert_eq!(missing.code(), SchemaErrorCode::AdminCatalogMalformed);
    }
}
