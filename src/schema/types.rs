//! Record type, column, and field descriptor definitions
//!
//! Storage types are a closed set; raw SQL type strings coming from the
//! store are normalized into it by `StorageType::from_sql_type`.

use serde::{Deserialize, Serialize};

use crate::inflect;

/// Normalized storage type of a scalar column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Short character data
    String,
    /// Long character data
    Text,
    /// Whole numbers
    Integer,
    /// Floating point numbers
    Float,
    /// Fixed-point numbers
    Decimal,
    /// True/false
    Boolean,
    /// Stored value drawn from a fixed set
    Enum,
    /// Calendar date
    Date,
    /// Date and time
    Datetime,
    /// Date and time with store-managed precision or zone
    Timestamp,
    /// Raw bytes
    Binary,
}

impl StorageType {
    /// Returns the type name
    pub fn type_name(&self) -> &'static str {
        match self {
            StorageType::String => "string",
            StorageType::Text => "text",
            StorageType::Integer => "integer",
            StorageType::Float => "float",
            StorageType::Decimal => "decimal",
            StorageType::Boolean => "boolean",
            StorageType::Enum => "enum",
            StorageType::Date => "date",
            StorageType::Datetime => "datetime",
            StorageType::Timestamp => "timestamp",
            StorageType::Binary => "binary",
        }
    }

    /// Normalizes a raw SQL type string. Unknown types are treated as strings.
    pub fn from_sql_type(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        if lowered == "tinyint(1)" {
            return StorageType::Boolean;
        }

        let base = lowered.split('(').next().unwrap_or_default().trim();
        match base {
            "string" | "varchar" | "character varying" | "char" | "character" | "nvarchar"
            | "citext" | "uuid" => StorageType::String,
            "text" | "tinytext" | "mediumtext" | "longtext" | "clob" => StorageType::Text,
            "integer" | "int" | "int2" | "int4" | "int8" | "smallint" | "mediumint" | "bigint"
            | "tinyint" | "serial" | "bigserial" => StorageType::Integer,
            "float" | "real" | "double" | "double precision" | "float4" | "float8" => {
                StorageType::Float
            }
            "decimal" | "numeric" | "money" => StorageType::Decimal,
            "boolean" | "bool" => StorageType::Boolean,
            "enum" => StorageType::Enum,
            "date" => StorageType::Date,
            "datetime" => StorageType::Datetime,
            "timestamp" | "timestamptz" | "timestamp with time zone"
            | "timestamp without time zone" => StorageType::Timestamp,
            "binary" | "varbinary" | "blob" | "longblob" | "bytea" => StorageType::Binary,
            _ => StorageType::String,
        }
    }

    /// String or text: matched with patterns and searched by default
    pub fn is_textual(&self) -> bool {
        matches!(self, StorageType::String | StorageType::Text)
    }
}

/// Column metadata as reported by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawColumn {
    /// Column name
    pub name: String,
    /// Store-native type string (`varchar(255)`, `bigint`, ...)
    #[serde(rename = "type")]
    pub sql_type: String,
    /// Declared length limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Whether NULL is allowed
    #[serde(default = "default_nullable", rename = "null")]
    pub nullable: bool,
    /// Part of the primary key
    #[serde(default)]
    pub primary: bool,
    /// Filled in by the store on insert
    #[serde(default)]
    pub auto_increment: bool,
}

fn default_nullable() -> bool {
    true
}

impl RawColumn {
    /// Create a nullable column
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            limit: None,
            nullable: true,
            primary: false,
            auto_increment: false,
        }
    }

    /// Set the length limit
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Mark the column NOT NULL
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark the column as the primary key
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.nullable = false;
        self
    }

    /// Mark the column auto-incremented
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

/// Immutable description of one scalar field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Column name
    pub name: String,
    /// Human-readable label
    pub pretty_name: String,
    /// Normalized storage type
    pub storage_type: StorageType,
    /// Declared length limit
    pub max_length: Option<u32>,
    /// Whether NULL is allowed
    pub nullable: bool,
    /// Primary key or store-generated value
    pub auto_generated: bool,
}

impl FieldDescriptor {
    /// Builds a descriptor from raw column metadata
    pub fn from_column(column: &RawColumn) -> Self {
        Self {
            name: column.name.clone(),
            pretty_name: inflect::humanize(&column.name),
            storage_type: StorageType::from_sql_type(&column.sql_type),
            max_length: column.limit,
            nullable: column.nullable,
            auto_generated: column.primary || column.auto_increment,
        }
    }
}

/// Handle identifying a registered record type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordType {
    name: String,
    table_name: String,
    primary_key: String,
}

impl RecordType {
    /// Creates a handle with the conventional table name and `id` primary key
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table_name: inflect::tableize(&name),
            primary_key: "id".to_string(),
            name,
        }
    }

    /// Overrides the table name
    pub fn with_table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Overrides the primary key column
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    /// Type name (`ARPost`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing table
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Primary key column
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Conventional foreign key referencing this type (`ar_blog_id`)
    pub fn foreign_key(&self) -> String {
        inflect::foreign_key(&self.name)
    }

    /// Column qualified with this type's table (`teams.name`)
    pub fn qualify(&self, column: &str) -> String {
        format!("{}.{}", self.table_name, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_sql_types() {
        assert_eq!(StorageType::from_sql_type("varchar(255)"), StorageType::String);
        assert_eq!(StorageType::from_sql_type("character varying"), StorageType::String);
        assert_eq!(StorageType::from_sql_type("TEXT"), StorageType::Text);
        assert_eq!(StorageType::from_sql_type("bigint"), StorageType::Integer);
        assert_eq!(StorageType::from_sql_type("tinyint(1)"), StorageType::Boolean);
        assert_eq!(StorageType::from_sql_type("tinyint(4)"), StorageType::Integer);
        assert_eq!(StorageType::from_sql_type("numeric(10,2)"), StorageType::Decimal);
        assert_eq!(StorageType::from_sql_type("double precision"), StorageType::Float);
        assert_eq!(StorageType::from_sql_type("enum('a','b')"), StorageType::Enum);
        assert_eq!(StorageType::from_sql_type("timestamptz"), StorageType::Timestamp);
        assert_eq!(StorageType::from_sql_type("datetime"), StorageType::Datetime);
        assert_eq!(StorageType::from_sql_type("date"), StorageType::Date);
        assert_eq!(StorageType::from_sql_type("bytea"), StorageType::Binary);
    }

    #[test]
    fn test_unknown_type_falls_back_to_string() {
        assert_eq!(StorageType::from_sql_type("geometry"), StorageType::String);
        assert_eq!(StorageType::from_sql_type(""), StorageType::String);
    }

    #[test]
    fn test_field_descriptor_from_column() {
        let column = RawColumn::new("name", "varchar(100)").limit(100).not_null();
        let field = FieldDescriptor::from_column(&column);

        assert_eq!(field.name, "name");
        assert_eq!(field.pretty_name, "Name");
        assert_eq!(field.storage_type, StorageType::String);
        assert_eq!(field.max_length, Some(100));
        assert!(!field.nullable);
        assert!(!field.auto_generated);
    }

    #[test]
    fn test_primary_key_is_auto_generated() {
        let field = FieldDescriptor::from_column(&RawColumn::new("id", "integer").primary());
        assert!(field.auto_generated);
        assert!(!field.nullable);
    }

    #[test]
    fn test_record_type_defaults() {
        let record = RecordType::new("ARBlog");
        assert_eq!(record.table_name(), "ar_blogs");
        assert_eq!(record.primary_key(), "id");
        assert_eq!(record.foreign_key(), "ar_blog_id");
        assert_eq!(record.qualify("name"), "ar_blogs.name");
    }

    #[test]
    fn test_storage_type_textual() {
        assert!(StorageType::Text.is_textual());
        assert!(!StorageType::Enum.is_textual());
    }
}
