//! Catalog error types
//!
//! Error codes:
//! - ADMIN_CATALOG_MALFORMED: catalog file unreadable or not valid JSON
//! - ADMIN_DUPLICATE_TYPE: two declarations share a type name
//! - ADMIN_INVALID_IDENTIFIER: table, key, or column name is not a safe SQL identifier

use std::fmt;

/// Catalog-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Catalog file could not be read or parsed
    AdminCatalogMalformed,
    /// Record type declared twice
    AdminDuplicateType,
    /// Name rejected by the identifier check
    AdminInvalidIdentifier,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::AdminCatalogMalformed => "ADMIN_CATALOG_MALFORMED",
            SchemaErrorCode::AdminDuplicateType => "ADMIN_DUPLICATE_TYPE",
            SchemaErrorCode::AdminInvalidIdentifier => "ADMIN_INVALID_IDENTIFIER",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Catalog error with context
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Record type name if applicable
    type_name: Option<String>,
}

impl SchemaError {
    /// Create a malformed catalog error
    pub fn malformed_catalog(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::AdminCatalogMalformed,
            message: format!("Malformed catalog '{}': {}", source.into(), reason.into()),
            type_name: None,
        }
    }

    /// Create a duplicate type error
    pub fn duplicate_type(type_name: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: SchemaErrorCode::AdminDuplicateType,
            message: format!("Record type '{}' is declared more than once", name),
            type_name: Some(name),
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(type_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: SchemaErrorCode::AdminInvalidIdentifier,
            message: format!(
                "Record type '{}' uses invalid identifier '{}'",
                name,
                identifier.into()
            ),
            type_name: Some(name),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the record type name if applicable
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for catalog operations
pub type SchemaResult<T> = Result<T, SchemaError>;
