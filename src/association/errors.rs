//! Association error types
//!
//! Error codes:
//! - ADMIN_RESOLUTION_FAILED: a lazily resolved type is not registered
//! - ADMIN_CONFIGURATION_INVALID: a relationship declaration lacks kind or key information

use thiserror::Error;

/// Result type for association resolution
pub type AssociationResult<T> = Result<T, AssociationError>;

/// Association resolution and configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssociationError {
    /// Target type could not be found when a thunk was resolved
    #[error("Record type '{type_name}' is not registered")]
    Resolution { type_name: String },

    /// Declaration is missing or carries invalid direction/key information
    #[error("Association '{association}' on '{record_type}' is misconfigured: {reason}")]
    Configuration {
        record_type: String,
        association: String,
        reason: String,
    },
}

impl AssociationError {
    /// Create a resolution error
    pub fn resolution(type_name: impl Into<String>) -> Self {
        AssociationError::Resolution {
            type_name: type_name.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(
        record_type: impl Into<String>,
        association: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        AssociationError::Configuration {
            record_type: record_type.into(),
            association: association.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            AssociationError::Resolution { .. } => "ADMIN_RESOLUTION_FAILED",
            AssociationError::Configuration { .. } => "ADMIN_CONFIGURATION_INVALID",
        }
    }

    pub fn is_resolution(&self) -> bool {
        matches!(self, AssociationError::Resolution { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, AssociationError::Configuration { .. })
    }
}
