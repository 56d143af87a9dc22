//! Ordering for list queries

use serde::Serialize;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    /// Newest first; the list default
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Default direction, flipped when `reverse` is set
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// Sort specification over a qualified column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    /// Qualified column (`teams.name`)
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// `ORDER BY` term, e.g. `teams.name DESC`
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.field, self.direction.as_str().to_uppercase())
    }
}
