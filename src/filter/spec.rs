//! Filter maps as submitted by the admin UI
//!
//! ```json
//! {"name": {"0000": {"o": "is", "v": "Jets"}},
//!  "division": {"0001": {"o": "like", "v": "1"}}}
//! ```
//!
//! Field and group order is kept as submitted.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

/// One operator/value pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterEntry {
    /// Operator token; absent means the type's default
    #[serde(default, rename = "o", alias = "operator")]
    pub operator: Option<String>,
    /// Raw value; absent means empty
    #[serde(
        default,
        rename = "v",
        alias = "value",
        deserialize_with = "lenient_string"
    )]
    pub value: String,
}

impl FilterEntry {
    pub fn new(operator: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            operator: Some(operator.into()),
            value: value.into(),
        }
    }

    /// Entry without an operator
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            operator: None,
            value: value.into(),
        }
    }

    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }
}

/// Numbers and booleans arrive unquoted from some clients
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!(
            "filter value must be a scalar, got {}",
            other
        ))),
    }
}

/// Filter groups submitted for one field key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    /// Column name, association name, or dotted `association.column`
    pub field: String,
    /// (group id, entry) pairs; groups of one field are OR'd
    pub groups: Vec<(String, FilterEntry)>,
}

/// Ordered field → group → entry mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    fields: Vec<FieldFilter>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the JSON form
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Adds a group, appending to the field's existing groups
    pub fn push(&mut self, field: impl Into<String>, group: impl Into<String>, entry: FilterEntry) {
        let field = field.into();
        let group = (group.into(), entry);
        match self.fields.iter_mut().find(|f| f.field == field) {
            Some(existing) => existing.groups.push(group),
            None => self.fields.push(FieldFilter {
                field,
                groups: vec![group],
            }),
        }
    }

    /// Builder form of `push`
    pub fn with(mut self, field: impl Into<String>, group: impl Into<String>, entry: FilterEntry) -> Self {
        self.push(field, group, entry);
        self
    }

    pub fn fields(&self) -> &[FieldFilter] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'de> Deserialize<'de> for FilterSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut spec = FilterSpec::new();

        for (field, groups) in raw {
            let groups = match groups {
                Value::Object(groups) => groups,
                other => {
                    return Err(de::Error::custom(format!(
                        "filter groups for '{}' must be an object, got {}",
                        field, other
                    )))
                }
            };

            for (group, entry) in groups {
                let entry = FilterEntry::deserialize(entry).map_err(de::Error::custom)?;
                spec.push(field.clone(), group, entry);
            }
        }

        Ok(spec)
    }
}
