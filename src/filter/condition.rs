//! Compiled query conditions
//!
//! A `CompiledCondition` is a SQL fragment with `?` placeholders plus the
//! values bound to them, in order. User input only ever travels in
//! `bindings`; the fragment holds qualified column names and fixed SQL.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::dialect::Dialect;

/// Typed value bound to one placeholder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoundValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    /// Bound to a single `IN (?)` placeholder
    List(Vec<String>),
}

impl From<&str> for BoundValue {
    fn from(value: &str) -> Self {
        BoundValue::Text(value.to_string())
    }
}

impl From<String> for BoundValue {
    fn from(value: String) -> Self {
        BoundValue::Text(value)
    }
}

impl From<i64> for BoundValue {
    fn from(value: i64) -> Self {
        BoundValue::Integer(value)
    }
}

impl From<bool> for BoundValue {
    fn from(value: bool) -> Self {
        BoundValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for BoundValue {
    fn from(value: DateTime<Utc>) -> Self {
        BoundValue::Timestamp(value)
    }
}

/// Parameterized SQL fragment
///
/// The number of `?` placeholders outside quoted literals always equals
/// `bindings.len()`. The empty fragment is the always-true condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledCondition {
    sql: String,
    bindings: Vec<BoundValue>,
}

impl CompiledCondition {
    pub fn new(sql: impl Into<String>, bindings: Vec<BoundValue>) -> Self {
        let condition = Self {
            sql: sql.into(),
            bindings,
        };
        debug_assert_eq!(
            condition.placeholder_count(),
            condition.bindings.len(),
            "placeholder/binding mismatch in {:?}",
            condition.sql
        );
        condition
    }

    /// Fragment without bindings (`(c IS NULL)`)
    pub fn fixed(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    /// Matches every row
    pub fn always_true() -> Self {
        Self::default()
    }

    pub fn is_always_true(&self) -> bool {
        self.sql.is_empty()
    }

    /// Joins the non-empty parts with `OR`. No parentheses are added.
    pub fn any_of(parts: impl IntoIterator<Item = CompiledCondition>) -> Self {
        Self::join(parts, " OR ")
    }

    /// Joins the non-empty parts with `AND`. No parentheses are added.
    pub fn all_of(parts: impl IntoIterator<Item = CompiledCondition>) -> Self {
        Self::join(parts, " AND ")
    }

    fn join(parts: impl IntoIterator<Item = CompiledCondition>, separator: &str) -> Self {
        let mut fragments = Vec::new();
        let mut bindings = Vec::new();
        for part in parts.into_iter().filter(|p| !p.is_always_true()) {
            fragments.push(part.sql);
            bindings.extend(part.bindings);
        }
        Self {
            sql: fragments.join(separator),
            bindings,
        }
    }

    /// Wraps the fragment in parentheses. The always-true condition stays empty.
    pub fn grouped(self) -> Self {
        if self.is_always_true() {
            return self;
        }
        Self {
            sql: format!("({})", self.sql),
            bindings: self.bindings,
        }
    }

    /// Placeholders outside single-quoted literals
    pub fn placeholder_count(&self) -> usize {
        let mut in_literal = false;
        self.sql
            .chars()
            .filter(|&c| {
                if c == '\'' {
                    in_literal = !in_literal;
                }
                c == '?' && !in_literal
            })
            .count()
    }

    /// Rewrites `?` placeholders into the dialect's positional form
    pub fn render_placeholders(&self, dialect: Dialect) -> String {
        let mut rendered = String::with_capacity(self.sql.len());
        let mut in_literal = false;
        let mut index = 0;
        for c in self.sql.chars() {
            match c {
                '\'' => {
                    in_literal = !in_literal;
                    rendered.push(c);
                }
                '?' if !in_literal => {
                    index += 1;
                    rendered.push_str(&dialect.placeholder(index));
                }
                _ => rendered.push(c),
            }
        }
        rendered
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn bindings(&self) -> &[BoundValue] {
        &self.bindings
    }
}
