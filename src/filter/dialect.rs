//! Store dialects
//!
//! Dialects differ in two places only:
//! - the case-insensitive pattern match (`ILIKE` vs `LIKE`)
//! - positional placeholders (`?` vs `$1`)

use serde::{Deserialize, Serialize};

/// SQL dialect of the backing store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL: `ILIKE`, `$n` placeholders
    Postgres,
    /// MySQL: `LIKE` under a case-insensitive collation
    Mysql,
    /// SQLite: `LIKE` is case-insensitive for ASCII
    #[default]
    Sqlite,
    /// Portable fallback: `LOWER(c) LIKE LOWER(?)`
    Ansi,
}

impl Dialect {
    /// Get the dialect name
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
            Dialect::Sqlite => "sqlite",
            Dialect::Ansi => "ansi",
        }
    }

    /// Parses a dialect name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Dialect::Postgres),
            "mysql" => Some(Dialect::Mysql),
            "sqlite" => Some(Dialect::Sqlite),
            "ansi" => Some(Dialect::Ansi),
            _ => None,
        }
    }

    /// Case-insensitive pattern match of `column` against one placeholder
    ///
    /// - PostgreSQL: `col ILIKE ?`
    /// - MySQL/SQLite: `col LIKE ?`
    /// - ANSI: `LOWER(col) LIKE LOWER(?)`
    pub fn case_insensitive_match(&self, column: &str) -> String {
        match self {
            Dialect::Postgres => format!("{} ILIKE ?", column),
            Dialect::Mysql | Dialect::Sqlite => format!("{} LIKE ?", column),
            Dialect::Ansi => format!("LOWER({}) LIKE LOWER(?)", column),
        }
    }

    /// Clause appended to a pattern match whose value went through
    /// `escape_like_pattern`. MySQL already escapes with `\` and would read
    /// `'\'` as an unterminated literal.
    pub fn like_escape_clause(&self) -> &'static str {
        match self {
            Dialect::Mysql => "",
            Dialect::Postgres | Dialect::Sqlite | Dialect::Ansi => " ESCAPE '\\'",
        }
    }

    /// Parameter placeholder for the given index (1-based)
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index),
            Dialect::Mysql | Dialect::Sqlite | Dialect::Ansi => "?".to_string(),
        }
    }
}

/// Escape special characters in LIKE patterns
///
/// Escapes `%`, `_`, and `\` so they match literally. Pair the pattern with
/// `ESCAPE '\'`.
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
