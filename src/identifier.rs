//! SQL identifier checks
//!
//! Column and table names are the only text interpolated into compiled
//! fragments, so every name that reaches a fragment must pass these checks.

use std::sync::OnceLock;

use regex::Regex;

fn identifier_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex"))
}

/// Returns true for a bare identifier (`division_id`).
pub fn is_identifier(name: &str) -> bool {
    identifier_pattern().is_match(name)
}
