//! Operator tokens
//!
//! Raw operator and value strings from the admin UI are parsed into closed
//! enums here; nothing past this module matches on strings.

use super::condition::CompiledCondition;

/// Value-independent tokens. They are accepted in either the operator or
/// the value slot. Declaration order is precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlToken {
    /// Drop the filter entirely
    Discard,
    /// NULL or empty string
    Blank,
    /// Neither NULL nor empty string
    Present,
    Null,
    NotNull,
    /// Empty string
    Empty,
    /// Not the empty string
    NotEmpty,
}

impl ControlToken {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "_discard" => Some(ControlToken::Discard),
            "_blank" => Some(ControlToken::Blank),
            "_present" => Some(ControlToken::Present),
            "_null" => Some(ControlToken::Null),
            "_not_null" => Some(ControlToken::NotNull),
            "_empty" => Some(ControlToken::Empty),
            "_not_empty" => Some(ControlToken::NotEmpty),
            _ => None,
        }
    }

    /// Picks the token that governs a filter entry.
    ///
    /// When both slots hold a token, the earlier one in declaration order
    /// wins regardless of slot, so `_discard` always wins.
    pub fn from_slots(value: &str, operator: Option<&str>) -> Option<Self> {
        let from_value = Self::parse(value);
        let from_operator = operator.and_then(Self::parse);
        from_value.into_iter().chain(from_operator).min()
    }

    /// Binding-free condition on `column`; `None` for `Discard`
    pub fn condition(&self, column: &str) -> Option<CompiledCondition> {
        let sql = match self {
            ControlToken::Discard => return None,
            ControlToken::Blank => format!("({c} IS NULL OR {c} = '')", c = column),
            ControlToken::Present => format!("({c} IS NOT NULL AND {c} != '')", c = column),
            ControlToken::Null => format!("({} IS NULL)", column),
            ControlToken::NotNull => format!("({} IS NOT NULL)", column),
            ControlToken::Empty => format!("({} = '')", column),
            ControlToken::NotEmpty => format!("({} != '')", column),
        };
        Some(CompiledCondition::fixed(sql))
    }
}

/// Pattern shape for string and text columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextMatch {
    /// `v`
    Exact,
    /// `v%`
    StartsWith,
    /// `%v`
    EndsWith,
    /// `%v%`
    Contains,
}

impl TextMatch {
    /// Parses an operator token. Absent, `default`, `like` and anything
    /// unrecognized mean `Contains`.
    pub fn parse(operator: Option<&str>) -> Self {
        match operator.map(str::trim) {
            Some("is") | Some("=") => TextMatch::Exact,
            Some("starts_with") => TextMatch::StartsWith,
            Some("ends_with") => TextMatch::EndsWith,
            _ => TextMatch::Contains,
        }
    }

    /// Whether `token` names a text operator explicitly
    pub fn is_known(token: &str) -> bool {
        matches!(
            token.trim(),
            "default" | "like" | "is" | "=" | "starts_with" | "ends_with"
        )
    }

    /// Wraps `value` in the pattern's wildcards
    pub fn pattern(&self, value: &str) -> String {
        match self {
            TextMatch::Exact => value.to_string(),
            TextMatch::StartsWith => format!("{}%", value),
            TextMatch::EndsWith => format!("%{}", value),
            TextMatch::Contains => format!("%{}%", value),
        }
    }
}

/// Operators for date, datetime and timestamp columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalOp {
    Today,
    Yesterday,
    /// Monday through Sunday of the current week
    ThisWeek,
    LastWeek,
    /// Newer than `value` days ago
    LessThan,
    /// Older than `value` days ago
    MoreThan,
    /// Explicit `MMDDYYYY` date
    Mmddyyyy,
    /// Explicit `YYYY-MM-DD` date (`is`, `default`, or no operator)
    On,
    /// Unrecognized operator; adds no condition
    NoOp,
}

impl TemporalOp {
    pub fn parse(operator: Option<&str>) -> Self {
        match operator.map(str::trim) {
            None | Some("") | Some("is") | Some("=") | Some("default") => TemporalOp::On,
            Some("today") => TemporalOp::Today,
            Some("yesterday") => TemporalOp::Yesterday,
            Some("this_week") => TemporalOp::ThisWeek,
            Some("last_week") => TemporalOp::LastWeek,
            Some("less_than") => TemporalOp::LessThan,
            Some("more_than") => TemporalOp::MoreThan,
            Some("mmddyyyy") => TemporalOp::Mmddyyyy,
            Some(_) => TemporalOp::NoOp,
        }
    }
}
