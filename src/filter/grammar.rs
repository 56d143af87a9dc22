//! Operator grammar
//!
//! Maps (column, storage type, value, operator) to at most one
//! `CompiledCondition`. Incomplete or malformed input yields `None` so the
//! filter is dropped rather than rejected.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::debug;

use super::condition::{BoundValue, CompiledCondition};
use super::dialect::{escape_like_pattern, Dialect};
use super::operator::{ControlToken, TemporalOp, TextMatch};
use crate::config::AdminConfig;
use crate::schema::StorageType;

/// Builds conditions for one store dialect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorGrammar {
    dialect: Dialect,
    escape_wildcards: bool,
}

impl OperatorGrammar {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            escape_wildcards: false,
        }
    }

    /// Escape `%`, `_` and `\` in pattern values
    pub fn escape_wildcards(mut self, escape: bool) -> Self {
        self.escape_wildcards = escape;
        self
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.dialect).escape_wildcards(config.escape_like_wildcards)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Builds the condition for one filter entry against the current time
    pub fn build_condition(
        &self,
        column: &str,
        storage_type: StorageType,
        value: &str,
        operator: Option<&str>,
    ) -> Option<CompiledCondition> {
        self.build_condition_at(column, storage_type, value, operator, Utc::now())
    }

    /// Builds the condition for one filter entry, with relative dates
    /// computed from `now`
    pub fn build_condition_at(
        &self,
        column: &str,
        storage_type: StorageType,
        value: &str,
        operator: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<CompiledCondition> {
        if let Some(token) = ControlToken::from_slots(value, operator) {
            return token.condition(column);
        }

        let condition = match storage_type {
            StorageType::String | StorageType::Text => {
                self.pattern_condition(column, value, TextMatch::parse(operator))
            }
            StorageType::Boolean => boolean_condition(column, value),
            StorageType::Integer => value
                .trim()
                .parse::<i64>()
                .ok()
                .map(|n| equals(column, BoundValue::Integer(n))),
            StorageType::Float | StorageType::Decimal => value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(|x| equals(column, BoundValue::Float(x))),
            StorageType::Enum => Some(CompiledCondition::new(
                format!("({} IN (?))", column),
                vec![BoundValue::List(vec![value.to_string()])],
            )),
            StorageType::Date | StorageType::Datetime | StorageType::Timestamp => {
                temporal_condition(column, value, TemporalOp::parse(operator), now)
            }
            StorageType::Binary => None,
        };

        if condition.is_none() {
            debug!(
                column,
                storage_type = storage_type.type_name(),
                operator = operator.unwrap_or_default(),
                "filter entry dropped"
            );
        }
        condition
    }

    /// Case-insensitive pattern match; `None` for a blank value
    pub fn pattern_condition(
        &self,
        column: &str,
        value: &str,
        text_match: TextMatch,
    ) -> Option<CompiledCondition> {
        if value.trim().is_empty() {
            return None;
        }

        let matcher = self.dialect.case_insensitive_match(column);
        let (sql, value) = if self.escape_wildcards {
            let sql = format!("({}{})", matcher, self.dialect.like_escape_clause());
            (sql, escape_like_pattern(value))
        } else {
            (format!("({})", matcher), value.to_string())
        };

        Some(CompiledCondition::new(
            sql,
            vec![BoundValue::Text(text_match.pattern(&value))],
        ))
    }
}

/// Builds a condition with the default grammar (SQLite `LIKE`, no escaping)
pub fn build_condition(
    column: &str,
    storage_type: StorageType,
    value: &str,
    operator: Option<&str>,
) -> Option<CompiledCondition> {
    OperatorGrammar::default().build_condition(column, storage_type, value, operator)
}

fn equals(column: &str, value: BoundValue) -> CompiledCondition {
    CompiledCondition::new(format!("({} = ?)", column), vec![value])
}

fn boolean_condition(column: &str, value: &str) -> Option<CompiledCondition> {
    match value.trim() {
        "false" | "f" | "0" => Some(CompiledCondition::new(
            format!("({c} IS NULL OR {c} = ?)", c = column),
            vec![BoundValue::Boolean(false)],
        )),
        "true" | "t" | "1" => Some(equals(column, BoundValue::Boolean(true))),
        _ => None,
    }
}

fn temporal_condition(
    column: &str,
    value: &str,
    op: TemporalOp,
    now: DateTime<Utc>,
) -> Option<CompiledCondition> {
    let today = now.date_naive();
    match op {
        TemporalOp::Today => between_days(column, today, today),
        TemporalOp::Yesterday => {
            let yesterday = today.pred_opt()?;
            between_days(column, yesterday, yesterday)
        }
        TemporalOp::ThisWeek => {
            let monday = week_start(today)?;
            between_days(column, monday, monday + Duration::days(6))
        }
        TemporalOp::LastWeek => {
            let monday = week_start(today)? - Duration::days(7);
            between_days(column, monday, monday + Duration::days(6))
        }
        TemporalOp::LessThan => {
            let cutoff = days_ago(now, value)?;
            Some(CompiledCondition::new(
                format!("({} > ?)", column),
                vec![BoundValue::Timestamp(cutoff)],
            ))
        }
        TemporalOp::MoreThan => {
            let cutoff = days_ago(now, value)?;
            Some(CompiledCondition::new(
                format!("({} < ?)", column),
                vec![BoundValue::Timestamp(cutoff)],
            ))
        }
        TemporalOp::Mmddyyyy => {
            let date = parse_mmddyyyy(value)?;
            between_days(column, date, date)
        }
        TemporalOp::On => {
            let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()?;
            between_days(column, date, date)
        }
        TemporalOp::NoOp => None,
    }
}

/// `(c BETWEEN ? AND ?)` from the start of `first` to the end of `last`
fn between_days(column: &str, first: NaiveDate, last: NaiveDate) -> Option<CompiledCondition> {
    let start = first.and_hms_opt(0, 0, 0)?.and_utc();
    let end = last.and_hms_micro_opt(23, 59, 59, 999_999)?.and_utc();
    Some(CompiledCondition::new(
        format!("({} BETWEEN ? AND ?)", column),
        vec![BoundValue::Timestamp(start), BoundValue::Timestamp(end)],
    ))
}

fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    let offset = i64::from(date.weekday().num_days_from_monday());
    date.checked_sub_signed(Duration::days(offset))
}

fn days_ago(now: DateTime<Utc>, value: &str) -> Option<DateTime<Utc>> {
    let days = value.trim().parse::<i64>().ok().filter(|d| *d >= 0)?;
    now.checked_sub_signed(Duration::try_days(days)?)
}

fn parse_mmddyyyy(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month = value[0..2].parse().ok()?;
    let day = value[2..4].parse().ok()?;
    let year = value[4..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pinned() -> DateTime<Utc> {
        // A Wednesday
        Utc.with_ymd_and_hms(2024, 3, 13, 15, 30, 0).unwrap()
    }

    fn at(storage_type: StorageType, value: &str, operator: Option<&str>) -> Option<CompiledCondition> {
        OperatorGrammar::default().build_condition_at("field", storage_type, value, operator, pinned())
    }

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, micro: u32) -> BoundValue {
        let naive = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_micro_opt(h, min, s, micro)
            .unwrap();
        BoundValue::Timestamp(naive.and_utc())
    }

    #[test]
    fn test_string_operators() {
        let cases = [
            (Some("is"), "foo"),
            (Some("like"), "%foo%"),
            (Some("default"), "%foo%"),
            (Some("starts_with"), "foo%"),
            (Some("ends_with"), "%foo"),
            (Some("was"), "%foo%"),
            (None, "%foo%"),
        ];
        for (operator, pattern) in cases {
            let condition = at(StorageType::String, "foo", operator).unwrap();
            assert_eq!(condition.sql(), "(field LIKE ?)");
            assert_eq!(condition.bindings(), &[BoundValue::Text(pattern.into())]);
        }
    }

    #[test]
    fn test_blank_string_adds_nothing() {
        assert!(at(StorageType::String, "", Some("is")).is_none());
        assert!(at(StorageType::Text, "   ", None).is_none());
    }

    #[test]
    fn test_dialect_matchers() {
        let postgres = OperatorGrammar::new(Dialect::Postgres);
        let condition = postgres
            .build_condition("teams.name", StorageType::String, "jets", Some("is"))
            .unwrap();
        assert_eq!(condition.sql(), "(teams.name ILIKE ?)");

        let ansi = OperatorGrammar::new(Dialect::Ansi);
        let condition = ansi
            .build_condition("teams.name", StorageType::Text, "jets", None)
            .unwrap();
        assert_eq!(condition.sql(), "(LOWER(teams.name) LIKE LOWER(?))");
    }

    #[test]
    fn test_escaped_wildcards() {
        let grammar = OperatorGrammar::new(Dialect::Sqlite).escape_wildcards(true);
        let condition = grammar
            .build_condition("c", StorageType::String, "50%_off", Some("starts_with"))
            .unwrap();
        assert_eq!(condition.sql(), "(c LIKE ? ESCAPE '\\')");
        assert_eq!(condition.bindings(), &[BoundValue::Text("50\\%\\_off%".into())]);
        assert_eq!(condition.placeholder_count(), 1);
    }

    #[test]
    fn test_control_tokens_in_either_slot() {
        let by_value = at(StorageType::String, "_null", None).unwrap();
        let by_operator = at(StorageType::String, "", Some("_null")).unwrap();
        assert_eq!(by_value, by_operator);
        assert_eq!(by_value.sql(), "(field IS NULL)");

        assert_eq!(
            at(StorageType::String, "_null", Some("_present")).unwrap().sql(),
            "(field IS NOT NULL AND field != '')"
        );
        assert!(at(StorageType::String, "_discard", Some("is")).is_none());
        assert!(at(StorageType::Integer, "5", Some("_discard")).is_none());
        assert_eq!(
            at(StorageType::Integer, "", Some("_not_null")).unwrap().sql(),
            "(field IS NOT NULL)"
        );
    }

    #[test]
    fn test_boolean_tokens() {
        for token in ["false", "f", "0"] {
            let condition = at(StorageType::Boolean, token, None).unwrap();
            assert_eq!(condition.sql(), "(field IS NULL OR field = ?)");
            assert_eq!(condition.bindings(), &[BoundValue::Boolean(false)]);
        }
        for token in ["true", "t", "1"] {
            let condition = at(StorageType::Boolean, token, None).unwrap();
            assert_eq!(condition.sql(), "(field = ?)");
            assert_eq!(condition.bindings(), &[BoundValue::Boolean(true)]);
        }
        assert!(at(StorageType::Boolean, "yes", None).is_none());
        assert!(at(StorageType::Boolean, "", None).is_none());
    }

    #[test]
    fn test_numeric_values() {
        let condition = at(StorageType::Integer, "1", None).unwrap();
        assert_eq!(condition.sql(), "(field = ?)");
        assert_eq!(condition.bindings(), &[BoundValue::Integer(1)]);
        assert!(at(StorageType::Integer, "abc", None).is_none());
        assert!(at(StorageType::Integer, "1.5", None).is_none());

        let condition = at(StorageType::Decimal, "2.50", None).unwrap();
        assert_eq!(condition.bindings(), &[BoundValue::Float(2.5)]);
        assert!(at(StorageType::Float, "NaN", None).is_none());
        assert!(at(StorageType::Float, "inf", None).is_none());
    }

    #[test]
    fn test_enum_is_always_membership() {
        let condition = at(StorageType::Enum, "1", None).unwrap();
        assert_eq!(condition.sql(), "(field IN (?))");
        assert_eq!(condition.bindings(), &[BoundValue::List(vec!["1".into()])]);
    }

    #[test]
    fn test_binary_is_not_filterable() {
        assert!(at(StorageType::Binary, "abc", Some("is")).is_none());
    }

    #[test]
    fn test_day_ranges() {
        let today = at(StorageType::Datetime, "", Some("today")).unwrap();
        assert_eq!(today.sql(), "(field BETWEEN ? AND ?)");
        assert_eq!(
            today.bindings(),
            &[ts(2024, 3, 13, 0, 0, 0, 0), ts(2024, 3, 13, 23, 59, 59, 999_999)]
        );

        let yesterday = at(StorageType::Timestamp, "", Some("yesterday")).unwrap();
        assert_eq!(
            yesterday.bindings(),
            &[ts(2024, 3, 12, 0, 0, 0, 0), ts(2024, 3, 12, 23, 59, 59, 999_999)]
        );
    }

    #[test]
    fn test_week_ranges_start_monday() {
        let this_week = at(StorageType::Date, "", Some("this_week")).unwrap();
        assert_eq!(
            this_week.bindings(),
            &[ts(2024, 3, 11, 0, 0, 0, 0), ts(2024, 3, 17, 23, 59, 59, 999_999)]
        );

        let last_week = at(StorageType::Date, "", Some("last_week")).unwrap();
        assert_eq!(
            last_week.bindings(),
            &[ts(2024, 3, 4, 0, 0, 0, 0), ts(2024, 3, 10, 23, 59, 59, 999_999)]
        );
    }

    #[test]
    fn test_relative_days() {
        let newer = at(StorageType::Datetime, "1", Some("less_than")).unwrap();
        assert_eq!(newer.sql(), "(field > ?)");
        assert_eq!(newer.bindings(), &[ts(2024, 3, 12, 15, 30, 0, 0)]);

        let older = at(StorageType::Datetime, "2", Some("more_than")).unwrap();
        assert_eq!(older.sql(), "(field < ?)");
        assert_eq!(older.bindings(), &[ts(2024, 3, 11, 15, 30, 0, 0)]);

        assert!(at(StorageType::Datetime, "soon", Some("less_than")).is_none());
        assert!(at(StorageType::Datetime, "-1", Some("more_than")).is_none());
    }

    #[test]
    fn test_mmddyyyy() {
        let condition = at(StorageType::Date, "02292024", Some("mmddyyyy")).unwrap();
        assert_eq!(
            condition.bindings(),
            &[ts(2024, 2, 29, 0, 0, 0, 0), ts(2024, 2, 29, 23, 59, 59, 999_999)]
        );

        for malformed in ["0229202", "022920245", "13012024", "02302024", "ab012024", ""] {
            assert!(at(StorageType::Date, malformed, Some("mmddyyyy")).is_none(), "{malformed}");
        }
    }

    #[test]
    fn test_explicit_date_and_unknown_operators() {
        assert!(at(StorageType::Date, "", Some("is")).is_none());
        assert!(at(StorageType::Date, "", None).is_none());
        assert!(at(StorageType::Date, "yesterday-ish", Some("default")).is_none());
        assert!(at(StorageType::Date, "2024-03-01", Some("tomorrow")).is_none());

        let condition = at(StorageType::Date, "2024-03-01", Some("is")).unwrap();
        assert_eq!(
            condition.bindings(),
            &[ts(2024, 3, 1, 0, 0, 0, 0), ts(2024, 3, 1, 23, 59, 59, 999_999)]
        );
    }

    #[test]
    fn test_free_function_uses_default_grammar() {
        let condition = build_condition("balls.color", StorageType::String, "red", None).unwrap();
        assert_eq!(condition.sql(), "(balls.color LIKE ?)");
    }
}
