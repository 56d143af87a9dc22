//! List query composition
//!
//! Combines search, filters, and bulk ids into one condition and picks the
//! ordering and eager-load set. Pagination belongs to the store driver.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::ast::{SortDirection, SortSpec};
use crate::association::{describe_associations, AssociationError, AssociationResult, TypeRegistry};
use crate::config::AdminConfig;
use crate::filter::{BoundValue, CompiledCondition, FilterCompiler, FilterSpec, SearchCompiler};
use crate::schema::{describe_fields, RecordType, SchemaReflector};

/// Parameters of an admin list request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Free-text search term
    pub query: Option<String>,
    /// Per-field filters
    pub filters: FilterSpec,
    /// Restrict to these primary key values
    pub bulk_ids: Vec<String>,
    /// Column to sort by; the primary key when absent or unknown
    pub sort: Option<String>,
    /// Ascending instead of the default descending order
    pub sort_reverse: bool,
    /// Associations to eager-load
    pub include: Vec<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, term: impl Into<String>) -> Self {
        self.query = Some(term.into());
        self
    }

    pub fn filters(mut self, filters: FilterSpec) -> Self {
        self.filters = filters;
        self
    }

    pub fn bulk_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bulk_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort(mut self, column: impl Into<String>) -> Self {
        self.sort = Some(column.into());
        self
    }

    pub fn sort_reverse(mut self, reverse: bool) -> Self {
        self.sort_reverse = reverse;
        self
    }

    pub fn include(mut self, association: impl Into<String>) -> Self {
        self.include.push(association.into());
        self
    }
}

/// Everything the store driver needs to fetch one list page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    /// Table to select from
    pub table: String,
    /// Combined condition; empty means every row
    pub condition: CompiledCondition,
    /// Ordering
    pub sort: SortSpec,
    /// Associations to eager-load, in request order
    pub includes: Vec<String>,
}

/// Builds the list query for `record` against the current time
pub fn build_list_query<R>(
    record: &RecordType,
    options: &ListOptions,
    reflector: &R,
    registry: &TypeRegistry,
    config: &AdminConfig,
) -> AssociationResult<ListQuery>
where
    R: SchemaReflector + ?Sized,
{
    build_list_query_at(record, options, reflector, registry, config, Utc::now())
}

/// Builds the list query, computing relative date filters from `now`
pub fn build_list_query_at<R>(
    record: &RecordType,
    options: &ListOptions,
    reflector: &R,
    registry: &TypeRegistry,
    config: &AdminConfig,
    now: DateTime<Utc>,
) -> AssociationResult<ListQuery>
where
    R: SchemaReflector + ?Sized,
{
    let includes = validate_includes(record, &options.include, reflector, registry, config)?;

    let search = match options.query.as_deref() {
        Some(term) => SearchCompiler::new(reflector, registry, config).compile(record, term)?,
        None => CompiledCondition::always_true(),
    };
    let filters =
        FilterCompiler::new(reflector, registry, config).compile_at(record, &options.filters, now)?;
    let bulk = if options.bulk_ids.is_empty() {
        CompiledCondition::always_true()
    } else {
        CompiledCondition::new(
            format!("({} IN (?))", record.qualify(record.primary_key())),
            vec![BoundValue::List(options.bulk_ids.clone())],
        )
    };

    let condition = CompiledCondition::all_of([search.grouped(), filters.grouped(), bulk]);
    let sort = sort_spec(record, options, reflector);

    debug!(
        record_type = record.name(),
        sort = %sort.to_sql(),
        includes = includes.len(),
        "list query built"
    );

    Ok(ListQuery {
        table: record.table_name().to_string(),
        condition,
        sort,
        includes,
    })
}

fn sort_spec<R>(record: &RecordType, options: &ListOptions, reflector: &R) -> SortSpec
where
    R: SchemaReflector + ?Sized,
{
    let column = options
        .sort
        .as_deref()
        .filter(|sort| describe_fields(record, reflector).iter().any(|f| f.name == *sort))
        .unwrap_or(record.primary_key());

    SortSpec {
        field: record.qualify(column),
        direction: SortDirection::from_reverse(options.sort_reverse),
    }
}

fn validate_includes<R>(
    record: &RecordType,
    include: &[String],
    reflector: &R,
    registry: &TypeRegistry,
    config: &AdminConfig,
) -> AssociationResult<Vec<String>>
where
    R: SchemaReflector + ?Sized,
{
    if include.is_empty() {
        return Ok(Vec::new());
    }

    let associations = describe_associations(record, reflector, registry, config)?;
    for name in include {
        if !associations.iter().any(|a| &a.name == name) {
            return Err(AssociationError::configuration(
                record.name(),
                name,
                "cannot eager-load an undeclared association",
            ));
        }
    }
    Ok(include.to_vec())
}
