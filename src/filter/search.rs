//! Free-text search compilation

use tracing::{debug, warn};

use super::condition::CompiledCondition;
use super::grammar::OperatorGrammar;
use super::operator::TextMatch;
use crate::association::{describe_associations, AssociationKind, AssociationResult, TypeRegistry};
use crate::config::AdminConfig;
use crate::schema::{label_field, queryable_fields, RecordType, SchemaReflector};

/// Compiles a search term into an OR of pattern matches over the
/// searchable columns of a record type
pub struct SearchCompiler<'a, R: SchemaReflector + ?Sized> {
    reflector: &'a R,
    registry: &'a TypeRegistry,
    config: &'a AdminConfig,
    grammar: OperatorGrammar,
}

impl<'a, R: SchemaReflector + ?Sized> SearchCompiler<'a, R> {
    pub fn new(reflector: &'a R, registry: &'a TypeRegistry, config: &'a AdminConfig) -> Self {
        Self {
            reflector,
            registry,
            config,
            grammar: OperatorGrammar::from_config(config),
        }
    }

    /// Qualified columns a term is matched against: string and text columns
    /// in native order, then one label column per belongs_to target
    pub fn searchable_columns(&self, record: &RecordType) -> AssociationResult<Vec<String>> {
        let mut columns: Vec<String> = queryable_fields(record, self.reflector)
            .iter()
            .map(|field| record.qualify(&field.name))
            .collect();

        if !self.config.search_belongs_to {
            return Ok(columns);
        }

        let associations =
            describe_associations(record, self.reflector, self.registry, self.config)?;
        for association in associations
            .iter()
            .filter(|a| a.kind == AssociationKind::BelongsTo && !a.is_polymorphic)
        {
            let Some(target) = association.target() else {
                continue;
            };
            let parent = target.resolve(self.registry).map_err(|err| {
                warn!(
                    record_type = record.name(),
                    association = %association.name,
                    target = target.type_name(),
                    "association target is not registered"
                );
                err
            })?;
            // Self-joins need an alias the driver owns
            if parent.table_name() == record.table_name() {
                continue;
            }

            if let Some(label) = label_field(&parent, self.reflector, &self.config.label_fields) {
                let column = parent.qualify(&label.name);
                if !columns.contains(&column) {
                    columns.push(column);
                }
            }
        }

        Ok(columns)
    }

    /// OR of one pattern match per searchable column; blank terms match everything
    pub fn compile(&self, record: &RecordType, term: &str) -> AssociationResult<CompiledCondition> {
        if term.trim().is_empty() {
            return Ok(CompiledCondition::always_true());
        }

        let text_match = TextMatch::parse(Some(self.config.search_operator.as_str()));
        let columns = self.searchable_columns(record)?;
        debug!(
            record_type = record.name(),
            columns = columns.len(),
            "compiling search"
        );

        Ok(CompiledCondition::any_of(columns.iter().filter_map(|column| {
            self.grammar.pattern_condition(column, term, text_match)
        })))
    }
}

/// Compiles a free-text search for `record`
pub fn compile_search<R>(
    record: &RecordType,
    term: &str,
    reflector: &R,
    registry: &TypeRegistry,
    config: &AdminConfig,
) -> AssociationResult<CompiledCondition>
where
    R: SchemaReflector + ?Sized,
{
    SearchCompiler::new(reflector, registry, config).compile(record, term)
}
