//! Filter compilation
//!
//! Each field key of a `FilterSpec` resolves to a target:
//! - a column of the record type
//! - a belongs_to association: the target's label column OR the owner's foreign key
//! - a dotted `association.column` key: a column of the associated type
//!
//! Groups of one field are OR'd and parenthesized; fields are AND'd.
//! Keys matching none of these are skipped.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::condition::CompiledCondition;
use super::grammar::OperatorGrammar;
use super::spec::{FieldFilter, FilterSpec};
use crate::association::{
    describe_associations, AssociationDescriptor, AssociationKind, AssociationResult, TypeRef,
    TypeRegistry,
};
use crate::config::AdminConfig;
use crate::schema::{
    describe_fields, label_field, FieldDescriptor, RecordType, SchemaReflector, StorageType,
};

/// Where a filter key's conditions apply
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterTarget {
    Column {
        column: String,
        storage_type: StorageType,
    },
    BelongsTo {
        label: Option<String>,
        foreign_key: String,
        foreign_key_type: StorageType,
    },
}

/// Compiles filter maps for record types known to one reflector and registry
pub struct FilterCompiler<'a, R: SchemaReflector + ?Sized> {
    reflector: &'a R,
    registry: &'a TypeRegistry,
    config: &'a AdminConfig,
    grammar: OperatorGrammar,
}

impl<'a, R: SchemaReflector + ?Sized> FilterCompiler<'a, R> {
    pub fn new(reflector: &'a R, registry: &'a TypeRegistry, config: &'a AdminConfig) -> Self {
        Self {
            reflector,
            registry,
            config,
            grammar: OperatorGrammar::from_config(config),
        }
    }

    /// Compiles `spec` against the current time
    pub fn compile(
        &self,
        record: &RecordType,
        spec: &FilterSpec,
    ) -> AssociationResult<CompiledCondition> {
        self.compile_at(record, spec, Utc::now())
    }

    /// Compiles `spec`, computing relative dates from `now`
    pub fn compile_at(
        &self,
        record: &RecordType,
        spec: &FilterSpec,
        now: DateTime<Utc>,
    ) -> AssociationResult<CompiledCondition> {
        let fields = describe_fields(record, self.reflector);
        let mut associations: Option<Vec<AssociationDescriptor>> = None;
        let mut per_field = Vec::with_capacity(spec.fields().len());

        for filter in spec.fields() {
            let target = match column_target(record, &fields, &filter.field) {
                Some(target) => Some(target),
                None => {
                    if associations.is_none() {
                        associations = Some(describe_associations(
                            record,
                            self.reflector,
                            self.registry,
                            self.config,
                        )?);
                    }
                    let descriptors = associations.as_deref().unwrap_or(&[]);
                    self.association_target(record, &fields, descriptors, &filter.field)?
                }
            };

            let Some(target) = target else {
                debug!(
                    record_type = record.name(),
                    key = %filter.field,
                    "filter key matches no column or association, skipped"
                );
                continue;
            };

            let condition = self.field_condition(&target, filter, now);
            if !condition.is_always_true() {
                per_field.push(condition.grouped());
            }
        }

        Ok(CompiledCondition::all_of(per_field))
    }

    fn field_condition(
        &self,
        target: &FilterTarget,
        filter: &FieldFilter,
        now: DateTime<Utc>,
    ) -> CompiledCondition {
        let mut conditions = Vec::new();
        for (group, entry) in &filter.groups {
            let before = conditions.len();
            let value = entry.value.as_str();
            let operator = entry.operator();

            match target {
                FilterTarget::Column {
                    column,
                    storage_type,
                } => conditions.extend(self.grammar.build_condition_at(
                    column,
                    *storage_type,
                    value,
                    operator,
                    now,
                )),
                FilterTarget::BelongsTo {
                    label,
                    foreign_key,
                    foreign_key_type,
                } => {
                    if let Some(label) = label {
                        conditions.extend(self.grammar.build_condition_at(
                            label,
                            StorageType::String,
                            value,
                            operator,
                            now,
                        ));
                    }
                    conditions.extend(self.grammar.build_condition_at(
                        foreign_key,
                        *foreign_key_type,
                        value,
                        operator,
                        now,
                    ));
                }
            }

            if conditions.len() == before {
                debug!(key = %filter.field, group = %group, "filter group produced no condition");
            }
        }
        CompiledCondition::any_of(conditions)
    }

    fn association_target(
        &self,
        record: &RecordType,
        fields: &[FieldDescriptor],
        associations: &[AssociationDescriptor],
        key: &str,
    ) -> AssociationResult<Option<FilterTarget>> {
        if let Some((name, column)) = key.split_once('.') {
            let Some(target) = associations
                .iter()
                .find(|a| a.name == name)
                .and_then(AssociationDescriptor::target)
            else {
                return Ok(None);
            };
            let related = self.resolve(record, name, target)?;
            let related_fields = describe_fields(&related, self.reflector);
            return Ok(column_target(&related, &related_fields, column));
        }

        let Some(association) = associations
            .iter()
            .find(|a| a.name == key && a.kind == AssociationKind::BelongsTo)
        else {
            return Ok(None);
        };

        // A self-referential parent shares the owner's table, so its label
        // cannot be told apart without a join alias; match the key only.
        let label = match association.target() {
            Some(target) => {
                let parent = self.resolve(record, &association.name, target)?;
                if parent.table_name() == record.table_name() {
                    None
                } else {
                    label_field(&parent, self.reflector, &self.config.label_fields)
                        .map(|field| parent.qualify(&field.name))
                }
            }
            None => None,
        };

        let foreign_key_type = fields
            .iter()
            .find(|f| f.name == association.child_key)
            .map_or(StorageType::Integer, |f| f.storage_type);

        Ok(Some(FilterTarget::BelongsTo {
            label,
            foreign_key: record.qualify(&association.child_key),
            foreign_key_type,
        }))
    }

    fn resolve(
        &self,
        record: &RecordType,
        association: &str,
        target: &TypeRef,
    ) -> AssociationResult<RecordType> {
        target.resolve(self.registry).map_err(|err| {
            warn!(
                record_type = record.name(),
                association,
                target = target.type_name(),
                "association target is not registered"
            );
            err
        })
    }
}

fn column_target(record: &RecordType, fields: &[FieldDescriptor], key: &str) -> Option<FilterTarget> {
    fields
        .iter()
        .find(|field| field.name == key)
        .map(|field| FilterTarget::Column {
            column: record.qualify(&field.name),
            storage_type: field.storage_type,
        })
}

/// Compiles `spec` for `record` against the current time
pub fn compile_filters<R>(
    record: &RecordType,
    spec: &FilterSpec,
    reflector: &R,
    registry: &TypeRegistry,
    config: &AdminConfig,
) -> AssociationResult<CompiledCondition>
where
    R: SchemaReflector + ?Sized,
{
    FilterCompiler::new(reflector, registry, config).compile(record, spec)
}
