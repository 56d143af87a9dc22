//! Field descriptor resolution
//!
//! Descriptors are recomputed from the reflector on every call.

use super::reflector::SchemaReflector;
use super::types::{FieldDescriptor, RecordType};

/// Scalar fields of a record type, in the store's native column order.
pub fn describe_fields<R>(record: &RecordType, reflector: &R) -> Vec<FieldDescriptor>
where
    R: SchemaReflector + ?Sized,
{
    reflector
        .reflect_schema(record)
        .iter()
        .map(FieldDescriptor::from_column)
        .collect()
}

/// Fields matched by free-text search (string and text columns).
pub fn queryable_fields<R>(record: &RecordType, reflector: &R) -> Vec<FieldDescriptor>
where
    R: SchemaReflector + ?Sized,
{
    describe_fields(record, reflector)
        .into_iter()
        .filter(|field| field.storage_type.is_textual())
        .collect()
}

/// First column named in `label_fields` (priority order) that holds text.
pub fn label_field<R>(
    record: &RecordType,
    reflector: &R,
    label_fields: &[String],
) -> Option<FieldDescriptor>
where
    R: SchemaReflector + ?Sized,
{
    let fields = describe_fields(record, reflector);
    label_fields.iter().find_map(|label| {
        fields
            .iter()
            .find(|field| &field.name == label && field.storage_type.is_textual())
            .cloned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RawColumn, RelationshipDecl, StorageType};

    struct Fixed(Vec<RawColumn>);

    impl SchemaReflector for Fixed {
        fn reflect_schema(&self, _record: &RecordType) -> Vec<RawColumn> {
            self.0.clone()
        }

        fn reflect_relationships(&self, _record: &RecordType) -> Vec<RelationshipDecl> {
            Vec::new()
        }
    }

    fn player_columns() -> Fixed {
        Fixed(vec![
            RawColumn::new("id", "integer").primary(),
            RawColumn::new("team_id", "integer"),
            RawColumn::new("name", "varchar(100)").limit(100).not_null(),
            RawColumn::new("position", "varchar(255)"),
            RawColumn::new("notes", "text"),
            RawColumn::new("retired", "boolean"),
        ])
    }

    #[test]
    fn test_preserves_column_order() {
        let names: Vec<_> = describe_fields(&RecordType::new("Player"), &player_columns())
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["id", "team_id", "name", "position", "notes", "retired"]);
    }

    #[test]
    fn test_string_field_descriptor() {
        let fields = describe_fields(&RecordType::new("Player"), &player_columns());
        let name = fields.iter().find(|f| f.name == "name").unwrap();

        assert_eq!(
            name,
            &FieldDescriptor {
                name: "name".into(),
                pretty_name: "Name".into(),
                storage_type: StorageType::String,
                max_length: Some(100),
                nullable: false,
                auto_generated: false,
            }
        );
    }

    #[test]
    fn test_zero_columns_is_empty() {
        assert!(describe_fields(&RecordType::new("Empty"), &Fixed(Vec::new())).is_empty());
    }

    #[test]
    fn test_queryable_fields_are_textual() {
        let names: Vec<_> = queryable_fields(&RecordType::new("Player"), &player_columns())
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["name", "position", "notes"]);
    }

    #[test]
    fn test_label_field_priority() {
        let labels = vec!["title".to_string(), "name".to_string()];
        let field = label_field(&RecordType::new("Player"), &player_columns(), &labels);
        assert_eq!(field.map(|f| f.name), Some("name".to_string()));

        let labels = vec!["retired".to_string()];
        assert!(label_field(&RecordType::new("Player"), &player_columns(), &labels).is_none());
    }
}
