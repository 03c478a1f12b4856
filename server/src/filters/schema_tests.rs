use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use uuid::Uuid;

use super::*;
use crate::filters::operator::Operator;

#[allow(dead_code)]
#[derive(JsonSchema)]
#[serde(rename_all = "lowercase")]
enum Status {
    Active,
    Suspended,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct Address {
    city: String,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct Record {
    id: Uuid,
    name: String,
    age: i32,
    score: f64,
    active: bool,
    birthday: NaiveDate,
    created_at: DateTime<Utc>,
    status: Status,
    previous_status: Option<Status>,
    nickname: Option<String>,
    tags: Vec<String>,
    address: Address,
}

fn field<'a>(fields: &'a [SchemaField], name: &str) -> &'a SchemaField {
    fields
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("missing field {}", name))
}

#[test]
fn test_schema_fields_types() {
    let fields = schema_fields::<Record>();

    assert_eq!(field(&fields, "id").field_type, FieldType::Uuid);
    assert_eq!(field(&fields, "name").field_type, FieldType::String);
    assert_eq!(field(&fields, "age").field_type, FieldType::Integer);
    assert_eq!(field(&fields, "score").field_type, FieldType::Float);
    assert_eq!(field(&fields, "active").field_type, FieldType::Boolean);
    assert_eq!(field(&fields, "birthday").field_type, FieldType::Date);
    assert_eq!(field(&fields, "created_at").field_type, FieldType::DateTime);
    assert_eq!(
        field(&fields, "status").field_type,
        FieldType::enumeration(["active", "suspended"])
    );
    assert_eq!(
        field(&fields, "tags").field_type,
        FieldType::seq(FieldType::String)
    );
}

#[test]
fn test_schema_fields_nullability() {
    let fields = schema_fields::<Record>();

    assert!(!field(&fields, "name").nullable);
    assert!(field(&fields, "nickname").nullable);
    assert_eq!(field(&fields, "nickname").field_type, FieldType::String);
    assert!(field(&fields, "previous_status").nullable);
    assert_eq!(
        field(&fields, "previous_status").field_type,
        FieldType::enumeration(["active", "suspended"])
    );
}

#[test]
fn test_schema_fields_skip_nested_objects_and_keep_order() {
    let names: Vec<String> = schema_fields::<Record>().into_iter().map(|f| f.name).collect();
    assert!(!names.contains(&"address".to_string()));
    assert_eq!(names.first().map(String::as_str), Some("id"));
    assert_eq!(names.last().map(String::as_str), Some("tags"));
}

#[test]
fn test_selection() {
    let options: SchemaOptions<FilterField> = SchemaOptions::default()
        .include(["name", "age"])
        .exclude(["age"]);
    assert!(options.allows("name"));
    assert!(!options.allows("age"));
    assert!(!options.allows("score"));

    let options: SchemaOptions<FilterField> = SchemaOptions::default().exclude(["id"]);
    assert!(options.allows("score"));
    assert!(!options.allows("id"));
}

#[test]
fn test_create_filters_from_schema() {
    let set = create_filters_from_schema::<Record>(
        SchemaOptions::default().include(["age", "nickname", "tags"]),
        &FiltersConfig::default(),
        ParamLocation::Query,
    )
    .unwrap();

    let fields: Vec<&str> = set.fields().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(fields, vec!["age", "nickname", "tags"]);
    assert!(set.param_by_alias("age__gte").is_some());
    assert!(set.param_by_alias("nickname__isnull").is_some());
    assert!(set.param_by_alias("age__isnull").is_none());
    assert!(set.param_by_alias("tags__overlap").is_some());
}

#[test]
fn test_overrides_replace_and_add() {
    let set = create_filters_from_schema::<Record>(
        SchemaOptions::default()
            .include(["name"])
            .with_override(
                "name",
                FilterField::new(FieldType::String)
                    .with_alias("username")
                    .with_operators([Operator::Ilike]),
            )
            .with_override(
                "search",
                FilterField::new(FieldType::String)
                    .with_default_op(Operator::Ilike)
                    .with_operators([]),
            ),
        &FiltersConfig::default(),
        ParamLocation::Query,
    )
    .unwrap();

    let aliases: Vec<&str> = set.params().iter().map(|p| p.alias.as_str()).collect();
    assert_eq!(aliases, vec!["username", "username__icontains", "search"]);
}

#[test]
fn test_create_sorting_from_schema_only_scalars() {
    let set = create_sorting_from_schema::<Record>(
        SchemaOptions::default().exclude(["id"]),
        SortOptions::default(),
    )
    .unwrap();

    let names: Vec<&str> = set.fields().iter().map(SortField::name).collect();
    assert!(names.contains(&"name"));
    assert!(names.contains(&"created_at"));
    assert!(!names.contains(&"tags"));
    assert!(!names.contains(&"address"));
    assert!(!names.contains(&"id"));
}

#[test]
fn test_sorting_override_sets_alias() {
    let set = create_sorting_from_schema::<Record>(
        SchemaOptions::default()
            .include(["created_at"])
            .with_override("created_at", SortField::new("created_at").alias("created")),
        SortOptions::default().with_default(["-created"]),
    )
    .unwrap();

    assert_eq!(set.tokens(), &["+created", "-created"]);
    assert_eq!(set.default_values()[0].field(), "created_at");
}
