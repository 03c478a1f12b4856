use serde_json::json;

use super::*;

fn users(options: SortOptions) -> Result<SortingSet, FilterError> {
    create_sorting(["name", "age", "created_at"], options)
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn asc(name: &str) -> SortValue {
    SortValue(name.to_string(), SortDirection::Asc, None)
}

fn desc(name: &str) -> SortValue {
    SortValue(name.to_string(), SortDirection::Desc, None)
}

#[test]
fn test_two_tokens_per_field() {
    let set = users(SortOptions::default()).unwrap();
    assert_eq!(
        set.tokens(),
        &["+name", "-name", "+age", "-age", "+created_at", "-created_at"]
    );
    assert_eq!(set.defs().get("-age"), Some(&desc("age")));
    assert_eq!(set.param(), "sort");
}

#[test]
fn test_comma_joined_sort() {
    let set = users(SortOptions::default()).unwrap();
    let values = set.extract(&pairs(&[("sort", "+name,-age")])).unwrap();
    assert_eq!(values, vec![asc("name"), desc("age")]);
}

#[test]
fn test_repeated_sort_matches_comma_joined() {
    let set = users(SortOptions::default()).unwrap();
    let joined = set.extract(&pairs(&[("sort", "+name,-age")])).unwrap();
    let repeated = set
        .extract(&pairs(&[("sort", "+name"), ("sort", "-age")]))
        .unwrap();
    assert_eq!(joined, repeated);
}

#[test]
fn test_caller_order_is_preserved() {
    let set = users(SortOptions::default()).unwrap();
    let values = set.extract(&pairs(&[("sort", "-created_at,+name")])).unwrap();
    assert_eq!(values, vec![desc("created_at"), asc("name")]);
}

#[test]
fn test_bare_and_space_prefixed_tokens_are_ascending() {
    let set = users(SortOptions::default()).unwrap();
    let values = set.extract(&pairs(&[("sort", "name, age")])).unwrap();
    assert_eq!(values, vec![asc("name"), asc("age")]);
}

#[test]
fn test_serialized_as_tuples() {
    let set = users(SortOptions::default()).unwrap();
    let values = set.extract(&pairs(&[("sort", "+name,-age")])).unwrap();
    assert_eq!(
        serde_json::to_value(&values).unwrap(),
        json!([["name", "asc", null], ["age", "desc", null]])
    );
}

#[test]
fn test_absent_param_uses_default() {
    let set = users(SortOptions::default().with_default(["-created_at", "name"])).unwrap();
    assert_eq!(
        set.extract(&[]).unwrap(),
        vec![desc("created_at"), asc("name")]
    );
    assert_eq!(set.default_values().len(), 2);
}

#[test]
fn test_absent_param_without_default_is_empty() {
    let set = users(SortOptions::default()).unwrap();
    assert!(set.resolve(None).unwrap().is_empty());
}

#[test]
fn test_explicit_empty_param_overrides_default() {
    let set = users(SortOptions::default().with_default(["-age"])).unwrap();
    assert!(set.extract(&pairs(&[("sort", "")])).unwrap().is_empty());
}

#[test]
fn test_invalid_default_rejected_at_construction() {
    let err = users(SortOptions::default().with_default(["invalid"])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Default sort field invalid is not in +age, +created_at, +name, -age, -created_at, -name"
    );
}

#[test]
fn test_unknown_token_is_a_validation_error() {
    let set = users(SortOptions::default()).unwrap();
    let err = set.extract(&pairs(&[("sort", "+name,+email")])).unwrap_err();

    assert_eq!(err.issues().len(), 1);
    assert_eq!(err.issues()[0].loc, "sort");
    assert!(err.issues()[0].message.starts_with("[1] Input should be '+name'"));
}

#[test]
fn test_alias_and_nulls() {
    let set = create_sorting(
        [
            SortField::new("created_at").alias("created"),
            SortField::new("manager_id").nulls(SortNulls::Smaller),
        ],
        SortOptions::default().with_param("order_by"),
    )
    .unwrap();

    let values = set
        .extract(&pairs(&[("order_by", "-created,+manager_id")]))
        .unwrap();
    assert_eq!(
        values,
        vec![
            desc("created_at"),
            SortValue("manager_id".to_string(), SortDirection::Asc, Some(SortNulls::Smaller)),
        ]
    );
    assert!(set.extract(&pairs(&[("order_by", "+created_at")])).is_err());
    assert!(set.extract(&pairs(&[("sort", "+unknown")])).unwrap().is_empty());
}

#[test]
fn test_duplicate_sort_field_rejected() {
    let err = create_sorting(["name", "name"], SortOptions::default()).unwrap_err();
    assert_eq!(err, FilterError::DuplicateSortField("name".to_string()));

    let err = create_sorting(
        [SortField::new("name"), SortField::new("title").alias("name")],
        SortOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err, FilterError::DuplicateSortField("name".to_string()));
}

#[test]
fn test_non_list_raw_value_rejected() {
    let set = users(SortOptions::default()).unwrap();
    let err = set.resolve(Some(json!(5))).unwrap_err();
    assert_eq!(err.issues()[0].message, "Input should be a valid list");
}

#[test]
fn test_header_param_matches_case_insensitively() {
    let set = users(
        SortOptions::default()
            .with_param("X-Sort")
            .with_location(ParamLocation::Header),
    )
    .unwrap();
    let values = set.extract(&pairs(&[("x-sort", "-age")])).unwrap();
    assert_eq!(values, vec![desc("age")]);
}

#[test]
fn test_query_param_stays_case_sensitive() {
    let set = users(SortOptions::default().with_default(["-age"])).unwrap();
    let values = set.extract(&pairs(&[("SORT", "+name")])).unwrap();
    assert_eq!(values, vec![desc("age")]);
}
