//! OpenAPI parameter fragments and the `explode` post-processor

use serde_json::{Value, json};

use super::compiler::FilterSet;
use super::sorting::SortingSet;

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

impl FilterSet {
    /// One OpenAPI parameter object per generated parameter
    pub fn openapi_parameters(&self) -> Vec<Value> {
        self.params()
            .iter()
            .map(|param| {
                let mut schema = param.param_type.json_schema();
                if !param.explode() {
                    schema["explode"] = json!(false);
                }
                json!({
                    "name": param.alias,
                    "in": param.location.as_str(),
                    "required": false,
                    "description": format!("Filter `{}` by `{}`", param.field, param.op),
                    "schema": schema,
                })
            })
            .collect()
    }
}

impl SortingSet {
    /// The shared sort parameter as an OpenAPI parameter object
    pub fn openapi_parameter(&self) -> Value {
        let mut schema = json!({
            "type": "array",
            "items": { "type": "string", "enum": self.tokens() },
            "explode": false,
        });
        if !self.default_tokens().is_empty() {
            schema["default"] = json!(self.default_tokens());
        }

        json!({
            "name": self.param(),
            "in": self.location().as_str(),
            "required": false,
            "description": "Comma-separated sort fields, `+field` ascending or `-field` descending",
            "schema": schema,
        })
    }
}

/// Move `explode` from each parameter's schema onto the parameter itself.
///
/// Schema generators only let a type carry extra keys, while OpenAPI reads
/// `explode` from the parameter object.
pub fn fix_explode(doc: &mut Value) {
    let Some(paths) = doc.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };

    for item in paths.values_mut() {
        let Some(item) = item.as_object_mut() else {
            continue;
        };
        for (method, operation) in item.iter_mut() {
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }
            let Some(params) = operation
                .get_mut("parameters")
                .and_then(Value::as_array_mut)
            else {
                continue;
            };
            for param in params {
                let explode = param
                    .get_mut("schema")
                    .and_then(Value::as_object_mut)
                    .and_then(|schema| schema.remove("explode"));
                if let (Some(explode), Some(param)) = (explode, param.as_object_mut()) {
                    param.insert("explode".to_string(), explode);
                }
            }
        }
    }
}

/// Escape a path for use as a JSON pointer segment
fn pointer_segment(path: &str) -> String {
    path.replace('~', "~0").replace('/', "~1")
}

/// Append generated parameters to an existing operation.
///
/// Parameters whose name the operation already declares are left alone.
/// Returns false when the operation does not exist.
pub fn attach_parameters(doc: &mut Value, path: &str, method: &str, params: Vec<Value>) -> bool {
    let pointer = format!("/paths/{}/{}", pointer_segment(path), method);
    let Some(operation) = doc.pointer_mut(&pointer).and_then(Value::as_object_mut) else {
        return false;
    };

    let existing = operation
        .entry("parameters")
        .or_insert_with(|| Value::Array(Vec::new()));
    let Some(existing) = existing.as_array_mut() else {
        return false;
    };

    for param in params {
        let name = param.get("name").cloned();
        let declared = existing.iter().any(|p| p.get("name") == name.as_ref());
        if !declared {
            existing.push(param);
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::alias::FiltersConfig;
    use crate::filters::compiler::{ParamLocation, create_filters};
    use crate::filters::field::FilterField;
    use crate::filters::operator::Operator;
    use crate::filters::sorting::{SortField, SortOptions, create_sorting};
    use crate::filters::types::FieldType;

    fn age_set() -> FilterSet {
        create_filters(
            vec![(
                "age",
                FilterField::new(FieldType::Integer).with_operators([Operator::Gt, Operator::In]),
            )],
            &FiltersConfig::default(),
            ParamLocation::Query,
        )
        .unwrap()
    }

    fn doc_with(params: Vec<Value>) -> Value {
        json!({
            "openapi": "3.1.0",
            "paths": {
                "/api/v1/users": {
                    "get": { "parameters": params },
                    "summary": "not an operation"
                }
            }
        })
    }

    #[test]
    fn test_filter_parameters() {
        let params = age_set().openapi_parameters();
        assert_eq!(params.len(), 3);
        assert_eq!(params[0]["name"], "age");
        assert_eq!(params[0]["in"], "query");
        assert_eq!(params[0]["schema"], json!({ "type": "integer" }));
        assert_eq!(params[2]["name"], "age__in");
        assert_eq!(params[2]["schema"]["explode"], json!(false));
        assert!(params[1]["schema"].get("explode").is_none());
    }

    #[test]
    fn test_seq_parameter_is_exploded() {
        let set = create_filters(
            vec![(
                "tags",
                FilterField::new(FieldType::String)
                    .with_operators([])
                    .with_op_type(Operator::Eq, FieldType::seq(FieldType::String)),
            )],
            &FiltersConfig::default(),
            ParamLocation::Query,
        )
        .unwrap();

        let params = set.openapi_parameters();
        assert_eq!(params[0]["schema"]["type"], "array");
        assert!(params[0]["schema"].get("explode").is_none());
    }

    #[test]
    fn test_sorting_parameter() {
        let set = create_sorting(
            [SortField::new("name"), SortField::new("created_at").alias("created")],
            SortOptions::default().with_default(["-created"]),
        )
        .unwrap();
        let param = set.openapi_parameter();

        assert_eq!(param["name"], "sort");
        assert_eq!(
            param["schema"]["items"]["enum"],
            json!(["+name", "-name", "+created", "-created"])
        );
        assert_eq!(param["schema"]["default"], json!(["-created"]));
        assert_eq!(param["schema"]["explode"], json!(false));
    }

    #[test]
    fn test_fix_explode_moves_marker_to_parameter() {
        let mut doc = doc_with(age_set().openapi_parameters());
        fix_explode(&mut doc);

        let params = &doc["paths"]["/api/v1/users"]["get"]["parameters"];
        assert_eq!(params[2]["explode"], json!(false));
        assert!(params[2]["schema"].get("explode").is_none());
        assert!(params[0].get("explode").is_none());
    }

    #[test]
    fn test_fix_explode_without_paths_is_noop() {
        let mut doc = json!({ "openapi": "3.1.0" });
        fix_explode(&mut doc);
        assert_eq!(doc, json!({ "openapi": "3.1.0" }));
    }

    #[test]
    fn test_attach_parameters_skips_declared_names() {
        let mut doc = doc_with(vec![json!({ "name": "age", "in": "query" })]);
        assert!(attach_parameters(
            &mut doc,
            "/api/v1/users",
            "get",
            age_set().openapi_parameters()
        ));

        let params = doc["paths"]["/api/v1/users"]["get"]["parameters"]
            .as_array()
            .unwrap();
        let names: Vec<&str> = params.iter().filter_map(|p| p["name"].as_str()).collect();
        assert_eq!(names, vec!["age", "age__gt", "age__in"]);
        assert!(params[0].get("schema").is_none());
    }

    #[test]
    fn test_attach_parameters_missing_operation() {
        let mut doc = doc_with(vec![]);
        assert!(!attach_parameters(&mut doc, "/api/v1/users", "post", vec![]));
        assert!(!attach_parameters(&mut doc, "/missing", "get", vec![]));
    }
}
