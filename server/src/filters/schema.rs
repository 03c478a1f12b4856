//! Filter and sorting definitions derived from a record's JSON schema

use schemars::JsonSchema;
use serde_json::{Map, Value};

use super::alias::FiltersConfig;
use super::compiler::{FilterSet, ParamLocation, create_filters};
use super::error::FilterError;
use super::field::FilterField;
use super::sorting::{SortField, SortOptions, SortingSet, create_sorting};
use super::types::FieldType;

/// Include/exclude selection plus per-field overrides
#[derive(Debug, Clone)]
pub struct SchemaOptions<O> {
    pub include: Option<Vec<String>>,
    pub exclude: Vec<String>,
    /// Replace the derived definition of a field, or add a new one
    pub overrides: Vec<(String, O)>,
}

impl<O> Default for SchemaOptions<O> {
    fn default() -> Self {
        Self {
            include: None,
            exclude: Vec::new(),
            overrides: Vec::new(),
        }
    }
}

impl<O> SchemaOptions<O> {
    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_override(mut self, name: impl Into<String>, value: O) -> Self {
        self.overrides.push((name.into(), value));
        self
    }

    /// Kept iff not excluded and, when an include list is given, included
    pub fn allows(&self, name: &str) -> bool {
        if self.exclude.iter().any(|n| n == name) {
            return false;
        }
        match &self.include {
            Some(include) => include.iter().any(|n| n == name),
            None => true,
        }
    }

    /// Apply overrides to derived `(name, value)` entries
    fn apply_overrides(self, mut derived: Vec<(String, O)>) -> Vec<(String, O)> {
        for (name, value) in self.overrides {
            match derived.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = value,
                None => derived.push((name, value)),
            }
        }
        derived
    }
}

/// One property read from a record schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
    pub nullable: bool,
}

/// Read the filterable properties of `T`, in declaration order.
/// Nested objects and properties of unsupported shape are skipped.
pub fn schema_fields<T: JsonSchema>() -> Vec<SchemaField> {
    let schema = schemars::schema_for!(T);
    let root = schema.as_value();

    let Some(properties) = root.get("properties").and_then(Value::as_object) else {
        tracing::warn!(schema = %T::schema_name(), "Record schema has no properties");
        return Vec::new();
    };

    properties
        .iter()
        .filter_map(|(name, property)| match read_type(root, property) {
            Some((field_type, nullable)) => Some(SchemaField {
                name: name.clone(),
                field_type,
                nullable,
            }),
            None => {
                tracing::warn!(
                    schema = %T::schema_name(),
                    property = %name,
                    "Skipping property with unsupported schema"
                );
                None
            }
        })
        .collect()
}

/// Follow a local `$ref` into `$defs` (or legacy `definitions`)
fn deref<'a>(root: &'a Value, schema: &'a Value) -> &'a Value {
    let Some(reference) = schema.get("$ref").and_then(Value::as_str) else {
        return schema;
    };
    let target = reference
        .strip_prefix('#')
        .and_then(|pointer| root.pointer(pointer));
    match target {
        Some(target) => deref(root, target),
        None => schema,
    }
}

fn is_null_schema(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("null")
}

/// `(type, nullable)` for one property schema
fn read_type(root: &Value, schema: &Value) -> Option<(FieldType, bool)> {
    let schema = deref(root, schema);
    let obj = schema.as_object()?;

    for key in ["anyOf", "oneOf"] {
        if let Some(variants) = obj.get(key).and_then(Value::as_array) {
            if let Some(values) = const_literals(variants) {
                return Some((FieldType::Enum(values), false));
            }
            let nullable = variants.iter().any(is_null_schema);
            let mut concrete = variants.iter().filter(|v| !is_null_schema(v));
            let first = concrete.next()?;
            if concrete.next().is_some() {
                return None;
            }
            let (field_type, inner_nullable) = read_type(root, first)?;
            return Some((field_type, nullable || inner_nullable));
        }
    }

    if let Some(values) = obj.get("enum").and_then(Value::as_array) {
        let literals: Vec<String> = values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        let nullable = values.iter().any(Value::is_null);
        return Some((FieldType::Enum(literals), nullable));
    }

    let (type_name, nullable) = match obj.get("type")? {
        Value::String(t) => (t.as_str(), false),
        Value::Array(types) => {
            let nullable = types.iter().any(|t| t.as_str() == Some("null"));
            let mut concrete = types.iter().filter_map(Value::as_str).filter(|t| *t != "null");
            let first = concrete.next()?;
            if concrete.next().is_some() {
                return None;
            }
            (first, nullable)
        }
        _ => return None,
    };

    let field_type = scalar_type(root, obj, type_name)?;
    Some((field_type, nullable))
}

fn scalar_type(root: &Value, obj: &Map<String, Value>, type_name: &str) -> Option<FieldType> {
    match type_name {
        "string" => Some(match obj.get("format").and_then(Value::as_str) {
            Some("date-time") => FieldType::DateTime,
            Some("date") => FieldType::Date,
            Some("uuid") => FieldType::Uuid,
            _ => FieldType::String,
        }),
        "integer" => Some(FieldType::Integer),
        "number" => Some(FieldType::Float),
        "boolean" => Some(FieldType::Boolean),
        "array" => {
            let items = obj.get("items")?;
            let (item, _) = read_type(root, items)?;
            if item.is_seq() {
                return None;
            }
            Some(FieldType::seq(item))
        }
        _ => None,
    }
}

/// `oneOf: [{const: "a"}, {const: "b"}]`, emitted for documented enum variants
fn const_literals(variants: &[Value]) -> Option<Vec<String>> {
    if variants.is_empty() {
        return None;
    }
    variants
        .iter()
        .map(|v| v.get("const").and_then(Value::as_str).map(str::to_string))
        .collect()
}

/// Compile filters for every selected property of `T`
pub fn create_filters_from_schema<T: JsonSchema>(
    options: SchemaOptions<FilterField>,
    config: &FiltersConfig,
    location: ParamLocation,
) -> Result<FilterSet, FilterError> {
    let derived: Vec<(String, FilterField)> = schema_fields::<T>()
        .into_iter()
        .filter(|f| options.allows(&f.name))
        .map(|f| {
            let field = FilterField::new(f.field_type).with_nullable(f.nullable);
            (f.name, field)
        })
        .collect();

    create_filters(options.apply_overrides(derived), config, location)
}

/// Compile sorting for every selected scalar property of `T`
pub fn create_sorting_from_schema<T: JsonSchema>(
    options: SchemaOptions<SortField>,
    sort: SortOptions,
) -> Result<SortingSet, FilterError> {
    let derived: Vec<(String, SortField)> = schema_fields::<T>()
        .into_iter()
        .filter(|f| !f.field_type.is_seq() && options.allows(&f.name))
        .map(|f| {
            let field = SortField::new(f.name.clone());
            (f.name, field)
        })
        .collect();

    let fields = options
        .apply_overrides(derived)
        .into_iter()
        .map(|(_, field)| field);
    create_sorting(fields, sort)
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
