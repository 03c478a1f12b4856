//! Declared and adapted parameter types, resolved values, and the type adapter

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::field::FilterField;
use super::operator::Operator;

/// Value type of a filterable field or of a generated parameter.
///
/// `Seq` is a native sequence as declared on a record. `CsvList` is the
/// list encoding a parameter accepts on the wire (`a=1,2` or `a=1&a=2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Uuid,
    /// String restricted to a fixed set of literals
    Enum(Vec<String>),
    Seq(Box<FieldType>),
    CsvList(Box<FieldType>),
}

impl FieldType {
    pub fn seq(item: FieldType) -> Self {
        Self::Seq(Box::new(item))
    }

    pub fn csv(item: FieldType) -> Self {
        Self::CsvList(Box::new(item))
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    /// Element type for sequence-valued types
    pub fn element(&self) -> Option<&FieldType> {
        match self {
            Self::Seq(item) | Self::CsvList(item) => Some(item),
            _ => None,
        }
    }

    pub fn is_seq(&self) -> bool {
        self.element().is_some()
    }

    pub fn is_list_encoded(&self) -> bool {
        matches!(self, Self::CsvList(_))
    }

    /// Coerce a raw input value into a typed filter value.
    ///
    /// Query strings arrive as JSON strings (or arrays of them for list
    /// parameters); already-typed JSON scalars are accepted as well.
    pub fn coerce(&self, raw: &Value) -> Result<FilterValue, String> {
        match self {
            Self::Seq(item) | Self::CsvList(item) => {
                let Value::Array(items) = raw else {
                    return Err("Input should be a valid list".to_string());
                };
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| item.coerce(v).map_err(|e| format!("[{}] {}", i, e)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(FilterValue::List)
            }
            _ => match raw {
                Value::String(s) => self.coerce_str(s),
                Value::Number(n) => self.coerce_str(&n.to_string()),
                Value::Bool(b) => self.coerce_str(if *b { "true" } else { "false" }),
                _ => Err(format!("Input should be a valid {}", self)),
            },
        }
    }

    fn coerce_str(&self, s: &str) -> Result<FilterValue, String> {
        match self {
            Self::String => Ok(FilterValue::String(s.to_string())),
            Self::Integer => s
                .parse::<i64>()
                .map(FilterValue::Integer)
                .map_err(|_| "Input should be a valid integer".to_string()),
            Self::Float => s
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(FilterValue::Float)
                .ok_or_else(|| "Input should be a valid number".to_string()),
            Self::Boolean => parse_bool(s)
                .map(FilterValue::Boolean)
                .ok_or_else(|| "Input should be a valid boolean".to_string()),
            Self::Date => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(FilterValue::Date)
                .map_err(|_| "Input should be a valid date in YYYY-MM-DD format".to_string()),
            Self::DateTime => DateTime::parse_from_rfc3339(s)
                .map(|dt| FilterValue::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| "Input should be a valid RFC 3339 datetime".to_string()),
            Self::Uuid => Uuid::parse_str(s)
                .map(FilterValue::Uuid)
                .map_err(|_| "Input should be a valid UUID".to_string()),
            Self::Enum(allowed) => {
                if allowed.iter().any(|a| a == s) {
                    Ok(FilterValue::String(s.to_string()))
                } else {
                    Err(format!("Input should be {}", describe_literals(allowed)))
                }
            }
            Self::Seq(_) | Self::CsvList(_) => Err("Input should be a valid list".to_string()),
        }
    }

    /// OpenAPI schema fragment. Both sequence forms are plain arrays.
    pub fn json_schema(&self) -> Value {
        match self {
            Self::String => json!({ "type": "string" }),
            Self::Integer => json!({ "type": "integer" }),
            Self::Float => json!({ "type": "number" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Date => json!({ "type": "string", "format": "date" }),
            Self::DateTime => json!({ "type": "string", "format": "date-time" }),
            Self::Uuid => json!({ "type": "string", "format": "uuid" }),
            Self::Enum(values) => json!({ "type": "string", "enum": values }),
            Self::Seq(item) | Self::CsvList(item) => {
                json!({ "type": "array", "items": item.json_schema() })
            }
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Date => write!(f, "date"),
            Self::DateTime => write!(f, "datetime"),
            Self::Uuid => write!(f, "uuid"),
            Self::Enum(_) => write!(f, "enum"),
            Self::Seq(item) => write!(f, "list[{}]", item),
            Self::CsvList(item) => write!(f, "csv[{}]", item),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" | "on" => Some(true),
        "false" | "f" | "0" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn describe_literals(allowed: &[String]) -> String {
    let quoted: Vec<String> = allowed.iter().map(|a| format!("'{}'", a)).collect();
    match quoted.split_last() {
        None => "one of no allowed values".to_string(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// Resolve the type a single generated parameter validates as.
///
/// First match wins:
/// 1. explicit per-operator override on the field
/// 2. sequence-valued declared type: list encoding of its element type
/// 3. pattern operators: string
/// 4. null check: boolean
/// 5. membership: list encoding of the declared type
/// 6. the declared type unchanged
pub fn adapt_type(field: &FilterField, declared: &FieldType, op: Operator) -> FieldType {
    if let Some(tp) = field.op_type(op) {
        return tp.clone();
    }

    if let Some(item) = declared.element() {
        return FieldType::csv(item.clone());
    }

    if op.is_pattern() {
        return FieldType::String;
    }

    if op.is_null_check() {
        return FieldType::Boolean;
    }

    if op.is_membership() {
        return FieldType::csv(declared.clone());
    }

    declared.clone()
}

/// A validated filter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Uuid(Uuid),
    List(Vec<FilterValue>),
}

impl FilterValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FilterValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}
