//! Parameter bag and request binding

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;

use super::compiler::{FilterParam, FilterSet};
use super::csv::normalize_csv;
use super::error::ValidationErrors;
use super::types::{FieldType, FilterValue};

/// One optional slot per generated parameter, in [`FilterSet::params`] order.
/// A slot stays `None` unless the caller supplied the parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBag {
    values: Vec<Option<FilterValue>>,
}

impl FilterBag {
    /// Empty bag shaped for `set`
    pub fn empty(set: &FilterSet) -> Self {
        Self {
            values: vec![None; set.len()],
        }
    }

    pub fn get(&self, index: usize) -> Option<&FilterValue> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Populate the slot for `alias`. Returns false for unknown aliases.
    pub fn set(&mut self, set: &FilterSet, alias: &str, value: FilterValue) -> bool {
        match set.params().iter().position(|p| p.alias == alias) {
            Some(index) if index < self.values.len() => {
                self.values[index] = Some(value);
                true
            }
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub(crate) fn into_slots(self) -> Vec<Option<FilterValue>> {
        self.values
    }
}

/// Shape the raw occurrences of one parameter for coercion
fn raw_input(param: &FilterParam, occurrences: &[&str]) -> Value {
    match &param.param_type {
        FieldType::CsvList(_) => match occurrences {
            [single] => normalize_csv(Value::String((*single).to_string())),
            many => normalize_csv(Value::Array(
                many.iter().map(|s| Value::String((*s).to_string())).collect(),
            )),
        },
        FieldType::Seq(_) => Value::Array(
            occurrences
                .iter()
                .map(|s| Value::String((*s).to_string()))
                .collect(),
        ),
        _ => occurrences
            .last()
            .map(|s| Value::String((*s).to_string()))
            .unwrap_or(Value::Null),
    }
}

impl FilterSet {
    /// Bind raw `(name, value)` pairs to a [`FilterBag`].
    ///
    /// Every coercion failure is collected so the caller sees all of them at
    /// once. Names that match no generated parameter are ignored.
    pub fn bind(&self, pairs: &[(String, String)]) -> Result<FilterBag, ValidationErrors> {
        let mut grouped: HashMap<Cow<'_, str>, Vec<&str>> = HashMap::new();
        for (name, value) in pairs {
            grouped
                .entry(self.location.canonical_name(name))
                .or_default()
                .push(value.as_str());
        }

        let mut bag = FilterBag::empty(self);
        let mut errors = ValidationErrors::default();

        for (index, param) in self.params.iter().enumerate() {
            let alias = self.location.canonical_name(&param.alias);
            let Some(occurrences) = grouped.get(&*alias) else {
                continue;
            };

            let raw = raw_input(param, occurrences);
            match param.param_type.coerce(&raw) {
                Ok(value) => bag.values[index] = Some(value),
                Err(message) => {
                    tracing::debug!(param = %param.alias, error = %message, "Rejected filter value");
                    errors.push(param.alias.clone(), message);
                }
            }
        }

        if errors.is_empty() {
            Ok(bag)
        } else {
            Err(errors)
        }
    }
}
