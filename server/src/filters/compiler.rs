//! Filter specification compiler
//!
//! Expands `field -> FilterField` definitions into a flat, ordered list of
//! uniquely named parameters. The resulting [`FilterSet`] is the schema the
//! HTTP layer binds requests against; it is built once per resource and is
//! read-only afterwards.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::alias::FiltersConfig;
use super::error::FilterError;
use super::field::FilterField;
use super::operator::Operator;
use super::types::{FieldType, adapt_type};

/// Where generated parameters are read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    #[default]
    Query,
    Header,
}

impl ParamLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Header => "header",
        }
    }

    /// Canonical form of a parameter name. Header names are case-insensitive
    /// and arrive lowercased from `http`.
    pub(crate) fn canonical_name(self, name: &str) -> Cow<'_, str> {
        match self {
            Self::Query => Cow::Borrowed(name),
            Self::Header => Cow::Owned(name.to_ascii_lowercase()),
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated parameter
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParam {
    /// Internal attribute name, unique within the set
    pub key: String,
    /// Caller-facing name
    pub alias: String,
    /// Owning logical field
    pub field: String,
    pub op: Operator,
    pub param_type: FieldType,
    pub location: ParamLocation,
}

impl FilterParam {
    /// List encodings are documented as comma-joined, not repeated keys
    pub fn explode(&self) -> bool {
        !self.param_type.is_list_encoded()
    }

    fn owner(&self) -> String {
        format!("{}[{}]", self.field, self.op)
    }
}

/// Compiled filter specification
#[derive(Debug, Clone)]
pub struct FilterSet {
    pub(crate) params: Vec<FilterParam>,
    pub(crate) defs: BTreeMap<String, (String, Operator)>,
    pub(crate) fields: Vec<(String, FilterField)>,
    pub(crate) location: ParamLocation,
}

impl FilterSet {
    pub fn params(&self) -> &[FilterParam] {
        &self.params
    }

    /// Internal key -> (logical field, operator)
    pub fn defs(&self) -> &BTreeMap<String, (String, Operator)> {
        &self.defs
    }

    pub fn fields(&self) -> &[(String, FilterField)] {
        &self.fields
    }

    pub fn location(&self) -> ParamLocation {
        self.location
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn param_by_alias(&self, alias: &str) -> Option<&FilterParam> {
        self.params.iter().find(|p| p.alias == alias)
    }
}

/// Internal key for a generated parameter
fn param_key(name: &str, op: Operator) -> String {
    format!("{}__{}", name, op.name())
}

/// `(key, operator, alias)` for every parameter a field generates
fn raw_params(name: &str, field: &FilterField, config: &FiltersConfig) -> Vec<(String, Operator, String)> {
    let base_alias = field.alias().unwrap_or(name).to_string();
    let mut raw = vec![(name.to_string(), field.default_op(), base_alias)];

    for op in field.additional_operators() {
        raw.push((param_key(name, op), op, config.alias(name, op, field.alias())));
    }

    raw
}

/// Compile field definitions into a [`FilterSet`].
///
/// Each field yields one parameter for its default operator (bare name or
/// alias) plus one per additional operator. Fails when two parameters would
/// share a name.
pub fn create_filters<I, N, F>(
    fields: I,
    config: &FiltersConfig,
    location: ParamLocation,
) -> Result<FilterSet, FilterError>
where
    I: IntoIterator<Item = (N, F)>,
    N: Into<String>,
    F: Into<FilterField>,
{
    let mut seen_fields = HashSet::new();
    let mut compiled_fields = Vec::new();
    let mut params: Vec<FilterParam> = Vec::new();
    let mut by_alias: HashMap<String, usize> = HashMap::new();
    let mut defs = BTreeMap::new();

    for (name, field) in fields {
        let name: String = name.into();
        let field: FilterField = field.into();

        if name.is_empty() {
            return Err(FilterError::EmptyFieldName);
        }
        if !seen_fields.insert(name.clone()) {
            return Err(FilterError::DuplicateField(name));
        }

        for (key, op, alias) in raw_params(&name, &field, config) {
            let param = FilterParam {
                param_type: adapt_type(&field, field.field_type(), op),
                key,
                alias,
                field: name.clone(),
                op,
                location,
            };

            if let Some(&existing) = by_alias.get(&param.alias) {
                return Err(FilterError::DuplicateParameter {
                    name: param.alias.clone(),
                    first: params[existing].owner(),
                    second: param.owner(),
                });
            }
            if let Some((other_field, other_op)) = defs.get(&param.key) {
                return Err(FilterError::DuplicateParameter {
                    name: param.key.clone(),
                    first: format!("{}[{}]", other_field, other_op),
                    second: param.owner(),
                });
            }

            tracing::trace!(
                field = %param.field,
                op = %param.op,
                alias = %param.alias,
                param_type = %param.param_type,
                "Generated filter parameter"
            );

            by_alias.insert(param.alias.clone(), params.len());
            defs.insert(param.key.clone(), (name.clone(), op));
            params.push(param);
        }

        compiled_fields.push((name, field));
    }

    tracing::debug!(
        fields = compiled_fields.len(),
        params = params.len(),
        location = %location,
        "Compiled filter specification"
    );

    Ok(FilterSet {
        params,
        defs,
        fields: compiled_fields,
        location,
    })
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
