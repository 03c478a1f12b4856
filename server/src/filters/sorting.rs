//! Sorting specification compiler and resolver
//!
//! Every sortable field contributes two tokens, `+field` and `-field`, to a
//! single shared list-encoded parameter (`sort=+name,-age`). Resolution keeps
//! the caller's order.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::compiler::ParamLocation;
use super::csv::normalize_csv;
use super::error::{FilterError, ValidationErrors};
use super::types::describe_literals;

/// Default name of the shared sort parameter
pub const DEFAULT_SORT_PARAM: &str = "sort";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn marker(&self) -> char {
        match self {
            Self::Asc => '+',
            Self::Desc => '-',
        }
    }
}

/// Where null values sort relative to non-null ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortNulls {
    Bigger,
    Smaller,
}

/// `(field, direction, nulls)`, serialized as a 3-element array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortValue(pub String, pub SortDirection, pub Option<SortNulls>);

impl SortValue {
    pub fn field(&self) -> &str {
        &self.0
    }

    pub fn direction(&self) -> SortDirection {
        self.1
    }

    pub fn nulls(&self) -> Option<SortNulls> {
        self.2
    }
}

pub type SortingValues = Vec<SortValue>;

/// One sortable field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    name: String,
    alias: Option<String>,
    nulls: Option<SortNulls>,
}

impl SortField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            nulls: None,
        }
    }

    /// Caller-facing token name
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn nulls(mut self, nulls: SortNulls) -> Self {
        self.nulls = Some(nulls);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn public_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl From<&str> for SortField {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SortField {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOptions {
    /// Tokens applied when the caller omits the parameter
    pub default: Vec<String>,
    pub param: String,
    pub location: ParamLocation,
}

impl SortOptions {
    pub fn with_default<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    pub fn with_location(mut self, location: ParamLocation) -> Self {
        self.location = location;
        self
    }
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            default: Vec::new(),
            param: DEFAULT_SORT_PARAM.to_string(),
            location: ParamLocation::Query,
        }
    }
}

/// Compiled sorting specification
#[derive(Debug, Clone)]
pub struct SortingSet {
    fields: Vec<SortField>,
    tokens: Vec<String>,
    defs: BTreeMap<String, SortValue>,
    default: SortingValues,
    default_tokens: Vec<String>,
    param: String,
    location: ParamLocation,
}

/// Canonical form of a token: bare and space-prefixed names are ascending.
/// A `+` decoded from a form-encoded query string arrives as a space.
fn canonical_token(token: &str) -> String {
    match token.chars().next() {
        Some('+') | Some('-') => token.to_string(),
        Some(' ') => format!("+{}", &token[1..]),
        _ => format!("+{}", token),
    }
}

/// Compile sortable fields into a [`SortingSet`]
pub fn create_sorting<I, F>(fields: I, options: SortOptions) -> Result<SortingSet, FilterError>
where
    I: IntoIterator<Item = F>,
    F: Into<SortField>,
{
    let mut seen = HashSet::new();
    let mut compiled = Vec::new();
    let mut tokens = Vec::new();
    let mut defs = BTreeMap::new();

    for field in fields {
        let field: SortField = field.into();
        if field.name.is_empty() {
            return Err(FilterError::EmptyFieldName);
        }
        if !seen.insert(field.name.clone()) {
            return Err(FilterError::DuplicateSortField(field.name));
        }

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let token = format!("{}{}", direction.marker(), field.public_name());
            let value = SortValue(field.name.clone(), direction, field.nulls);
            if defs.insert(token.clone(), value).is_some() {
                return Err(FilterError::DuplicateSortField(field.public_name().to_string()));
            }
            tokens.push(token);
        }

        compiled.push(field);
    }

    let mut default = Vec::with_capacity(options.default.len());
    let mut default_tokens = Vec::with_capacity(options.default.len());
    for raw in &options.default {
        let token = canonical_token(raw);
        match defs.get(&token) {
            Some(value) => {
                default.push(value.clone());
                default_tokens.push(token);
            }
            None => {
                let allowed: Vec<&str> = defs.keys().map(String::as_str).collect();
                return Err(FilterError::InvalidDefaultSort {
                    field: raw.clone(),
                    allowed: allowed.join(", "),
                });
            }
        }
    }

    tracing::debug!(
        fields = compiled.len(),
        param = %options.param,
        default = ?options.default,
        "Compiled sorting specification"
    );

    Ok(SortingSet {
        fields: compiled,
        tokens,
        defs,
        default,
        default_tokens,
        param: options.param,
        location: options.location,
    })
}

impl SortingSet {
    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    /// Accepted tokens in declaration order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn defs(&self) -> &BTreeMap<String, SortValue> {
        &self.defs
    }

    pub fn default_values(&self) -> &[SortValue] {
        &self.default
    }

    /// Default ordering in canonical `+field`/`-field` form
    pub fn default_tokens(&self) -> &[String] {
        &self.default_tokens
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn location(&self) -> ParamLocation {
        self.location
    }

    /// Resolve a raw parameter value. `None` yields the default ordering.
    ///
    /// Empty segments are skipped, so an explicit empty parameter means
    /// "no ordering" rather than the default.
    pub fn resolve(&self, raw: Option<Value>) -> Result<SortingValues, ValidationErrors> {
        let Some(raw) = raw else {
            return Ok(self.default.clone());
        };

        let Value::Array(items) = normalize_csv(raw) else {
            return Err(ValidationErrors::single(
                self.param.clone(),
                "Input should be a valid list",
            ));
        };

        let mut values = Vec::with_capacity(items.len());
        let mut errors = ValidationErrors::default();

        for (i, item) in items.iter().enumerate() {
            let Some(token) = item.as_str() else {
                errors.push(self.param.clone(), format!("[{}] Input should be a valid string", i));
                continue;
            };
            if token.is_empty() {
                continue;
            }
            match self.defs.get(&canonical_token(token)) {
                Some(value) => values.push(value.clone()),
                None => errors.push(
                    self.param.clone(),
                    format!("[{}] Input should be {}", i, describe_literals(&self.tokens)),
                ),
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            tracing::debug!(param = %self.param, error = %errors, "Rejected sort value");
            Err(errors)
        }
    }

    /// Resolve from raw `(name, value)` pairs, picking out the sort parameter
    pub fn extract(&self, pairs: &[(String, String)]) -> Result<SortingValues, ValidationErrors> {
        let param = self.location.canonical_name(&self.param);
        let occurrences: Vec<Value> = pairs
            .iter()
            .filter(|(name, _)| self.location.canonical_name(name) == param)
            .map(|(_, value)| Value::String(value.clone()))
            .collect();

        let raw = match occurrences.len() {
            0 => None,
            1 => occurrences.into_iter().next(),
            _ => Some(Value::Array(occurrences)),
        };

        self.resolve(raw)
    }
}

#[cfg(test)]
#[path = "sorting_tests.rs"]
mod tests;
