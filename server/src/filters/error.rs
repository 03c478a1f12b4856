//! Filter and sorting error types

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Construction-time failures. Raised while compiling a filter or sorting
/// specification, never while handling a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Filter field name cannot be empty")]
    EmptyFieldName,

    #[error("Duplicate filter field: {0}")]
    DuplicateField(String),

    #[error("Duplicate parameter '{name}' generated for {first} and {second}")]
    DuplicateParameter {
        name: String,
        first: String,
        second: String,
    },

    #[error("Duplicate sort field: {0}")]
    DuplicateSortField(String),

    #[error("Default sort field {field} is not in {allowed}")]
    InvalidDefaultSort { field: String, allowed: String },
}

/// One request-time validation failure, located by parameter name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub loc: String,
    pub message: String,
}

/// All validation failures for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn single(loc: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(loc, message);
        errors
    }

    pub fn push(&mut self, loc: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            loc: loc.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.loc, issue.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
