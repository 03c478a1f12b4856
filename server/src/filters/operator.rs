//! Filter operator registry
//!
//! Every operator has a canonical tag (`in_`), a public name with trailing
//! underscores stripped (`in`), and a Django-style lookup suffix used when
//! building caller-facing parameter names (`__in`).

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use super::types::FieldType;

/// Comparison, pattern, membership and existence operators.
///
/// Ordering follows declaration order, which is the order operators appear
/// in resolved filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    NotLike,
    Ilike,
    NotIlike,
    In,
    NotIn,
    IsNull,
    Overlap,
    NotOverlap,
    Contains,
    NotContains,
}

impl Operator {
    pub const ALL: [Operator; 17] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Ge,
        Operator::Lt,
        Operator::Le,
        Operator::Like,
        Operator::NotLike,
        Operator::Ilike,
        Operator::NotIlike,
        Operator::In,
        Operator::NotIn,
        Operator::IsNull,
        Operator::Overlap,
        Operator::NotOverlap,
        Operator::Contains,
        Operator::NotContains,
    ];

    /// Canonical tag
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Like => "like",
            Self::NotLike => "not_like",
            Self::Ilike => "ilike",
            Self::NotIlike => "not_ilike",
            Self::In => "in_",
            Self::NotIn => "not_in",
            Self::IsNull => "is_null",
            Self::Overlap => "overlap",
            Self::NotOverlap => "not_overlap",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
        }
    }

    /// Public name (tag without trailing underscores)
    pub fn name(&self) -> &'static str {
        self.tag().trim_end_matches('_')
    }

    /// Django-style lookup suffix. Empty for exact match.
    pub fn lookup_suffix(&self) -> &'static str {
        match self {
            Self::Eq => "",
            Self::Ne => "__ne",
            Self::Gt => "__gt",
            Self::Ge => "__gte",
            Self::Lt => "__lt",
            Self::Le => "__lte",
            Self::Like => "__contains",
            Self::NotLike => "__not_like",
            Self::Ilike => "__icontains",
            Self::NotIlike => "__not_ilike",
            Self::In => "__in",
            Self::NotIn => "__not_in",
            Self::IsNull => "__isnull",
            Self::Overlap => "__overlap",
            Self::NotOverlap => "__not_overlap",
            Self::Contains => "__contains",
            Self::NotContains => "__not_contains",
        }
    }

    /// Suffix derived from the operator name alone (`__ge`, `__in`)
    pub fn fallback_suffix(&self) -> String {
        format!("__{}", self.name())
    }

    /// `like`, `not_like`, `ilike`, `not_ilike`
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            Self::Like | Self::NotLike | Self::Ilike | Self::NotIlike
        )
    }

    /// `in`, `not_in`
    pub fn is_membership(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    pub fn is_null_check(&self) -> bool {
        matches!(self, Self::IsNull)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s || op.tag() == s)
            .ok_or_else(|| format!("Unknown filter operator '{}'", s))
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Operators enabled for a field when its definition does not list any.
///
/// The default (bare-name) operator is added separately by the field
/// definition and is not part of this set.
pub fn default_operators(field_type: &FieldType, nullable: bool) -> Vec<Operator> {
    let mut ops = match field_type {
        FieldType::Integer | FieldType::Float | FieldType::Date | FieldType::DateTime => vec![
            Operator::Ne,
            Operator::Gt,
            Operator::Ge,
            Operator::Lt,
            Operator::Le,
            Operator::In,
            Operator::NotIn,
        ],
        FieldType::String | FieldType::Uuid => vec![
            Operator::Ne,
            Operator::Like,
            Operator::NotLike,
            Operator::Ilike,
            Operator::NotIlike,
            Operator::In,
            Operator::NotIn,
        ],
        FieldType::Boolean => vec![Operator::Ne],
        FieldType::Enum(_) => vec![Operator::Ne, Operator::In, Operator::NotIn],
        FieldType::Seq(_) | FieldType::CsvList(_) => vec![
            Operator::Overlap,
            Operator::NotOverlap,
            Operator::Contains,
            Operator::NotContains,
        ],
    };

    if nullable {
        ops.push(Operator::IsNull);
    }

    ops
}
