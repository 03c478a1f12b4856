//! Filter field definitions

use std::collections::BTreeMap;

use super::operator::{Operator, default_operators};
use super::types::FieldType;

/// Declarative description of one filterable field.
///
/// The default operator is bound to the bare field name (or alias). Every
/// additional operator gets its own generated parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterField {
    field_type: FieldType,
    default_op: Operator,
    operators: Option<Vec<Operator>>,
    alias: Option<String>,
    op_types: BTreeMap<Operator, FieldType>,
    nullable: bool,
}

impl FilterField {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            default_op: Operator::Eq,
            operators: None,
            alias: None,
            op_types: BTreeMap::new(),
            nullable: false,
        }
    }

    /// Operator applied when the caller sends the bare name
    pub fn with_default_op(mut self, op: Operator) -> Self {
        self.default_op = op;
        self
    }

    /// Replace the type-derived operator set
    pub fn with_operators<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operator>,
    {
        self.operators = Some(ops.into_iter().collect());
        self
    }

    /// Caller-facing base name used instead of the field name
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Override the parameter type for one operator
    pub fn with_op_type(mut self, op: Operator, field_type: FieldType) -> Self {
        self.op_types.insert(op, field_type);
        self
    }

    /// Adds `is_null` to the type-derived operator set
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn default_op(&self) -> Operator {
        self.default_op
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn op_type(&self, op: Operator) -> Option<&FieldType> {
        self.op_types.get(&op)
    }

    /// Additional operators, in order, without duplicates and without the
    /// default operator.
    pub fn additional_operators(&self) -> Vec<Operator> {
        let ops = match &self.operators {
            Some(ops) => ops.clone(),
            None => default_operators(&self.field_type, self.nullable),
        };

        let mut seen = Vec::with_capacity(ops.len());
        for op in ops {
            if op != self.default_op && !seen.contains(&op) {
                seen.push(op);
            }
        }
        seen
    }
}

impl From<FieldType> for FilterField {
    fn from(field_type: FieldType) -> Self {
        Self::new(field_type)
    }
}
