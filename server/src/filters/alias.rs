//! Alias generation and the filters configuration context

use super::operator::Operator;

/// Maps `(field name, operator, explicit alias)` to the caller-facing
/// parameter name. Must be pure.
pub type AliasGenerator = fn(name: &str, op: Operator, alias: Option<&str>) -> String;

/// Django-style lookup names: `age`, `age__gte`, `name__icontains`
pub fn default_alias_generator(name: &str, op: Operator, alias: Option<&str>) -> String {
    let base = alias.unwrap_or(name);
    let suffix = op.lookup_suffix();

    if suffix.is_empty() {
        return base.to_string();
    }

    format!("{}{}", base, suffix)
}

/// Operator-name suffixes: `age__eq`, `age__ge`, `name__ilike`
pub fn operator_alias_generator(name: &str, op: Operator, alias: Option<&str>) -> String {
    format!("{}{}", alias.unwrap_or(name), op.fallback_suffix())
}

/// Explicit configuration handed to the filter compiler.
///
/// The only recognized option is the alias generator.
#[derive(Debug, Clone, Copy)]
pub struct FiltersConfig {
    pub alias_generator: AliasGenerator,
}

impl FiltersConfig {
    pub fn new(alias_generator: AliasGenerator) -> Self {
        Self { alias_generator }
    }

    pub fn alias(&self, name: &str, op: Operator, alias: Option<&str>) -> String {
        (self.alias_generator)(name, op, alias)
    }
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self::new(default_alias_generator)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_default_generator_exact_match_has_no_suffix() {
        assert_eq!(default_alias_generator("age", Operator::Eq, None), "age");
    }

    #[test]
    fn test_default_generator_suffixes() {
        assert_eq!(default_alias_generator("age", Operator::Gt, None), "age__gt");
        assert_eq!(default_alias_generator("age", Operator::Ge, None), "age__gte");
        assert_eq!(default_alias_generator("age", Operator::In, None), "age__in");
        assert_eq!(
            default_alias_generator("name", Operator::Ilike, None),
            "name__icontains"
        );
        assert_eq!(
            default_alias_generator("deleted_at", Operator::IsNull, None),
            "deleted_at__isnull"
        );
    }

    #[test]
    fn test_explicit_alias_replaces_name() {
        assert_eq!(
            default_alias_generator("email", Operator::Ne, Some("mail")),
            "mail__ne"
        );
        assert_eq!(
            default_alias_generator("email", Operator::Eq, Some("mail")),
            "mail"
        );
    }

    #[test]
    fn test_default_generator_is_distinct_per_operator_except_like_contains() {
        // `like` and `contains` share the `__contains` lookup; the compiler
        // rejects fields that enable both.
        let names: HashSet<String> = Operator::ALL
            .iter()
            .filter(|op| **op != Operator::Contains)
            .map(|op| default_alias_generator("f", *op, None))
            .collect();
        assert_eq!(names.len(), Operator::ALL.len() - 1);
    }

    #[test]
    fn test_operator_generator_is_distinct_per_operator() {
        let names: HashSet<String> = Operator::ALL
            .iter()
            .map(|op| operator_alias_generator("f", *op, None))
            .collect();
        assert_eq!(names.len(), Operator::ALL.len());
        assert_eq!(operator_alias_generator("age", Operator::In, None), "age__in");
        assert_eq!(operator_alias_generator("age", Operator::Eq, None), "age__eq");
    }

    #[test]
    fn test_config_uses_injected_generator() {
        let config = FiltersConfig::new(operator_alias_generator);
        assert_eq!(config.alias("age", Operator::Ge, None), "age__ge");
        assert_eq!(FiltersConfig::default().alias("age", Operator::Ge, None), "age__gte");
    }
}
