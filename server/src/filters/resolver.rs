//! Value resolver

use std::collections::BTreeMap;

use super::bag::FilterBag;
use super::compiler::FilterSet;
use super::error::ValidationErrors;
use super::operator::Operator;
use super::types::FilterValue;

/// field -> operator -> value, only for parameters the caller supplied
pub type FilterValues = BTreeMap<String, BTreeMap<Operator, FilterValue>>;

/// Collapse a bound bag into [`FilterValues`]. Absent slots are omitted.
///
/// The bag must have been shaped for `set` (see [`FilterBag::empty`]).
pub fn resolve(set: &FilterSet, bag: FilterBag) -> FilterValues {
    let slots = bag.into_slots();
    debug_assert_eq!(slots.len(), set.len(), "filter bag shaped for a different set");

    let mut values = FilterValues::new();

    for (param, slot) in set.params.iter().zip(slots) {
        let Some(value) = slot else {
            continue;
        };
        let Some((field, op)) = set.defs.get(&param.key) else {
            continue;
        };
        values.entry(field.clone()).or_default().insert(*op, value);
    }

    values
}

impl FilterSet {
    pub fn resolve(&self, bag: FilterBag) -> FilterValues {
        resolve(self, bag)
    }

    /// Bind and resolve in one step
    pub fn extract(&self, pairs: &[(String, String)]) -> Result<FilterValues, ValidationErrors> {
        self.bind(pairs).map(|bag| self.resolve(bag))
    }
}
