//! Filter and sort specification compiler
//!
//! A service declares, per resource, which fields are filterable and with
//! which operators. Compilation expands every `(field, operator)` pair into
//! its own typed, uniquely named query parameter; at request time the bound
//! parameters collapse back into a `field -> operator -> value` map.
//!
//! ## Example
//!
//! ```text
//! age: integer, operators [gt, in]
//!
//!   ?age=30          -> {"age": {"eq": 30}}
//!   ?age__gt=18      -> {"age": {"gt": 18}}
//!   ?age__in=1,2,3   -> {"age": {"in": [1, 2, 3]}}
//!   ?sort=+name,-age -> [["name", "asc", null], ["age", "desc", null]]
//! ```
//!
//! ## Modules
//!
//! - `operator`: operator registry and per-type default operator sets
//! - `alias`: parameter name generators and [`FiltersConfig`]
//! - `types`: declared/adapted types, coercion and the type adapter
//! - `csv`: list encoding normalizer
//! - `field`: field definitions
//! - `compiler`: field definitions to [`FilterSet`]
//! - `bag` / `resolver`: request binding and value resolution
//! - `sorting`: sort parameter compiler and resolver
//! - `schema`: definitions derived from a record's JSON schema
//! - `docs`: OpenAPI fragments and the `explode` post-processor

pub mod alias;
pub mod bag;
pub mod compiler;
pub mod csv;
pub mod docs;
pub mod error;
pub mod field;
pub mod operator;
pub mod resolver;
pub mod schema;
pub mod sorting;
pub mod types;

pub use alias::{AliasGenerator, FiltersConfig, default_alias_generator, operator_alias_generator};
pub use bag::FilterBag;
pub use compiler::{FilterParam, FilterSet, ParamLocation, create_filters};
pub use csv::normalize_csv;
pub use docs::{attach_parameters, fix_explode};
pub use error::{FilterError, ValidationErrors, ValidationIssue};
pub use field::FilterField;
pub use operator::Operator;
pub use resolver::{FilterValues, resolve};
pub use schema::{SchemaOptions, create_filters_from_schema, create_sorting_from_schema};
pub use sorting::{
    SortDirection, SortField, SortNulls, SortOptions, SortValue, SortingSet, SortingValues,
    create_sorting,
};
pub use types::{FieldType, FilterValue, adapt_type};
