//! User API endpoints
//!
//! The users resource has no storage behind it; the endpoint echoes the
//! resolved filters and ordering so clients can see exactly what a query
//! compiles to.

pub mod types;

use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::{Filters, Sorting};
use crate::filters::{
    FieldType, FilterError, FilterField, FilterSet, FiltersConfig, Operator, ParamLocation,
    SchemaOptions, SortField, SortNulls, SortOptions, SortingSet, create_filters_from_schema,
    create_sorting_from_schema,
};

use types::{UserDto, UserQueryResponse};

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub filters: Arc<FilterSet>,
    pub sorting: Arc<SortingSet>,
}

impl FromRef<UsersApiState> for Arc<FilterSet> {
    fn from_ref(state: &UsersApiState) -> Self {
        state.filters.clone()
    }
}

impl FromRef<UsersApiState> for Arc<SortingSet> {
    fn from_ref(state: &UsersApiState) -> Self {
        state.sorting.clone()
    }
}

impl UsersApiState {
    /// Compile the users filter and sort specifications
    pub fn new(config: &FiltersConfig, sort_param: &str) -> Result<Self, FilterError> {
        let filters = create_filters_from_schema::<UserDto>(
            SchemaOptions::default()
                .exclude(["id"])
                .with_override(
                    "email",
                    FilterField::new(FieldType::String)
                        .with_alias("mail")
                        .with_operators([Operator::Ne, Operator::Ilike, Operator::In]),
                )
                .with_override(
                    "search",
                    FilterField::new(FieldType::String)
                        .with_default_op(Operator::Ilike)
                        .with_operators([]),
                ),
            config,
            ParamLocation::Query,
        )?;

        let sorting = create_sorting_from_schema::<UserDto>(
            SchemaOptions::default()
                .include(["name", "age", "created_at"])
                .with_override("age", SortField::new("age").nulls(SortNulls::Smaller)),
            SortOptions::default()
                .with_param(sort_param)
                .with_default(["-created_at"]),
        )?;

        Ok(Self {
            filters: Arc::new(filters),
            sorting: Arc::new(sorting),
        })
    }
}

/// Build Users API routes
pub fn routes(state: UsersApiState) -> Router<()> {
    Router::new().route("/", get(list_users)).with_state(state)
}

/// Resolve user filters and ordering
///
/// Filter and sort parameters are generated from the user schema and added
/// to this operation when the OpenAPI document is built.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Resolved filters and ordering", body = UserQueryResponse),
        (status = 400, description = "Invalid filter or sort parameter")
    )
)]
pub async fn list_users(Filters(filters): Filters, Sorting(sort): Sorting) -> Json<UserQueryResponse> {
    tracing::debug!(filters = filters.len(), sort = sort.len(), "Resolved users query");
    Json(UserQueryResponse { filters, sort })
}
