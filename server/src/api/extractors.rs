//! Filter and sort extractors for API routes
//!
//! A route exposes a compiled [`FilterSet`] and [`SortingSet`] through its
//! state (via `FromRef`). The extractors read the raw parameter pairs from
//! the query string or the headers, depending on where the set was compiled
//! to live, and resolve them.

use std::ops::Deref;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRef, FromRequestParts, Query};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use super::types::ApiError;
use crate::filters::{
    FilterSet, FilterValues, ParamLocation, SortingSet, SortingValues, ValidationErrors,
};

/// Validation rejection with structured error response
#[derive(Debug)]
pub enum ValidationRejection {
    /// Failed to parse query string
    Query(QueryRejection),
    /// One or more filter parameters failed validation
    Filters(ValidationErrors),
    /// The sort parameter failed validation
    Sorting(ValidationErrors),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let (code, errors) = match self {
            Self::Query(rejection) => {
                return ApiError::bad_request("QUERY_PARSE_ERROR", rejection.body_text())
                    .into_response();
            }
            Self::Filters(errors) => ("INVALID_FILTER", errors),
            Self::Sorting(errors) => ("INVALID_SORT", errors),
        };

        ApiError::bad_request(code, errors.to_string())
            .with_details(serde_json::json!(errors))
            .into_response()
    }
}

/// Raw `(name, value)` pairs from the given location, in request order
async fn raw_pairs<S>(
    parts: &mut Parts,
    state: &S,
    location: ParamLocation,
) -> Result<Vec<(String, String)>, ValidationRejection>
where
    S: Send + Sync,
{
    match location {
        ParamLocation::Query => {
            let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
                .await
                .map_err(ValidationRejection::Query)?;
            Ok(pairs)
        }
        ParamLocation::Header => Ok(parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect()),
    }
}

/// Resolved filter values for the route's [`FilterSet`]
#[derive(Debug)]
pub struct Filters(pub FilterValues);

impl Deref for Filters {
    type Target = FilterValues;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Filters
where
    Arc<FilterSet>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let set = Arc::<FilterSet>::from_ref(state);
        let pairs = raw_pairs(parts, state, set.location()).await?;
        let values = set.extract(&pairs).map_err(ValidationRejection::Filters)?;
        Ok(Self(values))
    }
}

/// Resolved ordering for the route's [`SortingSet`]
#[derive(Debug)]
pub struct Sorting(pub SortingValues);

impl Deref for Sorting {
    type Target = SortingValues;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Sorting
where
    Arc<SortingSet>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let set = Arc::<SortingSet>::from_ref(state);
        let pairs = raw_pairs(parts, state, set.location()).await?;
        let values = set.extract(&pairs).map_err(ValidationRejection::Sorting)?;
        Ok(Self(values))
    }
}
