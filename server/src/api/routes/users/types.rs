//! User API types

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::filters::{FilterValues, SortingValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ToSchema, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Invited,
    Suspended,
}

/// User record. Its JSON schema drives the generated filter and sort parameters.
#[derive(Debug, Clone, ToSchema, JsonSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
    pub status: UserStatus,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Resolved query for `GET /api/v1/users`
#[derive(Debug, Serialize, ToSchema)]
pub struct UserQueryResponse {
    /// `field -> operator -> value`
    #[schema(value_type = Object)]
    pub filters: FilterValues,
    /// `[field, direction, nulls]` triples in caller order
    #[schema(value_type = Vec<Vec<String>>)]
    pub sort: SortingValues,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_status_schema_uses_lowercase_names() {
        let schema = schemars::schema_for!(UserStatus);
        assert_eq!(
            schema.as_value()["enum"],
            json!(["active", "invited", "suspended"])
        );
    }

    #[test]
    fn test_user_schema_lists_record_fields() {
        let schema = schemars::schema_for!(UserDto);
        let properties = schema.as_value()["properties"].as_object().unwrap();
        let names: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["id", "name", "email", "age", "status", "tags", "created_at"]
        );
    }
}
