//! OpenAPI specification and Swagger UI
//!
//! The static part of the document comes from utoipa. Filter and sort
//! parameters are compiled at startup, so they are attached to their
//! operations afterwards and the document is served as plain JSON.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::State;
use axum::response::{Html, Json};
use axum::routing::get;
use serde_json::Value;
use utoipa::OpenApi;

use crate::api::routes::users::UsersApiState;
use crate::api::routes::{health, users};
use crate::core::constants::{DOCS_PATH, OPENAPI_PATH, USERS_PATH};
use crate::filters::{attach_parameters, fix_explode};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filterkit API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Typed filter and sort query parameters"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "users", description = "Filterable user listing")
    ),
    paths(
        health::health,
        users::list_users,
    ),
    components(schemas(
        health::HealthResponse,
        users::types::UserStatus,
        users::types::UserDto,
        users::types::UserQueryResponse,
    ))
)]
pub struct ApiDoc;

/// Build the full document: utoipa paths plus generated query parameters
pub fn build_openapi(users: &UsersApiState) -> Result<Value> {
    let mut doc = serde_json::to_value(ApiDoc::openapi())?;

    let mut params = users.filters.openapi_parameters();
    params.push(users.sorting.openapi_parameter());
    if !attach_parameters(&mut doc, USERS_PATH, "get", params) {
        anyhow::bail!("Operation GET {} missing from OpenAPI document", USERS_PATH);
    }

    fix_explode(&mut doc);
    Ok(doc)
}

/// OpenAPI JSON and Swagger UI routes
pub fn routes(doc: Arc<Value>) -> Router<()> {
    Router::new()
        .route(OPENAPI_PATH, get(openapi_json))
        .route(DOCS_PATH, get(swagger_ui_html))
        .with_state(doc)
}

/// Serve OpenAPI JSON specification
async fn openapi_json(State(doc): State<Arc<Value>>) -> Json<Value> {
    Json(doc.as_ref().clone())
}

/// Serve Swagger UI from CDN
async fn swagger_ui_html() -> Html<String> {
    Html(SWAGGER_UI_HTML.replace("{openapi_path}", OPENAPI_PATH))
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Filterkit API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "{openapi_path}",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true
            });
        };
    </script>
</body>
</html>"#;
