//! API server initialization

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware;
use super::openapi;
use super::routes::{health, users};
use crate::core::CoreApp;
use crate::core::config::AppConfig;
use crate::core::constants::{HEALTH_PATH, USERS_PATH};

/// Build the application router from the final configuration.
///
/// Filter and sort specifications are compiled here, so a bad declaration
/// fails startup instead of the first request.
pub fn build_router(config: &AppConfig) -> Result<Router> {
    let users_state = users::UsersApiState::new(&config.filters_config(), &config.filters.sort_param)
        .context("Failed to compile users filter specification")?;
    let doc = openapi::build_openapi(&users_state)?;

    let router = Router::new()
        .route(HEALTH_PATH, get(health::health))
        .nest(USERS_PATH, users::routes(users_state))
        .merge(openapi::routes(Arc::new(doc)))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Serve until the shutdown service is triggered
    pub async fn start(self) -> Result<()> {
        let Self { app } = self;
        let shutdown = app.shutdown.clone();

        let host = &app.config.server.host;
        let port = app.config.server.port;
        let addr = SocketAddr::new(
            host.parse::<IpAddr>()
                .with_context(|| format!("Invalid server host: {}", host))?,
            port,
        );

        let router = build_router(&app.config)?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::debug!(addr = %addr, "Listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await
            .context("Server error")?;

        Ok(())
    }
}
