// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP surface of the admin backend.
//!
//! ```text
//! /healthz                      GET                  open
//! /api/auth/login               POST {password}      open
//! /api/auth/verify              POST                 token (header or body)
//! /api/batch                    POST                 token
//! /api/{products,categories,    GET                  open
//!       hero,collections}       POST, PUT/DELETE ?id token
//! /api/content                  GET                  open
//!                               PUT                  token
//!
//! every /api response: CORS + nosniff/DENY headers, OPTIONS -> 200
//! errors: {"error": "<message>"} with AdminError::status()
//! ```

mod handlers;
mod middleware;

#[cfg(test)]
mod tests;

use anyhow::Context;
use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::catalog::{Category, Collection, HeroSlide, Product};
use crate::config::types::{AuthConfig, ServerConfig};
use crate::error::{AdminError, Result};
use crate::service::CatalogService;

pub use handlers::AdminAuth;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: CatalogService,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(service: CatalogService, auth: AuthConfig) -> Self {
        Self {
            service,
            auth: Arc::new(auth),
        }
    }
}

/// Build the router with every route and middleware.
pub fn router(state: AppState, allowed_origin: &str) -> Router {
    let api = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/verify", post(handlers::verify))
        .route("/batch", post(handlers::batch))
        .route(
            "/products",
            get(handlers::list::<Product>)
                .post(handlers::create::<Product>)
                .put(handlers::update::<Product>)
                .delete(handlers::delete::<Product>),
        )
        .route(
            "/categories",
            get(handlers::list::<Category>)
                .post(handlers::create::<Category>)
                .put(handlers::update::<Category>)
                .delete(handlers::delete::<Category>),
        )
        .route(
            "/hero",
            get(handlers::list::<HeroSlide>)
                .post(handlers::create::<HeroSlide>)
                .put(handlers::update::<HeroSlide>)
                .delete(handlers::delete::<HeroSlide>),
        )
        .route(
            "/collections",
            get(handlers::list::<Collection>)
                .post(handlers::create::<Collection>)
                .put(handlers::update::<Collection>)
                .delete(handlers::delete::<Collection>),
        )
        .route(
            "/content",
            get(handlers::content).put(handlers::update_content),
        )
        .layer(axum::middleware::from_fn_with_state(
            Arc::<str>::from(allowed_origin),
            middleware::cors,
        ));

    Router::new()
        .route("/healthz", get(handlers::health))
        .nest("/api", api)
        .layer(axum::middleware::from_fn(middleware::access_log))
        .with_state(state)
}

/// Listen on `config.bind` until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if the address does not parse, cannot be bound, or the
/// server fails.
pub async fn serve(
    config: &ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("invalid server.bind address '{}'", config.bind))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {addr}"))?;

    info!(%addr, branch = state.service.branch(), "admin API listening");

    axum::serve(listener, router(state, &config.allowed_origin))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("HTTP server error")?;

    info!("admin API stopped");
    Ok(())
}

/// Cancel `token` on Ctrl-C or SIGTERM.
pub async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT"),
        () = terminate => info!("received SIGTERM"),
        () = token.cancelled() => return,
    }
    token.cancel();
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
