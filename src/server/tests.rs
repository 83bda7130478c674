// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use std::sync::Arc;
use tower::ServiceExt;

use super::{AppState, router};
use crate::config::types::AuthConfig;
use crate::error::{AdminError, RemoteError, ValidationError};
use crate::service::CatalogService;
use crate::store::memory::MemoryStore;

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn app(origin: &str) -> axum::Router {
    let store = Arc::new(MemoryStore::with_files("main", [("data/products.json", "[]")]));
    let state = AppState::new(CatalogService::new(store, "main"), AuthConfig::default());
    router(state, origin)
}

#[tokio::test]
async fn test_error_body_and_status() {
    let conflict: AdminError = RemoteError::RefUpdateConflict {
        branch: "main".into(),
    }
    .into();
    let response = conflict.into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    insta::assert_snapshot!(
        body_text(response).await,
        @r#"{"error":"branch main moved concurrently; reload and retry"}"#
    );

    let missing: AdminError = ValidationError::NotFound {
        resource: "products",
        id: "p9".into(),
    }
    .into();
    assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preflight_answers_without_body() {
    let response = app("https://shop.example.com")
        .oneshot(
            Request::options("/api/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers["access-control-allow-origin"],
        "https://shop.example.com"
    );
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(body_text(response).await.is_empty());
}

#[tokio::test]
async fn test_health_is_outside_the_api_layer() {
    let response = app("*")
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("access-control-allow-origin").is_none());
    insta::assert_snapshot!(body_text(response).await, @r#"{"status":"ok","branch":"main"}"#);
}
