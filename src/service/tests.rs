// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::CatalogService;
use crate::batch::BatchRequest;
use crate::catalog::{Category, CategoryPatch, Product, ProductDraft};
use crate::store::memory::{FailPoint, MemoryStore};
use crate::store::testing::HookedStore;

fn service_with(files: &[(&str, Value)]) -> (Arc<MemoryStore>, CatalogService) {
    let store = Arc::new(MemoryStore::with_files(
        "main",
        files
            .iter()
            .map(|(path, value)| (path.to_string(), serde_json::to_vec_pretty(value).unwrap())),
    ));
    let service = CatalogService::new(store.clone(), "main");
    (store, service)
}

fn file(store: &MemoryStore, path: &str) -> Value {
    serde_json::from_slice(&store.file("main", path).unwrap()).unwrap()
}

fn request(body: Value) -> BatchRequest {
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn test_batch_create_on_empty_products() {
    let (store, service) = service_with(&[("data/products.json", json!([]))]);
    let head = store.head("main").unwrap();

    let response = service
        .apply_batch(&request(json!({
            "products": { "create": [{ "name": "Silk", "price": "500" }] }
        })))
        .await
        .unwrap();

    let commit = store.head("main").unwrap();
    assert_eq!(response.commit_sha.as_deref(), Some(commit.as_str()));
    assert_eq!(store.parents(&commit), vec![head]);
    assert_eq!(response.results["products"].count, Some(1));

    let products = file(&store, "data/products.json");
    assert_eq!(products[0]["name"], "Silk");
    assert_eq!(products[0]["price"], "500");
    assert!(products[0]["id"].is_string());
    assert!(products[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_batch_delete_is_idempotent() {
    let (store, service) = service_with(&[(
        "data/categories.json",
        json!([{ "id": "silk", "name": "Silk" }, { "id": "cotton", "name": "Cotton" }]),
    )]);
    let batch = request(json!({ "categories": { "delete": ["silk"] } }));

    let first = service.apply_batch(&batch).await.unwrap();
    assert!(first.commit_sha.is_some());
    assert_eq!(
        file(&store, "data/categories.json"),
        json!([{ "id": "cotton", "name": "Cotton" }])
    );

    let commits = store.counters().commits;
    let second = service.apply_batch(&batch).await.unwrap();
    assert_eq!(second.commit_sha, None);
    assert_eq!(second.message, "No changes to save");
    assert!(second.results.is_empty());
    assert_eq!(store.counters().commits, commits);
}

#[tokio::test]
async fn test_batch_writes_all_files_in_one_commit() {
    let (store, service) = service_with(&[
        ("data/products.json", json!([{ "id": "p1", "name": "Silk" }])),
        ("data/hero.json", json!([])),
    ]);

    service
        .apply_batch(&request(json!({
            "products": { "update": [{ "id": "p1", "price": "900" }] },
            "hero": { "create": [{ "image": "a.jpg" }] },
            "content": { "update": { "siteName": "Saree House" } }
        })))
        .await
        .unwrap();

    assert_eq!(store.counters().commits, 1);
    assert_eq!(store.counters().ref_updates, 1);
    assert_eq!(file(&store, "data/products.json")[0]["price"], "900");
    assert_eq!(file(&store, "data/hero.json")[0]["image"], "a.jpg");
    assert_eq!(
        file(&store, "data/content.json"),
        json!({ "siteName": "Saree House" })
    );
}

#[tokio::test]
async fn test_failed_batch_changes_nothing() {
    let (store, service) = service_with(&[("data/products.json", json!([]))]);
    let head = store.head("main");
    store.fail_at(FailPoint::CreateTree);

    let err = service
        .apply_batch(&request(json!({ "products": { "create": [{ "name": "Silk" }] } })))
        .await
        .unwrap_err();

    assert_eq!(err.status(), 500);
    assert_eq!(store.head("main"), head);
    assert_eq!(file(&store, "data/products.json"), json!([]));
}

#[tokio::test]
async fn test_invalid_draft_aborts_before_any_write() {
    let (store, service) = service_with(&[("data/products.json", json!([]))]);

    let err = service
        .apply_batch(&request(json!({
            "products": { "create": [{ "price": "100" }] }
        })))
        .await
        .unwrap_err();

    assert_eq!(err.status(), 400);
    assert_eq!(store.counters().mutations(), 0);
}

#[tokio::test]
async fn test_single_record_crud() {
    let (store, service) = service_with(&[]);

    let created: Product = service
        .create::<Product>(ProductDraft {
            name: Some("Silk".into()),
            ..ProductDraft::default()
        })
        .await
        .unwrap();
    let head = store.head("main").unwrap();
    let message = store.message(&head).unwrap();
    assert!(message.starts_with("Update data/products.json via admin panel - "));

    let listed = service.list::<Product>().await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    service.delete::<Product>(&created.id).await.unwrap();
    assert!(service.list::<Product>().await.unwrap().is_empty());

    let err = service.delete::<Product>(&created.id).await.unwrap_err();
    assert_eq!(err.status(), 404);
}

#[tokio::test]
async fn test_update_unknown_category_is_not_found() {
    let (_store, service) = service_with(&[("data/categories.json", json!([]))]);
    let patch = CategoryPatch {
        id: "silk".into(),
        name: Some("Silk".into()),
        order: None,
    };
    let err = service
        .update::<Category>("silk", &patch)
        .await
        .unwrap_err();
    assert_eq!(err.status(), 404);
}

#[tokio::test]
async fn test_update_content_merges() {
    let (store, service) = service_with(&[(
        "data/content.json",
        json!({ "siteName": "A", "email": "a@example.com" }),
    )]);

    let patch = json!({ "siteName": "B" }).as_object().cloned().unwrap();
    let content = service.update_content(patch).await.unwrap();

    assert_eq!(content.fields["email"], "a@example.com");
    let stored = file(&store, "data/content.json");
    assert_eq!(stored["siteName"], "B");
    assert!(stored["updatedAt"].is_string());
}

#[tokio::test]
async fn test_snapshot_reads_missing_files_as_empty() {
    let (_store, service) = service_with(&[(
        "data/categories.json",
        json!([{ "id": "b", "order": 2 }, { "id": "a", "order": 1 }]),
    )]);
    let snapshot = service.snapshot().await.unwrap();
    assert!(snapshot.products.is_empty());
    assert!(snapshot.content.fields.is_empty());
    let ids: Vec<_> = snapshot.categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}

#[tokio::test]
async fn test_missing_branch_is_initialized_when_enabled() {
    let store = Arc::new(MemoryStore::new());
    let service = CatalogService::new(store.clone(), "main").init_missing_branch(true);

    service
        .apply_batch(&request(json!({ "hero": { "create": [{ "image": "a.jpg" }] } })))
        .await
        .unwrap();

    assert_eq!(store.counters().ref_creates, 1);
    assert_eq!(file(&store, "data/hero.json")[0]["image"], "a.jpg");
}

/// Store where another admin saves a product right after our first read.
fn store_with_late_writer() -> Arc<HookedStore> {
    let written = AtomicBool::new(false);
    Arc::new(HookedStore::new(
        MemoryStore::with_files("main", [("data/products.json", "[]")]),
        move |store| {
            if !written.swap(true, Ordering::SeqCst) {
                store.seed(
                    "main",
                    [("data/products.json", r#"[{"id":"other","name":"Cotton"}]"#)],
                );
            }
            Ok(())
        },
    ))
}

#[tokio::test]
async fn test_batch_over_concurrent_save_is_conflict() {
    let store = store_with_late_writer();
    let service = CatalogService::new(store.clone(), "main");

    let err = service
        .apply_batch(&request(json!({ "products": { "create": [{ "name": "Silk" }] } })))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.status(), 409);
    assert_eq!(
        file(&store.inner, "data/products.json"),
        json!([{ "id": "other", "name": "Cotton" }])
    );
}

#[tokio::test]
async fn test_create_over_concurrent_save_is_conflict() {
    let store = store_with_late_writer();
    let service = CatalogService::new(store.clone(), "main");

    let err = service
        .create::<Product>(ProductDraft {
            name: Some("Silk".into()),
            ..ProductDraft::default()
        })
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    let products = file(&store.inner, "data/products.json");
    assert_eq!(products.as_array().unwrap().len(), 1);
    assert_eq!(products[0]["name"], "Cotton");
}

#[tokio::test]
async fn test_write_reads_the_commit_it_builds_on() {
    let (store, service) = service_with(&[("data/products.json", json!([]))]);
    let base = store.head("main").unwrap();

    service
        .create::<Product>(ProductDraft {
            name: Some("Silk".into()),
            ..ProductDraft::default()
        })
        .await
        .unwrap();

    let head = store.head("main").unwrap();
    assert_eq!(store.parents(&head), vec![base.clone()]);
    assert_eq!(store.file(base.as_str(), "data/products.json").unwrap(), b"[]");
}
