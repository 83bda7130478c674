// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::AdminSession;
use crate::catalog::{Category, CategoryPatch, Product, ProductDraft, ProductPatch, SiteContent};
use crate::error::RemoteError;
use crate::service::CatalogService;
use crate::store::memory::{FailPoint, MemoryStore};
use crate::store::testing::HookedStore;

fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_760_870_400_000).unwrap()
}

fn draft(name: &str) -> ProductDraft {
    ProductDraft {
        name: Some(name.into()),
        ..ProductDraft::default()
    }
}

fn seeded_store() -> MemoryStore {
    let files: [(&str, Value); 2] = [
        (
            "data/products.json",
            json!([{ "id": "p1", "name": "Silk", "price": "500" }]),
        ),
        (
            "data/categories.json",
            json!([{ "id": "silk", "name": "Silk", "order": 1 }]),
        ),
    ];
    MemoryStore::with_files(
        "main",
        files
            .iter()
            .map(|(path, value)| (path.to_string(), serde_json::to_vec_pretty(value).unwrap())),
    )
}

fn seeded() -> (Arc<MemoryStore>, CatalogService) {
    let store = Arc::new(seeded_store());
    let service = CatalogService::new(store.clone(), "main");
    (store, service)
}

#[test]
fn test_temporary_ids_do_not_collide() {
    let mut session = AdminSession::default();
    let a = session.stage_create_at::<Product>(draft("A"), fixed_now());
    let b = session.stage_create_at::<Product>(draft("B"), fixed_now());
    assert_eq!(a, "temp_1760870400000");
    assert_eq!(b, "temp_1760870400000_1");
    assert_eq!(session.pending_count(), 2);
}

#[test]
fn test_update_of_temporary_id_rewrites_draft() {
    let mut session = AdminSession::default();
    let temp = session.stage_create_at::<Product>(draft("Silk"), fixed_now());
    session.stage_update::<Product>(ProductPatch {
        id: temp.clone(),
        name: Some("Banarasi Silk".into()),
        ..ProductPatch::default()
    });

    let pending = session.pending::<Product>();
    assert!(pending.updates().is_empty());
    assert_eq!(pending.creates()[0].1.name.as_deref(), Some("Banarasi Silk"));
    assert_eq!(session.pending_count(), 1);
}

#[test]
fn test_delete_of_temporary_id_drops_create() {
    let mut session = AdminSession::default();
    let temp = session.stage_create_at::<Product>(draft("Silk"), fixed_now());
    session.stage_delete::<Product>(&temp);

    assert!(!session.has_changes());
    assert!(session.to_batch_request().resources().is_empty());
}

#[test]
fn test_restaged_update_replaces_earlier_one() {
    let mut session = AdminSession::default();
    for name in ["One", "Two"] {
        session.stage_update::<Category>(CategoryPatch {
            id: "silk".into(),
            name: Some(name.into()),
            order: None,
        });
    }
    let updates = session.pending::<Category>().updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].name.as_deref(), Some("Two"));
}

#[test]
fn test_delete_drops_pending_update() {
    let mut session = AdminSession::default();
    session.stage_update::<Category>(CategoryPatch {
        id: "silk".into(),
        name: Some("Pure Silk".into()),
        order: None,
    });
    session.stage_delete::<Category>("silk");
    session.stage_delete::<Category>("silk");

    let pending = session.pending::<Category>();
    assert!(pending.updates().is_empty());
    assert_eq!(pending.deletes(), ["silk"]);
}

#[test]
fn test_batch_request_omits_untouched_resources() {
    let mut session = AdminSession::default();
    session.stage_create_at::<Product>(draft("Silk"), fixed_now());
    session.stage_delete::<Category>("cotton");

    let body = serde_json::to_value(session.to_batch_request()).unwrap();
    assert_eq!(
        body,
        json!({
            "products": { "create": [{ "name": "Silk" }] },
            "categories": { "delete": ["cotton"] }
        })
    );
}

#[tokio::test]
async fn test_preview_overlays_pending_changes() {
    let (_store, service) = seeded();
    let mut session = AdminSession::load(&service).await.unwrap();
    session.stage_update::<Product>(ProductPatch {
        id: "p1".into(),
        price: Some(crate::catalog::Price::Text("450".into())),
        ..ProductPatch::default()
    });
    let temp = session.stage_create_at::<Product>(draft("Cotton"), fixed_now());

    let rows = session.preview_products().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["price"], "450");
    assert_eq!(rows[1]["id"], Value::String(temp));
    assert_eq!(rows[1]["name"], "Cotton");

    session.stage_delete::<Category>("silk");
    assert!(session.preview_categories().unwrap().is_empty());

    // the loaded catalog itself is untouched
    assert_eq!(session.original().products[0].price, Some(crate::catalog::Price::Text("500".into())));
}

#[tokio::test]
async fn test_flush_commits_once_and_reloads() {
    let (store, service) = seeded();
    let mut session = AdminSession::load(&service).await.unwrap();
    session.stage_create::<Product>(draft("Cotton"));
    session.stage_delete::<Category>("silk");
    session.stage_content(
        serde_json::from_value::<SiteContent>(json!({ "siteName": "Saree House" })).unwrap(),
    );

    let response = session.flush(&service).await.unwrap();

    assert!(response.commit_sha.is_some());
    assert_eq!(store.counters().commits, 1);
    assert!(!session.has_changes());
    assert_eq!(session.original().products.len(), 2);
    assert!(session.original().categories.is_empty());
    assert_eq!(session.original().content.fields["siteName"], "Saree House");
}

#[tokio::test]
async fn test_failed_flush_keeps_changes() {
    let (store, service) = seeded();
    let mut session = AdminSession::load(&service).await.unwrap();
    session.stage_create::<Product>(draft("Cotton"));
    store.fail_at(FailPoint::UpdateRef);

    session.flush(&service).await.unwrap_err();
    assert_eq!(session.pending_count(), 1);

    session.flush(&service).await.unwrap();
    assert!(!session.has_changes());
    assert_eq!(session.original().products.len(), 2);
}

#[tokio::test]
async fn test_reload_failure_after_commit_still_flushes() {
    let reads_fail = Arc::new(AtomicBool::new(true));
    let flag = reads_fail.clone();
    let store = Arc::new(HookedStore::new(
        seeded_store(),
        move |store| {
            if flag.load(Ordering::SeqCst) && store.counters().ref_updates > 0 {
                return Err(RemoteError::Unavailable {
                    status: Some(503),
                    message: "read after commit".to_string(),
                }
                .into());
            }
            Ok(())
        },
    ));
    let service = CatalogService::new(store.clone(), "main");
    let mut session = AdminSession::load(&service).await.unwrap();
    let before = store.inner.head("main");
    session.stage_create::<Product>(draft("Cotton"));

    let response = session.flush(&service).await.unwrap();

    assert_eq!(response.commit_sha, store.inner.head("main").map(|h| h.to_string()));
    assert_ne!(store.inner.head("main"), before);
    assert!(!session.has_changes());
    assert!(session.is_stale());
    assert_eq!(session.original().products.len(), 1);

    reads_fail.store(false, Ordering::SeqCst);
    session.reload(&service).await.unwrap();
    assert!(!session.is_stale());
    assert_eq!(session.original().products.len(), 2);
}

#[test]
fn test_reset_discards_everything() {
    let mut session = AdminSession::default();
    session.stage_create_at::<Product>(draft("Silk"), fixed_now());
    session.stage_content(SiteContent::default());
    assert_eq!(session.pending_count(), 2);

    session.reset();
    assert!(!session.has_changes());
    assert!(session.preview_content().fields.is_empty());
}
