// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use super::ids::{
    category_slug, collection_id, from_base36, hero_id, is_temporary, product_id, temporary_id,
    timestamp, to_base36,
};
use super::{
    Category, CategoryDraft, CategoryPatch, Collection, CollectionDraft, CreateContext, HeroDraft,
    HeroSlide, Price, Product, ProductDraft, ProductPatch, Record, ResourceKind, SiteContent,
    decode_records,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_760_870_400_000).unwrap()
}

fn ctx<R>(existing: &[R], sequence: u64) -> CreateContext<'_, R> {
    CreateContext {
        existing,
        now: fixed_now(),
        sequence,
    }
}

// --- ids ---

#[test]
fn test_base36() {
    assert_eq!(to_base36(0), "0");
    assert_eq!(to_base36(35), "z");
    assert_eq!(to_base36(1_760_870_400_000), "mgxkrsao");
    assert_eq!(from_base36("mgxkrsao"), Some(1_760_870_400_000));
    assert_eq!(from_base36("MGXKRSAO"), Some(1_760_870_400_000));
    assert_eq!(from_base36("mgx-rsao"), None);
    assert_eq!(from_base36(""), None);
    assert_eq!(from_base36("zzzzzzzzzzzzzzzz"), None);
}

#[test]
fn test_timestamp_format() {
    assert_eq!(timestamp(fixed_now()), "2025-10-19T10:40:00.000Z");
}

#[test]
fn test_product_id_shape() {
    let id = product_id(fixed_now());
    assert_eq!(id.len(), 13 + 9);
    assert!(id.starts_with("1760870400000"));
    assert!(id[13..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[test]
fn test_hero_ids_are_sequential() {
    assert_eq!(hero_id(fixed_now(), 0), "1760870400000");
    assert_eq!(hero_id(fixed_now(), 2), "1760870400002");
}

#[test]
fn test_slugs() {
    assert_eq!(category_slug("Banarasi Silk"), "banarasi-silk");
    assert_eq!(category_slug("Silk & Cotton!!"), "silk-cotton-");
    assert_eq!(category_slug("  Kanjivaram"), "-kanjivaram");
    assert_eq!(
        collection_id(" Wedding Edit ", fixed_now()),
        "wedding-edit-mgxkrsao"
    );
}

#[test]
fn test_temporary_ids() {
    assert_eq!(temporary_id(fixed_now(), 0), "temp_1760870400000");
    assert_eq!(temporary_id(fixed_now(), 3), "temp_1760870400000_3");
    assert!(is_temporary("temp_1"));
    assert!(!is_temporary("1760870400000"));
}

// --- resources ---

#[test]
fn test_resource_kind_lookup() {
    assert_eq!("Hero".parse::<ResourceKind>().unwrap(), ResourceKind::Hero);
    assert_eq!(ResourceKind::Collections.path(), "data/collections.json");
    let err = "orders".parse::<ResourceKind>().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown resource: orders");
}

#[test]
fn test_missing_file_is_empty() {
    assert!(decode_records::<Product>(None).unwrap().is_empty());
    assert!(SiteContent::decode(None).unwrap().fields.is_empty());
    let err = decode_records::<Product>(Some(b"{\"not\": \"a list\"}")).unwrap_err();
    assert_eq!(err.status(), 500);
}

// --- products ---

#[test]
fn test_product_create_ignores_server_fields() {
    let draft: ProductDraft = serde_json::from_value(json!({
        "id": "temp_1",
        "name": "Silk",
        "price": "500",
        "createdAt": "yesterday",
        "fabric": "mulberry"
    }))
    .unwrap();

    let product = Product::create(draft, &ctx(&[], 0)).unwrap();

    assert_ne!(product.id, "temp_1");
    assert_eq!(product.price, Some(Price::Text("500".into())));
    assert_eq!(product.created_at.as_deref(), Some("2025-10-19T10:40:00.000Z"));
    assert_eq!(product.extra.get("fabric"), Some(&json!("mulberry")));
    assert!(!product.extra.contains_key("createdAt"));
}

#[test]
fn test_product_requires_name() {
    let err = Product::create(ProductDraft::default(), &ctx(&[], 0)).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"products: field 'name' is required");
    assert_eq!(err.status(), 400);
}

#[test]
fn test_product_patch_keeps_absent_fields() {
    let mut product: Product = serde_json::from_value(json!({
        "id": "p1",
        "name": "Silk",
        "price": 500,
        "images": ["a.jpg"],
        "fabric": "mulberry"
    }))
    .unwrap();
    let patch: ProductPatch =
        serde_json::from_value(json!({ "id": "p1", "price": "650", "border": "zari" })).unwrap();

    product.apply(&patch, "2025-10-19T10:40:00.000Z");
    let once = product.clone();
    product.apply(&patch, "2025-10-19T10:40:00.000Z");

    assert_eq!(product, once);
    assert_eq!(product.name.as_deref(), Some("Silk"));
    assert_eq!(product.images, Some(vec!["a.jpg".to_string()]));
    assert_eq!(product.price, Some(Price::Text("650".into())));
    assert_eq!(product.extra.get("border"), Some(&json!("zari")));
    assert_eq!(product.extra.get("fabric"), Some(&json!("mulberry")));
}

#[test]
fn test_product_serializes_in_file_order() {
    let product: Product = serde_json::from_value(json!({
        "createdAt": "2025-10-19T10:40:00.000Z",
        "price": "500",
        "name": "Silk",
        "id": "p1"
    }))
    .unwrap();
    insta::assert_snapshot!(serde_json::to_string(&product).unwrap(), @r#"{"id":"p1","name":"Silk","price":"500","createdAt":"2025-10-19T10:40:00.000Z"}"#);
}

// --- categories ---

#[test]
fn test_category_create_defaults_order_and_rejects_duplicates() {
    let draft = CategoryDraft {
        name: Some("Banarasi Silk".into()),
        order: None,
    };
    let first = Category::create(draft.clone(), &ctx(&[], 0)).unwrap();
    assert_eq!(first.id, "banarasi-silk");
    assert_eq!(first.order, Some(1));

    let existing = [first];
    let err = Category::create(draft, &ctx(&existing, 1)).unwrap_err();
    assert_eq!(err.status(), 400);
}

#[test]
fn test_category_update_keeps_id() {
    let mut category = Category::create(
        CategoryDraft {
            name: Some("Silk".into()),
            order: Some(4),
        },
        &ctx(&[], 0),
    )
    .unwrap();

    category.apply(
        &CategoryPatch {
            id: "silk".into(),
            name: Some("Pure Silk".into()),
            order: None,
        },
        "now",
    );

    assert_eq!(category.id, "silk");
    assert_eq!(category.name.as_deref(), Some("Pure Silk"));
    assert_eq!(category.order, Some(4));
    assert_eq!(category.updated_at.as_deref(), Some("now"));
}

#[test]
fn test_categories_list_by_order() {
    let mut categories: Vec<Category> = serde_json::from_value(json!([
        { "id": "c", "order": 3 },
        { "id": "none" },
        { "id": "a", "order": 1 }
    ]))
    .unwrap();
    Category::sort_for_listing(&mut categories);
    let ids: Vec<_> = categories.iter().map(Record::id).collect();
    assert_eq!(ids, ["none", "a", "c"]);
}

// --- hero & collections ---

#[test]
fn test_hero_requires_image() {
    let err = HeroSlide::create(HeroDraft::default(), &ctx(&[], 0)).unwrap_err();
    assert_eq!(err.status(), 400);

    let slide = HeroSlide::create(
        HeroDraft {
            image: Some("assets/hero/1.jpg".into()),
            ..HeroDraft::default()
        },
        &ctx(&[], 1),
    )
    .unwrap();
    assert_eq!(slide.id, "1760870400001");
}

#[test]
fn test_collection_defaults() {
    let existing: Vec<Collection> =
        serde_json::from_value(json!([{ "id": "festive", "name": "Festive" }])).unwrap();

    let generated = Collection::create(
        CollectionDraft {
            name: Some("Wedding Edit".into()),
            ..CollectionDraft::default()
        },
        &ctx(&existing, 0),
    )
    .unwrap();
    assert_eq!(generated.id, "wedding-edit-mgxkrsao");
    assert_eq!(generated.order, Some(2));
    assert!(generated.subcategories.is_empty());

    let chosen = Collection::create(
        CollectionDraft {
            id: Some("bridal".into()),
            name: Some("Bridal".into()),
            ..CollectionDraft::default()
        },
        &ctx(&existing, 0),
    )
    .unwrap();
    assert_eq!(chosen.id, "bridal");
}

#[test]
fn test_content_merge_is_shallow() {
    let mut content: SiteContent = serde_json::from_value(json!({
        "siteName": "Saree House",
        "social": { "instagram": "a", "facebook": "b" }
    }))
    .unwrap();
    let patch = json!({ "social": { "instagram": "c" } });
    content.merge(patch.as_object().cloned().unwrap(), "now");

    assert_eq!(
        content.to_value(),
        json!({
            "siteName": "Saree House",
            "social": { "instagram": "c" },
            "updatedAt": "now"
        })
    );
}
