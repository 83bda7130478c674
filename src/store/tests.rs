// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::memory::{FailPoint, MemoryStore};
use super::{ObjectId, RepoMutation, RepoQuery, TreeEntry};
use crate::error::{AdminError, RemoteError};

#[test]
fn test_object_id_short() {
    let id = ObjectId::new("0123456789abcdef");
    assert_eq!(id.short(), "0123456");
    assert_eq!(ObjectId::new("abc").short(), "abc");
}

#[test]
fn test_tree_entry_serializes_like_the_api() {
    let entry = TreeEntry::file("data/products.json", ObjectId::new("abc123"));
    let json = serde_json::to_string(&entry).unwrap();
    insta::assert_snapshot!(json, @r#"{"path":"data/products.json","mode":"100644","type":"blob","sha":"abc123"}"#);
}

#[tokio::test]
async fn test_identical_blobs_share_an_id() {
    let store = MemoryStore::new();
    let a = store.create_blob(b"[]").await.unwrap();
    let b = store.create_blob(b"[]").await.unwrap();
    let c = store.create_blob(b"[1]").await.unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(store.counters().blobs, 3);
}

#[tokio::test]
async fn test_read_file_at_commit_ignores_later_writes() {
    let store = MemoryStore::with_files("main", [("data/products.json", "[]")]);
    let first = store.head("main").unwrap();
    store.seed("main", [("data/products.json", r#"[{"id":"p1"}]"#)]);

    let at_commit = store.read_file(first.as_str(), "data/products.json").await.unwrap();
    let at_branch = store.read_file("main", "data/products.json").await.unwrap();
    assert_eq!(at_commit.as_deref(), Some(&b"[]"[..]));
    assert_eq!(at_branch.as_deref(), Some(&br#"[{"id":"p1"}]"#[..]));
    assert!(store.read_file("feedface", "data/products.json").await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_branch_is_ref_not_found() {
    let store = MemoryStore::new();
    let err = store.branch_head("main").await.unwrap_err();
    assert!(matches!(
        err,
        AdminError::Remote(ref boxed) if matches!(**boxed, RemoteError::RefNotFound { .. })
    ));
    assert!(store.read_file("main", "data/products.json").await.unwrap().is_none());
}

#[tokio::test]
async fn test_tree_layers_over_base() {
    let store = MemoryStore::with_files("main", [("a.json", "1"), ("b.json", "2")]);
    let head = store.branch_head("main").await.unwrap();
    let base = store.commit_tree(&head).await.unwrap();

    let blob = store.create_blob(b"3").await.unwrap();
    let tree = store
        .create_tree(Some(&base), &[TreeEntry::file("b.json", blob.clone())])
        .await
        .unwrap();

    let entries = store.read_tree(&tree).await.unwrap();
    let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["a.json", "b.json"]);
    assert_eq!(entries[1].id, blob);
}

#[tokio::test]
async fn test_update_ref_rejects_stale_expectation() {
    let store = MemoryStore::with_files("main", [("a.json", "1")]);
    let stale = store.head("main").unwrap();
    store.seed("main", [("a.json", "2")]);

    let tree = store.commit_tree(&stale).await.unwrap();
    let commit = store.create_commit("mine", &tree, &[stale.clone()]).await.unwrap();
    let err = store.update_ref("main", &stale, &commit).await.unwrap_err();

    assert!(err.is_conflict());
    assert_ne!(store.head("main"), Some(commit));
}

#[tokio::test]
async fn test_fail_point_fires_once() {
    let store = MemoryStore::new();
    store.fail_at(FailPoint::CreateBlob);
    assert!(store.create_blob(b"x").await.is_err());
    assert!(store.create_blob(b"x").await.is_ok());
}
