// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Request and response bodies of the GitHub REST API.
//!
//! Only the fields the store reads are declared; serde ignores the rest.

use serde::{Deserialize, Serialize};

use crate::store::{ObjectId, TreeEntry};

/// Object a ref points at (`GET /git/ref/heads/{branch}`).
#[derive(Debug, Deserialize)]
pub struct RefResponse {
    pub object: ShaRef,
}

/// Anything identified by a `sha` field.
#[derive(Debug, Deserialize)]
pub struct ShaRef {
    pub sha: ObjectId,
}

/// `GET /git/commits/{sha}`.
#[derive(Debug, Deserialize)]
pub struct CommitResponse {
    pub sha: ObjectId,
    pub tree: ShaRef,
}

/// `GET /git/trees/{sha}?recursive=1`.
#[derive(Debug, Deserialize)]
pub struct TreeResponse {
    pub sha: ObjectId,
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

/// `GET /contents/{path}` for a single file.
///
/// For files above one megabyte `content` is empty and `encoding` is
/// `"none"`; the bytes must then be fetched from the blob endpoint.
#[derive(Debug, Deserialize)]
pub struct ContentsResponse {
    pub sha: ObjectId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

/// `GET /git/blobs/{sha}`.
#[derive(Debug, Deserialize)]
pub struct BlobResponse {
    pub content: String,
    pub encoding: String,
}

/// Error body GitHub sends with non-2xx answers.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// `POST /git/blobs`.
#[derive(Debug, Serialize)]
pub struct NewBlob<'a> {
    pub content: &'a str,
    pub encoding: &'static str,
}

/// `POST /git/trees`.
#[derive(Debug, Serialize)]
pub struct NewTree<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_tree: Option<&'a ObjectId>,
    pub tree: &'a [TreeEntry],
}

/// `POST /git/commits`.
#[derive(Debug, Serialize)]
pub struct NewCommit<'a> {
    pub message: &'a str,
    pub tree: &'a ObjectId,
    pub parents: &'a [ObjectId],
}

/// `PATCH /git/refs/heads/{branch}`.
#[derive(Debug, Serialize)]
pub struct RefUpdate<'a> {
    pub sha: &'a ObjectId,
    pub force: bool,
}

/// `POST /git/refs`.
#[derive(Debug, Serialize)]
pub struct NewRef<'a> {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: &'a ObjectId,
}
