// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote store abstraction layer.
//!
//! ```text
//! RepoQuery (read)       --> GitHubStore (REST API)
//! RepoMutation (write)   --> MemoryStore (in-process, tests/offline)
//!          \                /
//!           RepoStore (both, Arc<dyn RepoStore>)
//! ```
//!
//! Blobs, trees and commits are immutable once created. The branch ref is
//! the only mutable cell; `update_ref` is its single writer.

pub mod memory;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AdminResult;

/// Content hash identifying a blob, tree or commit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    #[must_use]
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First seven characters, for log output.
    #[must_use]
    pub fn short(&self) -> &str {
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current tip of a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Head {
    /// Commit the branch points at.
    pub commit: ObjectId,
    /// Root tree of that commit.
    pub tree: ObjectId,
}

/// Kind of object a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    /// Submodule gitlink.
    Commit,
}

/// Regular non-executable file mode.
pub const FILE_MODE: &str = "100644";

/// One entry of a (recursively flattened) tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(rename = "sha")]
    pub id: ObjectId,
}

impl TreeEntry {
    /// A regular file entry.
    #[must_use]
    pub fn file(path: impl Into<String>, id: ObjectId) -> Self {
        Self {
            path: path.into(),
            mode: FILE_MODE.to_string(),
            kind: EntryKind::Blob,
            id,
        }
    }

    #[must_use]
    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }
}

// --- Query Trait (Read-only operations) ---

/// Read-only operations against the remote repository.
#[async_trait]
pub trait RepoQuery: Send + Sync {
    /// Check the repository is reachable with the configured credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::RemoteRejected` on 401/403 and
    /// `RemoteError::Unavailable` otherwise.
    async fn ping(&self) -> AdminResult<()>;

    /// Commit the branch points at.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::RefNotFound` if the branch does not exist.
    async fn branch_head(&self, branch: &str) -> AdminResult<ObjectId>;

    /// Root tree of a commit.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if the commit cannot be read.
    async fn commit_tree(&self, commit: &ObjectId) -> AdminResult<ObjectId>;

    /// All entries of a tree, subtrees flattened into `dir/file` paths.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidTree` if the listing is malformed.
    async fn read_tree(&self, tree: &ObjectId) -> AdminResult<Vec<TreeEntry>>;

    /// Raw bytes of a file at `reference`, `None` if it does not exist.
    ///
    /// `reference` is a branch name or a commit id. Reads that feed a
    /// commit pass the commit id so they see exactly the base being
    /// committed on.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` for any failure other than "not found".
    async fn read_file(&self, reference: &str, path: &str) -> AdminResult<Option<Vec<u8>>>;
}

// --- Mutation Trait (Write operations) ---

/// Operations that create objects or move the branch.
#[async_trait]
pub trait RepoMutation: Send + Sync {
    /// Store bytes as a blob. Identical bytes yield the same id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::RemoteRejected` on 401/403, a `RemoteError` otherwise.
    async fn create_blob(&self, content: &[u8]) -> AdminResult<ObjectId>;

    /// Create a tree from `entries`, layered over `base` when given.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if the tree cannot be created.
    async fn create_tree(
        &self,
        base: Option<&ObjectId>,
        entries: &[TreeEntry],
    ) -> AdminResult<ObjectId>;

    /// Create a commit object.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if the commit cannot be created.
    async fn create_commit(
        &self,
        message: &str,
        tree: &ObjectId,
        parents: &[ObjectId],
    ) -> AdminResult<ObjectId>;

    /// Move `branch` from `expected` to `commit`.
    ///
    /// Only fast-forward updates are accepted.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::RefUpdateConflict` if the branch no longer
    /// points at `expected`.
    async fn update_ref(
        &self,
        branch: &str,
        expected: &ObjectId,
        commit: &ObjectId,
    ) -> AdminResult<()>;

    /// Create a new branch pointing at `commit`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::RefUpdateConflict` if the branch already exists.
    async fn create_ref(&self, branch: &str, commit: &ObjectId) -> AdminResult<()>;
}

/// Full read/write access to a repository.
pub trait RepoStore: RepoQuery + RepoMutation {}

impl<T: RepoQuery + RepoMutation + ?Sized> RepoStore for T {}
