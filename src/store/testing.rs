// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! [`MemoryStore`] wrapper that runs a hook before every file read.

use async_trait::async_trait;

use super::memory::MemoryStore;
use super::{ObjectId, RepoMutation, RepoQuery, TreeEntry};
use crate::error::AdminResult;

type ReadHook = Box<dyn Fn(&MemoryStore) -> AdminResult<()> + Send + Sync>;

pub(crate) struct HookedStore {
    pub(crate) inner: MemoryStore,
    before_read: ReadHook,
}

impl HookedStore {
    pub(crate) fn new(
        inner: MemoryStore,
        before_read: impl Fn(&MemoryStore) -> AdminResult<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner,
            before_read: Box::new(before_read),
        }
    }
}

#[async_trait]
impl RepoQuery for HookedStore {
    async fn ping(&self) -> AdminResult<()> {
        self.inner.ping().await
    }

    async fn branch_head(&self, branch: &str) -> AdminResult<ObjectId> {
        self.inner.branch_head(branch).await
    }

    async fn commit_tree(&self, commit: &ObjectId) -> AdminResult<ObjectId> {
        self.inner.commit_tree(commit).await
    }

    async fn read_tree(&self, tree: &ObjectId) -> AdminResult<Vec<TreeEntry>> {
        self.inner.read_tree(tree).await
    }

    async fn read_file(&self, reference: &str, path: &str) -> AdminResult<Option<Vec<u8>>> {
        (self.before_read)(&self.inner)?;
        self.inner.read_file(reference, path).await
    }
}

#[async_trait]
impl RepoMutation for HookedStore {
    async fn create_blob(&self, content: &[u8]) -> AdminResult<ObjectId> {
        self.inner.create_blob(content).await
    }

    async fn create_tree(
        &self,
        base: Option<&ObjectId>,
        entries: &[TreeEntry],
    ) -> AdminResult<ObjectId> {
        self.inner.create_tree(base, entries).await
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &ObjectId,
        parents: &[ObjectId],
    ) -> AdminResult<ObjectId> {
        self.inner.create_commit(message, tree, parents).await
    }

    async fn update_ref(
        &self,
        branch: &str,
        expected: &ObjectId,
        commit: &ObjectId,
    ) -> AdminResult<()> {
        self.inner.update_ref(branch, expected, commit).await
    }

    async fn create_ref(&self, branch: &str, commit: &ObjectId) -> AdminResult<()> {
        self.inner.create_ref(branch, commit).await
    }
}
