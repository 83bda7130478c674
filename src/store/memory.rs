// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-process repository with content-addressed objects.
//!
//! Behaves like the Git Data API for the operations the commit builder
//! uses: identical blobs share an id, trees layer over a base tree, and the
//! branch ref only moves from the commit the caller expects. Mutation
//! calls are counted and a single failure point can be armed.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::{ObjectId, RepoMutation, RepoQuery, TreeEntry};
use crate::error::{AdminResult, RemoteError};

/// Operation at which an armed failure fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    ReadTree,
    CreateBlob,
    CreateTree,
    CreateCommit,
    UpdateRef,
}

/// Number of mutation calls seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounters {
    pub blobs: usize,
    pub trees: usize,
    pub commits: usize,
    pub ref_updates: usize,
    pub ref_creates: usize,
}

impl CallCounters {
    /// Total mutation calls of any kind.
    #[must_use]
    pub const fn mutations(&self) -> usize {
        self.blobs + self.trees + self.commits + self.ref_updates + self.ref_creates
    }
}

#[derive(Debug, Clone)]
struct StoredCommit {
    tree: ObjectId,
    parents: Vec<ObjectId>,
    message: String,
}

#[derive(Debug, Default)]
struct Inner {
    blobs: HashMap<ObjectId, Vec<u8>>,
    trees: HashMap<ObjectId, BTreeMap<String, TreeEntry>>,
    commits: HashMap<ObjectId, StoredCommit>,
    refs: BTreeMap<String, ObjectId>,
    sequence: u64,
    counters: CallCounters,
    fail_at: Option<FailPoint>,
}

impl Inner {
    fn check(&mut self, point: FailPoint) -> AdminResult<()> {
        if self.fail_at == Some(point) {
            self.fail_at = None;
            return Err(RemoteError::Unavailable {
                status: Some(500),
                message: format!("injected failure at {point:?}"),
            }
            .into());
        }
        Ok(())
    }

    fn put_blob(&mut self, content: &[u8]) -> ObjectId {
        let id = hash_object("blob", content);
        self.blobs.entry(id.clone()).or_insert_with(|| content.to_vec());
        id
    }

    fn put_tree(&mut self, entries: BTreeMap<String, TreeEntry>) -> ObjectId {
        let mut listing = Vec::new();
        for entry in entries.values() {
            listing.extend_from_slice(entry.mode.as_bytes());
            listing.push(b' ');
            listing.extend_from_slice(entry.path.as_bytes());
            listing.push(0);
            listing.extend_from_slice(entry.id.as_str().as_bytes());
        }
        let id = hash_object("tree", &listing);
        self.trees.entry(id.clone()).or_insert(entries);
        id
    }

    fn put_commit(&mut self, message: &str, tree: &ObjectId, parents: &[ObjectId]) -> ObjectId {
        self.sequence += 1;
        let mut body = format!("tree {tree}\n");
        for parent in parents {
            let _ = writeln!(body, "parent {parent}");
        }
        let _ = write!(body, "sequence {}\n\n{message}", self.sequence);
        let id = hash_object("commit", body.as_bytes());
        self.commits.insert(
            id.clone(),
            StoredCommit {
                tree: tree.clone(),
                parents: parents.to_vec(),
                message: message.to_string(),
            },
        );
        id
    }

    fn tree_of_branch(&self, branch: &str) -> Option<&BTreeMap<String, TreeEntry>> {
        let commit = self.refs.get(branch)?;
        self.tree_of_commit(commit)
    }

    fn tree_of_commit(&self, commit: &ObjectId) -> Option<&BTreeMap<String, TreeEntry>> {
        let tree = &self.commits.get(commit)?.tree;
        self.trees.get(tree)
    }

    /// Branch names win over commit ids, as with the Contents API.
    fn tree_at(&self, reference: &str) -> Option<&BTreeMap<String, TreeEntry>> {
        self.tree_of_branch(reference)
            .or_else(|| self.tree_of_commit(&ObjectId::new(reference)))
    }
}

fn hash_object(kind: &str, content: &[u8]) -> ObjectId {
    let mut hasher = Sha256::new();
    hasher.update(format!("{kind} {}\0", content.len()).as_bytes());
    hasher.update(content);
    ObjectId::new(hex::encode(hasher.finalize()))
}

/// In-memory [`RepoQuery`] + [`RepoMutation`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Empty store without any branch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one commit on `branch` containing `files`.
    #[must_use]
    pub fn with_files<I, P, C>(branch: &str, files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: AsRef<[u8]>,
    {
        let store = Self::new();
        store.seed(branch, files);
        store
    }

    /// Commit `files` on top of `branch` without touching the counters.
    ///
    /// Simulates a write made by someone else.
    pub fn seed<I, P, C>(&self, branch: &str, files: I) -> ObjectId
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: AsRef<[u8]>,
    {
        let mut inner = self.lock();
        let parent = inner.refs.get(branch).cloned();
        let mut entries = inner.tree_of_branch(branch).cloned().unwrap_or_default();
        for (path, content) in files {
            let path = path.into();
            let id = inner.put_blob(content.as_ref());
            entries.insert(path.clone(), TreeEntry::file(path, id));
        }
        let tree = inner.put_tree(entries);
        let parents: Vec<ObjectId> = parent.into_iter().collect();
        let commit = inner.put_commit("seed", &tree, &parents);
        inner.refs.insert(branch.to_string(), commit.clone());
        commit
    }

    /// Arm a one-shot failure at `point`.
    pub fn fail_at(&self, point: FailPoint) {
        self.lock().fail_at = Some(point);
    }

    /// Mutation calls seen so far.
    #[must_use]
    pub fn counters(&self) -> CallCounters {
        self.lock().counters
    }

    /// Commit the branch points at.
    #[must_use]
    pub fn head(&self, branch: &str) -> Option<ObjectId> {
        self.lock().refs.get(branch).cloned()
    }

    /// Parents of a commit.
    #[must_use]
    pub fn parents(&self, commit: &ObjectId) -> Vec<ObjectId> {
        self.lock()
            .commits
            .get(commit)
            .map(|c| c.parents.clone())
            .unwrap_or_default()
    }

    /// Message of a commit.
    #[must_use]
    pub fn message(&self, commit: &ObjectId) -> Option<String> {
        self.lock().commits.get(commit).map(|c| c.message.clone())
    }

    /// Entries of the tree at the tip of `branch`.
    #[must_use]
    pub fn entries(&self, branch: &str) -> Vec<TreeEntry> {
        self.lock()
            .tree_of_branch(branch)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Content of `path` at the tip of a branch or at a commit.
    #[must_use]
    pub fn file(&self, reference: &str, path: &str) -> Option<Vec<u8>> {
        let inner = self.lock();
        let entry = inner.tree_at(reference)?.get(path)?;
        inner.blobs.get(&entry.id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RepoQuery for MemoryStore {
    async fn ping(&self) -> AdminResult<()> {
        Ok(())
    }

    async fn branch_head(&self, branch: &str) -> AdminResult<ObjectId> {
        self.head(branch).ok_or_else(|| {
            RemoteError::RefNotFound {
                branch: branch.to_string(),
            }
            .into()
        })
    }

    async fn commit_tree(&self, commit: &ObjectId) -> AdminResult<ObjectId> {
        self.lock()
            .commits
            .get(commit)
            .map(|c| c.tree.clone())
            .ok_or_else(|| {
                RemoteError::MalformedResponse {
                    what: format!("commit {commit}"),
                    message: "no such commit".to_string(),
                }
                .into()
            })
    }

    async fn read_tree(&self, tree: &ObjectId) -> AdminResult<Vec<TreeEntry>> {
        let mut inner = self.lock();
        inner.check(FailPoint::ReadTree)?;
        inner
            .trees
            .get(tree)
            .map(|t| t.values().cloned().collect())
            .ok_or_else(|| {
                RemoteError::InvalidTree {
                    tree: tree.to_string(),
                    message: "no such tree".to_string(),
                }
                .into()
            })
    }

    async fn read_file(&self, reference: &str, path: &str) -> AdminResult<Option<Vec<u8>>> {
        Ok(self.file(reference, path))
    }
}

#[async_trait]
impl RepoMutation for MemoryStore {
    async fn create_blob(&self, content: &[u8]) -> AdminResult<ObjectId> {
        let mut inner = self.lock();
        inner.counters.blobs += 1;
        inner.check(FailPoint::CreateBlob)?;
        Ok(inner.put_blob(content))
    }

    async fn create_tree(
        &self,
        base: Option<&ObjectId>,
        entries: &[TreeEntry],
    ) -> AdminResult<ObjectId> {
        let mut inner = self.lock();
        inner.counters.trees += 1;
        inner.check(FailPoint::CreateTree)?;

        let mut merged = match base {
            Some(base) => inner.trees.get(base).cloned().ok_or_else(|| {
                RemoteError::InvalidTree {
                    tree: base.to_string(),
                    message: "base tree does not exist".to_string(),
                }
            })?,
            None => BTreeMap::new(),
        };
        for entry in entries {
            if !inner.blobs.contains_key(&entry.id) && entry.is_blob() {
                return Err(RemoteError::Unavailable {
                    status: Some(422),
                    message: format!("tree entry {} references unknown blob", entry.path),
                }
                .into());
            }
            merged.insert(entry.path.clone(), entry.clone());
        }
        Ok(inner.put_tree(merged))
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &ObjectId,
        parents: &[ObjectId],
    ) -> AdminResult<ObjectId> {
        let mut inner = self.lock();
        inner.counters.commits += 1;
        inner.check(FailPoint::CreateCommit)?;
        if !inner.trees.contains_key(tree) {
            return Err(RemoteError::Unavailable {
                status: Some(422),
                message: format!("tree {tree} does not exist"),
            }
            .into());
        }
        Ok(inner.put_commit(message, tree, parents))
    }

    async fn update_ref(
        &self,
        branch: &str,
        expected: &ObjectId,
        commit: &ObjectId,
    ) -> AdminResult<()> {
        let mut inner = self.lock();
        inner.counters.ref_updates += 1;
        inner.check(FailPoint::UpdateRef)?;

        let Some(current) = inner.refs.get(branch) else {
            return Err(RemoteError::RefNotFound {
                branch: branch.to_string(),
            }
            .into());
        };
        if current != expected {
            return Err(RemoteError::RefUpdateConflict {
                branch: branch.to_string(),
            }
            .into());
        }
        debug!(branch, from = %expected.short(), to = %commit.short(), "moving branch");
        inner.refs.insert(branch.to_string(), commit.clone());
        Ok(())
    }

    async fn create_ref(&self, branch: &str, commit: &ObjectId) -> AdminResult<()> {
        let mut inner = self.lock();
        inner.counters.ref_creates += 1;
        if inner.refs.contains_key(branch) {
            return Err(RemoteError::RefUpdateConflict {
                branch: branch.to_string(),
            }
            .into());
        }
        inner.refs.insert(branch.to_string(), commit.clone());
        Ok(())
    }
}
