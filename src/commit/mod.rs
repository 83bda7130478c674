// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Atomic multi-file commit builder.
//!
//! ```text
//! ChangeSet { path -> JSON }
//!      |
//!      v
//! Idle -> ResolvingHead -> UploadingBlobs -> BuildingTree
//!      -> CreatingCommit -> UpdatingRef -> Done
//!                 \ any step fails -> Failed(reason)
//!
//! resolve_head    ref -> commit -> root tree (or a base from the caller)
//! upload_blobs    one blob per path, concurrent, all awaited
//! build_tree      base blobs minus changed paths + changed entries
//! create_commit   single parent = old head
//! update_ref      non-forced; a moved branch is RefUpdateConflict
//! ```
//!
//! Nothing before `update_ref` is visible to readers of the branch. Objects
//! created by a run that fails later stay unreferenced on the remote.


use futures_util::future::try_join_all;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, error, info};

use crate::error::{AdminError, AdminResult, ValidationError};
use crate::store::{Head, ObjectId, RepoStore, TreeEntry};

/// Files to write in one commit, keyed by repository path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    files: BTreeMap<String, Value>,
}

impl ChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `content` for `path`, replacing anything staged before.
    pub fn insert(&mut self, path: impl Into<String>, content: Value) {
        self.files.insert(path.into(), content);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.files.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Serialize a file the way the storefront expects it: two-space
/// indentation, keys in insertion order.
///
/// # Errors
///
/// Returns `ValidationError::InvalidBody` if the value cannot be serialized.
pub fn render(content: &Value) -> AdminResult<Vec<u8>> {
    serde_json::to_vec_pretty(content)
        .map_err(|e| ValidationError::InvalidBody(format!("cannot serialize content: {e}")).into())
}

/// Progress of a [`CommitBuilder`] run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    ResolvingHead,
    UploadingBlobs,
    BuildingTree,
    CreatingCommit,
    UpdatingRef,
    Done,
    Failed(String),
}

impl fmt::Display for SaveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::ResolvingHead => write!(f, "resolving head"),
            Self::UploadingBlobs => write!(f, "uploading blobs"),
            Self::BuildingTree => write!(f, "building tree"),
            Self::CreatingCommit => write!(f, "creating commit"),
            Self::UpdatingRef => write!(f, "updating ref"),
            Self::Done => write!(f, "done"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Result of [`CommitBuilder::commit_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// New branch head, `None` when there was nothing to commit.
    pub commit: Option<ObjectId>,
    /// Head the commit was built on, `None` for a root commit.
    pub parent: Option<ObjectId>,
    /// Paths written by the commit.
    pub paths: Vec<String>,
}

impl CommitOutcome {
    const fn unchanged() -> Self {
        Self {
            commit: None,
            parent: None,
            paths: Vec::new(),
        }
    }
}

/// Builds one commit out of several file changes on a single branch.
///
/// # Example
/// ```ignore
/// let mut builder = CommitBuilder::new(store.as_ref(), "main");
/// let outcome = builder.commit_batch("Batch update", &changes).await?;
/// ```
pub struct CommitBuilder<'a> {
    store: &'a dyn RepoStore,
    branch: String,
    init_missing_branch: bool,
    state: SaveState,
}

impl<'a> CommitBuilder<'a> {
    #[must_use]
    pub fn new(store: &'a dyn RepoStore, branch: impl Into<String>) -> Self {
        Self {
            store,
            branch: branch.into(),
            init_missing_branch: false,
            state: SaveState::Idle,
        }
    }

    /// Create the branch with a root commit when it does not exist yet.
    #[must_use]
    pub const fn init_missing_branch(mut self, enabled: bool) -> Self {
        self.init_missing_branch = enabled;
        self
    }

    #[must_use]
    pub const fn state(&self) -> &SaveState {
        &self.state
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    fn enter(&mut self, state: SaveState) {
        debug!(branch = %self.branch, %state, "commit step");
        self.state = state;
    }

    /// Read the branch head and its root tree.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::RefNotFound` if the branch does not exist.
    pub async fn resolve_head(&self) -> AdminResult<Head> {
        let commit = self.store.branch_head(&self.branch).await?;
        let tree = self.store.commit_tree(&commit).await?;
        debug!(branch = %self.branch, commit = %commit.short(), tree = %tree.short(), "resolved head");
        Ok(Head { commit, tree })
    }

    /// Store one file's bytes as a blob.
    ///
    /// # Errors
    ///
    /// Returns the store error unchanged.
    pub async fn upload_blob(&self, bytes: &[u8]) -> AdminResult<ObjectId> {
        self.store.create_blob(bytes).await
    }

    /// Render and upload every file of `changes` concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first failure; the remaining uploads are dropped.
    pub async fn upload_blobs(&self, changes: &ChangeSet) -> AdminResult<BTreeMap<String, ObjectId>> {
        let uploads = changes.iter().map(|(path, content)| async move {
            let bytes = render(content)?;
            let id = self.upload_blob(&bytes).await?;
            debug!(path, blob = %id.short(), size = bytes.len(), "uploaded blob");
            Ok::<_, AdminError>((path.to_string(), id))
        });
        Ok(try_join_all(uploads).await?.into_iter().collect())
    }

    /// Create a tree holding the base tree's files with `changed` applied.
    ///
    /// Subtree and submodule entries of the base listing are not copied;
    /// the remote rebuilds them from `base_tree`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidTree` if the base listing is unusable.
    pub async fn build_tree(
        &self,
        base: Option<&ObjectId>,
        changed: &BTreeMap<String, ObjectId>,
    ) -> AdminResult<ObjectId> {
        let mut entries = Vec::new();
        if let Some(base) = base {
            let listing = self.store.read_tree(base).await?;
            entries.extend(
                listing
                    .into_iter()
                    .filter(|e| e.is_blob() && !changed.contains_key(&e.path)),
            );
        }
        let kept = entries.len();
        entries.extend(
            changed
                .iter()
                .map(|(path, id)| TreeEntry::file(path.clone(), id.clone())),
        );
        let tree = self.store.create_tree(base, &entries).await?;
        debug!(tree = %tree.short(), kept, changed = changed.len(), "built tree");
        Ok(tree)
    }

    /// Create a commit with at most one parent.
    ///
    /// # Errors
    ///
    /// Returns the store error unchanged.
    pub async fn create_commit(
        &self,
        message: &str,
        tree: &ObjectId,
        parent: Option<&ObjectId>,
    ) -> AdminResult<ObjectId> {
        let parents: Vec<ObjectId> = parent.cloned().into_iter().collect();
        self.store.create_commit(message, tree, &parents).await
    }

    /// Move the branch from `expected` to `commit`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::RefUpdateConflict` if the branch moved.
    pub async fn update_ref(&self, expected: &ObjectId, commit: &ObjectId) -> AdminResult<()> {
        self.store.update_ref(&self.branch, expected, commit).await
    }

    /// Head to build on, `None` when the branch is missing and may be
    /// created.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::RefNotFound` for a missing branch unless
    /// branch creation is enabled.
    pub async fn resolve_base(&self) -> AdminResult<Option<Head>> {
        match self.resolve_head().await {
            Ok(head) => Ok(Some(head)),
            Err(err) if self.init_missing_branch && err.is_ref_not_found() => {
                info!(branch = %self.branch, "branch missing, creating root commit");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Write every file of `changes` in exactly one commit on the current
    /// branch head.
    ///
    /// An empty change set succeeds without contacting the store.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step. The branch is left
    /// untouched unless the final ref update succeeded.
    pub async fn commit_batch(
        &mut self,
        message: &str,
        changes: &ChangeSet,
    ) -> AdminResult<CommitOutcome> {
        if changes.is_empty() {
            return Ok(self.unchanged());
        }
        self.enter(SaveState::ResolvingHead);
        let base = self.resolve_base().await;
        match base {
            Ok(base) => self.commit_batch_on(base, message, changes).await,
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Write `changes` in one commit whose parent is `base`.
    ///
    /// `base` must be the head the changes were computed from. The ref
    /// update only succeeds while the branch still points at it, so a
    /// write that landed after `base` was read is a
    /// `RemoteError::RefUpdateConflict` rather than a lost update. `None`
    /// creates the branch with a root commit.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step. The branch is left
    /// untouched unless the final ref update succeeded.
    pub async fn commit_batch_on(
        &mut self,
        base: Option<Head>,
        message: &str,
        changes: &ChangeSet,
    ) -> AdminResult<CommitOutcome> {
        if changes.is_empty() {
            return Ok(self.unchanged());
        }
        match self.run(base, message, changes).await {
            Ok(outcome) => {
                self.enter(SaveState::Done);
                Ok(outcome)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn unchanged(&mut self) -> CommitOutcome {
        debug!(branch = %self.branch, "nothing to commit");
        self.enter(SaveState::Done);
        CommitOutcome::unchanged()
    }

    fn fail(&mut self, err: AdminError) -> AdminError {
        error!(branch = %self.branch, step = %self.state, error = %err, "commit failed");
        self.state = SaveState::Failed(err.to_string());
        err
    }

    async fn run(
        &mut self,
        head: Option<Head>,
        message: &str,
        changes: &ChangeSet,
    ) -> AdminResult<CommitOutcome> {
        self.enter(SaveState::UploadingBlobs);
        let blobs = self.upload_blobs(changes).await?;

        self.enter(SaveState::BuildingTree);
        let tree = self
            .build_tree(head.as_ref().map(|h| &h.tree), &blobs)
            .await?;

        self.enter(SaveState::CreatingCommit);
        let parent = head.map(|h| h.commit);
        let commit = self.create_commit(message, &tree, parent.as_ref()).await?;

        self.enter(SaveState::UpdatingRef);
        match &parent {
            Some(expected) => self.update_ref(expected, &commit).await?,
            None => self.store.create_ref(&self.branch, &commit).await?,
        }

        let paths: Vec<String> = blobs.into_keys().collect();
        info!(
            branch = %self.branch,
            commit = %commit.short(),
            files = paths.len(),
            "committed"
        );
        Ok(CommitOutcome {
            commit: Some(commit),
            parent,
            paths,
        })
    }
}
