// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Catalog service: read-modify-commit over the repository store.
//!
//! ```text
//! list / content          read_file(branch) -> decode
//!
//! every write             resolve_base -> head H
//!                         read_file(H) -> merge -> ChangeSet
//!                         -> CommitBuilder::commit_batch_on(H)
//!   create/update/delete  one records file
//!   update_content        shallow merge of the content file
//!   apply_batch           each named file, merge policy, changed paths only
//! ```
//!
//! Writes read at the commit they build on, so a save that lands in
//! between fails the guarded ref update instead of being overwritten.

#[cfg(test)]
mod tests;

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::batch::{BatchRequest, BatchResponse, ContentChange, stage_content, stage_records};
use crate::catalog::ids::timestamp;
use crate::catalog::{
    Category, Collection, ContentPatch, CreateContext, HeroSlide, Product, Record, RecordFile,
    ResourceKind, SiteContent, decode_records,
};
use crate::commit::{ChangeSet, CommitBuilder, CommitOutcome};
use crate::error::{AdminError, AdminResult, ValidationError};
use crate::store::{Head, ObjectId, RepoStore};

/// Every resource as stored on the branch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub hero: Vec<HeroSlide>,
    pub collections: Vec<Collection>,
    pub content: SiteContent,
}

/// Storefront catalog backed by one branch of a repository.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RepoStore>,
    branch: String,
    init_missing_branch: bool,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("branch", &self.branch)
            .field("init_missing_branch", &self.init_missing_branch)
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    #[must_use]
    pub fn new(store: Arc<dyn RepoStore>, branch: impl Into<String>) -> Self {
        Self {
            store,
            branch: branch.into(),
            init_missing_branch: false,
        }
    }

    /// Create the branch on first write if it does not exist.
    #[must_use]
    pub const fn init_missing_branch(mut self, enabled: bool) -> Self {
        self.init_missing_branch = enabled;
        self
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Check the repository is reachable with the configured credential.
    ///
    /// # Errors
    ///
    /// Returns the store error unchanged.
    pub async fn ping(&self) -> AdminResult<()> {
        self.store.ping().await
    }

    /// Commit the branch currently points at.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::RefNotFound` if the branch does not exist.
    pub async fn head(&self) -> AdminResult<ObjectId> {
        self.store.branch_head(&self.branch).await
    }

    async fn read(&self, kind: ResourceKind) -> AdminResult<Option<Vec<u8>>> {
        self.store.read_file(&self.branch, kind.path()).await
    }

    /// A file as of `base`; nothing exists on a branch yet to be created.
    async fn read_at(
        &self,
        base: Option<&Head>,
        kind: ResourceKind,
    ) -> AdminResult<Option<Vec<u8>>> {
        match base {
            Some(head) => self.store.read_file(head.commit.as_str(), kind.path()).await,
            None => Ok(None),
        }
    }

    async fn load<R: Record>(&self) -> AdminResult<Vec<R>> {
        let bytes = self.read(R::KIND).await?;
        decode_records(bytes.as_deref())
    }

    async fn load_at<R: Record>(&self, base: Option<&Head>) -> AdminResult<RecordFile<R>> {
        let bytes = self.read_at(base, R::KIND).await?;
        RecordFile::decode(bytes.as_deref())
    }

    async fn content_at(&self, base: Option<&Head>) -> AdminResult<SiteContent> {
        let bytes = self.read_at(base, ResourceKind::Content).await?;
        SiteContent::decode(bytes.as_deref())
    }

    fn builder(&self) -> CommitBuilder<'_> {
        CommitBuilder::new(self.store.as_ref(), self.branch.as_str())
            .init_missing_branch(self.init_missing_branch)
    }

    /// All records of a resource, in listing order.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if the file cannot be read or decoded.
    pub async fn list<R: Record>(&self) -> AdminResult<Vec<R>> {
        let mut records = self.load::<R>().await?;
        R::sort_for_listing(&mut records);
        Ok(records)
    }

    /// The site content object.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if the file cannot be read or decoded.
    pub async fn content(&self) -> AdminResult<SiteContent> {
        let bytes = self.read(ResourceKind::Content).await?;
        SiteContent::decode(bytes.as_deref())
    }

    /// Every resource at once, read concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first read failure.
    pub async fn snapshot(&self) -> AdminResult<CatalogSnapshot> {
        let (products, categories, hero, collections, content) = tokio::try_join!(
            self.list::<Product>(),
            self.list::<Category>(),
            self.list::<HeroSlide>(),
            self.list::<Collection>(),
            self.content(),
        )?;
        Ok(CatalogSnapshot {
            products,
            categories,
            hero,
            collections,
            content,
        })
    }

    /// Add one record and commit its file.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a rejected draft, or the commit error.
    pub async fn create<R: Record>(&self, draft: R::Draft) -> AdminResult<R> {
        let now = Utc::now();
        let mut builder = self.builder();
        let base = builder.resolve_base().await?;
        let file = self.load_at::<R>(base.as_ref()).await?;
        let mut records = file.records().to_vec();
        let record = R::create(
            draft,
            &CreateContext {
                existing: &records,
                now,
                sequence: 0,
            },
        )?;
        records.push(record.clone());
        write_records(&mut builder, base, &file, &records).await?;
        info!(resource = %R::KIND, id = record.id(), "created");
        Ok(record)
    }

    /// Merge `patch` into the record with `id` and commit its file.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotFound` for an unknown id.
    pub async fn update<R: Record>(&self, id: &str, patch: &R::Patch) -> AdminResult<R> {
        let now = timestamp(Utc::now());
        let mut builder = self.builder();
        let base = builder.resolve_base().await?;
        let file = self.load_at::<R>(base.as_ref()).await?;
        let mut records = file.records().to_vec();
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| not_found::<R>(id))?;
        record.apply(patch, &now);
        let updated = record.clone();
        write_records(&mut builder, base, &file, &records).await?;
        info!(resource = %R::KIND, id, "updated");
        Ok(updated)
    }

    /// Remove the record with `id` and commit its file.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotFound` for an unknown id.
    pub async fn delete<R: Record>(&self, id: &str) -> AdminResult<()> {
        let mut builder = self.builder();
        let base = builder.resolve_base().await?;
        let file = self.load_at::<R>(base.as_ref()).await?;
        let mut records = file.records().to_vec();
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(not_found::<R>(id));
        }
        write_records(&mut builder, base, &file, &records).await?;
        info!(resource = %R::KIND, id, "deleted");
        Ok(())
    }

    /// Shallow-merge `patch` into the site content and commit it.
    ///
    /// # Errors
    ///
    /// Returns the read or commit error.
    pub async fn update_content(&self, patch: ContentPatch) -> AdminResult<SiteContent> {
        let mut builder = self.builder();
        let base = builder.resolve_base().await?;
        let mut content = self.content_at(base.as_ref()).await?;
        content.merge(patch, &timestamp(Utc::now()));
        let mut changes = ChangeSet::new();
        changes.insert(ResourceKind::Content.path(), content.to_value());
        builder
            .commit_batch_on(base, &single_message(ResourceKind::Content), &changes)
            .await?;
        Ok(content)
    }

    /// Apply a batch request in a single commit.
    ///
    /// Only files whose content actually changes are written; when none
    /// do, no commit is created.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a rejected draft, or the read or
    /// commit error. Nothing is written on error.
    pub async fn apply_batch(&self, request: &BatchRequest) -> AdminResult<BatchResponse> {
        let now = Utc::now();
        let mut changes = ChangeSet::new();
        let mut results = BTreeMap::new();
        let mut builder = self.builder();
        let base = builder.resolve_base().await?;
        let at = base.as_ref();

        if let Some(products) = &request.products {
            let stored = self.load_at::<Product>(at).await?;
            stage_records(&stored, products, now, &mut changes, &mut results)?;
        }
        if let Some(hero) = &request.hero {
            let stored = self.load_at::<HeroSlide>(at).await?;
            stage_records(&stored, hero, now, &mut changes, &mut results)?;
        }
        if let Some(ContentChange {
            update: Some(replacement),
        }) = &request.content
        {
            let stored = self.content_at(at).await?;
            stage_content(&stored, replacement, &mut changes, &mut results);
        }
        if let Some(categories) = &request.categories {
            let stored = self.load_at::<Category>(at).await?;
            stage_records(&stored, categories, now, &mut changes, &mut results)?;
        }
        if let Some(collections) = &request.collections {
            let stored = self.load_at::<Collection>(at).await?;
            stage_records(&stored, collections, now, &mut changes, &mut results)?;
        }

        debug!(
            requested = request.resources().len(),
            changed = changes.len(),
            "batch staged"
        );
        let message = format!("Batch update via admin panel - {}", timestamp(now));
        let outcome = builder.commit_batch_on(base, &message, &changes).await?;
        Ok(BatchResponse::new(&outcome, results))
    }
}

async fn write_records<R: Record>(
    builder: &mut CommitBuilder<'_>,
    base: Option<Head>,
    file: &RecordFile<R>,
    records: &[R],
) -> AdminResult<CommitOutcome> {
    let mut changes = ChangeSet::new();
    changes.insert(R::KIND.path(), file.encode(records)?);
    builder
        .commit_batch_on(base, &single_message(R::KIND), &changes)
        .await
}

fn single_message(kind: ResourceKind) -> String {
    format!(
        "Update {} via admin panel - {}",
        kind.path(),
        timestamp(Utc::now())
    )
}

fn not_found<R: Record>(id: &str) -> AdminError {
    ValidationError::NotFound {
        resource: R::KIND.name(),
        id: id.to_string(),
    }
    .into()
}
