// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pending changes of one admin session.
//!
//! The session keeps the catalog as last loaded plus, per resource, the
//! creates, updates and deletes staged since. Nothing reaches the
//! repository until [`AdminSession::flush`], which sends everything as one
//! batch.
//!
//! ```text
//! stage_create  -> temp_<ms>[_n] id, draft queued
//! stage_update  temp id  -> folded into the queued draft
//!               real id  -> queued, replacing an earlier update
//! stage_delete  temp id  -> queued draft dropped
//!               real id  -> queued delete, pending update dropped
//! flush         ok  -> pending cleared, catalog reloaded
//!                      (reload failure only marks the session stale)
//!               err -> pending kept for a retry
//! ```

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::batch::{BatchRequest, BatchResponse, ContentChange, ResourceChanges};
use crate::catalog::ids::{is_temporary, temporary_id, timestamp};
use crate::catalog::{Category, Collection, HeroSlide, Patch, Product, Record, SiteContent};
use crate::error::{AdminResult, ValidationError};
use crate::service::{CatalogService, CatalogSnapshot};

/// Changes staged for one resource.
#[derive(Debug, Clone)]
pub struct PendingResource<R: Record> {
    create: Vec<(String, R::Draft)>,
    update: Vec<R::Patch>,
    delete: Vec<String>,
}

impl<R: Record> Default for PendingResource<R> {
    fn default() -> Self {
        Self {
            create: Vec::new(),
            update: Vec::new(),
            delete: Vec::new(),
        }
    }
}

impl<R: Record> PendingResource<R> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.create.len() + self.update.len() + self.delete.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drafts waiting to be created, keyed by their temporary id.
    #[must_use]
    pub fn creates(&self) -> &[(String, R::Draft)] {
        &self.create
    }

    #[must_use]
    pub fn updates(&self) -> &[R::Patch] {
        &self.update
    }

    #[must_use]
    pub fn deletes(&self) -> &[String] {
        &self.delete
    }

    fn stage_update(&mut self, patch: R::Patch) {
        let id = patch.target_id().to_string();
        if let Some((_, draft)) = self.create.iter_mut().find(|(temp, _)| *temp == id) {
            R::patch_draft(draft, &patch);
            return;
        }
        match self.update.iter_mut().find(|p| p.target_id() == id) {
            Some(queued) => *queued = patch,
            None => self.update.push(patch),
        }
    }

    fn stage_delete(&mut self, id: &str) {
        if is_temporary(id) {
            self.create.retain(|(temp, _)| temp != id);
            return;
        }
        self.update.retain(|p| p.target_id() != id);
        if !self.delete.iter().any(|d| d == id) {
            self.delete.push(id.to_string());
        }
    }

    fn to_changes(&self) -> ResourceChanges<R> {
        ResourceChanges {
            create: self.create.iter().map(|(_, draft)| draft.clone()).collect(),
            update: self
                .update
                .iter()
                .filter(|p| !is_temporary(p.target_id()))
                .cloned()
                .collect(),
            delete: self
                .delete
                .iter()
                .filter(|id| !is_temporary(id))
                .cloned()
                .collect(),
        }
    }

    /// `original` with the staged changes laid over it, as JSON objects.
    ///
    /// Staged drafts are listed last under their temporary ids.
    fn preview(&self, original: &[R], now: &str) -> AdminResult<Vec<Value>> {
        let mut rows = Vec::with_capacity(original.len() + self.create.len());
        for record in original {
            if self.delete.iter().any(|d| d == record.id()) {
                continue;
            }
            let mut record = record.clone();
            if let Some(patch) = self.update.iter().find(|p| p.target_id() == record.id()) {
                record.apply(patch, now);
            }
            rows.push(to_json(&record)?);
        }
        for (temp, draft) in &self.create {
            let mut row = Map::new();
            row.insert("id".to_string(), Value::String(temp.clone()));
            if let Value::Object(fields) = to_json(draft)? {
                for (key, value) in fields {
                    row.entry(key).or_insert(value);
                }
            }
            rows.push(Value::Object(row));
        }
        Ok(rows)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> AdminResult<Value> {
    serde_json::to_value(value).map_err(|e| ValidationError::InvalidBody(e.to_string()).into())
}

/// A resource that can be staged in an [`AdminSession`].
pub trait SessionResource: Record {
    fn pending(session: &AdminSession) -> &PendingResource<Self>;
    fn pending_mut(session: &mut AdminSession) -> &mut PendingResource<Self>;
    fn original(snapshot: &CatalogSnapshot) -> &[Self];
}

macro_rules! session_resource {
    ($record:ty, $field:ident) => {
        impl SessionResource for $record {
            fn pending(session: &AdminSession) -> &PendingResource<Self> {
                &session.$field
            }

            fn pending_mut(session: &mut AdminSession) -> &mut PendingResource<Self> {
                &mut session.$field
            }

            fn original(snapshot: &CatalogSnapshot) -> &[Self] {
                &snapshot.$field
            }
        }
    };
}

session_resource!(Product, products);
session_resource!(Category, categories);
session_resource!(HeroSlide, hero);
session_resource!(Collection, collections);

/// Catalog as loaded plus everything staged since.
#[derive(Debug, Clone, Default)]
pub struct AdminSession {
    original: CatalogSnapshot,
    products: PendingResource<Product>,
    categories: PendingResource<Category>,
    hero: PendingResource<HeroSlide>,
    collections: PendingResource<Collection>,
    content: Option<SiteContent>,
    sequence: u64,
    stale: bool,
}

impl AdminSession {
    /// Session over an already loaded catalog.
    #[must_use]
    pub fn new(original: CatalogSnapshot) -> Self {
        Self {
            original,
            ..Self::default()
        }
    }

    /// Load the catalog from `service` and start with nothing staged.
    ///
    /// # Errors
    ///
    /// Returns the first read failure.
    pub async fn load(service: &CatalogService) -> AdminResult<Self> {
        Ok(Self::new(service.snapshot().await?))
    }

    /// The catalog as last loaded.
    #[must_use]
    pub const fn original(&self) -> &CatalogSnapshot {
        &self.original
    }

    /// True when a flush committed but the catalog could not be reloaded
    /// afterwards, so [`Self::original`] predates that commit.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Replace the loaded catalog with the branch as it is now.
    ///
    /// Staged changes are kept.
    ///
    /// # Errors
    ///
    /// Returns the first read failure; the session is left as it was.
    pub async fn reload(&mut self, service: &CatalogService) -> AdminResult<()> {
        self.original = service.snapshot().await?;
        self.stale = false;
        Ok(())
    }

    /// Queue a new record and return the temporary id it is shown under.
    pub fn stage_create<R: SessionResource>(&mut self, draft: R::Draft) -> String {
        self.stage_create_at::<R>(draft, Utc::now())
    }

    /// [`Self::stage_create`] with an explicit clock.
    pub fn stage_create_at<R: SessionResource>(
        &mut self,
        draft: R::Draft,
        now: DateTime<Utc>,
    ) -> String {
        let temp = temporary_id(now, self.sequence);
        self.sequence += 1;
        debug!(resource = %R::KIND, id = %temp, "staged create");
        R::pending_mut(self).create.push((temp.clone(), draft));
        temp
    }

    pub fn stage_update<R: SessionResource>(&mut self, patch: R::Patch) {
        debug!(resource = %R::KIND, id = patch.target_id(), "staged update");
        R::pending_mut(self).stage_update(patch);
    }

    pub fn stage_delete<R: SessionResource>(&mut self, id: &str) {
        debug!(resource = %R::KIND, id, "staged delete");
        R::pending_mut(self).stage_delete(id);
    }

    /// Replace the site content wholesale.
    pub fn stage_content(&mut self, content: SiteContent) {
        self.content = Some(content);
    }

    #[must_use]
    pub fn pending<R: SessionResource>(&self) -> &PendingResource<R> {
        R::pending(self)
    }

    /// Number of staged operations across all resources.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.products.len()
            + self.categories.len()
            + self.hero.len()
            + self.collections.len()
            + usize::from(self.content.is_some())
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.pending_count() > 0
    }

    /// Records of `R` as the admin panel shows them: stored records with
    /// staged updates and deletes applied, then staged drafts.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidBody` if a record cannot be
    /// serialized.
    pub fn preview<R: SessionResource>(&self) -> AdminResult<Vec<Value>> {
        R::pending(self).preview(R::original(&self.original), &timestamp(Utc::now()))
    }

    /// # Errors
    ///
    /// See [`Self::preview`].
    pub fn preview_products(&self) -> AdminResult<Vec<Value>> {
        self.preview::<Product>()
    }

    /// # Errors
    ///
    /// See [`Self::preview`].
    pub fn preview_categories(&self) -> AdminResult<Vec<Value>> {
        self.preview::<Category>()
    }

    /// # Errors
    ///
    /// See [`Self::preview`].
    pub fn preview_hero(&self) -> AdminResult<Vec<Value>> {
        self.preview::<HeroSlide>()
    }

    /// # Errors
    ///
    /// See [`Self::preview`].
    pub fn preview_collections(&self) -> AdminResult<Vec<Value>> {
        self.preview::<Collection>()
    }

    /// Site content with the staged replacement, if any.
    #[must_use]
    pub fn preview_content(&self) -> &SiteContent {
        self.content.as_ref().unwrap_or(&self.original.content)
    }

    /// Batch request carrying every staged change.
    ///
    /// Resources with nothing staged are left out.
    #[must_use]
    pub fn to_batch_request(&self) -> BatchRequest {
        fn changes<R: Record>(pending: &PendingResource<R>) -> Option<ResourceChanges<R>> {
            let changes = pending.to_changes();
            (!changes.is_empty()).then_some(changes)
        }
        BatchRequest {
            products: changes(&self.products),
            categories: changes(&self.categories),
            hero: changes(&self.hero),
            collections: changes(&self.collections),
            content: self.content.clone().map(|content| ContentChange {
                update: Some(content),
            }),
        }
    }

    /// Submit everything staged as one batch.
    ///
    /// Once the batch is committed the staged changes are cleared and the
    /// catalog reloaded. A failed reload does not fail the flush; it marks
    /// the session [stale](Self::is_stale) until [`Self::reload`] succeeds.
    ///
    /// # Errors
    ///
    /// Returns the batch error; the staged changes are kept so the flush
    /// can be retried.
    pub async fn flush(&mut self, service: &CatalogService) -> AdminResult<BatchResponse> {
        let request = self.to_batch_request();
        let pending = self.pending_count();
        let response = service.apply_batch(&request).await?;
        info!(
            pending,
            commit = response.commit_sha.as_deref().unwrap_or("-"),
            "session flushed"
        );
        self.reset();
        if let Err(err) = self.reload(service).await {
            warn!(error = %err, "catalog reload after flush failed");
            self.stale = true;
        }
        Ok(response)
    }

    /// Drop every staged change.
    pub fn reset(&mut self) {
        self.products = PendingResource::default();
        self.categories = PendingResource::default();
        self.hero = PendingResource::default();
        self.collections = PendingResource::default();
        self.content = None;
    }
}
