// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Batch requests and the per-resource merge policy.
//!
//! ```text
//! BatchRequest
//!   products | categories | hero | collections : { create, update, delete }
//!   content                                     : { update: <whole object> }
//!
//! per resource file:  stored --update--> --create--> --delete--> result
//!                     result == stored  => path left out of the commit
//! ```
//!
//! Updates for unknown ids are skipped. Deletes of `temp_` ids never
//! reach the store.


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::catalog::ids::{is_temporary, timestamp};
use crate::catalog::{
    Category, Collection, CreateContext, HeroSlide, Patch, Product, Record, RecordFile,
    ResourceKind, SiteContent,
};
use crate::commit::{ChangeSet, CommitOutcome};
use crate::error::AdminResult;

/// Changes to one resource file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "", deny_unknown_fields)]
pub struct ResourceChanges<R: Record> {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub create: Vec<R::Draft>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update: Vec<R::Patch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delete: Vec<String>,
}

impl<R: Record> Default for ResourceChanges<R> {
    fn default() -> Self {
        Self {
            create: Vec::new(),
            update: Vec::new(),
            delete: Vec::new(),
        }
    }
}

impl<R: Record> ResourceChanges<R> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.create.len() + self.update.len() + self.delete.len()
    }
}

/// Replacement of the site content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<SiteContent>,
}

/// Body of `POST /api/batch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<ResourceChanges<Product>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<ResourceChanges<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<ResourceChanges<HeroSlide>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections: Option<ResourceChanges<Collection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentChange>,
}

impl BatchRequest {
    /// Resources the request names, in processing order.
    #[must_use]
    pub fn resources(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                ResourceKind::Products => self.products.is_some(),
                ResourceKind::Categories => self.categories.is_some(),
                ResourceKind::Hero => self.hero.is_some(),
                ResourceKind::Collections => self.collections.is_some(),
                ResourceKind::Content => self
                    .content
                    .as_ref()
                    .is_some_and(|c| c.update.is_some()),
            })
            .collect()
    }
}

/// Outcome for one resource of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Body answered by `POST /api/batch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    pub results: BTreeMap<String, ResourceResult>,
}

impl BatchResponse {
    #[must_use]
    pub fn new(outcome: &CommitOutcome, results: BTreeMap<String, ResourceResult>) -> Self {
        let message = if outcome.commit.is_some() {
            "All changes saved successfully in a single commit"
        } else {
            "No changes to save"
        };
        Self {
            success: true,
            message: message.to_string(),
            commit_sha: outcome.commit.as_ref().map(ToString::to_string),
            results,
        }
    }
}

/// Apply updates, then creates, then deletes to `records`.
///
/// # Errors
///
/// Returns `ValidationError` if a draft is rejected; nothing is applied
/// partially because the caller discards `records` on error.
pub fn apply_changes<R: Record>(
    mut records: Vec<R>,
    changes: &ResourceChanges<R>,
    now: DateTime<Utc>,
) -> AdminResult<Vec<R>> {
    let stamp = timestamp(now);

    for patch in &changes.update {
        match records.iter_mut().find(|r| r.id() == patch.target_id()) {
            Some(record) => record.apply(patch, &stamp),
            None => debug!(resource = %R::KIND, id = patch.target_id(), "update for unknown id skipped"),
        }
    }

    for (sequence, draft) in (0_u64..).zip(changes.create.iter().cloned()) {
        let record = R::create(
            draft,
            &CreateContext {
                existing: &records,
                now,
                sequence,
            },
        )?;
        records.push(record);
    }

    let deletes: HashSet<&str> = changes
        .delete
        .iter()
        .map(String::as_str)
        .filter(|id| !is_temporary(id))
        .collect();
    if !deletes.is_empty() {
        records.retain(|r| !deletes.contains(r.id()));
    }

    Ok(records)
}

/// Stage the new content of one resource file if it differs from `stored`.
///
/// # Errors
///
/// Propagates errors of [`apply_changes`].
pub fn stage_records<R: Record>(
    stored: &RecordFile<R>,
    changes: &ResourceChanges<R>,
    now: DateTime<Utc>,
    staged: &mut ChangeSet,
    results: &mut BTreeMap<String, ResourceResult>,
) -> AdminResult<()> {
    let updated = apply_changes(stored.records().to_vec(), changes, now)?;
    if updated.as_slice() == stored.records() {
        debug!(resource = %R::KIND, "no net change");
        return Ok(());
    }
    staged.insert(R::KIND.path(), stored.encode(&updated)?);
    results.insert(
        R::KIND.name().to_string(),
        ResourceResult {
            success: true,
            count: Some(updated.len()),
        },
    );
    Ok(())
}

/// Stage a wholesale content replacement if it differs from `stored`.
pub fn stage_content(
    stored: &SiteContent,
    replacement: &SiteContent,
    staged: &mut ChangeSet,
    results: &mut BTreeMap<String, ResourceResult>,
) {
    if stored == replacement {
        debug!(resource = %ResourceKind::Content, "no net change");
        return;
    }
    staged.insert(ResourceKind::Content.path(), replacement.to_value());
    results.insert(
        ResourceKind::Content.name().to_string(),
        ResourceResult {
            success: true,
            count: None,
        },
    );
}
