// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{CreateContext, Patch, Record, ResourceKind, ids, overwrite, require};
use crate::error::{AdminResult, ValidationError};

/// A product category. Its id is the slug of its name at creation time
/// and does not follow later renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// Only the name and the order of a category can change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl Patch for CategoryPatch {
    fn target_id(&self) -> &str {
        &self.id
    }
}

impl Record for Category {
    type Draft = CategoryDraft;
    type Patch = CategoryPatch;

    const KIND: ResourceKind = ResourceKind::Categories;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(draft: CategoryDraft, ctx: &CreateContext<'_, Self>) -> AdminResult<Self> {
        require(draft.name.as_deref(), Self::KIND, "name")?;
        let name = draft.name.unwrap_or_default();
        let id = ids::category_slug(&name);
        if ctx.existing.iter().any(|c| c.id == id) {
            return Err(ValidationError::Duplicate {
                resource: Self::KIND.name(),
                id,
            }
            .into());
        }
        Ok(Self {
            id,
            name: Some(name),
            // zero means "not set" in the admin form
            order: Some(draft.order.filter(|o| *o != 0).unwrap_or_else(|| ctx.next_order())),
            created_at: Some(ctx.timestamp()),
            updated_at: None,
            extra: Map::new(),
        })
    }

    fn apply(&mut self, patch: &CategoryPatch, now: &str) {
        if let Some(name) = patch.name.as_ref().filter(|n| !n.is_empty()) {
            self.name = Some(name.clone());
        }
        overwrite(&mut self.order, patch.order.as_ref());
        self.updated_at = Some(now.to_string());
    }

    fn patch_draft(draft: &mut CategoryDraft, patch: &CategoryPatch) {
        overwrite(&mut draft.name, patch.name.as_ref());
        overwrite(&mut draft.order, patch.order.as_ref());
    }

    fn sort_for_listing(records: &mut [Self]) {
        records.sort_by_key(|c| c.order.unwrap_or(0));
    }
}
