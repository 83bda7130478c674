// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    CreateContext, Patch, Record, ResourceKind, ids, merge_extra, overwrite, require,
    strip_reserved,
};
use crate::error::AdminResult;

/// Entry of a collection's sub-menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A curated group of categories shown in the navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A caller may pick the id of a new collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategories: Option<Vec<Subcategory>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategories: Option<Vec<Subcategory>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Patch for CollectionPatch {
    fn target_id(&self) -> &str {
        &self.id
    }
}

impl Record for Collection {
    type Draft = CollectionDraft;
    type Patch = CollectionPatch;

    const KIND: ResourceKind = ResourceKind::Collections;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(draft: CollectionDraft, ctx: &CreateContext<'_, Self>) -> AdminResult<Self> {
        require(draft.name.as_deref(), Self::KIND, "name")?;
        let name = draft.name.unwrap_or_default();
        let id = draft
            .id
            .filter(|id| !id.is_empty() && !ids::is_temporary(id))
            .unwrap_or_else(|| ids::collection_id(&name, ctx.now));
        Ok(Self {
            id,
            name: Some(name),
            order: Some(draft.order.filter(|o| *o != 0).unwrap_or_else(|| ctx.next_order())),
            subcategories: draft.subcategories.unwrap_or_default(),
            created_at: Some(ctx.timestamp()),
            updated_at: None,
            extra: strip_reserved(draft.extra),
        })
    }

    fn apply(&mut self, patch: &CollectionPatch, now: &str) {
        overwrite(&mut self.name, patch.name.as_ref());
        overwrite(&mut self.order, patch.order.as_ref());
        if let Some(subcategories) = &patch.subcategories {
            self.subcategories.clone_from(subcategories);
        }
        merge_extra(&mut self.extra, &patch.extra);
        self.updated_at = Some(now.to_string());
    }

    fn patch_draft(draft: &mut CollectionDraft, patch: &CollectionPatch) {
        overwrite(&mut draft.name, patch.name.as_ref());
        overwrite(&mut draft.order, patch.order.as_ref());
        overwrite(&mut draft.subcategories, patch.subcategories.as_ref());
        merge_extra(&mut draft.extra, &patch.extra);
    }
}
