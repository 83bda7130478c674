// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::{
    CreateContext, Patch, Record, ResourceKind, ids, merge_extra, overwrite, require,
    strip_reserved,
};
use crate::error::AdminResult;

/// Price as entered in the admin form (text) or written by hand (number).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Text(String),
    Number(Number),
}

/// A saree listed in the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields of a new product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields to change on an existing product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Patch for ProductPatch {
    fn target_id(&self) -> &str {
        &self.id
    }
}

impl Record for Product {
    type Draft = ProductDraft;
    type Patch = ProductPatch;

    const KIND: ResourceKind = ResourceKind::Products;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(draft: ProductDraft, ctx: &CreateContext<'_, Self>) -> AdminResult<Self> {
        require(draft.name.as_deref(), Self::KIND, "name")?;
        Ok(Self {
            id: ids::product_id(ctx.now),
            name: draft.name,
            category: draft.category,
            price: draft.price,
            description: draft.description,
            image: draft.image,
            images: draft.images,
            alt: draft.alt,
            created_at: Some(ctx.timestamp()),
            updated_at: None,
            extra: strip_reserved(draft.extra),
        })
    }

    fn apply(&mut self, patch: &ProductPatch, now: &str) {
        overwrite(&mut self.name, patch.name.as_ref());
        overwrite(&mut self.category, patch.category.as_ref());
        overwrite(&mut self.price, patch.price.as_ref());
        overwrite(&mut self.description, patch.description.as_ref());
        overwrite(&mut self.image, patch.image.as_ref());
        overwrite(&mut self.images, patch.images.as_ref());
        overwrite(&mut self.alt, patch.alt.as_ref());
        merge_extra(&mut self.extra, &patch.extra);
        self.updated_at = Some(now.to_string());
    }

    fn patch_draft(draft: &mut ProductDraft, patch: &ProductPatch) {
        overwrite(&mut draft.name, patch.name.as_ref());
        overwrite(&mut draft.category, patch.category.as_ref());
        overwrite(&mut draft.price, patch.price.as_ref());
        overwrite(&mut draft.description, patch.description.as_ref());
        overwrite(&mut draft.image, patch.image.as_ref());
        overwrite(&mut draft.images, patch.images.as_ref());
        overwrite(&mut draft.alt, patch.alt.as_ref());
        merge_extra(&mut draft.extra, &patch.extra);
    }
}
