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

/// One slide of the home page carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Patch for HeroPatch {
    fn target_id(&self) -> &str {
        &self.id
    }
}

impl Record for HeroSlide {
    type Draft = HeroDraft;
    type Patch = HeroPatch;

    const KIND: ResourceKind = ResourceKind::Hero;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(draft: HeroDraft, ctx: &CreateContext<'_, Self>) -> AdminResult<Self> {
        require(draft.image.as_deref(), Self::KIND, "image")?;
        Ok(Self {
            id: ids::hero_id(ctx.now, ctx.sequence),
            image: draft.image,
            title: draft.title,
            subtitle: draft.subtitle,
            alt: draft.alt,
            created_at: Some(ctx.timestamp()),
            updated_at: None,
            extra: strip_reserved(draft.extra),
        })
    }

    fn apply(&mut self, patch: &HeroPatch, now: &str) {
        overwrite(&mut self.image, patch.image.as_ref());
        overwrite(&mut self.title, patch.title.as_ref());
        overwrite(&mut self.subtitle, patch.subtitle.as_ref());
        overwrite(&mut self.alt, patch.alt.as_ref());
        merge_extra(&mut self.extra, &patch.extra);
        self.updated_at = Some(now.to_string());
    }

    fn patch_draft(draft: &mut HeroDraft, patch: &HeroPatch) {
        overwrite(&mut draft.image, patch.image.as_ref());
        overwrite(&mut draft.title, patch.title.as_ref());
        overwrite(&mut draft.subtitle, patch.subtitle.as_ref());
        overwrite(&mut draft.alt, patch.alt.as_ref());
        merge_extra(&mut draft.extra, &patch.extra);
    }
}
