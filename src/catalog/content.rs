// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ResourceKind;
use crate::error::{AdminResult, RemoteError};

/// Top-level keys to overwrite in the site content.
pub type ContentPatch = Map<String, Value>;

/// Free-form site copy: name, logo, hero text, features, social links,
/// contact details and policies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteContent {
    pub fields: Map<String, Value>,
}

impl SiteContent {
    /// Decode `data/content.json`. A missing file is an empty object.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::MalformedResponse` if the file is not a JSON object.
    pub fn decode(bytes: Option<&[u8]>) -> AdminResult<Self> {
        let Some(bytes) = bytes else {
            return Ok(Self::default());
        };
        serde_json::from_slice(bytes).map_err(|e| {
            RemoteError::MalformedResponse {
                what: ResourceKind::Content.path().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Shallow merge: every key of `patch` replaces the stored value.
    pub fn merge(&mut self, patch: ContentPatch, now: &str) {
        self.fields.extend(patch);
        self.fields
            .insert("updatedAt".to_string(), Value::String(now.to_string()));
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
