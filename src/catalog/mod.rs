// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed storefront records.
//!
//! ```text
//! ResourceKind    file                    Record       Draft / Patch
//! products        data/products.json      Product      ProductDraft / ProductPatch
//! categories      data/categories.json    Category     CategoryDraft / CategoryPatch
//! hero            data/hero.json          HeroSlide    HeroDraft / HeroPatch
//! collections     data/collections.json   Collection   CollectionDraft / CollectionPatch
//! content         data/content.json       SiteContent  ContentPatch (shallow merge)
//! ```
//!
//! Every record keeps fields it does not know about in a flattened map, so
//! a round trip through the admin never drops storefront data. `id`,
//! `createdAt` and `updatedAt` are owned by the server and never taken from
//! drafts or patches.

mod category;
mod collection;
mod content;
mod hero;
pub mod ids;
mod product;

#[cfg(test)]
mod tests;

pub use category::{Category, CategoryDraft, CategoryPatch};
pub use collection::{Collection, CollectionDraft, CollectionPatch, Subcategory};
pub use content::{ContentPatch, SiteContent};
pub use hero::{HeroDraft, HeroPatch, HeroSlide};
pub use product::{Price, Product, ProductDraft, ProductPatch};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{AdminError, AdminResult, RemoteError, ValidationError};

/// Keys the server owns on every record.
const RESERVED: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// One data file of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Products,
    Categories,
    Hero,
    Collections,
    Content,
}

impl ResourceKind {
    /// Every resource, in the order batches are processed.
    pub const ALL: [Self; 5] = [
        Self::Products,
        Self::Hero,
        Self::Content,
        Self::Categories,
        Self::Collections,
    ];

    /// Repository path of the backing file.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Products => "data/products.json",
            Self::Categories => "data/categories.json",
            Self::Hero => "data/hero.json",
            Self::Collections => "data/collections.json",
            Self::Content => "data/content.json",
        }
    }

    /// Name used in URLs and batch bodies.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Hero => "hero",
            Self::Collections => "collections",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownResource(s.to_string()))
    }
}

/// Inputs a record needs when it is created.
#[derive(Debug)]
pub struct CreateContext<'a, R> {
    /// Records already in the file, including earlier creates of the same request.
    pub existing: &'a [R],
    pub now: DateTime<Utc>,
    /// Index of this create within its request.
    pub sequence: u64,
}

impl<R> CreateContext<'_, R> {
    #[must_use]
    pub fn timestamp(&self) -> String {
        ids::timestamp(self.now)
    }

    /// Default `order` for a new record: one past the current count.
    #[must_use]
    pub fn next_order(&self) -> i64 {
        i64::try_from(self.existing.len())
            .unwrap_or(i64::MAX)
            .saturating_add(1)
    }
}

/// Partial update addressed at one record.
pub trait Patch: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// Id of the record to update.
    fn target_id(&self) -> &str;
}

/// A record stored as one element of a resource file.
pub trait Record:
    Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Body of a create request.
    type Draft: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static;
    /// Body of an update request.
    type Patch: Patch;

    const KIND: ResourceKind;

    fn id(&self) -> &str;

    /// Build a new record, assigning its id and `createdAt`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a required field is missing or the
    /// generated id is taken.
    fn create(draft: Self::Draft, ctx: &CreateContext<'_, Self>) -> AdminResult<Self>;

    /// Merge `patch` into the record and refresh `updatedAt`.
    fn apply(&mut self, patch: &Self::Patch, now: &str);

    /// Fold an update into a draft that was never saved.
    fn patch_draft(draft: &mut Self::Draft, patch: &Self::Patch);

    /// Order records the way listings show them.
    fn sort_for_listing(_records: &mut [Self]) {}
}

/// Decode a resource file. A missing file is an empty list.
///
/// # Errors
///
/// Returns `RemoteError::MalformedResponse` if the file is not a JSON list
/// of records.
pub fn decode_records<R: Record>(bytes: Option<&[u8]>) -> AdminResult<Vec<R>> {
    RecordFile::decode(bytes).map(RecordFile::into_records)
}

fn encode_record<R: Record>(record: &R) -> AdminResult<Value> {
    serde_json::to_value(record)
        .map_err(|e| ValidationError::InvalidBody(format!("{}: {e}", R::KIND)).into())
}

fn malformed<R: Record>(err: &serde_json::Error) -> AdminError {
    RemoteError::MalformedResponse {
        what: R::KIND.path().to_string(),
        message: err.to_string(),
    }
    .into()
}

/// A resource file as read: the typed records and the JSON object each
/// one was decoded from.
///
/// Writing back through [`RecordFile::encode`] keeps the file's own
/// layout. Records that did not change are emitted exactly as read;
/// changed ones are laid over their stored object, so key order and
/// explicit `null`s the typed fields cannot hold survive a save.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFile<R> {
    records: Vec<R>,
    source: Vec<Value>,
}

impl<R: Record> RecordFile<R> {
    /// # Errors
    ///
    /// Returns `RemoteError::MalformedResponse` if the file is not a JSON
    /// list of records.
    pub fn decode(bytes: Option<&[u8]>) -> AdminResult<Self> {
        let Some(bytes) = bytes else {
            return Ok(Self::from_records(Vec::new()));
        };
        let source: Vec<Value> = serde_json::from_slice(bytes).map_err(|e| malformed::<R>(&e))?;
        let records = source
            .iter()
            .map(<R as serde::Deserialize>::deserialize)
            .collect::<Result<Vec<R>, _>>()
            .map_err(|e| malformed::<R>(&e))?;
        Ok(Self { records, source })
    }

    /// Records with no stored JSON; everything is encoded afresh.
    #[must_use]
    pub const fn from_records(records: Vec<R>) -> Self {
        Self {
            records,
            source: Vec::new(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    /// JSON for `records`, reusing the stored object of each record that
    /// was read from this file.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidBody` if a record cannot be
    /// serialized.
    pub fn encode(&self, records: &[R]) -> AdminResult<Value> {
        let rows = records
            .iter()
            .map(|record| self.encode_one(record))
            .collect::<AdminResult<Vec<_>>>()?;
        Ok(Value::Array(rows))
    }

    fn encode_one(&self, record: &R) -> AdminResult<Value> {
        let stored = self
            .records
            .iter()
            .zip(&self.source)
            .find(|(before, _)| before.id() == record.id());
        let Some((before, source)) = stored else {
            return encode_record(record);
        };
        if before == record {
            return Ok(source.clone());
        }
        let fresh = encode_record(record)?;
        let (Value::Object(mut row), Value::Object(fresh)) = (source.clone(), fresh) else {
            return encode_record(record);
        };
        // stored nulls have no typed field to come back through
        row.retain(|key, value| value.is_null() || fresh.contains_key(key));
        for (key, value) in fresh {
            row.insert(key, value);
        }
        Ok(Value::Object(row))
    }
}

/// Fail with `MissingField` unless `value` holds non-blank text.
pub(crate) fn require(
    value: Option<&str>,
    resource: ResourceKind,
    field: &'static str,
) -> AdminResult<()> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::MissingField {
            resource: resource.name(),
            field,
        }
        .into()),
    }
}

/// Replace `slot` when the patch carries a value.
pub(crate) fn overwrite<T: Clone>(slot: &mut Option<T>, value: Option<&T>) {
    if let Some(value) = value {
        *slot = Some(value.clone());
    }
}

/// Drop server-owned keys from caller-supplied extra fields.
pub(crate) fn strip_reserved(mut extra: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED {
        extra.remove(key);
    }
    extra
}

/// Copy caller-supplied extra fields over the stored ones.
pub(crate) fn merge_extra(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        if !RESERVED.contains(&key.as_str()) {
            target.insert(key.clone(), value.clone());
        }
    }
}
