// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Record id and timestamp generation.
//!
//! ```text
//! products     <ms><9 random base36>     1760870400000k3j9x0q2a
//! hero         <ms + n>                  1760870400002
//! categories   slug(name)                banarasi-silk
//! collections  slug(name)-<ms base36>    wedding-edit-mgx1abcd
//! staged       temp_<ms>[_<n>]           temp_1760870400000_1
//! ```
//!
//! The clock is always passed in.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;

/// Prefix of ids the admin panel assigns to records not yet saved.
pub const TEMP_PREFIX: &str = "temp_";

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Returns true for ids assigned to unsaved records.
#[must_use]
pub fn is_temporary(id: &str) -> bool {
    id.starts_with(TEMP_PREFIX)
}

/// Milliseconds since the epoch, clamped at zero.
#[must_use]
pub fn millis(now: DateTime<Utc>) -> u64 {
    u64::try_from(now.timestamp_millis()).unwrap_or(0)
}

/// ISO-8601 UTC timestamp with millisecond precision, `Z` suffix.
#[must_use]
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Lowercase base-36 rendering of `value`.
#[must_use]
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let digit = usize::try_from(value % 36).unwrap_or_default();
        digits.push(char::from(BASE36[digit]));
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Parse a base-36 number, either case. `None` on any other character or
/// on overflow.
#[must_use]
pub fn from_base36(text: &str) -> Option<u64> {
    if text.is_empty() {
        return None;
    }
    text.chars().try_fold(0_u64, |acc, c| {
        let digit = u64::from(c.to_digit(36)?);
        acc.checked_mul(36)?.checked_add(digit)
    })
}

/// Product id: creation time followed by nine random base-36 characters.
#[must_use]
pub fn product_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();
    format!("{}{suffix}", millis(now))
}

/// Hero id: creation time plus the index of the create within its request.
#[must_use]
pub fn hero_id(now: DateTime<Utc>, sequence: u64) -> String {
    millis(now).saturating_add(sequence).to_string()
}

/// Category id: lowercase name, every other character replaced by `-`,
/// runs of `-` collapsed. Leading and trailing dashes are kept.
#[must_use]
pub fn category_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug
}

/// Collection id: trimmed slug of `name`, `-`, creation time in base 36.
#[must_use]
pub fn collection_id(name: &str, now: DateTime<Utc>) -> String {
    let slug = category_slug(name);
    format!("{}-{}", slug.trim_matches('-'), to_base36(millis(now)))
}

/// Temporary id for a staged create. `sequence` disambiguates creates
/// staged within the same millisecond.
#[must_use]
pub fn temporary_id(now: DateTime<Utc>, sequence: u64) -> String {
    if sequence == 0 {
        format!("{TEMP_PREFIX}{}", millis(now))
    } else {
        format!("{TEMP_PREFIX}{}_{sequence}", millis(now))
    }
}
