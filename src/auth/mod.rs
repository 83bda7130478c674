// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Admin bearer token.
//!
//! ```text
//! wire form:  <64 hex chars of randomness><issue time, ms, base 36, 8 chars>
//!             3f9c...e01a                 mgxkrsao
//!
//! parse    len >= 40, ascii, last 8 chars base 36   else MalformedToken
//! verify   now - issued_at > ttl                     -> Expired
//!          issued_at - now > skew                    -> MalformedToken
//! ```
//!
//! The token carries no signature. Anyone who can produce a fresh
//! timestamp can forge one; the only secret is the login password.


use chrono::{DateTime, TimeDelta, Utc};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::catalog::ids::{from_base36, millis, to_base36};
use crate::error::{AdminError, AdminResult, AuthError, ConfigError, ValidationError};

/// Shortest string accepted as a token.
pub const MIN_TOKEN_LEN: usize = 40;

/// Length of the base-36 issue time suffix.
pub const STAMP_LEN: usize = 8;

/// A parsed admin token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminToken {
    issued_at: DateTime<Utc>,
    opaque: String,
}

impl AdminToken {
    /// Fresh token issued at `now`.
    #[must_use]
    pub fn issue(now: DateTime<Utc>) -> Self {
        let bytes: [u8; 32] = rand::random();
        Self {
            issued_at: now,
            opaque: hex::encode(bytes),
        }
    }

    /// Parse the wire form.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MalformedToken` if the text is too short or the
    /// issue time suffix does not decode.
    pub fn parse(text: &str) -> AdminResult<Self> {
        let text = text.trim();
        if text.len() < MIN_TOKEN_LEN {
            return Err(malformed(format!(
                "expected at least {MIN_TOKEN_LEN} characters, got {}",
                text.len()
            )));
        }
        if !text.is_ascii() {
            return Err(malformed("non-ascii characters".to_string()));
        }
        let (opaque, stamp) = text.split_at(text.len() - STAMP_LEN);
        let issued_at = from_base36(stamp)
            .and_then(|ms| i64::try_from(ms).ok())
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| malformed(format!("bad timestamp suffix '{stamp}'")))?;
        Ok(Self {
            issued_at,
            opaque: opaque.to_string(),
        })
    }

    /// Extract and parse the token of an `Authorization: Bearer` header.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` if there is no bearer credential.
    pub fn from_authorization(header: Option<&str>) -> AdminResult<Self> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        Self::parse(token)
    }

    /// Check the token is still valid at `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Expired` once `ttl_secs` have passed, and
    /// `AuthError::MalformedToken` for tokens dated further than
    /// `skew_secs` in the future.
    pub fn verify(&self, now: DateTime<Utc>, ttl_secs: u64, skew_secs: u64) -> AdminResult<()> {
        let age = now.signed_duration_since(self.issued_at);
        if age > seconds(ttl_secs) {
            return Err(AuthError::Expired {
                age_secs: age.num_seconds(),
                ttl_secs,
            }
            .into());
        }
        if -age > seconds(skew_secs) {
            return Err(malformed(format!(
                "issued {}s in the future",
                (-age).num_seconds()
            )));
        }
        Ok(())
    }

    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Moment the token stops being accepted.
    #[must_use]
    pub fn expires_at(&self, ttl_secs: u64) -> DateTime<Utc> {
        self.issued_at
            .checked_add_signed(seconds(ttl_secs))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl fmt::Display for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stamp = to_base36(millis(self.issued_at));
        write!(f, "{}{stamp:0>width$}", self.opaque, width = STAMP_LEN)
    }
}

fn malformed(reason: String) -> AdminError {
    AuthError::MalformedToken { reason }.into()
}

fn seconds(secs: u64) -> TimeDelta {
    TimeDelta::try_seconds(i64::try_from(secs).unwrap_or(i64::MAX)).unwrap_or(TimeDelta::MAX)
}

/// Check a login password against the configured one.
///
/// # Errors
///
/// - `ConfigError::MissingKey` if no admin password is configured.
/// - `ValidationError::MissingField` if `supplied` is empty.
/// - `AuthError::InvalidCredentials` if the passwords differ.
pub fn check_password(configured: Option<&str>, supplied: Option<&str>) -> AdminResult<()> {
    let configured = configured
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ConfigError::MissingKey {
            section: "auth".to_string(),
            key: "admin_password".to_string(),
        })?;
    let supplied = supplied
        .filter(|p| !p.is_empty())
        .ok_or(ValidationError::MissingField {
            resource: "login",
            field: "password",
        })?;

    // constant-time over the digests
    let expected = Sha256::digest(configured.as_bytes());
    let actual = Sha256::digest(supplied.as_bytes());
    let diff = expected
        .iter()
        .zip(actual.iter())
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b));
    if diff == 0 {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials.into())
    }
}
