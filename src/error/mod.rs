// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            AdminError (~24 bytes)
//!                    |
//!   +------+------+-------+------+----+-------+
//!   v      v      v       v      v    v       v
//! Auth  Remote  Valid.  Config  Io  Other
//!  Box    Box    Box     Box    Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Auth        MissingToken, MalformedToken, Expired, RemoteRejected
//!   Remote      RefNotFound, Unavailable, InvalidTree, RefUpdateConflict
//!   Validation  MissingField, NotFound, Duplicate, InvalidBody
//!   Config      ParseError, MissingKey, InvalidValue
//!
//! status():  Auth 401 | Validation 400/404 | Conflict 409 | rest 5xx
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`AdminError`].
pub type AdminResult<T> = std::result::Result<T, AdminError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Credential missing, malformed, expired, or rejected by the remote.
    #[error("{0}")]
    Auth(#[from] Box<AuthError>),

    /// The remote store failed or answered something unexpected.
    #[error("{0}")]
    Remote(#[from] Box<RemoteError>),

    /// Request content is invalid.
    #[error("{0}")]
    Validation(#[from] Box<ValidationError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl AdminError {
    /// Create an [`AdminError::Other`] from a message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into().into_boxed_str())
    }

    /// HTTP status code this error is surfaced with.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Auth(err) => match **err {
                AuthError::RemoteRejected { status, .. } => status,
                _ => 401,
            },
            Self::Remote(err) => match **err {
                RemoteError::RefUpdateConflict { .. } => 409,
                RemoteError::Unavailable {
                    status: Some(status),
                    ..
                } if status >= 400 => status,
                RemoteError::Unavailable {
                    status: Some(_), ..
                } => 502,
                _ => 500,
            },
            Self::Validation(err) => match **err {
                ValidationError::NotFound { .. } => 404,
                _ => 400,
            },
            Self::Config(_) | Self::Io(_) | Self::Other(_) => 500,
        }
    }

    /// Returns true for the guarded ref update losing a race.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Remote(err) if matches!(**err, RemoteError::RefUpdateConflict { .. }))
    }

    /// Returns true if the branch does not exist.
    #[must_use]
    pub fn is_ref_not_found(&self) -> bool {
        matches!(self, Self::Remote(err) if matches!(**err, RemoteError::RefNotFound { .. }))
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for AdminError {
                fn from(err: $error) -> Self {
                    AdminError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    AuthError => Auth,
    RemoteError => Remote,
    ValidationError => Validation,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Auth Errors ---

/// Admin credential errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token on a write request.
    #[error("Unauthorized. Please login.")]
    MissingToken,

    /// Token is too short or its timestamp suffix does not decode.
    #[error("invalid token: {reason}")]
    MalformedToken { reason: String },

    /// Token is older than the configured lifetime.
    #[error("token expired {age_secs}s after issue (lifetime {ttl_secs}s)")]
    Expired { age_secs: i64, ttl_secs: u64 },

    /// Login password did not match.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The remote store refused the configured access token (401/403).
    #[error("remote rejected credentials ({status}): {message}")]
    RemoteRejected { status: u16, message: String },
}

// --- Remote Errors ---

/// Remote store errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The branch does not exist.
    #[error("branch not found: {branch}")]
    RefNotFound { branch: String },

    /// Network failure or unexpected HTTP status from the remote.
    #[error("remote unavailable{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Unavailable {
        status: Option<u16>,
        message: String,
    },

    /// A response body did not have the expected shape.
    #[error("malformed response for {what}: {message}")]
    MalformedResponse { what: String, message: String },

    /// The base tree listing could not be used.
    #[error("invalid tree {tree}: {message}")]
    InvalidTree { tree: String, message: String },

    /// The branch moved between reading the head and updating the ref.
    #[error("branch {branch} moved concurrently; reload and retry")]
    RefUpdateConflict { branch: String },
}

// --- Validation Errors ---

/// Errors in caller-supplied content.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{resource}: field '{field}' is required")]
    MissingField {
        resource: &'static str,
        field: &'static str,
    },

    /// No record with the given id.
    #[error("{resource}: no record with id '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// A record with the generated id already exists.
    #[error("{resource}: a record with id '{id}' already exists")]
    Duplicate { resource: &'static str, id: String },

    /// The request body is not valid JSON or has the wrong shape.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Unknown resource name.
    #[error("unknown resource: {0}")]
    UnknownResource(String),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
