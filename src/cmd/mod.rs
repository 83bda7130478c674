// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   serve, batch, list, token, check, options
//!
//! open_service:  --offline -> MemoryStore (seeded, empty catalog)
//!                otherwise -> GitHubStore (needs github.owner/repo/token)
//! ```

pub mod batch;
pub mod check;
pub mod config;
pub mod list;
pub mod serve;
pub mod token;


use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog::ResourceKind;
use crate::config::Config;
use crate::error::Result;
use crate::github::GitHubStore;
use crate::service::CatalogService;
use crate::store::RepoStore;
use crate::store::memory::MemoryStore;

/// Builds the catalog service for the configured repository.
///
/// # Errors
///
/// Returns an error if the repository coordinates or the token are missing.
pub fn open_service(config: &Config, offline: bool) -> Result<CatalogService> {
    let branch = config.github.branch.as_str();
    let store: Arc<dyn RepoStore> = if offline {
        info!(branch, "using in-memory repository");
        Arc::new(offline_store(branch))
    } else {
        config.require_repository()?;
        let store = GitHubStore::new(&config.github)?;
        debug!(repository = %store.slug(), branch, "using GitHub repository");
        Arc::new(store)
    };
    Ok(CatalogService::new(store, branch).init_missing_branch(config.github.init_missing_branch))
}

/// An in-memory repository holding an empty catalog on `branch`.
#[must_use]
pub fn offline_store(branch: &str) -> MemoryStore {
    MemoryStore::with_files(
        branch,
        ResourceKind::ALL.map(|kind| {
            let empty = if kind == ResourceKind::Content { "{}" } else { "[]" };
            (kind.path(), empty)
        }),
    )
}

/// Writes `value` to stdout as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
