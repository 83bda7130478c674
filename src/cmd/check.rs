// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `check` command.

use crate::cmd::open_service;
use crate::config::Config;
use crate::error::Result;

/// Pings the repository and prints the branch head.
///
/// # Errors
///
/// Returns an error if the repository is unreachable or the branch is missing.
pub async fn run_check_command(config: &Config, offline: bool) -> Result<()> {
    let service = open_service(config, offline)?;
    service.ping().await?;
    let head = service.head().await?;
    println!("{} {}", service.branch(), head);
    Ok(())
}
