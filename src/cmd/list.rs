// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `list` command.

use crate::catalog::{Category, Collection, HeroSlide, Product, ResourceKind};
use crate::cli::ListArgs;
use crate::cmd::{open_service, print_json};
use crate::config::Config;
use crate::error::Result;

/// Prints one resource the way `GET /api/<resource>` returns it.
///
/// # Errors
///
/// Returns an error if the service cannot be built or the file cannot be read.
pub async fn run_list_command(args: &ListArgs, config: &Config, offline: bool) -> Result<()> {
    let service = open_service(config, offline)?;
    match args.resource {
        ResourceKind::Products => print_json(&service.list::<Product>().await?),
        ResourceKind::Categories => print_json(&service.list::<Category>().await?),
        ResourceKind::Hero => print_json(&service.list::<HeroSlide>().await?),
        ResourceKind::Collections => print_json(&service.list::<Collection>().await?),
        ResourceKind::Content => print_json(&service.content().await?),
    }
}
