// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `token` command.

use chrono::{DateTime, Utc};

use crate::auth::AdminToken;
use crate::cli::{TokenArgs, TokenSubcommand};
use crate::config::types::AuthConfig;
use crate::error::Result;

/// Issues a token, or reports when a given token expires.
///
/// # Errors
///
/// Returns an error if the token is malformed or no longer valid.
pub fn run_token_command(args: &TokenArgs, auth: &AuthConfig) -> Result<()> {
    for line in token_report(&args.subcommand, auth, Utc::now())? {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn token_report(
    subcommand: &TokenSubcommand,
    auth: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<Vec<String>> {
    let lines = match subcommand {
        TokenSubcommand::Issue => {
            let token = AdminToken::issue(now);
            vec![
                token.to_string(),
                format!("expires {}", token.expires_at(auth.token_ttl_secs).to_rfc3339()),
            ]
        }
        TokenSubcommand::Verify { token } => {
            let token = AdminToken::parse(token)?;
            token.verify(now, auth.token_ttl_secs, auth.clock_skew_secs)?;
            vec![
                "valid".to_string(),
                format!("issued {}", token.issued_at().to_rfc3339()),
                format!("expires {}", token.expires_at(auth.token_ttl_secs).to_rfc3339()),
            ]
        }
    };
    Ok(lines)
}
