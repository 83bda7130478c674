// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |        serve / batch / list / token
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '-------------+-------------'
//!                            v
//!        server (axum)  ---> service <--- session
//!        auth, CORS          |   |        (staged edits)
//!                            |   +--> batch (merge policy)
//!                            |   +--> catalog (records, ids)
//!                            v
//!                         commit (one tree, one commit, guarded ref)
//!                            v
//!                   store: RepoQuery + RepoMutation
//!                   +-- github (REST)   +-- memory
//!
//!   +-----------------------------------------+
//!   |  foundation       error, logging        |
//!   +-----------------------------------------+
//! ```

pub mod auth;
pub mod batch;
pub mod catalog;
pub mod cli;
pub mod cmd;
pub mod commit;
pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod server;
pub mod service;
pub mod session;
pub mod store;
