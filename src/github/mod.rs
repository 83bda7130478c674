// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub REST backend for the repository store.
//!
//! ```text
//! RepoQuery                          RepoMutation
//!   branch_head  GET  git/ref/heads    create_blob    POST  git/blobs
//!   commit_tree  GET  git/commits      create_tree    POST  git/trees
//!   read_tree    GET  git/trees?rec.   create_commit  POST  git/commits
//!   read_file    GET  contents/{path}  update_ref     PATCH git/refs/heads (force=false)
//!   ping         GET  repos/{o}/{r}    create_ref     POST  git/refs
//!
//! Status mapping:
//!   401/403          -> AuthError::RemoteRejected
//!   404 on ref       -> RemoteError::RefNotFound
//!   404 on contents  -> Ok(None)
//!   422 on PATCH ref -> RemoteError::RefUpdateConflict
//!   other non-2xx    -> RemoteError::Unavailable { status }
//!   transport error  -> RemoteError::Unavailable { status: None }
//! ```

mod types;


use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::types::GitHubConfig;
use crate::error::{AdminError, AdminResult, AuthError, ConfigError, RemoteError};
use crate::store::{ObjectId, RepoMutation, RepoQuery, TreeEntry};
use types::{
    BlobResponse, CommitResponse, ContentsResponse, ErrorBody, NewBlob, NewCommit, NewRef,
    NewTree, RefResponse, RefUpdate, ShaRef, TreeResponse,
};

const ACCEPT: &str = "application/vnd.github+json";

/// Repository store backed by the GitHub Git Data and Contents APIs.
#[derive(Debug, Clone)]
pub struct GitHubStore {
    client: Client,
    api_url: String,
    owner: String,
    repo: String,
    token: String,
    api_version: String,
}

impl GitHubStore {
    /// Build a store from the `[github]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if no token is configured and
    /// `RemoteError::Unavailable` if the HTTP client cannot be built.
    pub fn new(config: &GitHubConfig) -> AdminResult<Self> {
        if config.token.trim().is_empty() {
            return Err(ConfigError::MissingKey {
                section: "github".to_string(),
                key: "token".to_string(),
            }
            .into());
        }

        let client = Client::builder()
            .user_agent(format!("saree-admin/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RemoteError::Unavailable {
                status: None,
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            token: config.token.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// `owner/repo`, for log output.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn url(&self, tail: &str) -> String {
        repo_url(&self.api_url, &self.owner, &self.repo, tail)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", &self.api_version)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> AdminResult<Response> {
        request.send().await.map_err(|e| {
            RemoteError::Unavailable {
                status: None,
                message: format!("{what}: {e}"),
            }
            .into()
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> AdminResult<T> {
        let response = self.send(self.request(Method::GET, url), what).await?;
        let response = ensure_success(response, what).await?;
        decode(response, what).await
    }

    async fn write_json<B, T>(&self, method: Method, url: &str, body: &B, what: &str) -> AdminResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(method, url).json(body), what)
            .await?;
        let response = ensure_success(response, what).await?;
        decode(response, what).await
    }

    async fn read_blob(&self, sha: &ObjectId) -> AdminResult<Vec<u8>> {
        let url = self.url(&format!("git/blobs/{sha}"));
        let blob: BlobResponse = self.get_json(&url, "read blob").await?;
        decode_content(&blob.content, &blob.encoding, "read blob")
    }
}

fn repo_url(api_url: &str, owner: &str, repo: &str, tail: &str) -> String {
    if tail.is_empty() {
        format!("{api_url}/repos/{owner}/{repo}")
    } else {
        format!("{api_url}/repos/{owner}/{repo}/{tail}")
    }
}

/// Turn a non-2xx answer into the matching error.
async fn ensure_success(response: Response, what: &str) -> AdminResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = error_message(response).await;
    Err(status_error(status, what, message))
}

fn status_error(status: StatusCode, what: &str, message: String) -> AdminError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AuthError::RemoteRejected {
            status: status.as_u16(),
            message,
        }
        .into(),
        _ => RemoteError::Unavailable {
            status: Some(status.as_u16()),
            message: format!("{what}: {message}"),
        }
        .into(),
    }
}

/// The `message` field of a GitHub error body, or the raw body.
async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&body).map_or(body, |e| e.message)
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> AdminResult<T> {
    let body = response.text().await.map_err(|e| RemoteError::Unavailable {
        status: None,
        message: format!("{what}: {e}"),
    })?;
    serde_json::from_str(&body).map_err(|e| {
        RemoteError::MalformedResponse {
            what: what.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Decode a base64 payload as returned by the Contents and Blob APIs.
///
/// GitHub wraps base64 at 60 columns, so whitespace is stripped first.
fn decode_content(content: &str, encoding: &str, what: &str) -> AdminResult<Vec<u8>> {
    match encoding {
        "base64" => {
            let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            STANDARD.decode(compact).map_err(|e| {
                RemoteError::MalformedResponse {
                    what: what.to_string(),
                    message: format!("invalid base64 content: {e}"),
                }
                .into()
            })
        }
        "utf-8" | "utf8" => Ok(content.as_bytes().to_vec()),
        other => Err(RemoteError::MalformedResponse {
            what: what.to_string(),
            message: format!("unsupported encoding '{other}'"),
        }
        .into()),
    }
}

#[async_trait]
impl RepoQuery for GitHubStore {
    async fn ping(&self) -> AdminResult<()> {
        let url = self.url("");
        let response = self.send(self.request(Method::GET, &url), "ping").await?;
        ensure_success(response, "ping").await?;
        debug!(repo = %self.slug(), "repository reachable");
        Ok(())
    }

    async fn branch_head(&self, branch: &str) -> AdminResult<ObjectId> {
        let url = self.url(&format!("git/ref/heads/{branch}"));
        let response = self.send(self.request(Method::GET, &url), "read ref").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::RefNotFound {
                branch: branch.to_string(),
            }
            .into());
        }
        let response = ensure_success(response, "read ref").await?;
        let reference: RefResponse = decode(response, "read ref").await?;
        Ok(reference.object.sha)
    }

    async fn commit_tree(&self, commit: &ObjectId) -> AdminResult<ObjectId> {
        let url = self.url(&format!("git/commits/{commit}"));
        let commit: CommitResponse = self.get_json(&url, "read commit").await?;
        Ok(commit.tree.sha)
    }

    async fn read_tree(&self, tree: &ObjectId) -> AdminResult<Vec<TreeEntry>> {
        let url = self.url(&format!("git/trees/{tree}?recursive=1"));
        let response = self.send(self.request(Method::GET, &url), "read tree").await?;
        let response = ensure_success(response, "read tree").await?;
        let body = response.text().await.map_err(|e| RemoteError::Unavailable {
            status: None,
            message: format!("read tree: {e}"),
        })?;
        let listing: TreeResponse =
            serde_json::from_str(&body).map_err(|e| RemoteError::InvalidTree {
                tree: tree.to_string(),
                message: e.to_string(),
            })?;
        if listing.truncated {
            warn!(tree = %listing.sha.short(), entries = listing.tree.len(), "tree listing truncated by the API");
        }
        Ok(listing.tree)
    }

    async fn read_file(&self, reference: &str, path: &str) -> AdminResult<Option<Vec<u8>>> {
        let url = self.url(&format!("contents/{path}?ref={reference}"));
        let response = self.send(self.request(Method::GET, &url), "read file").await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(path, reference, "file not found");
            return Ok(None);
        }
        let response = ensure_success(response, "read file").await?;
        let file: ContentsResponse = decode(response, "read file").await?;

        if file.encoding == "none" || (file.encoding.is_empty() && file.content.is_empty()) {
            debug!(path, blob = %file.sha.short(), "contents omitted, reading blob");
            return self.read_blob(&file.sha).await.map(Some);
        }
        decode_content(&file.content, &file.encoding, "read file").map(Some)
    }
}

#[async_trait]
impl RepoMutation for GitHubStore {
    async fn create_blob(&self, content: &[u8]) -> AdminResult<ObjectId> {
        let encoded = STANDARD.encode(content);
        let body = NewBlob {
            content: &encoded,
            encoding: "base64",
        };
        let url = self.url("git/blobs");
        let created: ShaRef = self
            .write_json(Method::POST, &url, &body, "create blob")
            .await?;
        Ok(created.sha)
    }

    async fn create_tree(
        &self,
        base: Option<&ObjectId>,
        entries: &[TreeEntry],
    ) -> AdminResult<ObjectId> {
        let body = NewTree {
            base_tree: base,
            tree: entries,
        };
        let url = self.url("git/trees");
        let created: ShaRef = self
            .write_json(Method::POST, &url, &body, "create tree")
            .await?;
        Ok(created.sha)
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &ObjectId,
        parents: &[ObjectId],
    ) -> AdminResult<ObjectId> {
        let body = NewCommit {
            message,
            tree,
            parents,
        };
        let url = self.url("git/commits");
        let created: ShaRef = self
            .write_json(Method::POST, &url, &body, "create commit")
            .await?;
        Ok(created.sha)
    }

    async fn update_ref(
        &self,
        branch: &str,
        expected: &ObjectId,
        commit: &ObjectId,
    ) -> AdminResult<()> {
        let url = self.url(&format!("git/refs/heads/{branch}"));
        let body = RefUpdate {
            sha: commit,
            force: false,
        };
        debug!(branch, from = %expected.short(), to = %commit.short(), "updating ref");
        let response = self
            .send(self.request(Method::PATCH, &url).json(&body), "update ref")
            .await?;
        match response.status() {
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => {
                let message = error_message(response).await;
                warn!(branch, %message, "ref update rejected");
                Err(RemoteError::RefUpdateConflict {
                    branch: branch.to_string(),
                }
                .into())
            }
            StatusCode::NOT_FOUND => Err(RemoteError::RefNotFound {
                branch: branch.to_string(),
            }
            .into()),
            _ => ensure_success(response, "update ref").await.map(|_| ()),
        }
    }

    async fn create_ref(&self, branch: &str, commit: &ObjectId) -> AdminResult<()> {
        let url = self.url("git/refs");
        let body = NewRef {
            ref_name: format!("refs/heads/{branch}"),
            sha: commit,
        };
        let response = self
            .send(self.request(Method::POST, &url).json(&body), "create ref")
            .await?;
        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(RemoteError::RefUpdateConflict {
                branch: branch.to_string(),
            }
            .into());
        }
        ensure_success(response, "create ref").await.map(|_| ())
    }
}
