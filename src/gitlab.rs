//! Authenticated GitLab REST client.
//!
//! Every call returns a `Result` carrying the failure detail, so handlers
//! can embed diagnostics in their text responses without any shared state.

use crate::config::Config;
use crate::types::{MergeRequest, MergeRequestChanges, MergeRequestState, Project, User};
use anyhow::Result;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use thiserror::Error;

const PRIVATE_TOKEN_HEADER: &str = "Private-Token";
const BODY_SNIPPET_LIMIT: usize = 500;

#[derive(Debug, Error)]
pub enum GitLabError {
    #[error("GitLab access token is not configured (set GITLAB_TOKEN)")]
    MissingToken,

    /// Non-2xx response; `status` renders as e.g. `404 Not Found` and the
    /// snippet is capped at the first 500 characters of the body.
    #[error("GitLab API returned {status} for {url}: {snippet}")]
    Http {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct GitLabClient {
    config: Config,
    http: reqwest::Client,
}

impl GitLabClient {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure_tls)
            .build()?;
        if config.insecure_tls {
            tracing::warn!("TLS certificate validation is disabled");
        }
        Ok(Self { config, http })
    }

    /// Issues one authenticated GET against the configured API base and
    /// deserializes the JSON body. A missing token short-circuits without
    /// touching the network.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, GitLabError> {
        if self.config.token.is_empty() {
            return Err(GitLabError::MissingToken);
        }
        let url = format!("{}{}", self.config.api_base, endpoint);
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .header(PRIVATE_TOKEN_HEADER, &self.config.token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| GitLabError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| GitLabError::Transport {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            let snippet: String = body.chars().take(BODY_SNIPPET_LIMIT).collect();
            return Err(GitLabError::Http {
                status,
                url,
                snippet,
            });
        }

        serde_json::from_str(&body).map_err(|source| GitLabError::Parse { url, source })
    }

    /// Maps a user-supplied project identifier to the numeric project id.
    /// All-digit identifiers parse directly; anything else costs one lookup
    /// against the single-project endpoint.
    pub async fn resolve_project_id(&self, identifier: &str) -> Result<u64, GitLabError> {
        if !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = identifier.parse::<u64>() {
                return Ok(id);
            }
        }
        let encoded = urlencoding::encode(identifier);
        let project: Project = self.get(&format!("/projects/{encoded}")).await?;
        Ok(project.id)
    }

    pub async fn current_user(&self) -> Result<User, GitLabError> {
        self.get("/user").await
    }

    pub async fn assigned_merge_requests(
        &self,
        assignee_id: u64,
        state: MergeRequestState,
    ) -> Result<Vec<MergeRequest>, GitLabError> {
        self.get(&format!(
            "/merge_requests?assignee_id={assignee_id}&state={state}&scope=all"
        ))
        .await
    }

    pub async fn merge_request_changes(
        &self,
        project_id: u64,
        iid: &str,
    ) -> Result<MergeRequestChanges, GitLabError> {
        self.get(&format!(
            "/projects/{project_id}/merge_requests/{iid}/changes"
        ))
        .await
    }
}
