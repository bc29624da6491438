//! The MCP tool surface: two GitLab tools built on the client in
//! `crate::gitlab`. Every failure degrades to a text response because the
//! calling agent has no structured error channel.

use crate::config::Config;
use crate::format::format_merge_request;
use crate::gitlab::GitLabClient;
use crate::types::{ChangeSummary, MergeRequestState};
use rmcp::handler::server::{router::tool::ToolRouter, wrapper::Parameters};
use rmcp::model::{
    CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo,
};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListAssignedParams {
    #[schemars(description = "Merge request state filter: opened, closed, merged or all")]
    #[serde(default)]
    pub state: MergeRequestState,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChangesParams {
    #[schemars(description = "Project ID or namespaced path, e.g. 42 or group/project")]
    pub project: String,
    #[schemars(description = "Merge request IID, with or without the leading '!'")]
    pub mr: String,
}

#[derive(Clone)]
pub struct GitLabService {
    client: Arc<GitLabClient>,
    tool_router: ToolRouter<Self>,
}

fn text_response(message: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(message.into())])
}

#[tool_router]
impl GitLabService {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            client: Arc::new(GitLabClient::new(config)?),
            tool_router: Self::tool_router(),
        })
    }

    #[tool(
        name = "get_assigned_merge_requests",
        description = "List merge requests assigned to the authenticated GitLab user, optionally filtered by state (opened, closed, merged, all). Defaults to opened."
    )]
    async fn get_assigned_merge_requests(
        &self,
        Parameters(params): Parameters<ListAssignedParams>,
    ) -> Result<CallToolResult, McpError> {
        let state = params.state;
        tracing::info!(%state, "listing assigned merge requests");

        let user = match self.client.current_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "fetching current user failed");
                return Ok(text_response(format!(
                    "Failed to fetch the current user: {e}"
                )));
            }
        };

        let merge_requests = match self.client.assigned_merge_requests(user.id, state).await {
            Ok(merge_requests) => merge_requests,
            Err(e) => {
                tracing::warn!(error = %e, "fetching merge requests failed");
                return Ok(text_response(format!(
                    "Failed to fetch merge requests: {e}"
                )));
            }
        };

        if merge_requests.is_empty() {
            return Ok(text_response(format!(
                "No {state} merge requests assigned to {} (@{}).",
                user.name, user.username
            )));
        }

        let mut out = format!(
            "Merge requests assigned to {} (@{}), state: {state}\n\n",
            user.name, user.username
        );
        for mr in &merge_requests {
            out.push_str(&format_merge_request(mr));
            out.push('\n');
        }
        Ok(text_response(out))
    }

    #[tool(
        name = "get_merge_request_changes",
        description = "Fetch the raw file changes (diffs) of a merge request as JSON. Takes a project ID or namespaced path and the merge request IID."
    )]
    async fn get_merge_request_changes(
        &self,
        Parameters(params): Parameters<ChangesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(project = %params.project, mr = %params.mr, "fetching merge request changes");

        let project_id = match self.client.resolve_project_id(&params.project).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, project = %params.project, "project resolution failed");
                return Ok(text_response(format!(
                    "Failed to resolve project '{}': {e}",
                    params.project
                )));
            }
        };

        let iid = params.mr.strip_prefix('!').unwrap_or(&params.mr);

        let payload = match self.client.merge_request_changes(project_id, iid).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "fetching changes failed");
                return Ok(text_response(format!(
                    "Failed to fetch changes for !{iid} in project '{}': {e}",
                    params.project
                )));
            }
        };

        let Some(changes) = payload.changes else {
            return Ok(text_response(format!(
                "GitLab returned no changes for !{iid} in project '{}'.",
                params.project
            )));
        };

        let changes: Vec<ChangeSummary> = changes.into_iter().map(ChangeSummary::from).collect();
        let body = json!({
            "project": params.project,
            "project_id": project_id,
            "merge_request": format!("!{iid}"),
            "changes": changes,
        });
        let rendered = serde_json::to_string_pretty(&body)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(text_response(rendered))
    }
}

#[tool_handler]
impl ServerHandler for GitLabService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "gitlab-mcp".to_string(),
                title: Some("GitLab MCP".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "GitLab MCP server with two tools: list merge requests assigned to the \
                 authenticated user, and fetch the raw file changes of a merge request. \
                 Projects can be referenced by numeric ID or namespaced path."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
