//! GitLab API payloads consumed by the tools. All request-scoped snapshots,
//! deserialized per call and never cached.

use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub name: String,
}

// Some fields mirror the wire payload but are only carried, never read.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(default)]
    #[allow(dead_code)]
    pub name: Option<String>,
    pub path_with_namespace: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub web_url: Option<String>,
}

/// The `references` object embedded in list responses; `full` looks like
/// `group/project!42`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct References {
    #[serde(default)]
    pub full: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequest {
    #[allow(dead_code)]
    pub id: u64,
    #[allow(dead_code)]
    pub iid: u64,
    pub title: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub description: Option<String>,
    pub state: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub source_branch: Option<String>,
    #[serde(default)]
    pub target_branch: Option<String>,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    #[allow(dead_code)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub project: Option<Project>,
    #[serde(default)]
    pub references: Option<References>,
}

/// One changed file in a merge request. The flags default to `false` when
/// the API omits them.
#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub old_path: String,
    #[serde(default)]
    pub new_path: String,
    #[serde(default)]
    pub new_file: bool,
    #[serde(default)]
    pub renamed_file: bool,
    #[serde(default)]
    pub deleted_file: bool,
    #[serde(default)]
    pub diff: String,
}

/// Response of `/projects/{id}/merge_requests/{iid}/changes`. Only the
/// `changes` array is consumed; its absence is a handled failure.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequestChanges {
    #[serde(default)]
    pub changes: Option<Vec<Change>>,
}

/// The reduced per-file shape emitted by `get_merge_request_changes`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeSummary {
    pub old_path: String,
    pub new_path: String,
    pub new_file: bool,
    pub renamed_file: bool,
    pub deleted_file: bool,
    pub diff: String,
}

impl From<Change> for ChangeSummary {
    fn from(change: Change) -> Self {
        Self {
            old_path: change.old_path,
            new_path: change.new_path,
            new_file: change.new_file,
            renamed_file: change.renamed_file,
            deleted_file: change.deleted_file,
            diff: change.diff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestState {
    #[default]
    Opened,
    Closed,
    Merged,
    All,
}

impl MergeRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Closed => "closed",
            Self::Merged => "merged",
            Self::All => "all",
        }
    }
}

impl fmt::Display for MergeRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_flags_default_to_false() {
        let change: Change = serde_json::from_str(
            r#"{"old_path": "src/lib.rs", "new_path": "src/lib.rs", "diff": "@@ -1 +1 @@"}"#,
        )
        .unwrap();
        assert!(!change.new_file);
        assert!(!change.renamed_file);
        assert!(!change.deleted_file);

        let summary = ChangeSummary::from(change);
        let value = serde_json::to_value(&summary).unwrap();
        for key in ["new_file", "renamed_file", "deleted_file"] {
            assert!(value[key].is_boolean(), "{key} must serialize as a boolean");
        }
    }

    #[test]
    fn test_changes_payload_without_changes_field() {
        let payload: MergeRequestChanges = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(payload.changes.is_none());
    }

    #[test]
    fn test_state_round_trip() {
        assert_eq!(MergeRequestState::default(), MergeRequestState::Opened);
        let state: MergeRequestState = serde_json::from_str(r#""merged""#).unwrap();
        assert_eq!(state, MergeRequestState::Merged);
        assert_eq!(state.to_string(), "merged");
    }
}
