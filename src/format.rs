//! Human-readable rendering of merge requests for the text-only tool channel.

use crate::types::MergeRequest;
use chrono::{DateTime, Local};
use url::Url;

const NO_ASSIGNEES_PLACEHOLDER: &str = "None";
const UNKNOWN_PLACEHOLDER: &str = "unknown";

/// Renders one merge request as a fixed-field text block with a trailing
/// separator line.
pub fn format_merge_request(mr: &MergeRequest) -> String {
    let author = mr
        .author
        .as_ref()
        .map(|u| format!("{} (@{})", u.name, u.username))
        .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string());
    let assignees = if mr.assignees.is_empty() {
        NO_ASSIGNEES_PLACEHOLDER.to_string()
    } else {
        mr.assignees
            .iter()
            .map(|u| u.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Title: {title}\n\
         Project: {project}\n\
         State: {state}\n\
         Author: {author}\n\
         Assignees: {assignees}\n\
         Branch: {source} -> {target}\n\
         Created: {created}\n\
         Updated: {updated}\n\
         URL: {url}\n\
         ---\n",
        title = mr.title,
        project = project_path(mr),
        state = mr.state,
        source = mr.source_branch.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER),
        target = mr.target_branch.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER),
        created = localize(mr.created_at.as_deref()),
        updated = localize(mr.updated_at.as_deref()),
        url = mr.web_url.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER),
    )
}

fn localize(timestamp: Option<&str>) -> String {
    let Some(timestamp) = timestamp else {
        return UNKNOWN_PLACEHOLDER.to_string();
    };
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S %Z")
                .to_string()
        })
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Best-effort project path: embedded project record, then the reference
/// string before `!`, then the web URL, then the numeric id, then a
/// placeholder.
pub fn project_path(mr: &MergeRequest) -> String {
    if let Some(project) = &mr.project {
        return project.path_with_namespace.clone();
    }
    if let Some(full) = mr.references.as_ref().and_then(|r| r.full.as_deref())
        && let Some((path, _)) = full.split_once('!')
        && !path.is_empty()
    {
        return path.to_string();
    }
    if let Some(path) = mr.web_url.as_deref().and_then(path_from_web_url) {
        return path;
    }
    if let Some(id) = mr.project_id {
        return format!("project #{id}");
    }
    UNKNOWN_PLACEHOLDER.to_string()
}

/// Extracts `group/sub/project` from a URL like
/// `https://host/group/sub/project/-/merge_requests/42`. The `-` segment
/// separates the namespace path from the merge-request locator; without it,
/// fall back to the first two path segments.
fn path_from_web_url(web_url: &str) -> Option<String> {
    let url = Url::parse(web_url).ok()?;
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.iter().position(|s| *s == "-") {
        Some(0) => None,
        Some(marker) => Some(segments[..marker].join("/")),
        None if segments.len() >= 2 => Some(segments[..2].join("/")),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Project, References, User};

    fn bare_mr() -> MergeRequest {
        MergeRequest {
            id: 100,
            iid: 42,
            title: "Fix login redirect".to_string(),
            description: None,
            state: "opened".to_string(),
            created_at: Some("2024-03-01T12:00:00Z".to_string()),
            updated_at: Some("2024-03-02T08:30:00Z".to_string()),
            web_url: None,
            source_branch: Some("fix/login".to_string()),
            target_branch: Some("main".to_string()),
            author: Some(User {
                id: 1,
                username: "alice".to_string(),
                name: "Alice".to_string(),
            }),
            assignee: None,
            assignees: Vec::new(),
            project_id: None,
            project: None,
            references: None,
        }
    }

    #[test]
    fn test_path_derived_from_web_url() {
        let mut mr = bare_mr();
        mr.web_url = Some("https://host/group/sub/project/-/merge_requests/42".to_string());
        assert_eq!(project_path(&mr), "group/sub/project");
    }

    #[test]
    fn test_embedded_project_wins() {
        let mut mr = bare_mr();
        mr.web_url = Some("https://host/other/path/-/merge_requests/42".to_string());
        mr.project = Some(Project {
            id: 5,
            name: None,
            path_with_namespace: "group/project".to_string(),
            web_url: None,
        });
        assert_eq!(project_path(&mr), "group/project");
    }

    #[test]
    fn test_reference_string_before_bang() {
        let mut mr = bare_mr();
        mr.references = Some(References {
            full: Some("team/repo!42".to_string()),
        });
        assert_eq!(project_path(&mr), "team/repo");
    }

    #[test]
    fn test_web_url_without_marker_uses_first_two_segments() {
        let mut mr = bare_mr();
        mr.web_url = Some("https://host/group/project/merge_requests/42".to_string());
        assert_eq!(project_path(&mr), "group/project");
    }

    #[test]
    fn test_web_url_with_single_segment_fails_over() {
        let mut mr = bare_mr();
        mr.web_url = Some("https://host/only".to_string());
        mr.project_id = Some(99);
        assert_eq!(project_path(&mr), "project #99");
    }

    #[test]
    fn test_unknown_placeholder_when_nothing_derivable() {
        let mr = bare_mr();
        assert_eq!(project_path(&mr), UNKNOWN_PLACEHOLDER);
    }

    #[test]
    fn test_empty_assignees_render_placeholder() {
        let block = format_merge_request(&bare_mr());
        assert!(block.contains("Assignees: None\n"));
        assert!(!block.contains("Assignees: \n"));
    }

    #[test]
    fn test_assignees_comma_joined() {
        let mut mr = bare_mr();
        mr.assignees = vec![
            User {
                id: 2,
                username: "bob".to_string(),
                name: "Bob".to_string(),
            },
            User {
                id: 3,
                username: "carol".to_string(),
                name: "Carol".to_string(),
            },
        ];
        let block = format_merge_request(&mr);
        assert!(block.contains("Assignees: Bob, Carol\n"));
    }

    #[test]
    fn test_block_fields_and_separator() {
        let block = format_merge_request(&bare_mr());
        assert!(block.starts_with("Title: Fix login redirect\n"));
        assert!(block.contains("Author: Alice (@alice)\n"));
        assert!(block.contains("Branch: fix/login -> main\n"));
        assert!(block.ends_with("---\n"));
    }

    #[test]
    fn test_unparseable_timestamp_passes_through() {
        let mut mr = bare_mr();
        mr.created_at = Some("not-a-date".to_string());
        let block = format_merge_request(&mr);
        assert!(block.contains("Created: not-a-date\n"));
    }
}
