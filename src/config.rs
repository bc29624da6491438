//! GitLab connection settings, resolved once at startup from the environment.

pub const DEFAULT_API_BASE: &str = "https://gitlab.com/api/v4";
const API_PATH_SUFFIX: &str = "/api/v4";

/// Immutable connection settings, passed by reference into the client.
///
/// An empty token is a valid configuration; the failure is reported on the
/// first tool call rather than at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base: String,
    pub token: String,
    pub insecure_tls: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::var("GITLAB_API_URL").ok(),
            std::env::var("GITLAB_HOST").ok(),
            std::env::var("GITLAB_TOKEN").ok(),
            std::env::var("GITLAB_INSECURE_TLS").ok(),
        )
    }

    fn resolve(
        api_url: Option<String>,
        host: Option<String>,
        token: Option<String>,
        insecure_tls: Option<String>,
    ) -> Self {
        Self {
            api_base: resolve_api_base(api_url.as_deref(), host.as_deref()),
            token: token.unwrap_or_default(),
            insecure_tls: insecure_tls
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

/// Priority order: explicit API base, host promoted to a full API URL,
/// then the gitlab.com default. The result never ends in a slash.
fn resolve_api_base(api_url: Option<&str>, host: Option<&str>) -> String {
    if let Some(url) = api_url.filter(|v| !v.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }
    if let Some(host) = host.filter(|v| !v.is_empty()) {
        let base = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        return format!("{}{}", base.trim_end_matches('/'), API_PATH_SUFFIX);
    }
    DEFAULT_API_BASE.to_string()
}
