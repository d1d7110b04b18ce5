use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};

use super::{Issue, IssueQuery, IssueTracker, Label};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("pomo/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct GhLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GhIssue {
    number: u64,
    title: String,
    body: Option<String>,
    html_url: String,
    #[serde(default)]
    labels: Vec<GhLabel>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GhErrorBody {
    message: String,
}

/// Read the API token from `token_env`. Missing or empty means anonymous access.
pub fn resolve_token(token_env: &str) -> Option<String> {
    std::env::var(token_env).ok().filter(|t| !t.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Client abstraction (for testability)
// ---------------------------------------------------------------------------

/// Raw GET access to the GitHub REST API.
pub trait GitHubApi {
    /// GET `path` (relative to the API root) and return the response body.
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String>;
}

/// `ureq`-backed client with retry and exponential backoff.
struct DefaultGitHubApi {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl DefaultGitHubApi {
    fn new(base_url: &str, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }
}

impl GitHubApi for DefaultGitHubApi {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}{path}", self.base_url);

        let mut backoff_ms = INITIAL_BACKOFF_MS;
        for attempt in 1..=MAX_RETRIES {
            let mut request = self
                .agent
                .get(&url)
                .set("Accept", "application/vnd.github+json")
                .set("X-GitHub-Api-Version", "2022-11-28");
            if let Some(token) = &self.token {
                request = request.set("Authorization", &format!("Bearer {token}"));
            }
            for (key, value) in query {
                request = request.query(key, value);
            }

            match request.call() {
                Ok(response) => {
                    return response.into_string().map_err(|e| {
                        Error::Tracker(format!("failed to read GitHub response: {e}"))
                    });
                }
                Err(ureq::Error::Status(404, response)) => {
                    return Err(Error::NotFound(format!(
                        "GET {url}: 404 - {}",
                        error_message(response)
                    )));
                }
                Err(ref e) if attempt < MAX_RETRIES && is_retryable(e) => {
                    warn!(
                        attempt,
                        error = %e,
                        backoff_ms,
                        "retrying GitHub API after transient error"
                    );
                    thread::sleep(Duration::from_millis(backoff_ms));
                    backoff_ms *= 2;
                }
                Err(ureq::Error::Status(code, response)) => {
                    return Err(Error::Tracker(format!(
                        "GET {url}: {code} - {}",
                        error_message(response)
                    )));
                }
                Err(e) => {
                    return Err(Error::Tracker(format!("GET {url} failed: {e}")));
                }
            }
        }
        unreachable!()
    }
}

/// Only retry rate-limits (429), server errors (5xx), and transport/network errors.
fn is_retryable(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::Status(code, _) => *code == 429 || *code >= 500,
        ureq::Error::Transport(_) => true,
    }
}

/// GitHub's `message` field from an error body, falling back to the HTTP status text.
fn error_message(response: ureq::Response) -> String {
    let status_text = response.status_text().to_string();
    response
        .into_string()
        .ok()
        .and_then(|body| parse_error_message(&body))
        .unwrap_or(status_text)
}

fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<GhErrorBody>(body)
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

pub struct GitHubTracker {
    api: Box<dyn GitHubApi>,
    per_page: u32,
}

impl GitHubTracker {
    pub fn new(config: &Config) -> Self {
        let token = resolve_token(&config.token_env);
        if token.is_none() {
            debug!(
                token_env = %config.token_env,
                "no GitHub token set, using anonymous access"
            );
        }
        Self {
            api: Box::new(DefaultGitHubApi::new(&config.api_url, token)),
            per_page: config.per_page,
        }
    }

    #[cfg(test)]
    fn with_api(api: Box<dyn GitHubApi>, per_page: u32) -> Self {
        Self { api, per_page }
    }

    fn parse_issue(gh: GhIssue) -> Result<Issue> {
        if gh.number == 0 {
            return Err(Error::Tracker(format!(
                "GitHub returned issue number 0 for '{}'",
                gh.title
            )));
        }
        if !(gh.html_url.starts_with("https://") || gh.html_url.starts_with("http://")) {
            return Err(Error::Tracker(format!(
                "GitHub returned issue #{} with invalid html_url '{}'",
                gh.number, gh.html_url
            )));
        }
        Ok(Issue {
            number: gh.number,
            title: gh.title,
            body: gh.body.unwrap_or_default(),
            html_url: gh.html_url,
            labels: gh
                .labels
                .into_iter()
                .map(|l| Label { name: l.name })
                .collect(),
        })
    }
}

impl IssueTracker for GitHubTracker {
    fn issue(&self, account: &str, repo: &str, number: u64) -> Result<Issue> {
        let path = format!("/repos/{account}/{repo}/issues/{number}");
        let json = self.api.get(&path, &[])?;

        let issue: GhIssue = serde_json::from_str(&json)
            .map_err(|e| Error::Tracker(format!("failed to parse GitHub issue: {e}")))?;

        debug!(account, repo, number, "fetched issue");
        Self::parse_issue(issue)
    }

    fn list_issues(&self, account: &str, repo: &str, query: &IssueQuery) -> Result<Vec<Issue>> {
        let path = format!("/repos/{account}/{repo}/issues");
        let per_page = self.per_page.to_string();

        let mut issues = Vec::new();
        let mut page: u32 = 1;
        loop {
            let page_param = page.to_string();
            let json = self.api.get(
                &path,
                &[
                    ("state", query.state.as_str()),
                    ("sort", query.sort.as_str()),
                    ("direction", query.direction.as_str()),
                    ("per_page", &per_page),
                    ("page", &page_param),
                ],
            )?;

            let batch: Vec<GhIssue> = serde_json::from_str(&json)
                .map_err(|e| Error::Tracker(format!("failed to parse GitHub issues: {e}")))?;
            let fetched = batch.len();

            // The issues endpoint also lists pull requests.
            for gh in batch.into_iter().filter(|i| i.pull_request.is_none()) {
                issues.push(Self::parse_issue(gh)?);
            }

            debug!(page, fetched, "fetched issue page");
            if fetched < self.per_page as usize {
                break;
            }
            page += 1;
        }

        debug!(count = issues.len(), account, repo, "fetched issues");
        Ok(issues)
    }
}
