use std::fmt;
use std::io::{self, Write};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::task::{LineFormat, Render, Task};
use crate::tracker::{Issue, IssueQuery, IssueTracker};

/// Shown when the tracker says the repository or issue does not exist.
pub const NOT_FOUND_MESSAGE: &str = "404: This is not the repository you were looking for.";

/// Issue-specific fields of an [`IssueTask`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueTaskConfig {
    pub username: String,
    pub project: String,
    pub labels: Vec<String>,
    pub number: u64,
    pub url: String,
    pub description: String,
}

/// A task imported from a remote issue tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTask {
    task: Task,
    username: String,
    project: String,
    labels: Vec<String>,
    number: u64,
    url: String,
}

impl IssueTask {
    pub fn new(name: impl Into<String>, config: IssueTaskConfig) -> Self {
        Self {
            task: Task::new(name).with_description(config.description),
            username: config.username,
            project: config.project,
            labels: config.labels,
            number: config.number,
            url: config.url,
        }
    }

    fn from_issue(account: &str, repo: &str, issue: Issue) -> Self {
        Self::new(
            issue.title,
            IssueTaskConfig {
                username: account.to_string(),
                project: repo.to_string(),
                labels: issue.labels.into_iter().map(|l| l.name).collect(),
                number: issue.number,
                url: issue.html_url,
                description: issue.body,
            },
        )
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Mark the underlying task complete.
    pub fn complete(&mut self) {
        self.task.complete();
    }

    pub fn name(&self) -> &str {
        &self.task.name
    }

    pub fn description(&self) -> &str {
        &self.task.description
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `username/project`.
    pub fn full_project(&self) -> String {
        format!("{}/{}", self.username, self.project)
    }
}

impl fmt::Display for IssueTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:<3} {}", self.number, self.task.name)
    }
}

impl Render for IssueTask {
    fn verbose_output(&self, format: &LineFormat, out: &mut dyn Write) -> io::Result<()> {
        self.task.verbose_output(format, out)?;
        if !self.labels.is_empty() {
            format.say(out, "labels", &self.labels.join(", "))?;
        }
        format.say(out, "project", &self.full_project())?;
        format.say(out, "url", &self.url)
    }
}

/// Turns tracker issues into [`IssueTask`]s.
pub struct IssueImporter<T: IssueTracker> {
    tracker: T,
}

impl<T: IssueTracker> IssueImporter<T> {
    pub fn new(tracker: T) -> Self {
        Self { tracker }
    }

    /// Import issue `number` of `account/repo`, or every open issue (oldest
    /// first) when `number` is `None`.
    ///
    /// A missing repository or issue comes back as [`Error::NotFound`]; the
    /// caller decides what to do with it (see [`not_found_diagnostic`]). Other
    /// tracker errors are returned unchanged.
    pub fn import(&self, account: &str, repo: &str, number: Option<u64>) -> Result<Vec<IssueTask>> {
        validate_identifier("account", account)?;
        validate_identifier("repository", repo)?;

        let issues = match number {
            Some(number) => vec![self.tracker.issue(account, repo, number)?],
            None => {
                self.tracker
                    .list_issues(account, repo, &IssueQuery::open_oldest_first())?
            }
        };
        debug!(count = issues.len(), account, repo, "mapping issues to tasks");

        let tasks: Vec<IssueTask> = issues
            .into_iter()
            .map(|issue| IssueTask::from_issue(account, repo, issue))
            .collect();

        info!(count = tasks.len(), "imported {account}/{repo}");
        Ok(tasks)
    }
}

/// Accounts and repositories end up as URL path segments, so only
/// `[A-Za-z0-9._-]` is accepted.
fn validate_identifier(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidInput(format!("{kind} must not be empty")));
    }
    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(Error::InvalidInput(format!(
            "{kind} '{value}' contains invalid character {c:?}"
        )));
    }
    if value == "." || value == ".." {
        return Err(Error::InvalidInput(format!("{kind} '{value}' is not a name")));
    }
    Ok(())
}

/// The not-found diagnostic: a blank line, [`NOT_FOUND_MESSAGE`], then the
/// underlying error message.
pub fn not_found_diagnostic(err: &Error) -> String {
    format!("\n{NOT_FOUND_MESSAGE}\n{err}\n")
}
