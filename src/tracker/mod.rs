pub mod github;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
}

/// An issue as reported by a remote tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub html_url: String,
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
    All,
}

impl IssueState {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSort {
    Created,
    Updated,
    Comments,
}

impl IssueSort {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueSort::Created => "created",
            IssueSort::Updated => "updated",
            IssueSort::Comments => "comments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Filters for a collection fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueQuery {
    pub state: IssueState,
    pub sort: IssueSort,
    pub direction: Direction,
}

impl IssueQuery {
    /// Open issues, oldest first.
    pub fn open_oldest_first() -> Self {
        Self {
            state: IssueState::Open,
            sort: IssueSort::Created,
            direction: Direction::Asc,
        }
    }
}

/// Read access to a remote issue tracker.
///
/// Implementations report a missing repository or issue as
/// [`Error::NotFound`](crate::error::Error::NotFound) and every other
/// failure as some other variant. Pagination is handled inside
/// `list_issues`.
pub trait IssueTracker {
    /// Fetch a single issue by number.
    fn issue(&self, account: &str, repo: &str, number: u64) -> Result<Issue>;

    /// Fetch every issue of `account/repo` matching `query`, in tracker order.
    fn list_issues(&self, account: &str, repo: &str, query: &IssueQuery) -> Result<Vec<Issue>>;
}

impl<T: IssueTracker + ?Sized> IssueTracker for &T {
    fn issue(&self, account: &str, repo: &str, number: u64) -> Result<Issue> {
        (**self).issue(account, repo, number)
    }

    fn list_issues(&self, account: &str, repo: &str, query: &IssueQuery) -> Result<Vec<Issue>> {
        (**self).list_issues(account, repo, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_oldest_first_query() {
        let query = IssueQuery::open_oldest_first();
        assert_eq!(query.state.as_str(), "open");
        assert_eq!(query.sort.as_str(), "created");
        assert_eq!(query.direction.as_str(), "asc");
    }
}
