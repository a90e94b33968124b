use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::header;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::FetchError;

/// Production GitHub API endpoint.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Client identifier GitHub requires on every request.
const USER_AGENT: &str = "GitHub-Repos-Checker";

// A hung request would otherwise stall the whole reconciliation pass.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A repository as returned by the GitHub list endpoint.
///
/// Unknown fields in the payload are ignored; only what the announcement
/// pipeline needs is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl Repo {
    /// True when the repository carries a human-written description.
    pub fn has_description(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }
}

/// Minimal GitHub client for listing a user's repositories.
pub struct GitHubClient {
    client: reqwest::Client,
    api_base: String,
    username: String,
}

impl GitHubClient {
    /// Create a client against a given API base URL.
    ///
    /// Production callers pass [`GITHUB_API_BASE`]; tests point this at a
    /// local mock server.
    pub fn new(api_base: impl Into<String>, username: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create GitHub HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.into(),
            username: username.into(),
        })
    }

    /// Fetch the account's repositories in a single request.
    ///
    /// One page only - the newest repositories come first, which is all the
    /// announcement loop needs. No ordering guarantee is made here; the
    /// caller sorts before filtering.
    pub async fn list_repositories(&self) -> Result<Vec<Repo>, FetchError> {
        let url = format!(
            "{}/users/{}/repos?sort=created&direction=desc",
            self.api_base, self.username
        );
        debug!("Fetching repository list for {}", self.username);

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let repos: Vec<Repo> = response.json().await.map_err(FetchError::Decode)?;
        info!("Fetched {} repositories for {}", repos.len(), self.username);
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_deserialization() {
        // Trimmed-down GitHub payload with an extra field to ignore
        let json = r#"{
            "id": 42,
            "name": "my-project",
            "description": "A thing",
            "created_at": "2024-05-01T12:00:00Z",
            "html_url": "https://github.com/octocat/my-project",
            "homepage": "https://example.com",
            "language": "Rust",
            "stargazers_count": 7
        }"#;

        let repo: Repo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.id, 42);
        assert_eq!(repo.name, "my-project");
        assert_eq!(repo.language.as_deref(), Some("Rust"));
        assert_eq!(repo.created_at.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn test_repo_optional_fields_null() {
        let json = r#"{
            "id": 1,
            "name": "bare",
            "description": null,
            "created_at": "2024-05-01T12:00:00Z",
            "html_url": "https://github.com/octocat/bare",
            "homepage": null,
            "language": null
        }"#;

        let repo: Repo = serde_json::from_str(json).unwrap();
        assert!(repo.description.is_none());
        assert!(repo.homepage.is_none());
        assert!(repo.language.is_none());
    }

    #[test]
    fn test_has_description() {
        let mut repo: Repo = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "r",
                "created_at": "2024-05-01T12:00:00Z",
                "html_url": "u"
            }"#,
        )
        .unwrap();

        assert!(!repo.has_description());

        repo.description = Some(String::new());
        assert!(!repo.has_description());

        repo.description = Some("   \t ".to_string());
        assert!(!repo.has_description());

        repo.description = Some("real words".to_string());
        assert!(repo.has_description());
    }
}
