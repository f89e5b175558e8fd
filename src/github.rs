use crate::error::FetchError;
use crate::stats::LanguageTotals;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Repositories requested per listing page.
pub const PER_PAGE: u32 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "top-langs";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// One entry of `GET /users/{username}/repos`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepoSummary {
    pub owner: Owner,
    pub name: String,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
}

/// The two GitHub calls the language pipeline needs.
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// One page (1-based) of the user's owner-type repositories, most recently pushed first.
    async fn list_repos_page(
        &self,
        username: &str,
        page: u32,
    ) -> Result<Vec<RepoSummary>, FetchError>;

    /// Bytes per language for a single repository.
    async fn repo_languages(&self, owner: &str, name: &str)
    -> Result<LanguageTotals, FetchError>;
}

#[derive(Clone)]
pub struct GithubClient {
    base_url: Url,
    token: Option<Arc<String>>,
    http: Arc<Client>,
}

impl GithubClient {
    /// Create a REST client rooted at `base_url`.
    /// Requests are unauthenticated when `token` is `None`.
    pub fn new(base_url: Url, token: Option<&str>) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            anyhow::bail!("GitHub API URL {base_url} cannot carry a path");
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url,
            token: token.map(|t| Arc::new(t.to_string())),
            http: Arc::new(http),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let req = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");

        match &self.token {
            Some(token) => req.bearer_auth(token.as_str()),
            None => req,
        }
    }

    /// Send `req` and decode the JSON body.
    /// Non-2xx answers keep the upstream body for the error message.
    async fn get_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, FetchError> {
        let resp = req.send().await?;
        let status = resp.status();
        tracing::debug!(url = %resp.url(), status = status.as_u16(), "GitHub response");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn list_repos_page(
        &self,
        username: &str,
        page: u32,
    ) -> Result<Vec<RepoSummary>, FetchError> {
        let url = self.endpoint(&["users", username, "repos"]);
        let req = self.get(url).query(&[
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
            ("type", "owner".to_string()),
            ("sort", "pushed".to_string()),
            ("direction", "desc".to_string()),
        ]);

        self.get_json(req).await
    }

    async fn repo_languages(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<LanguageTotals, FetchError> {
        let url = self.endpoint(&["repos", owner, name, "languages"]);
        self.get_json(self.get(url)).await
    }
}
