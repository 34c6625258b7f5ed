//! GitHub repository search over the REST API (blocking)

use crate::domain::RepoDescriptor;
use crate::error::{ConfigError, FetchError};
use crate::ports::{RepoIter, SearchClient, SearchQuery};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

/// Public GitHub API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("topicharvest/", env!("CARGO_PKG_VERSION"));

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The search API never returns more than this many results for one query
pub const SEARCH_RESULT_CAP: usize = 1000;

/// Largest page size the search API accepts
pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total_count: usize,
    #[serde(default)]
    incomplete_results: bool,
    items: Vec<RepoDescriptor>,
}

/// Search client for `GET /search/repositories`
#[derive(Debug, Clone)]
pub struct GitHubSearchClient {
    client: Client,
    api_url: String,
    auth: HeaderValue,
    per_page: usize,
}

impl GitHubSearchClient {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(ConfigError::Client)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.into()))
            .map_err(|_| ConfigError::InvalidToken)?;
        auth.set_sensitive(true);

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            auth,
            per_page: MAX_PER_PAGE,
        })
    }

    /// Page size, clamped to what the API accepts
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));
        headers.insert(AUTHORIZATION, self.auth.clone());
        headers
    }

    fn fetch_page(&self, query: &str, page: usize) -> Result<SearchResponse, FetchError> {
        let url = format!("{}/search/repositories", self.api_url);
        debug!("Fetching search page {} for {:?}", page, query);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .query(&[
                ("q", query.to_string()),
                ("per_page", self.per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl SearchClient for GitHubSearchClient {
    fn search(&self, query: &SearchQuery) -> RepoIter<'_> {
        Box::new(SearchPages {
            client: self,
            query: query.to_query_string(),
            next_page: 1,
            fetched: 0,
            buffer: VecDeque::new(),
            done: false,
        })
    }
}

/// Iterator that requests the next page only when the buffer runs dry
struct SearchPages<'a> {
    client: &'a GitHubSearchClient,
    query: String,
    next_page: usize,
    fetched: usize,
    buffer: VecDeque<RepoDescriptor>,
    done: bool,
}

impl SearchPages<'_> {
    fn load_next(&mut self) -> Result<(), FetchError> {
        let per_page = self.client.per_page;
        let response = self.client.fetch_page(&self.query, self.next_page)?;

        if response.incomplete_results {
            debug!("Search page {} reported incomplete results", self.next_page);
        }

        let received = response.items.len();
        self.fetched += received;
        self.buffer.extend(response.items);

        if received < per_page
            || self.fetched >= response.total_count
            || self.next_page * per_page >= SEARCH_RESULT_CAP
        {
            self.done = true;
        }
        self.next_page += 1;
        Ok(())
    }
}

impl Iterator for SearchPages<'_> {
    type Item = Result<RepoDescriptor, FetchError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(repo) = self.buffer.pop_front() {
                return Some(Ok(repo));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.load_next() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn item(name: &str) -> serde_json::Value {
        serde_json::json!({
            "full_name": name,
            "html_url": format!("https://github.com/{name}"),
            "description": "desc",
            "fork": false,
        })
    }

    fn page_body(total: usize, names: &[&str]) -> String {
        serde_json::json!({
            "total_count": total,
            "incomplete_results": false,
            "items": names.iter().map(|n| item(n)).collect::<Vec<_>>(),
        })
        .to_string()
    }

    fn security_query() -> SearchQuery {
        SearchQuery::new(vec!["security".into()], 50)
    }

    #[test]
    fn test_single_page_search() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "topic:security stars:>50 fork:false".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body(2, &["a/one", "b/two"]))
            .create();

        let client = GitHubSearchClient::new(server.url(), "secret", DEFAULT_TIMEOUT).unwrap();
        let repos: Vec<_> = client
            .search(&security_query())
            .collect::<Result<_, _>>()
            .unwrap();

        mock.assert();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].full_name, "a/one");
        assert_eq!(repos[1].html_url, "https://github.com/b/two");
    }

    #[test]
    fn test_follows_pages_until_short_page() {
        let mut server = Server::new();
        let first = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(page_body(3, &["a/one", "a/two"]))
            .create();
        let second = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(page_body(3, &["a/three"]))
            .create();

        let client = GitHubSearchClient::new(server.url(), "t", DEFAULT_TIMEOUT)
            .unwrap()
            .with_per_page(2);
        let names: Vec<String> = client
            .search(&security_query())
            .map(|r| r.unwrap().full_name)
            .collect();

        first.assert();
        second.assert();
        assert_eq!(names, vec!["a/one", "a/two", "a/three"]);
    }

    #[test]
    fn test_lazy_iteration_does_not_fetch_unneeded_pages() {
        let mut server = Server::new();
        let first = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(page_body(10, &["a/one", "a/two"]))
            .create();
        let second = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(page_body(10, &["a/three", "a/four"]))
            .expect(0)
            .create();

        let client = GitHubSearchClient::new(server.url(), "t", DEFAULT_TIMEOUT)
            .unwrap()
            .with_per_page(2);
        let taken: Vec<_> = client.search(&security_query()).take(2).collect();

        assert_eq!(taken.len(), 2);
        first.assert();
        second.assert();
    }

    #[test]
    fn test_error_status_is_fetch_error() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("rate limited")
            .create();

        let client = GitHubSearchClient::new(server.url(), "t", DEFAULT_TIMEOUT).unwrap();
        let mut results = client.search(&security_query());

        match results.next() {
            Some(Err(FetchError::Status { status, body })) => {
                assert_eq!(status, 403);
                assert_eq!(body, "rate limited");
            }
            other => panic!("Expected Status error, got: {:?}", other),
        }
        assert!(results.next().is_none());
        mock.assert();
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create();

        let client = GitHubSearchClient::new(server.url(), "t", DEFAULT_TIMEOUT).unwrap();
        let first = client.search(&security_query()).next();
        assert!(matches!(first, Some(Err(FetchError::Decode(_)))));
    }

    #[test]
    fn test_token_rejected_by_header_is_config_error() {
        let result = GitHubSearchClient::new(DEFAULT_API_URL, "ghp_abc\ndef", DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(ConfigError::InvalidToken)));
    }

    #[test]
    fn test_every_page_is_authenticated() {
        let mut server = Server::new();
        let anonymous = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::Any)
            .match_header("authorization", Matcher::Missing)
            .with_status(401)
            .expect(0)
            .create();
        let authed = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer ghp_token")
            .with_status(200)
            .with_body(page_body(1, &["a/one"]))
            .create();

        let client = GitHubSearchClient::new(server.url(), "ghp_token", DEFAULT_TIMEOUT).unwrap();
        let repos: Vec<_> = client.search(&security_query()).collect();

        assert_eq!(repos.len(), 1);
        assert!(repos[0].is_ok());
        anonymous.assert();
        authed.assert();
    }

    #[test]
    fn test_per_page_is_clamped() {
        let client = GitHubSearchClient::new(DEFAULT_API_URL, "t", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.clone().with_per_page(0).per_page, 1);
        assert_eq!(client.with_per_page(500).per_page, MAX_PER_PAGE);
    }
}
