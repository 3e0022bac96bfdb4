use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Article, EncyclopediaProvider};
use crate::error::{FinsightError, Result};

const USER_AGENT: &str = "finsight/0.1 (company lookup; https://www.mediawiki.org/wiki/API:Etiquette)";

/// MediaWiki action API client: a title search followed by an intro-extract fetch.
pub struct WikipediaClient {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<ExtractPage>,
}

#[derive(Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    missing: bool,
}

impl WikipediaClient {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn search_titles(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FinsightError::ProviderError(format!(
                "encyclopedia search failed with status {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    async fn fetch_extracts(&self, titles: &[String]) -> Result<Vec<ExtractPage>> {
        let joined = titles.join("|");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", joined.as_str()),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FinsightError::ProviderError(format!(
                "encyclopedia extract request failed with status {}",
                response.status()
            )));
        }

        let body: ExtractResponse = response.json().await?;
        Ok(body.query.map(|q| q.pages).unwrap_or_default())
    }
}

#[async_trait]
impl EncyclopediaProvider for WikipediaClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Article>> {
        let titles = self.search_titles(query, limit).await?;
        if titles.is_empty() {
            tracing::debug!(query, "no encyclopedia search hits");
            return Ok(Vec::new());
        }

        let mut pages = self.fetch_extracts(&titles).await?;

        // The extract endpoint does not keep the search ranking.
        let rank = |title: &str| titles.iter().position(|t| t == title).unwrap_or(usize::MAX);
        pages.sort_by_key(|page| rank(&page.title));

        Ok(pages
            .into_iter()
            .filter(|page| !page.missing)
            .filter_map(|page| {
                let extract = page.extract?;
                Some(Article {
                    title: page.title,
                    extract,
                })
            })
            .collect())
    }
}
