use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::SearchConfig;

/// Fallback message when a transport failure carries no text of its own.
pub const GENERIC_SEARCH_ERROR: &str = "Error while searching";

// Subset of the fields available on an individual search hit. The API
// serializes absent text fields as null; both null and missing decode to "".
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_to_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub author: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub story_text: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub comment_text: String,
    #[serde(rename = "objectID")]
    pub object_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<SearchResult>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub nb_hits: u32,
    #[serde(default)]
    pub nb_pages: u32,
    #[serde(default)]
    pub query: String,
}

fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<SearchResponse>;
}

/// Production backend talking to the Algolia-powered Hacker News search API.
pub struct AlgoliaBackend {
    base_url: String,
    tags: String,
    client: reqwest::Client,
}

impl AlgoliaBackend {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tags: config.tags.clone(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SearchBackend for AlgoliaBackend {
    async fn search(&self, query: &str, page: u32) -> Result<SearchResponse> {
        let url = format!("{}/search", self.base_url);
        debug!("GET {} query='{}' page={}", url, query, page);

        let page_param = page.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query),
                ("tags", self.tags.as_str()),
                ("page", page_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                let message = e.to_string();
                if message.is_empty() {
                    anyhow!(GENERIC_SEARCH_ERROR)
                } else {
                    anyhow!(message)
                }
            })?;

        if !response.status().is_success() {
            return Err(anyhow!("{}", reason_phrase(response.status())));
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| anyhow!("Failed to parse search response: {}", e))
    }
}

fn reason_phrase(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
