use std::fmt::Write as _;

use anyhow::{Context, bail};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::WEB_SEARCH_MAX_RESULTS;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// External web search, returning results already formatted for the model.
pub trait WebSearchProvider {
    fn run(&self, query: &str) -> anyhow::Result<String>;
}

/// Tavily search API client.
pub struct TavilySearch {
    client: Client,
    api_key: String,
    max_results: usize,
    url: String,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            max_results: WEB_SEARCH_MAX_RESULTS,
            url: TAVILY_SEARCH_URL.to_string(),
        }
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<WebResult>,
}

#[derive(Debug, Deserialize)]
struct WebResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl WebSearchProvider for TavilySearch {
    fn run(&self, query: &str) -> anyhow::Result<String> {
        debug!(query = %query, max_results = self.max_results, "Searching the web");
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&SearchRequest {
                query,
                max_results: self.max_results,
            })
            .send()
            .context("Failed to reach the Tavily API")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            bail!("Tavily API returned {status}: {detail}");
        }

        let parsed: SearchResponse = response
            .json()
            .context("Failed to decode Tavily response")?;
        Ok(format_results(&parsed.results))
    }
}

fn format_results(results: &[WebResult]) -> String {
    if results.is_empty() {
        return "No web results found.".to_string();
    }
    let mut out = String::new();
    for (i, r) in results.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        let _ = write!(out, "{}\nURL: {}\n{}", r.title, r.url, r.content);
    }
    out
}
