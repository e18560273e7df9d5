//! Webpage capabilities: fetch a page, reduce HTML to visible text.
//!
//! `FetchWebpage` looks up the shared [`PageFetcher`] in the function
//! context; the embedding application seeds it once at registry build time.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Node};
use serde_json::{json, Map, Value};
use spider_core::{Function, FunctionContext, ParameterSpec};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
// Cap stored page bodies at 1MB so a single fetch cannot balloon a turn.
const MAX_BODY_BYTES: usize = 1024 * 1024;
// Excerpt length returned to the model; the full body stays with the caller.
const EXCERPT_CHARS: usize = 4000;

/// Shared HTTP fetcher for page-oriented capabilities.
pub struct PageFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

/// A fetched page: final URL, HTTP status, body (possibly truncated).
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
    pub truncated: bool,
}

impl PageFetcher {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_TIMEOUT, MAX_BODY_BYTES)
    }

    pub fn with_limits(timeout: Duration, max_body_bytes: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            max_body_bytes,
        }
    }

    pub async fn fetch(&self, url: &str) -> anyhow::Result<FetchedPage> {
        let parsed = url::Url::parse(url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("unsupported URL scheme '{}'", parsed.scheme());
        }

        log::info!("fetching webpage: {url}");

        let response = self.client.get(parsed).send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        let truncated = body.len() > self.max_body_bytes;
        let body = if truncated {
            let mut end = self.max_body_bytes;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body[..end].to_string()
        } else {
            body
        };

        Ok(FetchedPage {
            url: final_url,
            status,
            body,
            truncated,
        })
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FetchWebpage;

#[async_trait]
impl Function for FetchWebpage {
    fn name(&self) -> &str {
        "fetch_webpage"
    }

    fn description(&self) -> &str {
        "Fetch the HTML content of a webpage"
    }

    fn parameters(&self) -> BTreeMap<String, ParameterSpec> {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "url".to_string(),
            ParameterSpec::string("The URL of the webpage to fetch"),
        );
        parameters
    }

    fn required(&self) -> Vec<String> {
        vec!["url".to_string()]
    }

    async fn call(
        &self,
        context: &FunctionContext,
        args: &Map<String, Value>,
    ) -> anyhow::Result<Value> {
        let url = args.get("url").and_then(Value::as_str).unwrap_or_default();

        let fetcher = context
            .get::<PageFetcher>()
            .ok_or_else(|| anyhow::anyhow!("page fetcher not available in context"))?;

        let page = fetcher.fetch(url).await?;

        let excerpt: String = page.body.chars().take(EXCERPT_CHARS).collect();
        let excerpt_truncated = page.truncated || excerpt.len() < page.body.len();

        Ok(json!({
            "url": page.url,
            "status": page.status,
            "content": excerpt,
            "truncated": excerpt_truncated,
        }))
    }
}

pub struct ExtractPageText;

#[async_trait]
impl Function for ExtractPageText {
    fn name(&self) -> &str {
        "extract_page_text"
    }

    fn description(&self) -> &str {
        "Extract the visible text content from an HTML document"
    }

    fn parameters(&self) -> BTreeMap<String, ParameterSpec> {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "html".to_string(),
            ParameterSpec::string("The HTML document to extract text from"),
        );
        parameters
    }

    fn required(&self) -> Vec<String> {
        vec!["html".to_string()]
    }

    async fn call(
        &self,
        _context: &FunctionContext,
        args: &Map<String, Value>,
    ) -> anyhow::Result<Value> {
        let html = args.get("html").and_then(Value::as_str).unwrap_or_default();

        let text = extract_visible_text(html);

        Ok(json!({
            "text": text,
            "length": text.chars().count(),
        }))
    }
}

/// Collect visible text, skipping script/style/noscript content and
/// collapsing whitespace.
fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut pieces: Vec<&str> = Vec::new();

    for node in document.tree.nodes() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|element| element.name()))
            .map(|name| matches!(name, "script" | "style" | "noscript" | "head"))
            .unwrap_or(false);
        if hidden {
            continue;
        }

        pieces.extend(text.split_whitespace());
    }

    pieces.join(" ")
}
