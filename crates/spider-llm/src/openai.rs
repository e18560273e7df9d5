//! OpenAI-compatible transport over HTTP + SSE.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use spider_core::{FunctionSchema, Turn};

use crate::protocol::{
    build_chat_body, completion_from_response, parse_sse_data, ChatCompletionResponse,
};
use crate::sse::chunk_stream_from_sse;
use crate::transport::{ChatTransport, ChunkStream, Result, TransportError};
use crate::types::{Completion, StreamChunk};

/// Configuration for [`OpenAiTransport`]. All values are explicit; there are
/// no process-wide defaults to mutate.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Maximum transient retries (429/5xx/connect); request errors known to
    /// be non-transient are never retried.
    pub max_retries: u32,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub request_timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            max_retries: 2,
            temperature: Some(0.7),
            max_tokens: Some(1000),
            request_timeout: Duration::from_secs(120),
        }
    }
}

pub struct OpenAiTransport {
    client: ClientWithMiddleware,
    config: OpenAiConfig,
}

impl OpenAiTransport {
    pub fn new(config: OpenAiConfig) -> Self {
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(100), Duration::from_secs(5))
            .build_with_max_retries(config.max_retries);

        let base_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        let client = ClientBuilder::new(base_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Self { client, config }
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self::new(OpenAiConfig {
            api_key: Some(api_key.into()),
            ..OpenAiConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn send_request(
        &self,
        turns: &[Turn],
        schemas: &[FunctionSchema],
        model: &str,
        stream: bool,
    ) -> Result<reqwest::Response> {
        let body = build_chat_body(
            model,
            turns,
            schemas,
            stream,
            self.config.temperature,
            self.config.max_tokens,
        );

        log::debug!(
            "calling chat completions: model={model}, stream={stream}, messages={}, functions={}",
            turns.len(),
            schemas.len()
        );

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .json(&body);

        if let Some(api_key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, message });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatTransport for OpenAiTransport {
    async fn complete(
        &self,
        turns: &[Turn],
        schemas: &[FunctionSchema],
        model: &str,
    ) -> Result<Completion> {
        let response = self.send_request(turns, schemas, model, false).await?;
        let parsed: ChatCompletionResponse = response.json().await?;
        Ok(completion_from_response(parsed))
    }

    async fn complete_stream(
        &self,
        turns: &[Turn],
        schemas: &[FunctionSchema],
        model: &str,
    ) -> Result<ChunkStream> {
        let response = self.send_request(turns, schemas, model, true).await?;

        Ok(chunk_stream_from_sse(response, |data| {
            if data.trim().is_empty() {
                return Ok(None);
            }

            parse_sse_data(data).map(Some)
        }))
    }
}
