//! Shared SSE -> [`ChunkStream`] adapter.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::Response;

use crate::transport::{ChunkStream, Result, TransportError};
use crate::types::StreamChunk;

fn to_stream_error(err: TransportError) -> TransportError {
    match err {
        TransportError::Stream(msg) => TransportError::Stream(msg),
        other => TransportError::Stream(other.to_string()),
    }
}

/// Convert an SSE HTTP [`Response`] into a [`ChunkStream`].
///
/// `handler` receives each event's data payload and can either:
/// - return `Ok(Some(chunk))` to emit a chunk
/// - return `Ok(None)` to skip an event
/// - return `Err(_)` to emit a stream error (mapped to `TransportError::Stream`)
pub fn chunk_stream_from_sse<H>(response: Response, mut handler: H) -> ChunkStream
where
    H: FnMut(&str) -> Result<Option<StreamChunk>> + Send + 'static,
{
    let stream = response
        .bytes_stream()
        .eventsource()
        .map(move |event| {
            let event = event.map_err(|e| TransportError::Stream(e.to_string()))?;
            handler(event.data.as_str()).map_err(to_stream_error)
        })
        .filter_map(|result| async move {
            match result {
                Ok(Some(chunk)) => Some(Ok(chunk)),
                Ok(None) => None,
                Err(err) => Some(Err(err)),
            }
        });

    Box::pin(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn network_tests_disabled() -> bool {
        std::env::var_os("CODEX_SANDBOX_NETWORK_DISABLED").is_some()
    }

    #[tokio::test]
    async fn chunk_stream_filters_skipped_events() {
        if network_tests_disabled() {
            return;
        }

        let mock_server = MockServer::start().await;

        let sse_body = concat!(
            "data: hello\n",
            "\n",
            "data: skip\n",
            "\n",
            "data: world\n",
            "\n",
        );

        Mock::given(method("GET"))
            .and(path("/sse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_body),
            )
            .mount(&mock_server)
            .await;

        let response = reqwest::Client::new()
            .get(format!("{}/sse", mock_server.uri()))
            .send()
            .await
            .expect("response");

        let mut stream = chunk_stream_from_sse(response, |data| {
            if data == "skip" {
                return Ok(None);
            }
            Ok(Some(StreamChunk::Token(data.to_string())))
        });

        let mut out = Vec::new();
        while let Some(item) = stream.next().await {
            out.push(item.expect("chunk"));
        }

        assert_eq!(
            out,
            vec![
                StreamChunk::Token("hello".to_string()),
                StreamChunk::Token("world".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn handler_errors_map_to_stream_error() {
        if network_tests_disabled() {
            return;
        }

        let mock_server = MockServer::start().await;

        let sse_body = concat!("data: boom\n", "\n");

        Mock::given(method("GET"))
            .and(path("/sse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_body),
            )
            .mount(&mock_server)
            .await;

        let response = reqwest::Client::new()
            .get(format!("{}/sse", mock_server.uri()))
            .send()
            .await
            .expect("response");

        let mut stream = chunk_stream_from_sse(response, |data| {
            Err(TransportError::Api(format!("bad payload: {data}")))
        });

        let item = stream.next().await.expect("item");
        assert!(matches!(item, Err(TransportError::Stream(msg)) if msg.contains("boom")));
    }
}
