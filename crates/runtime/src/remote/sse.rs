//! Server-sent event stream reader for snapshot batches.
//!
//! The remote source pushes one JSON batch per event:
//!
//! ```text
//! data: [{"position": [...], "turn": "r", ...}, {...}]
//!
//! ```
//!
//! [`SseDecoder`] splits the byte stream into event payloads;
//! [`EventStreamSource`] drives it from an HTTP response and hands each
//! payload to the runtime.

use reqwest::header::ACCEPT;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::RuntimeHandle;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("snapshot stream request failed")]
    Http(#[from] reqwest::Error),

    #[error("runtime closed while streaming snapshots")]
    RuntimeClosed,
}

/// Largest event [`SseDecoder`] buffers before discarding it.
pub const MAX_EVENT_BYTES: usize = 1 << 20;

/// Incremental `text/event-stream` parser.
///
/// Only `data` fields are kept; multi-line data is joined with `\n`.
/// Comments and other fields are skipped. An event that grows past the
/// limit is discarded up to its terminating blank line.
#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Offset the next separator search starts from.
    scanned: usize,
    discarding: bool,
    limit: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::with_limit(MAX_EVENT_BYTES)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            discarding: false,
            limit: limit.max(2),
        }
    }

    /// Feeds a chunk and returns the payloads of every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend(chunk.iter().filter(|&&byte| byte != b'\r'));

        let mut payloads = Vec::new();
        while let Some(end) = find_event_end(&self.buffer, self.scanned) {
            let event: Vec<u8> = self.buffer.drain(..end + 2).collect();
            self.scanned = 0;
            if std::mem::take(&mut self.discarding) {
                continue;
            }
            if let Some(payload) = event_data(&event[..end]) {
                payloads.push(payload);
            }
        }
        // Back off one byte so a separator split across chunks is still found.
        self.scanned = self.buffer.len().saturating_sub(1);

        if self.buffer.len() > self.limit {
            warn!(pending = self.buffer.len(), limit = self.limit, "oversized event discarded");
            let trailing_newline = self.buffer.last() == Some(&b'\n');
            self.buffer.clear();
            if trailing_newline {
                self.buffer.push(b'\n');
            }
            self.scanned = 0;
            self.discarding = true;
        }
        payloads
    }

    /// Bytes held back waiting for the end of an event.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn find_event_end(buffer: &[u8], from: usize) -> Option<usize> {
    buffer
        .get(from..)?
        .windows(2)
        .position(|pair| pair == b"\n\n")
        .map(|offset| from + offset)
}

fn event_data(event: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(event);
    let lines: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| data.strip_prefix(' ').unwrap_or(data))
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Follows a remote snapshot stream.
#[derive(Clone, Debug)]
pub struct EventStreamSource {
    client: reqwest::Client,
    url: String,
}

impl EventStreamSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Reads the stream until it ends, applying each payload through
    /// `handle`. Malformed payloads are dropped and reading continues.
    pub async fn run(&self, handle: &RuntimeHandle) -> Result<(), StreamError> {
        let mut response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?
            .error_for_status()?;
        debug!(url = %self.url, "snapshot stream opened");

        let mut decoder = SseDecoder::new();
        while let Some(chunk) = response.chunk().await? {
            for payload in decoder.push(&chunk) {
                match handle.apply_snapshot(&payload).await {
                    Ok(_) => {}
                    Err(error) if error.is_closed() => return Err(StreamError::RuntimeClosed),
                    Err(error) => debug!(%error, "payload not applied"),
                }
            }
        }

        debug!(url = %self.url, pending = decoder.pending(), "snapshot stream ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_events_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"turn\":").is_empty());
        assert!(decoder.pending() > 0);

        let payloads = decoder.push(b" \"r\"}\n\ndata: [1]\n\n");
        assert_eq!(payloads, vec![r#"{"turn": "r"}"#.to_string(), "[1]".to_string()]);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn handles_crlf_comments_and_multiline_data() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b": keep-alive\r\n\r\nevent: state\r\ndata:[\r\ndata: 1]\r\n\r\n");
        assert_eq!(payloads, vec!["[\n1]".to_string()]);
    }

    #[test]
    fn separator_split_across_chunks_is_found() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: a\n").is_empty());
        assert_eq!(decoder.push(b"\n"), vec!["a".to_string()]);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn oversized_event_is_discarded_and_stream_recovers() {
        let mut decoder = SseDecoder::with_limit(16);
        assert!(decoder.push(b"data: 0123456789abcdef0123456789").is_empty());
        assert!(decoder.pending() <= 16);
        assert!(decoder.push(b"more of the same").is_empty());
        assert!(decoder.pending() <= 16);

        let payloads = decoder.push(b" tail\n\ndata: ok\n\n");
        assert_eq!(payloads, vec!["ok".to_string()]);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn events_without_data_are_skipped() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"id: 7\n\n").is_empty());
        assert_eq!(decoder.pending(), 0);
    }
}
