//! The streamed-response consumer pipeline.
//!
//! Raw bytes from the transport are decoded incrementally
//! ([`Utf8Decoder`](decoder::Utf8Decoder)), reframed into newline-delimited
//! `data:` lines ([`LineFramer`](framer::LineFramer)), parsed as JSON
//! envelopes ([`Envelope`](envelope::Envelope)) and exposed as a pull-driven
//! sequence of text fragments.

pub mod decoder;
pub mod envelope;
pub mod framer;

use crate::core::StreamingError;
use async_stream::try_stream;
use decoder::Utf8Decoder;
use envelope::Envelope;
use framer::LineFramer;
use futures::{Stream, StreamExt};
use log::debug;
use std::pin::Pin;

/// Boxed sequence of content fragments produced by one stream invocation.
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<String, StreamingError>> + Send>>;

/// Policy for transport read failures after streaming has begun.
///
/// The default favors delivering a partial-but-real answer over surfacing a
/// spurious failure once useful content has already reached the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadErrorPolicy {
    /// Treat a failed read as a clean end-of-stream.
    #[default]
    EndOfStream,
    /// Surface the failure as [`StreamingError::Transport`].
    Surface,
}

/// What the pipeline should do with one framed line.
enum Step {
    Emit(String),
    Skip,
    Done,
}

fn interpret(line: &str) -> Result<Step, StreamingError> {
    let Some(payload) = framer::data_payload(line) else {
        return Ok(Step::Skip);
    };
    let envelope = match serde_json::from_str(payload) {
        Ok(envelope) => envelope,
        Err(err) => {
            // Tolerates envelopes the framer could not repair, at the cost of
            // silently losing that event.
            debug!("skipping unparseable event payload: {err}");
            return Ok(Step::Skip);
        }
    };
    match envelope {
        Envelope::Content { content } if !content.is_empty() => Ok(Step::Emit(content)),
        Envelope::Done => Ok(Step::Done),
        Envelope::Error { content } => Err(StreamingError::server(content)),
        _ => Ok(Step::Skip),
    }
}

fn read_failure(policy: ReadErrorPolicy, err: &str) -> Result<String, StreamingError> {
    match policy {
        ReadErrorPolicy::Surface => Err(StreamingError::Transport(err.to_string())),
        ReadErrorPolicy::EndOfStream => {
            debug!("read failed after partial delivery, ending stream: {err}");
            Ok(String::new())
        }
    }
}

/// Consumes a fallible byte stream and yields content fragments.
///
/// The sequence is single-consumer, forward-only and non-restartable. Exactly
/// one terminal outcome is produced: normal end (a `done` envelope, transport
/// closure, or a tolerated read failure) or one `Err` (an `error` envelope, or
/// a read failure under [`ReadErrorPolicy::Surface`]). Nothing follows it.
pub fn content_stream<S, B, E>(
    bytes: S,
    policy: ReadErrorPolicy,
) -> impl Stream<Item = Result<String, StreamingError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    try_stream! {
        futures::pin_mut!(bytes);
        let mut decoder = Utf8Decoder::new();
        let mut framer = LineFramer::new();
        let mut eof = false;

        while !eof {
            let mut text = match bytes.next().await {
                Some(Ok(chunk)) => decoder.decode(chunk.as_ref()),
                Some(Err(err)) => {
                    eof = true;
                    read_failure(policy, &err.to_string())?
                }
                None => {
                    eof = true;
                    String::new()
                }
            };
            if eof {
                text.push_str(&decoder.finish());
            }
            framer.push(&text);

            loop {
                // At end-of-stream a final unterminated line is still framed.
                let line = match framer.next_line() {
                    Some(line) => line,
                    None if eof => match framer.finish() {
                        Some(line) => line,
                        None => break,
                    },
                    None => break,
                };
                match interpret(&line)? {
                    Step::Emit(content) => yield content,
                    Step::Done => return,
                    Step::Skip => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::io;

    fn ok_chunks(chunks: &[&str]) -> Vec<Result<Vec<u8>, Infallible>> {
        chunks.iter().map(|c| Ok(c.as_bytes().to_vec())).collect()
    }

    async fn collect(
        chunks: Vec<Result<Vec<u8>, io::Error>>,
        policy: ReadErrorPolicy,
    ) -> (Vec<String>, Option<StreamingError>) {
        let stream = content_stream(tokio_stream::iter(chunks), policy);
        futures::pin_mut!(stream);
        let mut fragments = Vec::new();
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => fragments.push(fragment),
                Err(err) => return (fragments, Some(err)),
            }
        }
        (fragments, None)
    }

    async fn collect_ok(chunks: &[&str]) -> Vec<String> {
        let stream = content_stream(
            tokio_stream::iter(ok_chunks(chunks)),
            ReadErrorPolicy::default(),
        );
        futures::pin_mut!(stream);
        let mut fragments = Vec::new();
        while let Some(item) = stream.next().await {
            fragments.push(item.expect("stream should not fail"));
        }
        fragments
    }

    #[tokio::test]
    async fn test_content_then_done_yields_fragments_in_order() {
        let fragments = collect_ok(&[
            "data: {\"type\":\"content\",\"content\":\"Hel\"}\n",
            "data: {\"type\":\"content\",\"content\":\"lo\"}\n",
            "data: {\"type\":\"done\"}\n",
        ])
        .await;
        assert_eq!(fragments, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_nothing_follows_done() {
        let fragments = collect_ok(&[
            "data: {\"type\":\"content\",\"content\":\"a\"}\n",
            "data: {\"type\":\"done\"}\n",
            "data: {\"type\":\"content\",\"content\":\"late\"}\n",
        ])
        .await;
        assert_eq!(fragments, vec!["a"]);
    }

    #[tokio::test]
    async fn test_payload_split_across_chunks_is_reassembled() {
        let fragments = collect_ok(&[
            "data: {\"type\":\"content\",\"content\":\"He",
            "llo\"}\n",
            "data: {\"type\":\"done\"}\n",
        ])
        .await;
        assert_eq!(fragments, vec!["Hello"]);
    }

    #[tokio::test]
    async fn test_multibyte_character_split_across_chunks() {
        // "é" (0xC3 0xA9) split between two deliveries
        let chunks: Vec<Result<Vec<u8>, io::Error>> = vec![
            Ok(b"data: {\"type\":\"content\",\"content\":\"caf\xC3".to_vec()),
            Ok(b"\xA9\"}\ndata: {\"type\":\"done\"}\n".to_vec()),
        ];
        let (fragments, err) = collect(chunks, ReadErrorPolicy::default()).await;
        assert!(err.is_none());
        assert_eq!(fragments, vec!["caf\u{e9}"]);
    }

    #[tokio::test]
    async fn test_error_envelope_fails_stream_after_prior_content() {
        let (fragments, err) = collect(
            vec![
                Ok(b"data: {\"type\":\"content\",\"content\":\"partial\"}\n".to_vec()),
                Ok(b"data: {\"type\":\"error\",\"content\":\"model overloaded\"}\n".to_vec()),
            ],
            ReadErrorPolicy::default(),
        )
        .await;
        assert_eq!(fragments, vec!["partial"]);
        match err {
            Some(StreamingError::Stream { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "model overloaded");
            }
            other => panic!("expected stream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_envelope_without_message_uses_default() {
        let (fragments, err) = collect(
            vec![Ok(b"data: {\"type\":\"error\"}\n".to_vec())],
            ReadErrorPolicy::default(),
        )
        .await;
        assert!(fragments.is_empty());
        assert_eq!(err.expect("should fail").to_string(), "Stream error");
    }

    #[tokio::test]
    async fn test_transport_close_without_terminal_is_success() {
        let fragments = collect_ok(&[
            "data: {\"type\":\"content\",\"content\":\"a\"}\n",
            "data: {\"type\":\"content\",\"content\":\"b\"}\n",
        ])
        .await;
        assert_eq!(fragments, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_non_data_lines_never_produce_fragments() {
        let fragments = collect_ok(&[
            "\n",
            ": keepalive\n",
            "event: message\n",
            "{\"type\":\"content\",\"content\":\"unprefixed\"}\n",
            "data: {\"type\":\"content\",\"content\":\"real\"}\n",
            "data: {\"type\":\"done\"}\n",
        ])
        .await;
        assert_eq!(fragments, vec!["real"]);
    }

    #[tokio::test]
    async fn test_malformed_json_is_skipped_not_fatal() {
        let fragments = collect_ok(&[
            "data: {broken\n",
            "data: {\"type\":\"content\",\"content\":\"ok\"}\n",
            "data: {\"type\":\"done\"}\n",
        ])
        .await;
        assert_eq!(fragments, vec!["ok"]);
    }

    #[tokio::test]
    async fn test_unknown_envelope_type_and_empty_content_ignored() {
        let fragments = collect_ok(&[
            "data: {\"type\":\"ping\"}\n",
            "data: {\"type\":\"content\",\"content\":\"\"}\n",
            "data: {\"type\":\"content\",\"content\":\"x\"}\n",
            "data: {\"type\":\"done\"}\n",
        ])
        .await;
        assert_eq!(fragments, vec!["x"]);
    }

    #[tokio::test]
    async fn test_final_envelope_without_newline_is_processed() {
        let fragments = collect_ok(&["data: {\"type\":\"content\",\"content\":\"tail\"}"]).await;
        assert_eq!(fragments, vec!["tail"]);
    }

    #[tokio::test]
    async fn test_read_error_is_end_of_stream_by_default() {
        let (fragments, err) = collect(
            vec![
                Ok(b"data: {\"type\":\"content\",\"content\":\"kept\"}\n".to_vec()),
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
            ],
            ReadErrorPolicy::EndOfStream,
        )
        .await;
        assert!(err.is_none());
        assert_eq!(fragments, vec!["kept"]);
    }

    #[tokio::test]
    async fn test_read_error_surfaced_under_strict_policy() {
        let (fragments, err) = collect(
            vec![
                Ok(b"data: {\"type\":\"content\",\"content\":\"kept\"}\n".to_vec()),
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
            ],
            ReadErrorPolicy::Surface,
        )
        .await;
        assert_eq!(fragments, vec!["kept"]);
        assert!(matches!(err, Some(StreamingError::Transport(_))));
    }
}
