//! Decoder for image build progress streams.
//!
//! A build answers `200 OK` as soon as it starts; whether it succeeded is only
//! known once the newline-delimited JSON progress stream has been read to the
//! end. [`consume_build_stream`] drains that stream, forwarding build output to
//! a sink as it arrives, and reports the last error the engine embedded in it.
//!
//! ## States
//!
//! ```text
//!            text line            error line
//!          +----------+        +-------------+
//!          v          |        v             |
//!      [Reading] -----+--> [ErrorSeen] ------+
//!          |       error line   |
//!          |                    |
//!          +---- end of input --+--> [Done]     pending error, if any
//!          |                    |
//!          +-- unparseable -----+--> [Aborted]  buffered bytes flushed,
//!                                               pending error, if any
//! ```
//!
//! Text keeps being forwarded after an error line, and a later error line
//! replaces an earlier one. Input that cannot be decoded as a further message
//! (bad syntax, or a message cut short by the end of input) ends decoding: the
//! bytes already buffered for that message are written to the sink verbatim
//! and the parse failure itself is not reported.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use schema::{ErrorDetail, ProgressMessage};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Reading,
    ErrorSeen,
    Done,
    Aborted,
}

/// Drains a build progress stream into `sink`.
///
/// Each message's `stream` text is written to `sink` as soon as it is
/// decoded. Sink write failures are ignored so the stream is always drained.
///
/// Returns [`Error::Build`] carrying the last error reported in the stream,
/// or the transport error if reading the stream fails.
pub async fn consume_build_stream<S, W>(mut stream: S, sink: &mut W) -> Result<()>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut decoder = BuildDecoder::new();

    while decoder.state != State::Aborted {
        match stream.next().await {
            Some(Ok(chunk)) => {
                decoder.buf.extend_from_slice(&chunk);
                decoder.decode_buffered(sink).await;
            }
            Some(Err(e)) => {
                decoder.flush_buffered(sink).await;
                finish_sink(sink).await;
                return Err(e);
            }
            None => {
                decoder.end_of_input(sink).await;
                break;
            }
        }
    }

    finish_sink(sink).await;
    decoder.into_result()
}

struct BuildDecoder {
    state: State,
    buf: Vec<u8>,
    pending: Option<ErrorDetail>,
}

/// Messages decoded from the front of a buffer.
struct Decoded {
    messages: Vec<ProgressMessage>,
    consumed: usize,
    malformed: bool,
}

impl BuildDecoder {
    fn new() -> Self {
        Self {
            state: State::Reading,
            buf: Vec::new(),
            pending: None,
        }
    }

    fn transition(&mut self, next: State) {
        if self.state != next {
            tracing::trace!(from = ?self.state, to = ?next, "Build decoder state change");
            self.state = next;
        }
    }

    /// Decodes and handles every complete message in the buffer, keeping an
    /// incomplete trailing message for the next chunk.
    ///
    /// An incomplete message is parsed again from its start on every chunk,
    /// so a single message split over `n` chunks costs `O(n^2)` bytes of
    /// parsing. Engine progress lines are a few hundred bytes.
    async fn decode_buffered<W>(&mut self, sink: &mut W)
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let Decoded {
            messages,
            consumed,
            malformed,
        } = decode_messages(&self.buf);
        self.buf.drain(..consumed);

        for message in messages {
            self.handle(message, sink).await;
        }

        if malformed {
            self.flush_buffered(sink).await;
            self.transition(State::Aborted);
        }
    }

    async fn handle<W>(&mut self, message: ProgressMessage, sink: &mut W)
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        if let Some(text) = message.stream {
            write_ignoring_errors(sink, text.as_bytes()).await;
        }
        if let Some(detail) = message.error_detail {
            tracing::debug!(code = ?detail.code, message = %detail.message.trim(), "Build reported an error");
            self.pending = Some(detail);
            self.transition(State::ErrorSeen);
        }
    }

    async fn end_of_input<W>(&mut self, sink: &mut W)
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        if self.buf.iter().all(u8::is_ascii_whitespace) {
            self.transition(State::Done);
        } else {
            tracing::debug!(bytes = self.buf.len(), "Build stream ended inside a message");
            self.flush_buffered(sink).await;
            self.transition(State::Aborted);
        }
    }

    async fn flush_buffered<W>(&mut self, sink: &mut W)
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        if !self.buf.is_empty() {
            write_ignoring_errors(sink, &self.buf).await;
            self.buf.clear();
        }
    }

    fn into_result(self) -> Result<()> {
        match self.pending {
            Some(detail) => Err(Error::Build {
                code: detail.code,
                message: detail.message.trim().to_owned(),
            }),
            None => Ok(()),
        }
    }
}

fn decode_messages(buf: &[u8]) -> Decoded {
    let mut messages = Vec::new();
    // `null` is valid JSON and carries nothing, so it is skipped rather than
    // treated as undecodable.
    let mut iter = serde_json::Deserializer::from_slice(buf).into_iter::<Option<ProgressMessage>>();

    loop {
        let offset = iter.byte_offset();
        let start = offset + buf[offset..].iter().take_while(|b| b.is_ascii_whitespace()).count();
        match iter.next() {
            Some(Ok(message)) => messages.extend(message),
            None => {
                return Decoded {
                    messages,
                    consumed: iter.byte_offset(),
                    malformed: false,
                }
            }
            // The message continues in a later chunk.
            Some(Err(e)) if e.is_eof() => {
                return Decoded {
                    messages,
                    consumed: start,
                    malformed: false,
                }
            }
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Undecodable build progress message");
                return Decoded {
                    messages,
                    consumed: start,
                    malformed: true,
                };
            }
        }
    }
}

async fn write_ignoring_errors<W>(sink: &mut W, bytes: &[u8])
where
    W: AsyncWrite + Unpin + ?Sized,
{
    if let Err(e) = sink.write_all(bytes).await {
        tracing::trace!(error = %e, "Build output sink write failed");
    }
}

async fn finish_sink<W>(sink: &mut W)
where
    W: AsyncWrite + Unpin + ?Sized,
{
    if let Err(e) = sink.flush().await {
        tracing::trace!(error = %e, "Build output sink flush failed");
    }
}
