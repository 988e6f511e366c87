//! Caller-owned response bodies of streaming operations.
//!
//! Image pulls, image builds and container logs hand their body back
//! undecoded as a [`ResponseStream`]. The stream owns the underlying
//! connection: dropping it closes the connection and abandons the request.
//!
//! ## Log stream framing
//!
//! Bodies returned by [`crate::Client::container_logs`] are passed through
//! raw. For containers created without a TTY the engine multiplexes stdout
//! and stderr into frames:
//!
//! ```text
//! +--------+--------+--------+--------+--------+--------+--------+--------+
//! | stream |   0    |   0    |   0    |        payload length (u32 BE)    |
//! +--------+--------+--------+--------+--------+--------+--------+--------+
//! | payload ...                                                           |
//! ```
//!
//! where `stream` is `1` for stdout and `2` for stderr. Containers created
//! with a TTY produce a single unframed stream. Demultiplexing is left to the
//! caller.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use hyper::body::{Body, Incoming};
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use crate::error::{Error, Result};

/// A response body yielding raw chunks as they arrive.
///
/// Yields [`Error::Cancelled`] once if the owning client's cancellation token
/// fires, and ends after any error.
pub struct ResponseStream {
    body: Incoming,
    cancelled: Option<Pin<Box<WaitForCancellationFutureOwned>>>,
    done: bool,
}

impl ResponseStream {
    pub(crate) fn new(body: Incoming, cancel: Option<CancellationToken>) -> Self {
        Self {
            body,
            cancelled: cancel.map(|token| Box::pin(token.cancelled_owned())),
            done: false,
        }
    }

    /// Adapts the stream into an [`AsyncRead`], e.g. for
    /// `tokio::io::copy` into a file or stdout.
    pub fn into_reader(self) -> impl AsyncRead + Send + Unpin {
        StreamReader::new(self.map_err(std::io::Error::other))
    }
}

impl Stream for ResponseStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.done {
            return Poll::Ready(None);
        }

        if let Some(cancelled) = this.cancelled.as_mut() {
            if cancelled.as_mut().poll(cx).is_ready() {
                tracing::debug!("Response stream cancelled");
                this.done = true;
                return Poll::Ready(Some(Err(Error::Cancelled)));
            }
        }

        loop {
            match ready!(Pin::new(&mut this.body).poll_frame(cx)) {
                Some(Ok(frame)) => match frame.into_data() {
                    Ok(data) if !data.is_empty() => return Poll::Ready(Some(Ok(data))),
                    // Empty data frames and trailers carry nothing for the caller.
                    _ => continue,
                },
                Some(Err(e)) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(Error::Http(e))));
                }
                None => {
                    tracing::trace!("Response stream finished");
                    this.done = true;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl fmt::Debug for ResponseStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseStream")
            .field("cancellable", &self.cancelled.is_some())
            .field("done", &self.done)
            .finish()
    }
}
