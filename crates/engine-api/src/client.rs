//! The engine client and its request dispatcher.
//!
//! Each operation is one HTTP round-trip: build the request, send it on a
//! fresh connection, and check the response status against the single
//! success status documented for that operation. Operations are grouped by
//! object kind in [`crate::containers`], [`crate::networks`] and
//! [`crate::images`].

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::{Method, Request, Response, StatusCode};
use schema::{ContainerId, ImageRef, NetworkId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::query::{self, Query};
use crate::stream::ResponseStream;
use crate::transport::Transport;

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_TAR: &str = "application/x-tar";

/// Client for the container engine API.
///
/// Cheap to clone; clones share the same immutable configuration. Safe for
/// concurrent use: every request runs on its own connection.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<Transport>,
    cancel: Option<CancellationToken>,
}

impl Client {
    /// Creates a client for the configured endpoint. No connection is made
    /// until the first request.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            transport: Arc::new(Transport::new(config)),
            cancel: None,
        }
    }

    /// The configuration this client was created with.
    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    /// Returns a client whose requests and response streams fail with
    /// [`Error::Cancelled`] once `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cancel: Some(token),
        }
    }

    /// Checks that the engine is reachable and answering.
    pub async fn ping(&self) -> Result<()> {
        let call = Call::new("ping", Method::GET, &["_ping"], &Query::new(), StatusCode::OK)?;
        self.expect_empty(call).await
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Sends `call` and returns the response if its status is the expected
    /// one. The body of a failed call is dropped unread.
    async fn dispatch(&self, call: Call) -> Result<Response<Incoming>> {
        let Call {
            operation,
            method,
            url,
            payload,
            expect,
        } = call;

        debug!(
            operation,
            method = method.as_str(),
            path = url.path(),
            query = url.query(),
            "Sending engine request"
        );

        let mut builder = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(HOST, "localhost");
        let body = match payload {
            Some(payload) => {
                builder = builder.header(CONTENT_TYPE, payload.content_type);
                Full::new(payload.bytes)
            }
            None => Full::new(Bytes::new()),
        };
        let request = builder.body(body)?;

        let response = self.cancellable(self.transport.send(request)).await?;
        let status = response.status();
        trace!(operation, status = %status, "Engine responded");

        if status != expect {
            debug!(operation, status = %status, expected = %expect, "Unexpected engine status");
            return Err(Error::UnexpectedStatus { operation, status });
        }
        Ok(response)
    }

    /// Dispatches `call` and discards the response body.
    pub(crate) async fn expect_empty(&self, call: Call) -> Result<()> {
        self.dispatch(call).await?;
        Ok(())
    }

    /// Dispatches `call` and decodes the full response body as JSON.
    pub(crate) async fn expect_json<T: DeserializeOwned>(&self, call: Call) -> Result<T> {
        let response = self.dispatch(call).await?;
        let body = self
            .cancellable(async { Ok::<_, Error>(response.into_body().collect().await?.to_bytes()) })
            .await?;
        serde_json::from_slice(&body).map_err(Error::Decode)
    }

    /// Dispatches `call` and hands the undecoded body to the caller.
    pub(crate) async fn expect_stream(&self, call: Call) -> Result<ResponseStream> {
        let response = self.dispatch(call).await?;
        Ok(ResponseStream::new(response.into_body(), self.cancel.clone()))
    }

    async fn cancellable<T>(&self, work: impl Future<Output = Result<T>>) -> Result<T> {
        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(Error::Cancelled),
                result = work => result,
            },
            None => work.await,
        }
    }
}

// ---------------------------------------------------------------------------
// Identifier validation
// ---------------------------------------------------------------------------

pub(crate) fn container_id(value: &str) -> Result<ContainerId> {
    ContainerId::new(value).ok_or(Error::EmptyIdentifier {
        kind: ContainerId::KIND,
    })
}

pub(crate) fn network_id(value: &str) -> Result<NetworkId> {
    NetworkId::new(value).ok_or(Error::EmptyIdentifier {
        kind: NetworkId::KIND,
    })
}

pub(crate) fn image_ref(value: &str) -> Result<ImageRef> {
    ImageRef::new(value).ok_or(Error::EmptyIdentifier { kind: ImageRef::KIND })
}

// ---------------------------------------------------------------------------
// Call description
// ---------------------------------------------------------------------------

/// A request body and its content type.
#[derive(Debug)]
pub(crate) struct Payload {
    content_type: &'static str,
    bytes: Bytes,
}

impl Payload {
    pub(crate) fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(value).map_err(Error::Encode)?;
        Ok(Self {
            content_type: CONTENT_TYPE_JSON,
            bytes: Bytes::from(bytes),
        })
    }

    pub(crate) fn tar(bytes: Bytes) -> Self {
        Self {
            content_type: CONTENT_TYPE_TAR,
            bytes,
        }
    }
}

/// One operation's request and the status that means success.
#[derive(Debug)]
pub(crate) struct Call {
    operation: &'static str,
    method: Method,
    url: Url,
    payload: Option<Payload>,
    expect: StatusCode,
}

impl Call {
    pub(crate) fn new(
        operation: &'static str,
        method: Method,
        segments: &[&str],
        query: &Query,
        expect: StatusCode,
    ) -> Result<Self> {
        Ok(Self {
            operation,
            method,
            url: query::request_url(segments, query)?,
            payload: None,
            expect,
        })
    }

    pub(crate) fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_identifiers_are_rejected() {
        let err = container_id("   ").unwrap_err();
        assert!(matches!(err, Error::EmptyIdentifier { kind: "container" }));
        let err = network_id("").unwrap_err();
        assert!(matches!(err, Error::EmptyIdentifier { kind: "network" }));
        let err = image_ref("\t\n").unwrap_err();
        assert!(matches!(err, Error::EmptyIdentifier { kind: "image" }));
    }

    #[test]
    fn test_identifiers_are_trimmed() {
        assert_eq!(container_id("  web-1 ").unwrap().as_str(), "web-1");
    }

    #[test]
    fn test_json_payload_content_type() {
        let payload = Payload::json(&serde_json::json!({"Name": "net"})).unwrap();
        assert_eq!(payload.content_type, "application/json");
        assert_eq!(&payload.bytes[..], br#"{"Name":"net"}"#);
    }

    #[test]
    fn test_call_without_payload_has_no_body() {
        let call = Call::new("ping", Method::GET, &["_ping"], &Query::new(), StatusCode::OK).unwrap();
        assert!(call.payload.is_none());
        assert_eq!(call.url.as_str(), "http://localhost/_ping");
    }

    #[tokio::test]
    async fn test_cancelled_client_fails_before_dialing() {
        let token = CancellationToken::new();
        token.cancel();
        let client = Client::new(ClientConfig::default()).with_cancellation(token);
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, Error::Cancelled), "{err}");
    }
}
