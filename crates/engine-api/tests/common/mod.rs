//! In-process fake engine for integration tests.
//!
//! Serves HTTP/1.1 on a Unix socket inside a temporary directory, records
//! every request it receives, and answers with whatever the test's handler
//! returns.

#![allow(dead_code)]

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use engine_api::{Client, ClientConfig, EngineHost};
use futures::stream::{self, StreamExt};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Frame, Incoming};
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tempfile::TempDir;
use tokio::net::UnixListener;
use tokio::task::JoinHandle;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A request as the fake engine received it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub host: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

/// What the fake engine answers with.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    chunks: Vec<Bytes>,
    hang: bool,
}

impl Reply {
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            chunks: Vec::new(),
            hang: false,
        }
    }

    pub fn json(status: StatusCode, value: serde_json::Value) -> Self {
        Self::status(status).body(value.to_string())
    }

    /// Appends a body chunk. Multiple chunks are sent with chunked encoding.
    pub fn body(mut self, chunk: impl Into<Bytes>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    /// Keeps the body open after the last chunk.
    pub fn hang(mut self) -> Self {
        self.hang = true;
        self
    }

    fn into_response(self) -> Response<UnsyncBoxBody<Bytes, Infallible>> {
        let body = if self.hang || self.chunks.len() > 1 {
            let frames: Vec<Result<Frame<Bytes>, Infallible>> =
                self.chunks.into_iter().map(|c| Ok(Frame::data(c))).collect();
            let tail = if self.hang {
                stream::pending().boxed()
            } else {
                stream::empty().boxed()
            };
            StreamBody::new(stream::iter(frames).chain(tail)).boxed_unsync()
        } else {
            Full::new(Bytes::from(self.chunks.concat())).boxed_unsync()
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        response
    }
}

type Handler = Arc<dyn Fn(&Recorded) -> Reply + Send + Sync>;

/// A fake engine listening on a temporary Unix socket.
pub struct FakeEngine {
    socket: PathBuf,
    requests: Arc<Mutex<Vec<Recorded>>>,
    server: JoinHandle<()>,
    _dir: TempDir,
}

impl FakeEngine {
    /// Answers every request with `reply`.
    pub async fn replying(reply: Reply) -> Self {
        Self::start(move |_| reply.clone()).await
    }

    pub async fn start(handler: impl Fn(&Recorded) -> Reply + Send + Sync + 'static) -> Self {
        init_tracing();

        let dir = tempfile::tempdir().expect("create temp dir");
        let socket = dir.path().join("engine.sock");
        let listener = UnixListener::bind(&socket).expect("bind fake engine socket");

        let handler: Handler = Arc::new(handler);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let server = {
            let requests = Arc::clone(&requests);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let handler = Arc::clone(&handler);
                    let requests = Arc::clone(&requests);
                    tokio::spawn(async move {
                        let service = service_fn(move |request: Request<Incoming>| {
                            let handler = Arc::clone(&handler);
                            let requests = Arc::clone(&requests);
                            async move {
                                let recorded = record(request).await?;
                                let reply = handler(&recorded);
                                requests.lock().expect("requests lock").push(recorded);
                                Ok::<_, hyper::Error>(reply.into_response())
                            }
                        });
                        if let Err(e) = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service)
                            .await
                        {
                            tracing::debug!(error = %e, "Fake engine connection ended");
                        }
                    });
                }
            })
        };

        Self {
            socket,
            requests,
            server,
            _dir: dir,
        }
    }

    pub fn host(&self) -> EngineHost {
        EngineHost::Unix(self.socket.clone())
    }

    pub fn client(&self) -> Client {
        Client::new(ClientConfig::new(self.host()))
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// The single request received so far.
    pub fn only_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request: {requests:#?}");
        requests.into_iter().next().expect("one request")
    }
}

impl Drop for FakeEngine {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record(request: Request<Incoming>) -> Result<Recorded, hyper::Error> {
    let (parts, body) = request.into_parts();
    let header = |name: hyper::header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    Ok(Recorded {
        method: parts.method.clone(),
        path: parts.uri.path().to_owned(),
        query: parts.uri.query().map(str::to_owned),
        host: header(HOST),
        content_type: header(CONTENT_TYPE),
        body: body.collect().await?.to_bytes(),
    })
}
