//! HTTP/1.1 over the engine's local socket.
//!
//! Every request dials a fresh connection, performs the HTTP/1 handshake and
//! spawns a task that drives the connection until the response body is
//! released. Requests therefore never share a connection.

use std::future::Future;
use std::io;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::client::conn::http1::{self, SendRequest};
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;

use crate::config::{ClientConfig, EngineHost};
use crate::error::{Error, Result};

type Sender = SendRequest<Full<Bytes>>;

/// Dials the configured endpoint, one connection per request.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    config: ClientConfig,
}

impl Transport {
    pub(crate) fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `request` on a new connection and returns the response head.
    /// The body streams from the connection task.
    pub(crate) async fn send(&self, request: Request<Full<Bytes>>) -> Result<Response<Incoming>> {
        let mut sender = self.connect().await?;
        Ok(sender.send_request(request).await?)
    }

    #[cfg(unix)]
    async fn connect(&self) -> Result<Sender> {
        match &self.config.host {
            EngineHost::Unix(path) => {
                let stream = self.dial(tokio::net::UnixStream::connect(path)).await?;
                handshake(TokioIo::new(stream)).await
            }
            EngineHost::NamedPipe(_) => Err(Error::UnsupportedTransport {
                host: self.config.host.to_string(),
            }),
        }
    }

    #[cfg(windows)]
    async fn connect(&self) -> Result<Sender> {
        match &self.config.host {
            EngineHost::NamedPipe(name) => {
                let pipe = self.dial(pipe::open(name)).await?;
                handshake(TokioIo::new(pipe)).await
            }
            EngineHost::Unix(_) => Err(Error::UnsupportedTransport {
                host: self.config.host.to_string(),
            }),
        }
    }

    /// Bounds a connection attempt by the configured timeout.
    async fn dial<T>(&self, attempt: impl Future<Output = io::Result<T>>) -> Result<T> {
        let endpoint = self.config.host.to_string();
        let timeout = self.config.connect_timeout;
        match tokio::time::timeout(timeout, attempt).await {
            Ok(Ok(io)) => Ok(io),
            Ok(Err(source)) => Err(Error::Connect { endpoint, source }),
            Err(_) => Err(Error::ConnectTimeout { endpoint, timeout }),
        }
    }
}

async fn handshake<T>(io: T) -> Result<Sender>
where
    T: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
{
    let (sender, conn) = http1::handshake(io).await?;

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!(error = %e, "Engine connection closed with error");
        } else {
            tracing::trace!("Engine connection closed");
        }
    });

    Ok(sender)
}

#[cfg(windows)]
mod pipe {
    use std::io;
    use std::time::Duration;

    use tokio::net::windows::named_pipe::{ClientOptions, NamedPipeClient};

    /// `ERROR_PIPE_BUSY`: every pipe instance is in use.
    const ERROR_PIPE_BUSY: i32 = 231;

    const BUSY_RETRY_DELAY: Duration = Duration::from_millis(50);

    /// Opens the pipe, waiting while all instances are busy. The caller bounds
    /// the wait.
    pub(super) async fn open(name: &str) -> io::Result<NamedPipeClient> {
        loop {
            match ClientOptions::new().open(name) {
                Ok(client) => return Ok(client),
                Err(e) if e.raw_os_error() == Some(ERROR_PIPE_BUSY) => {}
                Err(e) => return Err(e),
            }
            tokio::time::sleep(BUSY_RETRY_DELAY).await;
        }
    }
}
