//! Client for the container engine's HTTP API over its local socket.
//!
//! The engine listens on a Unix domain socket (POSIX) or a named pipe
//! (Windows). [`Client`] speaks HTTP/1.1 to it and exposes one async method
//! per supported operation: ping, image pull/build/remove, network
//! create/remove/connect/disconnect, and container
//! create/start/stop/wait/inspect/remove/logs.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport, request encoding, status classification
//! and stream decoding live here. The request and response bodies themselves
//! are plain data in the [`schema`] crate, re-exported for convenience.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `ClientConfig`, `EngineHost` endpoint addresses |
//! | [`client`] | `Client`, request dispatch and status checks |
//! | [`containers`], [`networks`], [`images`] | Operations by object kind |
//! | [`options`] | Per-operation options and their query encoders |
//! | [`query`] | `QueryParameters`, query and URL encoding |
//! | [`stream`] | `ResponseStream`, log stream framing |
//! | [`progress`] | Build progress stream decoder |
//! | [`wait`] | Container wait response decoder |
//! | [`error`] | `Error`, `Result` |
//!
//! ## Example
//!
//! ```no_run
//! use engine_api::{Client, ClientConfig, ImageBuildOptions};
//!
//! # async fn build(context: Vec<u8>) -> engine_api::Result<()> {
//! let client = Client::new(ClientConfig::default());
//! client.ping().await?;
//!
//! let options = ImageBuildOptions {
//!     tags: vec!["app:latest".into()],
//!     ..Default::default()
//! };
//! let stream = client.image_build(context, &options).await?;
//! engine_api::consume_build_stream(stream, &mut tokio::io::stdout()).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod containers;
pub mod error;
pub mod images;
pub mod networks;
pub mod options;
pub mod progress;
pub mod query;
pub mod stream;
mod transport;
pub mod wait;

pub use schema;

pub use client::Client;
pub use config::{ClientConfig, EngineHost};
pub use error::{Error, Result};
pub use options::{
    CreateContainerOptions, ImageBuildOptions, LogsOptions, PullOptions, RemoveContainerOptions,
    RemoveImageOptions, StopOptions, WaitCondition,
};
pub use progress::consume_build_stream;
pub use query::{Query, QueryParameters};
pub use stream::ResponseStream;
pub use wait::decode_wait_response;
