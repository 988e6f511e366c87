//! Network operations.

use hyper::{Method, StatusCode};
use schema::{NetworkConnectOptions, NetworkCreateOptions, NetworkCreateResponse, NetworkDisconnectOptions};

use crate::client::{container_id, network_id, Call, Client, Payload};
use crate::error::Result;
use crate::query::Query;

impl Client {
    /// Creates a network. Expects `201 Created`.
    pub async fn network_create(&self, options: &NetworkCreateOptions) -> Result<NetworkCreateResponse> {
        let call = Call::new(
            "network create",
            Method::POST,
            &["networks", "create"],
            &Query::new(),
            StatusCode::CREATED,
        )?
        .with_payload(Payload::json(options)?);
        self.expect_json(call).await
    }

    /// Removes a network. Expects `204 No Content`.
    pub async fn network_remove(&self, id: &str) -> Result<()> {
        let id = network_id(id)?;
        let call = Call::new(
            "network remove",
            Method::DELETE,
            &["networks", id.as_str()],
            &Query::new(),
            StatusCode::NO_CONTENT,
        )?;
        self.expect_empty(call).await
    }

    /// Connects a container to a network.
    ///
    /// The container identifier in `options` is validated and trimmed like
    /// any other identifier before the request is sent.
    pub async fn network_connect(&self, id: &str, options: &NetworkConnectOptions) -> Result<()> {
        let id = network_id(id)?;
        let body = NetworkConnectOptions {
            container: container_id(&options.container)?.to_string(),
            ..options.clone()
        };
        let call = Call::new(
            "network connect",
            Method::POST,
            &["networks", id.as_str(), "connect"],
            &Query::new(),
            StatusCode::OK,
        )?
        .with_payload(Payload::json(&body)?);
        self.expect_empty(call).await
    }

    /// Disconnects a container from a network.
    pub async fn network_disconnect(&self, id: &str, options: &NetworkDisconnectOptions) -> Result<()> {
        let id = network_id(id)?;
        let body = NetworkDisconnectOptions {
            container: container_id(&options.container)?.to_string(),
            ..options.clone()
        };
        let call = Call::new(
            "network disconnect",
            Method::POST,
            &["networks", id.as_str(), "disconnect"],
            &Query::new(),
            StatusCode::OK,
        )?
        .with_payload(Payload::json(&body)?);
        self.expect_empty(call).await
    }
}
