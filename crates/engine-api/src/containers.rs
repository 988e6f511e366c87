//! Container operations.

use hyper::{Method, StatusCode};
use schema::{ContainerCreateResponse, ContainerInspectResponse, ContainerWaitResponse, CreateContainerRequest};

use crate::client::{container_id, Call, Client, Payload};
use crate::error::Result;
use crate::options::{CreateContainerOptions, LogsOptions, RemoveContainerOptions, StopOptions, WaitCondition};
use crate::query::{Query, QueryParameters};
use crate::stream::ResponseStream;
use crate::wait;

impl Client {
    /// Creates a container. Expects `201 Created`.
    pub async fn container_create(
        &self,
        options: &CreateContainerOptions,
        request: &CreateContainerRequest,
    ) -> Result<ContainerCreateResponse> {
        let call = Call::new(
            "container create",
            Method::POST,
            &["containers", "create"],
            &options.to_query(),
            StatusCode::CREATED,
        )?
        .with_payload(Payload::json(request)?);
        self.expect_json(call).await
    }

    /// Starts a created container. Expects `204 No Content`; an
    /// already-running container (`304`) is reported as a failure.
    pub async fn container_start(&self, id: &str) -> Result<()> {
        let id = container_id(id)?;
        let call = Call::new(
            "container start",
            Method::POST,
            &["containers", id.as_str(), "start"],
            &Query::new(),
            StatusCode::NO_CONTENT,
        )?;
        self.expect_empty(call).await
    }

    /// Stops a running container. Expects `204 No Content`; an
    /// already-stopped container (`304`) is reported as a failure.
    pub async fn container_stop(&self, id: &str, options: &StopOptions) -> Result<()> {
        let id = container_id(id)?;
        let call = Call::new(
            "container stop",
            Method::POST,
            &["containers", id.as_str(), "stop"],
            &options.to_query(),
            StatusCode::NO_CONTENT,
        )?;
        self.expect_empty(call).await
    }

    /// Blocks until the container reaches `condition` and returns its exit
    /// status.
    ///
    /// The call can outlive any sensible request timeout; bound it with
    /// `tokio::time::timeout` or a cancellation-scoped client. A body that is
    /// not JSON at all is reported as [`crate::Error::MalformedResponse`].
    pub async fn container_wait(
        &self,
        id: &str,
        condition: Option<WaitCondition>,
    ) -> Result<ContainerWaitResponse> {
        let id = container_id(id)?;
        let call = Call::new(
            "container wait",
            Method::POST,
            &["containers", id.as_str(), "wait"],
            &condition.to_query(),
            StatusCode::OK,
        )?;
        let body = self.expect_stream(call).await?;
        wait::decode_wait_response(body).await
    }

    /// Returns low-level information about a container.
    pub async fn container_inspect(&self, id: &str) -> Result<ContainerInspectResponse> {
        let id = container_id(id)?;
        let call = Call::new(
            "container inspect",
            Method::GET,
            &["containers", id.as_str(), "json"],
            &Query::new(),
            StatusCode::OK,
        )?;
        self.expect_json(call).await
    }

    /// Removes a container. Expects `204 No Content`.
    pub async fn container_remove(&self, id: &str, options: &RemoveContainerOptions) -> Result<()> {
        let id = container_id(id)?;
        let call = Call::new(
            "container remove",
            Method::DELETE,
            &["containers", id.as_str()],
            &options.to_query(),
            StatusCode::NO_CONTENT,
        )?;
        self.expect_empty(call).await
    }

    /// Opens the container's log stream.
    ///
    /// The body is returned raw; see [`crate::stream`] for its framing.
    pub async fn container_logs(&self, id: &str, options: &LogsOptions) -> Result<ResponseStream> {
        let id = container_id(id)?;
        let call = Call::new(
            "container logs",
            Method::GET,
            &["containers", id.as_str(), "logs"],
            &options.to_query(),
            StatusCode::OK,
        )?;
        self.expect_stream(call).await
    }
}
