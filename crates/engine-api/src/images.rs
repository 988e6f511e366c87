//! Image operations.
//!
//! Pulls and builds report progress as newline-delimited JSON. Both return
//! the raw [`ResponseStream`]; pass a build stream to
//! [`crate::progress::consume_build_stream`] to forward its output and learn
//! whether the build failed.

use bytes::Bytes;
use hyper::{Method, StatusCode};
use schema::ImageDeleteResponseItem;

use crate::client::{image_ref, Call, Client, Payload};
use crate::error::Result;
use crate::options::{ImageBuildOptions, PullOptions, RemoveImageOptions};
use crate::query::QueryParameters;
use crate::stream::ResponseStream;

impl Client {
    /// Pulls an image from a registry.
    ///
    /// A `200 OK` only means the pull started; failures are reported inside
    /// the progress stream.
    pub async fn image_pull(&self, options: &PullOptions) -> Result<ResponseStream> {
        let options = PullOptions {
            from_image: image_ref(&options.from_image)?.to_string(),
            ..options.clone()
        };
        let call = Call::new(
            "image pull",
            Method::POST,
            &["images", "create"],
            &options.to_query(),
            StatusCode::OK,
        )?;
        self.expect_stream(call).await
    }

    /// Builds an image from a tar archive of the build context.
    pub async fn image_build(
        &self,
        context: impl Into<Bytes>,
        options: &ImageBuildOptions,
    ) -> Result<ResponseStream> {
        let call = Call::new(
            "image build",
            Method::POST,
            &["build"],
            &options.to_query(),
            StatusCode::OK,
        )?
        .with_payload(Payload::tar(context.into()));
        self.expect_stream(call).await
    }

    /// Removes an image and returns what was untagged and deleted.
    pub async fn image_remove(
        &self,
        name: &str,
        options: &RemoveImageOptions,
    ) -> Result<Vec<ImageDeleteResponseItem>> {
        let name = image_ref(name)?;
        let call = Call::new(
            "image remove",
            Method::DELETE,
            &["images", name.as_str()],
            &options.to_query(),
            StatusCode::OK,
        )?;
        self.expect_json(call).await
    }
}
