//! Decoder for container wait responses.
//!
//! The wait body should be a single JSON object, but proxies and older
//! engines sometimes answer with plain text under a success status. When the
//! body is not JSON at all the decoder reports what it received instead of a
//! bare syntax error.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use schema::ContainerWaitResponse;

use crate::error::{Error, Result};

/// Maximum number of bytes read past the point of a syntax error to fill out
/// a [`Error::MalformedResponse`] message.
pub const MALFORMED_RESPONSE_LIMIT: usize = 2048;

/// Decodes one wait response object from `body`.
///
/// - A syntax error yields [`Error::MalformedResponse`] carrying the bytes
///   consumed so far plus up to [`MALFORMED_RESPONSE_LIMIT`] further bytes.
/// - Any other decode failure, including a body that ends early, yields
///   [`Error::Decode`].
/// - Errors from `body` itself are returned unchanged.
pub async fn decode_wait_response<S>(mut body: S) -> Result<ContainerWaitResponse>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    let mut consumed = Vec::new();

    // The object is parsed again from the start on every chunk. Wait bodies
    // are a few dozen bytes, so this stays cheap.
    while let Some(chunk) = body.next().await {
        consumed.extend_from_slice(&chunk?);

        let next = serde_json::Deserializer::from_slice(&consumed)
            .into_iter::<ContainerWaitResponse>()
            .next();
        match next {
            Some(Ok(response)) => return Ok(response),
            // Only whitespace so far, or the object continues in a later chunk.
            None => {}
            Some(Err(e)) if e.is_eof() => {}
            Some(Err(e)) if e.is_syntax() => {
                tracing::debug!(error = %e, "Wait response is not JSON");
                return Err(malformed(consumed, &mut body).await);
            }
            Some(Err(e)) => return Err(Error::Decode(e)),
        }
    }

    serde_json::from_slice(&consumed).map_err(Error::Decode)
}

async fn malformed<S>(mut consumed: Vec<u8>, body: &mut S) -> Error
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    let mut extra = Vec::new();
    while extra.len() < MALFORMED_RESPONSE_LIMIT {
        match body.next().await {
            Some(Ok(chunk)) => extra.extend_from_slice(&chunk),
            _ => break,
        }
    }
    extra.truncate(MALFORMED_RESPONSE_LIMIT);

    consumed.extend_from_slice(&extra);
    Error::MalformedResponse(String::from_utf8_lossy(&consumed).into_owned())
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use pretty_assertions::assert_eq;

    use super::*;

    fn body<I, B>(parts: I) -> impl Stream<Item = Result<Bytes>> + Unpin
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let chunks: Vec<Result<Bytes>> = parts
            .into_iter()
            .map(|p| Ok(Bytes::copy_from_slice(p.as_ref())))
            .collect();
        stream::iter(chunks)
    }

    #[tokio::test]
    async fn test_exit_code_without_error() {
        let response = decode_wait_response(body(["{\"StatusCode\":137}\n"])).await.unwrap();
        assert_eq!(response.status_code, 137);
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_exit_error_message() {
        let response = decode_wait_response(body([
            r#"{"StatusCode":1,"Error":{"Message":"container "#,
            r#"not found"}}"#,
        ]))
        .await
        .unwrap();
        assert_eq!(response.status_code, 1);
        assert_eq!(response.error.unwrap().message, "container not found");
    }

    #[tokio::test]
    async fn test_plain_text_is_malformed_response() {
        let err = decode_wait_response(body(["page not ", "found\n"])).await.unwrap_err();
        match err {
            Error::MalformedResponse(text) => assert_eq!(text, "page not found\n"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_response_reads_at_most_limit_more_bytes() {
        let err = decode_wait_response(body(["<html>".to_owned(), "x".repeat(4096)]))
            .await
            .unwrap_err();
        let Error::MalformedResponse(text) = err else {
            panic!("expected malformed response");
        };
        assert_eq!(text.len(), "<html>".len() + MALFORMED_RESPONSE_LIMIT);
        assert!(text.starts_with("<html>xxx"));
    }

    #[tokio::test]
    async fn test_type_mismatch_is_decode_error() {
        let err = decode_wait_response(body([r#"{"StatusCode":"oops"}"#])).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "{err}");
    }

    #[tokio::test]
    async fn test_truncated_body_is_decode_error() {
        let err = decode_wait_response(body([r#"{"StatusCode":"#])).await.unwrap_err();
        match err {
            Error::Decode(e) => assert!(e.is_eof()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_body_is_decode_error() {
        let err = decode_wait_response(body(Vec::<&str>::new())).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "{err}");
    }

    #[tokio::test]
    async fn test_stream_error_is_passed_through() {
        let items: Vec<Result<Bytes>> = vec![Ok(Bytes::from_static(b"{\"Stat")), Err(Error::Cancelled)];
        let err = decode_wait_response(stream::iter(items)).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled), "{err}");
    }
}
