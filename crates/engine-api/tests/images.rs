//! Image operations against the fake engine.

mod common;

use common::{FakeEngine, Reply};
use engine_api::schema::ImageDeleteResponseItem;
use engine_api::{consume_build_stream, Error, ImageBuildOptions, PullOptions, RemoveImageOptions};
use futures::TryStreamExt;
use hyper::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

fn build_context(dockerfile: &str) -> Vec<u8> {
    let mut archive = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_size(dockerfile.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    archive
        .append_data(&mut header, "Dockerfile", dockerfile.as_bytes())
        .unwrap();
    archive.into_inner().unwrap()
}

#[tokio::test]
async fn test_pull_returns_progress_stream() {
    let engine = FakeEngine::replying(
        Reply::status(StatusCode::OK)
            .body("{\"status\":\"Pulling from library/alpine\",\"id\":\"3.20\"}\n")
            .body("{\"status\":\"Download complete\",\"id\":\"c6a83fedfae6\"}\n"),
    )
    .await;

    let mut options = PullOptions::new("alpine");
    options.tag = "3.20".into();
    let stream = engine.client().image_pull(&options).await.unwrap();
    let body: Vec<_> = stream.try_collect().await.unwrap();
    let text = String::from_utf8(body.concat()).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("Download complete"));

    let sent = engine.only_request();
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.path, "/images/create");
    assert_eq!(sent.query.as_deref(), Some("fromImage=alpine&tag=3.20"));
    assert_eq!(sent.content_type, None);
}

#[tokio::test]
async fn test_pull_failure_status() {
    let engine = FakeEngine::replying(Reply::json(
        StatusCode::NOT_FOUND,
        json!({"message": "pull access denied for nosuch"}),
    ))
    .await;
    let err = engine.client().image_pull(&PullOptions::new("nosuch")).await.unwrap_err();
    assert!(err.is_not_found(), "{err}");
}

#[tokio::test]
async fn test_build_uploads_tar_context() {
    let engine = FakeEngine::replying(
        Reply::status(StatusCode::OK)
            .body("{\"stream\":\"Step 1/1 : FROM alpine\\n\"}\n")
            .body("{\"stream\":\"Successfully tagged app:latest\\n\"}\n"),
    )
    .await;

    let context = build_context("FROM alpine\n");
    let options = ImageBuildOptions {
        tags: vec!["app:latest".into(), "app:1.0".into()],
        dockerfile: "Dockerfile".into(),
    };
    let stream = engine.client().image_build(context.clone(), &options).await.unwrap();

    let mut output = Vec::new();
    consume_build_stream(stream, &mut output).await.unwrap();
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "Step 1/1 : FROM alpine\nSuccessfully tagged app:latest\n"
    );

    let sent = engine.only_request();
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.path, "/build");
    assert_eq!(
        sent.query.as_deref(),
        Some("dockerfile=Dockerfile&t=app%3Alatest&t=app%3A1.0")
    );
    assert_eq!(sent.content_type.as_deref(), Some("application/x-tar"));
    assert_eq!(&sent.body[..], &context[..]);
}

#[tokio::test]
async fn test_build_error_in_stream() {
    let engine = FakeEngine::replying(
        Reply::status(StatusCode::OK)
            .body("{\"stream\":\"Step 1/2 : FROM alpine\\n\"}\n")
            .body("{\"stream\":\"Step 2/2 : RUN false\\n\"}\n")
            .body(concat!(
                "{\"errorDetail\":{\"code\":1,\"message\":\"The command '/bin/sh -c false' returned a non-zero code: 1\"},",
                "\"error\":\"The command '/bin/sh -c false' returned a non-zero code: 1\"}\n"
            )),
    )
    .await;

    let stream = engine
        .client()
        .image_build(build_context("FROM alpine\nRUN false\n"), &ImageBuildOptions::default())
        .await
        .unwrap();

    let mut output = Vec::new();
    let err = consume_build_stream(stream, &mut output).await.unwrap_err();
    match err {
        Error::Build { code, message } => {
            assert_eq!(code, Some(1));
            assert_eq!(message, "The command '/bin/sh -c false' returned a non-zero code: 1");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "Step 1/2 : FROM alpine\nStep 2/2 : RUN false\n"
    );
    assert_eq!(engine.only_request().query, None);
}

#[tokio::test]
async fn test_remove_image_returns_items() {
    let engine = FakeEngine::replying(Reply::json(
        StatusCode::OK,
        json!([
            {"Untagged": "app:latest"},
            {"Deleted": "sha256:1d34ffeaf190"}
        ]),
    ))
    .await;

    let options = RemoveImageOptions {
        force: true,
        prune_children: false,
    };
    let items = engine.client().image_remove("app:latest", &options).await.unwrap();
    assert_eq!(
        items,
        vec![
            ImageDeleteResponseItem {
                untagged: Some("app:latest".into()),
                deleted: None,
            },
            ImageDeleteResponseItem {
                untagged: None,
                deleted: Some("sha256:1d34ffeaf190".into()),
            },
        ]
    );

    let sent = engine.only_request();
    assert_eq!(sent.method, Method::DELETE);
    assert_eq!(sent.path, "/images/app:latest");
    assert_eq!(sent.query.as_deref(), Some("force=1"));
}

#[tokio::test]
async fn test_remove_image_expects_200() {
    let engine = FakeEngine::replying(Reply::status(StatusCode::NO_CONTENT)).await;
    let err = engine
        .client()
        .image_remove("app:latest", &RemoveImageOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NO_CONTENT));
}

#[tokio::test]
async fn test_blank_image_name_sends_no_request() {
    let engine = FakeEngine::replying(Reply::status(StatusCode::OK)).await;
    let err = engine
        .client()
        .image_remove("  ", &RemoveImageOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmptyIdentifier { kind: "image" }), "{err}");
    assert!(engine.requests().is_empty());
}

#[tokio::test]
async fn test_blank_pull_image_sends_no_request() {
    let engine = FakeEngine::replying(Reply::status(StatusCode::OK)).await;
    let err = engine.client().image_pull(&PullOptions::new(" ")).await.unwrap_err();
    assert!(matches!(err, Error::EmptyIdentifier { kind: "image" }), "{err}");
    assert!(engine.requests().is_empty());
}

#[tokio::test]
async fn test_pull_image_is_trimmed() {
    let engine = FakeEngine::replying(Reply::status(StatusCode::OK)).await;
    let stream = engine.client().image_pull(&PullOptions::new(" alpine ")).await.unwrap();
    let _: Vec<_> = stream.try_collect().await.unwrap();
    assert_eq!(engine.only_request().query.as_deref(), Some("fromImage=alpine"));
}
