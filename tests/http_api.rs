//! Tests de integración del router completo, sin hardware: la cámara es
//! sintética y los frames se publican a mano en el sink.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use mirador::camera::{CaptureSource, SyntheticCamera};
use mirador::error::{MiradorError, Result};
use mirador::sink::FrameSink;
use mirador::web::create_router;
use mirador::AppState;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const INDEX_HTML: &str = "<html><body>mirador</body></html>";

fn jpeg(tag: u8) -> Bytes {
    Bytes::from(vec![0xff, 0xd8, tag, 0xff, 0xd9])
}

fn app(snapshot_dir: &Path) -> (Router, FrameSink) {
    let sink = FrameSink::new();
    let camera = Arc::new(SyntheticCamera::new(sink.clone()));
    let state = Arc::new(AppState::new(
        INDEX_HTML.to_string(),
        sink.clone(),
        snapshot_dir.to_path_buf(),
        camera,
    ));
    (create_router(state), sink)
}

async fn next_body_chunk(body: &mut Body) -> Bytes {
    let frame = tokio::time::timeout(Duration::from_secs(2), body.frame())
        .await
        .expect("the stream should produce a part promptly")
        .expect("the stream must not end")
        .expect("the stream must not fail");
    frame.into_data().expect("expected a data frame")
}

#[tokio::test]
async fn root_redirects_to_index_html() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _sink) = app(dir.path());

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/index.html"
    );
}

#[tokio::test]
async fn root_redirect_ignores_the_query_string() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _sink) = app(dir.path());

    let response = app
        .oneshot(Request::get("/?modo=noche").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/index.html"
    );
}

#[tokio::test]
async fn index_html_is_served_with_type_and_length() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _sink) = app(dir.path());

    let response = app
        .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let content_length: usize = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(content_length, body.len());
    assert_eq!(body, Bytes::from(INDEX_HTML));
}

#[tokio::test]
async fn unknown_paths_get_404() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _sink) = app(dir.path());

    let response = app
        .oneshot(Request::get("/no-existe").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_method_on_a_known_path_gets_404() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _sink) = app(dir.path());

    let response = app
        .oneshot(Request::post("/snapshot").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stream_carries_the_mjpeg_headers() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _sink) = app(dir.path());

    let response = app
        .oneshot(Request::get("/stream.mjpg").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::AGE).unwrap(), "0");
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-cache, private"
    );
    assert_eq!(response.headers().get(header::PRAGMA).unwrap(), "no-cache");
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "multipart/x-mixed-replace; boundary=FRAME"
    );
}

#[tokio::test]
async fn first_stream_bytes_are_the_current_frame_as_a_part() {
    let dir = tempfile::tempdir().unwrap();
    let (app, sink) = app(dir.path());

    let frame = jpeg(1);
    sink.publish(frame.clone());

    let response = app
        .oneshot(Request::get("/stream.mjpg").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let mut body = response.into_body();

    let part = next_body_chunk(&mut body).await;
    let mut expected = Vec::new();
    expected.extend_from_slice(
        format!(
            "--FRAME\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
            frame.len()
        )
        .as_bytes(),
    );
    expected.extend_from_slice(&frame);
    expected.extend_from_slice(b"\r\n");
    assert_eq!(part, Bytes::from(expected));
}

#[tokio::test]
async fn stream_follows_the_publish_cadence() {
    let dir = tempfile::tempdir().unwrap();
    let (app, sink) = app(dir.path());

    sink.publish(jpeg(1));
    let response = app
        .oneshot(Request::get("/stream.mjpg").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let mut body = response.into_body();

    let first = next_body_chunk(&mut body).await;
    assert!(first
        .windows(jpeg(1).len())
        .any(|window| window == jpeg(1).as_ref()));

    sink.publish(jpeg(2));
    let second = next_body_chunk(&mut body).await;
    assert!(second
        .windows(jpeg(2).len())
        .any(|window| window == jpeg(2).as_ref()));
}

#[tokio::test]
async fn a_dropped_client_does_not_disturb_the_next_one() {
    let dir = tempfile::tempdir().unwrap();
    let (app, sink) = app(dir.path());

    sink.publish(jpeg(1));
    let response = app
        .clone()
        .oneshot(Request::get("/stream.mjpg").body(Body::empty()).unwrap())
        .await
        .unwrap();
    // El cliente corta sin leer nada: su tarea muere en el próximo send.
    drop(response);

    sink.publish(jpeg(2));
    sink.publish(jpeg(3));
    tokio::task::yield_now().await;

    let response = app
        .oneshot(Request::get("/stream.mjpg").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let mut body = response.into_body();
    let part = next_body_chunk(&mut body).await;
    assert!(part
        .windows(jpeg(3).len())
        .any(|window| window == jpeg(3).as_ref()));
}

#[tokio::test]
async fn snapshot_saves_a_timestamped_file() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot_dir = dir.path().join("snapshots");
    let (app, _sink) = app(&snapshot_dir);

    let response = app
        .oneshot(Request::get("/snapshot").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, Bytes::from_static(b"Snapshot saved."));

    let entries: Vec<_> = std::fs::read_dir(&snapshot_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("snapshot_"));
    assert!(entries[0].ends_with(".jpg"));
}

#[tokio::test]
async fn repeated_snapshots_within_a_second_still_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _sink) = app(dir.path());

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(Request::get("/snapshot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Mismo segundo o no, todo archivo presente es un JPEG completo.
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let contents = std::fs::read(entry.unwrap().path()).unwrap();
        assert_eq!(&contents[..2], &[0xff, 0xd8]);
        assert_eq!(&contents[contents.len() - 2..], &[0xff, 0xd9]);
    }
}

struct BrokenCamera;

impl CaptureSource for BrokenCamera {
    fn start(&self) -> Result<()> {
        Ok(())
    }

    fn stop(&self) {}

    fn capture_still(&self, _path: &Path) -> Result<()> {
        Err(MiradorError::Camera("device unavailable".to_string()))
    }
}

#[tokio::test]
async fn snapshot_failure_maps_to_500_with_fixed_body() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FrameSink::new();
    let state = Arc::new(AppState::new(
        INDEX_HTML.to_string(),
        sink,
        dir.path().to_path_buf(),
        Arc::new(BrokenCamera),
    ));
    let app = create_router(state);

    let response = app
        .oneshot(Request::get("/snapshot").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, Bytes::from_static(b"Failed to save snapshot."));
}
