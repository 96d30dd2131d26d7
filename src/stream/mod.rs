//! Endpoint MJPEG en vivo.
//!
//! Cada conexión recibe su propio lector del sink y una tarea que le
//! reenvía los frames como partes multipart. La tarea termina sola cuando
//! el cliente corta: el canal hacia el body se cierra y el `send` falla.

use crate::state::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

/// Boundary multipart fijo del stream.
pub const BOUNDARY: &str = "FRAME";

/// Arma una parte multipart completa: boundary, headers de la parte, el
/// JPEG y el CRLF de cierre.
pub fn encode_part(jpeg: &Bytes) -> Bytes {
    let mut chunk = Vec::with_capacity(jpeg.len() + 128);
    chunk.extend_from_slice(
        format!(
            "--{}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
            BOUNDARY,
            jpeg.len()
        )
        .as_bytes(),
    );
    chunk.extend_from_slice(jpeg);
    chunk.extend_from_slice(b"\r\n");
    Bytes::from(chunk)
}

/// `GET /stream.mjpg`: respuesta multipart sin fin, al ritmo de la cámara.
pub async fn stream_mjpeg(State(state): State<Arc<AppState>>) -> Response {
    let mut reader = state.streaming.sink.reader();
    let (tx, rx) = mpsc::channel::<Bytes>(2);

    tokio::spawn(async move {
        let mut last_seen = 0u64;

        // Si ya hay un frame vigente se envía de entrada, así un cliente
        // que se conecta tarde no espera hasta la próxima publicación.
        if let Some((generation, frame)) = reader.current() {
            if tx.send(encode_part(&frame)).await.is_err() {
                log::warn!("Removed streaming client: client disconnected");
                return;
            }
            last_seen = generation;
        }

        loop {
            let (generation, frame) = match reader.next_frame(last_seen).await {
                Ok(next) => next,
                Err(err) => {
                    log::warn!("Removed streaming client: {}", err);
                    break;
                }
            };
            last_seen = generation;
            if tx.send(encode_part(&frame)).await.is_err() {
                log::warn!("Removed streaming client: client disconnected");
                break;
            }
        }
    });

    let body = Body::from_stream(ReceiverStream::new(rx).map(Ok::<_, Infallible>));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::AGE, "0")
        .header(header::CACHE_CONTROL, "no-cache, private")
        .header(header::PRAGMA, "no-cache")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/x-mixed-replace; boundary={}", BOUNDARY),
        )
        .body(body)
        .unwrap()
}
