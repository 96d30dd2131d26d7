//! Captura de stills bajo demanda.
//!
//! El still sale por el camino de captura propio de la cámara, no del
//! último frame transmitido. El nombre lleva el timestamp local con
//! resolución de segundos; dos pedidos en el mismo segundo apuntan al
//! mismo archivo y el segundo lo sobreescribe.

use crate::camera::CaptureSource;
use crate::error::{MiradorError, Result};
use crate::state::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Nombre de archivo para un snapshot tomado ahora mismo.
pub fn snapshot_filename() -> String {
    format!("snapshot_{}.jpg", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Crea el directorio si hace falta y captura un still dentro.
///
/// La captura corre en `spawn_blocking`: el pipeline one-shot de GStreamer
/// bloquea hasta terminar.
pub async fn capture_to_dir(camera: Arc<dyn CaptureSource>, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(snapshot_filename());

    let target = path.clone();
    tokio::task::spawn_blocking(move || camera.capture_still(&target))
        .await
        .map_err(|err| MiradorError::Snapshot(format!("capture task failed: {}", err)))??;

    Ok(path)
}

/// `GET /snapshot`: captura sincrónica, cuerpo fijo en ambos resultados.
pub async fn take_snapshot(State(state): State<Arc<AppState>>) -> Response {
    match capture_to_dir(state.camera.clone(), &state.snapshots.dir).await {
        Ok(path) => {
            log::info!("Snapshot saved to {}", path.display());
            Response::builder()
                .status(StatusCode::OK)
                .body(Body::from("Snapshot saved."))
                .unwrap()
        }
        Err(err) => {
            log::error!("Error capturing snapshot: {}", err);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::from("Failed to save snapshot."))
                .unwrap()
        }
    }
}
