//! Estados y configuraciones separados para AppState.
//!
//! Separa las responsabilidades de AppState en structs más pequeños y
//! enfocados.

use crate::camera::CaptureSource;
use crate::sink::FrameSink;
use std::path::PathBuf;
use std::sync::Arc;

/// Estado de streaming: el canal de último frame compartido entre la
/// cámara y todas las conexiones.
#[derive(Clone, Debug)]
pub struct StreamingState {
    pub sink: FrameSink,
}

/// Configuración de snapshots
#[derive(Clone, Debug)]
pub struct SnapshotConfig {
    /// Directorio destino; se crea bajo demanda en cada captura.
    pub dir: PathBuf,
}

pub struct AppState {
    /// Página HTML servida en /index.html, cargada una sola vez al inicio.
    pub index_html: String,
    pub streaming: StreamingState,
    pub snapshots: SnapshotConfig,
    pub camera: Arc<dyn CaptureSource>,
}

impl AppState {
    pub fn new(
        index_html: String,
        sink: FrameSink,
        snapshot_dir: PathBuf,
        camera: Arc<dyn CaptureSource>,
    ) -> Self {
        Self {
            index_html,
            streaming: StreamingState { sink },
            snapshots: SnapshotConfig { dir: snapshot_dir },
            camera,
        }
    }
}
