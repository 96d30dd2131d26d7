//! Páginas HTML y respuestas estáticas.
//!
//! Carga el template una sola vez al arrancar y sirve las rutas que no son
//! de streaming: la redirección de raíz, la página principal y el 404.

use crate::state::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use std::path::Path;
use std::sync::Arc;

/// HTML de emergencia cuando el template no está en disco.
pub const FALLBACK_TEMPLATE: &str =
    "<html><body><h1>Error: Template not found.</h1></body></html>";

/// Ruta del template relativa al directorio base del binario.
const TEMPLATE_RELATIVE: &str = "template/index.html";

/// Carga el template de la página principal.
///
/// Se resuelve contra el directorio base del binario; si no existe se sirve
/// el [`FALLBACK_TEMPLATE`] y el fallo queda registrado en el log.
pub fn load_template(base_dir: &Path) -> String {
    let path = base_dir.join(TEMPLATE_RELATIVE);
    match std::fs::read_to_string(&path) {
        Ok(html) => {
            log::info!("Loaded HTML template from {}", path.display());
            html
        }
        Err(_) => {
            log::error!("HTML template file '{}' not found.", path.display());
            FALLBACK_TEMPLATE.to_string()
        }
    }
}

/// `GET /` responde 301 hacia `/index.html`.
pub async fn index_redirect() -> Response {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(header::LOCATION, "/index.html")
        .body(Body::empty())
        .unwrap()
}

/// `GET /index.html` sirve la página cargada en el estado.
pub async fn index_page(State(state): State<Arc<AppState>>) -> Response {
    let html = state.index_html.clone();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CONTENT_LENGTH, html.len())
        .body(Body::from(html))
        .unwrap()
}

/// Cualquier ruta o método desconocido termina aquí.
pub async fn not_found() -> Response {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::empty())
        .unwrap()
}
