//! Armado del router HTTP.
//!
//! Cuatro rutas con coincidencia exacta de path; cualquier otro path o
//! método responde 404. El router se construye acá para que los tests de
//! integración lo levanten sin pasar por `main`.

use crate::pages::{index_page, index_redirect, not_found};
use crate::snapshot::take_snapshot;
use crate::state::AppState;
use crate::stream::stream_mjpeg;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Construye el router completo con su estado.
///
/// Un método distinto de GET sobre una ruta conocida también cae en 404,
/// no en el 405 por defecto de axum.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_redirect).fallback(not_found))
        .route("/index.html", get(index_page).fallback(not_found))
        .route("/stream.mjpg", get(stream_mjpeg).fallback(not_found))
        .route("/snapshot", get(take_snapshot).fallback(not_found))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}
