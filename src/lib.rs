//! Mirador: streaming MJPEG en vivo desde la cámara, con captura de
//! snapshots bajo demanda.
//!
//! Un solo productor (la cámara) publica frames JPEG en el [`sink`]; cada
//! conexión HTTP los consume a su propio ritmo como multipart
//! `x-mixed-replace`. Cuatro rutas: redirección de raíz, página principal,
//! stream en vivo y snapshot a disco.

pub mod camera;
pub mod error;
pub mod pages;
pub mod sink;
pub mod snapshot;
pub mod state;
pub mod stream;
pub mod web;

pub use error::{MiradorError, Result};
pub use sink::{FrameReader, FrameSink};
pub use state::AppState;
