//! Fuente de captura: la cámara y sus backends.
//!
//! El resto del sistema solo conoce el trait [`CaptureSource`]: un
//! colaborador externo que empuja frames JPEG al [`FrameSink`] y sabe
//! capturar un still de mayor resolución directo a disco.

pub mod depends;

#[cfg(feature = "camera-gstreamer")]
pub use depends::gst::{CameraConfig, GstCamera};
pub use depends::synthetic::SyntheticCamera;

use crate::error::Result;
use clap::ValueEnum;
use std::path::Path;

/// Modo de espejado aplicado a la captura antes de arrancar el pipeline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FlipMode {
    /// Sin espejado
    #[default]
    None,
    /// Espejo horizontal
    H,
    /// Espejo vertical
    V,
    /// Espejo horizontal y vertical
    Hv,
}

impl FlipMode {
    pub fn hflip(&self) -> bool {
        matches!(self, FlipMode::H | FlipMode::Hv)
    }

    pub fn vflip(&self) -> bool {
        matches!(self, FlipMode::V | FlipMode::Hv)
    }

    /// Valor del property `method` del elemento `videoflip` de GStreamer.
    pub fn videoflip_method(&self) -> &'static str {
        match self {
            FlipMode::None => "none",
            FlipMode::H => "horizontal-flip",
            FlipMode::V => "vertical-flip",
            FlipMode::Hv => "rotate-180",
        }
    }
}

/// Colaborador externo que produce los frames.
///
/// Lifecycle: `start` una sola vez antes del listener HTTP, `stop` una sola
/// vez cuando el listener termina. `capture_still` es un camino de captura
/// aparte, no un volcado del último frame transmitido, y puede bloquear.
pub trait CaptureSource: Send + Sync {
    /// Arranca la captura continua; cada frame JPEG completo se publica
    /// exactamente una vez en el sink.
    fn start(&self) -> Result<()>;

    /// Detiene el pipeline de captura.
    fn stop(&self);

    /// Captura un solo still y lo escribe directamente en `path`.
    fn capture_still(&self, path: &Path) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_none_requests_no_mirroring() {
        assert!(!FlipMode::None.hflip());
        assert!(!FlipMode::None.vflip());
        assert_eq!(FlipMode::None.videoflip_method(), "none");
        assert_eq!(FlipMode::default(), FlipMode::None);
    }

    #[test]
    fn flip_hv_requests_both_mirrorings() {
        assert!(FlipMode::Hv.hflip());
        assert!(FlipMode::Hv.vflip());
        assert_eq!(FlipMode::Hv.videoflip_method(), "rotate-180");
    }

    #[test]
    fn flip_single_axis_variants() {
        assert!(FlipMode::H.hflip());
        assert!(!FlipMode::H.vflip());
        assert_eq!(FlipMode::H.videoflip_method(), "horizontal-flip");

        assert!(!FlipMode::V.hflip());
        assert!(FlipMode::V.vflip());
        assert_eq!(FlipMode::V.videoflip_method(), "vertical-flip");
    }

    #[test]
    fn flip_parses_from_cli_values() {
        // Los valores aceptados en la línea de comandos: none, h, v, hv.
        assert_eq!(
            FlipMode::from_str("hv", true).unwrap(),
            FlipMode::Hv
        );
        assert_eq!(
            FlipMode::from_str("none", true).unwrap(),
            FlipMode::None
        );
        assert!(FlipMode::from_str("diagonal", true).is_err());
    }
}
