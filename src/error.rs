//! Tipos de error personalizados para Mirador.
//!
//! Proporciona errores estructurados con contexto para mejor debugging
//! y manejo de errores en producción.

use std::fmt;

/// Error principal de la aplicación Mirador
#[derive(Debug)]
pub enum MiradorError {
    /// Errores de configuración
    Config(String),
    /// Errores de la cámara o del pipeline de captura
    Camera(String),
    /// Errores de streaming
    Streaming(String),
    /// Errores de captura de snapshots
    Snapshot(String),
    /// Errores de I/O
    Io(std::io::Error),
    /// Errores genéricos
    Other(String),
}

impl fmt::Display for MiradorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiradorError::Config(msg) => write!(f, "Config error: {}", msg),
            MiradorError::Camera(msg) => write!(f, "Camera error: {}", msg),
            MiradorError::Streaming(msg) => write!(f, "Streaming error: {}", msg),
            MiradorError::Snapshot(msg) => write!(f, "Snapshot error: {}", msg),
            MiradorError::Io(err) => write!(f, "IO error: {}", err),
            MiradorError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for MiradorError {}

impl From<std::io::Error> for MiradorError {
    fn from(err: std::io::Error) -> Self {
        MiradorError::Io(err)
    }
}

impl From<&str> for MiradorError {
    fn from(err: &str) -> Self {
        MiradorError::Other(err.to_string())
    }
}

impl From<String> for MiradorError {
    fn from(err: String) -> Self {
        MiradorError::Other(err)
    }
}

#[cfg(feature = "camera-gstreamer")]
impl From<gstreamer::StateChangeError> for MiradorError {
    fn from(err: gstreamer::StateChangeError) -> Self {
        MiradorError::Camera(format!("GStreamer StateChangeError: {:?}", err))
    }
}

#[cfg(feature = "camera-gstreamer")]
impl From<gstreamer::glib::Error> for MiradorError {
    fn from(err: gstreamer::glib::Error) -> Self {
        MiradorError::Camera(format!("GStreamer error: {}", err))
    }
}

/// Result type alias para simplificar el código
pub type Result<T> = std::result::Result<T, MiradorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirador_error_display() {
        let err = MiradorError::Config("test config error".to_string());
        assert_eq!(format!("{}", err), "Config error: test config error");

        let err = MiradorError::Camera("pipeline stalled".to_string());
        assert_eq!(format!("{}", err), "Camera error: pipeline stalled");

        let err = MiradorError::Snapshot("disk full".to_string());
        assert_eq!(format!("{}", err), "Snapshot error: disk full");
    }

    #[test]
    fn test_error_from_conversions() {
        // Test From<String>
        let err: MiradorError = "generic error".to_string().into();
        assert!(matches!(err, MiradorError::Other(_)));

        // Test From<&str>
        let err: MiradorError = "string error".into();
        assert!(matches!(err, MiradorError::Other(_)));

        // Test From<std::io::Error>
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MiradorError = io_err.into();
        assert!(matches!(err, MiradorError::Io(_)));
    }

    #[test]
    fn test_error_is_error_trait() {
        let err = MiradorError::Streaming("client gone".to_string());
        // Verificar que implementa std::error::Error
        let _error: &dyn std::error::Error = &err;
    }
}
