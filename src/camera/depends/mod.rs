//! Backends de captura disponibles.

#[cfg(feature = "camera-gstreamer")]
pub mod gst;
pub mod synthetic;
