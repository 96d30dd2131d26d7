//! Fuente de captura sintética, sin hardware.
//!
//! Publica un JPEG fijo a cadencia constante. Se usa cuando el binario se
//! compila sin el feature `camera-gstreamer`, y en los tests.

use crate::camera::CaptureSource;
use crate::error::Result;
use crate::sink::FrameSink;
use bytes::Bytes;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// JPEG baseline mínimo de 1x1 (un bloque gris): SOI, DQT, SOF0, dos DHT
/// con un solo código, SOS y EOI.
pub const TEST_FRAME: &[u8] = &[
    0xff, 0xd8, // SOI
    0xff, 0xdb, 0x00, 0x43, 0x00, // DQT, tabla 0
    0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10,
    0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10,
    0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10,
    0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10,
    0x10, 0x10, 0x10, 0x10, // 64 coeficientes planos
    0xff, 0xc0, 0x00, 0x0b, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00, // SOF0 1x1
    0xff, 0xc4, 0x00, 0x14, 0x00, // DHT DC0, un código de 1 bit
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
    0xff, 0xc4, 0x00, 0x14, 0x10, // DHT AC0, un código de 1 bit
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
    0xff, 0xda, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3f, 0x00, // SOS
    0x3f, // DC=0, EOB, relleno con unos
    0xff, 0xd9, // EOI
];

/// Intervalo por defecto entre frames sintéticos (~10 fps).
const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(100);

pub struct SyntheticCamera {
    sink: FrameSink,
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl SyntheticCamera {
    pub fn new(sink: FrameSink) -> Self {
        Self::with_interval(sink, DEFAULT_FRAME_INTERVAL)
    }

    pub fn with_interval(sink: FrameSink, interval: Duration) -> Self {
        Self {
            sink,
            interval,
            running: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl CaptureSource for SyntheticCamera {
    fn start(&self) -> Result<()> {
        self.running.store(true, Ordering::Relaxed);
        let running = self.running.clone();
        let sink = self.sink.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            while running.load(Ordering::Relaxed) {
                ticker.tick().await;
                sink.publish(Bytes::from_static(TEST_FRAME));
            }
        });
        log::info!("Synthetic capture source started ({}ms per frame)", self.interval.as_millis());
        Ok(())
    }

    fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    fn capture_still(&self, path: &Path) -> Result<()> {
        std::fs::write(path, TEST_FRAME)?;
        Ok(())
    }
}
