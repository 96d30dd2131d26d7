//! Backend GStreamer para la cámara (libcamera).
//!
//! Un pipeline continuo codifica JPEG y empuja cada frame al sink mediante
//! el callback del appsink; los snapshots corren un pipeline one-shot aparte
//! a mayor resolución, directo a `filesink`.

use crate::camera::{CaptureSource, FlipMode};
use crate::error::{MiradorError, Result};
use crate::sink::FrameSink;
use bytes::Bytes;
use gstreamer::{self as gst, prelude::*, MessageView, Pipeline};
use gstreamer_app as gst_app;
use std::path::Path;
use std::sync::Mutex as StdMutex;

/// Configuración del pipeline de video y del camino de stills.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub flip: FlipMode,
    pub width: u32,
    pub height: u32,
    pub jpeg_quality: u32,
    pub still_width: u32,
    pub still_height: u32,
    pub still_quality: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            flip: FlipMode::None,
            width: 640,
            height: 480,
            jpeg_quality: 85,
            still_width: 1640,
            still_height: 1232,
            still_quality: 95,
        }
    }
}

pub struct GstCamera {
    config: CameraConfig,
    sink: FrameSink,
    pipeline: StdMutex<Option<Pipeline>>,
}

impl GstCamera {
    pub fn new(config: CameraConfig, sink: FrameSink) -> Self {
        Self {
            config,
            sink,
            pipeline: StdMutex::new(None),
        }
    }

    fn video_pipeline_str(&self) -> String {
        format!(
            concat!(
                "libcamerasrc ! video/x-raw,width={},height={} ! ",
                "videoflip method={} ! videoconvert ! ",
                "queue leaky=downstream max-size-buffers=1 max-size-time=0 max-size-bytes=0 ! ",
                "jpegenc quality={} ! ",
                "appsink name=frame_sink sync=false max-buffers=1 drop=true"
            ),
            self.config.width,
            self.config.height,
            self.config.flip.videoflip_method(),
            self.config.jpeg_quality,
        )
    }

    fn still_pipeline_str(&self, path: &Path) -> String {
        format!(
            concat!(
                "libcamerasrc num-buffers=1 ! video/x-raw,width={},height={} ! ",
                "videoflip method={} ! videoconvert ! ",
                "jpegenc quality={} ! filesink location=\"{}\""
            ),
            self.config.still_width,
            self.config.still_height,
            self.config.flip.videoflip_method(),
            self.config.still_quality,
            path.display(),
        )
    }
}

impl CaptureSource for GstCamera {
    fn start(&self) -> Result<()> {
        let pipeline_str = self.video_pipeline_str();
        log::info!("Launching camera pipeline: {}", pipeline_str);

        let pipeline = gst::parse::launch(&pipeline_str)?
            .downcast::<Pipeline>()
            .map_err(|_| MiradorError::Camera("el elemento raíz no es un Pipeline".to_string()))?;

        let appsink = pipeline
            .by_name("frame_sink")
            .ok_or_else(|| MiradorError::Camera("no se encontró el appsink 'frame_sink'".to_string()))?
            .downcast::<gst_app::AppSink>()
            .map_err(|_| MiradorError::Camera("'frame_sink' no es un AppSink".to_string()))?;

        let sink = self.sink.clone();
        appsink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |s| {
                    let sample = s.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gst::FlowError::Error)?;
                    let map = buffer.map_readable().map_err(|_| gst::FlowError::Error)?;
                    sink.publish(Bytes::copy_from_slice(map.as_ref()));
                    Ok(gst::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gst::State::Playing)?;

        // El bus se vigila en un hilo aparte; solo registra, el proceso sigue.
        if let Some(bus) = pipeline.bus() {
            std::thread::spawn(move || {
                for msg in bus.iter_timed(gst::ClockTime::NONE) {
                    match msg.view() {
                        MessageView::Eos(_) => {
                            log::warn!("Camera pipeline reached EOS");
                            break;
                        }
                        MessageView::Error(err) => {
                            log::error!("Camera pipeline error: {}", err.error());
                            if let Some(debug) = err.debug() {
                                log::error!("Debug: {}", debug);
                            }
                            break;
                        }
                        _ => {}
                    }
                }
            });
        }

        *self.pipeline.lock().unwrap() = Some(pipeline);
        Ok(())
    }

    fn stop(&self) {
        if let Some(pipeline) = self.pipeline.lock().unwrap().take() {
            let _ = pipeline.set_state(gst::State::Null);
            log::info!("Camera pipeline stopped");
        }
    }

    fn capture_still(&self, path: &Path) -> Result<()> {
        let pipeline_str = self.still_pipeline_str(path);
        log::info!("Launching snapshot pipeline: {}", pipeline_str);

        let pipeline = gst::parse::launch(&pipeline_str)?
            .downcast::<Pipeline>()
            .map_err(|_| MiradorError::Camera("el elemento raíz no es un Pipeline".to_string()))?;

        let bus = pipeline
            .bus()
            .ok_or_else(|| MiradorError::Camera("pipeline sin bus".to_string()))?;

        pipeline.set_state(gst::State::Playing)?;

        let mut result = Err(MiradorError::Snapshot(
            "timed out waiting for the capture to finish".to_string(),
        ));
        for msg in bus.iter_timed(gst::ClockTime::from_seconds(10)) {
            match msg.view() {
                MessageView::Eos(_) => {
                    result = Ok(());
                    break;
                }
                MessageView::Error(err) => {
                    result = Err(MiradorError::Snapshot(format!(
                        "capture pipeline failed: {}",
                        err.error()
                    )));
                    break;
                }
                _ => {}
            }
        }

        let _ = pipeline.set_state(gst::State::Null);
        result
    }
}
