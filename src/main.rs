//! Binario de mirador: configura la cámara, arma el estado y sirve HTTP.

use clap::Parser;
use dotenvy::dotenv;
use mirador::camera::{CaptureSource, FlipMode};
use mirador::pages::load_template;
use mirador::sink::FrameSink;
use mirador::web::create_router;
use mirador::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Streaming MJPEG en vivo con captura de snapshots.
#[derive(Parser, Debug)]
#[command(name = "mirador", version, about)]
struct Cli {
    /// Espejado aplicado a la captura antes de arrancar el pipeline
    #[arg(long, value_enum, default_value = "none")]
    flip: FlipMode,
}

/// Directorio base: el del ejecutable si el template está junto a él,
/// si no el directorio de trabajo (el caso `cargo run`).
fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
        .filter(|dir| dir.join("template/index.html").is_file())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// IP local visible desde la red, para el banner de arranque. El socket
/// UDP nunca manda nada; `connect` solo resuelve la interfaz de salida.
fn local_ip() -> String {
    std::net::UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("8.8.8.8:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}

#[cfg(feature = "camera-gstreamer")]
fn build_camera(flip: FlipMode, sink: FrameSink) -> mirador::Result<Arc<dyn CaptureSource>> {
    use mirador::camera::{CameraConfig, GstCamera};

    gstreamer::init()?;
    let config = CameraConfig {
        flip,
        ..CameraConfig::default()
    };
    Ok(Arc::new(GstCamera::new(config, sink)))
}

#[cfg(not(feature = "camera-gstreamer"))]
fn build_camera(flip: FlipMode, sink: FrameSink) -> mirador::Result<Arc<dyn CaptureSource>> {
    use mirador::camera::SyntheticCamera;

    if flip != FlipMode::None {
        log::warn!("--flip has no effect on the synthetic capture source");
    }
    Ok(Arc::new(SyntheticCamera::new(sink)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let listen_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

    let base = base_dir();
    let index_html = load_template(&base);

    let sink = FrameSink::new();
    let camera = build_camera(cli.flip, sink.clone())?;

    let state = Arc::new(AppState::new(
        index_html,
        sink,
        base.join("snapshots"),
        camera.clone(),
    ));

    // La cámara arranca antes del listener y se apaga cuando este termina.
    camera.start()?;

    let app = create_router(state);
    let addr: SocketAddr = listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let ip = local_ip();
    log::info!("Server started on http://{}:{}", ip, addr.port());
    println!("📷 Mirador escuchando en http://{}:{}", ip, addr.port());

    axum::serve(listener, app).await?;

    camera.stop();
    Ok(())
}
