//! Canal de "último frame" para la distribución MJPEG.
//!
//! Un solo productor (la cámara) publica frames JPEG completos; cualquier
//! cantidad de lectores (conexiones HTTP) consume siempre el frame más
//! reciente. No hay cola: un slot único con un contador de generación,
//! los lectores lentos saltan frames en vez de acumularlos.

use crate::error::{MiradorError, Result};
use bytes::Bytes;
use tokio::sync::watch;

/// Contenido del slot compartido. `generation == 0` significa que todavía
/// no se publicó ningún frame.
#[derive(Clone, Debug)]
struct Slot {
    generation: u64,
    frame: Bytes,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            generation: 0,
            frame: Bytes::new(),
        }
    }
}

/// Lado de escritura del canal. Clonable: la cámara y el estado de la app
/// comparten el mismo slot.
#[derive(Clone, Debug)]
pub struct FrameSink {
    tx: std::sync::Arc<watch::Sender<Slot>>,
}

impl FrameSink {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Slot::default());
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    /// Reemplaza el frame actual, avanza la generación y despierta a todos
    /// los lectores en espera. Nunca falla.
    pub fn publish(&self, frame: Bytes) {
        self.tx.send_modify(|slot| {
            slot.generation = slot.generation.wrapping_add(1);
            slot.frame = frame;
        });
    }

    /// Crea un lector independiente. Cada lector lleva su propia cuenta de
    /// la última generación vista.
    pub fn reader(&self) -> FrameReader {
        FrameReader {
            rx: self.tx.subscribe(),
        }
    }

    /// Generación del frame publicado más recientemente (0 si ninguno).
    pub fn generation(&self) -> u64 {
        self.tx.borrow().generation
    }
}

impl Default for FrameSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Lado de lectura: consulta sin bloquear o espera al siguiente frame.
#[derive(Debug)]
pub struct FrameReader {
    rx: watch::Receiver<Slot>,
}

impl FrameReader {
    /// Frame todavía vigente, sin esperar. `None` antes de la primera
    /// publicación. Permite que un lector que se conecta tarde arranque con
    /// el frame ya publicado en vez de quedarse bloqueado hasta el próximo.
    pub fn current(&self) -> Option<(u64, Bytes)> {
        let slot = self.rx.borrow();
        if slot.generation == 0 {
            None
        } else {
            Some((slot.generation, slot.frame.clone()))
        }
    }

    /// Espera un frame con generación estrictamente mayor que `last_seen` y
    /// lo devuelve junto con su generación. Si se publicaron varios frames
    /// mientras el lector dormía, solo se observa el más nuevo.
    pub async fn next_frame(&mut self, last_seen: u64) -> Result<(u64, Bytes)> {
        let slot = self
            .rx
            .wait_for(|slot| slot.generation > last_seen)
            .await
            .map_err(|_| MiradorError::Streaming("frame producer stopped".to_string()))?;
        Ok((slot.generation, slot.frame.clone()))
    }
}
