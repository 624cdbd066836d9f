// src/audio.rs
// Sinais sonoros das máquinas de estado, injetados na construção de cada componente

use std::sync::{Arc, Mutex};

use log::debug;

/// Sinal sonoro emitido pelos componentes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound { Move, Capture, Failure }

impl Sound {
    /// Lance comum ou captura
    pub fn for_move(capture: bool) -> Self {
        if capture { Sound::Capture } else { Sound::Move }
    }
}

/// Capacidade de reprodução de sons
pub trait SoundPlayer: Send + Sync {
    fn play(&self, sound: Sound);
}

/// Referência compartilhada usada pelos componentes
pub type SharedSound = Arc<dyn SoundPlayer>;

/// Não reproduz nada
#[derive(Debug, Default)]
pub struct Silent;

impl SoundPlayer for Silent {
    fn play(&self, _: Sound) {}
}

/// Registra os sons no log (CLI)
#[derive(Debug, Default)]
pub struct LogSound;

impl SoundPlayer for LogSound {
    fn play(&self, sound: Sound) { debug!("som: {sound:?}"); }
}

/// Guarda os sons tocados, para inspeção
#[derive(Debug, Default)]
pub struct RecordingSound {
    played: Mutex<Vec<Sound>>,
}

impl RecordingSound {
    pub fn played(&self) -> Vec<Sound> {
        self.played.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl SoundPlayer for RecordingSound {
    fn play(&self, sound: Sound) {
        if let Ok(mut v) = self.played.lock() { v.push(sound); }
    }
}

pub fn silent() -> SharedSound { Arc::new(Silent) }
