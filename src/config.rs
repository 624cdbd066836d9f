// src/config.rs
// ---------------------------------------------------------------------------
// Configurações centralizadas do treinador de puzzles
// ---------------------------------------------------------------------------

use std::{fs::File, io::BufReader, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// Posição inicial padrão (usada também como substituta de FEN inválido)
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// Atrasos padrão (ms) dos estados temporizados do puzzle
pub const OPPONENT_REPLY_DELAY_MS: u64 = 500;      // Espera antes da resposta automática do oponente
pub const CORRECT_FEEDBACK_DELAY_MS: u64 = 1000;   // Exibição do feedback de acerto no último lance
pub const INCORRECT_FEEDBACK_DELAY_MS: u64 = 800;  // Exibição do feedback de erro antes de reverter
pub const REVERT_DELAY_MS: u64 = 150;              // Animação da reversão até a posição anterior

// Nível de log padrão da CLI
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Atrasos dos estados temporizados do motor de puzzles.
///
/// Pode ser carregado de um arquivo JSON; campos ausentes usam os valores padrão.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub opponent_reply_ms:     u64,
    pub correct_feedback_ms:   u64,
    pub incorrect_feedback_ms: u64,
    pub revert_ms:             u64,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            opponent_reply_ms:     OPPONENT_REPLY_DELAY_MS,
            correct_feedback_ms:   CORRECT_FEEDBACK_DELAY_MS,
            incorrect_feedback_ms: INCORRECT_FEEDBACK_DELAY_MS,
            revert_ms:             REVERT_DELAY_MS,
        }
    }
}

impl Timings {
    /// Todos os atrasos zerados (útil para execução não interativa)
    pub fn instant() -> Self {
        Timings { opponent_reply_ms: 0, correct_feedback_ms: 0, incorrect_feedback_ms: 0, revert_ms: 0 }
    }

    /// Carrega os atrasos de um arquivo JSON
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("abrir {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("ler atrasos de {}", path.display()))
    }

    pub fn opponent_reply(&self) -> Duration { Duration::from_millis(self.opponent_reply_ms) }
    pub fn correct_feedback(&self) -> Duration { Duration::from_millis(self.correct_feedback_ms) }
    pub fn incorrect_feedback(&self) -> Duration { Duration::from_millis(self.incorrect_feedback_ms) }
    pub fn revert(&self) -> Duration { Duration::from_millis(self.revert_ms) }
}
