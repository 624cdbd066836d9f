// src/replay.rs
// ---------------------------------------------------------------------------
// Reprodução de sequências UCI a partir de uma posição raiz.
// Para no primeiro lance ilegível/ilegal: o prefixo válido é mantido,
// nada depois dele é inventado.
// ---------------------------------------------------------------------------

use log::trace;
use serde::Serialize;
use shakmaty::{Chess, Position};

use crate::engine;

/// Lance derivado da reprodução (nunca construído à mão)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub uci:        String,
    pub san:        String,
    pub is_capture: bool,
}

/// Passo da reprodução: FEN após o lance e seus metadados
#[derive(Debug, Clone, Serialize)]
pub struct ReplayStep {
    pub fen:    String,
    #[serde(flatten)]
    pub record: MoveRecord,
}

/// Resultado da reprodução
#[derive(Debug, Clone)]
pub struct Replay {
    pub position:   Chess,          // Posição final alcançada
    pub steps:      Vec<ReplayStep>,
    pub stopped_at: Option<usize>,  // Índice do primeiro lance rejeitado
}

impl Replay {
    pub fn fen(&self) -> String { engine::to_fen(&self.position) }

    /// UCIs efetivamente aplicados
    pub fn ucis(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.record.uci.clone()).collect()
    }
}

/// Reproduz `ucis` a partir de `root`
pub fn replay<S: AsRef<str>>(root: &Chess, ucis: &[S]) -> Replay {
    let mut position = root.clone();
    let mut steps = Vec::with_capacity(ucis.len());
    for (i, uci) in ucis.iter().enumerate() {
        let uci = uci.as_ref();
        let Some(mv) = engine::parse_uci(&position, uci) else {
            trace!("reprodução parou no lance #{i} ({uci})");
            return Replay { position, steps, stopped_at: Some(i) };
        };
        let san = engine::to_san(&position, &mv);
        let is_capture = mv.is_capture();
        position.play_unchecked(&mv);
        steps.push(ReplayStep {
            fen: engine::to_fen(&position),
            record: MoveRecord { uci: uci.to_owned(), san, is_capture },
        });
    }
    Replay { position, steps, stopped_at: None }
}

/// Posição após os primeiros `plies` lances de `ucis`
pub fn replay_prefix<S: AsRef<str>>(root: &Chess, ucis: &[S], plies: usize) -> Chess {
    replay(root, &ucis[..plies.min(ucis.len())]).position
}
