// src/recorder.rs
// ---------------------------------------------------------------------------
// Gravador de soluções: histórico linear com desfazer/refazer.
// Gravar um lance depois de voltar no histórico descarta o que vinha adiante.
// ---------------------------------------------------------------------------

use std::collections::VecDeque;

use log::{debug, trace, warn};
use shakmaty::{Chess, Square};

use crate::{
    audio::{SharedSound, Sound},
    engine::{self, Dests},
};

/// Passo do histórico; a raiz não tem lance
#[derive(Debug, Clone)]
pub struct LinearStep {
    pub fen:   String,
    pub uci:   Option<String>,
    pub san:   Option<String>,
    pub dests: Dests,
    position:  Chess,
}

impl LinearStep {
    fn root(position: Chess) -> Self {
        LinearStep {
            fen:   engine::to_fen(&position),
            uci:   None,
            san:   None,
            dests: engine::legal_destinations(&position),
            position,
        }
    }

    /// Passo seguinte a este; None se o lance não for jogável aqui
    fn advance(&self, uci: &str) -> Option<(LinearStep, bool)> {
        let mv = engine::parse_uci(&self.position, uci)?;
        let san = engine::to_san(&self.position, &mv);
        let position = engine::apply_move(&self.position, &mv);
        let step = LinearStep {
            fen:   engine::to_fen(&position),
            uci:   Some(uci.to_owned()),
            san:   Some(san),
            dests: engine::legal_destinations(&position),
            position,
        };
        Some((step, mv.is_capture()))
    }

    pub fn position(&self) -> &Chess { &self.position }
}

/// Notificações para a camada de visualização
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    SolutionChanged(Vec<String>),
    CurrentFenChanged(String),
}

pub struct SolutionRecorder {
    steps:      Vec<LinearStep>,  // steps[0] é a raiz
    current:    usize,
    root_valid: bool,
    events:     VecDeque<RecorderEvent>,
    sound:      SharedSound,
}

impl SolutionRecorder {
    pub fn new(fen: &str, sound: SharedSound) -> Self {
        let loaded = engine::load_position(fen);
        SolutionRecorder {
            steps:      vec![LinearStep::root(loaded.position)],
            current:    0,
            root_valid: loaded.valid,
            events:     VecDeque::new(),
            sound,
        }
    }

    /// Troca a posição raiz, descartando todo o histórico
    pub fn set_root(&mut self, fen: &str) {
        let loaded = engine::load_position(fen);
        if !loaded.valid { warn!("FEN raiz inválida no gravador: {fen}"); }
        self.root_valid = loaded.valid;
        self.steps = vec![LinearStep::root(loaded.position)];
        self.current = 0;
        self.emit_fen();
        self.events.push_back(RecorderEvent::SolutionChanged(Vec::new()));
    }

    /// Grava `uci` a partir do passo atual. Passos além do atual são descartados.
    pub fn record_move(&mut self, uci: &str) -> bool {
        let Some((step, capture)) = self.steps[self.current].advance(uci) else {
            trace!("lance rejeitado pelo gravador: {uci}");
            return false;
        };
        let dropped = self.steps.len() - (self.current + 1);
        if dropped > 0 { debug!("{dropped} passo(s) descartado(s) pela nova ramificação"); }

        self.steps.truncate(self.current + 1);
        self.steps.push(step);
        self.current = self.steps.len() - 1;
        self.sound.play(Sound::for_move(capture));
        self.events.push_back(RecorderEvent::SolutionChanged(self.solution()));
        self.emit_fen();
        true
    }

    /// Reposiciona sem alterar o histórico; fora dos limites não faz nada
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.steps.len() { return false; }
        if index != self.current {
            self.current = index;
            self.sound.play(Sound::Move);
            self.emit_fen();
        }
        true
    }

    pub fn previous(&mut self) {
        if self.current > 0 { self.go_to(self.current - 1); }
    }

    pub fn next(&mut self) { self.go_to(self.current + 1); }

    pub fn jump_to_end(&mut self) { self.go_to(self.steps.len() - 1); }

    /// Volta à raiz e anuncia a solução vazia
    pub fn reset(&mut self) {
        self.go_to(0);
        self.events.push_back(RecorderEvent::SolutionChanged(Vec::new()));
    }

    /// Reconstrói o histórico a partir de uma lista externa.
    /// Lista idêntica à gravada não faz nada; retorna se houve reconstrução.
    pub fn sync_from_external<S: AsRef<str>>(&mut self, ucis: &[S]) -> bool {
        let same = ucis.len() + 1 == self.steps.len()
            && ucis.iter().zip(&self.steps[1..]).all(|(u, s)| s.uci.as_deref() == Some(u.as_ref()));
        if same { return false; }

        self.steps.truncate(1);
        for (i, uci) in ucis.iter().enumerate() {
            let Some((step, _)) = self.steps[i].advance(uci.as_ref()) else {
                warn!("sincronização interrompida no lance #{i}: {}", uci.as_ref());
                break;
            };
            self.steps.push(step);
        }
        self.current = self.steps.len() - 1;
        debug!("histórico reconstruído com {} lance(s)", self.current);
        self.emit_fen();
        true
    }

    fn emit_fen(&mut self) {
        self.events.push_back(RecorderEvent::CurrentFenChanged(self.steps[self.current].fen.clone()));
    }

    /// Todos os lances gravados, em ordem
    pub fn solution(&self) -> Vec<String> {
        self.steps.iter().filter_map(|s| s.uci.clone()).collect()
    }

    pub fn steps(&self) -> &[LinearStep] { &self.steps }
    pub fn current(&self) -> &LinearStep { &self.steps[self.current] }
    pub fn current_index(&self) -> usize { self.current }
    pub fn fen(&self) -> &str { &self.current().fen }
    pub fn is_root_valid(&self) -> bool { self.root_valid }

    pub fn requires_promotion(&self, from: Square, to: Square) -> bool {
        engine::requires_promotion(&self.current().position, from, to)
    }

    pub fn drain_events(&mut self) -> Vec<RecorderEvent> { self.events.drain(..).collect() }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{audio::{self, RecordingSound}, config::STARTING_FEN};

    fn recorder(moves: &[&str]) -> SolutionRecorder {
        let mut r = SolutionRecorder::new(STARTING_FEN, audio::silent());
        for m in moves { assert!(r.record_move(m)); }
        r.drain_events();
        r
    }

    #[test]
    fn recording_after_going_back_truncates() {
        let mut r = recorder(&["e2e4", "e7e5", "g1f3", "b8c6"]);
        assert_eq!(r.current_index(), 4);
        assert!(r.go_to(2));
        assert!(r.record_move("f1c4"));
        assert_eq!(r.solution(), vec!["e2e4", "e7e5", "f1c4"]);
        assert_eq!(r.current_index(), 3);
        assert_eq!(r.steps().len(), 4);

        let events = r.drain_events();
        assert!(events.contains(&RecorderEvent::SolutionChanged(
            vec!["e2e4".into(), "e7e5".into(), "f1c4".into()]
        )));
    }

    #[test]
    fn illegal_record_is_rejected() {
        let mut r = recorder(&["e2e4"]);
        assert!(!r.record_move("e2e4"));
        assert!(!r.record_move("hello"));
        assert_eq!(r.solution(), vec!["e2e4"]);
        assert!(r.drain_events().is_empty());
    }

    #[test]
    fn navigation_keeps_history() {
        let mut r = recorder(&["e2e4", "e7e5"]);
        r.previous();
        r.previous();
        r.previous();
        assert_eq!(r.current_index(), 0);
        assert_eq!(r.fen(), STARTING_FEN);
        r.next();
        assert_eq!(r.current_index(), 1);
        assert!(!r.go_to(3));
        r.jump_to_end();
        assert_eq!(r.current_index(), 2);
        assert_eq!(r.solution().len(), 2);
        assert_eq!(r.current().san.as_deref(), Some("e5"));
        assert!(!r.current().dests.is_empty());
    }

    #[test]
    fn reset_emits_empty_solution() {
        let mut r = recorder(&["e2e4"]);
        r.reset();
        assert_eq!(r.current_index(), 0);
        assert_eq!(r.drain_events(), vec![
            RecorderEvent::CurrentFenChanged(STARTING_FEN.into()),
            RecorderEvent::SolutionChanged(Vec::new()),
        ]);
        // o histórico continua lá até o próximo lance
        assert_eq!(r.steps().len(), 2);
    }

    #[test]
    fn sync_is_noop_when_identical() {
        let mut r = recorder(&["e2e4", "e7e5"]);
        r.go_to(1);
        r.drain_events();
        assert!(!r.sync_from_external(&["e2e4", "e7e5"]));
        assert_eq!(r.current_index(), 1);
        assert!(r.drain_events().is_empty());
    }

    #[test]
    fn sync_rebuilds_and_stops_at_bad_move() {
        let mut r = recorder(&["e2e4"]);
        assert!(r.sync_from_external(&["d2d4", "d7d5", "d7d5", "c2c4"]));
        assert_eq!(r.solution(), vec!["d2d4", "d7d5"]);
        assert_eq!(r.current_index(), 2);

        assert!(r.sync_from_external::<&str>(&[]));
        assert_eq!(r.current_index(), 0);
    }

    #[test]
    fn set_root_discards_history() {
        let mut r = recorder(&["e2e4"]);
        r.set_root("not a fen");
        assert!(!r.is_root_valid());
        assert_eq!(r.fen(), STARTING_FEN);
        r.set_root("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert!(r.is_root_valid());
        assert!(r.requires_promotion(Square::A7, Square::A8));
        assert!(r.record_move("a7a8q"));
        assert_eq!(r.current().san.as_deref(), Some("a8=Q+"));
    }

    #[test]
    fn sounds_distinguish_captures() {
        let sound = Arc::new(RecordingSound::default());
        let mut r = SolutionRecorder::new(STARTING_FEN, sound.clone());
        for m in ["e2e4", "d7d5", "e4d5"] { r.record_move(m); }
        assert_eq!(sound.played(), vec![Sound::Move, Sound::Move, Sound::Capture]);
    }

    #[test]
    fn navigation_plays_move_sound() {
        let sound = Arc::new(RecordingSound::default());
        let mut r = SolutionRecorder::new(STARTING_FEN, sound.clone());
        r.record_move("e2e4");
        r.previous();
        r.previous();
        assert!(!r.go_to(5));
        r.jump_to_end();
        r.jump_to_end();
        assert_eq!(sound.played(), vec![Sound::Move, Sound::Move, Sound::Move]);
    }
}
