// src/puzzle.rs
// ---------------------------------------------------------------------------
// Máquina de estados de uma tentativa guiada de puzzle contra uma linha fixa.
//
//  AwaitingUserMove ──(peão na última fileira)──▶ AwaitingPromotionChoice
//        │ certo                                        │ resolve_promotion
//        ▼                                              ▼
//  AwaitingOpponentReply ──timer──▶ AwaitingUserMove | Reviewing
//        │ errado
//        ▼
//  ShowingIncorrectFeedback ──timer──▶ Reverting ──timer──▶ AwaitingUserMove
//
// Os atrasos são valores explícitos (ScheduledTimer); quem conduz o relógio
// chama `fire(token)`. Só o timer armado mais recente é aceito.
// ---------------------------------------------------------------------------

use std::{collections::VecDeque, time::Duration};

use log::{debug, info, trace, warn};
use shakmaty::{Chess, Color, Position, Role, Square};

use crate::{
    audio::{SharedSound, Sound},
    config::Timings,
    engine::{self, Dests, ReferenceLine},
    replay,
};

/// Estado da tentativa.
///
/// Não há estado de feedback de acerto: a marca de acerto é o `feedback`
/// sobreposto, que dura até a resposta do oponente ou até o timer
/// `ClearFeedback` depois do último lance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleState {
    AwaitingUserMove,
    AwaitingPromotionChoice { from: Square, to: Square },
    AwaitingOpponentReply,
    ShowingIncorrectFeedback,
    Reverting,
    Reviewing,
}

impl PuzzleState {
    /// Estados intermediários temporizados (entrada do tabuleiro recusada)
    pub fn is_timed(&self) -> bool {
        matches!(
            self,
            PuzzleState::AwaitingOpponentReply | PuzzleState::ShowingIncorrectFeedback | PuzzleState::Reverting
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind { Correct, Incorrect }

/// Marca de acerto/erro sobre a casa de destino
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveFeedback {
    pub kind:   FeedbackKind,
    pub square: Square,
}

/// Notificações para a camada de apresentação
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleEvent {
    PositionChanged { fen: String, last_move: Option<String> },
    Feedback(Option<MoveFeedback>),
    PuzzleSolved,
    IncorrectMove,
}

/// Identifica um timer armado; tokens antigos são ignorados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    OpponentReply,  // Joga o próximo lance da linha
    ClearFeedback,  // Remove a marca de acerto após o último lance
    BeginRevert,    // Fim da exibição do erro
    FinishRevert,   // Restaura a posição anterior à tentativa
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub token:  TimerToken,
    pub delay:  Duration,
    pub action: TimerAction,
}

/// Motor de resolução de um puzzle
pub struct PuzzleSolver {
    root:          Chess,                 // Posição do FEN raiz
    root_valid:    bool,                  // FEN raiz era válido
    line:          ReferenceLine,         // Linha de referência
    setup_move:    bool,                  // Lance 0 pertence ao oponente
    orientation:   Color,                 // Lado do resolvedor
    position:      Chess,                 // Posição exibida
    last_move:     Option<String>,
    current_index: usize,                 // Próximo lance esperado da linha
    review_cursor: usize,                 // Lances aplicados na revisão
    state:         PuzzleState,
    feedback:      Option<MoveFeedback>,
    timer:         Option<ScheduledTimer>,
    unclaimed:     bool,                  // Timer armado ainda não entregue ao condutor
    generation:    u64,
    events:        VecDeque<PuzzleEvent>,
    timings:       Timings,
    sound:         SharedSound,
}

impl PuzzleSolver {
    /// Cria a tentativa; com lance de preparação começa em `AwaitingOpponentReply`.
    pub fn new(fen: &str, line: ReferenceLine, setup_move: bool, timings: Timings, sound: SharedSound) -> Self {
        let loaded = engine::load_position(fen);
        let mut solver = PuzzleSolver {
            orientation:   engine::orientation_for(&loaded.position, setup_move),
            position:      loaded.position.clone(),
            root:          loaded.position,
            root_valid:    loaded.valid,
            line,
            setup_move,
            last_move:     None,
            current_index: 0,
            review_cursor: 0,
            state:         PuzzleState::AwaitingUserMove,
            feedback:      None,
            timer:         None,
            unclaimed:     false,
            generation:    0,
            events:        VecDeque::new(),
            timings,
            sound,
        };
        solver.start();
        solver
    }


    /// Reinicia com novos parâmetros; qualquer timer pendente é cancelado.
    pub fn reset(&mut self, fen: &str, line: ReferenceLine, setup_move: bool) {
        self.disarm();
        let loaded = engine::load_position(fen);
        self.orientation = engine::orientation_for(&loaded.position, setup_move);
        self.root = loaded.position;
        self.root_valid = loaded.valid;
        self.line = line;
        self.setup_move = setup_move;
        info!("puzzle reiniciado: {} lances, preparação={}", self.line.len(), setup_move);
        self.start();
    }

    fn start(&mut self) {
        self.position = self.root.clone();
        self.last_move = None;
        self.current_index = 0;
        self.review_cursor = 0;
        self.set_feedback(None);
        self.state = PuzzleState::AwaitingUserMove;
        self.emit_position();
        if self.setup_move && !self.line.is_empty() {
            self.state = PuzzleState::AwaitingOpponentReply;
            self.arm(TimerAction::OpponentReply, self.timings.opponent_reply());
        }
    }

    // -----------------------------------------------------------------------
    // Entrada do usuário
    // -----------------------------------------------------------------------

    /// Lance de origem para destino. Ignorado fora de `AwaitingUserMove`;
    /// peão na última fileira suspende em `AwaitingPromotionChoice`.
    pub fn submit_move(&mut self, from: Square, to: Square) {
        if self.state != PuzzleState::AwaitingUserMove {
            trace!("lance {from}{to} ignorado em {:?}", self.state);
            return;
        }
        if engine::requires_promotion(&self.position, from, to) {
            debug!("aguardando escolha de promoção {from}{to}");
            self.state = PuzzleState::AwaitingPromotionChoice { from, to };
            return;
        }
        self.resolve(format!("{from}{to}"));
    }

    /// Lance em UCI completo (com ou sem sufixo de promoção)
    pub fn submit_uci(&mut self, uci: &str) {
        if self.state != PuzzleState::AwaitingUserMove {
            trace!("lance {uci} ignorado em {:?}", self.state);
            return;
        }
        match engine::uci_squares(uci) {
            Some((from, to)) if uci.len() == 4 => self.submit_move(from, to),
            _ => self.resolve(uci.to_owned()),
        }
    }

    /// Conclui a promoção pendente com a peça escolhida
    pub fn resolve_promotion(&mut self, role: Role) {
        let PuzzleState::AwaitingPromotionChoice { from, to } = self.state else {
            trace!("promoção ignorada em {:?}", self.state);
            return;
        };
        if matches!(role, Role::Pawn | Role::King) {
            warn!("peça de promoção inválida: {role:?}");
            return;
        }
        self.state = PuzzleState::AwaitingUserMove;
        self.resolve(engine::promotion_uci(from, to, role));
    }

    /// Compara o lance com a linha e aplica a transição correspondente
    fn resolve(&mut self, uci: String) {
        // Paridade: o resolvedor joga índices pares, ou ímpares com lance de preparação
        if self.current_index % 2 != usize::from(self.setup_move) {
            trace!("lance {uci} fora da vez do resolvedor (índice {})", self.current_index);
            return;
        }

        let Some(mv) = engine::parse_uci(&self.position, &uci) else {
            debug!("lance ilegal rejeitado: {uci}");
            self.sound.play(Sound::Failure);
            self.events.push_back(PuzzleEvent::IncorrectMove);
            return;
        };

        let correct = self.line.get(self.current_index).is_some_and(|e| engine::same_move(&uci, e));
        let capture = engine::is_capture_hint(&self.position, &uci);
        let square  = engine::uci_squares(&uci).map_or(mv.to(), |(_, to)| to);

        // O lance é aplicado nos dois casos (o erro fica visível até a reversão)
        self.position.play_unchecked(&mv);
        self.last_move = Some(uci.clone());
        self.emit_position();

        if correct {
            debug!("lance correto #{}: {uci}", self.current_index);
            self.set_feedback(Some(MoveFeedback { kind: FeedbackKind::Correct, square }));
            self.sound.play(Sound::for_move(capture));
            self.current_index += 1;
            if self.current_index < self.line.len() {
                self.state = PuzzleState::AwaitingOpponentReply;
                self.arm(TimerAction::OpponentReply, self.timings.opponent_reply());
            } else {
                self.finish();
                self.arm(TimerAction::ClearFeedback, self.timings.correct_feedback());
            }
        } else {
            debug!("lance incorreto #{}: {uci} (esperado {:?})", self.current_index, self.line.get(self.current_index));
            self.set_feedback(Some(MoveFeedback { kind: FeedbackKind::Incorrect, square }));
            self.sound.play(Sound::Failure);
            self.events.push_back(PuzzleEvent::IncorrectMove);
            self.state = PuzzleState::ShowingIncorrectFeedback;
            self.arm(TimerAction::BeginRevert, self.timings.incorrect_feedback());
        }
    }

    fn finish(&mut self) {
        info!("puzzle resolvido ({} lances)", self.line.len());
        self.state = PuzzleState::Reviewing;
        self.review_cursor = self.line.len();
        self.events.push_back(PuzzleEvent::PuzzleSolved);
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    fn arm(&mut self, action: TimerAction, delay: Duration) {
        self.generation += 1;
        let timer = ScheduledTimer { token: TimerToken(self.generation), delay, action };
        trace!("timer armado: {timer:?}");
        self.timer = Some(timer);
        self.unclaimed = true;
    }

    fn disarm(&mut self) {
        if let Some(t) = self.timer.take() { trace!("timer cancelado: {t:?}"); }
        self.unclaimed = false;
        self.generation += 1;
    }

    /// Timer armado, se houver
    pub fn pending_timer(&self) -> Option<ScheduledTimer> { self.timer }

    /// Entrega o timer recém-armado uma única vez ao condutor do relógio
    pub fn take_new_timer(&mut self) -> Option<ScheduledTimer> {
        if !self.unclaimed { return None; }
        self.unclaimed = false;
        self.timer
    }

    /// Dispara o timer identificado por `token`; devolve `false` se obsoleto.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        let Some(timer) = self.timer.filter(|t| t.token == token) else {
            trace!("timer obsoleto ignorado: {token:?}");
            return false;
        };
        self.timer = None;
        self.unclaimed = false;
        match timer.action {
            TimerAction::OpponentReply => self.play_opponent_reply(),
            TimerAction::ClearFeedback => self.set_feedback(None),
            TimerAction::BeginRevert => {
                self.set_feedback(None);
                self.state = PuzzleState::Reverting;
                self.arm(TimerAction::FinishRevert, self.timings.revert());
            }
            TimerAction::FinishRevert => self.revert(),
        }
        true
    }

    /// Dispara o timer armado, qualquer que seja
    pub fn fire_pending(&mut self) -> bool {
        match self.timer {
            Some(t) => self.fire(t.token),
            None    => false,
        }
    }

    fn play_opponent_reply(&mut self) {
        self.set_feedback(None);
        let Some(uci) = self.line.get(self.current_index).cloned() else {
            self.finish();
            return;
        };
        let Some(mv) = engine::parse_uci(&self.position, &uci) else {
            warn!("lance #{} da linha de referência é inválido: {uci}", self.current_index);
            self.state = PuzzleState::Reviewing;
            self.review_cursor = self.current_index;
            return;
        };
        let capture = engine::is_capture_hint(&self.position, &uci);
        self.position.play_unchecked(&mv);
        self.last_move = Some(uci);
        self.emit_position();
        self.sound.play(Sound::for_move(capture));
        self.current_index += 1;

        if self.current_index >= self.line.len() {
            self.finish();
        } else {
            self.state = PuzzleState::AwaitingUserMove;
        }
    }

    /// Volta à posição anterior à tentativa, reproduzindo a linha desde a raiz
    fn revert(&mut self) {
        self.position = replay::replay_prefix(&self.root, &self.line, self.current_index);
        self.last_move = self.current_index.checked_sub(1).and_then(|i| self.line.get(i).cloned());
        self.state = PuzzleState::AwaitingUserMove;
        self.emit_position();
    }

    // -----------------------------------------------------------------------
    // Revisão (após resolver)
    // -----------------------------------------------------------------------

    pub fn go_to_start(&mut self) { self.review_to(0); }
    pub fn previous(&mut self) { self.review_to(self.review_cursor.saturating_sub(1)); }
    pub fn next(&mut self) { self.review_to(self.review_cursor + 1); }
    pub fn go_to_end(&mut self) { self.review_to(self.line.len()); }

    fn review_to(&mut self, cursor: usize) {
        if self.state != PuzzleState::Reviewing { return; }
        let cursor = cursor.min(self.line.len());
        if cursor == self.review_cursor { return; }
        self.review_cursor = cursor;
        let r = replay::replay(&self.root, &self.line[..cursor]);
        self.position = r.position;
        self.last_move = r.steps.last().map(|s| s.record.uci.clone());
        self.emit_position();
    }

    // -----------------------------------------------------------------------
    // Consultas
    // -----------------------------------------------------------------------

    pub fn state(&self) -> PuzzleState { self.state }
    pub fn fen(&self) -> String { engine::to_fen(&self.position) }
    pub fn position(&self) -> &Chess { &self.position }
    pub fn line(&self) -> &[String] { &self.line }
    pub fn current_index(&self) -> usize { self.current_index }
    pub fn review_cursor(&self) -> usize { self.review_cursor }
    pub fn orientation(&self) -> Color { self.orientation }
    pub fn set_orientation(&mut self, color: Color) { self.orientation = color; }
    pub fn feedback(&self) -> Option<MoveFeedback> { self.feedback }
    pub fn last_move(&self) -> Option<&str> { self.last_move.as_deref() }
    pub fn is_check(&self) -> bool { engine::is_check(&self.position) }
    pub fn is_root_valid(&self) -> bool { self.root_valid }
    pub fn is_solved(&self) -> bool { self.state == PuzzleState::Reviewing }

    /// Destinos legais; vazio quando a entrada do tabuleiro está suspensa
    pub fn legal_destinations(&self) -> Dests {
        if self.state == PuzzleState::AwaitingUserMove {
            engine::legal_destinations(&self.position)
        } else {
            Dests::new()
        }
    }

    /// Origem e destino do lance esperado (dica)
    pub fn hint(&self) -> Option<(Square, Square)> {
        if self.state != PuzzleState::AwaitingUserMove { return None; }
        self.line.get(self.current_index).and_then(|uci| engine::uci_squares(uci))
    }

    /// Remove e devolve as notificações acumuladas
    pub fn drain_events(&mut self) -> Vec<PuzzleEvent> { self.events.drain(..).collect() }

    fn set_feedback(&mut self, feedback: Option<MoveFeedback>) {
        if self.feedback == feedback { return; }
        self.feedback = feedback;
        self.events.push_back(PuzzleEvent::Feedback(feedback));
    }

    fn emit_position(&mut self) {
        let fen = self.fen();
        self.events.push_back(PuzzleEvent::PositionChanged { fen, last_move: self.last_move.clone() });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{audio::{self, RecordingSound}, config::STARTING_FEN, engine::parse_line};

    const CASTLE_FEN: &str = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    const PROMO_FEN: &str = "8/P6k/8/8/8/8/7K/8 w - - 0 1";

    fn solver(fen: &str, line: &str, setup_move: bool) -> PuzzleSolver {
        PuzzleSolver::new(fen, parse_line(line), setup_move, Timings::default(), audio::silent())
    }

    fn fen_after(moves: &str) -> String {
        replay::replay(&Chess::default(), &parse_line(moves)).fen()
    }

    #[test]
    fn correct_move_then_opponent_reply() {
        let mut p = solver(STARTING_FEN, "e2e4 e7e5 g1f3", false);
        assert_eq!(p.state(), PuzzleState::AwaitingUserMove);

        p.submit_move(Square::E2, Square::E4);
        assert_eq!(p.state(), PuzzleState::AwaitingOpponentReply);
        assert_eq!(p.current_index(), 1);
        assert_eq!(p.feedback(), Some(MoveFeedback { kind: FeedbackKind::Correct, square: Square::E4 }));
        let timer = p.pending_timer().unwrap();
        assert_eq!(timer.action, TimerAction::OpponentReply);
        assert_eq!(timer.delay, Duration::from_millis(crate::config::OPPONENT_REPLY_DELAY_MS));

        assert!(p.fire(timer.token));
        assert_eq!(p.state(), PuzzleState::AwaitingUserMove);
        assert_eq!(p.current_index(), 2);
        assert_eq!(p.feedback(), None);
        assert_eq!(p.fen(), fen_after("e2e4 e7e5"));
        assert_eq!(p.last_move(), Some("e7e5"));
    }

    #[test]
    fn wrong_move_reverts_to_pre_attempt_position() {
        let mut p = solver(STARTING_FEN, "e2e4 e7e5 g1f3", false);
        p.submit_move(Square::E2, Square::E4);
        p.fire_pending();
        let before = p.fen();
        p.drain_events();

        p.submit_uci("d2d4");
        assert_eq!(p.state(), PuzzleState::ShowingIncorrectFeedback);
        assert_ne!(p.fen(), before);
        assert_eq!(p.feedback().map(|f| f.kind), Some(FeedbackKind::Incorrect));
        let events = p.drain_events();
        assert_eq!(events.iter().filter(|e| **e == PuzzleEvent::IncorrectMove).count(), 1);

        p.fire_pending();
        assert_eq!(p.state(), PuzzleState::Reverting);
        assert_eq!(p.feedback(), None);
        p.fire_pending();
        assert_eq!(p.state(), PuzzleState::AwaitingUserMove);
        assert_eq!(p.fen(), before);
        assert_eq!(p.current_index(), 2);
        assert_eq!(p.last_move(), Some("e7e5"));
    }

    #[test]
    fn input_refused_in_timed_states() {
        let mut p = solver(STARTING_FEN, "e2e4 e7e5 g1f3", false);
        p.submit_uci("e2e4");
        let fen = p.fen();
        p.submit_uci("d2d4");
        p.submit_move(Square::G1, Square::F3);
        assert_eq!(p.fen(), fen);
        assert_eq!(p.current_index(), 1);
        assert!(p.state().is_timed());
        assert!(p.legal_destinations().is_empty());
    }

    #[test]
    fn solving_and_reviewing() {
        let mut p = solver(STARTING_FEN, "e2e4 e7e5 g1f3", false);
        p.submit_uci("e2e4");
        p.fire_pending();
        p.drain_events();
        p.submit_uci("g1f3");
        assert_eq!(p.state(), PuzzleState::Reviewing);
        assert!(p.drain_events().contains(&PuzzleEvent::PuzzleSolved));
        assert_eq!(p.pending_timer().map(|t| t.action), Some(TimerAction::ClearFeedback));
        p.fire_pending();
        assert_eq!(p.feedback(), None);

        // entrada do tabuleiro desabilitada
        p.submit_uci("b8c6");
        assert_eq!(p.fen(), fen_after("e2e4 e7e5 g1f3"));

        p.go_to_start();
        assert_eq!(p.fen(), STARTING_FEN);
        assert_eq!(p.review_cursor(), 0);
        p.previous();
        assert_eq!(p.review_cursor(), 0);
        p.next();
        assert_eq!(p.fen(), fen_after("e2e4"));
        p.go_to_end();
        p.next();
        assert_eq!(p.review_cursor(), 3);
        p.previous();
        assert_eq!(p.fen(), fen_after("e2e4 e7e5"));
        assert_eq!(p.current_index(), 3);
    }

    #[test]
    fn castling_accepted_in_both_encodings() {
        let mut p = solver(CASTLE_FEN, "e1g1", false);
        p.submit_move(Square::E1, Square::H1);
        assert!(p.is_solved());

        let mut p = solver(CASTLE_FEN, "e1h1", false);
        p.submit_move(Square::E1, Square::G1);
        assert!(p.is_solved());

        let mut p = solver(CASTLE_FEN, "e1c1", false);
        p.submit_move(Square::E1, Square::G1);
        assert_eq!(p.state(), PuzzleState::ShowingIncorrectFeedback);
    }

    #[test]
    fn setup_move_is_played_by_the_opponent() {
        let mut p = solver(STARTING_FEN, "e2e4 e7e5", true);
        assert_eq!(p.state(), PuzzleState::AwaitingOpponentReply);
        assert_eq!(p.orientation(), Color::Black);
        p.submit_uci("e2e4");
        assert_eq!(p.current_index(), 0);

        p.fire_pending();
        assert_eq!(p.state(), PuzzleState::AwaitingUserMove);
        assert_eq!(p.current_index(), 1);
        assert_eq!(p.hint(), Some((Square::E7, Square::E5)));
        p.submit_uci("e7e5");
        assert!(p.is_solved());
    }

    #[test]
    fn promotion_waits_for_choice() {
        let mut p = solver(PROMO_FEN, "a7a8n", false);
        p.submit_move(Square::A7, Square::A8);
        assert_eq!(p.state(), PuzzleState::AwaitingPromotionChoice { from: Square::A7, to: Square::A8 });
        assert!(p.pending_timer().is_none());
        p.submit_move(Square::H2, Square::H3);
        assert_eq!(p.fen(), PROMO_FEN);

        p.resolve_promotion(Role::Queen);
        assert_eq!(p.state(), PuzzleState::ShowingIncorrectFeedback);
        p.fire_pending();
        p.fire_pending();
        assert_eq!(p.fen(), PROMO_FEN);

        p.submit_move(Square::A7, Square::A8);
        p.resolve_promotion(Role::Knight);
        assert!(p.is_solved());
        assert_eq!(p.last_move(), Some("a7a8n"));
    }

    #[test]
    fn reset_invalidates_pending_timer() {
        let mut p = solver(STARTING_FEN, "e2e4 e7e5 g1f3", false);
        p.submit_uci("e2e4");
        let stale = p.pending_timer().unwrap().token;

        p.reset(CASTLE_FEN, parse_line("e1g1"), false);
        assert!(p.pending_timer().is_none());
        assert!(!p.fire(stale));
        assert_eq!(p.state(), PuzzleState::AwaitingUserMove);
        assert_eq!(p.current_index(), 0);
        assert_eq!(p.fen(), CASTLE_FEN);
    }

    #[test]
    fn move_resolution_refused_on_opponent_index() {
        // índice 0 pertence ao oponente quando há lance de preparação
        let mut p = solver(STARTING_FEN, "e2e4 e7e5", true);
        p.drain_events();
        p.resolve("e2e4".to_owned());
        assert_eq!(p.current_index(), 0);
        assert_eq!(p.fen(), STARTING_FEN);
        assert!(p.drain_events().is_empty());

        // sem preparação, índice ímpar é do oponente
        let mut p = solver(STARTING_FEN, "e2e4 e7e5 g1f3", false);
        p.submit_uci("e2e4");
        let fen = p.fen();
        p.resolve("e7e5".to_owned());
        assert_eq!(p.current_index(), 1);
        assert_eq!(p.fen(), fen);
    }

    #[test]
    fn new_timer_is_handed_out_once() {
        let mut p = solver(STARTING_FEN, "e2e4 e7e5 g1f3", false);
        assert!(p.take_new_timer().is_none());
        p.submit_uci("e2e4");
        assert!(p.take_new_timer().is_some());
        assert!(p.take_new_timer().is_none());
        assert!(p.pending_timer().is_some());
    }

    #[test]
    fn illegal_move_only_notifies() {
        let sound = Arc::new(RecordingSound::default());
        let mut p = PuzzleSolver::new(STARTING_FEN, parse_line("e2e4 e7e5"), false, Timings::default(), sound.clone());
        p.drain_events();
        p.submit_uci("e2e5");
        assert_eq!(p.state(), PuzzleState::AwaitingUserMove);
        assert_eq!(p.drain_events(), vec![PuzzleEvent::IncorrectMove]);
        assert_eq!(sound.played(), vec![Sound::Failure]);

        p.submit_uci("e2e4");
        assert_eq!(sound.played(), vec![Sound::Failure, Sound::Move]);
    }

    #[test]
    fn invalid_root_fen_uses_start_position() {
        let p = solver("garbage", "e2e4", false);
        assert!(!p.is_root_valid());
        assert_eq!(p.fen(), STARTING_FEN);
        assert_eq!(p.legal_destinations().len(), 10);
    }
}
