// src/session.rs
// ---------------------------------------------------------------------------
// Condutor assíncrono do PuzzleSolver: cada timer armado vira uma task
// tokio que dorme e depois dispara o token. Eventos seguem por canal mpsc.
// ---------------------------------------------------------------------------

use std::sync::Arc;

use log::trace;
use shakmaty::{Role, Square};
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
    time::sleep,
};

use crate::{
    engine::ReferenceLine,
    puzzle::{PuzzleEvent, PuzzleSolver, ScheduledTimer},
};

struct Inner {
    solver: PuzzleSolver,
    task:   Option<JoinHandle<()>>,  // Task do timer armado
}

struct Shared {
    inner:  Mutex<Inner>,
    events: mpsc::UnboundedSender<PuzzleEvent>,
}

/// Sessão de puzzle com relógio real
#[derive(Clone)]
pub struct PuzzleSession {
    shared: Arc<Shared>,
}

impl PuzzleSession {
    /// Inicia a sessão; deve rodar dentro de um runtime tokio.
    pub async fn start(solver: PuzzleSolver) -> (Self, mpsc::UnboundedReceiver<PuzzleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared { inner: Mutex::new(Inner { solver, task: None }), events: tx });
        {
            let mut inner = shared.inner.lock().await;
            pump(&shared, &mut inner);
        }
        (PuzzleSession { shared }, rx)
    }

    async fn with<R>(&self, f: impl FnOnce(&mut PuzzleSolver) -> R) -> R {
        let mut inner = self.shared.inner.lock().await;
        let out = f(&mut inner.solver);
        pump(&self.shared, &mut inner);
        out
    }

    /// Consulta o estado atual sem alterá-lo
    pub async fn snapshot<R>(&self, f: impl FnOnce(&PuzzleSolver) -> R) -> R {
        let inner = self.shared.inner.lock().await;
        f(&inner.solver)
    }

    pub async fn submit_move(&self, from: Square, to: Square) { self.with(|s| s.submit_move(from, to)).await }
    pub async fn submit_uci(&self, uci: &str) { self.with(|s| s.submit_uci(uci)).await }
    pub async fn resolve_promotion(&self, role: Role) { self.with(|s| s.resolve_promotion(role)).await }
    pub async fn go_to_start(&self) { self.with(PuzzleSolver::go_to_start).await }
    pub async fn previous(&self) { self.with(PuzzleSolver::previous).await }
    pub async fn next(&self) { self.with(PuzzleSolver::next).await }
    pub async fn go_to_end(&self) { self.with(PuzzleSolver::go_to_end).await }

    /// Troca de puzzle: aborta a task pendente antes de reinicializar
    pub async fn reset(&self, fen: &str, line: ReferenceLine, setup_move: bool) {
        let mut inner = self.shared.inner.lock().await;
        if let Some(task) = inner.task.take() { task.abort(); }
        inner.solver.reset(fen, line, setup_move);
        pump(&self.shared, &mut inner);
    }
}

/// Encaminha eventos e arma o timer novo, se houver
fn pump(shared: &Arc<Shared>, inner: &mut Inner) {
    for ev in inner.solver.drain_events() {
        if shared.events.send(ev).is_err() {
            trace!("receptor de eventos encerrado");
            break;
        }
    }
    if let Some(timer) = inner.solver.take_new_timer() {
        if let Some(old) = inner.task.take() { old.abort(); }
        inner.task = Some(arm(Arc::clone(shared), timer));
    }
}

fn arm(shared: Arc<Shared>, timer: ScheduledTimer) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(timer.delay).await;
        let mut inner = shared.inner.lock().await;
        inner.task = None;
        if inner.solver.fire(timer.token) {
            pump(&shared, &mut inner);
        }
    })
}
