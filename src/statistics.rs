// src/statistics.rs
// Contadores de uma sessão de treino, alimentados pelos eventos do puzzle

// Biblioteca padrão
use std::time::Instant;

// Bibliotecas externas
use chrono::Local;
use serde::{Deserialize, Serialize};

// Módulos internos
use crate::puzzle::{FeedbackKind, MoveFeedback, PuzzleEvent};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PuzzleStatistics {
    // Dados de tempo
    #[serde(skip)]
    start_time: Option<Instant>,
    pub started_at:   String,  // Data/hora local de início
    pub elapsed_secs: u64,

    // Contadores principais
    pub correct_moves: u64,
    pub mistakes:      u64,
    pub hints_used:    u64,
    pub solved:        bool,
}

impl PuzzleStatistics {
    pub fn new() -> Self {
        PuzzleStatistics {
            start_time: Some(Instant::now()),
            started_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ..Self::default()
        }
    }

    /// Atualiza os contadores a partir de um evento do puzzle
    pub fn record(&mut self, event: &PuzzleEvent) {
        match event {
            PuzzleEvent::Feedback(Some(MoveFeedback { kind: FeedbackKind::Correct, .. })) => self.correct_moves += 1,
            PuzzleEvent::IncorrectMove => self.mistakes += 1,
            PuzzleEvent::PuzzleSolved  => self.solved = true,
            _ => {}
        }
    }

    pub fn add_hint(&mut self) { self.hints_used += 1; }

    /// Lances tentados pelo usuário (certos e errados)
    pub fn attempts(&self) -> u64 { self.correct_moves + self.mistakes }

    pub fn get_elapsed_time(&self) -> u64 {
        let current = self.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0);
        self.elapsed_secs + current
    }

    /// Fração de lances corretos, entre 0 e 1
    pub fn accuracy(&self) -> f64 {
        if self.attempts() == 0 {
            0.0
        } else {
            self.correct_moves as f64 / self.attempts() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use shakmaty::Square;

    use super::*;

    #[test]
    fn counts_events() {
        let mut stats = PuzzleStatistics::new();
        let correct = MoveFeedback { kind: FeedbackKind::Correct, square: Square::E4 };
        let wrong = MoveFeedback { kind: FeedbackKind::Incorrect, square: Square::D4 };
        for ev in [
            PuzzleEvent::Feedback(Some(wrong)),
            PuzzleEvent::IncorrectMove,
            PuzzleEvent::Feedback(Some(correct)),
            PuzzleEvent::Feedback(None),
            PuzzleEvent::PuzzleSolved,
        ] {
            stats.record(&ev);
        }
        assert_eq!(stats.attempts(), 2);
        assert_eq!(stats.mistakes, 1);
        assert!(stats.solved);
        assert!((stats.accuracy() - 0.5).abs() < f64::EPSILON);
        assert!(!stats.started_at.is_empty());
    }

    #[test]
    fn serialises_without_instant() {
        let mut stats = PuzzleStatistics::new();
        stats.add_hint();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hints_used"], 1);
        assert!(json.get("start_time").is_none());
        assert_eq!(PuzzleStatistics::default().accuracy(), 0.0);
    }
}
