// src/lib.rs
// ---------------------------------------------------------------------------
// Núcleo do treino de puzzles: resolução guiada, análise livre,
// gravação de soluções e lances citados em comentários.
// ---------------------------------------------------------------------------

pub mod analysis;
pub mod audio;
pub mod comment;
pub mod config;
pub mod engine;
pub mod exporter;
pub mod puzzle;
pub mod recorder;
pub mod replay;
pub mod session;
pub mod statistics;
pub mod visual;
