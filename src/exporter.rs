// src/exporter.rs
// Exporta linhas de referência como PGN

// Biblioteca padrão
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

// Bibliotecas externas
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use log::{debug, info, trace};
use shakmaty::Color;

// Módulos internos
use crate::{config::STARTING_FEN, engine};

/// Abre o arquivo de saída; com `append` acrescenta ao final em vez de sobrescrever
pub fn open_output_file(path: &Path, append: bool) -> Result<File> {
    info!("abrindo arquivo de saída: {:?}, append={}", path, append);
    if append {
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .context("Falha ao abrir arquivo de saída para acrescentar dados")
    } else {
        File::create(path).context("Falha ao criar arquivo de saída")
    }
}

/// Monta o PGN da linha `ucis` jogada a partir de `root_fen`.
/// Lance UCI inválido é erro: a linha exportada precisa ser completa.
pub fn build_pgn<S: AsRef<str>>(headers: &IndexMap<String, String>, root_fen: &str, ucis: &[S]) -> Result<String> {
    let mut board = engine::parse_fen(root_fen)?;

    // Cabeçalhos PGN; SetUp/FEN apenas fora da posição inicial
    let mut hdr = headers.clone();
    let fen = engine::to_fen(&board);
    if fen != STARTING_FEN {
        hdr.insert("SetUp".into(), "1".into());
        hdr.insert("FEN".into(),   fen);
    }
    let result = hdr.get("Result").cloned().unwrap_or_else(|| "*".into());

    let mut pgn = String::new();
    for (k, v) in &hdr { pgn.push_str(&format!("[{} \"{}\"]\n", k, v)); }
    pgn.push('\n');

    // Numeração a partir do lance real da posição
    for (i, uci) in ucis.iter().enumerate() {
        let uci = uci.as_ref();
        let Some(mv) = engine::parse_uci(&board, uci) else {
            bail!("lance #{i} inválido na exportação: {uci}");
        };
        let number = engine::fullmove_number(&board);
        match engine::side_to_move(&board) {
            Color::White           => pgn.push_str(&format!("{number}. ")),
            Color::Black if i == 0 => pgn.push_str(&format!("{number}... ")),
            Color::Black           => {}
        }
        pgn.push_str(&engine::to_san(&board, &mv));
        pgn.push(' ');
        board = engine::apply_move(&board, &mv);
    }
    pgn.push_str(&result);

    trace!("PGN gerado: {}", pgn);
    Ok(pgn)
}

/// Escreve um puzzle no destino, seguido de linha em branco
pub fn export_puzzle(pgn: &str, output: &mut dyn Write) -> Result<()> {
    debug!("exportando puzzle com {} caracteres", pgn.len());

    let fen = pgn
        .lines()
        .find(|line| line.starts_with("[FEN"))
        .unwrap_or("(posição inicial)");
    trace!("FEN inicial - {}", fen);

    writeln!(output, "{}", pgn).context("Falha ao escrever puzzle no arquivo de saída")?;
    writeln!(output).context("Falha ao escrever quebra de linha no arquivo de saída")?;
    Ok(())
}
