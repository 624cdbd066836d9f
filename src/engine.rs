// src/engine.rs
// ---------------------------------------------------------------------------
// Adaptador de regras sobre o shakmaty: FEN, UCI, SAN, destinos legais.
// Nenhuma função aqui levanta erro para o chamador das máquinas de estado:
// FEN inválido vira posição inicial com flag, UCI inválido vira None.
// ---------------------------------------------------------------------------

use std::collections::{BTreeMap, BTreeSet, HashMap};

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use log::warn;
use shakmaty::{
    fen::Fen, san::SanPlus, uci::UciMove, CastlingMode, Chess, Color, EnPassantMode, File, Move,
    Position, Rank, Role, Square,
};

/// Destinos legais por casa de origem
pub type Dests = BTreeMap<Square, BTreeSet<Square>>;

/// Linha de referência: lances UCI indexados a partir de 0
pub type ReferenceLine = Vec<String>;

lazy_static! {
    /// Roques em UCI e sua codificação alternativa (rei captura torre)
    static ref CASTLING_ALIASES: HashMap<&'static str, &'static str> = [
        // brancas, lado do rei / da dama
        ("e1g1", "e1h1"), ("e1h1", "e1g1"),
        ("e1c1", "e1a1"), ("e1a1", "e1c1"),
        // pretas, lado do rei / da dama
        ("e8g8", "e8h8"), ("e8h8", "e8g8"),
        ("e8c8", "e8a8"), ("e8a8", "e8c8"),
    ]
    .into_iter()
    .collect();
}

/// Posição carregada de um FEN, com a flag de validade do FEN original
#[derive(Debug, Clone)]
pub struct LoadedPosition {
    pub position: Chess,
    pub valid:    bool,
}

/// Converte FEN em posição legal
pub fn parse_fen(fen: &str) -> Result<Chess> {
    let parsed: Fen = fen.trim().parse().with_context(|| format!("FEN ilegível: {fen}"))?;
    let pos: Chess = parsed
        .into_position(CastlingMode::Standard)
        .with_context(|| format!("posição ilegal: {fen}"))?;
    Ok(pos)
}

/// Carrega FEN; em caso de falha substitui pela posição inicial e marca `valid = false`
pub fn load_position(fen: &str) -> LoadedPosition {
    match parse_fen(fen) {
        Ok(position) => LoadedPosition { position, valid: true },
        Err(e) => {
            warn!("FEN inválido, usando posição inicial: {e:#}");
            LoadedPosition { position: Chess::default(), valid: false }
        }
    }
}

/// Serializa a posição em FEN
pub fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string()
}

/// Converte UCI em lance legal na posição; `None` se ilegível ou ilegal.
/// Roques são aceitos nas duas codificações.
pub fn parse_uci(pos: &Chess, uci: &str) -> Option<Move> {
    let direct = UciMove::from_ascii(uci.as_bytes()).ok().and_then(|u| u.to_move(pos).ok());
    direct.or_else(|| {
        let alt = CASTLING_ALIASES.get(uci)?;
        let m = UciMove::from_ascii(alt.as_bytes()).ok()?.to_move(pos).ok()?;
        matches!(m, Move::Castle { .. }).then_some(m)
    })
}

/// UCI canônico (roque como rei anda duas casas)
pub fn canonical_uci(mv: &Move) -> String {
    UciMove::from_move(mv, CastlingMode::Standard).to_string()
}

/// Aplica o lance sem alterar a posição original
pub fn apply_move(pos: &Chess, mv: &Move) -> Chess {
    let mut next = pos.clone();
    next.play_unchecked(mv);
    next
}

/// SAN com sufixo de xeque/mate
pub fn to_san(pos: &Chess, mv: &Move) -> String {
    let mut scratch = pos.clone();
    SanPlus::from_move_and_play_unchecked(&mut scratch, mv).to_string()
}

/// Interpreta SAN (aceita sufixos `+`/`#`) na posição dada
pub fn parse_san(pos: &Chess, san: &str) -> Option<Move> {
    let parsed = SanPlus::from_ascii(san.as_bytes()).ok()?;
    parsed.san.to_move(pos).ok()
}

pub fn is_check(pos: &Chess) -> bool { pos.is_check() }

pub fn side_to_move(pos: &Chess) -> Color { pos.turn() }

pub fn fullmove_number(pos: &Chess) -> u32 { pos.fullmoves().get() }

/// Índice de meio-lance absoluto da posição (0 = brancas no lance 1).
/// Satura em `u32::MAX` para números de lance enormes.
pub fn ply_of(pos: &Chess) -> u32 {
    fullmove_number(pos)
        .saturating_sub(1)
        .saturating_mul(2)
        .saturating_add(u32::from(pos.turn() == Color::Black))
}

/// Destinos legais agrupados por origem.
/// Roque aparece como rei anda duas casas e como rei sobre a torre.
pub fn legal_destinations(pos: &Chess) -> Dests {
    let mut dests = Dests::new();
    for m in &pos.legal_moves() {
        let Some(from) = m.from() else { continue };
        let entry = dests.entry(from).or_default();
        match *m {
            Move::Castle { king, rook } => {
                let file = if rook.file() > king.file() { File::G } else { File::C };
                entry.insert(Square::from_coords(file, king.rank()));
                entry.insert(rook);
            }
            _ => { entry.insert(m.to()); }
        }
    }
    dests
}

/// Igualdade de UCI módulo a tabela de roques alternativos
pub fn same_move(submitted: &str, expected: &str) -> bool {
    submitted == expected || CASTLING_ALIASES.get(submitted).is_some_and(|alt| *alt == expected)
}

/// Casas de origem e destino de um UCI (promoção ignorada)
pub fn uci_squares(uci: &str) -> Option<(Square, Square)> {
    let from = Square::from_ascii(uci.get(0..2)?.as_bytes()).ok()?;
    let to   = Square::from_ascii(uci.get(2..4)?.as_bytes()).ok()?;
    Some((from, to))
}

/// Heurística de captura: destino ocupado, ou peão mudando de coluna (en passant)
pub fn is_capture_hint(pos: &Chess, uci: &str) -> bool {
    let Some((from, to)) = uci_squares(uci) else { return false };
    let board = pos.board();
    if board.piece_at(to).is_some() { return true; }
    board.piece_at(from).is_some_and(|p| p.role == Role::Pawn && from.file() != to.file())
}

/// Última fileira do lado indicado
fn last_rank(color: Color) -> Rank {
    match color {
        Color::White => Rank::Eighth,
        Color::Black => Rank::First,
    }
}

/// Verdadeiro se o peão do lado a jogar chega à última fileira
pub fn requires_promotion(pos: &Chess, from: Square, to: Square) -> bool {
    pos.board().piece_at(from).is_some_and(|p| {
        p.role == Role::Pawn && p.color == pos.turn() && to.rank() == last_rank(p.color)
    })
}

/// UCI de promoção com cinco caracteres (cavalo → `n`)
pub fn promotion_uci(from: Square, to: Square, role: Role) -> String {
    format!("{from}{to}{}", role.char())
}

/// Linha de referência a partir de texto UCI separado por espaços
pub fn parse_line(text: &str) -> ReferenceLine {
    text.split_whitespace().map(str::to_owned).collect()
}

/// Lado do tabuleiro do resolvedor; com lance de preparação é o lado que não joga na raiz
pub fn orientation_for(root: &Chess, setup_move: bool) -> Color {
    let turn = root.turn();
    if setup_move { turn.other() } else { turn }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STARTING_FEN;

    const CASTLE_FEN: &str = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";

    #[test]
    fn invalid_fen_falls_back_to_start() {
        let loaded = load_position("not a fen");
        assert!(!loaded.valid);
        assert_eq!(to_fen(&loaded.position), STARTING_FEN);

        let ok = load_position(STARTING_FEN);
        assert!(ok.valid);
    }

    #[test]
    fn start_position_destinations() {
        let pos = Chess::default();
        let dests = legal_destinations(&pos);
        assert_eq!(dests.len(), 10);
        assert_eq!(dests.values().map(BTreeSet::len).sum::<usize>(), 20);
        let e2 = &dests[&Square::E2];
        assert!(e2.contains(&Square::E3) && e2.contains(&Square::E4));
    }

    #[test]
    fn castling_listed_both_ways() {
        let pos = parse_fen(CASTLE_FEN).unwrap();
        let king = &legal_destinations(&pos)[&Square::E1];
        for sq in [Square::G1, Square::H1, Square::C1, Square::A1] {
            assert!(king.contains(&sq), "faltou {sq}");
        }
    }

    #[test]
    fn castling_alias_parses_and_matches() {
        let pos = parse_fen(CASTLE_FEN).unwrap();
        let a = parse_uci(&pos, "e1g1").unwrap();
        let b = parse_uci(&pos, "e1h1").unwrap();
        assert_eq!(a, b);
        assert_eq!(canonical_uci(&b), "e1g1");
        assert!(same_move("e1h1", "e1g1"));
        assert!(same_move("e8c8", "e8a8"));
        assert!(!same_move("e1g1", "e1c1"));
    }

    #[test]
    fn illegal_or_garbage_uci_is_none() {
        let pos = Chess::default();
        assert!(parse_uci(&pos, "e2e5").is_none());
        assert!(parse_uci(&pos, "zz").is_none());
        assert!(parse_uci(&pos, "e2e4").is_some());
    }

    #[test]
    fn san_and_fen_round_trip() {
        let pos = Chess::default();
        let mv = parse_uci(&pos, "g1f3").unwrap();
        assert_eq!(to_san(&pos, &mv), "Nf3");
        let next = apply_move(&pos, &mv);
        assert_eq!(to_fen(&next), "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1");
        // a posição original não muda
        assert_eq!(to_fen(&pos), STARTING_FEN);
        assert_eq!(parse_san(&next, "e5"), parse_uci(&next, "e7e5"));
    }

    #[test]
    fn capture_heuristic_covers_en_passant() {
        let pos = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        assert!(is_capture_hint(&pos, "e5d6"));
        assert!(!is_capture_hint(&pos, "e5e6"));
        let pos = parse_fen("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1").unwrap();
        assert!(is_capture_hint(&pos, "e1d2"));
    }

    #[test]
    fn promotion_detection_and_uci() {
        let pos = parse_fen("8/P6k/8/8/8/8/7K/8 w - - 0 1").unwrap();
        assert!(requires_promotion(&pos, Square::A7, Square::A8));
        assert!(!requires_promotion(&pos, Square::H2, Square::H3));
        assert_eq!(promotion_uci(Square::A7, Square::A8, Role::Knight), "a7a8n");
        assert!(parse_uci(&pos, "a7a8n").is_some());
    }

    #[test]
    fn orientation_and_ply() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
        let pos = parse_fen(fen).unwrap();
        assert_eq!(orientation_for(&pos, false), Color::Black);
        assert_eq!(orientation_for(&pos, true), Color::White);
        assert_eq!(ply_of(&pos), 1);

        let huge = parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 3000000000").unwrap();
        assert_eq!(ply_of(&huge), u32::MAX);
        assert_eq!(parse_line(" e2e4  e7e5\ng1f3 "), vec!["e2e4", "e7e5", "g1f3"]);
    }
}
