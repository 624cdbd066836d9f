// src/comment.rs
// ---------------------------------------------------------------------------
// Resolução de referências a lances em comentários ("12.Nf3", "3...e5").
// Cada token resolvido carrega a sequência UCI desde a raiz até o lance.
// ---------------------------------------------------------------------------

use lazy_static::lazy_static;
use log::{debug, trace, warn};
use regex::Regex;
use serde::Serialize;
use shakmaty::{Chess, Color};

use crate::engine::{self, ReferenceLine};

lazy_static! {
    static ref MOVE_NUMBER: Regex = Regex::new(r"^(\d+)(\.+)(.*)$").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref TRAILING_PUNCT: Regex = Regex::new(r"[?!.,;)]+$").unwrap();
    static ref LEADING_PAREN: Regex = Regex::new(r"^\(").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind { Text, Move }

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentToken {
    pub kind:    TokenKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uci:     Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_uci_sequence: Option<Vec<String>>,
}

impl CommentToken {
    fn text(content: &str) -> Self {
        CommentToken { kind: TokenKind::Text, content: content.to_owned(), uci: None, resolved_uci_sequence: None }
    }
}

/// Referência extraída de uma palavra do comentário
#[derive(Debug, Clone, PartialEq, Eq)]
struct MoveReference {
    fullmove: u32,
    side:     Color,
    san:      String,
}

fn parse_reference(word: &str) -> Option<MoveReference> {
    let caps = MOVE_NUMBER.captures(word)?;
    let fullmove = caps[1].parse().ok()?;
    let side = if caps[2].len() > 1 { Color::Black } else { Color::White };
    let san = TRAILING_PUNCT.replace(&caps[3], "");
    let san = LEADING_PAREN.replace(&san, "").into_owned();
    Some(MoveReference { fullmove, side, san })
}

/// Divide o texto mantendo os separadores de espaço como partes próprias
fn split_preserving_whitespace(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut last = 0;
    for m in WHITESPACE.find_iter(text) {
        if m.start() > last { parts.push(&text[last..m.start()]); }
        parts.push(m.as_str());
        last = m.end();
    }
    if last < text.len() { parts.push(&text[last..]); }
    parts
}

fn matches_turn(pos: &Chess, fullmove: u32, side: Color) -> bool {
    engine::fullmove_number(pos) == fullmove && engine::side_to_move(pos) == side
}

/// Primeira posição da linha (raiz inclusa) com o número de lance e a vez pedidos.
/// Devolve a posição e os lances que levam até ela.
pub fn find_position_at(root: &Chess, line: &[String], fullmove: u32, side: Color) -> Option<(Chess, Vec<String>)> {
    let mut pos = root.clone();
    let mut sequence = Vec::new();
    for uci in line {
        if matches_turn(&pos, fullmove, side) { return Some((pos, sequence)); }
        let Some(mv) = engine::parse_uci(&pos, uci) else {
            trace!("busca interrompida em {uci}");
            return None;
        };
        pos = engine::apply_move(&pos, &mv);
        sequence.push(uci.clone());
    }
    matches_turn(&pos, fullmove, side).then_some((pos, sequence))
}

pub struct CommentMoveResolver {
    root: Option<Chess>,  // None quando a FEN raiz é inválida
    line: ReferenceLine,
}

impl CommentMoveResolver {
    pub fn new(fen: &str, line: ReferenceLine) -> Self {
        let root = match engine::parse_fen(fen) {
            Ok(pos) => Some(pos),
            Err(e) => {
                warn!("comentário sem posição raiz válida: {e:#}");
                None
            }
        };
        CommentMoveResolver { root, line }
    }

    /// Tokeniza o texto inteiro; palavras não resolvidas viram texto.
    pub fn resolve(&self, text: &str) -> Vec<CommentToken> {
        if text.is_empty() { return Vec::new(); }
        let Some(root) = &self.root else { return vec![CommentToken::text(text)]; };

        // cursor que avança com cada lance resolvido
        let mut walking = root.clone();
        let mut sequence: Vec<String> = Vec::new();
        let mut tokens = Vec::new();

        for word in split_preserving_whitespace(text) {
            let Some(reference) = parse_reference(word) else {
                tokens.push(CommentToken::text(word));
                continue;
            };

            let mut found = None;
            if matches_turn(&walking, reference.fullmove, reference.side) {
                found = engine::parse_san(&walking, &reference.san);
            }
            if found.is_none() && !self.line.is_empty() {
                if let Some((pos, prefix)) = find_position_at(root, &self.line, reference.fullmove, reference.side) {
                    if let Some(mv) = engine::parse_san(&pos, &reference.san) {
                        walking = pos;
                        sequence = prefix;
                        found = Some(mv);
                    }
                }
            }

            match found {
                Some(mv) => {
                    let uci = engine::canonical_uci(&mv);
                    walking = engine::apply_move(&walking, &mv);
                    sequence.push(uci.clone());
                    tokens.push(CommentToken {
                        kind: TokenKind::Move,
                        content: word.to_owned(),
                        uci: Some(uci),
                        resolved_uci_sequence: Some(sequence.clone()),
                    });
                }
                None => {
                    trace!("referência não resolvida: {word}");
                    tokens.push(CommentToken::text(word));
                }
            }
        }
        debug!("comentário com {} token(s)", tokens.len());
        tokens
    }
}

/// Sequência a reproduzir quando o token é ativado; texto não faz nada
pub fn activate(token: &CommentToken) -> Option<&[String]> {
    match token.kind {
        TokenKind::Move => token.resolved_uci_sequence.as_deref(),
        TokenKind::Text => None,
    }
}
