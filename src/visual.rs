//src/visual.rs
// Saída colorida para o terminal

// Bibliotecas externas
use colored::*;
use shakmaty::{Board, Color, File, Position, Rank, Square};

// Módulos internos
use crate::{
    analysis::{AnalysisTree, NodeId, ROOT},
    comment::{CommentToken, TokenKind},
    puzzle::{FeedbackKind, PuzzleEvent, PuzzleSolver},
    recorder::SolutionRecorder,
    statistics::PuzzleStatistics,
};

// Mensagens coloridas
pub fn console_yellow(message: &str) {
    println!("{}", message.yellow());
}

pub fn print_error(message: &str) {
    println!("{}", message.red().bold());
}

pub fn print_success(message: &str) {
    println!("{}", message.green().bold());
}

// Imprime o cabeçalho principal
pub fn print_main_header(subtitle: &str) {
    println!("\n{} {}", "♟️  Treino de Puzzles de Xadrez".blue().bold(), subtitle.cyan());
    println!("{}", "═".repeat(50).cyan());
}

/// Tabuleiro em texto, do ponto de vista de `orientation`
pub fn render_board(board: &Board, orientation: Color) -> String {
    let mut ranks: Vec<Rank> = Rank::ALL.to_vec();
    let mut files: Vec<File> = File::ALL.to_vec();
    if orientation == Color::White { ranks.reverse(); } else { files.reverse(); }

    let mut out = String::new();
    for rank in ranks {
        out.push_str(&format!("{} ", rank.char()));
        for &file in &files {
            let sq = Square::from_coords(file, rank);
            out.push(board.piece_at(sq).map_or('.', |p| p.char()));
            out.push(' ');
        }
        out.push('\n');
    }
    out.push_str("  ");
    for file in files { out.push(file.char()); out.push(' '); }
    out
}

// Estado atual do puzzle
pub fn print_puzzle(solver: &PuzzleSolver) {
    println!("{}", render_board(solver.position().board(), solver.orientation()));
    println!("{} {}", "FEN:".blue().bold(), solver.fen());
    let check = if solver.is_check() { " (xeque)".red().to_string() } else { String::new() };
    println!("{} {:?}{}  {} {}/{}",
        "Estado:".blue().bold(), solver.state(), check,
        "Lance:".blue().bold(), solver.current_index(), solver.line().len());
}

// Notificação vinda do puzzle
pub fn print_puzzle_event(event: &PuzzleEvent) {
    match event {
        PuzzleEvent::PositionChanged { last_move: Some(m), .. } => println!("{} {}", "→".cyan(), m),
        PuzzleEvent::PositionChanged { .. } => {}
        PuzzleEvent::Feedback(Some(fb)) => match fb.kind {
            FeedbackKind::Correct   => print_success(&format!("✓ correto ({})", fb.square)),
            FeedbackKind::Incorrect => print_error(&format!("✗ incorreto ({})", fb.square)),
        },
        PuzzleEvent::Feedback(None) => {}
        PuzzleEvent::PuzzleSolved   => print_success("Puzzle resolvido!"),
        PuzzleEvent::IncorrectMove  => console_yellow("Lance incorreto, tente novamente."),
    }
}

// Tokens do comentário; lances resolvidos destacados
pub fn print_tokens(tokens: &[CommentToken]) {
    let mut line = String::new();
    for t in tokens {
        match t.kind {
            TokenKind::Move => line.push_str(&t.content.blue().bold().underline().to_string()),
            TokenKind::Text => line.push_str(&t.content),
        }
    }
    println!("{line}");
    for t in tokens.iter().filter(|t| t.kind == TokenKind::Move) {
        if let Some(seq) = &t.resolved_uci_sequence {
            println!("  {} {}", t.content.cyan(), seq.join(" "));
        }
    }
}

// Árvore de análise indentada; o nó atual marcado com '*'
pub fn print_tree(tree: &AnalysisTree) {
    fn walk(tree: &AnalysisTree, id: NodeId, depth: usize, out: &mut Vec<String>) {
        let Some(node) = tree.node(id) else { return };
        if let (Some(san), Some(uci)) = (&node.san, &node.uci) {
            let marker = if id == tree.current_id() { "*" } else { " " };
            let label = format!("{}{} {} ({})", "  ".repeat(depth), marker, san, uci);
            out.push(if id == tree.current_id() { label.green().bold().to_string() } else { label });
        }
        // Primeiro filho continua a linha; os demais são variantes
        for (i, &child) in node.children.iter().enumerate() {
            let next_depth = if id == ROOT || i == 0 { depth } else { depth + 1 };
            walk(tree, child, next_depth, out);
        }
    }

    let mut out = Vec::new();
    walk(tree, ROOT, 0, &mut out);
    if tree.current_id() == ROOT { println!("{}", "* (raiz)".green().bold()); }
    for line in out { println!("{line}"); }
}

// Histórico do gravador; passo atual destacado
pub fn print_recorder(recorder: &SolutionRecorder) {
    for (i, step) in recorder.steps().iter().enumerate().skip(1) {
        let san = step.san.as_deref().unwrap_or("?");
        if i == recorder.current_index() {
            println!("{:>3}. {}", i, san.green().bold());
        } else {
            println!("{:>3}. {}", i, san);
        }
    }
    println!("{} {}", "Solução:".blue().bold(), recorder.solution().join(" "));
}

// Estatísticas ao final da sessão
pub fn render_end_statistics(stats: &PuzzleStatistics) {
    let total_time = stats.get_elapsed_time();
    println!("Estatísticas da sessão:");
    println!("- Início: {}", stats.started_at);
    println!("- Lances corretos: {}", stats.correct_moves);
    println!("- Erros: {}", stats.mistakes);
    println!("- Dicas usadas: {}", stats.hints_used);
    println!("- Precisão: {:.1}%", stats.accuracy() * 100.0);
    println!("- Tempo total: {:02}m {:02}s", total_time / 60, total_time % 60);
    if stats.solved {
        print_success("Puzzle resolvido.");
    } else {
        console_yellow("Puzzle não resolvido.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{Chess, Position};

    #[test]
    fn board_follows_orientation() {
        let pos = Chess::default();
        let white = render_board(pos.board(), Color::White);
        assert!(white.starts_with("8 r n b q k b n r"));
        assert!(white.ends_with("a b c d e f g h "));

        let black = render_board(pos.board(), Color::Black);
        assert!(black.starts_with("1 R N B K Q B N R"));
        assert!(black.ends_with("h g f e d c b a "));
    }
}
