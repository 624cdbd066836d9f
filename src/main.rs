// src/main.rs
// ---------------------------------------------------------------------------
// CLI do treino de puzzles: resolver, analisar, gravar, comentar e exportar.
// ---------------------------------------------------------------------------

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use chess_trainer_rs::{
    analysis::AnalysisTree,
    audio::{LogSound, SharedSound},
    comment::{self, CommentMoveResolver},
    config::{self, Timings},
    engine,
    exporter,
    puzzle::{PuzzleEvent, PuzzleSolver},
    recorder::{RecorderEvent, SolutionRecorder},
    session::PuzzleSession,
    statistics::PuzzleStatistics,
    visual,
};
use chrono::Local;
use clap::{Args as ClapArgs, Parser, Subcommand};
use indexmap::IndexMap;
use log::{debug, info};
use shakmaty::{Position, Role};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Args CLI - Argumentos da linha de comando
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
    #[arg(long, global = true, default_value = config::DEFAULT_LOG_LEVEL)]
    pub log_level: String,                                    // Nível de logging
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve um puzzle interativamente
    Puzzle(PuzzleArgs),
    /// Explora variantes numa árvore de análise
    Analyse(LineArgs),
    /// Grava uma solução lance a lance
    Record(LineArgs),
    /// Resolve os lances citados num comentário
    Comment(CommentArgs),
    /// Exporta a linha como PGN
    Export(ExportArgs),
}

/// Posição raiz e linha de lances UCI
#[derive(ClapArgs, Debug)]
pub struct LineArgs {
    #[arg(long, default_value = config::STARTING_FEN)]
    pub fen: String,                                          // FEN da posição raiz
    #[arg(long, default_value = "")]
    pub line: String,                                         // Lances UCI separados por espaço
}

#[derive(ClapArgs, Debug)]
pub struct PuzzleArgs {
    #[command(flatten)]
    pub position: LineArgs,
    #[arg(long)]
    pub setup_move: bool,                                     // Primeiro lance é do oponente
    #[arg(long)]
    pub timings: Option<PathBuf>,                             // JSON com os atrasos
    #[arg(long, conflicts_with = "timings")]
    pub instant: bool,                                        // Sem atrasos entre estados
}

#[derive(ClapArgs, Debug)]
pub struct CommentArgs {
    #[command(flatten)]
    pub position: LineArgs,
    #[arg(long)]
    pub text: String,                                         // Texto do comentário
    #[arg(long)]
    pub json: bool,                                           // Saída em JSON
}

#[derive(ClapArgs, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub position: LineArgs,
    #[arg(long = "header", value_name = "CHAVE=VALOR")]
    pub headers: Vec<String>,                                 // Cabeçalhos PGN extras
    #[arg(short, long)]
    pub output: Option<PathBuf>,                              // Arquivo de saída (ou stdout)
    #[arg(long)]
    pub append: bool,                                         // Acrescenta ao arquivo existente
}

/// Configura o logger com o nível especificado
fn setup_logger(level: &str) {
    env_logger::Builder::new()
        .filter_level(level.parse().unwrap_or(log::LevelFilter::Info))
        .format(|buf, record| {
            writeln!(buf, "{} [{}] {}: {}",
                Local::now().format("%H:%M:%S%.3f"), record.level(), record.target(), record.args())
        })
        .init();
}

fn sound() -> SharedSound { Arc::new(LogSound) }

/// Lê comandos da entrada padrão até EOF ou "sair"
fn for_each_command(mut handle: impl FnMut(&str) -> Result<()>) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("falha lendo a entrada")?;
        let cmd = line.trim();
        if cmd == "sair" || cmd == "quit" { break; }
        if !cmd.is_empty() { handle(cmd)?; }
    }
    Ok(())
}

/// Índice numérico de um comando `ir`; erro não encerra a sessão
fn parse_index(raw: &str) -> Result<usize> {
    raw.trim().parse().with_context(|| format!("índice inválido: {:?}", raw.trim()))
}

// ---------------------------------------------------------------------------
// Puzzle
// ---------------------------------------------------------------------------
async fn run_puzzle(args: PuzzleArgs) -> Result<()> {
    let timings = match &args.timings {
        Some(path)             => Timings::load(path)?,
        None if args.instant   => Timings::instant(),
        None                   => Timings::default(),
    };
    let line = engine::parse_line(&args.position.line);
    let solver = PuzzleSolver::new(&args.position.fen, line, args.setup_move, timings, sound());
    if !solver.is_root_valid() { visual::console_yellow("FEN inválido; usando a posição inicial."); }

    visual::print_main_header("puzzle");
    println!("Comandos: lance UCI, q/r/b/n (promoção), dica, inicio, ant, prox, fim, sair");
    let (session, mut events) = PuzzleSession::start(solver).await;
    let mut stats = PuzzleStatistics::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(ev) = events.recv() => {
                stats.record(&ev);
                visual::print_puzzle_event(&ev);
                if matches!(ev, PuzzleEvent::PositionChanged { .. }) {
                    session.snapshot(visual::print_puzzle).await;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("falha lendo a entrada")? else { break };
                match line.trim() {
                    ""                => {}
                    "sair" | "quit"   => break,
                    "inicio"          => session.go_to_start().await,
                    "ant"             => session.previous().await,
                    "prox"            => session.next().await,
                    "fim"             => session.go_to_end().await,
                    "mostrar"         => session.snapshot(visual::print_puzzle).await,
                    "dica"            => {
                        stats.add_hint();
                        match session.snapshot(|p| p.hint()).await {
                            Some((from, to)) => println!("Dica: {from} → {to}"),
                            None             => visual::console_yellow("Sem dica neste momento."),
                        }
                    }
                    cmd if cmd.len() == 1 => match cmd.chars().next().and_then(Role::from_char) {
                        Some(role) => session.resolve_promotion(role).await,
                        None       => visual::print_error("Peça de promoção desconhecida."),
                    },
                    uci => session.submit_uci(uci).await,
                }
            }
        }
    }

    visual::render_end_statistics(&stats);
    debug!("estatísticas: {}", serde_json::to_string(&stats)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Análise
// ---------------------------------------------------------------------------
fn run_analyse(args: LineArgs) -> Result<()> {
    let line = engine::parse_line(&args.line);
    let mut tree = AnalysisTree::new(&args.fen, &line[..], sound());
    if !tree.is_root_valid() { visual::console_yellow("FEN inválido; usando a posição inicial."); }

    visual::print_main_header("análise");
    println!("Comandos: lance UCI, prox, ant, raiz, fim, girar, var <lances>, ir <nó>, arvore, sair");
    visual::print_tree(&tree);

    for_each_command(|cmd| {
        let (word, rest) = cmd.split_once(' ').unwrap_or((cmd, ""));
        match word {
            "prox"   => tree.next(),
            "ant"    => tree.previous(),
            "raiz"   => tree.reset(),
            "fim"    => tree.jump_to_end(),
            "girar"  => tree.flip(),
            "arvore" => visual::print_tree(&tree),
            "var"    => { tree.play_variation(&engine::parse_line(rest)[..]); }
            "ir"     => match parse_index(rest) {
                Ok(id)  => if !tree.jump_to(id) { visual::print_error("Nó inexistente."); },
                Err(e)  => visual::print_error(&format!("{e:#}")),
            },
            uci => {
                if tree.apply_move(uci).is_none() { visual::print_error("Lance ilegal."); }
            }
        }
        println!("{}", visual::render_board(tree.current().position().board(), tree.orientation()));
        println!("{} | {}", tree.fen(), tree.path_to(tree.current_id()).join(" "));
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Gravação
// ---------------------------------------------------------------------------
fn run_record(args: LineArgs) -> Result<()> {
    let mut recorder = SolutionRecorder::new(&args.fen, sound());
    let line = engine::parse_line(&args.line);
    if !line.is_empty() { recorder.sync_from_external(&line[..]); }

    visual::print_main_header("gravação");
    println!("Comandos: lance UCI, ant, prox, fim, zerar, ir <índice>, sinc <lances>, sair");
    visual::print_recorder(&recorder);

    for_each_command(|cmd| {
        let (word, rest) = cmd.split_once(' ').unwrap_or((cmd, ""));
        match word {
            "ant"   => recorder.previous(),
            "prox"  => recorder.next(),
            "fim"   => recorder.jump_to_end(),
            "zerar" => recorder.reset(),
            "sinc"  => { recorder.sync_from_external(&engine::parse_line(rest)[..]); }
            "ir"    => match parse_index(rest) {
                Ok(index) => if !recorder.go_to(index) { visual::print_error("Índice fora do histórico."); },
                Err(e)    => visual::print_error(&format!("{e:#}")),
            },
            uci => {
                if !recorder.record_move(uci) { visual::print_error("Lance ilegal."); }
            }
        }
        for ev in recorder.drain_events() {
            match ev {
                RecorderEvent::SolutionChanged(s)   => info!("solução: {}", s.join(" ")),
                RecorderEvent::CurrentFenChanged(f) => debug!("posição: {f}"),
            }
        }
        visual::print_recorder(&recorder);
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Comentário e exportação
// ---------------------------------------------------------------------------
fn run_comment(args: CommentArgs) -> Result<()> {
    let resolver = CommentMoveResolver::new(&args.position.fen, engine::parse_line(&args.position.line));
    let tokens = resolver.resolve(&args.text);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tokens).context("falha serializando tokens")?);
    } else {
        visual::print_tokens(&tokens);
    }
    let resolved = tokens.iter().filter(|t| comment::activate(t).is_some()).count();
    info!("{} lance(s) resolvido(s) no comentário", resolved);
    Ok(())
}

fn parse_headers(raw: &[String]) -> Result<IndexMap<String, String>> {
    let mut headers = IndexMap::new();
    for h in raw {
        let Some((k, v)) = h.split_once('=') else { bail!("cabeçalho sem '=': {h}") };
        headers.insert(k.trim().to_owned(), v.trim().to_owned());
    }
    Ok(headers)
}

fn run_export(args: ExportArgs) -> Result<()> {
    let headers = parse_headers(&args.headers)?;
    let line = engine::parse_line(&args.position.line);
    let pgn = exporter::build_pgn(&headers, &args.position.fen, &line[..]).context("erro gerando PGN")?;
    match &args.output {
        Some(path) => {
            let mut file = exporter::open_output_file(path, args.append)?;
            exporter::export_puzzle(&pgn, &mut file)?;
            visual::print_success(&format!("PGN salvo em {}", path.display()));
        }
        None => exporter::export_puzzle(&pgn, &mut io::stdout().lock())?,
    }
    Ok(())
}

/// Ponto de entrada principal do programa
#[tokio::main]
async fn main() -> Result<()> {
    // Parse argumentos e configura logger
    let args = Args::parse();
    setup_logger(&args.log_level);
    debug!("argumentos: {:?}", args);

    match args.command {
        Command::Puzzle(a)  => run_puzzle(a).await,
        Command::Analyse(a) => run_analyse(a),
        Command::Record(a)  => run_record(a),
        Command::Comment(a) => run_comment(a),
        Command::Export(a)  => run_export(a),
    }
}
