use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use connectx::ai::{Agent, MctsAgent, MinimaxAgent, RandomAgent};
use connectx::arena::{run_match, MatchReport, Seat};
use connectx::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    Minimax,
    Mcts,
    Random,
}

/// Pit two agents against each other, alternating colours every game.
#[derive(Parser)]
#[command(name = "battle", about = "Run automated Connect X matches")]
struct Cli {
    /// Agent in the first seat (moves first in even-numbered games)
    #[arg(long, value_enum, default_value = "minimax")]
    first: AgentKind,

    /// Agent in the second seat
    #[arg(long, value_enum, default_value = "random")]
    second: AgentKind,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of games
    #[arg(long)]
    games: Option<usize>,

    /// Override minimax search depth
    #[arg(long)]
    depth: Option<u32>,

    /// Override MCTS playouts per move
    #[arg(long)]
    iterations: Option<u32>,

    /// Override the seed; the second seat uses seed + 1
    #[arg(long)]
    seed: Option<u64>,

    /// Override board columns
    #[arg(long)]
    cols: Option<usize>,

    /// Override board rows
    #[arg(long)]
    rows: Option<usize>,

    /// Override the number of discs in a row needed to win
    #[arg(long)]
    win_length: Option<usize>,

    /// Write the full match report as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(games) = cli.games {
        app_config.arena.games = games;
    }
    if let Some(depth) = cli.depth {
        app_config.search.depth = depth;
    }
    if let Some(iterations) = cli.iterations {
        app_config.mcts.iterations = iterations;
    }
    if let Some(seed) = cli.seed {
        app_config.search.seed = Some(seed);
        app_config.mcts.seed = Some(seed);
    }
    if let Some(cols) = cli.cols {
        app_config.board.cols = cols;
    }
    if let Some(rows) = cli.rows {
        app_config.board.rows = rows;
    }
    if let Some(win_length) = cli.win_length {
        app_config.board.win_length = win_length;
    }
    app_config.validate().context("invalid settings")?;

    let mut first = build_agent(cli.first, &app_config, 0);
    let mut second = build_agent(cli.second, &app_config, 1);

    info!(
        first = first.name(),
        second = second.name(),
        games = app_config.arena.games,
        "starting match"
    );
    let report = run_match(
        first.as_mut(),
        second.as_mut(),
        &app_config.board,
        &app_config.arena,
    )
    .context("running match")?;

    print_summary(&report);

    if let Some(path) = &cli.json {
        let json = serde_json::to_string_pretty(&report).context("serializing report")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

/// Build the agent for one seat. Seeded agents add `seat_offset` to their
/// configured seed so two agents of the same kind do not mirror each other.
fn build_agent(kind: AgentKind, config: &AppConfig, seat_offset: u64) -> Box<dyn Agent> {
    let offset = |seed: Option<u64>| seed.map(|s| s.wrapping_add(seat_offset));
    match kind {
        AgentKind::Minimax => {
            let mut search = config.search.clone();
            search.seed = offset(search.seed);
            Box::new(MinimaxAgent::new(search))
        }
        AgentKind::Mcts => {
            let mut mcts = config.mcts.clone();
            mcts.seed = offset(mcts.seed);
            Box::new(MctsAgent::new(mcts))
        }
        AgentKind::Random => Box::new(match offset(config.search.seed) {
            Some(seed) => RandomAgent::with_seed(seed),
            None => RandomAgent::new(),
        }),
    }
}

fn print_summary(report: &MatchReport) {
    let stats = &report.stats;
    println!(
        "{}x{} connect {}: {} games",
        report.board.cols, report.board.rows, report.board.win_length, stats.games
    );
    println!(
        "  first  ({:<8}) wins: {:>4}  ({:.1}%)",
        report.first,
        stats.wins(Seat::First),
        stats.win_rate(Seat::First) * 100.0
    );
    println!(
        "  second ({:<8}) wins: {:>4}  ({:.1}%)",
        report.second,
        stats.wins(Seat::Second),
        stats.win_rate(Seat::Second) * 100.0
    );
    println!(
        "  draws: {} ({:.1}%)  unfinished: {}  black wins: {}",
        stats.draws,
        stats.draw_rate() * 100.0,
        stats.unfinished,
        stats.black_wins
    );
    println!("  average game length: {:.1}", stats.average_game_length());
}
