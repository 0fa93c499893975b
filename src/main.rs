//! Self-play driver.
//!
//! Run with:
//! `cargo run --release -- --depth 4 --strategy concurrent`
//! `cargo run --release -- --fen "7k/8/8/q7/1P6/8/8/7K w - - 0 1" --plies 6 --log-level debug`
//! `cargo run --release -- --weighted-dark --seed 7`

use log::{info, LevelFilter};
use rand::{rngs::StdRng, SeedableRng};

use bramble_chess::engines::engine_negamax::NegamaxEngine;
use bramble_chess::engines::engine_trait::Engine;
use bramble_chess::engines::engine_weighted::{LinearEvaluator, WeightedEngine};
use bramble_chess::game_state::chess_rules::STARTING_POSITION_FEN;
use bramble_chess::game_state::chess_types::Color;
use bramble_chess::game_state::game_state::GameState;
use bramble_chess::search::move_history::MoveHistory;
use bramble_chess::search::search_outcome::{SearchConfig, SearchOutcome, SearchStrategy};
use bramble_chess::utils::long_algebraic::describe_move;

struct DriverArgs {
    fen: String,
    depth: u8,
    strategy: SearchStrategy,
    max_plies: usize,
    level: LevelFilter,
    weighted_dark: bool,
    seed: Option<u64>,
}

fn parse_args() -> Result<DriverArgs, String> {
    let mut parsed = DriverArgs {
        fen: STARTING_POSITION_FEN.to_owned(),
        depth: 3,
        strategy: SearchStrategy::Sequential,
        max_plies: 40,
        level: LevelFilter::Info,
        weighted_dark: false,
        seed: None,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("missing value for {arg}"));
        match arg.as_str() {
            "--fen" => parsed.fen = value()?,
            "--depth" => parsed.depth = value()?.parse().map_err(|e| format!("invalid --depth: {e}"))?,
            "--strategy" => parsed.strategy = SearchStrategy::from_name(&value()?)?,
            "--plies" => parsed.max_plies = value()?.parse().map_err(|e| format!("invalid --plies: {e}"))?,
            "--log-level" => parsed.level = value()?.parse().map_err(|e| format!("invalid --log-level: {e}"))?,
            "--seed" => parsed.seed = Some(value()?.parse().map_err(|e| format!("invalid --seed: {e}"))?),
            "--weighted-dark" => parsed.weighted_dark = true,
            _ => return Err(format!("unknown argument: {arg}")),
        }
    }

    Ok(parsed)
}

fn setup_logger(level: LevelFilter) -> Result<(), String> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .map_err(|e| format!("failed to install logger: {e}"))
}

/// Light and dark players. A `--seed` fixes every random choice, book
/// replies included.
fn build_engines(args: &DriverArgs) -> (Box<dyn Engine>, Box<dyn Engine>) {
    let config = SearchConfig {
        strategy: args.strategy,
        ..SearchConfig::default()
    };
    let book_engine = |seed_offset: u64| {
        let engine = NegamaxEngine::new(args.depth, config.clone());
        match args.seed {
            Some(seed) => engine.with_seed(seed.wrapping_add(seed_offset)),
            None => engine,
        }
    };

    let light: Box<dyn Engine> = Box::new(book_engine(0));
    let dark: Box<dyn Engine> = if args.weighted_dark {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Box::new(WeightedEngine::new(LinearEvaluator::random(&mut rng)))
    } else {
        Box::new(book_engine(1))
    };
    (light, dark)
}

fn main() -> Result<(), String> {
    let args = parse_args()?;
    setup_logger(args.level)?;

    let mut game = GameState::from_fen(&args.fen)?;
    let (mut light, mut dark) = build_engines(&args);
    info!("{} (light) vs {} (dark) from {}", light.name(), dark.name(), game.get_fen());

    let mut history = MoveHistory::new();
    for ply in 0..args.max_plies {
        let engine = match game.side_to_move {
            Color::Light => &mut light,
            Color::Dark => &mut dark,
        };

        match engine.choose_move(&game, &history).map_err(|e| e.to_string())? {
            SearchOutcome::Chosen(generated) => {
                let notation = describe_move(&game, generated.chess_move)?;
                println!("{:>3}. {notation:<7} {}", ply + 1, generated.game_after_move.get_fen());
                history.push(generated.chess_move);
                game = generated.game_after_move;
            }
            SearchOutcome::Terminal(terminal) => {
                println!("game over after {ply} plies: {terminal:?}");
                return Ok(());
            }
        }
    }

    println!("stopped after {} plies: {}", args.max_plies, game.get_fen());
    Ok(())
}
