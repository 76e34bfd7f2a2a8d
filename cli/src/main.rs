use std::io;

use anyhow::anyhow;
use clap::Parser;
use minefield_core::{CellCount, Coord, GameConfig, MineField};
use rand::SeedableRng;
use rand::rngs::SmallRng;

mod command;
mod render;
mod session;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Number of rows
    #[arg(long, default_value_t = 9)]
    rows: Coord,

    /// Number of columns
    #[arg(long, default_value_t = 9)]
    cols: Coord,

    /// Number of mines, capped at the number of cells
    #[arg(short, long, default_value_t = 10)]
    mines: CellCount,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

fn init_logging(level: log::LevelFilter) -> anyhow::Result<()> {
    use tracing_subscriber::filter::LevelFilter;

    let max_level = match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!("Error initializing logger: {err}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter())?;

    let config = GameConfig::new((args.rows, args.cols), args.mines);
    if config.mines != args.mines {
        log::warn!(
            "Only {} cells on the board, using {} mines",
            config.total_cells(),
            config.mines
        );
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let field = MineField::from_config(config, SmallRng::seed_from_u64(seed))?;
    log::info!(
        "Started {}x{} board with {} mines",
        config.size.0,
        config.size.1,
        config.mines
    );

    session::Session::new(field).run(io::stdin().lock(), io::stdout().lock())
}
