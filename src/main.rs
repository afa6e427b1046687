//! Ludo race - command line runner.
//!
//! Plays one game with four threaded players and prints the final rankings.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ludo_race::{GameConfig, GameController, NullRenderer, TextRenderer};

/// Four-player Ludo race, one thread per player.
#[derive(Parser, Debug)]
#[command(name = "ludo-race", version, about)]
struct Cli {
    /// TOML config file. Flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tokens per player (1-4).
    #[arg(short, long)]
    tokens: Option<usize>,

    /// Play Red+Yellow against Green+Blue.
    #[arg(long)]
    team: bool,

    /// Seed for seating and dice.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pause after each turn, in milliseconds.
    #[arg(long)]
    turn_delay_ms: Option<u64>,

    /// Stop the game after this many turns.
    #[arg(long)]
    max_turns: Option<u64>,

    /// Print the board after every turn.
    #[arg(long)]
    board: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig, ludo_race::ConfigError> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load_or_default(path)?,
            None => GameConfig::default(),
        };
        if let Some(tokens) = self.tokens {
            config = config.with_tokens(tokens);
        }
        if self.team {
            config = config.with_team_mode(true);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(delay) = self.turn_delay_ms {
            config = config.with_turn_delay_ms(delay);
        }
        if let Some(max_turns) = self.max_turns {
            config = config.with_max_turns(max_turns);
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.game_config()?;

    let controller = GameController::new(config);
    let controller = if cli.board {
        controller.with_renderer(TextRenderer::new(std::io::stdout()))
    } else {
        controller.with_renderer(NullRenderer)
    };

    let summary = controller.run()?;
    info!(seed = summary.seed, turns = summary.turns, ended_by = ?summary.ended_by, "game finished");
    if !cli.board {
        print!("{}", summary.standings);
    }

    Ok(())
}
