//! Game setup, actor launch and teardown.
//!
//! `GameController` owns the game state until `run`, then shares it with one
//! actor thread per player behind a mutex. The controller thread itself runs
//! the [`TurnCoordinator`](crate::scheduler::TurnCoordinator), joins every
//! actor once the coordinator shuts them down, and returns a
//! [`GameSummary`].

pub mod render;
pub mod standings;

pub use render::{NullRenderer, Renderer, TextRenderer};
pub use standings::{PlayerStanding, Standings, TeamStanding};

use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;

use tracing::{error, info};

use crate::core::{GameConfig, GameError, GameRng, GameState, PlayerId, NUM_PLAYERS};
use crate::scheduler::{DiceSource, GameEnd, PlayerActor, Seat, SharedDice, TurnCoordinator, TurnReport};

/// Result of a finished game.
#[derive(Clone, Debug)]
pub struct GameSummary {
    pub standings: Standings,
    /// Number of turns granted.
    pub turns: usize,
    /// Seating order the round-robin followed.
    pub turn_order: Vec<PlayerId>,
    pub ended_by: GameEnd,
    /// Seed of the game's random streams.
    pub seed: u64,
    pub history: im::Vector<TurnReport>,
}

/// Sets up and runs one game.
pub struct GameController {
    config: GameConfig,
    state: Option<GameState>,
    dice: Option<SharedDice>,
    renderer: Box<dyn Renderer>,
}

impl GameController {
    /// A controller for a fresh game. Out-of-range config values are replaced
    /// with defaults.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            config: config.normalized(),
            state: None,
            dice: None,
            renderer: Box::new(NullRenderer),
        }
    }

    /// Start from an existing state instead of a fresh board.
    #[must_use]
    pub fn with_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Roll this die instead of the seeded one.
    #[must_use]
    pub fn with_dice(mut self, dice: impl DiceSource + 'static) -> Self {
        self.dice = Some(SharedDice::new(dice));
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Play the game to the end.
    pub fn run(mut self) -> Result<GameSummary, GameError> {
        let rng = self.config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let seed = rng.seed();

        let mut turn_order: Vec<PlayerId> = PlayerId::all(NUM_PLAYERS).collect();
        rng.for_context("seating").shuffle(&mut turn_order);

        let dice = self
            .dice
            .take()
            .unwrap_or_else(|| SharedDice::new(rng.for_context("dice")));
        let state = self
            .state
            .take()
            .unwrap_or_else(|| GameState::new(&self.config));

        info!(
            seed,
            tokens = self.config.tokens_per_player,
            team_mode = state.team_mode(),
            order = ?turn_order,
            "game starting"
        );

        let game = Arc::new(Mutex::new(state));
        let mut seats = Vec::with_capacity(NUM_PLAYERS);
        let mut handles = Vec::with_capacity(NUM_PLAYERS);
        for &player in &turn_order {
            let (grants, rx) = mpsc::channel();
            let actor = PlayerActor::new(player, Arc::clone(&game), dice.clone(), self.config.stuck_turn_limit);
            let handle = thread::Builder::new()
                .name(format!("player-{}", player.color().name().to_lowercase()))
                .spawn(move || actor.run(rx))
                .map_err(|source| GameError::Spawn { player, source })?;
            seats.push(Seat { player, grants });
            handles.push((player, handle));
        }

        let coordinator = TurnCoordinator::new(
            Arc::clone(&game),
            seats,
            self.config.max_turns,
            self.config.turn_delay(),
        );
        let log = coordinator.run(self.renderer.as_mut());

        let mut panicked = None;
        for (player, handle) in handles {
            if handle.join().is_err() {
                error!(%player, "actor thread panicked");
                panicked.get_or_insert(player);
            }
        }
        if let Some(player) = panicked {
            return Err(GameError::ActorPanicked(player));
        }
        let log = log?;

        let standings = Standings::from_state(&game.lock().unwrap_or_else(PoisonError::into_inner));
        let summary = GameSummary {
            standings,
            turns: log.reports.len(),
            turn_order,
            ended_by: log.ended_by,
            seed,
            history: log.reports,
        };
        self.renderer.game_over(&summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_is_normalized() {
        let controller = GameController::new(GameConfig::new().with_tokens(0));
        assert_eq!(controller.config().tokens_per_player, 4);
    }

    #[test]
    fn test_seeded_game_completes() {
        let summary = GameController::new(GameConfig::new().with_tokens(1).with_seed(5))
            .run()
            .unwrap();

        assert_eq!(summary.seed, 5);
        assert_eq!(summary.ended_by, GameEnd::Completed);
        assert_eq!(summary.turns, summary.history.len());
        let mut ranks: Vec<u8> = summary.standings.players.iter().filter_map(|s| s.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }
}
