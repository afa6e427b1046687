//! Game configuration.
//!
//! The controller consumes a `GameConfig` at startup. Values come from
//! defaults, an optional TOML file, and CLI overrides, in that order.
//!
//! An out-of-range token count is not fatal: [`GameConfig::normalized`]
//! substitutes the default and logs a warning.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ConfigError;

/// Maximum tokens a player can field.
pub const MAX_TOKENS: usize = 4;

/// Token count used when the configured one is out of range.
pub const DEFAULT_TOKENS: usize = 4;

/// Consecutive failed turns after which a player may be forced out.
pub const DEFAULT_STUCK_TURN_LIMIT: u32 = 10;

/// Safety cap on granted turns.
pub const DEFAULT_MAX_TURNS: u64 = 100_000;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tokens per player (1-4).
    pub tokens_per_player: usize,

    /// Red + Yellow play against Green + Blue.
    pub team_mode: bool,

    /// Seed for seating and dice. `None` draws one from OS entropy.
    pub seed: Option<u64>,

    /// Pause after each granted turn, to pace output.
    pub turn_delay_ms: u64,

    /// Failed turns in a row before a stuck player is eliminated
    /// (only while at most two players remain active).
    pub stuck_turn_limit: u32,

    /// Hard cap on granted turns. The game ends with the standings so far.
    pub max_turns: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tokens_per_player: DEFAULT_TOKENS,
            team_mode: false,
            seed: None,
            turn_delay_ms: 0,
            stuck_turn_limit: DEFAULT_STUCK_TURN_LIMIT,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl GameConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set tokens per player.
    #[must_use]
    pub fn with_tokens(mut self, tokens: usize) -> Self {
        self.tokens_per_player = tokens;
        self
    }

    /// Enable or disable team mode.
    #[must_use]
    pub fn with_team_mode(mut self, team_mode: bool) -> Self {
        self.team_mode = team_mode;
        self
    }

    /// Fix the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the post-turn delay in milliseconds.
    #[must_use]
    pub fn with_turn_delay_ms(mut self, delay_ms: u64) -> Self {
        self.turn_delay_ms = delay_ms;
        self
    }

    /// Set the stuck-player limit.
    #[must_use]
    pub fn with_stuck_turn_limit(mut self, limit: u32) -> Self {
        self.stuck_turn_limit = limit;
        self
    }

    /// Set the turn cap.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u64) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Post-turn delay as a `Duration`.
    #[must_use]
    pub fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }

    /// Replace out-of-range values with defaults.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if !(1..=MAX_TOKENS).contains(&self.tokens_per_player) {
            warn!(
                requested = self.tokens_per_player,
                default = DEFAULT_TOKENS,
                "invalid number of tokens, using default"
            );
            self.tokens_per_player = DEFAULT_TOKENS;
        }
        if self.stuck_turn_limit == 0 {
            warn!(default = DEFAULT_STUCK_TURN_LIMIT, "stuck turn limit must be positive, using default");
            self.stuck_turn_limit = DEFAULT_STUCK_TURN_LIMIT;
        }
        self
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: GameConfig = toml::from_str(&content)?;
        Ok(config.normalized())
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }
}
