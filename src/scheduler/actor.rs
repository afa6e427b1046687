//! Per-player actors.
//!
//! Each actor runs on its own thread and blocks on its grant channel. A
//! grant is one turn: roll, move under the game lock, repeat on a six that
//! moved a token, then reply with a [`TurnReport`]. The actor never decides
//! when it plays; the coordinator does.
//!
//! ## Turn rules handled here
//!
//! - Three consecutive sixes forfeit the rest of the turn. The counter
//!   belongs to the actor and carries over between turns.
//! - A six that moved a token grants a bonus roll in the same turn.
//! - A player that cannot move for `stuck_limit` turns in a row while at
//!   most two players are still racing is eliminated with the next rank.
//! - A finished team player whose teammate is still racing rolls once per
//!   turn; on a six it rolls again and moves the teammate's token. A six
//!   that brings the last token home leads straight to that second roll.

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use super::coordinator::TurnSignal;
use super::dice::SharedDice;
use crate::core::{GameState, PlayerId, TokenPos, TokenRef};
use crate::rules::{Capture, RollOutcome, RuleEngine, SIX};

/// Sixes in a row that forfeit the turn.
pub const FORFEIT_SIXES: u8 = 3;

/// Something that happened during a turn, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    Rolled(u8),
    Moved { token: TokenRef, from: TokenPos, to: TokenPos },
    Captured { victim: TokenRef },
    /// Passed the end of the track without a capture and started another lap.
    LoopedAround(TokenRef),
    ReachedHome(TokenRef),
    /// No legal move for this roll.
    NoMove(u8),
    BonusTurn,
    Forfeited,
    /// All tokens home; the teammate is still racing.
    WaitingForTeammate,
    /// Win check passed for `player`. Team wins carry the shared rank.
    Won { player: PlayerId, rank: Option<u8> },
    /// A finished player's roll spent on the teammate.
    HelpedTeammate { teammate: PlayerId, roll: u8 },
    /// Removed by the stuck-player rule.
    Eliminated { rank: u8 },
}

/// What one granted turn did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub player: PlayerId,
    pub rolls: SmallVec<[u8; 4]>,
    pub events: Vec<TurnEvent>,
}

impl TurnReport {
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            rolls: SmallVec::new(),
            events: Vec::new(),
        }
    }

    /// Number of moves applied this turn.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TurnEvent::Moved { .. }))
            .count()
    }

    #[must_use]
    pub fn was_forfeited(&self) -> bool {
        self.events.contains(&TurnEvent::Forfeited)
    }

    fn record(&mut self, event: TurnEvent) {
        debug!(player = %self.player, ?event, "turn event");
        self.events.push(event);
    }

    fn record_roll(&mut self, roll: u8) {
        self.rolls.push(roll);
        self.record(TurnEvent::Rolled(roll));
    }

    fn record_outcome(&mut self, outcome: &RollOutcome) {
        let Some(moved) = outcome.moved else {
            self.record(TurnEvent::NoMove(outcome.roll));
            return;
        };
        let plan = moved.plan;
        if let Some(Capture { victim, .. }) = moved.capture {
            self.record(TurnEvent::Captured { victim });
        }
        self.record(TurnEvent::Moved {
            token: plan.token,
            from: plan.from,
            to: plan.to,
        });
        if plan.wrapped {
            self.record(TurnEvent::LoopedAround(plan.token));
        }
        if moved.reached_home() {
            self.record(TurnEvent::ReachedHome(plan.token));
        }
    }
}

/// One player's actor.
pub struct PlayerActor {
    id: PlayerId,
    game: Arc<Mutex<GameState>>,
    dice: SharedDice,
    consecutive_sixes: u8,
    stuck_turns: u32,
    stuck_limit: u32,
}

impl PlayerActor {
    pub fn new(id: PlayerId, game: Arc<Mutex<GameState>>, dice: SharedDice, stuck_limit: u32) -> Self {
        Self {
            id,
            game,
            dice,
            consecutive_sixes: 0,
            stuck_turns: 0,
            stuck_limit,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn consecutive_sixes(&self) -> u8 {
        self.consecutive_sixes
    }

    /// Turns in a row without a move.
    #[must_use]
    pub fn stuck_turns(&self) -> u32 {
        self.stuck_turns
    }

    /// Serve grants until shutdown or until the coordinator hangs up.
    pub fn run(mut self, grants: Receiver<TurnSignal>) {
        debug!(player = %self.id, "actor started");
        for signal in grants {
            match signal {
                TurnSignal::Grant { reply } => {
                    let report = self.take_turn();
                    if reply.send(report).is_err() {
                        break;
                    }
                }
                TurnSignal::Shutdown => break,
            }
        }
        debug!(player = %self.id, "actor exiting");
    }

    /// Play one granted turn.
    pub fn take_turn(&mut self) -> TurnReport {
        let mut report = TurnReport::new(self.id);

        let (schedulable, helper) = {
            let game = self.lock();
            (game.is_schedulable(self.id), game.is_helper(self.id))
        };
        if !schedulable {
            return report;
        }
        if helper {
            self.help(&mut report);
            return report;
        }

        let mut moved_any = false;
        loop {
            let roll = self.dice.roll();
            report.record_roll(roll);

            if roll == SIX {
                self.consecutive_sixes += 1;
                if self.consecutive_sixes >= FORFEIT_SIXES {
                    self.consecutive_sixes = 0;
                    report.record(TurnEvent::Forfeited);
                    break;
                }
            } else {
                self.consecutive_sixes = 0;
            }

            let mut game = self.lock();
            let outcome = RuleEngine::play_roll(&mut game, self.id, roll);
            let player = game.player(self.id);
            let (active, finished, rank) = (player.is_active(), player.has_finished(), player.rank());
            let (over, helper) = (game.is_over(), game.is_helper(self.id));
            drop(game);

            report.record_outcome(&outcome);
            if outcome.won {
                report.record(TurnEvent::Won { player: self.id, rank });
            } else if finished && outcome.did_move() {
                report.record(TurnEvent::WaitingForTeammate);
            }
            if !outcome.did_move() {
                break;
            }
            moved_any = true;

            if roll == SIX && active && !over {
                report.record(TurnEvent::BonusTurn);
                continue;
            }
            if roll == SIX && helper {
                // Finished on a six: the bonus roll goes to the teammate.
                self.roll_for_teammate(&mut report);
            }
            break;
        }

        if moved_any {
            self.stuck_turns = 0;
        } else {
            self.stuck_turns += 1;
            self.check_stuck(&mut report);
        }
        report
    }

    fn help(&mut self, report: &mut TurnReport) {
        let roll = self.dice.roll();
        report.record_roll(roll);
        if roll == SIX {
            self.roll_for_teammate(report);
        }
    }

    fn roll_for_teammate(&mut self, report: &mut TurnReport) {
        let second = self.dice.roll();
        report.record_roll(second);

        let mut game = self.lock();
        let Some(teammate) = game.teammate(self.id) else {
            return;
        };
        let outcome = RuleEngine::help_teammate(&mut game, self.id, second);
        let rank = game.player(teammate).rank();
        drop(game);

        if let Some(outcome) = outcome {
            report.record(TurnEvent::HelpedTeammate { teammate, roll: second });
            report.record_outcome(&outcome);
            if outcome.won {
                report.record(TurnEvent::Won { player: teammate, rank });
            }
        }
    }

    fn check_stuck(&mut self, report: &mut TurnReport) {
        if self.stuck_turns < self.stuck_limit {
            return;
        }
        let mut game = self.lock();
        if game.active_count() > 2 || !game.player(self.id).is_active() {
            return;
        }
        if let Some(rank) = RuleEngine::eliminate_stuck(&mut game, self.id) {
            drop(game);
            info!(player = %self.id, turns = self.stuck_turns, rank, "eliminated after failing to move");
            report.record(TurnEvent::Eliminated { rank });
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
