//! The turn coordinator.
//!
//! One coordinator owns the round-robin. It walks the seating order, skips
//! players that can no longer play, and grants exactly one turn at a time
//! over the chosen actor's channel. Each grant carries its own reply
//! channel; the coordinator blocks on it, so no two actors are ever inside
//! a turn together and nobody plays twice in a row while two or more
//! players remain.
//!
//! When the game ends (or the turn cap is reached) every actor is sent
//! [`TurnSignal::Shutdown`].

use std::sync::mpsc::{self, Sender, SyncSender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::actor::TurnReport;
use crate::controller::Renderer;
use crate::core::{GameError, GameState, PlayerId};

/// Message from the coordinator to one actor.
#[derive(Debug)]
pub enum TurnSignal {
    /// Play one turn and send the report back.
    Grant { reply: SyncSender<TurnReport> },
    /// The game is over; exit.
    Shutdown,
}

/// How the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEnd {
    /// Fewer than two players left, or a team won.
    Completed,
    /// The turn cap was reached first.
    TurnLimit,
}

/// Everything the coordinator observed.
#[derive(Clone, Debug)]
pub struct TurnLog {
    /// Reports in the order turns were played.
    pub reports: im::Vector<TurnReport>,
    pub ended_by: GameEnd,
}

impl TurnLog {
    /// Acting player of every turn, in order.
    pub fn acting_order(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.reports.iter().map(|r| r.player)
    }
}

/// An actor's grant channel, in seating order.
#[derive(Debug)]
pub struct Seat {
    pub player: PlayerId,
    pub grants: Sender<TurnSignal>,
}

/// Drives the round-robin.
pub struct TurnCoordinator {
    game: Arc<Mutex<GameState>>,
    seats: Vec<Seat>,
    last_acted: Option<usize>,
    max_turns: u64,
    turn_delay: Duration,
}

impl TurnCoordinator {
    pub fn new(game: Arc<Mutex<GameState>>, seats: Vec<Seat>, max_turns: u64, turn_delay: Duration) -> Self {
        Self {
            game,
            seats,
            last_acted: None,
            max_turns,
            turn_delay,
        }
    }

    /// Run the game to completion, then shut every actor down.
    pub fn run(mut self, renderer: &mut dyn Renderer) -> Result<TurnLog, GameError> {
        let result = self.drive(renderer);
        self.shutdown();
        result
    }

    fn drive(&mut self, renderer: &mut dyn Renderer) -> Result<TurnLog, GameError> {
        let mut reports = im::Vector::new();
        let mut turns = 0u64;

        let ended_by = loop {
            let Some(seat) = self.next_seat() else {
                break GameEnd::Completed;
            };
            if turns >= self.max_turns {
                warn!(turns, "turn limit reached, ending game");
                self.lock().finish_game();
                break GameEnd::TurnLimit;
            }

            let report = self.grant(seat)?;
            turns += 1;
            self.last_acted = Some(seat);

            let view = self.lock().board_view();
            renderer.render(&view, &report);
            reports.push_back(report);

            if !self.turn_delay.is_zero() {
                thread::sleep(self.turn_delay);
            }
        };

        info!(turns, ?ended_by, "round-robin finished");
        Ok(TurnLog { reports, ended_by })
    }

    /// Next seat after the last one that acted whose player may still play.
    ///
    /// The last actor is only picked again when nobody else is eligible.
    fn next_seat(&self) -> Option<usize> {
        let game = self.lock();
        if game.is_over() || self.seats.is_empty() {
            return None;
        }
        let n = self.seats.len();
        let start = self.last_acted.map_or(0, |last| last + 1);
        (0..n)
            .map(|offset| (start + offset) % n)
            .find(|&seat| game.is_schedulable(self.seats[seat].player))
    }

    fn grant(&self, seat: usize) -> Result<TurnReport, GameError> {
        let player = self.seats[seat].player;
        let (reply, response) = mpsc::sync_channel(1);

        debug!(%player, "granting turn");
        self.seats[seat]
            .grants
            .send(TurnSignal::Grant { reply })
            .map_err(|_| GameError::ActorLost(player))?;
        response.recv().map_err(|_| GameError::ActorLost(player))
    }

    fn shutdown(&mut self) {
        for seat in self.seats.drain(..) {
            // An actor that already exited has dropped its receiver.
            let _ = seat.grants.send(TurnSignal::Shutdown);
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
