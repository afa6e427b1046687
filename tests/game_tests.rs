//! Full games through the controller: threads, coordinator and rules together.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ludo_race::controller::{GameController, GameSummary, Renderer};
use ludo_race::core::{BoardView, GameConfig, PlayerId, TeamId};
use ludo_race::scheduler::{GameEnd, ScriptedDice, TurnEvent, TurnReport};

fn play(config: GameConfig) -> GameSummary {
    GameController::new(config).run().unwrap()
}

fn sorted_ranks(summary: &GameSummary) -> Vec<u8> {
    let mut ranks: Vec<u8> = summary.standings.players.iter().filter_map(|s| s.rank).collect();
    ranks.sort_unstable();
    ranks
}

#[test]
fn test_seeded_games_rank_everyone() {
    for seed in [1, 2, 3, 4] {
        let summary = play(GameConfig::new().with_tokens(2).with_seed(seed));

        assert_eq!(summary.ended_by, GameEnd::Completed, "seed {seed}");
        assert_eq!(sorted_ranks(&summary), vec![1, 2, 3, 4], "seed {seed}");
        assert!(summary.standings.winner().is_some());
    }
}

#[test]
fn test_adjacent_turns_differ() {
    let summary = play(GameConfig::new().with_tokens(2).with_seed(17));

    let order: Vec<PlayerId> = summary.history.iter().map(|r| r.player).collect();
    assert!(order.len() > 4);
    for pair in order.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn test_first_lap_follows_seating() {
    let summary = play(GameConfig::new().with_tokens(4).with_seed(23).with_max_turns(4));

    let first: Vec<PlayerId> = summary.history.iter().map(|r| r.player).collect();
    assert_eq!(first, summary.turn_order);

    let mut seats = summary.turn_order.clone();
    seats.sort();
    assert_eq!(seats, PlayerId::all(4).collect::<Vec<_>>());
}

#[test]
fn test_same_seed_same_game() {
    let config = GameConfig::new().with_tokens(2).with_seed(99);

    let a = play(config.clone());
    let b = play(config);

    assert_eq!(a.turn_order, b.turn_order);
    assert_eq!(a.history, b.history);
    assert_eq!(a.standings, b.standings);
}

#[test]
fn test_turn_limit_ranks_everyone() {
    let summary = play(GameConfig::new().with_seed(7).with_max_turns(10));

    assert_eq!(summary.ended_by, GameEnd::TurnLimit);
    assert_eq!(summary.turns, 10);
    assert_eq!(sorted_ranks(&summary), vec![1, 2, 3, 4]);
}

#[test]
fn test_team_game_completes() {
    let summary = play(GameConfig::new().with_tokens(1).with_team_mode(true).with_seed(12));

    assert_eq!(summary.ended_by, GameEnd::Completed);
    assert_eq!(summary.standings.teams.len(), 2);
    assert!(summary.standings.players.iter().all(|s| s.rank.is_some()));

    let team_won = summary
        .history
        .iter()
        .flat_map(|r| r.events.iter())
        .find_map(|e| match e {
            TurnEvent::Won { player, rank } => Some((*player, *rank)),
            _ => None,
        });
    if let Some((player, Some(1))) = team_won {
        let team = TeamId::of(player);
        for member in team.members() {
            assert_eq!(summary.standings.get(member).and_then(|s| s.rank), Some(1));
        }
        for member in team.opponent().members() {
            assert_eq!(summary.standings.get(member).and_then(|s| s.rank), Some(2));
        }
    }
}

#[test]
fn test_never_more_than_three_rolls_per_turn() {
    let summary = GameController::new(GameConfig::new().with_seed(1).with_max_turns(60))
        .with_dice(ScriptedDice::new([6]))
        .run()
        .unwrap();

    for report in &summary.history {
        assert!(report.rolls.len() <= 3, "{report:?}");
        if report.rolls.len() == 3 {
            assert!(report.was_forfeited());
        }
    }
}

struct CountingRenderer {
    turns: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
}

impl Renderer for CountingRenderer {
    fn render(&mut self, view: &BoardView, _report: &TurnReport) {
        assert!(view.tokens.len() <= 16);
        self.turns.fetch_add(1, Ordering::SeqCst);
    }

    fn game_over(&mut self, _summary: &GameSummary) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_renderer_sees_every_turn() {
    let turns = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));
    let renderer = CountingRenderer {
        turns: Arc::clone(&turns),
        finished: Arc::clone(&finished),
    };

    let summary = GameController::new(GameConfig::new().with_tokens(1).with_seed(31))
        .with_renderer(renderer)
        .run()
        .unwrap();

    assert_eq!(turns.load(Ordering::SeqCst), summary.turns);
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}
