//! Property checks for the rule engine and snapshots.

use proptest::prelude::*;

use ludo_race::core::{GameSnapshot, GameState, PlayerId, TokenPos, TokenRef};
use ludo_race::rules::RuleEngine;

const TOKENS: usize = 2;

fn arb_snapshot() -> impl Strategy<Value = GameSnapshot> {
    (
        any::<bool>(),
        prop::collection::vec(prop::collection::vec(-1i16..=52, TOKENS), 4),
        prop::collection::vec(0u32..2, 4),
    )
        .prop_map(|(team_mode, positions, captures)| {
            let mut snapshot = GameSnapshot::fresh(TOKENS, team_mode);
            for ((player, positions), captures) in snapshot.players.iter_mut().zip(positions).zip(captures) {
                player.positions = positions;
                player.capture_count = captures;
            }
            snapshot
        })
}

fn arb_token() -> impl Strategy<Value = TokenRef> {
    (0u8..4, 0u8..TOKENS as u8).prop_map(|(p, i)| TokenRef::new(PlayerId::new(p), i))
}

fn yard_count(state: &GameState) -> usize {
    state
        .players()
        .flat_map(|p| p.tokens().iter())
        .filter(|t| t.is_yard())
        .count()
}

proptest! {
    #[test]
    fn illegal_move_is_a_no_op(snapshot in arb_snapshot(), token in arb_token(), roll in 0u8..=7) {
        let mut state = GameState::from_snapshot(&snapshot).unwrap();
        let before = state.snapshot();

        if RuleEngine::plan_move(&state, token, roll).is_err() {
            prop_assert!(RuleEngine::apply_move(&mut state, token, roll).is_err());
            prop_assert_eq!(state.snapshot(), before);
        }
    }

    #[test]
    fn capture_affects_at_most_one_token(snapshot in arb_snapshot(), token in arb_token(), roll in 1u8..=6) {
        let mut state = GameState::from_snapshot(&snapshot).unwrap();
        let credits = state.player(token.player).capture_count();
        let yard_before = yard_count(&state);
        let from = state.player(token.player).token(token.index as usize);

        if let Ok(outcome) = RuleEngine::apply_move(&mut state, token, roll) {
            let entered = usize::from(from == Some(TokenPos::Yard));
            match outcome.capture {
                Some(capture) => {
                    prop_assert_eq!(state.player(token.player).capture_count(), credits + 1);
                    prop_assert_eq!(yard_count(&state) + entered, yard_before + 1);
                    let victim = state.player(capture.victim.player).token(capture.victim.index as usize);
                    prop_assert_eq!(victim, Some(TokenPos::Yard));
                }
                None => {
                    prop_assert_eq!(state.player(token.player).capture_count(), credits);
                    prop_assert_eq!(yard_count(&state) + entered, yard_before);
                }
            }
        }
    }

    #[test]
    fn snapshot_round_trip_keeps_occupancy(snapshot in arb_snapshot()) {
        let state = GameState::from_snapshot(&snapshot).unwrap();
        let bytes = state.snapshot().encode().unwrap();
        let restored = GameState::from_snapshot(&GameSnapshot::decode(&bytes).unwrap()).unwrap();

        prop_assert_eq!(restored.snapshot(), state.snapshot());
        prop_assert_eq!(restored.board_view().tokens, state.board_view().tokens);
    }

    #[test]
    fn random_play_keeps_invariants(
        team_mode in any::<bool>(),
        turns in prop::collection::vec((0u8..4, 1u8..=6), 1..400),
    ) {
        let mut state = GameState::from_snapshot(&GameSnapshot::fresh(TOKENS, team_mode)).unwrap();

        for (player, roll) in turns {
            if state.is_over() {
                break;
            }
            let id = PlayerId::new(player);
            let outcome = RuleEngine::play_roll(&mut state, id, roll);

            if let Some(moved) = outcome.moved {
                let plan = moved.plan;
                match (plan.from, plan.to) {
                    (TokenPos::Yard, to) => {
                        prop_assert_eq!(to, TokenPos::Track(0));
                    }
                    (TokenPos::Track(a), TokenPos::Track(b)) => {
                        prop_assert!(b > a || plan.wrapped);
                    }
                    (TokenPos::Track(_), TokenPos::Home) => {}
                    other => {
                        prop_assert!(false, "unexpected move {:?}", other);
                    }
                }
            }
            if let Err(violation) = state.check_invariants() {
                prop_assert!(false, "{}", violation);
            }
        }
    }
}
