//! Final standings.

use serde::{Deserialize, Serialize};

use crate::core::{Color, GameState, PlayerId, TeamId};

/// One player's result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub player: PlayerId,
    pub color: Color,
    pub rank: Option<u8>,
    pub captures: u32,
    pub finished: usize,
    pub num_tokens: usize,
    pub team: Option<TeamId>,
}

/// Team aggregate: the best member rank and the members' combined captures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team: TeamId,
    pub members: [PlayerId; 2],
    pub rank: Option<u8>,
    pub captures: u32,
}

/// Players sorted by rank (unranked last, then seat); teams likewise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub players: Vec<PlayerStanding>,
    /// Empty unless the game was played in team mode.
    pub teams: Vec<TeamStanding>,
}

impl Standings {
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let mut players: Vec<PlayerStanding> = state
            .players()
            .map(|p| PlayerStanding {
                player: p.id(),
                color: p.color(),
                rank: p.rank(),
                captures: p.capture_count(),
                finished: p.finished_count(),
                num_tokens: p.num_tokens(),
                team: p.team(),
            })
            .collect();
        players.sort_by_key(|s| (s.rank.is_none(), s.rank, s.player));

        let mut teams: Vec<TeamStanding> = if state.team_mode() {
            TeamId::all()
                .map(|team| {
                    let members = team.members();
                    let rank = members.iter().filter_map(|&m| state.player(m).rank()).min();
                    let captures = members.iter().map(|&m| state.player(m).capture_count()).sum();
                    TeamStanding {
                        team,
                        members,
                        rank,
                        captures,
                    }
                })
                .collect()
        } else {
            Vec::new()
        };
        teams.sort_by_key(|t| (t.rank.is_none(), t.rank, t.team));

        Self { players, teams }
    }

    /// Rank 1 player, or the lowest seat among several sharing it.
    #[must_use]
    pub fn winner(&self) -> Option<&PlayerStanding> {
        self.players.first().filter(|s| s.rank == Some(1))
    }

    /// The team holding rank 1, in team mode.
    #[must_use]
    pub fn winning_team(&self) -> Option<&TeamStanding> {
        self.teams.first().filter(|t| t.rank == Some(1))
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&PlayerStanding> {
        self.players.iter().find(|s| s.player == player)
    }
}

impl std::fmt::Display for Standings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Final rankings:")?;
        for s in &self.players {
            let rank = s.rank.map_or_else(|| "-".to_string(), |r| r.to_string());
            write!(
                f,
                "  {rank:>2}. {:<6} ({}) tokens home {}/{}, captures {}",
                s.color,
                s.color.symbol(),
                s.finished,
                s.num_tokens,
                s.captures
            )?;
            if let Some(team) = s.team {
                write!(f, ", {team}")?;
            }
            writeln!(f)?;
        }
        if !self.teams.is_empty() {
            writeln!(f, "Team results:")?;
            if let Some(t) = self.winning_team() {
                writeln!(f, "  Winning team: {} ({} + {})", t.team, t.members[0], t.members[1])?;
            }
            for t in &self.teams {
                let rank = t.rank.map_or_else(|| "-".to_string(), |r| r.to_string());
                writeln!(
                    f,
                    "  {rank:>2}. {} ({} + {}) captures {}",
                    t.team, t.members[0], t.members[1], t.captures
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameSnapshot;

    #[test]
    fn test_sorted_by_rank() {
        let mut snapshot = GameSnapshot::fresh(1, false);
        snapshot.current_rank = 3;
        snapshot.players[2].positions = vec![52];
        snapshot.players[2].active = false;
        snapshot.players[2].rank = Some(1);
        snapshot.players[2].capture_count = 2;
        snapshot.players[0].active = false;
        snapshot.players[0].rank = Some(2);
        let state = GameState::from_snapshot(&snapshot).unwrap();

        let standings = Standings::from_state(&state);

        let order: Vec<u8> = standings.players.iter().map(|s| s.player.0).collect();
        assert_eq!(order, vec![2, 0, 1, 3]);
        assert_eq!(standings.winner().map(|s| s.color), Some(Color::Green));
        assert_eq!(standings.get(PlayerId::new(2)).map(|s| s.captures), Some(2));
        assert!(standings.teams.is_empty());
    }

    #[test]
    fn test_team_aggregates() {
        let mut snapshot = GameSnapshot::fresh(1, true);
        snapshot.current_rank = 3;
        for (p, rank, captures) in [(0, 2, 1), (1, 2, 0), (2, 1, 3), (3, 1, 1)] {
            snapshot.players[p].active = false;
            snapshot.players[p].rank = Some(rank);
            snapshot.players[p].capture_count = captures;
        }
        let state = GameState::from_snapshot(&snapshot).unwrap();

        let standings = Standings::from_state(&state);

        assert_eq!(standings.teams.len(), 2);
        assert_eq!(standings.teams[0].team, TeamId(1));
        assert_eq!(standings.teams[0].captures, 4);
        assert_eq!(standings.teams[1].rank, Some(2));
        assert_eq!(standings.teams[1].captures, 1);

        let report = standings.to_string();
        assert!(report.contains("Team results:"));
        assert!(report.contains("Team 2 (Green + Blue) captures 4"));
        assert_eq!(standings.winning_team().map(|t| t.team), Some(TeamId(1)));
        assert!(report.contains("Winning team: Team 2 (Green + Blue)"));
    }

    #[test]
    fn test_no_winning_team_line_in_solo() {
        let state = GameState::from_snapshot(&GameSnapshot::fresh(1, false)).unwrap();

        let standings = Standings::from_state(&state);

        assert!(standings.winning_team().is_none());
        assert!(!standings.to_string().contains("Winning team"));
    }
}
