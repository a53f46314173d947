use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::domain::{Match, Player, PlayerId, SetScore, Side, Week};
use crate::errors::{LadderError, Result};
use crate::ranking::standings::weekly_points;

/// One row of a ratio leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatEntry {
    pub player: String,
    pub value: f64,
}

/// One row of a counting leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub player: String,
    pub count: u32,
}

/// A single player-week total on the best-weeks board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekHighlight {
    pub player: String,
    pub week: u32,
    pub points: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DuelRecord {
    pub played: u32,
    pub first_wins: u32,
    pub second_wins: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamRecord {
    pub played: u32,
    pub won_together: u32,
}

/// Singles, doubles-as-opponents and doubles-as-teammates breakdown for a
/// pair of players.
#[derive(Debug, Clone, Serialize)]
pub struct HeadToHeadReport {
    pub first: String,
    pub second: String,
    pub singles: DuelRecord,
    pub doubles_opposed: DuelRecord,
    pub doubles_together: TeamRecord,
}

/// Matches each player took part in, challenge games included.
pub fn match_counts(matches: &[Match]) -> HashMap<PlayerId, u32> {
    let mut counts = HashMap::new();
    for recorded in matches {
        for &id in &recorded.players {
            *counts.entry(id).or_insert(0) += 1;
        }
    }
    counts
}

/// Season points excluding challenge catch-ups, per match played. Players
/// with no matches score 0 rather than dividing by zero.
pub fn points_per_game(players: &[Player], matches: &[Match]) -> Vec<StatEntry> {
    let counts = match_counts(matches);
    let mut entries: Vec<StatEntry> = players
        .iter()
        .map(|p| {
            let played = counts.get(&p.id).copied().unwrap_or(0);
            let value = if played == 0 {
                0.0
            } else {
                round2(f64::from(p.points - p.challenge_points) / f64::from(played))
            };
            StatEntry {
                player: p.name.clone(),
                value,
            }
        })
        .collect();
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries
}

/// Share of ladder games won, as a percentage. Challenge matches are left
/// out of both sides of the ratio.
pub fn win_percentage(players: &[Player], matches: &[Match]) -> Vec<StatEntry> {
    let mut entries: Vec<StatEntry> = players
        .iter()
        .map(|p| {
            let mut played = 0u32;
            let mut wins = 0u32;
            for recorded in matches.iter().filter(|m| !m.is_challenge) {
                let Some(side) = recorded.side_of(p.id) else {
                    continue;
                };
                played += 1;
                let (own, opponent) = recorded.scores_for(side);
                if own > opponent {
                    wins += 1;
                }
            }
            let value = if played == 0 {
                0.0
            } else {
                round1(f64::from(wins) * 100.0 / f64::from(played))
            };
            StatEntry {
                player: p.name.clone(),
                value,
            }
        })
        .collect();
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries
}

/// Best single-week ladder hauls across all player-week pairs. The scan
/// walks score values downward and takes whole tie groups, so the board can
/// run past `top_n` when the last value is shared. Idle player-weeks never
/// qualify: the scan stops above zero, leaving a sparse season with a short
/// board rather than one padded with zero rows.
pub fn most_points_in_a_week(
    players: &[Player],
    weeks: &[Week],
    matches: &[Match],
    top_n: usize,
) -> Result<Vec<WeekHighlight>> {
    let ladder_games: Vec<Match> = matches
        .iter()
        .filter(|m| !m.is_challenge)
        .cloned()
        .collect();
    let weekly = weekly_points(players, weeks, &ladder_games)?;

    let values: BTreeSet<i32> = weekly
        .values()
        .flat_map(|row| row.values().copied())
        .collect();

    let mut highlights = Vec::new();
    for &value in values.iter().rev().filter(|&&v| v > 0) {
        for (&week, row) in &weekly {
            for p in players {
                if row.get(&p.id) == Some(&value) {
                    highlights.push(WeekHighlight {
                        player: p.name.clone(),
                        week,
                        points: value,
                    });
                }
            }
        }
        if highlights.len() >= top_n {
            break;
        }
    }
    Ok(highlights)
}

/// How often each player's side put up exactly the bagel score in a ladder
/// game, wins and losses alike.
pub fn bagel_count(players: &[Player], matches: &[Match], bagel_score: i32) -> Vec<CountEntry> {
    let mut entries: Vec<CountEntry> = players
        .iter()
        .map(|p| {
            let count = matches
                .iter()
                .filter(|m| !m.is_challenge)
                .filter_map(|m| m.side_of(p.id).map(|side| m.scores_for(side)))
                .filter(|&(own, _)| own == bagel_score)
                .count() as u32;
            CountEntry {
                player: p.name.clone(),
                count,
            }
        })
        .collect();
    entries.sort_by_key(|e| Reverse(e.count));
    entries
}

/// Break down every match the two players shared. Challenge matches land in
/// the singles bucket with the winner read from the stored sets; ladder
/// results compare side scores, with a drawn score counting as played but
/// won by neither. Teammate games count for both players whichever side
/// they stood on.
pub fn head_to_head(first: &Player, second: &Player, matches: &[Match]) -> Result<HeadToHeadReport> {
    let mut report = HeadToHeadReport {
        first: first.name.clone(),
        second: second.name.clone(),
        singles: DuelRecord::default(),
        doubles_opposed: DuelRecord::default(),
        doubles_together: TeamRecord::default(),
    };

    for recorded in matches {
        let (Some(first_side), Some(second_side)) =
            (recorded.side_of(first.id), recorded.side_of(second.id))
        else {
            continue;
        };

        if !recorded.is_doubles() {
            report.singles.played += 1;
            match winner_of(recorded)? {
                Some(side) if side == first_side => report.singles.first_wins += 1,
                Some(_) => report.singles.second_wins += 1,
                None => {}
            }
        } else if first_side == second_side {
            report.doubles_together.played += 1;
            if winner_of(recorded)? == Some(first_side) {
                report.doubles_together.won_together += 1;
            }
        } else {
            report.doubles_opposed.played += 1;
            match winner_of(recorded)? {
                Some(side) if side == first_side => report.doubles_opposed.first_wins += 1,
                Some(_) => report.doubles_opposed.second_wins += 1,
                None => {}
            }
        }
    }

    Ok(report)
}

/// Winning side of a match, `None` for a drawn ladder score. Challenge
/// matches always have a winner since tied sets never enter the ledger.
fn winner_of(recorded: &Match) -> Result<Option<Side>> {
    if recorded.is_challenge {
        let sets = recorded.challenge_sets().ok_or_else(|| {
            LadderError::invalid_match(format!(
                "challenge match {} has no second set on record",
                recorded.id
            ))
        })?;
        Ok(Some(sets.winner()?))
    } else if recorded.score1 == recorded.score2 {
        Ok(None)
    } else {
        Ok(Some(SetScore::new(recorded.score1, recorded.score2).winner()))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: i64, name: &str, points: i32, challenge_points: i32) -> Player {
        let mut p = Player::new(id, name, name, None);
        p.points = points;
        p.challenge_points = challenge_points;
        p
    }

    fn ladder(id: i64, week_id: i64, players: Vec<i64>, score1: i32, score2: i32) -> Match {
        Match {
            id,
            week_id,
            players,
            is_challenge: false,
            score1,
            score2,
            set2: None,
            set3: None,
            points_gained: None,
        }
    }

    fn challenge(id: i64, week_id: i64, players: Vec<i64>, gained: Option<i32>) -> Match {
        Match {
            id,
            week_id,
            players,
            is_challenge: true,
            score1: 6,
            score2: 3,
            set2: Some(SetScore::new(6, 4)),
            set3: None,
            points_gained: gained,
        }
    }

    fn week(id: i64, number: u32) -> Week {
        Week {
            id,
            number,
            first_saturday: format!("{:02} June", number),
            year_id: 1,
        }
    }

    #[test]
    fn points_per_game_strips_challenge_points_and_rounds() {
        let players = vec![player(1, "anna", 20, 5), player(2, "bartek", 0, 0)];
        let matches = vec![
            ladder(1, 1, vec![1, 3], 6, 3),
            ladder(2, 1, vec![1, 3], 4, 6),
            challenge(3, 1, vec![1, 3], Some(5)),
        ];

        let board = points_per_game(&players, &matches);
        assert_eq!(board[0].player, "anna");
        assert_eq!(board[0].value, 5.0);
        assert_eq!(board[1].player, "bartek");
        assert_eq!(board[1].value, 0.0);
    }

    #[test]
    fn win_percentage_ignores_challenge_matches() {
        let players = vec![player(1, "anna", 0, 0)];
        let matches = vec![
            ladder(1, 1, vec![1, 2], 6, 3),
            ladder(2, 1, vec![1, 2], 6, 4),
            ladder(3, 1, vec![2, 1], 6, 2),
            challenge(4, 1, vec![1, 2], None),
        ];

        let board = win_percentage(&players, &matches);
        assert_eq!(board[0].value, 66.7);
    }

    #[test]
    fn win_percentage_with_no_ladder_games_is_zero() {
        let players = vec![player(1, "anna", 0, 0)];
        let matches = vec![challenge(1, 1, vec![1, 2], None)];
        assert_eq!(win_percentage(&players, &matches)[0].value, 0.0);
    }

    #[test]
    fn best_weeks_keep_whole_tie_groups() {
        let players = vec![
            player(1, "anna", 0, 0),
            player(2, "bartek", 0, 0),
            player(3, "celina", 0, 0),
        ];
        let weeks = vec![week(1, 1)];
        let matches = vec![
            ladder(1, 1, vec![1, 2, 3, 4], 12, 8),
            ladder(2, 1, vec![3, 4], 0, 2),
        ];

        let board = most_points_in_a_week(&players, &weeks, &matches, 2).unwrap();
        assert_eq!(board[0].points, 12);
        assert_eq!(board[1].points, 12);
        let top: BTreeSet<&str> = board[..2].iter().map(|h| h.player.as_str()).collect();
        assert_eq!(top, BTreeSet::from(["anna", "bartek"]));
    }

    #[test]
    fn sparse_seasons_leave_the_best_week_board_short_of_zero_rows() {
        let players = vec![
            player(1, "anna", 0, 0),
            player(2, "bartek", 0, 0),
            player(3, "celina", 0, 0),
        ];
        let weeks = vec![week(1, 1), week(2, 2)];
        let matches = vec![ladder(1, 1, vec![1, 2], 6, 3)];

        let board = most_points_in_a_week(&players, &weeks, &matches, 10).unwrap();
        assert_eq!(board.len(), 2);
        assert!(board.iter().all(|h| h.points > 0));
        assert_eq!(board[0].player, "anna");
        assert_eq!(board[1].player, "bartek");
    }

    #[test]
    fn bagels_count_wins_and_losses_but_not_challenges() {
        let players = vec![player(1, "anna", 0, 0)];
        let matches = vec![
            ladder(1, 1, vec![1, 2], 5, 6),
            ladder(2, 1, vec![2, 1], 3, 5),
            ladder(3, 1, vec![1, 2], 6, 5),
            challenge(4, 1, vec![1, 2], None),
        ];

        let board = bagel_count(&players, &matches, 5);
        assert_eq!(board[0].count, 2);
    }

    #[test]
    fn head_to_head_partitions_by_bucket_and_side() {
        let anna = player(1, "anna", 0, 0);
        let bartek = player(2, "bartek", 0, 0);
        let matches = vec![
            ladder(1, 1, vec![1, 2], 6, 3),
            challenge(2, 1, vec![2, 1], None),
            ladder(3, 1, vec![1, 3, 2, 4], 2, 6),
            ladder(4, 1, vec![1, 2, 3, 4], 6, 4),
            ladder(5, 1, vec![3, 4, 1, 2], 6, 2),
        ];

        let report = head_to_head(&anna, &bartek, &matches).unwrap();
        assert_eq!(report.singles.played, 2);
        assert_eq!(report.singles.first_wins, 1);
        assert_eq!(report.singles.second_wins, 1);
        assert_eq!(report.doubles_opposed.played, 1);
        assert_eq!(report.doubles_opposed.second_wins, 1);
        assert_eq!(report.doubles_together.played, 2);
        assert_eq!(report.doubles_together.won_together, 1);
    }

    #[test]
    fn drawn_ladder_scores_count_as_played_but_won_by_neither() {
        let anna = player(1, "anna", 0, 0);
        let bartek = player(2, "bartek", 0, 0);
        let matches = vec![
            ladder(1, 1, vec![1, 2], 6, 6),
            ladder(2, 1, vec![1, 3, 2, 4], 5, 5),
            ladder(3, 1, vec![1, 2, 3, 4], 4, 4),
        ];

        let report = head_to_head(&anna, &bartek, &matches).unwrap();
        assert_eq!(report.singles.played, 1);
        assert_eq!(report.singles.first_wins, 0);
        assert_eq!(report.singles.second_wins, 0);
        assert_eq!(report.doubles_opposed.played, 1);
        assert_eq!(report.doubles_opposed.first_wins, 0);
        assert_eq!(report.doubles_opposed.second_wins, 0);
        assert_eq!(report.doubles_together.played, 1);
        assert_eq!(report.doubles_together.won_together, 0);
    }
}
