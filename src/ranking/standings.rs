use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::domain::{Match, Player, PlayerId, Week};
use crate::errors::{LadderError, Result};

/// Points per player keyed by week number. Week numbers are the per-year
/// sequence the store assigns, so iteration order is season order.
pub type WeeklyPoints = BTreeMap<u32, HashMap<PlayerId, i32>>;

/// One ranked row of a standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingRow {
    pub player_id: PlayerId,
    pub points: i32,
    pub position: u32,
    pub shift: i32,
}

/// Points earned per player per week. Every roster player appears in every
/// week, at 0 when idle. Ladder games pay by the team-score formula; a
/// challenge match pays its recorded margin to the winner of that match
/// alone, with the winner read from the stored set scores.
pub fn weekly_points(
    players: &[Player],
    weeks: &[Week],
    matches: &[Match],
) -> Result<WeeklyPoints> {
    let week_numbers: HashMap<_, _> = weeks.iter().map(|w| (w.id, w.number)).collect();

    let zero_row: HashMap<PlayerId, i32> = players.iter().map(|p| (p.id, 0)).collect();
    let mut weekly: WeeklyPoints = weeks
        .iter()
        .map(|w| (w.number, zero_row.clone()))
        .collect();

    for recorded in matches {
        let number = week_numbers.get(&recorded.week_id).ok_or_else(|| {
            LadderError::invalid_match(format!(
                "match {} references week {} outside this year",
                recorded.id, recorded.week_id
            ))
        })?;
        let row = weekly.get_mut(number).ok_or_else(|| {
            LadderError::invalid_match(format!(
                "match {} references week {} outside this year",
                recorded.id, recorded.week_id
            ))
        })?;

        if recorded.is_challenge {
            let sets = recorded.challenge_sets().ok_or_else(|| {
                LadderError::invalid_match(format!(
                    "challenge match {} has no second set on record",
                    recorded.id
                ))
            })?;
            let winner = recorded
                .player_on(sets.winner()?)
                .ok_or_else(|| LadderError::invalid_match("challenge match without participants"))?;
            if let Some(earned) = row.get_mut(&winner) {
                *earned += recorded.points_gained.unwrap_or(0);
            }
        } else {
            for (id, delta) in recorded.ladder_contributions()? {
                if let Some(earned) = row.get_mut(&id) {
                    *earned += delta;
                }
            }
        }
    }

    Ok(weekly)
}

/// Running totals per week, with a week-0 row of zeros ahead of the first
/// real week. Totals are rebuilt from the weekly ledger, independently of
/// whatever `Player.points` currently holds.
pub fn cumulative_standings(players: &[Player], weekly: &WeeklyPoints) -> WeeklyPoints {
    let mut running: HashMap<PlayerId, i32> = players.iter().map(|p| (p.id, 0)).collect();
    let mut standings: WeeklyPoints = BTreeMap::new();
    standings.insert(0, running.clone());

    for (&number, earned) in weekly {
        for (id, total) in running.iter_mut() {
            *total += earned.get(id).copied().unwrap_or(0);
        }
        standings.insert(number, running.clone());
    }

    standings
}

/// Rank totals into positions and movement. Higher points rank first; equal
/// totals keep roster order (ascending id). Shift is previous position minus
/// current, so moving up reads positive. Players without a previous position
/// get shift 0.
pub fn rank_and_shift(
    current: &HashMap<PlayerId, i32>,
    previous: Option<&HashMap<PlayerId, i32>>,
) -> Vec<StandingRow> {
    let previous_positions: HashMap<PlayerId, u32> = previous
        .map(|totals| {
            order_by_points(totals)
                .into_iter()
                .enumerate()
                .map(|(idx, (id, _))| (id, idx as u32 + 1))
                .collect()
        })
        .unwrap_or_default();

    order_by_points(current)
        .into_iter()
        .enumerate()
        .map(|(idx, (player_id, points))| {
            let position = idx as u32 + 1;
            let shift = previous_positions
                .get(&player_id)
                .map(|&prev| prev as i32 - position as i32)
                .unwrap_or(0);
            StandingRow {
                player_id,
                points,
                position,
                shift,
            }
        })
        .collect()
}

fn order_by_points(totals: &HashMap<PlayerId, i32>) -> Vec<(PlayerId, i32)> {
    let mut rows: Vec<(PlayerId, i32)> = totals.iter().map(|(&id, &p)| (id, p)).collect();
    rows.sort_by_key(|&(id, points)| (Reverse(points), id));
    rows
}
