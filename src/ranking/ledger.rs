use log::debug;

use crate::domain::{ChallengeSets, Match, Player, Side};
use crate::errors::{LadderError, Result};

/// Apply a ladder game's points to its participants, given in match order.
/// Singles pay `score1` and `score2` to the two players; doubles pay the
/// full team score to every member, not a split.
pub fn apply_ladder_match(players: &mut [Player], score1: i32, score2: i32) -> Result<()> {
    match players {
        [first, second] => {
            first.points += score1;
            second.points += score2;
        }
        [a1, a2, b1, b2] => {
            a1.points += score1;
            a2.points += score1;
            b1.points += score2;
            b2.points += score2;
        }
        other => {
            return Err(LadderError::invalid_match(format!(
                "ladder games take 2 or 4 players, got {}",
                other.len()
            )));
        }
    }
    Ok(())
}

/// Apply a challenge match to its two participants. The winner does not take
/// the loser's score; when the winner trails on season points they are raised
/// to exactly the loser's total, and that margin is the match's points gained.
/// A winner already at or above the loser's total gains nothing.
///
/// Returns the margin, `None` when no catch-up happened. Both players'
/// challenge match counts advance either way.
pub fn apply_challenge_match(
    players: &mut [Player],
    sets: &ChallengeSets,
) -> Result<Option<i32>> {
    let [first, second] = players else {
        return Err(LadderError::invalid_match(format!(
            "challenge matches take exactly 2 players, got {}",
            players.len()
        )));
    };

    let winner_side = sets.winner()?;
    first.challenge_matches += 1;
    second.challenge_matches += 1;

    let (winner, loser) = match winner_side {
        Side::First => (first, second),
        Side::Second => (second, first),
    };

    if winner.points >= loser.points {
        debug!(
            "Challenge winner {} already at {} points (loser at {}), no catch-up",
            winner.name, winner.points, loser.points
        );
        return Ok(None);
    }

    let margin = loser.points - winner.points;
    winner.points = loser.points;
    winner.challenge_points += margin;
    debug!(
        "Challenge winner {} caught up {} points to {}",
        winner.name, margin, winner.points
    );
    Ok(Some(margin))
}

/// Undo a persisted match's point effects on its participants, given in any
/// order. Ladder games subtract the recorded team scores; challenge matches
/// subtract the recorded margin from the winner, recomputing the winner from
/// the stored set scores rather than from current player state.
pub fn reverse_match(recorded: &Match, players: &mut [Player]) -> Result<()> {
    if recorded.is_challenge {
        reverse_challenge(recorded, players)
    } else {
        reverse_ladder(recorded, players)
    }
}

fn reverse_ladder(recorded: &Match, players: &mut [Player]) -> Result<()> {
    for (id, delta) in recorded.ladder_contributions()? {
        let player = players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(LadderError::PlayerNotFound { id })?;
        player.points -= delta;
    }
    Ok(())
}

fn reverse_challenge(recorded: &Match, players: &mut [Player]) -> Result<()> {
    let sets = recorded.challenge_sets().ok_or_else(|| {
        LadderError::invalid_match(format!(
            "challenge match {} has no second set on record",
            recorded.id
        ))
    })?;
    let winner_id = recorded
        .player_on(sets.winner()?)
        .ok_or_else(|| LadderError::invalid_match("challenge match without participants"))?;

    // The recorded margin is the only safe delta: current totals may have
    // drifted since this match was scored.
    let gained = recorded.points_gained.unwrap_or(0);

    for player in players.iter_mut() {
        if recorded.players.contains(&player.id) {
            player.challenge_matches = player.challenge_matches.saturating_sub(1);
        }
        if player.id == winner_id {
            player.points -= gained;
            player.challenge_points -= gained;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SetScore;

    fn player(id: i64, points: i32) -> Player {
        let mut p = Player::new(id, &format!("p{id}"), &format!("Player {id}"), None);
        p.points = points;
        p
    }

    fn sets(s1: (i32, i32), s2: (i32, i32), s3: Option<(i32, i32)>) -> ChallengeSets {
        ChallengeSets::new(
            SetScore::new(s1.0, s1.1),
            SetScore::new(s2.0, s2.1),
            s3.map(|(a, b)| SetScore::new(a, b)),
        )
    }

    #[test]
    fn singles_pay_each_side_its_own_score() {
        let mut players = vec![player(1, 0), player(2, 0)];
        apply_ladder_match(&mut players, 6, 3).unwrap();
        assert_eq!(players[0].points, 6);
        assert_eq!(players[1].points, 3);
    }

    #[test]
    fn doubles_pay_the_full_team_score_to_every_member() {
        let mut players = vec![player(1, 0), player(2, 0), player(3, 0), player(4, 0)];
        apply_ladder_match(&mut players, 6, 3).unwrap();
        let points: Vec<i32> = players.iter().map(|p| p.points).collect();
        assert_eq!(points, vec![6, 6, 3, 3]);
    }

    #[test]
    fn odd_participant_counts_are_rejected() {
        let mut players = vec![player(1, 0), player(2, 0), player(3, 0)];
        assert!(apply_ladder_match(&mut players, 6, 3).is_err());
    }

    #[test]
    fn challenge_winner_catches_up_to_the_loser() {
        let mut players = vec![player(1, 10), player(2, 25)];
        let margin =
            apply_challenge_match(&mut players, &sets((6, 3), (4, 6), Some((6, 2)))).unwrap();
        assert_eq!(margin, Some(15));
        assert_eq!(players[0].points, 25);
        assert_eq!(players[0].challenge_points, 15);
        assert_eq!(players[1].points, 25);
        assert_eq!(players[1].challenge_points, 0);
        assert_eq!(players[0].challenge_matches, 1);
        assert_eq!(players[1].challenge_matches, 1);
    }

    #[test]
    fn challenge_winner_already_ahead_gains_nothing() {
        let mut players = vec![player(1, 30), player(2, 25)];
        let margin = apply_challenge_match(&mut players, &sets((6, 3), (6, 4), None)).unwrap();
        assert_eq!(margin, None);
        assert_eq!(players[0].points, 30);
        assert_eq!(players[0].challenge_points, 0);
        assert_eq!(players[0].challenge_matches, 1);
        assert_eq!(players[1].challenge_matches, 1);
    }

    #[test]
    fn challenge_at_equal_points_gains_nothing() {
        let mut players = vec![player(1, 25), player(2, 25)];
        let margin = apply_challenge_match(&mut players, &sets((6, 3), (6, 4), None)).unwrap();
        assert_eq!(margin, None);
        assert_eq!(players[0].points, 25);
    }

    #[test]
    fn reversing_a_ladder_match_subtracts_the_recorded_scores() {
        let mut players = vec![player(1, 6), player(2, 3)];
        let recorded = Match {
            id: 1,
            week_id: 1,
            players: vec![1, 2],
            is_challenge: false,
            score1: 6,
            score2: 3,
            set2: None,
            set3: None,
            points_gained: None,
        };
        reverse_match(&recorded, &mut players).unwrap();
        assert_eq!(players[0].points, 0);
        assert_eq!(players[1].points, 0);
    }

    #[test]
    fn reversing_a_challenge_uses_the_recorded_margin_despite_drift() {
        // Scored when the winner trailed by 15; both totals moved since.
        let recorded = Match {
            id: 7,
            week_id: 1,
            players: vec![1, 2],
            is_challenge: true,
            score1: 6,
            score2: 3,
            set2: Some(SetScore::new(6, 4)),
            set3: None,
            points_gained: Some(15),
        };
        let mut players = vec![player(1, 31), player(2, 40)];
        players[0].challenge_points = 15;
        players[0].challenge_matches = 1;
        players[1].challenge_matches = 1;

        reverse_match(&recorded, &mut players).unwrap();
        assert_eq!(players[0].points, 16);
        assert_eq!(players[0].challenge_points, 0);
        assert_eq!(players[0].challenge_matches, 0);
        assert_eq!(players[1].points, 40);
        assert_eq!(players[1].challenge_matches, 0);
    }

    #[test]
    fn reversing_a_challenge_with_no_recorded_gain_only_drops_the_count() {
        let recorded = Match {
            id: 8,
            week_id: 1,
            players: vec![1, 2],
            is_challenge: true,
            score1: 6,
            score2: 3,
            set2: Some(SetScore::new(6, 4)),
            set3: None,
            points_gained: None,
        };
        let mut players = vec![player(1, 30), player(2, 25)];
        players[0].challenge_matches = 1;
        players[1].challenge_matches = 1;

        reverse_match(&recorded, &mut players).unwrap();
        assert_eq!(players[0].points, 30);
        assert_eq!(players[1].points, 25);
        assert_eq!(players[0].challenge_matches, 0);
    }
}
