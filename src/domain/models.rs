use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::scoring::{ChallengeSets, Side};
use crate::errors::{LadderError, Result};

pub type PlayerId = i64;
pub type MatchId = i64;
pub type WeekId = i64;
pub type YearId = i64;

/// A ladder member. `points` carries the season total including challenge
/// catch-ups; `position`/`shift` are whatever the last standings refresh
/// wrote back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub full_name: String,
    pub rank: Option<u8>,
    pub points: i32,
    pub challenge_points: i32,
    pub challenge_matches: u32,
    pub position: Option<u32>,
    pub shift: i32,
}

impl Player {
    pub fn new(id: PlayerId, name: &str, full_name: &str, rank: Option<u8>) -> Self {
        Self {
            id,
            name: name.to_string(),
            full_name: full_name.to_string(),
            rank,
            points: 0,
            challenge_points: 0,
            challenge_matches: 0,
            position: None,
            shift: 0,
        }
    }
}

/// One recorded set, first participant's games then the second's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub first: i32,
    pub second: i32,
}

impl SetScore {
    pub fn new(first: i32, second: i32) -> Self {
        Self { first, second }
    }

    pub fn winner(&self) -> Side {
        if self.first > self.second {
            Side::First
        } else {
            Side::Second
        }
    }
}

impl fmt::Display for SetScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

impl FromStr for SetScore {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (first, second) = s
            .split_once('-')
            .ok_or_else(|| format!("expected a set score like 6-3, got \"{s}\""))?;
        let first = first
            .trim()
            .parse()
            .map_err(|_| format!("invalid games count \"{first}\""))?;
        let second = second
            .trim()
            .parse()
            .map_err(|_| format!("invalid games count \"{second}\""))?;
        Ok(Self { first, second })
    }
}

/// A recorded match. Participant order is significant: two entries for
/// singles and challenge matches, four for doubles where the first two are
/// team A and the last two team B. `score1`/`score2` hold the team scores
/// for ladder games and the set-1 scores for challenge matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub week_id: WeekId,
    pub players: Vec<PlayerId>,
    pub is_challenge: bool,
    pub score1: i32,
    pub score2: i32,
    pub set2: Option<SetScore>,
    pub set3: Option<SetScore>,
    pub points_gained: Option<i32>,
}

impl Match {
    pub fn is_doubles(&self) -> bool {
        self.players.len() == 4
    }

    /// Which side a participant stood on, by position in the participant
    /// list. `None` when the player was not part of the match.
    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        let idx = self.players.iter().position(|&p| p == player)?;
        if idx < self.players.len() / 2 {
            Some(Side::First)
        } else {
            Some(Side::Second)
        }
    }

    /// (own score, opposing score) as seen from `side`.
    pub fn scores_for(&self, side: Side) -> (i32, i32) {
        match side {
            Side::First => (self.score1, self.score2),
            Side::Second => (self.score2, self.score1),
        }
    }

    pub fn player_on(&self, side: Side) -> Option<PlayerId> {
        let idx = match side {
            Side::First => 0,
            Side::Second => 1,
        };
        self.players.get(idx).copied()
    }

    /// Recorded sets of a challenge match, `None` for ladder games or when
    /// the mandatory second set was never stored.
    pub fn challenge_sets(&self) -> Option<ChallengeSets> {
        if !self.is_challenge {
            return None;
        }
        let set2 = self.set2?;
        Some(ChallengeSets {
            set1: SetScore::new(self.score1, self.score2),
            set2,
            set3: self.set3,
        })
    }

    /// Per-player point gains of a ladder game: singles pay `score1`/`score2`
    /// to the two participants, doubles pay the full team score to every
    /// member of the team.
    pub fn ladder_contributions(&self) -> Result<Vec<(PlayerId, i32)>> {
        if self.is_challenge {
            return Err(LadderError::invalid_match(
                "challenge matches do not pay ladder scores",
            ));
        }
        match self.players.as_slice() {
            [first, second] => Ok(vec![(*first, self.score1), (*second, self.score2)]),
            [a1, a2, b1, b2] => Ok(vec![
                (*a1, self.score1),
                (*a2, self.score1),
                (*b1, self.score2),
                (*b2, self.score2),
            ]),
            other => Err(LadderError::invalid_match(format!(
                "expected 2 or 4 participants, got {}",
                other.len()
            ))),
        }
    }
}

/// Match data as handed to the store; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub week_id: WeekId,
    pub players: Vec<PlayerId>,
    pub is_challenge: bool,
    pub score1: i32,
    pub score2: i32,
    pub set2: Option<SetScore>,
    pub set3: Option<SetScore>,
    pub points_gained: Option<i32>,
}

impl NewMatch {
    pub fn ladder(week_id: WeekId, players: Vec<PlayerId>, score1: i32, score2: i32) -> Self {
        Self {
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

    pub fn challenge(
        week_id: WeekId,
        first: PlayerId,
        second: PlayerId,
        sets: &ChallengeSets,
        points_gained: Option<i32>,
    ) -> Self {
        Self {
            week_id,
            players: vec![first, second],
            is_challenge: true,
            score1: sets.set1.first,
            score2: sets.set1.second,
            set2: Some(sets.set2),
            set3: sets.set3,
            points_gained,
        }
    }
}

/// One ladder week. Matches played between two Saturdays share a week; the
/// label names the Saturday the week started on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Week {
    pub id: WeekId,
    pub number: u32,
    pub first_saturday: String,
    pub year_id: YearId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Year {
    pub id: YearId,
    pub year: i32,
}
