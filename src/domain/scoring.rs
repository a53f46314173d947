use serde::{Deserialize, Serialize};

use super::models::SetScore;
use crate::errors::{LadderError, Result};

/// The two sides of a match, in participant-list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

/// The recorded sets of a challenge match. Sets 1 and 2 are mandatory; the
/// third is only consulted when the first two split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeSets {
    pub set1: SetScore,
    pub set2: SetScore,
    pub set3: Option<SetScore>,
}

impl ChallengeSets {
    pub fn new(set1: SetScore, set2: SetScore, set3: Option<SetScore>) -> Self {
        Self { set1, set2, set3 }
    }

    /// Best-of-three winner. Sets 1 and 2 are tallied first; set 3 decides
    /// only a split, and is ignored entirely when one side already leads —
    /// even if scores for it were recorded.
    pub fn winner(&self) -> Result<Side> {
        let mut first = 0;
        let mut second = 0;
        for set in [self.set1, self.set2] {
            match set.winner() {
                Side::First => first += 1,
                Side::Second => second += 1,
            }
        }
        if first == second {
            let set3 = self.set3.ok_or_else(|| {
                LadderError::invalid_match("split after two sets but no third set recorded")
            })?;
            match set3.winner() {
                Side::First => first += 1,
                Side::Second => second += 1,
            }
        }
        if first > second {
            Ok(Side::First)
        } else {
            Ok(Side::Second)
        }
    }

    pub fn all(&self) -> Vec<SetScore> {
        let mut sets = vec![self.set1, self.set2];
        if let Some(set3) = self.set3 {
            sets.push(set3);
        }
        sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(s1: (i32, i32), s2: (i32, i32), s3: Option<(i32, i32)>) -> ChallengeSets {
        ChallengeSets::new(
            SetScore::new(s1.0, s1.1),
            SetScore::new(s2.0, s2.1),
            s3.map(|(a, b)| SetScore::new(a, b)),
        )
    }

    #[test]
    fn straight_sets_decide_without_a_third() {
        assert_eq!(sets((6, 3), (6, 4), None).winner().unwrap(), Side::First);
        assert_eq!(sets((3, 6), (4, 6), None).winner().unwrap(), Side::Second);
    }

    #[test]
    fn split_goes_to_the_third_set() {
        assert_eq!(
            sets((6, 3), (4, 6), Some((6, 2))).winner().unwrap(),
            Side::First
        );
        assert_eq!(
            sets((6, 3), (4, 6), Some((2, 6))).winner().unwrap(),
            Side::Second
        );
    }

    #[test]
    fn third_set_is_ignored_when_already_decided() {
        // Recorded but irrelevant: the first two sets already settle it.
        assert_eq!(
            sets((6, 3), (6, 4), Some((0, 6))).winner().unwrap(),
            Side::First
        );
    }

    #[test]
    fn split_without_third_set_is_invalid() {
        assert!(sets((6, 3), (4, 6), None).winner().is_err());
    }
}
