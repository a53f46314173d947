use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::LadderStore;
use crate::domain::{Match, MatchId, NewMatch, Player, PlayerId, Week, WeekId, Year, YearId};
use crate::errors::{LadderError, Result};

/// In-memory backing store. The whole thing serializes to JSON, which is
/// what the snapshot module reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    players: Vec<Player>,
    matches: Vec<Match>,
    weeks: Vec<Week>,
    years: Vec<Year>,
    next_player_id: PlayerId,
    next_match_id: MatchId,
    next_week_id: WeekId,
    next_year_id: YearId,
    #[serde(default)]
    revision: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            matches: Vec::new(),
            weeks: Vec::new(),
            years: Vec::new(),
            next_player_id: 1,
            next_match_id: 1,
            next_week_id: 1,
            next_year_id: 1,
            revision: 0,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl LadderStore for MemoryStore {
    fn add_player(&mut self, name: &str, full_name: &str, rank: Option<u8>) -> Result<Player> {
        if self.players.iter().any(|p| p.name == name) {
            return Err(LadderError::DuplicatePlayer {
                name: name.to_string(),
            });
        }
        let player = Player::new(self.next_player_id, name, full_name, rank);
        self.next_player_id += 1;
        self.players.push(player.clone());
        self.touch();
        Ok(player)
    }

    fn player(&self, id: PlayerId) -> Result<Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(LadderError::PlayerNotFound { id })
    }

    fn player_by_name(&self, name: &str) -> Result<Player> {
        self.players
            .iter()
            .find(|p| p.name == name)
            .or_else(|| {
                self.players
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(name))
            })
            .cloned()
            .ok_or_else(|| LadderError::UnknownPlayerName {
                name: name.to_string(),
            })
    }

    fn list_players(&self) -> Result<Vec<Player>> {
        Ok(self.players.clone())
    }

    fn update_players(&mut self, players: &[Player]) -> Result<()> {
        let mut indices = Vec::with_capacity(players.len());
        for updated in players {
            let idx = self
                .players
                .iter()
                .position(|p| p.id == updated.id)
                .ok_or(LadderError::PlayerNotFound { id: updated.id })?;
            indices.push(idx);
        }
        for (idx, updated) in indices.into_iter().zip(players) {
            self.players[idx] = updated.clone();
        }
        self.touch();
        Ok(())
    }

    fn find_or_create_year(&mut self, year: i32) -> Result<Year> {
        if let Some(existing) = self.years.iter().find(|y| y.year == year) {
            return Ok(existing.clone());
        }
        let created = Year {
            id: self.next_year_id,
            year,
        };
        self.next_year_id += 1;
        self.years.push(created.clone());
        self.touch();
        Ok(created)
    }

    fn year(&self, year: i32) -> Result<Year> {
        self.years
            .iter()
            .find(|y| y.year == year)
            .cloned()
            .ok_or(LadderError::YearNotFound { year })
    }

    fn find_or_create_week(&mut self, year_id: YearId, first_saturday: &str) -> Result<Week> {
        if let Some(existing) = self
            .weeks
            .iter()
            .find(|w| w.year_id == year_id && w.first_saturday == first_saturday)
        {
            return Ok(existing.clone());
        }
        self.create_week(year_id, first_saturday)
    }

    fn create_week(&mut self, year_id: YearId, first_saturday: &str) -> Result<Week> {
        let number = self.weeks.iter().filter(|w| w.year_id == year_id).count() as u32 + 1;
        let created = Week {
            id: self.next_week_id,
            number,
            first_saturday: first_saturday.to_string(),
            year_id,
        };
        self.next_week_id += 1;
        self.weeks.push(created.clone());
        self.touch();
        Ok(created)
    }

    fn weeks_of_year(&self, year_id: YearId) -> Result<Vec<Week>> {
        let mut weeks: Vec<Week> = self
            .weeks
            .iter()
            .filter(|w| w.year_id == year_id)
            .cloned()
            .collect();
        weeks.sort_by_key(|w| w.number);
        Ok(weeks)
    }

    fn insert_match(&mut self, new_match: NewMatch) -> Result<Match> {
        if !self.weeks.iter().any(|w| w.id == new_match.week_id) {
            return Err(LadderError::invalid_match(format!(
                "week {} does not exist",
                new_match.week_id
            )));
        }
        let recorded = Match {
            id: self.next_match_id,
            week_id: new_match.week_id,
            players: new_match.players,
            is_challenge: new_match.is_challenge,
            score1: new_match.score1,
            score2: new_match.score2,
            set2: new_match.set2,
            set3: new_match.set3,
            points_gained: new_match.points_gained,
        };
        self.next_match_id += 1;
        self.matches.push(recorded.clone());
        self.touch();
        Ok(recorded)
    }

    fn match_by_id(&self, id: MatchId) -> Result<Match> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(LadderError::MatchNotFound { id })
    }

    fn delete_match(&mut self, id: MatchId) -> Result<()> {
        let idx = self
            .matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(LadderError::MatchNotFound { id })?;
        self.matches.remove(idx);
        self.touch();
        Ok(())
    }

    fn matches_of_week(&self, week_id: WeekId) -> Result<Vec<Match>> {
        Ok(self
            .matches
            .iter()
            .filter(|m| m.week_id == week_id)
            .cloned()
            .collect())
    }

    fn matches_of_year(&self, year_id: YearId) -> Result<Vec<Match>> {
        let week_ids: HashSet<WeekId> = self
            .weeks
            .iter()
            .filter(|w| w.year_id == year_id)
            .map(|w| w.id)
            .collect();
        Ok(self
            .matches
            .iter()
            .filter(|m| week_ids.contains(&m.week_id))
            .cloned()
            .collect())
    }

    fn list_matches(&self) -> Result<Vec<Match>> {
        Ok(self.matches.clone())
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_grow() {
        let mut store = MemoryStore::new();
        let a = store.add_player("anna", "Anna Kowalska", Some(1)).unwrap();
        let b = store.add_player("bartek", "Bartek Nowak", Some(2)).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut store = MemoryStore::new();
        store.add_player("anna", "Anna Kowalska", None).unwrap();
        let err = store.add_player("anna", "Other Anna", None).unwrap_err();
        assert_eq!(
            err,
            LadderError::DuplicatePlayer {
                name: "anna".to_string()
            }
        );
    }

    #[test]
    fn lookup_by_name_ignores_case_as_fallback() {
        let mut store = MemoryStore::new();
        store.add_player("Anna", "Anna Kowalska", None).unwrap();
        assert_eq!(store.player_by_name("anna").unwrap().id, 1);
    }

    #[test]
    fn weeks_are_numbered_per_year_in_creation_order() {
        let mut store = MemoryStore::new();
        let y24 = store.find_or_create_year(2024).unwrap();
        let y25 = store.find_or_create_year(2025).unwrap();
        let w1 = store.find_or_create_week(y24.id, "06 January").unwrap();
        let w2 = store.find_or_create_week(y24.id, "13 January").unwrap();
        let other = store.find_or_create_week(y25.id, "04 January").unwrap();
        assert_eq!((w1.number, w2.number), (1, 2));
        assert_eq!(other.number, 1);

        let again = store.find_or_create_week(y24.id, "06 January").unwrap();
        assert_eq!(again.id, w1.id);
    }

    #[test]
    fn revision_advances_only_on_actual_writes() {
        let mut store = MemoryStore::new();
        let before = store.revision();
        store.find_or_create_year(2024).unwrap();
        let created = store.revision();
        assert!(created > before);

        store.find_or_create_year(2024).unwrap();
        assert_eq!(store.revision(), created);
    }

    #[test]
    fn update_players_rejects_unknown_ids_without_touching_rows() {
        let mut store = MemoryStore::new();
        let mut anna = store.add_player("anna", "Anna Kowalska", None).unwrap();
        anna.points = 10;
        let ghost = Player::new(99, "ghost", "No Such Player", None);

        let err = store.update_players(&[anna, ghost]).unwrap_err();
        assert_eq!(err, LadderError::PlayerNotFound { id: 99 });
        assert_eq!(store.player(1).unwrap().points, 0);
    }

    #[test]
    fn deleting_a_missing_match_is_an_error() {
        let mut store = MemoryStore::new();
        let err = store.delete_match(42).unwrap_err();
        assert_eq!(err, LadderError::MatchNotFound { id: 42 });
    }
}
