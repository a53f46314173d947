pub mod memory;
pub mod snapshot;

use crate::domain::{Match, MatchId, NewMatch, Player, PlayerId, Week, WeekId, Year, YearId};
use crate::errors::Result;

pub use memory::MemoryStore;

/// Storage seam for the ladder. The engine only ever talks to this trait,
/// so the backing can be swapped without touching the scoring code.
///
/// Mutating calls advance `revision()`; derived data keyed on the revision
/// stays valid exactly until the next write.
pub trait LadderStore {
    fn add_player(&mut self, name: &str, full_name: &str, rank: Option<u8>) -> Result<Player>;
    fn player(&self, id: PlayerId) -> Result<Player>;
    fn player_by_name(&self, name: &str) -> Result<Player>;
    fn list_players(&self) -> Result<Vec<Player>>;

    /// Write back a batch of modified players. All ids are checked before
    /// the first row is touched, so a bad batch changes nothing.
    fn update_players(&mut self, players: &[Player]) -> Result<()>;

    fn find_or_create_year(&mut self, year: i32) -> Result<Year>;
    fn year(&self, year: i32) -> Result<Year>;

    fn find_or_create_week(&mut self, year_id: YearId, first_saturday: &str) -> Result<Week>;

    /// Append a new week to the year unconditionally, numbered after the
    /// last one, even when the label matches an existing week.
    fn create_week(&mut self, year_id: YearId, first_saturday: &str) -> Result<Week>;

    fn weeks_of_year(&self, year_id: YearId) -> Result<Vec<Week>>;

    fn insert_match(&mut self, new_match: NewMatch) -> Result<Match>;
    fn match_by_id(&self, id: MatchId) -> Result<Match>;
    fn delete_match(&mut self, id: MatchId) -> Result<()>;
    fn matches_of_week(&self, week_id: WeekId) -> Result<Vec<Match>>;
    fn matches_of_year(&self, year_id: YearId) -> Result<Vec<Match>>;
    fn list_matches(&self) -> Result<Vec<Match>>;

    /// Monotonic change counter, bumped by every successful write.
    fn revision(&self) -> u64;
}
