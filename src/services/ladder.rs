use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Datelike;
use log::info;
use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::{
    week_label, ChallengeSets, Clock, Match, MatchId, NewMatch, Player, PlayerId, SystemClock,
    Week,
};
use crate::errors::{LadderError, Result};
use crate::ranking;
use crate::ranking::{
    CountEntry, HeadToHeadReport, StandingRow, StatEntry, WeekHighlight,
};
use crate::store::LadderStore;

/// Kind of match to draw when suggesting a pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Singles,
    Doubles,
}

impl MatchKind {
    fn required_players(self) -> usize {
        match self {
            MatchKind::Singles => 2,
            MatchKind::Doubles => 4,
        }
    }
}

/// The four derived leaderboards for one season.
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboards {
    pub points_per_game: Vec<StatEntry>,
    pub win_percentage: Vec<StatEntry>,
    pub most_points_in_a_week: Vec<WeekHighlight>,
    pub bagel_count: Vec<CountEntry>,
}

/// Per-week earned and running totals, keyed by player name.
#[derive(Debug, Clone, Serialize)]
pub struct WeekSeries {
    pub number: u32,
    pub label: String,
    pub earned: BTreeMap<String, i32>,
    pub cumulative: BTreeMap<String, i32>,
}

/// The season's weekly series, with the all-zero opening row ahead of
/// week 1.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyStandings {
    pub players: Vec<String>,
    pub opening: BTreeMap<String, i32>,
    pub weeks: Vec<WeekSeries>,
}

/// One match as shown on the season listing.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedMatch {
    pub id: MatchId,
    pub week: u32,
    pub kind: String,
    pub participants: Vec<String>,
    pub score: String,
    pub points_gained: Option<i32>,
}

/// The ladder engine. Every operation is a single read-validate-compute-
/// write cycle; all failure paths return before the first player write, so
/// a rejected call leaves the store exactly as it found it.
pub struct LadderService<S: LadderStore> {
    store: S,
    config: AppConfig,
    clock: Box<dyn Clock>,
    standings_memo: HashMap<i32, (u64, Vec<StandingRow>)>,
}

impl<S: LadderStore> LadderService<S> {
    pub fn new(store: S, config: AppConfig) -> Self {
        Self::with_clock(store, config, Box::new(SystemClock))
    }

    pub fn with_clock(store: S, config: AppConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
            standings_memo: HashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The season the clock currently sits in.
    pub fn current_year(&self) -> i32 {
        self.clock.today().year()
    }

    /// Add a player to the roster at zero points.
    pub fn add_player(
        &mut self,
        name: &str,
        full_name: &str,
        rank: Option<u8>,
    ) -> Result<Player> {
        let name = name.trim();
        let full_name = full_name.trim();
        if name.is_empty() || full_name.is_empty() {
            return Err(LadderError::invalid_player("name must not be empty"));
        }
        if let Some(rank) = rank {
            let (min, max) = (self.config.ladder.min_rank, self.config.ladder.max_rank);
            if !(min..=max).contains(&rank) {
                return Err(LadderError::invalid_player(format!(
                    "rank must be between {min} and {max}, got {rank}"
                )));
            }
        }
        let player = self.store.add_player(name, full_name, rank)?;
        info!("Added player {} ({})", player.name, player.full_name);
        Ok(player)
    }

    /// Record a ladder game. Singles take two players, doubles four with
    /// the first two forming team A. Points land immediately.
    pub fn record_ladder_match(
        &mut self,
        participants: &[PlayerId],
        score1: i32,
        score2: i32,
        week: Option<u32>,
        year: Option<i32>,
    ) -> Result<Match> {
        if participants.len() != 2 && participants.len() != 4 {
            return Err(LadderError::invalid_match(format!(
                "ladder games take 2 or 4 players, got {}",
                participants.len()
            )));
        }
        ensure_distinct(participants)?;
        if score1 < 0 || score2 < 0 {
            return Err(LadderError::invalid_match("scores cannot be negative"));
        }

        let mut players = self.fetch_players(participants)?;
        ranking::apply_ladder_match(&mut players, score1, score2)?;

        let week = self.resolve_week(year, week)?;
        let recorded = self.store.insert_match(NewMatch::ladder(
            week.id,
            participants.to_vec(),
            score1,
            score2,
        ))?;
        self.store.update_players(&players)?;

        info!(
            "Recorded ladder match {} ({} players, {}-{}) in week {}",
            recorded.id,
            participants.len(),
            score1,
            score2,
            week.number
        );
        Ok(recorded)
    }

    /// Record a challenge match. The winner of the sets catches up to the
    /// loser's season total when behind; the margin is stored on the match.
    pub fn record_challenge_match(
        &mut self,
        first: PlayerId,
        second: PlayerId,
        sets: &ChallengeSets,
        week: Option<u32>,
        year: Option<i32>,
    ) -> Result<Match> {
        ensure_distinct(&[first, second])?;
        for set in sets.all() {
            if set.first < 0 || set.second < 0 {
                return Err(LadderError::invalid_match("set scores cannot be negative"));
            }
            if set.first == set.second {
                return Err(LadderError::invalid_match(format!(
                    "tied set {set} cannot decide a winner"
                )));
            }
        }
        // Also rejects a split with no third set, before anything mutates.
        sets.winner()?;

        let mut players = self.fetch_players(&[first, second])?;
        let points_gained = ranking::apply_challenge_match(&mut players, sets)?;

        let week = self.resolve_week(year, week)?;
        let recorded = self.store.insert_match(NewMatch::challenge(
            week.id,
            first,
            second,
            sets,
            points_gained,
        ))?;
        self.store.update_players(&players)?;

        info!(
            "Recorded challenge match {} in week {} (points gained: {})",
            recorded.id,
            week.number,
            points_gained.map_or_else(|| "none".to_string(), |g| g.to_string())
        );
        Ok(recorded)
    }

    /// Delete a match, first undoing its point effects. Participants are
    /// looked up directly by the stored ids, and the reversal uses the
    /// recorded margin rather than anything derived from current totals.
    pub fn delete_match(&mut self, id: MatchId) -> Result<Match> {
        let recorded = self.store.match_by_id(id)?;
        let mut players = self.fetch_players(&recorded.players)?;
        ranking::reverse_match(&recorded, &mut players)?;

        self.store.update_players(&players)?;
        self.store.delete_match(id)?;

        info!("Deleted match {} and reversed its points", id);
        Ok(recorded)
    }

    /// Recompute the season table from the weekly ledger and write back
    /// every player's points, position and shift in one batch. Skips the
    /// write entirely when nothing changed since the last refresh.
    pub fn refresh_standings(&mut self, year: i32) -> Result<Vec<StandingRow>> {
        let year_row = self.store.year(year)?;
        if let Some((revision, rows)) = self.standings_memo.get(&year) {
            if *revision == self.store.revision() {
                info!("Standings for {year} already current, skipping recompute");
                return Ok(rows.clone());
            }
        }

        info!("=== Refreshing standings for {year} ===");
        let players = self.store.list_players()?;
        let weeks = self.store.weeks_of_year(year_row.id)?;
        let matches = self.store.matches_of_year(year_row.id)?;
        info!(
            "  → {} players, {} weeks, {} matches",
            players.len(),
            weeks.len(),
            matches.len()
        );

        let weekly = ranking::weekly_points(&players, &weeks, &matches)?;
        let standings = ranking::cumulative_standings(&players, &weekly);

        let mut season = standings.iter().rev();
        let (_, current) = season
            .next()
            .ok_or_else(|| LadderError::invalid_match("season has no opening row"))?;
        let previous = season
            .next()
            .filter(|(number, _)| **number >= 1)
            .map(|(_, totals)| totals);

        let rows = ranking::rank_and_shift(current, previous);
        info!("  → Ranked {} players", rows.len());

        let mut updated: HashMap<PlayerId, Player> =
            players.into_iter().map(|p| (p.id, p)).collect();
        for row in &rows {
            if let Some(player) = updated.get_mut(&row.player_id) {
                player.points = row.points;
                player.position = Some(row.position);
                player.shift = row.shift;
            }
        }
        let batch: Vec<Player> = updated.into_values().collect();
        self.store.update_players(&batch)?;
        info!("=== Standings for {year} written back ===");

        self.standings_memo
            .insert(year, (self.store.revision(), rows.clone()));
        Ok(rows)
    }

    /// The labelled weekly series behind the standings graphs.
    pub fn weekly_standings(&self, year: i32) -> Result<WeeklyStandings> {
        let year_row = self.store.year(year)?;
        let players = self.store.list_players()?;
        let weeks = self.store.weeks_of_year(year_row.id)?;
        let matches = self.store.matches_of_year(year_row.id)?;

        let weekly = ranking::weekly_points(&players, &weeks, &matches)?;
        let standings = ranking::cumulative_standings(&players, &weekly);

        let names: HashMap<PlayerId, &str> =
            players.iter().map(|p| (p.id, p.name.as_str())).collect();
        let by_name = |totals: &HashMap<PlayerId, i32>| -> BTreeMap<String, i32> {
            totals
                .iter()
                .filter_map(|(id, points)| names.get(id).map(|n| (n.to_string(), *points)))
                .collect()
        };

        let opening = standings
            .get(&0)
            .map(&by_name)
            .unwrap_or_default();
        let series = weeks
            .iter()
            .map(|week| WeekSeries {
                number: week.number,
                label: week.first_saturday.clone(),
                earned: weekly.get(&week.number).map(&by_name).unwrap_or_default(),
                cumulative: standings
                    .get(&week.number)
                    .map(&by_name)
                    .unwrap_or_default(),
            })
            .collect();

        Ok(WeeklyStandings {
            players: players.iter().map(|p| p.name.clone()).collect(),
            opening,
            weeks: series,
        })
    }

    /// The four derived boards for one season.
    pub fn leaderboards(&self, year: i32) -> Result<Leaderboards> {
        let year_row = self.store.year(year)?;
        let players = self.store.list_players()?;
        let weeks = self.store.weeks_of_year(year_row.id)?;
        let matches = self.store.matches_of_year(year_row.id)?;

        Ok(Leaderboards {
            points_per_game: ranking::points_per_game(&players, &matches),
            win_percentage: ranking::win_percentage(&players, &matches),
            most_points_in_a_week: ranking::most_points_in_a_week(
                &players,
                &weeks,
                &matches,
                self.config.ladder.most_points_top_n,
            )?,
            bagel_count: ranking::bagel_count(
                &players,
                &matches,
                self.config.ladder.bagel_score,
            ),
        })
    }

    /// Break down every match two players shared, across all seasons.
    pub fn head_to_head(&self, first: PlayerId, second: PlayerId) -> Result<HeadToHeadReport> {
        let first = self.store.player(first)?;
        let second = self.store.player(second)?;
        let matches = self.store.list_matches()?;
        ranking::head_to_head(&first, &second, &matches)
    }

    /// Draw a random singles pair or doubles four from the availability
    /// list, in team order.
    pub fn suggest_pairing(
        &self,
        kind: MatchKind,
        available: &[PlayerId],
    ) -> Result<Vec<PlayerId>> {
        let mut distinct = Vec::new();
        for &id in available {
            self.store.player(id)?;
            if !distinct.contains(&id) {
                distinct.push(id);
            }
        }
        let needed = kind.required_players();
        if distinct.len() < needed {
            return Err(LadderError::NotEnoughPlayers {
                needed,
                available: distinct.len(),
            });
        }

        let mut rng = thread_rng();
        let mut picked: Vec<PlayerId> = distinct
            .choose_multiple(&mut rng, needed)
            .copied()
            .collect();
        picked.shuffle(&mut rng);
        Ok(picked)
    }

    /// The season's matches in week order, with ids for deletion.
    pub fn list_matches(&self, year: i32) -> Result<Vec<RecordedMatch>> {
        let year_row = self.store.year(year)?;
        let weeks = self.store.weeks_of_year(year_row.id)?;
        let week_numbers: HashMap<_, _> = weeks.iter().map(|w| (w.id, w.number)).collect();
        let mut matches = self.store.matches_of_year(year_row.id)?;
        matches.sort_by_key(|m| (week_numbers.get(&m.week_id).copied().unwrap_or(0), m.id));

        matches
            .iter()
            .map(|recorded| {
                let participants = recorded
                    .players
                    .iter()
                    .map(|&id| self.store.player(id).map(|p| p.name))
                    .collect::<Result<Vec<_>>>()?;
                let kind = if recorded.is_challenge {
                    "challenge"
                } else if recorded.is_doubles() {
                    "ladder doubles"
                } else {
                    "ladder singles"
                };
                let score = match recorded.challenge_sets() {
                    Some(sets) => sets
                        .all()
                        .iter()
                        .map(|s| s.to_string())
                        .collect::<Vec<_>>()
                        .join(" "),
                    None => format!("{}-{}", recorded.score1, recorded.score2),
                };
                Ok(RecordedMatch {
                    id: recorded.id,
                    week: week_numbers.get(&recorded.week_id).copied().unwrap_or(0),
                    kind: kind.to_string(),
                    participants,
                    score,
                    points_gained: recorded.points_gained,
                })
            })
            .collect()
    }

    fn fetch_players(&self, ids: &[PlayerId]) -> Result<Vec<Player>> {
        ids.iter().map(|&id| self.store.player(id)).collect()
    }

    /// Find the target week, creating the year and week rows on first use.
    /// A fresh week is labelled with the Saturday opening the clock's
    /// current week.
    fn resolve_week(&mut self, year: Option<i32>, week: Option<u32>) -> Result<Week> {
        let today = self.clock.today();
        let year_value = year.unwrap_or_else(|| today.year());
        let year_row = self.store.find_or_create_year(year_value)?;
        let label = week_label(today);

        match week {
            None => self.store.find_or_create_week(year_row.id, &label),
            Some(number) => {
                let existing = self.store.weeks_of_year(year_row.id)?;
                if let Some(found) = existing.iter().find(|w| w.number == number) {
                    return Ok(found.clone());
                }
                if number as usize == existing.len() + 1 {
                    self.store.create_week(year_row.id, &label)
                } else {
                    Err(LadderError::invalid_match(format!(
                        "week {number} does not exist in {year_value} yet"
                    )))
                }
            }
        }
    }
}

fn ensure_distinct(ids: &[PlayerId]) -> Result<()> {
    let unique: HashSet<_> = ids.iter().collect();
    if unique.len() != ids.len() {
        return Err(LadderError::invalid_match(
            "the same player cannot appear twice in one match",
        ));
    }
    Ok(())
}
