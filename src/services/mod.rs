pub mod ladder;

pub use ladder::{
    LadderService, Leaderboards, MatchKind, RecordedMatch, WeekSeries, WeeklyStandings,
};
