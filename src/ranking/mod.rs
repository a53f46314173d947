pub mod ledger;
pub mod standings;
pub mod stats;

pub use ledger::{apply_challenge_match, apply_ladder_match, reverse_match};
pub use standings::{cumulative_standings, rank_and_shift, weekly_points, StandingRow, WeeklyPoints};
pub use stats::{
    bagel_count, head_to_head, match_counts, most_points_in_a_week, points_per_game,
    win_percentage, CountEntry, DuelRecord, HeadToHeadReport, StatEntry, TeamRecord, WeekHighlight,
};
