use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::domain::SetScore;

#[derive(Parser, Debug)]
#[command(author, version, about = "tennis ladder ranking engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Add a player to the ladder roster
    AddPlayer {
        /// Short name used on the ladder
        name: String,
        /// Full display name
        full_name: String,
        /// Rank group between 1 and 8
        #[arg(short, long)]
        rank: Option<u8>,
    },
    /// Record a ladder game (two players for singles, four for doubles)
    Ladder {
        /// Participant, repeat per player; for doubles team A comes first
        #[arg(short = 'p', long = "player", required = true)]
        players: Vec<String>,
        /// First side's score
        score1: i32,
        /// Second side's score
        score2: i32,
        /// Week number, defaults to the current week
        #[arg(short, long)]
        week: Option<u32>,
        /// Season year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Record a best-of-three challenge match
    Challenge {
        /// The challenger
        first: String,
        /// The challenged player
        second: String,
        /// First set, e.g. 6-3
        set1: SetScore,
        /// Second set
        set2: SetScore,
        /// Third set, required only when the first two split
        set3: Option<SetScore>,
        /// Week number, defaults to the current week
        #[arg(short, long)]
        week: Option<u32>,
        /// Season year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Delete a match and reverse its points
    DeleteMatch {
        /// Id shown by the matches listing
        match_id: i64,
    },
    /// Recompute the season standings and print the table
    Standings {
        /// Season year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Print points earned and running totals per week
    Weekly {
        /// Season year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Print the derived statistics boards
    Leaderboards {
        /// Season year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Compare two players across every match they shared
    HeadToHead {
        first: String,
        second: String,
    },
    /// List the season's matches with their ids
    Matches {
        /// Season year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Draw a random pairing from the available players
    Suggest {
        /// Kind of match to draw
        #[arg(value_enum)]
        kind: PairingKind,
        /// Names of the available players
        #[arg(required = true)]
        available: Vec<String>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingKind {
    Singles,
    Doubles,
}
