use anyhow::Result;

use tennis_ladder::cli::Command;
use tennis_ladder::{
    handle_add_player, handle_challenge, handle_completions, handle_delete_match,
    handle_head_to_head, handle_ladder, handle_leaderboards, handle_matches, handle_standings,
    handle_suggest, handle_weekly, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(command)
}

fn execute_command(command: Command) -> Result<()> {
    match command {
        Command::AddPlayer {
            name,
            full_name,
            rank,
        } => handle_add_player(name, full_name, rank),
        Command::Ladder {
            players,
            score1,
            score2,
            week,
            year,
        } => handle_ladder(players, score1, score2, week, year),
        Command::Challenge {
            first,
            second,
            set1,
            set2,
            set3,
            week,
            year,
        } => handle_challenge(first, second, set1, set2, set3, week, year),
        Command::DeleteMatch { match_id } => handle_delete_match(match_id),
        Command::Standings { year } => handle_standings(year),
        Command::Weekly { year } => handle_weekly(year),
        Command::Leaderboards { year } => handle_leaderboards(year),
        Command::HeadToHead { first, second } => handle_head_to_head(first, second),
        Command::Matches { year } => handle_matches(year),
        Command::Suggest { kind, available } => handle_suggest(kind, available),
        Command::Completions { shell } => handle_completions(shell),
    }
}
