pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ranking;
pub mod services;
pub mod store;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;

use crate::cli::{Cli, Command, PairingKind};
use crate::config::AppConfig;
use crate::domain::{ChallengeSets, PlayerId, SetScore};
use crate::services::{LadderService, MatchKind};
use crate::store::{snapshot, LadderStore, MemoryStore};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_add_player(name: String, full_name: String, rank: Option<u8>) -> Result<()> {
    let (mut service, path) = open_service()?;
    let player = service.add_player(&name, &full_name, rank)?;
    match player.rank {
        Some(rank) => println!(
            "{}",
            format!("Added {} ({}) at rank {}", player.name, player.full_name, rank).green()
        ),
        None => println!(
            "{}",
            format!("Added {} ({})", player.name, player.full_name).green()
        ),
    }
    snapshot::save(&path, service.store())
}

pub fn handle_ladder(
    players: Vec<String>,
    score1: i32,
    score2: i32,
    week: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let (mut service, path) = open_service()?;
    let ids = resolve_players(&service, &players)?;
    let recorded = service.record_ladder_match(&ids, score1, score2, week, year)?;
    println!(
        "{}",
        format!(
            "Recorded match {}: {} {}-{}",
            recorded.id,
            format_participants(&players),
            score1,
            score2
        )
        .green()
    );
    snapshot::save(&path, service.store())
}

pub fn handle_challenge(
    first: String,
    second: String,
    set1: SetScore,
    set2: SetScore,
    set3: Option<SetScore>,
    week: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let (mut service, path) = open_service()?;
    let first_id = service.store().player_by_name(&first)?.id;
    let second_id = service.store().player_by_name(&second)?.id;

    let sets = ChallengeSets::new(set1, set2, set3);
    let recorded = service.record_challenge_match(first_id, second_id, &sets, week, year)?;
    let sets_line = sets
        .all()
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "{}",
        format!(
            "Recorded challenge {}: {} vs {} ({})",
            recorded.id, first, second, sets_line
        )
        .green()
    );
    match recorded.points_gained {
        Some(gained) => println!("Winner caught up {gained} points"),
        None => println!("Winner was already ahead, no points moved"),
    }
    snapshot::save(&path, service.store())
}

pub fn handle_delete_match(match_id: i64) -> Result<()> {
    let (mut service, path) = open_service()?;
    let removed = service.delete_match(match_id)?;
    println!(
        "{}",
        format!("Deleted match {} and reversed its points", removed.id).yellow()
    );
    snapshot::save(&path, service.store())
}

pub fn handle_standings(year: Option<i32>) -> Result<()> {
    let (mut service, path) = open_service()?;
    let year = year.unwrap_or_else(|| service.current_year());
    let rows = service.refresh_standings(year)?;

    println!("{}", format!("Standings {year}").bold());
    println!("{:>4}  {:<12} {:>7}  {}", "Pos", "Player", "Points", "Shift");
    for row in &rows {
        let name = service.store().player(row.player_id)?.name;
        let shift = if row.shift > 0 {
            format!("↑{}", row.shift).green()
        } else if row.shift < 0 {
            format!("↓{}", -row.shift).red()
        } else {
            "·".dimmed()
        };
        println!(
            "{:>4}  {:<12} {:>7}  {}",
            row.position, name, row.points, shift
        );
    }
    snapshot::save(&path, service.store())
}

pub fn handle_weekly(year: Option<i32>) -> Result<()> {
    let (service, _) = open_service()?;
    let year = year.unwrap_or_else(|| service.current_year());
    let weekly = service.weekly_standings(year)?;

    for week in &weekly.weeks {
        println!(
            "{}",
            format!("Week {} ({})", week.number, week.label).bold()
        );
        for name in &weekly.players {
            let earned = week.earned.get(name).copied().unwrap_or(0);
            let total = week.cumulative.get(name).copied().unwrap_or(0);
            println!("  {:<12} {:>+4}  → {}", name, earned, total);
        }
    }
    if weekly.weeks.is_empty() {
        println!("No weeks recorded for {year} yet");
    }
    Ok(())
}

pub fn handle_leaderboards(year: Option<i32>) -> Result<()> {
    let (service, _) = open_service()?;
    let year = year.unwrap_or_else(|| service.current_year());
    let boards = service.leaderboards(year)?;

    println!("{}", "Points per game".bold());
    for (idx, entry) in boards.points_per_game.iter().enumerate() {
        println!("{:>4}. {:<12} {:>6.2}", idx + 1, entry.player, entry.value);
    }

    println!("{}", "\nWin percentage".bold());
    for (idx, entry) in boards.win_percentage.iter().enumerate() {
        println!("{:>4}. {:<12} {:>5.1}%", idx + 1, entry.player, entry.value);
    }

    println!("{}", "\nMost points in a week".bold());
    for (idx, entry) in boards.most_points_in_a_week.iter().enumerate() {
        println!(
            "{:>4}. {:<12} {:>4} (week {})",
            idx + 1,
            entry.player,
            entry.points,
            entry.week
        );
    }

    println!("{}", "\nBagels".bold());
    for (idx, entry) in boards.bagel_count.iter().enumerate() {
        println!("{:>4}. {:<12} {:>4}", idx + 1, entry.player, entry.count);
    }
    Ok(())
}

pub fn handle_head_to_head(first: String, second: String) -> Result<()> {
    let (service, _) = open_service()?;
    let first_id = service.store().player_by_name(&first)?.id;
    let second_id = service.store().player_by_name(&second)?.id;
    let report = service.head_to_head(first_id, second_id)?;

    println!("{}", format!("{} vs {}", report.first, report.second).bold());
    println!(
        "  Singles:          {} played, {} {}, {} {}",
        report.singles.played,
        report.first,
        report.singles.first_wins,
        report.second,
        report.singles.second_wins
    );
    println!(
        "  Doubles opposed:  {} played, {} {}, {} {}",
        report.doubles_opposed.played,
        report.first,
        report.doubles_opposed.first_wins,
        report.second,
        report.doubles_opposed.second_wins
    );
    println!(
        "  Doubles together: {} played, {} won",
        report.doubles_together.played, report.doubles_together.won_together
    );
    Ok(())
}

pub fn handle_matches(year: Option<i32>) -> Result<()> {
    let (service, _) = open_service()?;
    let year = year.unwrap_or_else(|| service.current_year());
    let matches = service.list_matches(year)?;

    if matches.is_empty() {
        println!("No matches recorded for {year} yet");
        return Ok(());
    }
    println!("{:>4}  {:>4}  {:<15} {:<28} {}", "Id", "Week", "Kind", "Players", "Score");
    for m in &matches {
        let gained = m
            .points_gained
            .map(|g| format!("  (+{g})"))
            .unwrap_or_default();
        println!(
            "{:>4}  {:>4}  {:<15} {:<28} {}{}",
            m.id,
            m.week,
            m.kind,
            format_participants(&m.participants),
            m.score,
            gained
        );
    }
    Ok(())
}

pub fn handle_suggest(kind: PairingKind, available: Vec<String>) -> Result<()> {
    let (service, _) = open_service()?;
    let ids = resolve_players(&service, &available)?;
    let picked = service.suggest_pairing(pairing_kind(kind), &ids)?;
    let names = picked
        .iter()
        .map(|&id| service.store().player(id).map(|p| p.name))
        .collect::<crate::errors::Result<Vec<_>>>()?;
    println!("{}", format_participants(&names).cyan().bold());
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

fn open_service() -> Result<(LadderService<MemoryStore>, String)> {
    let config = AppConfig::new();
    let path = config.storage.snapshot_path.clone();
    let store = snapshot::load(&path)?;
    Ok((LadderService::new(store, config), path))
}

fn resolve_players<S: LadderStore>(
    service: &LadderService<S>,
    names: &[String],
) -> Result<Vec<PlayerId>> {
    names
        .iter()
        .map(|name| Ok(service.store().player_by_name(name)?.id))
        .collect()
}

fn pairing_kind(kind: PairingKind) -> MatchKind {
    match kind {
        PairingKind::Singles => MatchKind::Singles,
        PairingKind::Doubles => MatchKind::Doubles,
    }
}

fn format_participants(names: &[String]) -> String {
    match names {
        [a, b] => format!("{a} vs {b}"),
        [a1, a2, b1, b2] => format!("{a1} & {a2} vs {b1} & {b2}"),
        other => other.join(", "),
    }
}
