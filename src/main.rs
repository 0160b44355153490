use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;

use form_odds::batch::{BatchRun, LeagueScan};
use form_odds::config::{EngineConfig, default_dataset_path};
use form_odds::dataset::Dataset;
use form_odds::logging::init_logging;
use form_odds::provider::LeagueDirectory;
use form_odds::render;
use form_odds::synthetic::SyntheticLeague;
use form_odds::{Alert, FormOutcome};

const DEMO_LEAGUE: &str = "Demo League";
const DEMO_TEAMS: usize = 12;

#[derive(Debug, Serialize)]
struct RunOutput {
    leagues: Vec<LeagueScan>,
    alerts: Vec<Alert>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    let cfg = EngineConfig::from_env();
    let dataset = if has_flag("--demo") {
        let seed = parse_value_arg("--seed")
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(2026);
        let kickoff = next_kickoff(Utc::now());
        SyntheticLeague::new(DEMO_LEAGUE, DEMO_TEAMS, seed, kickoff).build()
    } else {
        let path = parse_value_arg("--data")
            .map(PathBuf::from)
            .unwrap_or_else(default_dataset_path);
        Dataset::load(&path)?
    };

    let leagues = match parse_value_arg("--league") {
        Some(league) => vec![league],
        None => dataset.leagues(),
    };
    if leagues.is_empty() {
        return Err(anyhow!("dataset has no leagues"));
    }

    tracing::info!(
        leagues = leagues.len(),
        venue_split = cfg.venue_split,
        max_goals = cfg.max_goals,
        "scan starting"
    );

    let run = BatchRun::new(&cfg, &dataset);
    let mut scans = Vec::with_capacity(leagues.len());
    for league in &leagues {
        let teams = dataset
            .teams(league)
            .with_context(|| format!("list teams for {league}"))?;
        let fixtures = dataset
            .fixtures(league)
            .with_context(|| format!("list fixtures for {league}"))?;
        let scan = run.scan_league(league, &teams, &fixtures);
        tracing::info!(
            league = %league,
            teams = scan.teams.len(),
            failed = scan.failed_teams(),
            fixtures = scan.fixtures.len(),
            "league scanned"
        );
        scans.push(scan);
    }
    tracing::info!(fetches = run.history_fetches(), "histories fetched");
    let alerts = run.finish();

    if has_flag("--json") {
        let out = RunOutput {
            leagues: scans,
            alerts,
        };
        let json = serde_json::to_string_pretty(&out).context("serialize scan output")?;
        println!("{json}");
        return Ok(());
    }

    for scan in &scans {
        print_scan(scan);
    }
    println!("== Alerts ({})", alerts.len());
    for alert in &alerts {
        println!("{}", render::alert_line(alert));
    }
    Ok(())
}

fn print_scan(scan: &LeagueScan) {
    println!("== {}", scan.league);
    for row in &scan.teams {
        println!("{}", render::team_card(row));
        println!();
    }
    let no_data = scan
        .teams
        .iter()
        .filter(|row| matches!(row.outcome, Ok(FormOutcome::NoData)))
        .count();
    println!(
        "Teams: {} (no data: {}, failed: {})",
        scan.teams.len(),
        no_data,
        scan.failed_teams()
    );
    println!();

    if scan.fixtures.is_empty() {
        return;
    }
    println!("-- Fixtures");
    for row in &scan.fixtures {
        println!("{}", render::fixture_card(row));
        println!();
    }
}

fn next_kickoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now + ChronoDuration::days(1)
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}

fn parse_value_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
