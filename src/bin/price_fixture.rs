use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde_json::Value;

use form_odds::config::EngineConfig;
use form_odds::logging::init_logging;
use form_odds::match_record::parse_match_records;
use form_odds::render::alert_line;
use form_odds::{AlertAggregator, FormAnalyzer, GoalExpectationModel, OddsEngine};

#[derive(Debug, serde::Deserialize)]
struct PriceCase {
    #[serde(default)]
    league: Option<String>,
    home_team: String,
    away_team: String,
    // Newest-first, in the source's record shape.
    home_history: Vec<Value>,
    away_history: Vec<Value>,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/price_case.json"));

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let case: PriceCase = serde_json::from_str(&raw).context("invalid price case json")?;
    let league = case.league.unwrap_or_else(|| "Case".to_string());
    let cfg = EngineConfig::from_env();

    // One fixture, no dataset: handy for checking a single price by hand.
    let alerts = AlertAggregator::new();
    let analyzer = FormAnalyzer::new();
    let home_history = parse_match_records(&case.home_team, &case.home_history)?;
    let away_history = parse_match_records(&case.away_team, &case.away_history)?;
    let home = analyzer.analyze(&league, &case.home_team, &home_history, &alerts)?;
    let away = analyzer.analyze(&league, &case.away_team, &away_history, &alerts)?;

    let xg = GoalExpectationModel::new(cfg.venue_split).expected_goals_for(
        &case.home_team,
        &home,
        &case.away_team,
        &away,
    )?;
    let report = OddsEngine::from_config(&cfg).build_report(&xg);

    let (xg_h, xg_a) = xg.rounded();
    println!("{} vs {}", case.home_team, case.away_team);
    println!("xG: {xg_h:.2} - {xg_a:.2}");
    println!(
        "Over 2.5: {:.2}% ({})",
        report.over_2_5.percent(),
        odds_label(report.over_2_5.odds)
    );
    println!(
        "Under 2.5: {:.2}% ({})",
        report.under_2_5.percent(),
        odds_label(report.under_2_5.odds)
    );
    println!(
        "BTTS yes: {:.2}% ({})",
        report.btts_yes.percent(),
        odds_label(report.btts_yes.odds)
    );
    println!(
        "BTTS no: {:.2}% ({})",
        report.btts_no.percent(),
        odds_label(report.btts_no.odds)
    );
    println!(
        "Most likely: {}-{}",
        report.most_likely.home, report.most_likely.away
    );
    for s in &report.top_scorelines {
        println!("  {}-{}: {:.2}%", s.home, s.away, s.probability * 100.0);
    }
    for alert in alerts.list() {
        println!("{}", alert_line(&alert));
    }

    Ok(())
}

fn odds_label(odds: Option<f64>) -> String {
    odds.map(|o| format!("{o:.2}"))
        .unwrap_or_else(|| "odds unavailable".to_string())
}
