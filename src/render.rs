use std::fmt::Write as _;

use crate::alerts::{Alert, AlertKind};
use crate::batch::{FixtureRow, TeamRow};
use crate::form::FormOutcome;
use crate::odds::MarketPrice;

pub fn team_card(row: &TeamRow) -> String {
    match &row.outcome {
        Err(err) => format!("{} - error: {err}", row.team),
        Ok(FormOutcome::NoData) => format!("{}: no matches found.", row.team),
        Ok(FormOutcome::Summary(s)) => {
            let mut out = String::new();
            let _ = writeln!(out, "### {}", row.team);
            let _ = writeln!(out, "- Matches played: {}", s.matches_played);
            let _ = writeln!(
                out,
                "- Goals scored: {} | conceded: {}",
                s.goals_scored, s.goals_conceded
            );
            let _ = writeln!(
                out,
                "- Wins: {} | Losses: {} | Draws: {}",
                s.wins, s.losses, s.draws
            );
            if s.max_scoreless_streak > 0 {
                let _ = writeln!(
                    out,
                    "- Longest run without scoring: {} matches",
                    s.max_scoreless_streak
                );
            }
            if s.max_clean_sheet_streak > 0 {
                let _ = writeln!(
                    out,
                    "- Longest clean sheet run: {}",
                    s.max_clean_sheet_streak
                );
            }
            out.trim_end().to_string()
        }
    }
}

pub fn fixture_card(row: &FixtureRow) -> String {
    let f = &row.fixture;
    let header = format!(
        "{} vs {} ({})",
        f.home_team,
        f.away_team,
        f.kickoff.format("%Y-%m-%d %H:%M")
    );
    let report = match &row.report {
        Ok(report) => report,
        Err(err) => return format!("{header}\n  odds unavailable: {err}"),
    };

    let (xg_h, xg_a) = report.expected_goals.rounded();
    let mut out = String::new();
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "  xG {xg_h:.2} - {xg_a:.2}");
    let _ = writeln!(
        out,
        "  1X2      {} | {} | {}",
        price(&report.home_win),
        price(&report.draw),
        price(&report.away_win)
    );
    let _ = writeln!(
        out,
        "  O/U 2.5  {} | {}",
        price(&report.over_2_5),
        price(&report.under_2_5)
    );
    let _ = writeln!(
        out,
        "  BTTS     {} | {}",
        price(&report.btts_yes),
        price(&report.btts_no)
    );
    let _ = writeln!(
        out,
        "  Most likely {}-{} ({:.2}%)",
        report.most_likely.home,
        report.most_likely.away,
        report.most_likely.probability * 100.0
    );
    let top = report
        .top_scorelines
        .iter()
        .map(|s| format!("{}-{} {:.2}%", s.home, s.away, s.probability * 100.0))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "  Top: {top}");
    out.trim_end().to_string()
}

pub fn alert_line(alert: &Alert) -> String {
    let what = match alert.kind {
        AlertKind::ScorelessStreakRecord => "without scoring",
        AlertKind::CleanSheetStreakRecord => "without conceding",
    };
    format!(
        "[ALERT] {} ({}): {} matches {what}, the longest in {} played",
        alert.team, alert.league, alert.streak_length, alert.sample_size
    )
}

fn price(m: &MarketPrice) -> String {
    match m.odds {
        Some(odds) => format!("{:.2}% @ {odds:.2}", m.percent()),
        None => format!("{:.2}% @ n/a", m.percent()),
    }
}
