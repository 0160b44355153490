use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::Serialize;

use crate::alerts::{Alert, AlertAggregator};
use crate::config::EngineConfig;
use crate::error::AnalysisError;
use crate::expected_goals::GoalExpectationModel;
use crate::form::{FormAnalyzer, FormOutcome};
use crate::odds::{OddsEngine, OddsReport};
use crate::provider::{CachedHistoryProvider, Fixture, MatchHistoryProvider};

#[derive(Debug, Clone, Serialize)]
pub struct TeamRow {
    pub league: String,
    pub team: String,
    pub outcome: Result<FormOutcome, AnalysisError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixtureRow {
    pub fixture: Fixture,
    pub report: Result<OddsReport, AnalysisError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueScan {
    pub league: String,
    pub teams: Vec<TeamRow>,
    pub fixtures: Vec<FixtureRow>,
}

impl LeagueScan {
    pub fn failed_teams(&self) -> usize {
        self.teams.iter().filter(|t| t.outcome.is_err()).count()
    }
}

/// One analysis pass. Histories are fetched once per team and the alert log
/// lives exactly as long as the run.
pub struct BatchRun<P> {
    histories: CachedHistoryProvider<P>,
    alerts: AlertAggregator,
    analyzer: FormAnalyzer,
    model: GoalExpectationModel,
    engine: OddsEngine,
    pool: Option<rayon::ThreadPool>,
}

impl<P: MatchHistoryProvider> BatchRun<P> {
    pub fn new(cfg: &EngineConfig, provider: P) -> Self {
        Self {
            histories: CachedHistoryProvider::new(provider),
            alerts: AlertAggregator::new(),
            analyzer: FormAnalyzer::new(),
            model: GoalExpectationModel::new(cfg.venue_split),
            engine: OddsEngine::from_config(cfg),
            pool: build_pool(cfg.parallelism),
        }
    }

    /// Analyses every listed team plus any team appearing only in a fixture, then
    /// prices the fixtures. Per-entity failures never abort the scan.
    pub fn scan_league(
        &self,
        league: &str,
        teams: &[String],
        fixtures: &[Fixture],
    ) -> LeagueScan {
        let names = scan_order(teams, fixtures);

        let rows: Vec<TeamRow> = with_pool(&self.pool, || {
            names
                .par_iter()
                .map(|team| TeamRow {
                    league: league.to_string(),
                    team: team.clone(),
                    outcome: self.analyze_team(league, team),
                })
                .collect()
        });

        let by_team: HashMap<&str, &Result<FormOutcome, AnalysisError>> = rows
            .iter()
            .map(|row| (row.team.as_str(), &row.outcome))
            .collect();

        let fixture_rows: Vec<FixtureRow> = with_pool(&self.pool, || {
            fixtures
                .par_iter()
                .map(|fixture| FixtureRow {
                    fixture: fixture.clone(),
                    report: self.price_fixture(fixture, &by_team),
                })
                .collect()
        });

        for row in &fixture_rows {
            if let Err(err) = &row.report {
                tracing::warn!(
                    league,
                    home = %row.fixture.home_team,
                    away = %row.fixture.away_team,
                    %err,
                    "fixture skipped"
                );
            }
        }

        LeagueScan {
            league: league.to_string(),
            teams: rows,
            fixtures: fixture_rows,
        }
    }

    fn analyze_team(&self, league: &str, team: &str) -> Result<FormOutcome, AnalysisError> {
        let result = self
            .histories
            .history(league, team)
            .and_then(|history| self.analyzer.analyze(league, team, &history, &self.alerts));
        if let Err(err) = &result {
            tracing::warn!(league, team, %err, "team analysis failed");
        }
        result
    }

    fn price_fixture(
        &self,
        fixture: &Fixture,
        by_team: &HashMap<&str, &Result<FormOutcome, AnalysisError>>,
    ) -> Result<OddsReport, AnalysisError> {
        let home = lookup(by_team, fixture, &fixture.home_team)?;
        let away = lookup(by_team, fixture, &fixture.away_team)?;
        let xg = self
            .model
            .expected_goals_for(&fixture.home_team, home, &fixture.away_team, away)?;
        Ok(self.engine.build_report(&xg))
    }

    pub fn alerts_so_far(&self) -> Vec<Alert> {
        self.alerts.list()
    }

    pub fn history_fetches(&self) -> usize {
        self.histories.fetch_count()
    }

    /// Ends the run and hands back its alert log.
    pub fn finish(self) -> Vec<Alert> {
        self.alerts.into_alerts()
    }
}

fn lookup<'a>(
    by_team: &HashMap<&str, &'a Result<FormOutcome, AnalysisError>>,
    fixture: &Fixture,
    team: &str,
) -> Result<&'a FormOutcome, AnalysisError> {
    match by_team.get(team).copied() {
        Some(Ok(outcome)) => Ok(outcome),
        Some(Err(err)) => Err(err.clone()),
        None => Err(AnalysisError::HistoryUnavailable {
            league: fixture.league.clone(),
            team: team.to_string(),
            reason: "team was not scanned".to_string(),
        }),
    }
}

fn scan_order(teams: &[String], fixtures: &[Fixture]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let fixture_teams = fixtures
        .iter()
        .flat_map(|f| [&f.home_team, &f.away_team]);
    for team in teams.iter().chain(fixture_teams) {
        if seen.insert(team.as_str()) {
            out.push(team.clone());
        }
    }
    out
}

fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .ok()
}

fn with_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fixture(home: &str, away: &str) -> Fixture {
        Fixture {
            home_team: home.to_string(),
            away_team: away.to_string(),
            league: "L".to_string(),
            kickoff: Utc.with_ymd_and_hms(2026, 10, 16, 18, 0, 0).unwrap(),
        }
    }

    #[test]
    fn scan_order_appends_fixture_only_teams_once() {
        let teams = vec!["A".to_string(), "B".to_string()];
        let fixtures = vec![fixture("B", "C"), fixture("C", "A"), fixture("D", "C")];
        assert_eq!(scan_order(&teams, &fixtures), vec!["A", "B", "C", "D"]);
    }
}
