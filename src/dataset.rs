use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::error::AnalysisError;
use crate::match_record::{MatchRecord, parse_match_records};
use crate::provider::{Fixture, LeagueDirectory, MatchHistoryProvider};

/// File-backed league data in the source API's shape. Match rows are kept raw so a
/// malformed row only fails its own team when that history is requested.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    leagues: BTreeMap<String, LeagueData>,
}

#[derive(Debug, Clone, Default)]
struct LeagueData {
    teams: BTreeMap<String, Vec<Value>>,
    fixtures: Vec<Fixture>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read dataset {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("parse dataset {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(Self::default());
        }
        let v: Value = serde_json::from_str(trimmed).context("invalid dataset json")?;
        let leagues = v
            .get("leagues")
            .and_then(|x| x.as_object())
            .ok_or_else(|| anyhow!("dataset has no leagues object"))?;

        let mut out = Self::default();
        for (league, body) in leagues {
            let data = out.leagues.entry(league.clone()).or_default();

            if let Some(teams) = body.get("teams").and_then(|x| x.as_object()) {
                for (team, entry) in teams {
                    let matches = entry
                        .get("matches")
                        .and_then(|x| x.as_array())
                        .cloned()
                        .unwrap_or_default();
                    data.teams.insert(team.clone(), matches);
                }
            }

            if let Some(arr) = body.get("fixtures").and_then(|x| x.as_array()) {
                for item in arr {
                    match parse_fixture(league, item) {
                        Some(f) => data.fixtures.push(f),
                        None => tracing::warn!(league = %league, "skipping unparseable fixture"),
                    }
                }
            }
        }
        Ok(out)
    }

    /// Stores a newest-first history for `team`.
    pub fn insert_history(&mut self, league: &str, team: &str, newest_first: &[MatchRecord]) {
        let rows = newest_first
            .iter()
            .map(|m| {
                json!({
                    "home_team": m.home_team,
                    "away_team": m.away_team,
                    "fthg": m.home_goals,
                    "ftag": m.away_goals,
                })
            })
            .collect();
        self.leagues
            .entry(league.to_string())
            .or_default()
            .teams
            .insert(team.to_string(), rows);
    }

    pub fn push_fixture(&mut self, fixture: Fixture) {
        self.leagues
            .entry(fixture.league.clone())
            .or_default()
            .fixtures
            .push(fixture);
    }

    pub fn to_json(&self) -> Value {
        let leagues = self
            .leagues
            .iter()
            .map(|(league, data)| {
                let teams = data
                    .teams
                    .iter()
                    .map(|(team, rows)| (team.clone(), json!({ "matches": rows })))
                    .collect::<serde_json::Map<_, _>>();
                let fixtures = data
                    .fixtures
                    .iter()
                    .map(|f| {
                        json!({
                            "home_team": f.home_team,
                            "away_team": f.away_team,
                            "kickoff": f.kickoff.to_rfc3339(),
                        })
                    })
                    .collect::<Vec<_>>();
                (league.clone(), json!({ "teams": teams, "fixtures": fixtures }))
            })
            .collect::<serde_json::Map<_, _>>();
        json!({ "leagues": leagues })
    }

    fn league(&self, league: &str) -> Result<&LeagueData> {
        self.leagues
            .get(league)
            .ok_or_else(|| anyhow!("unknown league {league}"))
    }
}

impl MatchHistoryProvider for Dataset {
    fn match_history(&self, league: &str, team: &str) -> Result<Vec<MatchRecord>, AnalysisError> {
        let rows = self
            .leagues
            .get(league)
            .and_then(|data| data.teams.get(team))
            .ok_or_else(|| AnalysisError::HistoryUnavailable {
                league: league.to_string(),
                team: team.to_string(),
                reason: "not in dataset".to_string(),
            })?;
        parse_match_records(team, rows)
    }
}

impl LeagueDirectory for Dataset {
    fn leagues(&self) -> Vec<String> {
        self.leagues.keys().cloned().collect()
    }

    fn teams(&self, league: &str) -> Result<Vec<String>> {
        Ok(self.league(league)?.teams.keys().cloned().collect())
    }

    fn fixtures(&self, league: &str) -> Result<Vec<Fixture>> {
        let mut out = self.league(league)?.fixtures.clone();
        out.sort_by(|a, b| {
            a.kickoff
                .cmp(&b.kickoff)
                .then_with(|| a.home_team.cmp(&b.home_team))
        });
        Ok(out)
    }
}

fn parse_fixture(league: &str, v: &Value) -> Option<Fixture> {
    let home_team = v.get("home_team")?.as_str()?.trim().to_string();
    let away_team = v.get("away_team")?.as_str()?.trim().to_string();
    if home_team.is_empty() || away_team.is_empty() {
        return None;
    }
    let kickoff = v.get("kickoff")?.as_str()?;
    let kickoff = DateTime::parse_from_rfc3339(kickoff.trim())
        .ok()?
        .with_timezone(&Utc);
    Some(Fixture {
        home_team,
        away_team,
        league: league.to_string(),
        kickoff,
    })
}
