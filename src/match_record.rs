use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Home,
    Away,
}

/// One record seen from the analysed team's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamMatch {
    pub side: Side,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl MatchRecord {
    pub fn new(home_team: &str, away_team: &str, home_goals: u32, away_goals: u32) -> Self {
        Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_goals,
            away_goals,
        }
    }

    pub fn side_of(&self, team: &str) -> Result<Side, AnalysisError> {
        match (self.home_team == team, self.away_team == team) {
            (true, false) => Ok(Side::Home),
            (false, true) => Ok(Side::Away),
            (true, true) => Err(AnalysisError::malformed(
                team,
                format!("team plays both sides of {} vs {}", self.home_team, self.away_team),
            )),
            (false, false) => Err(AnalysisError::malformed(
                team,
                format!("team not in {} vs {}", self.home_team, self.away_team),
            )),
        }
    }

    pub fn perspective(&self, team: &str) -> Result<TeamMatch, AnalysisError> {
        let side = self.side_of(team)?;
        let (goals_for, goals_against) = match side {
            Side::Home => (self.home_goals, self.away_goals),
            Side::Away => (self.away_goals, self.home_goals),
        };
        Ok(TeamMatch {
            side,
            goals_for,
            goals_against,
        })
    }
}

/// Parses a source-shaped record: `home_team`, `away_team`, `fthg`, `ftag`.
pub fn parse_match_record(team: &str, v: &Value) -> Result<MatchRecord, AnalysisError> {
    let home_team = str_field(v, "home_team").ok_or_else(|| missing(team, "home_team"))?;
    let away_team = str_field(v, "away_team").ok_or_else(|| missing(team, "away_team"))?;
    let home_goals = goals_field(team, v, "fthg")?;
    let away_goals = goals_field(team, v, "ftag")?;

    Ok(MatchRecord {
        home_team,
        away_team,
        home_goals,
        away_goals,
    })
}

pub fn parse_match_records(team: &str, arr: &[Value]) -> Result<Vec<MatchRecord>, AnalysisError> {
    arr.iter().map(|v| parse_match_record(team, v)).collect()
}

fn str_field(v: &Value, key: &str) -> Option<String> {
    let s = v.get(key)?.as_str()?.trim();
    if s.is_empty() {
        return None;
    }
    Some(s.to_string())
}

fn goals_field(team: &str, v: &Value, key: &str) -> Result<u32, AnalysisError> {
    let raw = v.get(key).ok_or_else(|| missing(team, key))?;
    raw.as_u64()
        .and_then(|g| u32::try_from(g).ok())
        .ok_or_else(|| AnalysisError::malformed(team, format!("{key} is not a goal count: {raw}")))
}

fn missing(team: &str, key: &str) -> AnalysisError {
    AnalysisError::malformed(team, format!("missing {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn perspective_flips_goals_for_away_side() {
        let m = MatchRecord::new("B", "A", 1, 3);
        let p = m.perspective("A").unwrap();
        assert_eq!(p.side, Side::Away);
        assert_eq!(p.goals_for, 3);
        assert_eq!(p.goals_against, 1);
    }

    #[test]
    fn unknown_team_is_malformed() {
        let m = MatchRecord::new("B", "C", 1, 0);
        let err = m.side_of("A").unwrap_err();
        assert_eq!(err.kind(), "malformed_record");
    }

    #[test]
    fn parses_source_shaped_record() {
        let v = json!({"home_team": "Pro Patria", "away_team": "Lecco", "fthg": 2, "ftag": 0});
        let m = parse_match_record("Lecco", &v).unwrap();
        assert_eq!(m, MatchRecord::new("Pro Patria", "Lecco", 2, 0));
    }

    #[test]
    fn negative_or_missing_goals_are_rejected() {
        let neg = json!({"home_team": "A", "away_team": "B", "fthg": -1, "ftag": 0});
        assert!(matches!(
            parse_match_record("A", &neg),
            Err(AnalysisError::MalformedRecord { .. })
        ));
        let missing = json!({"home_team": "A", "away_team": "B", "fthg": 1});
        assert!(parse_match_record("A", &missing).is_err());
        let blank = json!({"home_team": " ", "away_team": "B", "fthg": 1, "ftag": 1});
        assert!(parse_match_record("A", &blank).is_err());
    }
}
