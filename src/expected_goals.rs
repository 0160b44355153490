use serde::Serialize;

use crate::error::AnalysisError;
use crate::form::{FormOutcome, FormSummary, VenueSplit};

/// Goal rates for one fixture. Full precision; round only when reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}

impl ExpectedGoals {
    pub fn new(home: f64, away: f64) -> Self {
        Self {
            home: home.max(0.0),
            away: away.max(0.0),
        }
    }

    pub fn rounded(&self) -> (f64, f64) {
        (round2(self.home), round2(self.away))
    }
}

/// Two-factor estimate: a side's scoring rate blended with the opponent's conceding rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalExpectationModel {
    pub venue_split: bool,
}

impl GoalExpectationModel {
    pub fn new(venue_split: bool) -> Self {
        Self { venue_split }
    }

    pub fn expected_goals(
        &self,
        home_team: &str,
        home: &FormSummary,
        away_team: &str,
        away: &FormSummary,
    ) -> Result<ExpectedGoals, AnalysisError> {
        let home_rates = if self.venue_split {
            Rates::venue(home_team, &home.home)?
        } else {
            Rates::overall(home_team, home)?
        };
        let away_rates = if self.venue_split {
            Rates::venue(away_team, &away.away)?
        } else {
            Rates::overall(away_team, away)?
        };

        Ok(ExpectedGoals::new(
            (home_rates.scored + away_rates.conceded) / 2.0,
            (away_rates.scored + home_rates.conceded) / 2.0,
        ))
    }

    /// Same as `expected_goals`, with `NoData` on either side mapped to InsufficientData.
    pub fn expected_goals_for(
        &self,
        home_team: &str,
        home: &FormOutcome,
        away_team: &str,
        away: &FormOutcome,
    ) -> Result<ExpectedGoals, AnalysisError> {
        let home = home
            .summary()
            .ok_or_else(|| AnalysisError::insufficient(home_team))?;
        let away = away
            .summary()
            .ok_or_else(|| AnalysisError::insufficient(away_team))?;
        self.expected_goals(home_team, home, away_team, away)
    }
}

struct Rates {
    scored: f64,
    conceded: f64,
}

impl Rates {
    fn overall(team: &str, s: &FormSummary) -> Result<Self, AnalysisError> {
        Self::from_counts(team, s.matches_played, s.goals_scored, s.goals_conceded)
    }

    fn venue(team: &str, v: &VenueSplit) -> Result<Self, AnalysisError> {
        Self::from_counts(team, v.played, v.scored, v.conceded)
    }

    fn from_counts(
        team: &str,
        played: u32,
        scored: u64,
        conceded: u64,
    ) -> Result<Self, AnalysisError> {
        if played == 0 {
            return Err(AnalysisError::insufficient(team));
        }
        let n = played as f64;
        Ok(Self {
            scored: scored as f64 / n,
            conceded: conceded as f64 / n,
        })
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(played: u32, scored: u64, conceded: u64) -> FormSummary {
        FormSummary {
            matches_played: played,
            goals_scored: scored,
            goals_conceded: conceded,
            wins: played,
            ..FormSummary::default()
        }
    }

    #[test]
    fn blends_scoring_with_opponent_conceding() {
        let home = summary(10, 15, 8);
        let away = summary(8, 7, 12);
        let xg = GoalExpectationModel::default()
            .expected_goals("H", &home, "A", &away)
            .unwrap();
        // (1.5 + 1.5) / 2 and (0.875 + 0.8) / 2
        assert!((xg.home - 1.5).abs() < 1e-12);
        assert!((xg.away - 0.8375).abs() < 1e-12);
        assert_eq!(xg.rounded(), (1.5, 0.84));
    }

    #[test]
    fn zero_matches_is_insufficient_data() {
        let home = summary(0, 0, 0);
        let away = summary(4, 4, 4);
        let err = GoalExpectationModel::default()
            .expected_goals("H", &home, "A", &away)
            .unwrap_err();
        assert_eq!(err, AnalysisError::insufficient("H"));
    }

    #[test]
    fn no_data_outcome_maps_to_insufficient() {
        let away = FormOutcome::Summary(summary(4, 4, 4));
        let err = GoalExpectationModel::default()
            .expected_goals_for("H", &FormOutcome::NoData, "A", &away)
            .unwrap_err();
        assert_eq!(err.kind(), "insufficient_data");
    }

    #[test]
    fn venue_split_uses_side_specific_rates() {
        let mut home = summary(4, 4, 4);
        home.home = VenueSplit { played: 2, scored: 4, conceded: 0 };
        home.away = VenueSplit { played: 2, scored: 0, conceded: 4 };
        let mut away = summary(4, 4, 4);
        away.home = VenueSplit { played: 2, scored: 4, conceded: 2 };
        away.away = VenueSplit { played: 2, scored: 0, conceded: 2 };

        let split = GoalExpectationModel::new(true)
            .expected_goals("H", &home, "A", &away)
            .unwrap();
        assert!((split.home - 1.5).abs() < 1e-12);
        assert!((split.away - 0.0).abs() < 1e-12);

        let flat = GoalExpectationModel::new(false)
            .expected_goals("H", &home, "A", &away)
            .unwrap();
        assert!((flat.home - 1.0).abs() < 1e-12);
        assert!((flat.away - 1.0).abs() < 1e-12);
    }

    #[test]
    fn venue_split_without_home_games_is_insufficient() {
        let mut home = summary(2, 2, 2);
        home.away = VenueSplit { played: 2, scored: 2, conceded: 2 };
        let mut away = summary(2, 2, 2);
        away.away = VenueSplit { played: 2, scored: 2, conceded: 2 };
        let err = GoalExpectationModel::new(true)
            .expected_goals("H", &home, "A", &away)
            .unwrap_err();
        assert_eq!(err, AnalysisError::insufficient("H"));
    }
}
