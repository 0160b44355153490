use serde::Serialize;

use crate::config::{DEFAULT_MAX_GOALS, DEFAULT_TOP_SCORELINES, EngineConfig};
use crate::error::AnalysisError;
use crate::expected_goals::{ExpectedGoals, round2};
use crate::poisson::{Scoreline, ScorelineMatrix};

const OVER_2_5_MIN_GOALS: u32 = 3;

/// `round(1/p, 2)`. Undefined at `p == 0`.
pub fn decimal_odds(p: f64) -> Result<f64, AnalysisError> {
    if p == 0.0 {
        return Err(AnalysisError::DivisionUndefined);
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(AnalysisError::InvalidProbability { probability: p });
    }
    Ok(round2(1.0 / p))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketPrice {
    pub probability: f64,
    /// `None` when the probability is 0 and the odds are undefined.
    pub odds: Option<f64>,
}

impl MarketPrice {
    pub fn from_probability(probability: f64) -> Self {
        let odds = match decimal_odds(probability) {
            Ok(o) => Some(o),
            Err(err) => {
                tracing::debug!(probability, %err, "odds unavailable");
                None
            }
        };
        Self { probability, odds }
    }

    pub fn percent(&self) -> f64 {
        round2(self.probability * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsReport {
    pub expected_goals: ExpectedGoals,
    pub over_2_5: MarketPrice,
    pub under_2_5: MarketPrice,
    pub btts_yes: MarketPrice,
    pub btts_no: MarketPrice,
    pub home_win: MarketPrice,
    pub draw: MarketPrice,
    pub away_win: MarketPrice,
    pub most_likely: Scoreline,
    pub top_scorelines: Vec<Scoreline>,
    /// Share of probability inside the truncated grid.
    pub captured_mass: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct OddsEngine {
    pub max_goals: u32,
    pub top_scorelines: usize,
}

impl Default for OddsEngine {
    fn default() -> Self {
        Self {
            max_goals: DEFAULT_MAX_GOALS,
            top_scorelines: DEFAULT_TOP_SCORELINES,
        }
    }
}

impl OddsEngine {
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self {
            max_goals: cfg.max_goals,
            top_scorelines: cfg.top_scorelines,
        }
    }

    pub fn matrix(&self, xg: &ExpectedGoals) -> ScorelineMatrix {
        ScorelineMatrix::from_rates(xg.home, xg.away, self.max_goals)
    }

    pub fn build_report(&self, xg: &ExpectedGoals) -> OddsReport {
        let matrix = self.matrix(xg);

        let over = matrix.sum_where(|h, a| h + a >= OVER_2_5_MIN_GOALS);
        let btts = matrix.sum_where(|h, a| h >= 1 && a >= 1);
        let home_win = matrix.sum_where(|h, a| h > a);
        let draw = matrix.sum_where(|h, a| h == a);
        let away_win = matrix.sum_where(|h, a| h < a);

        // The grid always has at least the 0-0 cell.
        let most_likely = matrix.most_likely().unwrap_or(Scoreline {
            home: 0,
            away: 0,
            probability: 0.0,
        });

        OddsReport {
            expected_goals: *xg,
            over_2_5: MarketPrice::from_probability(over),
            under_2_5: MarketPrice::from_probability(1.0 - over),
            btts_yes: MarketPrice::from_probability(btts),
            btts_no: MarketPrice::from_probability(1.0 - btts),
            home_win: MarketPrice::from_probability(home_win),
            draw: MarketPrice::from_probability(draw),
            away_win: MarketPrice::from_probability(away_win),
            most_likely,
            top_scorelines: matrix.top(self.top_scorelines),
            captured_mass: matrix.total_mass(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poisson::poisson_pmf;

    #[test]
    fn decimal_odds_rounds_reciprocal() {
        assert_eq!(decimal_odds(1.0).unwrap(), 1.0);
        assert_eq!(decimal_odds(0.5).unwrap(), 2.0);
        assert_eq!(decimal_odds(0.3).unwrap(), 3.33);
        assert_eq!(decimal_odds(0.0), Err(AnalysisError::DivisionUndefined));
        assert!(matches!(
            decimal_odds(1.5),
            Err(AnalysisError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn complements_sum_to_one() {
        let report = OddsEngine::default().build_report(&ExpectedGoals::new(1.35, 1.05));
        assert_eq!(report.over_2_5.probability + report.under_2_5.probability, 1.0);
        assert_eq!(report.btts_yes.probability + report.btts_no.probability, 1.0);
        assert!(report.captured_mass < 1.0);
    }

    #[test]
    fn over_counts_three_goals_and_more() {
        let engine = OddsEngine {
            max_goals: 2,
            top_scorelines: 5,
        };
        let xg = ExpectedGoals::new(1.4, 1.1);
        let matrix = engine.matrix(&xg);
        let cell = |h, a| matrix.get(h, a).unwrap();
        let expected = cell(1, 2) + cell(2, 1) + cell(2, 2);
        assert_eq!(engine.build_report(&xg).over_2_5.probability, expected);
    }

    #[test]
    fn zero_rates_leave_goal_markets_unpriced() {
        let report = OddsEngine::default().build_report(&ExpectedGoals::new(0.0, 0.0));
        assert_eq!(report.over_2_5.probability, 0.0);
        assert!(report.over_2_5.odds.is_none());
        assert_eq!(report.under_2_5.odds, Some(1.0));
        assert!(report.btts_yes.odds.is_none());
        assert_eq!(report.btts_no.odds, Some(1.0));
        assert_eq!((report.most_likely.home, report.most_likely.away), (0, 0));
        assert_eq!(report.most_likely.probability, 1.0);
    }

    #[test]
    fn worked_example_regression() {
        let engine = OddsEngine::default();
        let xg = ExpectedGoals::new(1.2, 0.8);
        let matrix = engine.matrix(&xg);
        let cell = matrix.get(1, 1).unwrap();
        assert_eq!(cell, poisson_pmf(1, 1.2) * poisson_pmf(1, 0.8));
        assert!((cell - 0.129_921_871_907).abs() < 1e-9);

        let report = engine.build_report(&xg);
        assert_eq!((report.most_likely.home, report.most_likely.away), (1, 0));
        assert_eq!(report.top_scorelines.len(), 5);
        let keys = report
            .top_scorelines
            .iter()
            .map(|s| (s.home, s.away))
            .collect::<Vec<_>>();
        assert_eq!(keys, vec![(1, 0), (0, 0), (1, 1), (0, 1), (2, 0)]);
        for pair in report.top_scorelines.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
    }
}
