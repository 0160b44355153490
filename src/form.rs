use serde::Serialize;

use crate::alerts::{Alert, AlertAggregator, AlertKind};
use crate::error::AnalysisError;
use crate::match_record::{MatchRecord, Side, TeamMatch};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VenueSplit {
    pub played: u32,
    pub scored: u64,
    pub conceded: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FormSummary {
    pub matches_played: u32,
    pub goals_scored: u64,
    pub goals_conceded: u64,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub current_scoreless_streak: u32,
    pub max_scoreless_streak: u32,
    pub current_clean_sheet_streak: u32,
    pub max_clean_sheet_streak: u32,
    pub home: VenueSplit,
    pub away: VenueSplit,
}

impl FormSummary {
    pub fn scoreless_record_alive(&self) -> bool {
        self.current_scoreless_streak > 0
            && self.current_scoreless_streak == self.max_scoreless_streak
    }

    pub fn clean_sheet_record_alive(&self) -> bool {
        self.current_clean_sheet_streak > 0
            && self.current_clean_sheet_streak == self.max_clean_sheet_streak
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "summary", rename_all = "snake_case")]
pub enum FormOutcome {
    NoData,
    Summary(FormSummary),
}

impl FormOutcome {
    pub fn summary(&self) -> Option<&FormSummary> {
        match self {
            FormOutcome::NoData => None,
            FormOutcome::Summary(s) => Some(s),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, FormOutcome::NoData)
    }
}

/// Running state of the chronological scan.
#[derive(Debug, Clone, Default)]
pub struct FormTally {
    state: FormSummary,
}

impl FormTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the scan by one match (oldest-first).
    pub fn apply(&mut self, m: &TeamMatch) {
        let s = &mut self.state;
        s.matches_played = s.matches_played.saturating_add(1);
        s.goals_scored = s.goals_scored.saturating_add(u64::from(m.goals_for));
        s.goals_conceded = s.goals_conceded.saturating_add(u64::from(m.goals_against));

        match m.goals_for.cmp(&m.goals_against) {
            std::cmp::Ordering::Greater => s.wins = s.wins.saturating_add(1),
            std::cmp::Ordering::Less => s.losses = s.losses.saturating_add(1),
            std::cmp::Ordering::Equal => s.draws = s.draws.saturating_add(1),
        }

        let venue = match m.side {
            Side::Home => &mut s.home,
            Side::Away => &mut s.away,
        };
        venue.played = venue.played.saturating_add(1);
        venue.scored = venue.scored.saturating_add(u64::from(m.goals_for));
        venue.conceded = venue.conceded.saturating_add(u64::from(m.goals_against));

        if m.goals_for == 0 {
            s.current_scoreless_streak = s.current_scoreless_streak.saturating_add(1);
        } else {
            s.current_scoreless_streak = 0;
        }
        s.max_scoreless_streak = s.max_scoreless_streak.max(s.current_scoreless_streak);

        if m.goals_against == 0 {
            s.current_clean_sheet_streak = s.current_clean_sheet_streak.saturating_add(1);
        } else {
            s.current_clean_sheet_streak = 0;
        }
        s.max_clean_sheet_streak = s.max_clean_sheet_streak.max(s.current_clean_sheet_streak);
    }

    pub fn snapshot(&self) -> FormSummary {
        self.state
    }

    pub fn finish(self) -> FormOutcome {
        if self.state.matches_played == 0 {
            FormOutcome::NoData
        } else {
            FormOutcome::Summary(self.state)
        }
    }
}

/// Reduces a team's match history to a `FormOutcome`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormAnalyzer;

impl FormAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// `history` is newest-first, as the data source supplies it.
    pub fn analyze(
        &self,
        league: &str,
        team: &str,
        history: &[MatchRecord],
        alerts: &AlertAggregator,
    ) -> Result<FormOutcome, AnalysisError> {
        let chronological = chronological_perspective(team, history)?;

        let mut tally = FormTally::new();
        for m in &chronological {
            tally.apply(m);
        }
        let outcome = tally.finish();

        let Some(summary) = outcome.summary() else {
            tracing::debug!(league, team, "no matches recorded");
            return Ok(outcome);
        };

        tracing::debug!(
            league,
            team,
            played = summary.matches_played,
            wins = summary.wins,
            draws = summary.draws,
            losses = summary.losses,
            "form scanned"
        );

        if summary.scoreless_record_alive() {
            emit(
                alerts,
                league,
                team,
                AlertKind::ScorelessStreakRecord,
                summary.current_scoreless_streak,
                summary,
            );
        }
        if summary.clean_sheet_record_alive() {
            emit(
                alerts,
                league,
                team,
                AlertKind::CleanSheetStreakRecord,
                summary.current_clean_sheet_streak,
                summary,
            );
        }

        Ok(outcome)
    }
}

/// Reverses a newest-first history and resolves every record to the team's side.
/// Any unresolvable record fails the whole history.
pub fn chronological_perspective(
    team: &str,
    history: &[MatchRecord],
) -> Result<Vec<TeamMatch>, AnalysisError> {
    history.iter().rev().map(|m| m.perspective(team)).collect()
}

fn emit(
    alerts: &AlertAggregator,
    league: &str,
    team: &str,
    kind: AlertKind,
    streak_length: u32,
    summary: &FormSummary,
) {
    tracing::info!(league, team, kind = kind.label(), streak_length, "streak at all-time high");
    alerts.record(Alert {
        team: team.to_string(),
        league: league.to_string(),
        kind,
        streak_length,
        sample_size: summary.matches_played,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(home: &str, away: &str, hg: u32, ag: u32) -> MatchRecord {
        MatchRecord::new(home, away, hg, ag)
    }

    #[test]
    fn reversal_puts_oldest_first() {
        // Newest-first: the 0-3 loss is the latest match.
        let history = vec![m("A", "B", 0, 3), m("A", "C", 2, 0)];
        let seq = chronological_perspective("A", &history).unwrap();
        assert_eq!(seq[0].goals_for, 2);
        assert_eq!(seq[1].goals_for, 0);
    }

    #[test]
    fn max_tracks_every_match_not_only_resets() {
        // Oldest-first: 0-0, 0-1, 0-2 -> scoreless run still open at the end.
        let newest_first = vec![m("A", "B", 0, 2), m("C", "A", 1, 0), m("A", "D", 0, 0)];
        let alerts = AlertAggregator::new();
        let out = FormAnalyzer::new()
            .analyze("L", "A", &newest_first, &alerts)
            .unwrap();
        let s = out.summary().unwrap();
        assert_eq!(s.current_scoreless_streak, 3);
        assert_eq!(s.max_scoreless_streak, 3);
        assert_eq!(s.max_clean_sheet_streak, 1);
        assert_eq!(s.current_clean_sheet_streak, 0);

        let list = alerts.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].kind, AlertKind::ScorelessStreakRecord);
        assert_eq!(list[0].streak_length, 3);
        assert_eq!(list[0].sample_size, 3);
    }

    #[test]
    fn venue_split_follows_side() {
        let newest_first = vec![m("B", "A", 2, 1), m("A", "C", 3, 0)];
        let alerts = AlertAggregator::new();
        let out = FormAnalyzer::new()
            .analyze("L", "A", &newest_first, &alerts)
            .unwrap();
        let s = out.summary().unwrap();
        assert_eq!(s.home, VenueSplit { played: 1, scored: 3, conceded: 0 });
        assert_eq!(s.away, VenueSplit { played: 1, scored: 1, conceded: 2 });
    }

    #[test]
    fn huge_goal_counts_do_not_overflow_totals() {
        let newest_first = vec![m("A", "B", 1, 0), m("A", "C", u32::MAX, 0)];
        let alerts = AlertAggregator::new();
        let out = FormAnalyzer::new()
            .analyze("L", "A", &newest_first, &alerts)
            .unwrap();
        let s = out.summary().unwrap();
        assert_eq!(s.goals_scored, u64::from(u32::MAX) + 1);
        assert_eq!(s.home.scored, s.goals_scored);
        assert_eq!(s.wins, 2);
    }

    #[test]
    fn malformed_record_emits_nothing() {
        // A clean-sheet record would be live if the bad row were skipped.
        let newest_first = vec![m("X", "Y", 1, 1), m("A", "B", 1, 0)];
        let alerts = AlertAggregator::new();
        let err = FormAnalyzer::new()
            .analyze("L", "A", &newest_first, &alerts)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord { .. }));
        assert!(alerts.is_empty());
    }
}
