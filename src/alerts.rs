use std::sync::{Mutex, PoisonError};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertKind {
    ScorelessStreakRecord,
    CleanSheetStreakRecord,
}

impl AlertKind {
    pub fn label(self) -> &'static str {
        match self {
            AlertKind::ScorelessStreakRecord => "scoreless streak record",
            AlertKind::CleanSheetStreakRecord => "clean sheet streak record",
        }
    }
}

/// A team is currently living through its longest run of this kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub team: String,
    pub league: String,
    pub kind: AlertKind,
    pub streak_length: u32,
    pub sample_size: u32,
}

/// Append-only alert log for one analysis run.
#[derive(Debug, Default)]
pub struct AlertAggregator {
    entries: Mutex<Vec<Alert>>,
}

impl AlertAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, alert: Alert) {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.push(alert);
    }

    pub fn list(&self) -> Vec<Alert> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_alerts(self) -> Vec<Alert> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    fn alert(team: &str, len: u32) -> Alert {
        Alert {
            team: team.to_string(),
            league: "L".to_string(),
            kind: AlertKind::ScorelessStreakRecord,
            streak_length: len,
            sample_size: 10,
        }
    }

    #[test]
    fn list_keeps_insertion_order_and_duplicates() {
        let log = AlertAggregator::new();
        log.record(alert("A", 2));
        log.record(alert("B", 3));
        log.record(alert("A", 2));
        let out = log.list();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], out[2]);
        assert_eq!(out[1].team, "B");
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let log = AlertAggregator::new();
        (0..500u32).into_par_iter().for_each(|i| {
            log.record(alert(&format!("T{i}"), i));
        });
        assert_eq!(log.len(), 500);
        let mut lens = log.into_alerts().into_iter().map(|a| a.streak_length).collect::<Vec<_>>();
        lens.sort_unstable();
        assert_eq!(lens, (0..500).collect::<Vec<_>>());
    }
}
