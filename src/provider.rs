use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::error::AnalysisError;
use crate::match_record::MatchRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixture {
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub kickoff: DateTime<Utc>,
}

/// Supplies a team's completed matches, newest-first.
pub trait MatchHistoryProvider: Send + Sync {
    fn match_history(&self, league: &str, team: &str) -> Result<Vec<MatchRecord>, AnalysisError>;
}

/// League, team and upcoming fixture listings.
pub trait LeagueDirectory: Send + Sync {
    fn leagues(&self) -> Vec<String>;
    fn teams(&self, league: &str) -> Result<Vec<String>>;
    fn fixtures(&self, league: &str) -> Result<Vec<Fixture>>;
}

impl<P: MatchHistoryProvider + ?Sized> MatchHistoryProvider for &P {
    fn match_history(&self, league: &str, team: &str) -> Result<Vec<MatchRecord>, AnalysisError> {
        (**self).match_history(league, team)
    }
}

type HistorySlot = Arc<OnceCell<Result<Arc<Vec<MatchRecord>>, AnalysisError>>>;

/// Single-flight memo over a history provider: one fetch per `(league, team)` for
/// the lifetime of the wrapper, shared by concurrent callers. Failures are kept too.
pub struct CachedHistoryProvider<P> {
    inner: P,
    slots: Mutex<HashMap<(String, String), HistorySlot>>,
    fetches: AtomicUsize,
}

impl<P: MatchHistoryProvider> CachedHistoryProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            slots: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn history(&self, league: &str, team: &str) -> Result<Arc<Vec<MatchRecord>>, AnalysisError> {
        let slot = {
            let mut guard = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            guard
                .entry((league.to_string(), team.to_string()))
                .or_default()
                .clone()
        };
        // Other callers for the same key block here until the first fetch lands.
        slot.get_or_init(|| {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            self.inner.match_history(league, team).map(Arc::new)
        })
        .clone()
    }

    /// Number of calls that reached the inner provider.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;
    use std::thread;
    use std::time::Duration;

    struct SlowProvider {
        calls: AtomicUsize,
    }

    impl MatchHistoryProvider for SlowProvider {
        fn match_history(
            &self,
            league: &str,
            team: &str,
        ) -> Result<Vec<MatchRecord>, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            if team == "Ghost" {
                return Err(AnalysisError::HistoryUnavailable {
                    league: league.to_string(),
                    team: team.to_string(),
                    reason: "unknown team".to_string(),
                });
            }
            Ok(vec![MatchRecord::new(team, "Other", 1, 0)])
        }
    }

    #[test]
    fn concurrent_requests_share_one_fetch() {
        let cache = CachedHistoryProvider::new(SlowProvider {
            calls: AtomicUsize::new(0),
        });
        let lens = (0..16)
            .into_par_iter()
            .map(|_| cache.history("L", "A").map(|h| h.len()))
            .collect::<Vec<_>>();
        assert!(lens.iter().all(|r| r.as_ref().is_ok_and(|n| *n == 1)));
        assert_eq!(cache.fetch_count(), 1);
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_are_memoized_per_key() {
        let cache = CachedHistoryProvider::new(SlowProvider {
            calls: AtomicUsize::new(0),
        });
        assert!(cache.history("L", "Ghost").is_err());
        assert!(cache.history("L", "Ghost").is_err());
        assert!(cache.history("M", "Ghost").is_err());
        assert_eq!(cache.fetch_count(), 2);
    }
}
