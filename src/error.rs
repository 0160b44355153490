use serde::Serialize;
use thiserror::Error;

/// Failures raised by the analytics core. An empty history is
/// `FormOutcome::NoData`, not an error.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisError {
    #[error("insufficient data for {team}: no matches played")]
    InsufficientData { team: String },

    #[error("decimal odds undefined for probability 0")]
    DivisionUndefined,

    #[error("probability {probability} outside [0, 1]")]
    InvalidProbability { probability: f64 },

    #[error("malformed record for {team}: {reason}")]
    MalformedRecord { team: String, reason: String },

    #[error("history unavailable for {team} ({league}): {reason}")]
    HistoryUnavailable {
        league: String,
        team: String,
        reason: String,
    },
}

impl AnalysisError {
    pub fn malformed(team: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            team: team.to_string(),
            reason: reason.into(),
        }
    }

    pub fn insufficient(team: &str) -> Self {
        Self::InsufficientData {
            team: team.to_string(),
        }
    }

    /// Short tag used by the CLI failure markers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "insufficient_data",
            Self::DivisionUndefined => "division_undefined",
            Self::InvalidProbability { .. } => "invalid_probability",
            Self::MalformedRecord { .. } => "malformed_record",
            Self::HistoryUnavailable { .. } => "history_unavailable",
        }
    }
}
