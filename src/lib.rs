pub mod alerts;
pub mod batch;
pub mod config;
pub mod dataset;
pub mod error;
pub mod expected_goals;
pub mod form;
pub mod logging;
pub mod match_record;
pub mod odds;
pub mod poisson;
pub mod provider;
pub mod render;
pub mod synthetic;

pub use alerts::{Alert, AlertAggregator, AlertKind};
pub use error::AnalysisError;
pub use expected_goals::{ExpectedGoals, GoalExpectationModel};
pub use form::{FormAnalyzer, FormOutcome, FormSummary};
pub use match_record::MatchRecord;
pub use odds::{OddsEngine, OddsReport};
