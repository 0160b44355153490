use std::env;
use std::path::PathBuf;

pub const DEFAULT_MAX_GOALS: u32 = 5;
pub const DEFAULT_TOP_SCORELINES: usize = 5;
const DEFAULT_PARALLELISM: usize = 6;
const DEFAULT_DATASET: &str = "data/leagues.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Highest goal count per side enumerated in the scoreline matrix.
    pub max_goals: u32,
    pub top_scorelines: usize,
    /// Use home-venue rates for the home side and away-venue rates for the away side.
    pub venue_split: bool,
    pub parallelism: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_goals: DEFAULT_MAX_GOALS,
            top_scorelines: DEFAULT_TOP_SCORELINES,
            venue_split: false,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_goals = lookup("FORM_MAX_GOALS")
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_GOALS)
            .clamp(1, 15);
        let top_scorelines = lookup("FORM_TOP_SCORELINES")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_TOP_SCORELINES)
            .clamp(1, 36);
        let venue_split = lookup("FORM_VENUE_SPLIT")
            .map(|val| parse_flag(&val))
            .unwrap_or(false);
        let parallelism = lookup("FORM_PARALLELISM")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_PARALLELISM)
            .clamp(2, 32);

        Self {
            max_goals,
            top_scorelines,
            venue_split,
            parallelism,
        }
    }
}

pub fn default_dataset_path() -> PathBuf {
    env::var("FORM_DATASET")
        .ok()
        .filter(|val| !val.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
